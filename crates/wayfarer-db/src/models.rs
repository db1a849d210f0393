use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A trip proposal -- the aggregate root.
///
/// `participants` counts confirmed members and is only ever changed by a
/// successful acceptance (+1) or a successful participant removal (-1,
/// clamped at 0). The schema enforces `0 <= participants <= capacity`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Plan {
    pub id: Uuid,
    pub title: String,
    pub username: String,
    pub destination: String,
    pub date: Option<String>,
    pub summary: String,
    pub participants: i32,
    pub capacity: i32,
    pub views: i32,
    pub tags: String,
    pub itinerary: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// A pending request to join a plan.
///
/// Unique per `(plan_id, username)`; deleted the moment it is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanApplication {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub username: String,
    pub reason: String,
    pub travel_style: String,
    pub contact_type: String,
    pub contact_value: String,
}

/// A confirmed member of a plan.
///
/// The contact and travel-style fields are a value snapshot copied from the
/// application at acceptance time, never re-read afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanParticipant {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub username: String,
    pub contact_type: String,
    pub contact_value: String,
    pub travel_style: String,
}

/// Fields accepted when creating or updating a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlan {
    pub title: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default = "default_participants")]
    pub participants: i32,
    #[serde(default = "default_capacity")]
    pub capacity: i32,
    #[serde(default)]
    pub tags: String,
    pub itinerary: serde_json::Value,
}

fn default_username() -> String {
    "anonymous".to_string()
}

fn default_participants() -> i32 {
    1
}

fn default_capacity() -> i32 {
    4
}

/// Fields accepted when submitting a plan application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApplication {
    pub username: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub travel_style: String,
    #[serde(default)]
    pub contact_type: String,
    #[serde(default)]
    pub contact_value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_plan_defaults() {
        let plan: NewPlan = serde_json::from_value(serde_json::json!({
            "title": "Jeju long weekend",
            "itinerary": {},
        }))
        .expect("should deserialize");

        assert_eq!(plan.username, "anonymous");
        assert_eq!(plan.participants, 1);
        assert_eq!(plan.capacity, 4);
        assert!(plan.destination.is_empty());
        assert!(plan.date.is_none());
    }

    #[test]
    fn new_application_defaults() {
        let app: NewApplication = serde_json::from_value(serde_json::json!({
            "username": "mina",
        }))
        .expect("should deserialize");

        assert_eq!(app.username, "mina");
        assert!(app.reason.is_empty());
        assert!(app.contact_type.is_empty());
    }
}
