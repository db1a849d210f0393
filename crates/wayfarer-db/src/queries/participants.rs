//! Database query functions for the `plan_participants` table.

use anyhow::{Context, Result};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{PlanApplication, PlanParticipant};

/// Insert a participant row by snapshotting fields from an accepted
/// application. The contact and travel-style values are copied verbatim;
/// the participant never refers back to the application afterwards.
pub async fn insert_from_application(
    executor: impl PgExecutor<'_>,
    application: &PlanApplication,
) -> sqlx::Result<PlanParticipant> {
    sqlx::query_as::<_, PlanParticipant>(
        "INSERT INTO plan_participants (plan_id, username, contact_type, contact_value, travel_style) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING *",
    )
    .bind(application.plan_id)
    .bind(&application.username)
    .bind(&application.contact_type)
    .bind(&application.contact_value)
    .bind(&application.travel_style)
    .fetch_one(executor)
    .await
}

/// List all participants of a plan.
pub async fn list_participants(pool: &PgPool, plan_id: Uuid) -> Result<Vec<PlanParticipant>> {
    let participants = sqlx::query_as::<_, PlanParticipant>(
        "SELECT * FROM plan_participants WHERE plan_id = $1",
    )
    .bind(plan_id)
    .fetch_all(pool)
    .await
    .context("failed to list plan participants")?;

    Ok(participants)
}

/// Find the participant row for `(plan_id, username)`, if any.
pub async fn find_participant(
    executor: impl PgExecutor<'_>,
    plan_id: Uuid,
    username: &str,
) -> sqlx::Result<Option<PlanParticipant>> {
    sqlx::query_as::<_, PlanParticipant>(
        "SELECT * FROM plan_participants WHERE plan_id = $1 AND username = $2",
    )
    .bind(plan_id)
    .bind(username)
    .fetch_optional(executor)
    .await
}

/// Delete a participant by its ID.
pub async fn delete_participant(executor: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM plan_participants WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}
