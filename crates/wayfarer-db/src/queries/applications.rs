//! Database query functions for the `plan_applications` table.

use anyhow::{Context, Result};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{NewApplication, PlanApplication};

/// Insert an application for `(plan_id, username)`, or update the existing
/// one. Re-applying overwrites the previous reason, travel style, and
/// contact fields rather than creating a second row.
pub async fn upsert_application(
    executor: impl PgExecutor<'_>,
    plan_id: Uuid,
    new: &NewApplication,
) -> sqlx::Result<PlanApplication> {
    sqlx::query_as::<_, PlanApplication>(
        "INSERT INTO plan_applications (plan_id, username, reason, travel_style, contact_type, contact_value) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (plan_id, username) DO UPDATE \
         SET reason = EXCLUDED.reason, \
             travel_style = EXCLUDED.travel_style, \
             contact_type = EXCLUDED.contact_type, \
             contact_value = EXCLUDED.contact_value \
         RETURNING *",
    )
    .bind(plan_id)
    .bind(&new.username)
    .bind(&new.reason)
    .bind(&new.travel_style)
    .bind(&new.contact_type)
    .bind(&new.contact_value)
    .fetch_one(executor)
    .await
}

/// List all applications for a plan.
pub async fn list_applications(pool: &PgPool, plan_id: Uuid) -> Result<Vec<PlanApplication>> {
    let applications = sqlx::query_as::<_, PlanApplication>(
        "SELECT * FROM plan_applications WHERE plan_id = $1",
    )
    .bind(plan_id)
    .fetch_all(pool)
    .await
    .context("failed to list plan applications")?;

    Ok(applications)
}

/// Find the outstanding application for `(plan_id, username)`, if any.
pub async fn find_application(
    executor: impl PgExecutor<'_>,
    plan_id: Uuid,
    username: &str,
) -> sqlx::Result<Option<PlanApplication>> {
    sqlx::query_as::<_, PlanApplication>(
        "SELECT * FROM plan_applications WHERE plan_id = $1 AND username = $2",
    )
    .bind(plan_id)
    .bind(username)
    .fetch_optional(executor)
    .await
}

/// Delete an application by its ID.
pub async fn delete_application(executor: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM plan_applications WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}
