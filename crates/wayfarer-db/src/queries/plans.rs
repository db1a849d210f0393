//! Database query functions for the `plans` table.

use anyhow::{Context, Result};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{NewPlan, Plan};

/// Insert a new plan row. Returns the inserted plan with server-generated
/// defaults (id, views, created_at).
pub async fn insert_plan(pool: &PgPool, new: &NewPlan) -> Result<Plan> {
    let plan = sqlx::query_as::<_, Plan>(
        "INSERT INTO plans (title, username, destination, date, summary, participants, capacity, tags, itinerary) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING *",
    )
    .bind(&new.title)
    .bind(&new.username)
    .bind(&new.destination)
    .bind(&new.date)
    .bind(&new.summary)
    .bind(new.participants)
    .bind(new.capacity)
    .bind(&new.tags)
    .bind(&new.itinerary)
    .fetch_one(pool)
    .await
    .context("failed to insert plan")?;

    Ok(plan)
}

/// Fetch a plan by its ID without side effects.
pub async fn get_plan(executor: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<Option<Plan>> {
    sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Fetch a plan by its ID and increment its view counter in one statement.
///
/// Returns the plan with the already-incremented `views` value, or `None`
/// when the plan does not exist.
pub async fn fetch_plan_detail(pool: &PgPool, id: Uuid) -> Result<Option<Plan>> {
    let plan = sqlx::query_as::<_, Plan>(
        "UPDATE plans SET views = views + 1 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("failed to fetch plan detail")?;

    Ok(plan)
}

/// List all plans, ordered by creation time (newest first).
pub async fn list_plans(pool: &PgPool) -> Result<Vec<Plan>> {
    let plans = sqlx::query_as::<_, Plan>("SELECT * FROM plans ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
        .context("failed to list plans")?;

    Ok(plans)
}

/// Overwrite the mutable fields of a plan. Returns `false` when no plan
/// with the given ID exists.
pub async fn update_plan(pool: &PgPool, id: Uuid, updated: &NewPlan) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE plans \
         SET title = $1, username = $2, destination = $3, date = $4, summary = $5, \
             participants = $6, capacity = $7, tags = $8, itinerary = $9 \
         WHERE id = $10",
    )
    .bind(&updated.title)
    .bind(&updated.username)
    .bind(&updated.destination)
    .bind(&updated.date)
    .bind(&updated.summary)
    .bind(updated.participants)
    .bind(updated.capacity)
    .bind(&updated.tags)
    .bind(&updated.itinerary)
    .bind(id)
    .execute(pool)
    .await
    .context("failed to update plan")?;

    Ok(result.rows_affected() > 0)
}

/// Delete a plan. Applications and participants cascade at the schema level.
/// Returns `false` when no plan with the given ID exists.
pub async fn delete_plan(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM plans WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete plan")?;

    Ok(result.rows_affected() > 0)
}

/// Conditionally increment the confirmed-participant counter.
///
/// The capacity check and the increment execute as a single compare-and-swap
/// so concurrent acceptances cannot overshoot `capacity`. Returns `true`
/// when the counter was incremented, `false` when the plan is full or gone.
pub async fn try_increment_participants(
    executor: impl PgExecutor<'_>,
    id: Uuid,
) -> sqlx::Result<bool> {
    let result =
        sqlx::query("UPDATE plans SET participants = participants + 1 WHERE id = $1 AND participants < capacity")
            .bind(id)
            .execute(executor)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// Decrement the confirmed-participant counter, clamped at zero.
///
/// A missing plan is a no-op: removal of a participant row must succeed
/// even when the parent plan has already been deleted.
pub async fn decrement_participants(executor: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<()> {
    sqlx::query("UPDATE plans SET participants = participants - 1 WHERE id = $1 AND participants > 0")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}
