//! The plan participation state machine.
//!
//! Per (plan, username) pair the states are NONE -> APPLIED -> ACCEPTED,
//! with ACCEPTED -> NONE on removal (withdrawal of an application is
//! reserved but not implemented). Accept and remove run their
//! read-check-write sequences inside one transaction; the capacity check
//! is a conditional UPDATE, so two concurrent accepts against the last
//! open seat resolve to exactly one winner.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use wayfarer_db::models::{NewApplication, PlanApplication, PlanParticipant};
use wayfarer_db::queries::{applications, participants, plans};

use crate::error::Error;

/// Create (or refresh) an application for `(plan_id, username)`.
///
/// Re-applying updates the outstanding application in place rather than
/// creating a duplicate.
pub async fn apply(
    pool: &PgPool,
    plan_id: Uuid,
    application: &NewApplication,
) -> Result<PlanApplication, Error> {
    if application.username.is_empty() {
        return Err(Error::InvalidInput("username is required".to_string()));
    }

    let row = applications::upsert_application(pool, plan_id, application).await?;

    info!(plan_id = %plan_id, username = %row.username, "application recorded");
    Ok(row)
}

/// Accept an applicant: convert their application into a participant.
///
/// Within one transaction: snapshot the application into a participant
/// row, take the last-seat check and counter increment as one atomic
/// UPDATE, and delete the application. Any failure rolls the whole
/// transition back, leaving application and participant counts untouched.
pub async fn accept(
    pool: &PgPool,
    plan_id: Uuid,
    username: &str,
) -> Result<PlanParticipant, Error> {
    if username.is_empty() {
        return Err(Error::InvalidInput("username is required".to_string()));
    }

    let mut tx = pool.begin().await?;

    let plan = plans::get_plan(&mut *tx, plan_id)
        .await?
        .ok_or_else(|| Error::NotFound("plan".to_string()))?;

    // Capacity is checked before the application lookup: a full plan
    // answers "capacity full" regardless of who is being accepted. The
    // conditional UPDATE below remains the atomic enforcement.
    if plan.participants >= plan.capacity {
        return Err(Error::CapacityExceeded);
    }

    let application = applications::find_application(&mut *tx, plan_id, username)
        .await?
        .ok_or_else(|| Error::NotFound("application".to_string()))?;

    let participant = participants::insert_from_application(&mut *tx, &application).await?;

    if !plans::try_increment_participants(&mut *tx, plan_id).await? {
        // Zero rows affected: the plan is at capacity. The transaction
        // guard rolls back the participant insert on drop.
        return Err(Error::CapacityExceeded);
    }

    applications::delete_application(&mut *tx, application.id).await?;

    tx.commit().await?;

    info!(
        plan_id = %plan_id,
        username = %username,
        participants = plan.participants + 1,
        capacity = plan.capacity,
        "applicant accepted"
    );
    Ok(participant)
}

/// Remove a confirmed participant.
///
/// Deletes the participant row and decrements the parent plan's counter,
/// clamped at zero. A missing parent plan is tolerated: the participant
/// row is deleted regardless.
pub async fn remove(pool: &PgPool, plan_id: Uuid, username: &str) -> Result<(), Error> {
    if username.is_empty() {
        return Err(Error::InvalidInput("username is required".to_string()));
    }

    let mut tx = pool.begin().await?;

    let participant = participants::find_participant(&mut *tx, plan_id, username)
        .await?
        .ok_or_else(|| Error::NotFound("participant".to_string()))?;

    participants::delete_participant(&mut *tx, participant.id).await?;
    plans::decrement_participants(&mut *tx, plan_id).await?;

    tx.commit().await?;

    info!(plan_id = %plan_id, username = %username, "participant removed");
    Ok(())
}

/// Whether `username` has an outstanding application for the plan.
///
/// Requires an identified caller; `None` means the request carried no
/// identity and is rejected rather than answered.
pub async fn check_applied(
    pool: &PgPool,
    plan_id: Uuid,
    username: Option<&str>,
) -> Result<bool, Error> {
    let username = username.ok_or(Error::Unauthenticated)?;

    let found = applications::find_application(pool, plan_id, username)
        .await
        .map_err(Error::Persistence)?;

    Ok(found.is_some())
}
