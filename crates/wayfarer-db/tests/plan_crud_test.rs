//! Integration tests for plan, application, and participant queries.
//!
//! Each test creates a unique temporary database via `wayfarer-test-utils`,
//! runs migrations, and drops it on completion so tests are fully isolated.

use serde_json::json;
use uuid::Uuid;

use wayfarer_db::models::{NewApplication, NewPlan};
use wayfarer_db::queries::{applications, participants, plans};
use wayfarer_test_utils::{create_test_db, drop_test_db};

fn test_plan(title: &str, participants: i32, capacity: i32) -> NewPlan {
    NewPlan {
        title: title.to_string(),
        username: "owner".to_string(),
        destination: "Jeju".to_string(),
        date: Some("2025-10-01".to_string()),
        summary: "long weekend".to_string(),
        participants,
        capacity,
        tags: "beach,hiking".to_string(),
        itinerary: json!({}),
    }
}

fn test_application(username: &str) -> NewApplication {
    NewApplication {
        username: username.to_string(),
        reason: "always wanted to go".to_string(),
        travel_style: "slow".to_string(),
        contact_type: "email".to_string(),
        contact_value: format!("{username}@example.com"),
    }
}

// -----------------------------------------------------------------------
// Plan CRUD
// -----------------------------------------------------------------------

#[tokio::test]
async fn insert_and_get_plan() {
    let (pool, db_name) = create_test_db().await;

    let plan = plans::insert_plan(&pool, &test_plan("jeju", 1, 4))
        .await
        .expect("insert_plan should succeed");

    assert_eq!(plan.title, "jeju");
    assert_eq!(plan.participants, 1);
    assert_eq!(plan.capacity, 4);
    assert_eq!(plan.views, 0);

    let fetched = plans::get_plan(&pool, plan.id)
        .await
        .expect("get_plan should succeed")
        .expect("plan should exist");
    assert_eq!(fetched.id, plan.id);
    assert_eq!(fetched.destination, "Jeju");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn get_plan_returns_none_for_missing_id() {
    let (pool, db_name) = create_test_db().await;

    let result = plans::get_plan(&pool, Uuid::new_v4())
        .await
        .expect("get_plan should not error");
    assert!(result.is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn list_plans_newest_first() {
    let (pool, db_name) = create_test_db().await;

    plans::insert_plan(&pool, &test_plan("first", 1, 4))
        .await
        .unwrap();
    plans::insert_plan(&pool, &test_plan("second", 1, 4))
        .await
        .unwrap();

    let all = plans::list_plans(&pool).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].created_at >= all[1].created_at);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn fetch_plan_detail_increments_views() {
    let (pool, db_name) = create_test_db().await;

    let plan = plans::insert_plan(&pool, &test_plan("views", 1, 4))
        .await
        .unwrap();
    assert_eq!(plan.views, 0);

    let first = plans::fetch_plan_detail(&pool, plan.id)
        .await
        .unwrap()
        .expect("plan should exist");
    assert_eq!(first.views, 1);

    let second = plans::fetch_plan_detail(&pool, plan.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.views, 2);

    // Missing plan is None, not an error.
    let missing = plans::fetch_plan_detail(&pool, Uuid::new_v4()).await.unwrap();
    assert!(missing.is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn update_plan_overwrites_fields() {
    let (pool, db_name) = create_test_db().await;

    let plan = plans::insert_plan(&pool, &test_plan("before", 1, 4))
        .await
        .unwrap();

    let mut updated = test_plan("after", 2, 6);
    updated.destination = "Busan".to_string();
    let found = plans::update_plan(&pool, plan.id, &updated).await.unwrap();
    assert!(found);

    let fetched = plans::get_plan(&pool, plan.id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "after");
    assert_eq!(fetched.destination, "Busan");
    assert_eq!(fetched.capacity, 6);

    let missing = plans::update_plan(&pool, Uuid::new_v4(), &updated)
        .await
        .unwrap();
    assert!(!missing);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn delete_plan_cascades_to_children() {
    let (pool, db_name) = create_test_db().await;

    let plan = plans::insert_plan(&pool, &test_plan("doomed", 1, 4))
        .await
        .unwrap();

    let application = applications::upsert_application(&pool, plan.id, &test_application("mina"))
        .await
        .unwrap();
    participants::insert_from_application(&pool, &application)
        .await
        .unwrap();

    let deleted = plans::delete_plan(&pool, plan.id).await.unwrap();
    assert!(deleted);

    let apps = applications::list_applications(&pool, plan.id).await.unwrap();
    assert!(apps.is_empty());
    let members = participants::list_participants(&pool, plan.id).await.unwrap();
    assert!(members.is_empty());

    let missing = plans::delete_plan(&pool, plan.id).await.unwrap();
    assert!(!missing);

    pool.close().await;
    drop_test_db(&db_name).await;
}

// -----------------------------------------------------------------------
// Participant counter
// -----------------------------------------------------------------------

#[tokio::test]
async fn increment_stops_at_capacity() {
    let (pool, db_name) = create_test_db().await;

    let plan = plans::insert_plan(&pool, &test_plan("counter", 1, 3))
        .await
        .unwrap();

    assert!(plans::try_increment_participants(&pool, plan.id).await.unwrap());
    assert!(plans::try_increment_participants(&pool, plan.id).await.unwrap());
    // At capacity now: 3 of 3.
    assert!(!plans::try_increment_participants(&pool, plan.id).await.unwrap());

    let fetched = plans::get_plan(&pool, plan.id).await.unwrap().unwrap();
    assert_eq!(fetched.participants, 3);

    // Missing plan reports false rather than erroring.
    assert!(
        !plans::try_increment_participants(&pool, Uuid::new_v4())
            .await
            .unwrap()
    );

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn decrement_clamps_at_zero() {
    let (pool, db_name) = create_test_db().await;

    let plan = plans::insert_plan(&pool, &test_plan("clamp", 1, 4))
        .await
        .unwrap();

    plans::decrement_participants(&pool, plan.id).await.unwrap();
    plans::decrement_participants(&pool, plan.id).await.unwrap();
    plans::decrement_participants(&pool, plan.id).await.unwrap();

    let fetched = plans::get_plan(&pool, plan.id).await.unwrap().unwrap();
    assert_eq!(fetched.participants, 0);

    // Missing plan is a no-op.
    plans::decrement_participants(&pool, Uuid::new_v4())
        .await
        .unwrap();

    pool.close().await;
    drop_test_db(&db_name).await;
}

// -----------------------------------------------------------------------
// Applications
// -----------------------------------------------------------------------

#[tokio::test]
async fn upsert_application_is_idempotent_per_user() {
    let (pool, db_name) = create_test_db().await;

    let plan = plans::insert_plan(&pool, &test_plan("idem", 1, 4))
        .await
        .unwrap();

    let first = applications::upsert_application(&pool, plan.id, &test_application("mina"))
        .await
        .unwrap();

    let mut refreshed = test_application("mina");
    refreshed.reason = "changed my mind about the reason".to_string();
    let second = applications::upsert_application(&pool, plan.id, &refreshed)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.reason, "changed my mind about the reason");

    let all = applications::list_applications(&pool, plan.id).await.unwrap();
    assert_eq!(all.len(), 1);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn find_and_delete_application() {
    let (pool, db_name) = create_test_db().await;

    let plan = plans::insert_plan(&pool, &test_plan("apps", 1, 4))
        .await
        .unwrap();
    let application = applications::upsert_application(&pool, plan.id, &test_application("mina"))
        .await
        .unwrap();

    let found = applications::find_application(&pool, plan.id, "mina")
        .await
        .unwrap()
        .expect("application should exist");
    assert_eq!(found.id, application.id);

    let missing = applications::find_application(&pool, plan.id, "nobody")
        .await
        .unwrap();
    assert!(missing.is_none());

    applications::delete_application(&pool, application.id)
        .await
        .unwrap();
    let gone = applications::find_application(&pool, plan.id, "mina")
        .await
        .unwrap();
    assert!(gone.is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

// -----------------------------------------------------------------------
// Participants
// -----------------------------------------------------------------------

#[tokio::test]
async fn participant_snapshot_copies_application_fields() {
    let (pool, db_name) = create_test_db().await;

    let plan = plans::insert_plan(&pool, &test_plan("snapshot", 1, 4))
        .await
        .unwrap();
    let application = applications::upsert_application(&pool, plan.id, &test_application("mina"))
        .await
        .unwrap();

    let member = participants::insert_from_application(&pool, &application)
        .await
        .unwrap();

    assert_eq!(member.plan_id, plan.id);
    assert_eq!(member.username, "mina");
    assert_eq!(member.contact_type, "email");
    assert_eq!(member.contact_value, "mina@example.com");
    assert_eq!(member.travel_style, "slow");

    let found = participants::find_participant(&pool, plan.id, "mina")
        .await
        .unwrap()
        .expect("participant should exist");
    assert_eq!(found.id, member.id);

    participants::delete_participant(&pool, member.id).await.unwrap();
    let members = participants::list_participants(&pool, plan.id).await.unwrap();
    assert!(members.is_empty());

    pool.close().await;
    drop_test_db(&db_name).await;
}
