mod common;

use anyhow::Result;
use chrono::{Duration, Utc};

use plantcare_api::resources::{NewReminder, Reminder, ReminderPatch};
use plantcare_api::store::{ResourceStore, StoreError};

fn watering(due_in: Duration) -> NewReminder {
    NewReminder {
        name: "Water the monstera".to_string(),
        notes: Some("soil should be dry first".to_string()),
        is_active: true,
        due_at: Utc::now() + due_in,
        due_day: vec![1, 3, 5],
        is_proxy: false,
        proxy: None,
    }
}

#[tokio::test]
async fn create_then_read_round_trips_payload() -> Result<()> {
    let Some(pool) = common::test_pool().await? else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return Ok(());
    };
    let store: ResourceStore<Reminder> = ResourceStore::new(pool);
    let owner = common::unique_owner("u1");

    let input = watering(Duration::hours(2));
    let id = store.create(&owner, &input).await?;
    let row = store.fetch(&owner, id).await?.expect("row should exist");

    assert_eq!(row.name, input.name);
    assert_eq!(row.notes, input.notes);
    assert_eq!(row.due_day, input.due_day);
    assert!(row.is_active);
    assert!(!row.is_proxy);
    assert!(row.proxy.is_none());
    // Timestamps are store-stamped, never caller-supplied
    assert!(row.updated_at >= row.created_at);
    Ok(())
}

#[tokio::test]
async fn update_can_toggle_and_reroute() -> Result<()> {
    let Some(pool) = common::test_pool().await? else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return Ok(());
    };
    let store: ResourceStore<Reminder> = ResourceStore::new(pool);
    let owner = common::unique_owner("u1");

    let id = store.create(&owner, &watering(Duration::hours(2))).await?;

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let patch = ReminderPatch {
        is_active: Some(false),
        is_proxy: Some(true),
        proxy: Some("+6582938737".to_string()),
        ..Default::default()
    };
    let row = store.update(&owner, id, &patch).await?.expect("updated row");

    assert!(!row.is_active);
    assert!(row.is_proxy);
    assert_eq!(row.proxy.as_deref(), Some("+6582938737"));
    assert_eq!(row.name, "Water the monstera");
    assert!(row.updated_at > row.created_at);
    Ok(())
}

#[tokio::test]
async fn stranger_updates_are_forbidden() -> Result<()> {
    let Some(pool) = common::test_pool().await? else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return Ok(());
    };
    let store: ResourceStore<Reminder> = ResourceStore::new(pool);
    let owner = common::unique_owner("u1");
    let stranger = common::unique_owner("u2");

    let id = store.create(&owner, &watering(Duration::hours(2))).await?;
    let patch = ReminderPatch {
        name: Some("mine now".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        store.update(&stranger, id, &patch).await,
        Err(StoreError::Forbidden)
    ));

    // The row is untouched
    let row = store.fetch(&owner, id).await?.unwrap();
    assert_eq!(row.name, "Water the monstera");
    Ok(())
}

#[tokio::test]
async fn due_feed_only_includes_active_rows_inside_the_window() -> Result<()> {
    let Some(pool) = common::test_pool().await? else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return Ok(());
    };
    let store: ResourceStore<Reminder> = ResourceStore::new(pool);
    let owner = common::unique_owner("u1");

    let soon = store.create(&owner, &watering(Duration::seconds(30))).await?;
    let late = store.create(&owner, &watering(Duration::hours(6))).await?;

    let mut paused_input = watering(Duration::seconds(30));
    paused_input.is_active = false;
    let paused = store.create(&owner, &paused_input).await?;

    let due = store.due_within(120).await?;
    let ids: Vec<_> = due.iter().map(|r| r.id).collect();
    assert!(ids.contains(&soon));
    assert!(!ids.contains(&late));
    assert!(!ids.contains(&paused));
    Ok(())
}

#[tokio::test]
async fn delete_returns_the_id_once() -> Result<()> {
    let Some(pool) = common::test_pool().await? else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return Ok(());
    };
    let store: ResourceStore<Reminder> = ResourceStore::new(pool);
    let owner = common::unique_owner("u1");

    let id = store.create(&owner, &watering(Duration::hours(1))).await?;
    assert_eq!(store.delete(&owner, id).await?, id);
    assert!(store.list(&owner).await?.is_empty());

    let err = store.delete(&owner, id).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Forbidden | StoreError::NotFound
    ));
    Ok(())
}
