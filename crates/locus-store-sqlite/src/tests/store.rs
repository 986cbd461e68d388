use chrono::Utc;
use locus_core::{
  lifecycle::AuditActor,
  location::{LocationType, NewLocation},
  store::LocationStore,
};

use super::{deactivate_user, location, store};
use crate::Error;

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_list_active_users() {
  let s = store().await;
  let alice = s.add_user("alice").await.unwrap();
  let bob = s.add_user("bob").await.unwrap();
  deactivate_user(&s, bob.user_id).await;

  let users = s.list_active_users().await.unwrap();
  assert_eq!(users.len(), 1);
  assert_eq!(users[0].user_id, alice.user_id);
  assert!(users[0].is_active());
}

#[tokio::test]
async fn find_user_by_login_skips_inactive() {
  let s = store().await;
  let old = s.add_user("Admin").await.unwrap();
  deactivate_user(&s, old.user_id).await;
  assert!(s.find_active_user_by_login("Admin").await.unwrap().is_none());

  let current = s.add_user("Admin").await.unwrap();
  let found = s.find_active_user_by_login("Admin").await.unwrap().unwrap();
  assert_eq!(found.user_id, current.user_id);
}

#[tokio::test]
async fn find_user_by_login_is_exact() {
  let s = store().await;
  s.add_user("Admin").await.unwrap();
  assert!(s.find_active_user_by_login("admin").await.unwrap().is_none());
}

// ─── Locations ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_find_by_natural_key() {
  let s = store().await;
  let region = location(&s, LocationType::Region, "R01", "Central", None).await;
  let district =
    location(&s, LocationType::District, "D01", "North", Some(&region)).await;

  assert_eq!(region.parent_id, None);
  assert_eq!(region.audit, AuditActor::System);
  assert_eq!(district.parent_id, Some(region.location_id));

  let found = s
    .find_active_location(LocationType::Region, "R01", None)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found, region);

  let found = s
    .find_active_location(LocationType::District, "D01", Some(region.location_id))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.location_id, district.location_id);

  // Same code under a different parent is a different key.
  assert!(
    s.find_active_location(LocationType::District, "D01", None)
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn find_by_code_ignores_type() {
  let s = store().await;
  let region = location(&s, LocationType::Region, "X1", "Central", None).await;

  let found = s.find_active_location_by_code("X1").await.unwrap().unwrap();
  assert_eq!(found.location_id, region.location_id);
  assert!(s.find_active_location_by_code("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn active_location_ids_filters_by_type() {
  let s = store().await;
  let region = location(&s, LocationType::Region, "R01", "Central", None).await;
  let d1 = location(&s, LocationType::District, "D01", "North", Some(&region)).await;
  let d2 = location(&s, LocationType::District, "D02", "South", Some(&region)).await;

  let ids = s.active_location_ids(LocationType::District).await.unwrap();
  assert_eq!(ids, vec![d1.location_id, d2.location_id]);

  let ids = s.active_location_ids(LocationType::Village).await.unwrap();
  assert!(ids.is_empty());
}

#[tokio::test]
async fn duplicate_active_key_is_rejected() {
  let s = store().await;
  location(&s, LocationType::Region, "R01", "Central", None).await;

  let err = s
    .create_location(NewLocation::new(LocationType::Region, "R01", "Other", None))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn replace_keeps_id_and_archives_history() {
  let s = store().await;
  let region = location(&s, LocationType::Region, "R01", "Central", None).await;

  let replaced = s
    .replace_location(
      region.location_id,
      NewLocation::new(LocationType::Region, "R01", "Middle", None),
    )
    .await
    .unwrap();
  assert_eq!(replaced.location_id, region.location_id);
  assert_eq!(replaced.name, "Middle");
  assert!(replaced.is_active());
  assert_eq!(replaced.legacy_id, None);

  let active = s.list_locations(false).await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].name, "Middle");

  let all = s.list_locations(true).await.unwrap();
  assert_eq!(all.len(), 2);
  let history = all.iter().find(|l| !l.is_active()).unwrap();
  assert_eq!(history.name, "Central");
  assert_eq!(history.legacy_id, Some(region.location_id));
  assert!(history.validity.to.is_some());
}

#[tokio::test]
async fn replace_missing_location_fails() {
  let s = store().await;
  let err = s
    .replace_location(99, NewLocation::new(LocationType::Region, "R01", "X", None))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::LocationNotFound(99)));
}

#[tokio::test]
async fn replace_history_row_fails_and_writes_nothing() {
  let s = store().await;
  let region = location(&s, LocationType::Region, "R01", "Central", None).await;
  s.replace_location(
    region.location_id,
    NewLocation::new(LocationType::Region, "R01", "Middle", None),
  )
  .await
  .unwrap();

  let all = s.list_locations(true).await.unwrap();
  let history = all.iter().find(|l| !l.is_active()).unwrap();

  let err = s
    .replace_location(
      history.location_id,
      NewLocation::new(LocationType::Region, "R01", "Again", None),
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::AlreadyArchived(id) if id == history.location_id));
  assert_eq!(s.list_locations(true).await.unwrap().len(), 2);
}

#[tokio::test]
async fn children_stay_attached_after_parent_replacement() {
  let s = store().await;
  let region = location(&s, LocationType::Region, "R01", "Central", None).await;
  let district =
    location(&s, LocationType::District, "D01", "North", Some(&region)).await;

  s.replace_location(
    region.location_id,
    NewLocation::new(LocationType::Region, "R01", "Middle", None),
  )
  .await
  .unwrap();

  let parent = s.find_active_location_by_code("R01").await.unwrap().unwrap();
  assert_eq!(district.parent_id, Some(parent.location_id));
}

// ─── Grants ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn grant_districts_writes_all_rows() {
  let s = store().await;
  let user = s.add_user("alice").await.unwrap();
  let region = location(&s, LocationType::Region, "R01", "Central", None).await;
  let d1 = location(&s, LocationType::District, "D01", "North", Some(&region)).await;
  let d2 = location(&s, LocationType::District, "D02", "South", Some(&region)).await;

  let now = Utc::now();
  let granted = s
    .grant_districts(
      user.user_id,
      &[d1.location_id, d2.location_id],
      AuditActor::System,
      now,
    )
    .await
    .unwrap();
  assert_eq!(granted.len(), 2);
  assert!(granted.iter().all(|g| g.audit == AuditActor::System));
  assert!(granted.iter().all(|g| g.validity.from == now));

  let ids = s.active_user_district_ids(user.user_id).await.unwrap();
  assert_eq!(ids, vec![d1.location_id, d2.location_id]);

  let listed = s.list_user_districts(user.user_id).await.unwrap();
  assert_eq!(listed.len(), 2);
  assert_eq!(listed[0].audit, AuditActor::System);
}

#[tokio::test]
async fn grant_nothing_is_a_no_op() {
  let s = store().await;
  let user = s.add_user("alice").await.unwrap();
  let granted = s
    .grant_districts(user.user_id, &[], AuditActor::System, Utc::now())
    .await
    .unwrap();
  assert!(granted.is_empty());
}

#[tokio::test]
async fn grant_batch_is_atomic() {
  let s = store().await;
  let user = s.add_user("alice").await.unwrap();
  let region = location(&s, LocationType::Region, "R01", "Central", None).await;
  let district =
    location(&s, LocationType::District, "D01", "North", Some(&region)).await;

  // The second id violates the foreign key, so the first must roll back.
  let result = s
    .grant_districts(
      user.user_id,
      &[district.location_id, 9_999],
      AuditActor::System,
      Utc::now(),
    )
    .await;
  assert!(result.is_err());
  assert!(s.active_user_district_ids(user.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn closed_grants_are_not_active() {
  let s = store().await;
  let user = s.add_user("alice").await.unwrap();
  let region = location(&s, LocationType::Region, "R01", "Central", None).await;
  let district =
    location(&s, LocationType::District, "D01", "North", Some(&region)).await;
  s.grant_districts(
    user.user_id,
    &[district.location_id],
    AuditActor::User(user.user_id),
    Utc::now(),
  )
  .await
  .unwrap();

  s.conn
    .call(|conn| {
      conn.execute("UPDATE user_districts SET validity_to = validity_from", [])?;
      Ok(())
    })
    .await
    .unwrap();

  assert!(s.active_user_district_ids(user.user_id).await.unwrap().is_empty());
  assert!(s.list_user_districts(user.user_id).await.unwrap().is_empty());
}
