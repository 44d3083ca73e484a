//! Integration tests for room availability accounting
//!
//! These tests exercise the store layer directly: counter maintenance on
//! room creation/deletion, the atomic reserve/release guards, and the
//! behavior under concurrent reservation attempts.

use catalog_service::db::CatalogDb;
use catalog_service::error::AppError;
use catalog_service::models::{Hotel, Room};
use chrono::Utc;
use sqlx::types::Json;
use tempfile::TempDir;

/// Fresh file-backed database per test (the TempDir keeps the file alive)
async fn test_db() -> (TempDir, CatalogDb) {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite:{}/catalog.db", dir.path().display());
    let db = CatalogDb::new(&url).await.expect("db init");
    (dir, db)
}

fn sample_hotel(name: &str) -> Hotel {
    let now = Utc::now();
    Hotel {
        id: Hotel::generate_id(),
        name: name.to_string(),
        description: "Test hotel".to_string(),
        address: "1 Harbor Street".to_string(),
        city: "Freetown".to_string(),
        stars: 4,
        amenities: Json(vec!["Pool".to_string()]),
        images: Json(vec![]),
        owner_id: "0191d1c0-0000-7000-8000-000000000001".to_string(),
        room_count: 0,
        available_room_count: 0,
        created_at: now,
        updated_at: now,
    }
}

fn sample_room(hotel_id: &str, name: &str) -> Room {
    let now = Utc::now();
    Room {
        id: Room::generate_id(),
        hotel_id: hotel_id.to_string(),
        name: name.to_string(),
        description: "Test room".to_string(),
        price: 120.0,
        capacity: 2,
        amenities: Json(vec!["WiFi".to_string()]),
        images: Json(vec![]),
        is_available: true,
        created_at: now,
        updated_at: now,
    }
}

async fn counters(db: &CatalogDb, hotel_id: &str) -> (i64, i64) {
    let hotel = db
        .get_hotel(hotel_id)
        .await
        .expect("get hotel")
        .expect("hotel exists");
    (hotel.room_count, hotel.available_room_count)
}

#[tokio::test]
async fn adding_a_room_increments_both_counters() {
    let (_dir, db) = test_db().await;
    let hotel = sample_hotel("Counter Inn");
    db.create_hotel(&hotel).await.expect("create hotel");

    let room = sample_room(&hotel.id, "101");
    db.create_room(&room).await.expect("create room");

    assert_eq!(counters(&db, &hotel.id).await, (1, 1));
}

#[tokio::test]
async fn add_then_delete_room_round_trips_counters() {
    let (_dir, db) = test_db().await;
    let hotel = sample_hotel("Round Trip Hotel");
    db.create_hotel(&hotel).await.expect("create hotel");
    let before = counters(&db, &hotel.id).await;

    let room = sample_room(&hotel.id, "101");
    db.create_room(&room).await.expect("create room");
    db.delete_room(&room.id).await.expect("delete room");

    assert_eq!(counters(&db, &hotel.id).await, before);
}

#[tokio::test]
async fn deleting_a_reserved_room_leaves_available_count_alone() {
    let (_dir, db) = test_db().await;
    let hotel = sample_hotel("Reserved Delete Hotel");
    db.create_hotel(&hotel).await.expect("create hotel");

    let keeper = sample_room(&hotel.id, "101");
    let doomed = sample_room(&hotel.id, "102");
    db.create_room(&keeper).await.expect("create room");
    db.create_room(&doomed).await.expect("create room");
    assert_eq!(counters(&db, &hotel.id).await, (2, 2));

    db.reserve_room(&doomed.id).await.expect("reserve");
    assert_eq!(counters(&db, &hotel.id).await, (2, 1));

    // The deleted room was unavailable, so only room_count moves.
    db.delete_room(&doomed.id).await.expect("delete");
    assert_eq!(counters(&db, &hotel.id).await, (1, 1));
}

#[tokio::test]
async fn reserve_flips_flag_and_rejects_second_attempt() {
    let (_dir, db) = test_db().await;
    let hotel = sample_hotel("Reservation Hotel");
    db.create_hotel(&hotel).await.expect("create hotel");
    let room = sample_room(&hotel.id, "101");
    db.create_room(&room).await.expect("create room");

    let reserved = db.reserve_room(&room.id).await.expect("first reserve");
    assert!(!reserved.is_available);
    assert_eq!(counters(&db, &hotel.id).await, (1, 0));

    let second = db.reserve_room(&room.id).await;
    assert!(matches!(second, Err(AppError::RoomUnavailable(_))));
    // No partial state from the failed attempt.
    assert_eq!(counters(&db, &hotel.id).await, (1, 0));
}

#[tokio::test]
async fn release_restores_availability_exactly_once() {
    let (_dir, db) = test_db().await;
    let hotel = sample_hotel("Release Hotel");
    db.create_hotel(&hotel).await.expect("create hotel");
    let room = sample_room(&hotel.id, "101");
    db.create_room(&room).await.expect("create room");

    db.reserve_room(&room.id).await.expect("reserve");
    let released = db.release_room(&room.id).await.expect("release");
    assert!(released.is_available);
    assert_eq!(counters(&db, &hotel.id).await, (1, 1));

    // Releasing an already-available room is an error, not a double
    // increment.
    let again = db.release_room(&room.id).await;
    assert!(matches!(again, Err(AppError::RoomAlreadyAvailable(_))));
    assert_eq!(counters(&db, &hotel.id).await, (1, 1));
}

#[tokio::test]
async fn deleting_an_empty_hotel_succeeds() {
    let (_dir, db) = test_db().await;
    let hotel = sample_hotel("Empty Delete Hotel");
    db.create_hotel(&hotel).await.expect("create hotel");

    db.delete_hotel(&hotel.id).await.expect("delete hotel");
    assert!(db.get_hotel(&hotel.id).await.expect("get hotel").is_none());

    let again = db.delete_hotel(&hotel.id).await;
    assert!(matches!(again, Err(AppError::HotelNotFound(_))));
}

#[tokio::test]
async fn deleting_a_hotel_with_rooms_leaves_them_orphaned() {
    let (_dir, db) = test_db().await;
    let hotel = sample_hotel("Orphan Hotel");
    db.create_hotel(&hotel).await.expect("create hotel");
    let room = sample_room(&hotel.id, "101");
    db.create_room(&room).await.expect("create room");

    db.delete_hotel(&hotel.id).await.expect("delete hotel");
    assert!(db.get_hotel(&hotel.id).await.expect("get hotel").is_none());

    // Rooms are not cascaded; the record stays behind.
    let orphan = db.get_room(&room.id).await.expect("get room");
    assert!(orphan.is_some());
}

#[tokio::test]
async fn duplicate_room_in_same_hotel_is_a_conflict() {
    let (_dir, db) = test_db().await;
    let hotel = sample_hotel("Duplicate Room Hotel");
    db.create_hotel(&hotel).await.expect("create hotel");
    db.create_room(&sample_room(&hotel.id, "101"))
        .await
        .expect("first room");

    let result = db.create_room(&sample_room(&hotel.id, "101")).await;
    assert!(matches!(result, Err(AppError::RoomAlreadyExists(_))));
    // The failed attempt must not move the counters.
    assert_eq!(counters(&db, &hotel.id).await, (1, 1));

    // Same name with a different description is a different room.
    let mut variant = sample_room(&hotel.id, "101");
    variant.description = "Corner room".to_string();
    db.create_room(&variant).await.expect("variant room");
    assert_eq!(counters(&db, &hotel.id).await, (2, 2));
}

#[tokio::test]
async fn concurrent_reserve_and_delete_stay_consistent() {
    let (_dir, db) = test_db().await;
    let hotel = sample_hotel("Reserve Delete Race Hotel");
    db.create_hotel(&hotel).await.expect("create hotel");

    for i in 0..10 {
        let room = sample_room(&hotel.id, &format!("30{}", i));
        db.create_room(&room).await.expect("create room");

        let (reserved, deleted) = {
            let db_a = db.clone();
            let db_b = db.clone();
            let room_a = room.id.clone();
            let room_b = room.id.clone();
            tokio::join!(
                tokio::spawn(async move { db_a.reserve_room(&room_a).await }),
                tokio::spawn(async move { db_b.delete_room(&room_b).await }),
            )
        };
        let reserved = reserved.expect("reserve task");
        let deleted = deleted.expect("delete task");

        deleted.expect("delete always finds the room");
        match reserved {
            // The reservation committed; the returned row carries the
            // reserved state even though the room is gone by now.
            Ok(room) => assert!(!room.is_available),
            // The delete won the race before the flag flip.
            Err(AppError::RoomNotFound(_)) => {}
            Err(other) => panic!("unexpected reserve outcome: {}", other),
        }
        assert_eq!(counters(&db, &hotel.id).await, (0, 0));
    }
}

#[tokio::test]
async fn reserving_a_missing_room_is_not_found() {
    let (_dir, db) = test_db().await;
    let result = db.reserve_room(&Room::generate_id()).await;
    assert!(matches!(result, Err(AppError::RoomNotFound(_))));
}

#[tokio::test]
async fn duplicate_hotel_name_is_a_conflict() {
    let (_dir, db) = test_db().await;
    db.create_hotel(&sample_hotel("Twin Hotel"))
        .await
        .expect("first create");

    let result = db.create_hotel(&sample_hotel("Twin Hotel")).await;
    assert!(matches!(result, Err(AppError::HotelAlreadyExists(_))));
}

#[tokio::test]
async fn adding_a_room_to_a_missing_hotel_fails_without_orphans() {
    let (_dir, db) = test_db().await;
    let room = sample_room(&Hotel::generate_id(), "101");

    let result = db.create_room(&room).await;
    assert!(matches!(result, Err(AppError::HotelNotFound(_))));
    assert!(db.get_room(&room.id).await.expect("get room").is_none());
}

#[tokio::test]
async fn concurrent_reservations_only_one_wins() {
    let (_dir, db) = test_db().await;
    let hotel = sample_hotel("Race Hotel");
    db.create_hotel(&hotel).await.expect("create hotel");
    let room = sample_room(&hotel.id, "101");
    db.create_room(&room).await.expect("create room");

    let (a, b) = {
        let db_a = db.clone();
        let db_b = db.clone();
        let room_a = room.id.clone();
        let room_b = room.id.clone();
        tokio::join!(
            tokio::spawn(async move { db_a.reserve_room(&room_a).await }),
            tokio::spawn(async move { db_b.reserve_room(&room_b).await }),
        )
    };
    let a = a.expect("task a");
    let b = b.expect("task b");

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one reservation must win");
    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(loser, Err(AppError::RoomUnavailable(_))));
    assert_eq!(counters(&db, &hotel.id).await, (1, 0));
}

#[tokio::test]
async fn catalog_lifecycle_scenario() {
    // Hotel with five rooms: (5,5) -> add one (6,6) -> reserve it (6,5)
    // -> delete it (5,5).
    let (_dir, db) = test_db().await;
    let hotel = sample_hotel("Scenario Hotel");
    db.create_hotel(&hotel).await.expect("create hotel");

    for i in 0..5 {
        db.create_room(&sample_room(&hotel.id, &format!("10{}", i)))
            .await
            .expect("seed room");
    }
    assert_eq!(counters(&db, &hotel.id).await, (5, 5));

    let extra = sample_room(&hotel.id, "201");
    db.create_room(&extra).await.expect("create extra room");
    assert_eq!(counters(&db, &hotel.id).await, (6, 6));

    db.reserve_room(&extra.id).await.expect("reserve");
    assert_eq!(counters(&db, &hotel.id).await, (6, 5));
    let room = db
        .get_room(&extra.id)
        .await
        .expect("get room")
        .expect("room exists");
    assert!(!room.is_available);

    db.delete_room(&extra.id).await.expect("delete");
    assert_eq!(counters(&db, &hotel.id).await, (5, 5));
}
