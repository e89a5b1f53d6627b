//! Unit tests for the chunked event writer

use chrono::{Days, NaiveDate, Utc};
use smacross::models::{EventType, SmaEvent};
use smacross::services::event_store::{EventStore, EventWriter};
use smacross::services::memory::MemoryStore;
use smacross::CrossoverError;

fn events(symbol: &str, count: u64) -> Vec<SmaEvent> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..count)
        .map(|i| SmaEvent {
            symbol: symbol.to_string(),
            event_date: start + Days::new(i),
            event_type: EventType::PriceCrossShortUp,
            short_window: 3,
            long_window: 5,
            close_price: 10.0 + i as f64,
            short_sma: Some(10.0),
            long_sma: None,
            created_at: Utc::now(),
        })
        .collect()
}

#[tokio::test]
async fn test_writer_splits_into_chunks() {
    let store = MemoryStore::new();
    let written = EventWriter::new(2)
        .write(&store, "SYM", &events("SYM", 5))
        .await
        .unwrap();

    assert_eq!(written, 5);
    let batches = store.upserted_batches().await;
    let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![2, 2, 1]);
    assert_eq!(store.events().await.len(), 5);
}

#[tokio::test]
async fn test_writer_with_nothing_to_write() {
    let store = MemoryStore::new();
    let written = EventWriter::new(500).write(&store, "SYM", &[]).await.unwrap();
    assert_eq!(written, 0);
    assert!(store.upserted_batches().await.is_empty());
}

#[tokio::test]
async fn test_failed_chunk_keeps_earlier_chunks() {
    let store = MemoryStore::new();
    store.fail_writes_for("SYM", 1).await;

    let result = EventWriter::new(2).write(&store, "SYM", &events("SYM", 5)).await;

    match result {
        Err(CrossoverError::Write { symbol, written, .. }) => {
            assert_eq!(symbol, "SYM");
            assert_eq!(written, 2);
        }
        other => panic!("expected write error, got {:?}", other),
    }
    assert_eq!(store.events().await.len(), 2);
}

#[tokio::test]
async fn test_upsert_overwrites_values_but_keeps_created_at() {
    let store = MemoryStore::new();
    let original = events("SYM", 1).remove(0);
    store.upsert(&[original.clone()]).await.unwrap();

    let mut recomputed = original.clone();
    recomputed.close_price = 99.0;
    recomputed.long_sma = Some(50.0);
    recomputed.created_at = original.created_at + chrono::Duration::days(1);
    store.upsert(&[recomputed]).await.unwrap();

    let stored = store.get_event(&original.key()).await.unwrap();
    assert_eq!(stored.close_price, 99.0);
    assert_eq!(stored.long_sma, Some(50.0));
    assert_eq!(stored.created_at, original.created_at);
    assert_eq!(store.events().await.len(), 1);
}

#[tokio::test]
async fn test_events_for_orders_by_date_then_type_name() {
    let store = MemoryStore::new();
    let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    let event = |date, event_type| SmaEvent {
        event_date: date,
        event_type,
        ..events("SYM", 1).remove(0)
    };
    store
        .upsert(&[
            event(day(6), EventType::DeathCross),
            event(day(5), EventType::PriceCrossShortUp),
            event(day(5), EventType::GoldenCross),
            event(day(5), EventType::PriceCrossLongUp),
        ])
        .await
        .unwrap();
    store.upsert(&events("OTHER", 3)).await.unwrap();

    let stored: Vec<(NaiveDate, &str)> = store
        .events_for("SYM", Some(day(5)), None)
        .await
        .unwrap()
        .iter()
        .map(|e| (e.event_date, e.event_type.as_str()))
        .collect();
    assert_eq!(
        stored,
        vec![
            (day(5), "golden_cross"),
            (day(5), "price_cross_long_up"),
            (day(5), "price_cross_short_up"),
            (day(6), "death_cross"),
        ]
    );

    let first_day = store.events_for("SYM", None, Some(day(5))).await.unwrap();
    assert_eq!(first_day.len(), 3);
}
