//! Unit tests for the in-memory price reader

use chrono::NaiveDate;
use smacross::services::market_data::{ensure_ordered, PriceSeriesReader};
use smacross::services::memory::MemoryStore;
use smacross::models::PricePoint;
use smacross::CrossoverError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_read_excludes_null_closes_and_applies_floor() {
    let store = MemoryStore::new();
    store
        .insert_prices(
            "AAPL",
            vec![
                (date(2024, 1, 3), Some(11.0)),
                (date(2024, 1, 1), Some(10.0)),
                (date(2024, 1, 2), None),
                (date(2024, 1, 4), Some(12.0)),
            ],
        )
        .await;

    let all = store.read("AAPL", None).await.unwrap();
    let dates: Vec<NaiveDate> = all.iter().map(|p| p.trade_date).collect();
    assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 3), date(2024, 1, 4)]);

    let recent = store.read("AAPL", Some(date(2024, 1, 3))).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].close, 11.0);

    let requests = store.read_requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].since, Some(date(2024, 1, 3)));
}

#[tokio::test]
async fn test_symbols_sorted_and_unknown_symbol_empty() {
    let store = MemoryStore::new();
    store.insert_prices("MSFT", vec![(date(2024, 1, 1), Some(1.0))]).await;
    store.insert_prices("AAPL", vec![(date(2024, 1, 1), Some(1.0))]).await;

    assert_eq!(store.symbols().await.unwrap(), vec!["AAPL", "MSFT"]);
    assert!(store.read("TSLA", None).await.unwrap().is_empty());
}

#[test]
fn test_ensure_ordered_detects_repeated_dates() {
    let points = vec![
        PricePoint::new("AAPL", date(2024, 1, 1), 1.0),
        PricePoint::new("AAPL", date(2024, 1, 2), 1.0),
        PricePoint::new("AAPL", date(2024, 1, 2), 1.0),
    ];
    match ensure_ordered("AAPL", &points) {
        Err(CrossoverError::UnorderedSeries { symbol, date: at }) => {
            assert_eq!(symbol, "AAPL");
            assert_eq!(at, date(2024, 1, 2));
        }
        other => panic!("expected ordering error, got {:?}", other),
    }
    assert!(ensure_ordered("AAPL", &points[..2]).is_ok());
}
