//! Behavior-driven tests for the pattern matcher.
//!
//! These tests verify HOW the matcher handles candidates, failures, and
//! degenerate inputs, using an in-memory fake store.

use std::sync::Arc;

use pairscan_core::{MatchError, MatchQuery, PatternMatcher, StoreErrorKind};
use pairscan_tests::{candles_from_closes, pair, FakeStore};

fn matcher(store: FakeStore) -> PatternMatcher {
    PatternMatcher::new(Arc::new(store))
}

fn rising_query(num_candles: usize) -> MatchQuery {
    MatchQuery::new(pair("EURUSD"), candles_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]))
        .expect("query")
        .with_num_candles(num_candles)
        .expect("query")
}

#[tokio::test]
async fn when_a_candidate_has_the_same_shape_it_ranks_first_with_similarity_one() {
    // Given: a candidate whose closes are the source scaled by 10
    let store = FakeStore::new()
        .with_series("EURUSD", &[1.0, 2.0, 3.0, 4.0, 5.0])
        .with_series("GBPJPY", &[10.0, 20.0, 30.0, 40.0, 50.0])
        .with_series("NZDCAD", &[5.0, 4.0, 3.0, 2.0, 1.0]);

    // When: the matcher runs
    let matches = matcher(store)
        .find_similar_patterns(&rising_query(5))
        .await
        .expect("matches");

    // Then: the scaled twin scores 1.0 and the mirrored series scores -1.0
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].pair.as_str(), "GBPJPY");
    assert!((matches[0].similarity - 1.0).abs() < 1e-9);
    assert_eq!(matches[1].pair.as_str(), "NZDCAD");
    assert!((matches[1].similarity + 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn when_more_candidates_qualify_than_top_n_only_top_n_are_returned() {
    let store = FakeStore::new()
        .with_series("EURUSD", &[1.0, 2.0, 3.0, 4.0, 5.0])
        .with_series("GBPJPY", &[1.0, 2.0, 3.0, 4.0, 5.0])
        .with_series("NZDCAD", &[2.0, 3.0, 4.0, 5.0, 6.0])
        .with_series("AUDCHF", &[1.0, 3.0, 2.0, 4.0, 5.0])
        .with_series("USDJPY", &[5.0, 4.0, 3.0, 2.0, 1.0]);

    let query = rising_query(5).with_top_n(2).expect("query");
    let matches = matcher(store)
        .find_similar_patterns(&query)
        .await
        .expect("matches");

    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m.pair.as_str() != "EURUSD"));
}

#[tokio::test]
async fn when_fewer_candidates_qualify_than_top_n_all_of_them_are_returned() {
    // Given: only one candidate has enough history for a 5-candle window
    let store = FakeStore::new()
        .with_series("EURUSD", &[1.0, 2.0, 3.0, 4.0, 5.0])
        .with_series("GBPJPY", &[1.0, 2.0, 3.0, 4.0, 5.0])
        .with_series("NZDCAD", &[1.0, 2.0]);

    let matches = matcher(store)
        .find_similar_patterns(&rising_query(5))
        .await
        .expect("matches");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].pair.as_str(), "GBPJPY");
}

#[tokio::test]
async fn results_are_sorted_by_similarity_descending() {
    let store = FakeStore::new()
        .with_series("EURUSD", &[1.0, 2.0, 3.0, 4.0, 5.0])
        .with_series("USDJPY", &[5.0, 4.0, 3.0, 2.0, 1.0])
        .with_series("GBPJPY", &[1.0, 2.0, 3.0, 4.0, 5.0])
        .with_series("AUDCHF", &[1.0, 3.0, 2.0, 5.0, 4.0]);

    let matches = matcher(store)
        .find_similar_patterns(&rising_query(5))
        .await
        .expect("matches");

    assert_eq!(matches.len(), 3);
    for window in matches.windows(2) {
        assert!(
            window[0].similarity >= window[1].similarity,
            "similarity must be non-increasing"
        );
    }
}

#[tokio::test]
async fn when_the_source_is_shorter_than_the_window_all_of_it_is_used() {
    // Given: a 20-candle request but only 3 source candles
    let store = FakeStore::new()
        .with_series("EURUSD", &[1.0, 2.0, 3.0])
        .with_series("GBPJPY", &[2.0, 4.0, 6.0]);

    let query = MatchQuery::new(pair("EURUSD"), candles_from_closes(&[1.0, 2.0, 3.0]))
        .expect("query")
        .with_num_candles(20)
        .expect("query");

    // When/Then: the window clamps to 3 candles and the candidate still scores
    let matches = matcher(store)
        .find_similar_patterns(&query)
        .await
        .expect("matches");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].candles.len(), 3);
    assert!((matches[0].similarity - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn when_one_candidate_fails_to_fetch_the_rest_are_still_scored() {
    let store = FakeStore::new()
        .with_series("EURUSD", &[1.0, 2.0, 3.0, 4.0, 5.0])
        .with_failing_pair("GBPJPY")
        .with_series("NZDCAD", &[1.0, 2.0, 3.0, 4.0, 5.0]);

    let matches = matcher(store)
        .find_similar_patterns(&rising_query(5))
        .await
        .expect("matches");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].pair.as_str(), "NZDCAD");
}

#[tokio::test]
async fn when_enumeration_fails_the_whole_request_fails() {
    let store = FakeStore::new()
        .with_series("EURUSD", &[1.0, 2.0, 3.0, 4.0, 5.0])
        .with_failing_enumeration();

    let error = matcher(store)
        .find_similar_patterns(&rising_query(5))
        .await
        .expect_err("must fail");

    match error {
        MatchError::Store(store_error) => {
            assert_eq!(store_error.kind(), StoreErrorKind::Unavailable);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn a_flat_source_window_scores_every_candidate_zero() {
    // Given: a source with no discernible shape
    let store = FakeStore::new()
        .with_series("EURUSD", &[1.07, 1.07, 1.07, 1.07, 1.07])
        .with_series("GBPJPY", &[1.0, 2.0, 3.0, 4.0, 5.0]);

    let query = MatchQuery::new(
        pair("EURUSD"),
        candles_from_closes(&[1.07, 1.07, 1.07, 1.07, 1.07]),
    )
    .expect("query")
    .with_num_candles(5)
    .expect("query");

    let matches = matcher(store)
        .find_similar_patterns(&query)
        .await
        .expect("matches");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].similarity, 0.0);
}

#[tokio::test]
async fn equal_scores_keep_store_enumeration_order() {
    // Given: two candidates with identical candle data, enumerated
    // GBPJPY before NZDCAD
    let store = FakeStore::new()
        .with_series("EURUSD", &[1.0, 2.0, 3.0, 4.0, 5.0])
        .with_series("GBPJPY", &[2.0, 4.0, 6.0, 8.0, 10.0])
        .with_series("NZDCAD", &[2.0, 4.0, 6.0, 8.0, 10.0]);

    let matches = matcher(store)
        .find_similar_patterns(&rising_query(5))
        .await
        .expect("matches");

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].similarity, matches[1].similarity);
    assert_eq!(matches[0].pair.as_str(), "GBPJPY");
    assert_eq!(matches[1].pair.as_str(), "NZDCAD");
}

#[tokio::test]
async fn matched_candles_are_the_raw_window_not_the_normalized_pattern() {
    let store = FakeStore::new()
        .with_series("EURUSD", &[1.0, 2.0, 3.0, 4.0, 5.0])
        .with_series("GBPJPY", &[10.0, 20.0, 30.0, 40.0, 50.0]);

    let matches = matcher(store)
        .find_similar_patterns(&rising_query(5))
        .await
        .expect("matches");

    let closes: Vec<f64> = matches[0].candles.iter().map(|c| c.close).collect();
    assert_eq!(closes, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
}
