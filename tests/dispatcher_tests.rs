//! Routing of parsed stream events.

use std::sync::Arc;

use tweetrade::application::{parse_record, DropReason, MediaGate, Route, RuleDispatcher};
use tweetrade::domain::StreamEvent;
use tweetrade::port::ImageClassifier;
use tweetrade::testkit::classifier::StubClassifier;
use tweetrade::testkit::domain::{media_tweet_line, trade_book, tweet_line};

fn event(line: &str) -> StreamEvent {
    parse_record(line).expect("valid record")
}

fn dispatcher() -> RuleDispatcher {
    RuleDispatcher::new(Arc::new(trade_book(&["BTCUSDT", "DOGEUSDT"])))
}

fn gated(classifier: &StubClassifier) -> RuleDispatcher {
    dispatcher().with_media_gate(
        MediaGate::new("DOGEUSDT", "shiba_inu"),
        Arc::new(classifier.clone()) as Arc<dyn ImageClassifier>,
    )
}

#[tokio::test]
async fn symbol_tag_routes_to_trade() {
    let route = dispatcher()
        .route(&event(&tweet_line("1", "bitcoin!", "BTCUSDT")))
        .await;
    assert_eq!(route, Route::Trade("BTCUSDT".into()));
}

#[tokio::test]
async fn dev_only_never_trades() {
    let route = dispatcher()
        .route(&event(&tweet_line("2", "test", "dev-only")))
        .await;
    assert_eq!(route, Route::Drop(DropReason::DevOnly));
}

#[tokio::test]
async fn unknown_tag_is_dropped() {
    let route = dispatcher()
        .route(&event(&tweet_line("3", "eth", "ETHUSDT")))
        .await;
    assert_eq!(route, Route::Drop(DropReason::UnknownTag));
}

#[tokio::test]
async fn media_without_gate_is_dropped() {
    let route = dispatcher()
        .route(&event(&media_tweet_line("4", &["https://img/a.jpg"])))
        .await;
    assert_eq!(route, Route::Drop(DropReason::MediaGateDisabled));
}

#[tokio::test]
async fn first_qualifying_image_triggers_and_stops_scan() {
    let classifier = StubClassifier::new()
        .with("https://img/a.jpg", "tabby", 0.9)
        .with("https://img/b.jpg", "shiba_inu", 0.5)
        .with("https://img/c.jpg", "shiba_inu", 0.99);

    let route = gated(&classifier)
        .route(&event(&media_tweet_line(
            "5",
            &["https://img/a.jpg", "https://img/b.jpg", "https://img/c.jpg"],
        )))
        .await;

    assert_eq!(route, Route::Trade("DOGEUSDT".into()));
    assert_eq!(classifier.calls(), vec!["https://img/a.jpg", "https://img/b.jpg"]);
}

#[tokio::test]
async fn score_below_threshold_does_not_qualify() {
    let classifier = StubClassifier::new().with("https://img/a.jpg", "shiba_inu", 0.31);

    let route = gated(&classifier)
        .route(&event(&media_tweet_line("6", &["https://img/a.jpg"])))
        .await;

    assert_eq!(route, Route::Drop(DropReason::NoQualifyingImage));
}

#[tokio::test]
async fn classifier_failure_moves_on_to_next_image() {
    let classifier = StubClassifier::new()
        .failing("https://img/a.jpg", "model unavailable")
        .with("https://img/b.jpg", "shiba_inu", 0.32);

    let route = gated(&classifier)
        .route(&event(&media_tweet_line(
            "7",
            &["https://img/a.jpg", "https://img/b.jpg"],
        )))
        .await;

    assert_eq!(route, Route::Trade("DOGEUSDT".into()));
    assert_eq!(classifier.calls().len(), 2);
}

#[tokio::test]
async fn media_rule_without_photos_is_dropped() {
    let classifier = StubClassifier::new();

    let route = gated(&classifier)
        .route(&event(&media_tweet_line("8", &[])))
        .await;

    assert_eq!(route, Route::Drop(DropReason::NoQualifyingImage));
    assert!(classifier.calls().is_empty());
}
