//! Order pipeline behaviour against a scripted exchange.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use tweetrade::application::{LegOutcome, OrderPipeline, PipelineOutcome};
use tweetrade::domain::{
    LimitOrder, OrderSide, OrderStatus, OrderType, Position, StopOrder, TrailingStopOrder,
};
use tweetrade::error::ExchangeError;
use tweetrade::port::{Event, Exchange, TradeFailedEvent, TradeStage};
use tweetrade::testkit::domain::{flat_position, order, trade_book};
use tweetrade::testkit::exchange::{ExchangeCall, MockExchange};
use tweetrade::testkit::notifier::RecordingNotifier;

const SYMBOL: &str = "BTCUSDT";

fn pipeline(exchange: &Arc<MockExchange>, notifier: &RecordingNotifier) -> OrderPipeline {
    OrderPipeline::new(
        Arc::clone(exchange) as Arc<dyn Exchange>,
        Arc::new(notifier.clone()),
        Arc::new(trade_book(&[SYMBOL])),
        dec!(1000),
    )
}

fn api_error(code: i64, message: &str) -> ExchangeError {
    ExchangeError::Api {
        status: 400,
        code,
        message: message.to_string(),
    }
}

#[tokio::test]
async fn protected_entry_places_both_legs_from_fill_price() {
    let exchange = Arc::new(MockExchange::new());
    let notifier = RecordingNotifier::new();

    let outcome = pipeline(&exchange, &notifier).run(SYMBOL).await;

    let PipelineOutcome::Entered(report) = outcome else {
        panic!("expected entry, got {outcome:?}");
    };
    assert!(report.is_protected());
    assert_eq!(report.quantity, dec!(100));
    assert_eq!(report.fill_price, dec!(100));

    assert_eq!(
        exchange.order_calls(),
        vec![
            ExchangeCall::PlaceLimit(LimitOrder {
                symbol: SYMBOL.into(),
                side: OrderSide::Buy,
                quantity: dec!(100),
                price: dec!(100.1),
            }),
            ExchangeCall::PlaceStop(StopOrder {
                symbol: SYMBOL.into(),
                side: OrderSide::Sell,
                quantity: dec!(100),
                stop_price: dec!(98),
            }),
            ExchangeCall::PlaceTrailingStop(TrailingStopOrder {
                symbol: SYMBOL.into(),
                side: OrderSide::Sell,
                quantity: dec!(100),
                activation_price: dec!(105),
                callback_rate: dec!(1.0),
            }),
        ]
    );

    assert_eq!(notifier.opened_count(), 1);
    assert!(notifier.failures().is_empty());
}

#[tokio::test]
async fn existing_position_submits_nothing() {
    let exchange = Arc::new(MockExchange::new().with_position(Ok(Position {
        symbol: SYMBOL.into(),
        leverage: 10,
        position_amt: dec!(-0.5),
        mark_price: dec!(100),
    })));
    let notifier = RecordingNotifier::new();

    let outcome = pipeline(&exchange, &notifier).run(SYMBOL).await;

    assert_eq!(outcome, PipelineOutcome::AlreadyInPosition);
    assert!(exchange.order_calls().is_empty());
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn leverage_is_only_changed_when_it_differs() {
    let exchange = Arc::new(MockExchange::new());
    let notifier = RecordingNotifier::new();
    pipeline(&exchange, &notifier).run(SYMBOL).await;
    assert!(!exchange
        .calls()
        .iter()
        .any(|call| matches!(call, ExchangeCall::SetLeverage { .. })));

    let exchange = Arc::new(MockExchange::new().with_position(Ok(flat_position(SYMBOL, 20, dec!(100)))));
    pipeline(&exchange, &notifier).run(SYMBOL).await;
    assert!(exchange.calls().contains(&ExchangeCall::SetLeverage {
        symbol: SYMBOL.into(),
        leverage: 10,
    }));
}

#[tokio::test]
async fn unfilled_entry_places_no_protective_legs() {
    let exchange = Arc::new(MockExchange::new().with_fetched(Ok(order(
        1,
        SYMBOL,
        OrderType::Limit,
        OrderStatus::parse("EXPIRED"),
        Decimal::ZERO,
    ))));
    let notifier = RecordingNotifier::new();

    let outcome = pipeline(&exchange, &notifier).run(SYMBOL).await;

    assert!(matches!(
        outcome,
        PipelineOutcome::Aborted {
            stage: TradeStage::Fill,
            ..
        }
    ));
    assert_eq!(exchange.order_calls().len(), 1);
    assert_eq!(notifier.opened_count(), 0);

    let failures = notifier.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].stage, TradeStage::Fill);
    assert!(failures[0].reason.contains("EXPIRED"));
}

#[tokio::test]
async fn rejected_entry_is_reported_and_not_retried() {
    let exchange = Arc::new(
        MockExchange::new().with_limit(Err(api_error(-2019, "Margin is insufficient."))),
    );
    let notifier = RecordingNotifier::new();

    let outcome = pipeline(&exchange, &notifier).run(SYMBOL).await;

    assert!(matches!(
        outcome,
        PipelineOutcome::Aborted {
            stage: TradeStage::Entry,
            ..
        }
    ));
    assert_eq!(exchange.order_calls().len(), 1);
    assert!(!exchange
        .calls()
        .iter()
        .any(|call| matches!(call, ExchangeCall::FetchOrder { .. })));
    assert!(notifier.failures()[0].reason.contains("-2019"));
}

#[tokio::test]
async fn failed_stop_loss_still_places_trailing_stop() {
    let exchange = Arc::new(
        MockExchange::new().with_stop(Err(api_error(-2021, "Order would immediately trigger."))),
    );
    let notifier = RecordingNotifier::new();

    let outcome = pipeline(&exchange, &notifier).run(SYMBOL).await;

    let PipelineOutcome::Entered(report) = outcome else {
        panic!("expected entry, got {outcome:?}");
    };
    assert!(matches!(report.stop_loss, LegOutcome::Failed(_)));
    assert!(report.trailing_stop.is_active());
    assert!(!report.is_protected());

    let stops = exchange
        .order_calls()
        .into_iter()
        .filter(|call| matches!(call, ExchangeCall::PlaceStop(_)))
        .count();
    assert_eq!(stops, 1);

    assert_eq!(notifier.opened_count(), 0);
    let failures = notifier.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].stage, TradeStage::StopLoss);
}

#[tokio::test]
async fn inactive_leg_is_reported() {
    let exchange = Arc::new(MockExchange::new().with_trailing(Ok(order(
        3,
        SYMBOL,
        OrderType::TrailingStopMarket,
        OrderStatus::parse("EXPIRED"),
        Decimal::ZERO,
    ))));
    let notifier = RecordingNotifier::new();

    let outcome = pipeline(&exchange, &notifier).run(SYMBOL).await;

    let PipelineOutcome::Entered(report) = outcome else {
        panic!("expected entry, got {outcome:?}");
    };
    assert!(matches!(report.trailing_stop, LegOutcome::Inactive(_)));
    assert_eq!(
        notifier.events(),
        vec![Event::TradeFailed(TradeFailedEvent::new(
            SYMBOL,
            TradeStage::TrailingStop,
            "order 3 is EXPIRED instead of NEW",
        ))]
    );
}

#[tokio::test]
async fn position_lookup_failure_aborts_at_guard() {
    let exchange = Arc::new(
        MockExchange::new().with_position(Err(ExchangeError::Transport("timeout".into()))),
    );
    let notifier = RecordingNotifier::new();

    let outcome = pipeline(&exchange, &notifier).run(SYMBOL).await;

    assert!(matches!(
        outcome,
        PipelineOutcome::Aborted {
            stage: TradeStage::Guard,
            ..
        }
    ));
    assert!(exchange.order_calls().is_empty());
    assert_eq!(notifier.failures()[0].stage, TradeStage::Guard);
}

#[tokio::test]
async fn unknown_symbol_touches_nothing() {
    let exchange = Arc::new(MockExchange::new());
    let notifier = RecordingNotifier::new();

    let outcome = pipeline(&exchange, &notifier).run("ETHUSDT").await;

    assert_eq!(outcome, PipelineOutcome::UnknownSymbol);
    assert!(exchange.calls().is_empty());
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn existing_position_keeps_its_leverage() {
    let exchange = Arc::new(
        MockExchange::new()
            .with_position(Ok(Position {
                symbol: SYMBOL.into(),
                leverage: 20,
                position_amt: dec!(0.5),
                mark_price: dec!(100),
            }))
            .with_set_leverage(Err(api_error(-4161, "Leverage reduction is not supported"))),
    );
    let notifier = RecordingNotifier::new();

    let outcome = pipeline(&exchange, &notifier).run(SYMBOL).await;

    assert_eq!(outcome, PipelineOutcome::AlreadyInPosition);
    assert!(!exchange
        .calls()
        .iter()
        .any(|call| matches!(call, ExchangeCall::SetLeverage { .. })));
    assert!(exchange.order_calls().is_empty());
    assert!(notifier.is_empty());
}
