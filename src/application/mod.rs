//! Application services: routing, order execution and the stream consumer.

pub mod consumer;
pub mod dispatch;
pub mod pipeline;
pub mod record;
pub mod startup;

pub use consumer::{
    rate_limit_delay, ConnectionState, ConsumerConfig, EventHandler, StreamConsumer,
    TradingHandler, DEFAULT_RECONNECT_DELAY,
};
pub use dispatch::{DropReason, MediaGate, Route, RuleDispatcher, DEFAULT_MEDIA_THRESHOLD};
pub use pipeline::{LegOutcome, OrderPipeline, PipelineOutcome, TradeReport};
pub use record::{parse_record, RecordError};
pub use startup::{build_trade_book, install_rules};
