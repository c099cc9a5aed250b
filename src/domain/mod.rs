//! Exchange-agnostic domain types.

pub mod event;
pub mod id;
pub mod money;
pub mod order;
pub mod position;
pub mod rule;
pub mod trade;

pub use event::{Media, MediaKind, StreamEvent};
pub use id::{OrderId, TweetId};
pub use money::{round_quantity, round_to_tick, Price, Quantity};
pub use order::{
    LimitOrder, Order, OrderSide, OrderStatus, OrderType, StopOrder, TrailingStopOrder,
};
pub use position::Position;
pub use rule::{RouteTag, Rule, DEV_ONLY_TAG, HAS_MEDIA_TAG};
pub use trade::{TradeBook, TradeConfig, TradeParams};
