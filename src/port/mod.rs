//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (the exchange, the tweet stream, notification services, etc.).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │Exchange │            │   Stream    │              │ Notifier  │
//! │ Adapter │            │   Adapter   │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`Exchange`] - Futures account: positions, prices, orders
//! - [`StreamSource`], [`RuleStore`] - Filtered tweet stream and its rules
//! - [`Notifier`] - Operator notifications (Telegram, logging)
//! - [`ImageClassifier`] - Image label inference for media-gated rules
//! - [`SecretStore`] - Credential lookup at startup

pub mod outbound;

pub use outbound::classifier::{Classification, ImageClassifier};
pub use outbound::exchange::Exchange;
pub use outbound::notifier::{
    Event, LogNotifier, Notifier, NotifierRegistry, TradeFailedEvent, TradeOpenedEvent,
    TradeStage,
};
pub use outbound::secrets::SecretStore;
pub use outbound::stream::{Connection, InstalledRule, LineStream, RuleStore, StreamSource};
