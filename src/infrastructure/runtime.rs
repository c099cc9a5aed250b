//! Startup sequence and the long-running stream loop.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use super::bootstrap::{
    build_dispatcher, build_exchange, build_notifier_registry, build_secret_store,
    load_credentials,
};
use crate::adapter::outbound::twitter::{TwitterRules, TwitterSettings, TwitterStream};
use crate::application::{
    build_trade_book, install_rules, ConsumerConfig, OrderPipeline, StreamConsumer,
    TradingHandler,
};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::{Exchange, Notifier};

/// Run-mode switches from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Use the exchange testnet and test credentials.
    pub test: bool,
    /// Leave the installed stream rules untouched.
    pub skip_rules: bool,
}

/// Run startup, then consume the stream until `shutdown` fires.
///
/// Any error returned happened before streaming began.
pub async fn run(config: Config, options: RunOptions, shutdown: watch::Receiver<bool>) -> Result<()> {
    info!(test = options.test, skip_rules = options.skip_rules, "Starting tweetrade");

    for tag in config.unconfigured_rule_tags() {
        warn!(tag, "Rule tag has no [symbols] entry; its matches will be dropped");
    }

    let secrets = build_secret_store(&config);
    let credentials = load_credentials(secrets.as_ref(), &config, options.test).await?;

    let notifier: Arc<dyn Notifier> = Arc::new(build_notifier_registry(credentials.telegram)?);

    let binance = build_exchange(&config, options.test, credentials.binance);
    binance.ensure_one_way_mode().await?;
    let exchange: Arc<dyn Exchange> = Arc::new(binance);

    let twitter = TwitterSettings::new(credentials.twitter_bearer_token);
    if options.skip_rules {
        info!("Keeping installed stream rules");
    } else {
        install_rules(&TwitterRules::new(twitter.clone()), &config.stream.rules).await?;
    }

    let book = Arc::new(build_trade_book(exchange.as_ref(), &config.symbols).await?);
    let margin_balance = exchange.margin_balance().await?;
    info!(
        exchange = exchange.exchange_name(),
        symbols = book.len(),
        %margin_balance,
        "Trade book ready"
    );

    let dispatcher = build_dispatcher(&config, secrets.as_ref(), Arc::clone(&book)).await?;
    let pipeline = OrderPipeline::new(exchange, notifier, book, margin_balance);
    let consumer = StreamConsumer::new(
        TwitterStream::new(twitter),
        TradingHandler::new(dispatcher, pipeline),
        ConsumerConfig {
            reconnect_delay: config.stream.reconnect_delay(),
        },
    );

    info!("Listening for tweets...");
    consumer.run(shutdown).await;
    Ok(())
}
