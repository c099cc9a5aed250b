//! Handler for a run of the binary.

use std::future::Future;

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use super::command::Cli;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::runtime;

/// Default config file, relative to the working directory.
pub const CONFIG_PATH: &str = "config.toml";

/// Load config, start logging and run until interrupted.
///
/// Returns the process exit code: 0 after an interrupt, 1 when startup fails.
pub async fn execute(cli: &Cli) -> i32 {
    let config = match Config::load(CONFIG_PATH) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return 1;
        }
    };

    config.init_logging();
    let options = cli.run_options();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let run = runtime::run(config, options, shutdown_rx);

    if let Err(e) = run_until_interrupted(run, signal::ctrl_c(), shutdown_tx).await {
        error!(error = %e, "Fatal error");
        return 1;
    }

    info!("tweetrade stopped");
    0
}

/// Drive `run` until it finishes on its own or `interrupt` resolves.
///
/// On interrupt the shutdown flag is raised and `run` is awaited to
/// completion, so the stream consumer leaves through its own shutdown path.
/// Orders already submitted stay on the exchange.
async fn run_until_interrupted<R, I>(
    run: R,
    interrupt: I,
    shutdown: watch::Sender<bool>,
) -> Result<()>
where
    R: Future<Output = Result<()>>,
    I: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(run);

    tokio::select! {
        result = &mut run => return result,
        _ = interrupt => info!("Shutdown signal received"),
    }

    let _ = shutdown.send(true);
    run.await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::application::{ConsumerConfig, StreamConsumer};
    use crate::testkit::domain::tweet_line;
    use crate::testkit::stream::{RecordingHandler, ScriptedConnection, ScriptedSource};

    #[tokio::test(start_paused = true)]
    async fn interrupt_stops_the_consumer_through_its_shutdown_path() {
        let (tx, rx) = watch::channel(false);
        let handler = RecordingHandler::new();
        let consumer = StreamConsumer::new(
            ScriptedSource::new(vec![ScriptedConnection::OpenThenSilent(vec![tweet_line(
                "1", "btc", "BTCUSDT",
            )])]),
            handler.clone(),
            ConsumerConfig {
                reconnect_delay: Duration::from_secs(5),
            },
        );
        let stopped = Arc::new(AtomicBool::new(false));

        let run = {
            let stopped = Arc::clone(&stopped);
            async move {
                consumer.run(rx).await;
                stopped.store(true, Ordering::SeqCst);
                Ok(())
            }
        };
        let interrupt = async {
            sleep(Duration::from_secs(60)).await;
            Ok(())
        };

        run_until_interrupted(run, interrupt, tx).await.unwrap();

        assert!(stopped.load(Ordering::SeqCst));
        assert_eq!(handler.len(), 1);
    }

    #[tokio::test]
    async fn startup_error_is_returned_without_interrupt() {
        let (tx, _rx) = watch::channel(false);
        let run = async { Err(crate::error::Error::Connection("refused".into())) };

        let result = run_until_interrupted(run, std::future::pending(), tx).await;

        assert!(result.is_err());
    }
}
