//! Command-line interface definitions.
//!
//! The binary has a single job, so the CLI is two run-mode flags and no
//! subcommands. Everything else lives in `config.toml`.

use clap::Parser;
use tracing::warn;

use crate::infrastructure::runtime::RunOptions;

/// Trade Binance futures on filtered tweet stream matches
#[derive(Parser, Debug, Default)]
#[command(name = "tweetrade")]
#[command(version)]
pub struct Cli {
    /// Use the Binance testnet and test credentials
    #[arg(long)]
    pub test: bool,

    /// Keep the installed stream rules (test mode only)
    #[arg(long)]
    pub skip_rules: bool,
}

impl Cli {
    /// Resolve the run options. Rule installation is never skipped in
    /// production.
    #[must_use]
    pub fn run_options(&self) -> RunOptions {
        if self.skip_rules && !self.test {
            warn!("--skip-rules is ignored outside test mode");
        }
        RunOptions {
            test: self.test,
            skip_rules: self.skip_rules && self.test,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_is_production() {
        let cli = Cli::try_parse_from(["tweetrade"]).unwrap();
        assert_eq!(cli.run_options(), RunOptions::default());
    }

    #[test]
    fn skip_rules_is_forced_off_in_production() {
        let cli = Cli::try_parse_from(["tweetrade", "--skip-rules"]).unwrap();
        assert!(!cli.run_options().skip_rules);
    }

    #[test]
    fn skip_rules_applies_in_test_mode() {
        let cli = Cli::try_parse_from(["tweetrade", "--test", "--skip-rules"]).unwrap();
        assert_eq!(
            cli.run_options(),
            RunOptions {
                test: true,
                skip_rules: true
            }
        );
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["tweetrade", "--dry-run"]).is_err());
    }
}
