use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("invalid settings for symbol {symbol}: {reason}")]
    InvalidSymbol { symbol: String, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("secret '{name}' is unavailable: {reason}")]
    MissingSecret { name: String, reason: String },
}

/// Failures reported by an exchange adapter.
///
/// Every adapter call collapses into one of these so the order pipeline can
/// treat them uniformly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("exchange API error: {message} [{code}] (HTTP {status})")]
    Api {
        status: u16,
        code: i64,
        message: String,
    },

    #[error("exchange request failed: {0}")]
    Transport(String),

    #[error("malformed exchange response: {0}")]
    Malformed(String),

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),
}

impl ExchangeError {
    /// Exchange-specific error code, when the exchange supplied one.
    #[must_use]
    pub const fn code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Errors raised by the filtered stream endpoints outside the hot path.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("cannot {action} rules: {body} [{status}]")]
    Rules {
        action: &'static str,
        status: u16,
        body: String,
    },

    #[error("stream read failed: {0}")]
    Read(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("classifier error: {0}")]
    Classifier(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_errors_pass_through_unchanged() {
        let err = Error::from(ExchangeError::Api {
            status: 400,
            code: -2019,
            message: "Margin is insufficient.".into(),
        });
        assert_eq!(
            err.to_string(),
            "exchange API error: Margin is insufficient. [-2019] (HTTP 400)"
        );
    }

    #[test]
    fn unreadable_config_file_is_a_config_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::from(ConfigError::ReadFile(io));
        assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
        assert_eq!(ExchangeError::Transport("timeout".into()).code(), None);
    }
}
