//! Twitter v2 filtered stream integration.

pub mod dto;
pub mod lines;
pub mod rules;
pub mod settings;
pub mod stream;

pub use rules::TwitterRules;
pub use settings::TwitterSettings;
pub use stream::TwitterStream;
