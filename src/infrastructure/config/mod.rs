//! Infrastructure configuration modules.

pub mod logging;
pub mod sections;
pub mod settings;
pub mod telegram;
