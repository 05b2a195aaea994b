//! Infrastructure layer - configuration and locale files

pub mod config;
pub mod locale;

pub use config::{LocaleConfig, ServerConfig, ServerSection};
pub use locale::{JsonTranslator, LocaleError};
