//! Application configuration

mod settings;

pub use settings::Settings;
