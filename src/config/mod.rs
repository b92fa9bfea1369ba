//! Configuration loading.

pub mod settings;

pub use settings::{expand_home, Settings};
