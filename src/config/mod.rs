//! Configuration module for the training engine.
//!
//! Engine parameters are loaded from environment variables; model banks can
//! be overridden from TOML.

mod training_config;

pub use training_config::{
    DEFAULT_MIN_ROWS, TrainingEnvConfig, load_models_from_toml, parse_models_toml,
};
