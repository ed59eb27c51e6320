//! Configuration validation, defaults and persistence

pub mod defaults;
pub mod manager;
pub mod persistence;
pub mod validator;

pub use defaults::{fill_defaults, mask_secrets, DEFAULT_MASK};
pub use manager::ConfigManager;
pub use persistence::{load_config, load_schema, save_config};
pub use validator::{validate, ConfigValidator, ValidationError};
