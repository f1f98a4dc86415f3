// Configuration module
// Public interface for configuration loading and the sampling store

pub mod constants;
mod loader;
mod sampling;
mod settings;

pub use loader::{default_config_path, load_config, load_config_with, ConfigOverrides};
pub use sampling::{
    derive_adaptive, validate_field, FieldChange, SamplingConfig, SamplingParam, SamplingStore,
    SamplingUpdate,
};
pub use settings::Config;
