pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{engine::ProfileEngine, generator::ProfileGenerator, pipeline::ProfilePipeline};
pub use domain::model::{HouseholdFlags, UserInputs};
pub use utils::error::{ProfileError, Result};
