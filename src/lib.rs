pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::SdkmanApi;
pub use config::{cli::LocalStorage, settings::Settings, toml_config::TomlConfig};
pub use core::{export::OutputFormat, service::CatalogService};
pub use domain::model::{Candidate, CandidateVersion, LocalCandidate, Version};
pub use utils::error::{CatalogError, Result};
