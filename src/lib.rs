pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::astrology_api::AstrologyApiClient;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{chart::ChartEngine, normalizer::normalize, resolver::SignResolver};
pub use domain::model::{
    BirthRecord, ChartReport, SignPlacement, SignResolution, SignSource, ZodiacSign,
};
pub use utils::error::{ChartError, Result};
