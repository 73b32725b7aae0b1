pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::pipelines::ConversionPipeline;
pub use config::{cli::LocalStorage, toml_config::ConversionConfig, ConversionJob};
pub use core::{convert::convert, etl::EtlEngine, shapes::Target};
pub use domain::model::{Conversion, FilterMode, OrderLine};
pub use utils::error::{EtlError, Result};
