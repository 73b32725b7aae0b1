use crate::core::ConfigProvider;
use crate::domain::model::{BusinessConstants, CarrierConstants, FieldConstants};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

pub const DEFAULT_FILENAME_PATTERN: &str = "{target}_{timestamp}";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub conversion: ConversionInfo,
    pub business: BusinessConstants,
    pub carrier: CarrierConstants,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionInfo {
    pub name: String,
    pub description: String,
}

impl Default for ConversionInfo {
    fn default() -> Self {
        Self {
            name: "shopify-export".to_string(),
            description: "Shopify order export to warehouse import".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub output_path: String,
    pub filename_pattern: Option<String>,
    pub compression: Option<CompressionConfig>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: ".".to_string(),
            filename_pattern: None,
            compression: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

impl ConversionConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("load.output_path", &self.load.output_path)?;

        if let Some(pattern) = &self.load.filename_pattern {
            validation::validate_filename_pattern("load.filename_pattern", pattern)?;
        }

        if let Some(compression) = &self.load.compression {
            if compression.enabled {
                validation::validate_file_extension(
                    "load.compression.filename",
                    &compression.filename,
                    &["zip"],
                )?;
            }
        }

        let business = &self.business;
        for (field, value) in [
            ("business.customer_code", &business.customer_code),
            ("business.sales_channel", &business.sales_channel),
            ("business.warehouse_code", &business.warehouse_code),
            ("business.cargo_owner_code", &business.cargo_owner_code),
            ("business.unit_price", &business.unit_price),
            ("business.order_type", &business.order_type),
            ("carrier.ship_carrier", &self.carrier.ship_carrier),
            ("carrier.ship_service", &self.carrier.ship_service),
        ] {
            validation::validate_non_empty_string(field, value)?;
        }

        Ok(())
    }

    pub fn field_constants(&self) -> FieldConstants {
        FieldConstants {
            business: self.business.clone(),
            carrier: self.carrier.clone(),
        }
    }
}

impl Validate for ConversionConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// A loaded config with its field constants resolved once.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: ConversionConfig,
    constants: FieldConstants,
}

impl ResolvedConfig {
    pub fn new(config: ConversionConfig) -> Self {
        let constants = config.field_constants();
        Self { config, constants }
    }
}

impl ConfigProvider for ResolvedConfig {
    fn output_path(&self) -> &str {
        &self.config.load.output_path
    }

    fn constants(&self) -> &FieldConstants {
        &self.constants
    }

    fn filename_pattern(&self) -> Option<&str> {
        self.config.load.filename_pattern.as_deref()
    }

    fn bundle_filename(&self) -> Option<&str> {
        self.config
            .load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }
}
