pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use args::CliConfig;

/// What one run converts: the export to read, the destination and the SKU filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub orders: String,
    pub target: crate::core::shapes::Target,
    pub mode: crate::domain::model::FilterMode,
    pub template: Option<String>,
}

#[cfg(feature = "cli")]
mod args {
    use super::ConversionJob;
    use crate::core::shapes::Target;
    use crate::domain::model::FilterMode;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "order-bridge")]
    #[command(about = "Convert a Shopify order export into a warehouse import file")]
    pub struct CliConfig {
        /// Shopify order export (.csv)
        #[arg(short = 's', long)]
        pub orders: String,

        /// Warehouse system to produce the import for
        #[arg(short, long, value_enum)]
        pub target: Target,

        /// Keep only one product family and rewrite its SKUs
        #[arg(short = 'o', long, value_enum, default_value_t = FilterMode::None)]
        pub only: FilterMode,

        /// Template workbook whose header row sets the column order
        #[arg(short = 'j', long)]
        pub template: Option<String>,

        /// TOML configuration file with business constants and output settings
        #[arg(short, long)]
        pub config: Option<String>,

        /// Override the output directory from the configuration
        #[arg(long)]
        pub output_path: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log as JSON lines")]
        pub json_logs: bool,

        /// Convert and report without writing any file
        #[arg(long)]
        pub dry_run: bool,
    }

    impl CliConfig {
        pub fn job(&self) -> ConversionJob {
            ConversionJob {
                orders: self.orders.clone(),
                target: self.target,
                mode: self.only,
                template: self.template.clone(),
            }
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_path("orders", &self.orders)?;
            validation::validate_file_extension("orders", &self.orders, &["csv"])?;

            if let Some(template) = &self.template {
                validation::validate_path("template", template)?;
                validation::validate_file_extension("template", template, &["xlsx"])?;
            }

            if let Some(output_path) = &self.output_path {
                validation::validate_path("output_path", output_path)?;
            }

            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_arguments() {
            let config = CliConfig::parse_from([
                "order-bridge",
                "--orders",
                "orders_export.csv",
                "--target",
                "jd",
                "--only",
                "accessories",
            ]);

            assert!(config.validate().is_ok());
            let job = config.job();
            assert_eq!(job.target, Target::Jd);
            assert_eq!(job.mode, FilterMode::Accessories);
            assert_eq!(job.template, None);
        }

        #[test]
        fn test_only_defaults_to_none() {
            let config = CliConfig::parse_from(["order-bridge", "-s", "o.csv", "-t", "verde"]);
            assert_eq!(config.only, FilterMode::None);
        }

        #[test]
        fn test_rejects_non_csv_orders() {
            let config =
                CliConfig::parse_from(["order-bridge", "-s", "orders.xlsx", "-t", "verde"]);
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_rejects_unknown_mode() {
            let result = CliConfig::try_parse_from([
                "order-bridge",
                "-s",
                "o.csv",
                "-t",
                "verde",
                "--only",
                "widgets",
            ]);
            assert!(result.is_err());
        }
    }
}
