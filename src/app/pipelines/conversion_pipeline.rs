use crate::adapters::bundle::{write_bundle, RunSummary};
use crate::adapters::template::{self, TemplateLayout};
use crate::adapters::{shopify, tsv, workbook};
use crate::config::ConversionJob;
use crate::config::toml_config::DEFAULT_FILENAME_PATTERN;
use crate::core::convert::convert;
use crate::core::shapes::{ServiceSheet, Target, TemplateShape};
use crate::core::{ConfigProvider, Conversion, DestinationShape, OrderLine, Pipeline, Storage};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Local};
use std::path::Path;
use tokio::sync::OnceCell;

/// Shopify export -> warehouse import, for one target and filter mode.
pub struct ConversionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    job: ConversionJob,
    started_at: DateTime<Local>,
    /// Read once, shared by transform (column order) and load (sheet headers).
    template: OnceCell<Option<TemplateLayout>>,
}

impl<S: Storage, C: ConfigProvider> ConversionPipeline<S, C> {
    pub fn new(storage: S, config: C, job: ConversionJob) -> Self {
        Self {
            storage,
            config,
            job,
            started_at: Local::now(),
            template: OnceCell::new(),
        }
    }

    /// Pins the timestamp used in output file names.
    pub fn with_started_at(mut self, started_at: DateTime<Local>) -> Self {
        self.started_at = started_at;
        self
    }

    pub fn output_filename(&self) -> String {
        let pattern = self
            .config
            .filename_pattern()
            .unwrap_or(DEFAULT_FILENAME_PATTERN);
        let stem = pattern
            .replace("{target}", self.job.target.as_str())
            .replace("{timestamp}", &self.started_at.format("%m-%d_%H%M%S").to_string());
        format!("{}.{}", stem, self.job.target.extension())
    }

    async fn template_layout(&self) -> Result<Option<&TemplateLayout>> {
        let layout = self
            .template
            .get_or_try_init(|| async {
                let Some(template_path) = &self.job.template else {
                    return Ok::<_, EtlError>(None);
                };

                tracing::info!("📄 Reading column layout from template: {}", template_path);
                let data = self.storage.read_file(template_path).await?;
                let layout = template::read_template(
                    data,
                    self.job.target.template_sheet(),
                    self.job.target.template_service_sheet(),
                )?;
                Ok(Some(layout))
            })
            .await?;
        Ok(layout.as_ref())
    }

    fn shape(&self, layout: Option<&TemplateLayout>) -> Box<dyn DestinationShape> {
        let base = self.job.target.shape();
        match layout {
            Some(layout) => Box::new(TemplateShape::new(base, &layout.orders)),
            None => base,
        }
    }

    async fn render(&self, conversion: &Conversion) -> Result<Vec<u8>> {
        match self.job.target {
            Target::Jd => {
                let layout = self.template_layout().await?;
                let shape = self.shape(layout);
                let service_sheet = layout
                    .and_then(|l| l.services.as_ref())
                    .map(ServiceSheet::from_template)
                    .unwrap_or_default();
                workbook::write_jd_workbook(
                    conversion,
                    shape.as_ref(),
                    &service_sheet,
                    &self.config.constants().business.customer_code,
                )
            }
            Target::Verde => tsv::write_tsv(conversion),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ConversionPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<OrderLine>> {
        tracing::info!("🚀 Reading orders from: {}", self.job.orders);
        let data = self.storage.read_file(&self.job.orders).await?;
        let lines = shopify::parse_orders(&data)?;
        tracing::info!("📊 Extracted {} order lines", lines.len());
        Ok(lines)
    }

    async fn transform(&self, data: Vec<OrderLine>) -> Result<Conversion> {
        tracing::info!(
            "🔧 Converting {} lines for {} (filter: {})",
            data.len(),
            self.job.target,
            self.job.mode
        );

        let layout = self.template_layout().await?;
        let shape = self.shape(layout);
        let conversion = convert(&data, self.job.mode, shape.as_ref(), self.config.constants())?;

        for advisory in &conversion.advisories {
            tracing::warn!("⚠️ {}", advisory);
        }

        let stats = &conversion.stats;
        tracing::info!(
            "✅ Conversion complete: {} rows from {} lines ({} unpaid, {} filtered out)",
            stats.rows_emitted,
            stats.lines_read,
            stats.lines_unpaid,
            stats.lines_filtered
        );
        if let Some(services) = &conversion.services {
            tracing::info!("🚚 Classified {} orders into shipping services", services.len());
        }

        Ok(conversion)
    }

    async fn load(&self, result: Conversion) -> Result<String> {
        let filename = self.output_filename();
        let output = self.render(&result).await?;

        let (stored_name, data) = match self.config.bundle_filename() {
            Some(bundle_name) => {
                let summary = RunSummary {
                    target: self.job.target.as_str(),
                    filter: self.job.mode.as_str(),
                    output_file: &filename,
                    stats: result.stats,
                    services: result.services.as_deref(),
                    advisories: &result.advisories,
                };
                tracing::debug!("Bundling {} with run summary", filename);
                (bundle_name.to_string(), write_bundle(&filename, &output, &summary)?)
            }
            None => (filename, output),
        };

        let output_path = Path::new(self.config.output_path())
            .join(&stored_name)
            .to_string_lossy()
            .into_owned();

        tracing::debug!("Writing {} bytes to {}", data.len(), output_path);
        self.storage.write_file(&output_path, &data).await?;

        tracing::info!("💾 Output saved: {}", output_path);
        Ok(output_path)
    }
}
