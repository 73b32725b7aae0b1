use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting conversion...");

        tracing::info!("Extracting order lines...");
        let lines = self.pipeline.extract().await?;
        tracing::info!("Extracted {} order lines", lines.len());

        tracing::info!("Transforming order lines...");
        let conversion = self.pipeline.transform(lines).await?;
        tracing::info!(
            "Transformed into {} {} rows",
            conversion.rows.len(),
            conversion.shape
        );

        tracing::info!("Loading output...");
        let output_path = self.pipeline.load(conversion).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }

    /// Extract and transform only, for dry runs.
    pub async fn preview(&self) -> Result<crate::core::Conversion> {
        let lines = self.pipeline.extract().await?;
        self.pipeline.transform(lines).await
    }
}
