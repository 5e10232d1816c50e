use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Drives a [`Pipeline`] through extract, transform and load.
pub struct GenerationEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> GenerationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting page generation");

        let routes = self.pipeline.extract().await?;
        tracing::info!("Enumerated {} routes", routes.len());

        let site = self.pipeline.transform(routes).await?;
        tracing::info!("Built {} pages", site.pages.len());

        let output_path = self.pipeline.load(site).await?;
        tracing::info!(
            "Output saved to: {} ({:?})",
            output_path,
            started.elapsed()
        );

        Ok(output_path)
    }
}
