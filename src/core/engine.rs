use std::time::Instant;

use crate::core::Pipeline;
use crate::utils::error::Result;

/// 執行完整流程：輸入 → 產生 → 輸出檔案
pub struct ProfileEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ProfileEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting demand profile generation...");

        // Extract
        let inputs = self.pipeline.extract().await?;
        tracing::info!(
            "Inputs: postal code {}, {} kWh/year, flags {:?}",
            inputs.postal_code(),
            inputs.annual_kwh(),
            inputs.flags()
        );

        // Transform
        let result = self.pipeline.transform(inputs).await?;
        tracing::info!(
            "Generated {} intervals ({:.1} kWh, peak {:.2} kW)",
            result.series.len(),
            result.series.total_kwh(),
            result.series.peak_kw()
        );

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!(
            "Output saved to: {} in {:?}",
            output_path,
            started.elapsed()
        );

        Ok(output_path)
    }
}
