use crate::core::aggregate::SeasonalAggregator;
use crate::core::encoder::IntervalSeriesEncoder;
use crate::core::generator::ProfileGenerator;
use crate::core::{ConfigProvider, Pipeline, ProfileResult, Storage, UserInputs};
use crate::domain::model::{ProfileSummary, GENERATED_CSV_PREFIX};
use crate::utils::error::Result;

pub const SEASONAL_JSON_FILENAME: &str = "seasonal_profile.json";

pub struct ProfilePipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) generator: ProfileGenerator,
}

impl<S: Storage, C: ConfigProvider> ProfilePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            generator: ProfileGenerator::new(),
        }
    }

    pub fn with_generator(mut self, generator: ProfileGenerator) -> Self {
        self.generator = generator;
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ProfilePipeline<S, C> {
    async fn extract(&self) -> Result<UserInputs> {
        let inputs = self.config.user_inputs()?;
        tracing::debug!("Validated inputs: {:?}", inputs);
        Ok(inputs)
    }

    async fn transform(&self, inputs: UserInputs) -> Result<ProfileResult> {
        // 產生整年 15 分鐘資料 (純計算，沒有 I/O)
        let series = self.generator.generate_seeded(&inputs, self.config.seed())?;
        let seasonal = SeasonalAggregator.aggregate(&series);
        let csv_output = IntervalSeriesEncoder.encode_to_vec(&series)?;

        let summary_json = if self.config.write_seasonal_json() {
            let summary = ProfileSummary {
                inputs: inputs.clone(),
                zone: crate::core::climate::ClimateResolver::zone_for(inputs.postal_code()),
                total_kwh: series.total_kwh(),
                peak_kw: series.peak_kw(),
                chart_ceiling_kw: seasonal.chart_ceiling_kw(),
                seasonal_averages: seasonal.clone(),
            };
            Some(serde_json::to_string_pretty(&summary)?)
        } else {
            None
        };

        Ok(ProfileResult {
            inputs,
            series,
            seasonal,
            csv_output,
            summary_json,
        })
    }

    async fn load(&self, result: ProfileResult) -> Result<String> {
        if let Some(max_age) = self.config.cleanup_max_age() {
            let removed = self
                .storage
                .remove_stale(GENERATED_CSV_PREFIX, "csv", max_age)
                .await?;
            if removed > 0 {
                tracing::info!("Removed {} stale CSV file(s)", removed);
            }
        }

        let csv_filename = self.config.csv_filename();
        let output_path = format!("{}/{}", self.config.output_path(), csv_filename);

        tracing::debug!(
            "Writing {} bytes of interval data to {}",
            result.csv_output.len(),
            csv_filename
        );
        self.storage
            .write_file(&csv_filename, &result.csv_output)
            .await?;

        if let Some(json) = &result.summary_json {
            self.storage
                .write_file(SEASONAL_JSON_FILENAME, json.as_bytes())
                .await?;
            tracing::debug!("Seasonal chart data saved to {}", SEASONAL_JSON_FILENAME);
        }

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoder::read_usage_rows;
    use crate::domain::model::HouseholdFlags;
    use crate::utils::error::ProfileError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        cleanups: Arc<Mutex<Vec<(String, String, Duration)>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
                cleanups: Arc::new(Mutex::new(Vec::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ProfileError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn remove_stale(
            &self,
            prefix: &str,
            extension: &str,
            max_age: Duration,
        ) -> Result<usize> {
            let mut cleanups = self.cleanups.lock().await;
            cleanups.push((prefix.to_string(), extension.to_string(), max_age));
            Ok(0)
        }
    }

    struct MockConfig {
        postal_code: String,
        annual_kwh: f64,
        flags: HouseholdFlags,
        seed: Option<u64>,
        seasonal_json: bool,
        cleanup: Option<Duration>,
    }

    impl MockConfig {
        fn new(postal_code: &str, annual_kwh: f64) -> Self {
            Self {
                postal_code: postal_code.to_string(),
                annual_kwh,
                flags: HouseholdFlags::default(),
                seed: Some(42),
                seasonal_json: true,
                cleanup: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn user_inputs(&self) -> Result<UserInputs> {
            UserInputs::new(&self.postal_code, self.annual_kwh, self.flags)
        }

        fn seed(&self) -> Option<u64> {
            self.seed
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn csv_filename(&self) -> String {
            "profile.csv".to_string()
        }

        fn write_seasonal_json(&self) -> bool {
            self.seasonal_json
        }

        fn cleanup_max_age(&self) -> Option<Duration> {
            self.cleanup
        }
    }

    #[tokio::test]
    async fn test_extract_rejects_invalid_postal_code() {
        let pipeline = ProfilePipeline::new(MockStorage::new(), MockConfig::new("1234", 12_000.0));

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, ProfileError::InvalidInput { ref field, .. } if field == "postal_code"));
    }

    #[tokio::test]
    async fn test_transform_builds_csv_and_summary() {
        let pipeline = ProfilePipeline::new(MockStorage::new(), MockConfig::new("90210", 8_000.0));

        let inputs = pipeline.extract().await.unwrap();
        let result = pipeline.transform(inputs).await.unwrap();

        assert_eq!(result.series.len(), 35_040);

        let rows = read_usage_rows(result.csv_output.as_slice()).unwrap();
        assert_eq!(rows.len(), 35_040);

        let summary: serde_json::Value =
            serde_json::from_str(result.summary_json.as_deref().unwrap()).unwrap();
        assert_eq!(summary["zone"], 5);
        assert_eq!(summary["seasonal_averages"]["winter"].as_array().unwrap().len(), 24);
        assert_eq!(summary["inputs"]["postal_code"], "90210");
    }

    #[tokio::test]
    async fn test_transform_without_seasonal_json() {
        let mut config = MockConfig::new("90210", 8_000.0);
        config.seasonal_json = false;
        let pipeline = ProfilePipeline::new(MockStorage::new(), config);

        let inputs = pipeline.extract().await.unwrap();
        let result = pipeline.transform(inputs).await.unwrap();
        assert!(result.summary_json.is_none());
    }

    #[tokio::test]
    async fn test_load_writes_files_and_runs_cleanup() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new("60601", 15_000.0);
        config.cleanup = Some(Duration::from_secs(3600));
        let pipeline = ProfilePipeline::new(storage.clone(), config);

        let inputs = pipeline.extract().await.unwrap();
        let result = pipeline.transform(inputs).await.unwrap();
        let output_path = pipeline.load(result).await.unwrap();

        assert_eq!(output_path, "test_output/profile.csv");

        let csv = storage.get_file("profile.csv").await.unwrap();
        assert!(csv.starts_with(b"Date,Time,Usage\n2024-01-01,00:00,"));
        assert!(storage.get_file(SEASONAL_JSON_FILENAME).await.is_some());

        let cleanups = storage.cleanups.lock().await;
        assert_eq!(
            cleanups.as_slice(),
            &[(
                "demand_profile_".to_string(),
                "csv".to_string(),
                Duration::from_secs(3600)
            )]
        );
    }

    #[tokio::test]
    async fn test_seeded_ev_runs_are_reproducible() {
        let mut config = MockConfig::new("75201", 10_000.0);
        config.flags.has_ev = true;
        config.seed = Some(2024);
        let pipeline = ProfilePipeline::new(MockStorage::new(), config);

        let first = pipeline.transform(pipeline.extract().await.unwrap()).await.unwrap();
        let second = pipeline.transform(pipeline.extract().await.unwrap()).await.unwrap();
        assert_eq!(first.csv_output, second.csv_output);
    }
}
