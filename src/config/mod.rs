pub mod cli;
pub mod toml_config;

use crate::domain::model::GENERATED_CSV_PREFIX;
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_name, validate_path, validate_range};

/// 清理舊 CSV 的預設時間 (一小時)
pub const DEFAULT_CLEANUP_MAX_AGE_SECS: u64 = 3600;
/// 允許設定的最長保留時間 (七天)
pub const MAX_CLEANUP_MAX_AGE_SECS: u64 = 7 * 24 * 3600;

/// 預設檔名 `demand_profile_<YYYY-MM-DD_HHMMSS>.csv` (本地時間)
pub fn default_csv_filename() -> String {
    format!(
        "{}{}.csv",
        GENERATED_CSV_PREFIX,
        chrono::Local::now().format("%Y-%m-%d_%H%M%S")
    )
}

pub(crate) fn validate_output_settings(
    output_path: &str,
    csv_filename: Option<&str>,
    cleanup_max_age_secs: u64,
) -> Result<()> {
    validate_path("output_path", output_path)?;
    if let Some(name) = csv_filename {
        validate_file_name("csv_filename", name, "csv")?;
    }
    validate_range(
        "cleanup_max_age_seconds",
        cleanup_max_age_secs,
        0,
        MAX_CLEANUP_MAX_AGE_SECS,
    )
}

#[cfg(feature = "cli")]
pub use cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use super::{default_csv_filename, validate_output_settings, DEFAULT_CLEANUP_MAX_AGE_SECS};
    use crate::core::{ConfigProvider, UserInputs};
    use crate::domain::model::HouseholdFlags;
    use crate::domain::model::GENERATED_CSV_PREFIX;
use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::Parser;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "demand-profile")]
    #[command(about = "Synthesize a year of 15-minute residential load data")]
    pub struct CliConfig {
        /// 5-digit postal code (00501-99950)
        #[arg(long)]
        pub postal_code: String,

        /// Annual consumption in kWh (1,000-100,000)
        #[arg(long)]
        pub annual_kwh: f64,

        #[arg(long, help = "Household has air conditioning")]
        pub ac: bool,

        #[arg(long, help = "Household has electric heating")]
        pub heating: bool,

        #[arg(long, help = "Someone works from home on weekdays")]
        pub wfh: bool,

        #[arg(long, help = "Household charges an electric vehicle")]
        pub ev: bool,

        /// Seed for EV charging draws; omit for a random run
        #[arg(long)]
        pub seed: Option<u64>,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long)]
        pub csv_filename: Option<String>,

        #[arg(long, help = "Skip writing seasonal_profile.json")]
        pub no_seasonal_json: bool,

        /// Delete generated demand_profile_*.csv files older than this many seconds before writing (0 disables)
        #[arg(long, default_value_t = DEFAULT_CLEANUP_MAX_AGE_SECS)]
        pub cleanup_max_age_secs: u64,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit JSON log lines")]
        pub log_json: bool,
    }

    impl CliConfig {
        pub fn flags(&self) -> HouseholdFlags {
            HouseholdFlags {
                has_ac: self.ac,
                has_heating: self.heating,
                has_wfh: self.wfh,
                has_ev: self.ev,
            }
        }
    }

    impl ConfigProvider for CliConfig {
        fn user_inputs(&self) -> Result<UserInputs> {
            UserInputs::new(&self.postal_code, self.annual_kwh, self.flags())
        }

        fn seed(&self) -> Option<u64> {
            self.seed
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn csv_filename(&self) -> String {
            self.csv_filename.clone().unwrap_or_else(default_csv_filename)
        }

        fn write_seasonal_json(&self) -> bool {
            !self.no_seasonal_json
        }

        fn cleanup_max_age(&self) -> Option<Duration> {
            (self.cleanup_max_age_secs > 0)
                .then(|| Duration::from_secs(self.cleanup_max_age_secs))
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_output_settings(
                &self.output_path,
                self.csv_filename.as_deref(),
                self.cleanup_max_age_secs,
            )?;
            self.user_inputs().map(|_| ())
        }
    }

}
