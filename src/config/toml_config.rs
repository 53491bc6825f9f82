use crate::config::{default_csv_filename, validate_output_settings, DEFAULT_CLEANUP_MAX_AGE_SECS};
use crate::core::{ConfigProvider, UserInputs};
use crate::domain::model::HouseholdFlags;
use crate::utils::error::{ProfileError, Result};
use crate::utils::validation::{parse_annual_kwh, parse_flag, validate_annual_kwh, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub profile: ProfileConfig,
    pub generation: Option<GenerationConfig>,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub postal_code: String,
    pub annual_kwh: KwhValue,
    #[serde(default)]
    pub has_ac: FlagValue,
    #[serde(default)]
    pub has_heating: FlagValue,
    #[serde(default)]
    pub has_wfh: FlagValue,
    #[serde(default)]
    pub has_ev: FlagValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub output_path: String,
    pub csv_filename: Option<String>,
    pub seasonal_json: Option<bool>,
    pub cleanup_max_age_seconds: Option<u64>,
}

/// 年用電量可以寫成數字或字串 (例如 "12000")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KwhValue {
    Number(f64),
    Text(String),
}

impl KwhValue {
    pub fn to_kwh(&self) -> Result<f64> {
        match self {
            KwhValue::Number(value) => validate_annual_kwh(*value),
            KwhValue::Text(raw) => parse_annual_kwh(raw),
        }
    }
}

/// 設定檔中的家庭旗標：TOML 布林值、`1`/`0`，或表單字串如 `"on"`、`"yes"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl Default for FlagValue {
    fn default() -> Self {
        FlagValue::Bool(false)
    }
}

impl FlagValue {
    pub fn is_set(&self) -> bool {
        match self {
            FlagValue::Bool(value) => *value,
            FlagValue::Integer(value) => *value == 1,
            FlagValue::Text(raw) => parse_flag(raw),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ProfileError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ZIP_CODE})，找不到的變數保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            ProfileError::ConfigValidationError {
                field: "environment".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn flags(&self) -> HouseholdFlags {
        HouseholdFlags {
            has_ac: self.profile.has_ac.is_set(),
            has_heating: self.profile.has_heating.is_set(),
            has_wfh: self.profile.has_wfh.is_set(),
            has_ev: self.profile.has_ev.is_set(),
        }
    }

    pub fn cleanup_max_age_seconds(&self) -> u64 {
        self.output
            .cleanup_max_age_seconds
            .unwrap_or(DEFAULT_CLEANUP_MAX_AGE_SECS)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if self.profile.postal_code.contains("${") {
            return Err(ProfileError::MissingConfigError {
                field: "profile.postal_code".to_string(),
            });
        }

        validate_output_settings(
            &self.output.output_path,
            self.output.csv_filename.as_deref(),
            self.cleanup_max_age_seconds(),
        )?;

        self.user_inputs().map(|_| ())
    }
}

impl ConfigProvider for TomlConfig {
    fn user_inputs(&self) -> Result<UserInputs> {
        let annual_kwh = self.profile.annual_kwh.to_kwh()?;
        UserInputs::new(&self.profile.postal_code, annual_kwh, self.flags())
    }

    fn seed(&self) -> Option<u64> {
        self.generation.as_ref().and_then(|g| g.seed)
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn csv_filename(&self) -> String {
        self.output
            .csv_filename
            .clone()
            .unwrap_or_else(default_csv_filename)
    }

    fn write_seasonal_json(&self) -> bool {
        self.output.seasonal_json.unwrap_or(true)
    }

    fn cleanup_max_age(&self) -> Option<Duration> {
        let seconds = self.cleanup_max_age_seconds();
        (seconds > 0).then(|| Duration::from_secs(seconds))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
