use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Invalid input for {field} ({value}): {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Degenerate profile: computed total energy is {total_kwh} kWh, cannot normalize")]
    DegenerateProfile { total_kwh: f64 },

    #[error("Interval encoding failed: {0}")]
    EncodingError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Computation,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ProfileError {
    pub fn invalid_input(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        ProfileError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ProfileError::InvalidInput { .. } => ErrorCategory::Input,
            ProfileError::DegenerateProfile { .. } => ErrorCategory::Computation,
            ProfileError::EncodingError(_)
            | ProfileError::IoError(_)
            | ProfileError::SerializationError(_) => ErrorCategory::Io,
            ProfileError::ConfigValidationError { .. }
            | ProfileError::InvalidConfigValueError { .. }
            | ProfileError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            // 寫入失敗通常是暫時性的，可以重試
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Computation => ErrorSeverity::Critical,
        }
    }

    /// 依嚴重程度決定程式結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ProfileError::InvalidInput { field, .. } if field == "postal_code" => {
                "Use a 5-digit postal code between 00501 and 99950"
            }
            ProfileError::InvalidInput { field, .. } if field == "annual_kwh" => {
                "Use an annual consumption between 1,000 and 100,000 kWh"
            }
            ProfileError::InvalidInput { .. } => "Check the household inputs and try again",
            ProfileError::DegenerateProfile { .. } => {
                "The load shape produced no energy; check that the shape tables are non-zero"
            }
            ProfileError::EncodingError(_) | ProfileError::IoError(_) => {
                "Check that the output directory exists, is writable and has free space"
            }
            ProfileError::SerializationError(_) => "Re-run the generation; the chart data could not be serialized",
            ProfileError::ConfigValidationError { .. }
            | ProfileError::InvalidConfigValueError { .. } => {
                "Fix the highlighted configuration value and run again"
            }
            ProfileError::MissingConfigError { .. } => "Add the missing setting to the config file or CLI flags",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ProfileError::InvalidInput { reason, .. } => reason.clone(),
            ProfileError::DegenerateProfile { .. } => {
                "Could not build a demand profile from these inputs".to_string()
            }
            ProfileError::EncodingError(e) => format!("Could not write the interval CSV: {}", e),
            ProfileError::IoError(e) => format!("File operation failed: {}", e),
            ProfileError::SerializationError(e) => format!("Could not write the chart data: {}", e),
            ProfileError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            ProfileError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            ProfileError::MissingConfigError { field } => {
                format!("Configuration value '{}' is required", field)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ProfileError>;
