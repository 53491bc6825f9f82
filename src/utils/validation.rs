use crate::utils::error::{ProfileError, Result};

/// 郵遞區號允許的數值範圍 (00501-99950)
pub const POSTAL_CODE_MIN: u32 = 501;
pub const POSTAL_CODE_MAX: u32 = 99_950;

/// 年用電量允許範圍 (kWh)
pub const ANNUAL_KWH_MIN: f64 = 1_000.0;
pub const ANNUAL_KWH_MAX: f64 = 100_000.0;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 驗證 5 位數郵遞區號，回傳去除空白後的值
pub fn validate_postal_code(postal_code: &str) -> Result<String> {
    let trimmed = postal_code.trim();

    if trimmed.is_empty() {
        return Err(ProfileError::invalid_input(
            "postal_code",
            postal_code,
            "Zip code is required",
        ));
    }

    if trimmed.len() != 5 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProfileError::invalid_input(
            "postal_code",
            postal_code,
            "Zip code must be exactly 5 digits",
        ));
    }

    let numeric: u32 = trimmed
        .parse()
        .map_err(|_| ProfileError::invalid_input("postal_code", postal_code, "Zip code must be exactly 5 digits"))?;
    if !(POSTAL_CODE_MIN..=POSTAL_CODE_MAX).contains(&numeric) {
        return Err(ProfileError::invalid_input(
            "postal_code",
            postal_code,
            "Invalid zip code range",
        ));
    }

    Ok(trimmed.to_string())
}

pub fn validate_annual_kwh(annual_kwh: f64) -> Result<f64> {
    if !annual_kwh.is_finite() {
        return Err(ProfileError::invalid_input(
            "annual_kwh",
            annual_kwh,
            "Annual kWh usage must be a number",
        ));
    }

    if annual_kwh <= 0.0 {
        return Err(ProfileError::invalid_input(
            "annual_kwh",
            annual_kwh,
            "Annual kWh usage must be greater than 0",
        ));
    }

    if annual_kwh < ANNUAL_KWH_MIN {
        return Err(ProfileError::invalid_input(
            "annual_kwh",
            annual_kwh,
            "Annual kWh usage seems too low (minimum 1,000 kWh)",
        ));
    }

    if annual_kwh > ANNUAL_KWH_MAX {
        return Err(ProfileError::invalid_input(
            "annual_kwh",
            annual_kwh,
            "Annual kWh usage seems too high (maximum 100,000 kWh)",
        ));
    }

    Ok(annual_kwh)
}

/// 解析文字形式的年用電量 (例如表單或環境變數)
pub fn parse_annual_kwh(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ProfileError::invalid_input(
            "annual_kwh",
            raw,
            "Annual kWh usage is required",
        ));
    }

    let value: f64 = trimmed.parse().map_err(|_| {
        ProfileError::invalid_input("annual_kwh", raw, "Annual kWh usage must be a number")
    })?;
    validate_annual_kwh(value)
}

/// 將表單常見的勾選值正規化為布林值，其他值一律視為 false
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "on" | "yes" | "true"
    )
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ProfileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ProfileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_name(field_name: &str, name: &str, extension: &str) -> Result<()> {
    validate_path(field_name, name)?;

    if name.contains('/') || name.contains('\\') {
        return Err(ProfileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "File name must not contain path separators".to_string(),
        });
    }

    let has_extension = std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
    if !has_extension {
        return Err(ProfileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: format!("File name must end with .{}", extension),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ProfileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
