//! 郵遞區號 → 氣候區查表
//!
//! 以郵遞區號首位數字決定五個氣候區之一，度日數與季節溫度都是氣候區的線性函數。

use crate::domain::model::{ClimateProfile, Season};

/// 郵遞區號不是數字開頭時使用的氣候區
pub const DEFAULT_ZONE: u8 = 5;

/// 依郵遞區號首位數字對應的氣候區
const ZONE_BY_LEADING_DIGIT: [u8; 10] = [1, 1, 1, 2, 2, 3, 3, 4, 4, 5];

/// 每一級氣候區增減的度日數
const DEGREE_DAYS_PER_ZONE: f64 = 500.0;

/// 「第 0 區」的季節溫度 (°F)，以 [`Season::index`] 為索引
const BASE_SEASONAL_TEMP_F: [f64; 4] = [60.0, 75.0, 60.0, 40.0];
const TEMP_STEP_PER_ZONE_F: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct ClimateResolver;

impl ClimateResolver {
    pub fn new() -> Self {
        Self
    }

    /// 不會失敗：格式錯誤時退回 [`DEFAULT_ZONE`]
    pub fn resolve(&self, postal_code: &str) -> ClimateProfile {
        let zone = Self::zone_for(postal_code);
        let profile = Self::profile_for_zone(zone);

        tracing::debug!(
            "Resolved postal code {} to climate zone {} (CDD {}, HDD {})",
            postal_code,
            profile.zone,
            profile.cooling_degree_days,
            profile.heating_degree_days
        );

        profile
    }

    pub fn zone_for(postal_code: &str) -> u8 {
        postal_code
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .map(|digit| ZONE_BY_LEADING_DIGIT[digit as usize])
            .unwrap_or(DEFAULT_ZONE)
    }

    pub fn profile_for_zone(zone: u8) -> ClimateProfile {
        let z = f64::from(zone);

        let mut seasonal_avg_temp = [0.0; 4];
        for season in Season::ALL {
            let i = season.index();
            seasonal_avg_temp[i] = BASE_SEASONAL_TEMP_F[i] + z * TEMP_STEP_PER_ZONE_F;
        }

        ClimateProfile {
            zone,
            seasonal_avg_temp,
            cooling_degree_days: ((z - 2.0) * DEGREE_DAYS_PER_ZONE).max(0.0),
            heating_degree_days: ((6.0 - z) * DEGREE_DAYS_PER_ZONE).max(0.0),
        }
    }
}
