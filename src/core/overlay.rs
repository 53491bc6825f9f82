//! 疊加在基礎負載上的氣候與生活習慣調整
//!
//! 空調規則依序各自計算後加總，同時被兩條規則涵蓋的時段 (冬季 05-06 時) 兩項都會加上。

use rand::Rng;
use std::ops::Range;

use crate::domain::model::{ClimateProfile, DayType, Season, UserInputs};
use crate::utils::error::{ProfileError, Result};

/// 度日數換算強度的分母
const DEGREE_DAY_SCALE: f64 = 2000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HvacLoad {
    Cooling,
    Heating,
}

/// 一條加法空調規則：
/// `base_kw * (1 + degree_days / 2000 * intensity) * scale`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HvacRule {
    pub name: &'static str,
    pub load: HvacLoad,
    pub season: Season,
    /// 包含頭尾的小時區間
    pub hours: &'static [(u32, u32)],
    pub intensity: f64,
    pub scale: f64,
}

pub const HVAC_RULES: &[HvacRule] = &[
    HvacRule {
        name: "peak_cooling",
        load: HvacLoad::Cooling,
        season: Season::Summer,
        hours: &[(14, 17)],
        intensity: 0.5,
        scale: 1.0,
    },
    HvacRule {
        name: "shoulder_cooling",
        load: HvacLoad::Cooling,
        season: Season::Summer,
        hours: &[(12, 13), (18, 20)],
        intensity: 0.3,
        scale: 0.5,
    },
    HvacRule {
        name: "peak_heating",
        load: HvacLoad::Heating,
        season: Season::Winter,
        hours: &[(5, 8), (18, 21)],
        intensity: 0.6,
        scale: 1.0,
    },
    HvacRule {
        name: "overnight_heating",
        load: HvacLoad::Heating,
        season: Season::Winter,
        hours: &[(0, 6)],
        intensity: 0.4,
        scale: 0.7,
    },
];

impl HvacRule {
    pub fn covers_hour(&self, hour: u32) -> bool {
        self.hours
            .iter()
            .any(|&(start, end)| (start..=end).contains(&hour))
    }

    fn enabled_for(&self, inputs: &UserInputs) -> bool {
        match self.load {
            HvacLoad::Cooling => inputs.has_ac(),
            HvacLoad::Heating => inputs.has_heating(),
        }
    }

    fn degree_days(&self, climate: &ClimateProfile) -> f64 {
        match self.load {
            HvacLoad::Cooling => climate.cooling_degree_days,
            HvacLoad::Heating => climate.heating_degree_days,
        }
    }

    pub fn applies(&self, season: Season, hour: u32, inputs: &UserInputs) -> bool {
        self.season == season && self.enabled_for(inputs) && self.covers_hour(hour)
    }

    pub fn contribution(&self, base_kw: f64, climate: &ClimateProfile) -> f64 {
        let factor = 1.0 + self.degree_days(climate) / DEGREE_DAY_SCALE * self.intensity;
        base_kw * factor * self.scale
    }
}

/// 此小時所有適用空調規則的總和
pub fn hvac_overlay(
    rules: &[HvacRule],
    base_kw: f64,
    season: Season,
    hour: u32,
    climate: &ClimateProfile,
    inputs: &UserInputs,
) -> f64 {
    rules
        .iter()
        .filter(|rule| rule.applies(season, hour, inputs))
        .map(|rule| rule.contribution(base_kw, climate))
        .sum()
}

/// 在家工作：平日上班時段用電為 130%
pub const WFH_MULTIPLIER: f64 = 1.3;
pub const WFH_HOURS: Range<u32> = 9..17;

/// Level 2 充電功率 (kW)
pub const EV_RATE_KW: f64 = 7.0;

pub fn wfh_multiplier(inputs: &UserInputs, day_type: DayType, hour: u32) -> f64 {
    if inputs.has_wfh() && day_type.is_weekday() && WFH_HOURS.contains(&hour) {
        WFH_MULTIPLIER
    } else {
        1.0
    }
}

/// 可能插電充電的時段
#[derive(Debug, Clone, PartialEq)]
pub struct ChargingWindow {
    /// 半開區間 [start, end)
    hours: Vec<Range<u32>>,
    weekdays_only: bool,
    probability: f64,
}

impl ChargingWindow {
    /// 機率必須落在 [0, 1]，否則 `gen_bool` 會 panic
    pub fn new(hours: Vec<Range<u32>>, weekdays_only: bool, probability: f64) -> Result<Self> {
        validate_unit_interval("ev.probability", probability)?;
        if hours.iter().any(|range| range.end > 24 || range.start >= range.end) {
            return Err(ProfileError::InvalidConfigValueError {
                field: "ev.hours".to_string(),
                value: format!("{:?}", hours),
                reason: "Hour ranges must be non-empty and within 0..24".to_string(),
            });
        }

        Ok(Self {
            hours,
            weekdays_only,
            probability,
        })
    }

    pub fn hours(&self) -> &[Range<u32>] {
        &self.hours
    }

    pub fn weekdays_only(&self) -> bool {
        self.weekdays_only
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn applies(&self, hour: u32, day_type: DayType) -> bool {
        (!self.weekdays_only || day_type.is_weekday())
            && self.hours.iter().any(|range| range.contains(&hour))
    }
}

fn validate_unit_interval(field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ProfileError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Probability must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

/// Level 2 家用充電，每個 15 分鐘獨立抽樣 (沒有連續充電的概念)
#[derive(Debug, Clone, PartialEq)]
pub struct EvChargingModel {
    rate_kw: f64,
    evening: ChargingWindow,
    overnight: ChargingWindow,
}

impl Default for EvChargingModel {
    fn default() -> Self {
        Self {
            rate_kw: EV_RATE_KW,
            evening: ChargingWindow {
                hours: vec![18..22],
                weekdays_only: true,
                probability: 0.60,
            },
            overnight: ChargingWindow {
                hours: vec![22..24, 0..6],
                weekdays_only: false,
                probability: 0.80,
            },
        }
    }
}

impl EvChargingModel {
    pub fn new(rate_kw: f64, evening: ChargingWindow, overnight: ChargingWindow) -> Result<Self> {
        if !rate_kw.is_finite() || rate_kw < 0.0 {
            return Err(ProfileError::InvalidConfigValueError {
                field: "ev.rate_kw".to_string(),
                value: rate_kw.to_string(),
                reason: "Charging rate must be a non-negative number".to_string(),
            });
        }

        Ok(Self {
            rate_kw,
            evening,
            overnight,
        })
    }

    pub fn rate_kw(&self) -> f64 {
        self.rate_kw
    }

    /// 每個間隔最多加一次 `rate_kw`；兩個時段都符合時以深夜時段為準
    pub fn charging_kw<R: Rng + ?Sized>(&self, hour: u32, day_type: DayType, rng: &mut R) -> f64 {
        let window = if self.overnight.applies(hour, day_type) {
            &self.overnight
        } else if self.evening.applies(hour, day_type) {
            &self.evening
        } else {
            return 0.0;
        };

        if rng.gen_bool(window.probability) {
            self.rate_kw
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::climate::ClimateResolver;
    use crate::domain::model::HouseholdFlags;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn inputs(flags: HouseholdFlags) -> UserInputs {
        UserInputs::new("90210", 12_000.0, flags).unwrap()
    }

    #[test]
    fn test_summer_cooling_windows_do_not_overlap() {
        let peak = &HVAC_RULES[0];
        let shoulder = &HVAC_RULES[1];
        for hour in 0..24 {
            assert!(!(peak.covers_hour(hour) && shoulder.covers_hour(hour)), "hour {hour}");
        }
        assert!(shoulder.covers_hour(12) && shoulder.covers_hour(20));
        assert!(!shoulder.covers_hour(21));
    }

    #[test]
    fn test_winter_heating_double_counts_early_morning() {
        let climate = ClimateResolver::profile_for_zone(1);
        let household = inputs(HouseholdFlags {
            has_heating: true,
            ..Default::default()
        });

        // HDD 2500：尖峰係數 1.75，深夜 1.5 * 0.7
        let at_5 = hvac_overlay(HVAC_RULES, 1.0, Season::Winter, 5, &climate, &household);
        assert!((at_5 - (1.75 + 1.05)).abs() < 1e-12);

        let at_3 = hvac_overlay(HVAC_RULES, 1.0, Season::Winter, 3, &climate, &household);
        assert!((at_3 - 1.05).abs() < 1e-12);

        let at_12 = hvac_overlay(HVAC_RULES, 1.0, Season::Winter, 12, &climate, &household);
        assert_eq!(at_12, 0.0);
    }

    #[test]
    fn test_cooling_requires_flag_and_season() {
        let climate = ClimateResolver::profile_for_zone(5);
        let with_ac = inputs(HouseholdFlags {
            has_ac: true,
            ..Default::default()
        });
        let without_ac = inputs(HouseholdFlags::default());

        // CDD 1500：尖峰 1.375，肩峰 1.225 * 0.5
        let peak = hvac_overlay(HVAC_RULES, 2.0, Season::Summer, 15, &climate, &with_ac);
        assert!((peak - 2.75).abs() < 1e-12);
        let shoulder = hvac_overlay(HVAC_RULES, 2.0, Season::Summer, 19, &climate, &with_ac);
        assert!((shoulder - 1.225).abs() < 1e-12);

        assert_eq!(hvac_overlay(HVAC_RULES, 2.0, Season::Summer, 15, &climate, &without_ac), 0.0);
        assert_eq!(hvac_overlay(HVAC_RULES, 2.0, Season::Spring, 15, &climate, &with_ac), 0.0);
    }

    #[test]
    fn test_wfh_multiplier() {
        let wfh = inputs(HouseholdFlags {
            has_wfh: true,
            ..Default::default()
        });
        assert_eq!(wfh_multiplier(&wfh, DayType::Weekday, 9), 1.3);
        assert_eq!(wfh_multiplier(&wfh, DayType::Weekday, 16), 1.3);
        assert_eq!(wfh_multiplier(&wfh, DayType::Weekday, 17), 1.0);
        assert_eq!(wfh_multiplier(&wfh, DayType::Weekend, 12), 1.0);
        assert_eq!(wfh_multiplier(&inputs(HouseholdFlags::default()), DayType::Weekday, 12), 1.0);
    }

    #[test]
    fn test_ev_windows() {
        let model = EvChargingModel::default();
        // StepRng(0, 0) 永遠抽到 0，每次都通過
        let mut always = StepRng::new(0, 0);
        // StepRng(MAX, 0) 在 p < 1 時永遠不通過
        let mut never = StepRng::new(u64::MAX, 0);

        assert_eq!(model.charging_kw(19, DayType::Weekday, &mut always), 7.0);
        assert_eq!(model.charging_kw(19, DayType::Weekend, &mut always), 0.0);
        assert_eq!(model.charging_kw(23, DayType::Weekend, &mut always), 7.0);
        assert_eq!(model.charging_kw(3, DayType::Weekday, &mut always), 7.0);
        assert_eq!(model.charging_kw(6, DayType::Weekday, &mut always), 0.0);
        assert_eq!(model.charging_kw(12, DayType::Weekday, &mut always), 0.0);

        assert_eq!(model.charging_kw(19, DayType::Weekday, &mut never), 0.0);
        assert_eq!(model.charging_kw(23, DayType::Weekday, &mut never), 0.0);
    }

    #[test]
    fn test_ev_overnight_rate_is_roughly_eighty_percent() {
        let model = EvChargingModel::default();
        let mut rng = StdRng::seed_from_u64(7);
        let draws = 20_000;
        let hits = (0..draws)
            .filter(|_| model.charging_kw(1, DayType::Weekend, &mut rng) > 0.0)
            .count();
        let rate = hits as f64 / draws as f64;
        assert!((rate - 0.8).abs() < 0.02, "overnight rate {rate}");
    }

    #[test]
    fn test_charging_window_rejects_bad_probability() {
        for probability in [-0.1, 1.5, f64::NAN] {
            let err = ChargingWindow::new(vec![18..22], true, probability).unwrap_err();
            assert!(matches!(err, ProfileError::InvalidConfigValueError { ref field, .. } if field == "ev.probability"));
        }
        assert!(ChargingWindow::new(vec![0..6], false, 1.0).is_ok());
        assert!(ChargingWindow::new(vec![22..25], false, 0.5).is_err());
        assert!(ChargingWindow::new(vec![6..6], false, 0.5).is_err());
    }

    #[test]
    fn test_custom_model_charges_with_its_own_rate() {
        let evening = ChargingWindow::new(vec![18..22], true, 1.0).unwrap();
        let overnight = ChargingWindow::new(vec![0..6], false, 0.0).unwrap();
        let model = EvChargingModel::new(11.0, evening, overnight).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(model.rate_kw(), 11.0);
        assert_eq!(model.charging_kw(19, DayType::Weekday, &mut rng), 11.0);
        assert_eq!(model.charging_kw(3, DayType::Weekday, &mut rng), 0.0);

        let default_window = ChargingWindow::new(vec![18..22], true, 0.6).unwrap();
        assert!(EvChargingModel::new(-1.0, default_window.clone(), default_window).is_err());
    }
}
