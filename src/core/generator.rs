//! 整年 15 分鐘負載曲線產生
//!
//! 分兩階段：第一階段由基礎曲線與各項調整算出每小時數值，複製到該小時的四個 15 分鐘，
//! 再加上每個間隔的電動車抽樣；第二階段縮放全部資料，使總用電量等於輸入的年用電量。

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::climate::ClimateResolver;
use crate::core::load_shape::BaseLoadShape;
use crate::core::overlay::{hvac_overlay, wfh_multiplier, EvChargingModel, HvacRule, HVAC_RULES};
use crate::domain::model::{
    DayType, IntervalRecord, IntervalSeries, Season, UserInputs, DAYS_PER_YEAR,
    HOURS_PER_DAY, HOURS_PER_INTERVAL, INTERVALS_PER_HOUR, INTERVALS_PER_YEAR, INTERVAL_MINUTES,
};
use crate::utils::error::{ProfileError, Result};

/// 模擬年份的第一天
pub fn anchor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct ProfileGenerator {
    climate: ClimateResolver,
    load_shape: BaseLoadShape,
    hvac_rules: &'static [HvacRule],
    ev_model: EvChargingModel,
}

impl Default for ProfileGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileGenerator {
    pub fn new() -> Self {
        Self {
            climate: ClimateResolver::new(),
            load_shape: BaseLoadShape::default(),
            hvac_rules: HVAC_RULES,
            ev_model: EvChargingModel::default(),
        }
    }

    /// 替換基礎負載曲線 (例如改用實測資料)
    pub fn with_load_shape(mut self, load_shape: BaseLoadShape) -> Self {
        self.load_shape = load_shape;
        self
    }

    pub fn with_ev_model(mut self, ev_model: EvChargingModel) -> Self {
        self.ev_model = ev_model;
        self
    }

    /// 用指定種子的 `StdRng` 產生；`seed` 為 `None` 時使用隨機種子
    pub fn generate_seeded(&self, inputs: &UserInputs, seed: Option<u64>) -> Result<IntervalSeries> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.generate(inputs, &mut rng)
    }

    /// 產生正規化後的整年資料；`rng` 只用於電動車充電抽樣
    pub fn generate<R: Rng + ?Sized>(&self, inputs: &UserInputs, rng: &mut R) -> Result<IntervalSeries> {
        let mut series = self.shape_pass(inputs, rng);
        self.normalize(&mut series, inputs.annual_kwh())?;

        tracing::debug!(
            "Generated {} intervals, peak {:.3} kW, total {:.3} kWh",
            series.len(),
            series.peak_kw(),
            series.total_kwh()
        );

        Ok(series)
    }

    fn shape_pass<R: Rng + ?Sized>(&self, inputs: &UserInputs, rng: &mut R) -> IntervalSeries {
        let climate = self.climate.resolve(inputs.postal_code());
        let avg_hourly_kw = inputs.annual_kwh() / f64::from(DAYS_PER_YEAR) / f64::from(HOURS_PER_DAY);
        let start = anchor_date();

        let mut records = Vec::with_capacity(INTERVALS_PER_YEAR as usize);

        for day in 0..DAYS_PER_YEAR {
            let date = start + Duration::days(i64::from(day));
            let day_type = DayType::from_date(date);
            let season = Season::from_date(date);
            let shape = self.load_shape.for_day(day_type);

            for hour in 0..HOURS_PER_DAY {
                let base_kw = avg_hourly_kw * shape[hour as usize];
                let mut hourly_kw =
                    base_kw + hvac_overlay(self.hvac_rules, base_kw, season, hour, &climate, inputs);
                hourly_kw *= wfh_multiplier(inputs, day_type, hour);

                for quarter in 0..INTERVALS_PER_HOUR {
                    let mut kw = hourly_kw;
                    if inputs.has_ev() {
                        kw += self.ev_model.charging_kw(hour, day_type, rng);
                    }

                    records.push(IntervalRecord {
                        date,
                        hour,
                        minute: quarter * INTERVAL_MINUTES,
                        kw: kw.max(0.0),
                    });
                }
            }
        }

        IntervalSeries::new(records)
    }

    /// 將整年用電量縮放到使用者輸入的年用電量
    fn normalize(&self, series: &mut IntervalSeries, annual_kwh: f64) -> Result<()> {
        let total_kwh: f64 = series.iter().map(|r| r.kw * HOURS_PER_INTERVAL).sum();

        if total_kwh == 0.0 || !total_kwh.is_finite() {
            return Err(ProfileError::DegenerateProfile { total_kwh });
        }

        let factor = annual_kwh / total_kwh;
        tracing::debug!(
            "Normalizing {:.3} kWh to {:.3} kWh (factor {:.6})",
            total_kwh,
            annual_kwh,
            factor
        );

        for record in series.records_mut() {
            record.kw *= factor;
        }

        Ok(())
    }
}
