use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::error::Result;
use crate::utils::validation::{validate_annual_kwh, validate_postal_code};

/// 15 分鐘間隔的設定
pub const INTERVAL_MINUTES: u32 = 15;
pub const INTERVALS_PER_HOUR: u32 = 60 / INTERVAL_MINUTES;
pub const HOURS_PER_DAY: u32 = 24;
pub const DAYS_PER_YEAR: u32 = 365;
pub const INTERVALS_PER_DAY: u32 = INTERVALS_PER_HOUR * HOURS_PER_DAY;
pub const INTERVALS_PER_YEAR: u32 = INTERVALS_PER_DAY * DAYS_PER_YEAR;

/// kW 換算成單一間隔 kWh 的時數 (0.25 h)
pub const HOURS_PER_INTERVAL: f64 = INTERVAL_MINUTES as f64 / 60.0;

/// 本工具產生的 CSV 檔名前綴，清理舊檔時只認這個前綴
pub const GENERATED_CSV_PREFIX: &str = "demand_profile_";

/// 影響負載曲線的家庭設備旗標
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdFlags {
    pub has_ac: bool,
    pub has_heating: bool,
    pub has_wfh: bool,
    pub has_ev: bool,
}

/// 已驗證的產生參數；欄位私有，只能透過 [`UserInputs::new`] 建立
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserInputs {
    postal_code: String,
    annual_kwh: f64,
    flags: HouseholdFlags,
}

impl UserInputs {
    pub fn new(postal_code: &str, annual_kwh: f64, flags: HouseholdFlags) -> Result<Self> {
        let postal_code = validate_postal_code(postal_code)?;
        let annual_kwh = validate_annual_kwh(annual_kwh)?;

        Ok(Self {
            postal_code,
            annual_kwh,
            flags,
        })
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn annual_kwh(&self) -> f64 {
        self.annual_kwh
    }

    pub fn flags(&self) -> HouseholdFlags {
        self.flags
    }

    pub fn has_ac(&self) -> bool {
        self.flags.has_ac
    }

    pub fn has_heating(&self) -> bool {
        self.flags.has_heating
    }

    pub fn has_wfh(&self) -> bool {
        self.flags.has_wfh
    }

    pub fn has_ev(&self) -> bool {
        self.flags.has_ev
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// 3-5 月春、6-8 月夏、9-11 月秋，其餘為冬
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_month(date.month())
    }

    pub fn index(self) -> usize {
        match self {
            Season::Spring => 0,
            Season::Summer => 1,
            Season::Fall => 2,
            Season::Winter => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => DayType::Weekend,
            _ => DayType::Weekday,
        }
    }

    pub fn is_weekday(self) -> bool {
        self == DayType::Weekday
    }
}

/// 由郵遞區號推得的粗略氣候資料
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateProfile {
    pub zone: u8,
    /// 季節平均溫度 (°F)，以 [`Season::index`] 為索引
    pub seasonal_avg_temp: [f64; 4],
    pub cooling_degree_days: f64,
    pub heating_degree_days: f64,
}

impl ClimateProfile {
    pub fn avg_temp(&self, season: Season) -> f64 {
        self.seasonal_avg_temp[season.index()]
    }
}

/// 一筆 15 分鐘功率資料
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntervalRecord {
    pub date: NaiveDate,
    pub hour: u32,
    pub minute: u32,
    pub kw: f64,
}

impl IntervalRecord {
    /// 此間隔的用電量 (kWh)
    pub fn kwh(&self) -> f64 {
        self.kw * HOURS_PER_INTERVAL
    }

    pub fn season(&self) -> Season {
        Season::from_date(self.date)
    }

    pub fn day_type(&self) -> DayType {
        DayType::from_date(self.date)
    }

    pub fn time_label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

/// 依時間排序的整年間隔資料
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntervalSeries {
    records: Vec<IntervalRecord>,
}

impl IntervalSeries {
    pub fn new(records: Vec<IntervalRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[IntervalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IntervalRecord> {
        self.records.iter()
    }

    pub fn total_kwh(&self) -> f64 {
        self.records.iter().map(IntervalRecord::kwh).sum()
    }

    pub fn peak_kw(&self) -> f64 {
        self.records.iter().map(|r| r.kw).fold(0.0, f64::max)
    }

    pub(crate) fn records_mut(&mut self) -> &mut [IntervalRecord] {
        &mut self.records
    }
}

impl<'a> IntoIterator for &'a IntervalSeries {
    type Item = &'a IntervalRecord;
    type IntoIter = std::slice::Iter<'a, IntervalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// 各季節每小時平均 kW，每季固定 24 筆
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalAverages {
    pub spring: [f64; 24],
    pub summer: [f64; 24],
    pub fall: [f64; 24],
    pub winter: [f64; 24],
}

impl SeasonalAverages {
    pub fn hourly(&self, season: Season) -> &[f64; 24] {
        match season {
            Season::Spring => &self.spring,
            Season::Summer => &self.summer,
            Season::Fall => &self.fall,
            Season::Winter => &self.winter,
        }
    }

    pub(crate) fn hourly_mut(&mut self, season: Season) -> &mut [f64; 24] {
        match season {
            Season::Spring => &mut self.spring,
            Season::Summer => &mut self.summer,
            Season::Fall => &mut self.fall,
            Season::Winter => &mut self.winter,
        }
    }

    pub fn get(&self, season: Season, hour: usize) -> Option<f64> {
        self.hourly(season).get(hour).copied()
    }

    /// 全部 96 個 (季節, 小時, 平均 kW)
    pub fn iter(&self) -> impl Iterator<Item = (Season, usize, f64)> + '_ {
        Season::ALL.into_iter().flat_map(move |season| {
            self.hourly(season)
                .iter()
                .enumerate()
                .map(move |(hour, kw)| (season, hour, *kw))
        })
    }

    pub fn max_kw(&self) -> f64 {
        self.iter().map(|(_, _, kw)| kw).fold(0.0, f64::max)
    }

    /// 圖表 Y 軸上限：最大平均值加 10% 後無條件進位
    pub fn chart_ceiling_kw(&self) -> f64 {
        (self.max_kw() * 1.1).ceil()
    }
}

/// 與 CSV 一起輸出的圖表資料
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub inputs: UserInputs,
    pub zone: u8,
    pub total_kwh: f64,
    pub peak_kw: f64,
    pub chart_ceiling_kw: f64,
    pub seasonal_averages: SeasonalAverages,
}

/// transform 階段的輸出，交給 load 階段寫檔
#[derive(Debug, Clone)]
pub struct ProfileResult {
    pub inputs: UserInputs,
    pub series: IntervalSeries,
    pub seasonal: SeasonalAverages,
    pub csv_output: Vec<u8>,
    pub summary_json: Option<String>,
}
