//! 住宅用電的每小時相對負載表

use crate::domain::model::DayType;

/// 平日：深夜低、早上小高峰、19:00 傍晚尖峰
pub const WEEKDAY_SHAPE: [f64; 24] = [
    0.4, 0.35, 0.35, 0.35, 0.35, 0.4, // 00-05
    0.5, 0.7, 0.8, 0.6, 0.55, 0.55, // 06-11
    0.6, 0.6, 0.65, 0.7, 0.75, 0.85, // 12-17
    1.0, 1.1, 1.0, 0.9, 0.75, 0.6, // 18-23
];

/// 週末：下午到傍晚較平緩的高原
pub const WEEKEND_SHAPE: [f64; 24] = [
    0.4, 0.35, 0.35, 0.35, 0.35, 0.4, // 00-05
    0.45, 0.5, 0.6, 0.7, 0.75, 0.8, // 06-11
    0.85, 0.85, 0.9, 0.95, 1.0, 1.05, // 12-17
    1.1, 1.15, 1.05, 0.95, 0.8, 0.65, // 18-23
];

/// 平日與週末的 小時 → 係數 對照表
#[derive(Debug, Clone, PartialEq)]
pub struct BaseLoadShape {
    pub weekday: [f64; 24],
    pub weekend: [f64; 24],
}

impl BaseLoadShape {
    pub fn for_day(&self, day_type: DayType) -> &[f64; 24] {
        match day_type {
            DayType::Weekday => &self.weekday,
            DayType::Weekend => &self.weekend,
        }
    }
}

impl Default for BaseLoadShape {
    fn default() -> Self {
        BaseLoadShapeProvider.shape()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BaseLoadShapeProvider;

impl BaseLoadShapeProvider {
    pub fn weekday_shape(&self) -> &'static [f64; 24] {
        &WEEKDAY_SHAPE
    }

    pub fn weekend_shape(&self) -> &'static [f64; 24] {
        &WEEKEND_SHAPE
    }

    pub fn shape(&self) -> BaseLoadShape {
        BaseLoadShape {
            weekday: WEEKDAY_SHAPE,
            weekend: WEEKEND_SHAPE,
        }
    }
}
