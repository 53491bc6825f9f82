use crate::domain::model::{IntervalSeries, Season, SeasonalAverages};

/// 將間隔資料彙整為各季節每小時的平均 kW
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonalAggregator;

impl SeasonalAggregator {
    pub fn aggregate(&self, series: &IntervalSeries) -> SeasonalAverages {
        let mut sums = [[0.0_f64; 24]; 4];
        let mut counts = [[0_u32; 24]; 4];

        for record in series {
            let season = Season::from_date(record.date);
            let hour = record.hour as usize;
            if hour >= 24 {
                tracing::warn!("Skipping record with hour {} on {}", record.hour, record.date);
                continue;
            }
            sums[season.index()][hour] += record.kw;
            counts[season.index()][hour] += 1;
        }

        let mut averages = SeasonalAverages::default();
        for season in Season::ALL {
            let i = season.index();
            let hourly = averages.hourly_mut(season);
            for hour in 0..24 {
                // 沒有資料的時段平均值為 0
                if counts[i][hour] > 0 {
                    hourly[hour] = sums[i][hour] / f64::from(counts[i][hour]);
                }
            }
        }

        averages
    }
}
