//! Green Button 格式 `Date,Time,Usage` 輸出
//!
//! 一列標題，之後每個間隔一列 (依時間排序)。Usage 是該間隔的 kWh，固定六位小數。

use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::domain::model::IntervalSeries;
use crate::utils::error::Result;

pub const GREEN_BUTTON_HEADER: [&str; 3] = ["Date", "Time", "Usage"];

#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalSeriesEncoder;

impl IntervalSeriesEncoder {
    /// 寫入任意 sink；寫入失敗會回傳
    /// [`ProfileError::EncodingError`](crate::utils::error::ProfileError::EncodingError)
    pub fn encode<W: Write>(&self, series: &IntervalSeries, sink: W) -> Result<W> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b',')
            .quote(b'"')
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(sink);

        writer.write_record(GREEN_BUTTON_HEADER)?;

        for record in series {
            writer.write_record([
                record.date.format("%Y-%m-%d").to_string(),
                record.time_label(),
                format!("{:.6}", record.kwh()),
            ])?;
        }

        writer.flush().map_err(csv::Error::from)?;
        let sink = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;

        tracing::debug!("Encoded {} interval rows", series.len());
        Ok(sink)
    }

    pub fn encode_to_vec(&self, series: &IntervalSeries) -> Result<Vec<u8>> {
        self.encode(series, Vec::with_capacity(series.len() * 28 + 16))
    }

    /// 直接寫入檔案；檔案在任何結束路徑上都會被關閉
    pub fn encode_to_path<P: AsRef<Path>>(&self, series: &IntervalSeries, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let file = self.encode(series, file)?;
        file.sync_all()?;
        Ok(())
    }
}

/// 解碼後的 `Date,Time,Usage` 一列
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UsageRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Usage")]
    pub usage_kwh: f64,
}

/// 把 Green Button 資料讀回成型別化的列
pub fn read_usage_rows<R: Read>(source: R) -> Result<Vec<UsageRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(source);

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::IntervalRecord;
    use crate::utils::error::ProfileError;

    fn sample_series() -> IntervalSeries {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        IntervalSeries::new(vec![
            IntervalRecord { date, hour: 0, minute: 0, kw: 0.493824 },
            IntervalRecord { date, hour: 0, minute: 15, kw: 0.476 },
            IntervalRecord { date, hour: 13, minute: 45, kw: 2.0 },
        ])
    }

    #[test]
    fn test_encode_exact_layout() {
        let bytes = IntervalSeriesEncoder.encode_to_vec(&sample_series()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "Date,Time,Usage\n2024-01-01,00:00,0.123456\n2024-01-01,00:15,0.119000\n2024-01-01,13:45,0.500000\n"
        );
    }

    #[test]
    fn test_read_usage_rows() {
        let bytes = IntervalSeriesEncoder.encode_to_vec(&sample_series()).unwrap();
        let rows = read_usage_rows(bytes.as_slice()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].time, "13:45");
        assert_eq!(rows[2].usage_kwh, 0.5);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[derive(Debug)]
    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_is_propagated() {
        let err = IntervalSeriesEncoder
            .encode(&sample_series(), FailingSink)
            .unwrap_err();
        assert!(matches!(err, ProfileError::EncodingError(_)));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_encode_to_missing_directory_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("profile.csv");
        let err = IntervalSeriesEncoder
            .encode_to_path(&sample_series(), &path)
            .unwrap_err();
        assert!(matches!(err, ProfileError::IoError(_)));
    }
}
