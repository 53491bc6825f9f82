use demand_profile::core::encoder::{read_usage_rows, IntervalSeriesEncoder, GREEN_BUTTON_HEADER};
use demand_profile::{HouseholdFlags, ProfileGenerator, UserInputs};
use tempfile::TempDir;

fn sample_series() -> demand_profile::domain::model::IntervalSeries {
    let inputs = UserInputs::new(
        "30301",
        11_000.0,
        HouseholdFlags {
            has_ac: true,
            has_ev: true,
            ..Default::default()
        },
    )
    .unwrap();
    ProfileGenerator::new()
        .generate_seeded(&inputs, Some(11))
        .unwrap()
}

#[test]
fn test_export_round_trip_preserves_energy() {
    let series = sample_series();
    let bytes = IntervalSeriesEncoder.encode_to_vec(&series).unwrap();

    let text = String::from_utf8(bytes.clone()).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(header, GREEN_BUTTON_HEADER.join(","));
    assert_eq!(text.lines().count(), 35_041);

    let rows = read_usage_rows(bytes.as_slice()).unwrap();
    assert_eq!(rows.len(), 35_040);

    // 每列四捨五入到 6 位小數
    let total: f64 = rows.iter().map(|row| row.usage_kwh).sum();
    assert!((total - 11_000.0).abs() < 0.05, "total {total}");

    let first = &rows[0];
    assert_eq!(first.date.to_string(), "2024-01-01");
    assert_eq!(first.time, "00:00");
    let last = &rows[rows.len() - 1];
    assert_eq!(last.date.to_string(), "2024-12-30");
    assert_eq!(last.time, "23:45");
}

#[test]
fn test_usage_is_interval_energy_not_power() {
    let series = sample_series();
    let rows = read_usage_rows(IntervalSeriesEncoder.encode_to_vec(&series).unwrap().as_slice()).unwrap();

    for (record, row) in series.iter().zip(&rows).take(500) {
        assert!((row.usage_kwh - record.kw / 4.0).abs() < 6e-7);
    }
}

#[test]
fn test_export_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("profile.csv");

    IntervalSeriesEncoder
        .encode_to_path(&sample_series(), &path)
        .unwrap();

    let rows = read_usage_rows(std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(rows.len(), 35_040);
    assert!(rows.iter().all(|row| row.usage_kwh >= 0.0));
}
