//! End-to-end tests of the load -> select -> sample pipeline.

use std::io::Write;

use case_curves::app::pipeline::{run_selection, summarize_entities};
use case_curves::domain::{DEFAULT_SAMPLE_SIZE, TableSchema};
use case_curves::error::LoadError;
use case_curves::io::{load_table, load_table_from_reader};
use case_curves::series::{filter_entity, list_entities};
use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::NamedTempFile;

const SCENARIO: &str = "Entity,Code,Day,Biweekly cases\n\
Brazil,BRA,2020-01-01,140\n\
Brazil,BRA,2020-01-15,280\n\
France,FRA,2020-01-01,70\n";

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write csv");
    file
}

#[test]
fn scenario_from_file() {
    let file = write_csv(SCENARIO);
    let table = load_table(file.path(), &TableSchema::default()).expect("load table");
    assert_eq!(table.source.as_deref(), Some(file.path()));
    assert_eq!(list_entities(&table), vec!["Brazil", "France"]);

    let mut rng = StdRng::seed_from_u64(0);
    let brazil = run_selection(&table, "Brazil", DEFAULT_SAMPLE_SIZE, &mut rng);
    let series: Vec<(NaiveDate, f64)> = brazil.sample.iter().map(|p| (p.date, p.daily_cases)).collect();
    assert_eq!(series, vec![(date("2020-01-01"), 10.0), (date("2020-01-15"), 20.0)]);

    let germany = run_selection(&table, "Germany", DEFAULT_SAMPLE_SIZE, &mut rng);
    assert!(germany.sample.is_empty());
    assert_eq!(germany.stats.rows_matched, 0);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_table(std::path::Path::new("/definitely/not/here.csv"), &TableSchema::default()).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn missing_cases_column_fails_to_load() {
    let err = load_table_from_reader("Entity,Day\nBrazil,2020-01-01\n".as_bytes(), &TableSchema::default())
        .unwrap_err();
    assert!(matches!(err, LoadError::Schema { .. }));
}

#[test]
fn custom_schema_names() {
    let schema = TableSchema {
        entity: "country".to_string(),
        day: "date".to_string(),
        biweekly_cases: "cases_14d".to_string(),
    };
    let table = load_table_from_reader("date,country,cases_14d\n2021-05-01,Chile,28\n".as_bytes(), &schema)
        .expect("load with custom schema");
    let out = run_selection(&table, "Chile", 50, &mut StdRng::seed_from_u64(0));
    assert_eq!(out.sample[0].daily_cases, 2.0);
}

#[test]
fn unsorted_source_with_bad_dates() {
    let csv = "Entity,Day,Biweekly cases\n\
Peru,2021-03-01,42\n\
Peru,not-a-date,1\n\
Peru,2021-01-01,14\n\
Peru,2021-13-40,1\n\
Peru,,1\n\
Peru,2021-02-01,28\n";
    let table = load_table_from_reader(csv.as_bytes(), &TableSchema::default()).unwrap();

    let rows = filter_entity(&table, "Peru");
    assert_eq!(rows.len(), 6);

    let out = run_selection(&table, "Peru", 50, &mut StdRng::seed_from_u64(1));
    assert_eq!(out.stats.rows_matched, 6);
    assert_eq!(out.stats.dates_dropped, 3);
    assert_eq!(out.stats.series_len, 3);
    let values: Vec<f64> = out.sample.iter().map(|p| p.daily_cases).collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0]);
}

#[test]
fn long_series_is_sampled_down_in_order() {
    let mut csv = String::from("Entity,Day,Biweekly cases\n");
    let start = date("2020-03-01");
    for i in 0..1000 {
        let day = start + chrono::Duration::days(i);
        csv.push_str(&format!("India,{day},{}\n", i * 14));
    }
    let table = load_table_from_reader(csv.as_bytes(), &TableSchema::default()).unwrap();

    let out = run_selection(&table, "India", 50, &mut StdRng::seed_from_u64(2024));
    assert_eq!(out.sample.len(), 50);
    assert_eq!(out.stats.series_len, 1000);
    assert!(out.sample.windows(2).all(|w| w[0].date < w[1].date));
    // Each point keeps its source row's rate.
    for p in &out.sample {
        let offset = (p.date - start).num_days() as f64;
        assert_eq!(p.daily_cases, offset);
    }

    let again = run_selection(&table, "India", 50, &mut StdRng::seed_from_u64(2024));
    assert_eq!(out.sample, again.sample);
}

#[test]
fn summary_matches_individual_selections() {
    let table = load_table_from_reader(SCENARIO.as_bytes(), &TableSchema::default()).unwrap();
    let summary = summarize_entities(&table);
    assert_eq!(summary.len(), 2);

    for row in &summary {
        let out = run_selection(&table, &row.entity, usize::MAX, &mut StdRng::seed_from_u64(0));
        assert_eq!(row.rows, out.stats.rows_matched);
        assert_eq!(row.first_date, out.sample.first().map(|p| p.date));
        assert_eq!(row.last_date, out.sample.last().map(|p| p.date));
    }
}

#[test]
fn selection_serializes_for_renderers() {
    let table = load_table_from_reader(SCENARIO.as_bytes(), &TableSchema::default()).unwrap();
    let out = run_selection(&table, "France", 50, &mut StdRng::seed_from_u64(0));
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["entity"], "France");
    assert_eq!(json["sample"][0]["date"], "2020-01-01");
    assert_eq!(json["sample"][0]["daily_cases"], 5.0);
    assert_eq!(json["stats"]["rows_matched"], 1);
}
