//! Shared code for checking a demo model's CSV outputs against saved results.
use csv::StringRecord;
use float_cmp::approx_eq;
use std::fs::read_dir;
use std::path::{Path, PathBuf};
use tariffsim::cli::RunOpts;
use tariffsim::cli::example::handle_example_run_command;
use tariffsim::settings::Settings;
use tempfile::tempdir;

const FLOAT_CMP_TOLERANCE: f64 = 1e-10;

/// Run the named demo and compare its CSV outputs with those in `tests/data/<name>`
pub fn run_regression_test(example_name: &str) {
    unsafe { std::env::set_var("TARIFFSIM_LOG_LEVEL", "off") };

    let output_dir = tempdir().unwrap();
    let opts = RunOpts {
        output_dir: Some(output_dir.path().to_path_buf()),
        ..Default::default()
    };
    handle_example_run_command(example_name, &opts, Some(Settings::default())).unwrap();

    let expected_dir = PathBuf::from("tests/data").join(example_name);
    let file_names = csv_file_names(&expected_dir);
    assert_eq!(
        csv_file_names(output_dir.path()),
        file_names,
        "Output files differ"
    );

    let errors: Vec<_> = file_names
        .iter()
        .flat_map(|name| compare_csv(&output_dir.path().join(name), &expected_dir.join(name)))
        .collect();
    assert!(
        errors.is_empty(),
        "Results for {example_name} differ:\n  * {}",
        errors.join("\n  * ")
    );
}

/// Sorted names of the CSV files in `dir`
fn csv_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .filter(|name| name.ends_with(".csv"))
        .collect();
    names.sort();
    names
}

fn read_records(path: &Path) -> (StringRecord, Vec<StringRecord>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().clone();
    let records = reader.records().map(Result::unwrap).collect();
    (headers, records)
}

/// Describe every difference between two CSV files
fn compare_csv(actual_path: &Path, expected_path: &Path) -> Vec<String> {
    let file_name = expected_path.file_name().unwrap().to_string_lossy();
    let (actual_headers, actual) = read_records(actual_path);
    let (expected_headers, expected) = read_records(expected_path);

    if actual_headers != expected_headers {
        return vec![format!(
            "{file_name}: columns {actual_headers:?} instead of {expected_headers:?}"
        )];
    }

    let mut errors = Vec::new();
    if actual.len() != expected.len() {
        errors.push(format!(
            "{file_name}: {} rows instead of {}",
            actual.len(),
            expected.len()
        ));
    }

    for (row, (actual, expected)) in actual.iter().zip(&expected).enumerate() {
        for ((column, a), e) in expected_headers.iter().zip(actual).zip(expected) {
            if !fields_match(a, e) {
                errors.push(format!("{file_name}: row {row}, {column}: got {a}, expected {e}"));
            }
        }
    }

    errors
}

/// Compare numeric fields with a tolerance and anything else exactly
fn fields_match(actual: &str, expected: &str) -> bool {
    match (actual.parse::<f64>(), expected.parse::<f64>()) {
        (Ok(a), Ok(e)) => approx_eq!(f64, a, e, epsilon = FLOAT_CMP_TOLERANCE),
        _ => actual == expected,
    }
}
