//! Request-level tests with a scripted fetcher.
//!
//! The fetcher hands back generated median files and records every
//! (url, filename) it is asked for, so these tests run without a network.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use ocads_client::{ClientConfig, ClientError, FetchError, Fetcher, OcadsClient};
use ocads_common::{OcadsError, Scenario, Variable};
use test_utils::{write_median_file, MedianFileSpec};

const BASE: &str = "https://archive.test/median/";
const MIRROR: &str = "https://mirror.test/download/fixed/";

#[derive(Debug, Clone)]
enum Outcome {
    File(PathBuf),
    ReadTimeout,
    Status(u16),
}

#[derive(Default)]
struct ScriptedFetcher {
    outcomes: HashMap<(String, String), Outcome>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedFetcher {
    fn on(mut self, url: &str, filename: &str, outcome: Outcome) -> Self {
        self.outcomes
            .insert((url.to_string(), filename.to_string()), outcome);
        self
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str, filename: &str) -> Result<PathBuf, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), filename.to_string()));

        match self.outcomes.get(&(url.to_string(), filename.to_string())) {
            Some(Outcome::File(path)) => Ok(path.clone()),
            Some(Outcome::ReadTimeout) => Err(FetchError::ReadTimeout {
                url: url.to_string(),
            }),
            Some(Outcome::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

fn config() -> ClientConfig {
    ClientConfig::default()
        .with_base_url(BASE)
        .with_mirror_url(MIRROR)
}

/// Write a median file for `variable` whose data variable uses the in-file name.
fn fixture(dir: &Path, variable: Variable, scenario: Scenario) -> PathBuf {
    let path = dir.join(format!("{}_median_{}.nc", variable, scenario));
    let spec = MedianFileSpec::new(variable.file_variable_name()).with_shape(1, 2, 2);
    write_median_file(&path, &spec).unwrap();
    path
}

fn primary(variable: Variable, scenario: Scenario) -> (String, String) {
    let filename = format!("{}_median_{}.nc", variable, scenario);
    (format!("{BASE}{filename}"), filename)
}

// ============================================================================
// Single-pair requests
// ============================================================================

#[tokio::test]
async fn test_every_pair_fetches_expected_file() {
    let dir = tempfile::tempdir().unwrap();

    for variable in Variable::ALL {
        for scenario in Scenario::ALL {
            let (url, filename) = primary(variable, scenario);
            let path = fixture(dir.path(), variable, scenario);
            let fetcher = ScriptedFetcher::default().on(&url, &filename, Outcome::File(path));
            let client = OcadsClient::with_fetcher(fetcher, config());

            let data = client
                .download(variable.as_str(), scenario.as_str())
                .await
                .unwrap();

            assert_eq!(data.variables(), vec![variable]);
            assert_eq!(data.scenarios(variable), vec![scenario]);
            assert_eq!(client.fetcher().calls(), vec![(url, filename)]);

            let array = data.get(variable, scenario).unwrap();
            assert_eq!(array.name, variable.file_variable_name());
        }
    }
}

#[tokio::test]
async fn test_string_and_single_element_list_are_equivalent() {
    let dir = tempfile::tempdir().unwrap();
    let (url, filename) = primary(Variable::PHT, Scenario::Ssp126);
    let path = fixture(dir.path(), Variable::PHT, Scenario::Ssp126);

    let as_string = OcadsClient::with_fetcher(
        ScriptedFetcher::default().on(&url, &filename, Outcome::File(path.clone())),
        config(),
    );
    let as_list = OcadsClient::with_fetcher(
        ScriptedFetcher::default().on(&url, &filename, Outcome::File(path)),
        config(),
    );

    let a = as_string.download("pHT", "ssp126").await.unwrap();
    let b = as_list.download(vec!["pHT"], vec!["ssp126"]).await.unwrap();

    assert_eq!(a.variables(), b.variables());
    assert_eq!(a.scenarios(Variable::PHT), b.scenarios(Variable::PHT));
    assert_eq!(as_string.fetcher().calls(), as_list.fetcher().calls());
}

// ============================================================================
// Validation happens before any fetch
// ============================================================================

#[tokio::test]
async fn test_unknown_variable_fails_without_fetching() {
    let client = OcadsClient::with_fetcher(ScriptedFetcher::default(), config());

    let err = client
        .download(vec!["pHT", "Oxygen"], "historical")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::InvalidRequest(OcadsError::UnknownVariable { ref name, .. }) if name == "Oxygen"
    ));
    assert!(client.fetcher().calls().is_empty());
}

#[tokio::test]
async fn test_unknown_scenario_fails_without_fetching() {
    let client = OcadsClient::with_fetcher(ScriptedFetcher::default(), config());

    let err = client
        .download("pHT", vec!["historical", "rcp85"])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::InvalidRequest(OcadsError::UnknownScenario { ref name, .. }) if name == "rcp85"
    ));
    assert!(client.fetcher().calls().is_empty());
}

// ============================================================================
// Extraction
// ============================================================================

#[tokio::test]
async fn test_temperature_extracts_lowercase_array() {
    let dir = tempfile::tempdir().unwrap();
    let (url, filename) = primary(Variable::Temperature, Scenario::Historical);
    let path = fixture(dir.path(), Variable::Temperature, Scenario::Historical);

    let client = OcadsClient::with_fetcher(
        ScriptedFetcher::default().on(&url, &filename, Outcome::File(path)),
        config(),
    );
    let data = client.download(["Temperature"], "historical").await.unwrap();

    let array = data.get(Variable::Temperature, Scenario::Historical).unwrap();
    assert_eq!(array.name, "temperature");
}

#[tokio::test]
async fn test_missing_array_is_a_dataset_error() {
    let dir = tempfile::tempdir().unwrap();
    let (url, filename) = primary(Variable::Temperature, Scenario::Ssp370);
    let path = dir.path().join(&filename);
    // Array stored under the request identifier instead of the in-file name.
    write_median_file(&path, &MedianFileSpec::new("Temperature")).unwrap();

    let client = OcadsClient::with_fetcher(
        ScriptedFetcher::default().on(&url, &filename, Outcome::File(path)),
        config(),
    );
    let err = client.download("Temperature", "ssp370").await.unwrap_err();

    assert!(matches!(err, ClientError::Dataset { ref filename, .. } if filename == "Temperature_median_ssp370.nc"));
}

// ============================================================================
// Mirror fallback
// ============================================================================

#[tokio::test]
async fn test_read_timeout_tries_mirror_once_with_same_filename() {
    let dir = tempfile::tempdir().unwrap();
    let (url, filename) = primary(Variable::DIC, Scenario::Ssp245);
    let path = fixture(dir.path(), Variable::DIC, Scenario::Ssp245);

    let fetcher = ScriptedFetcher::default()
        .on(&url, &filename, Outcome::ReadTimeout)
        .on(MIRROR, &filename, Outcome::File(path));
    let client = OcadsClient::with_fetcher(fetcher, config());

    let data = client.download("DIC", "ssp245").await.unwrap();
    assert!(data.get(Variable::DIC, Scenario::Ssp245).is_some());
    assert_eq!(
        client.fetcher().calls(),
        vec![(url, filename.clone()), (MIRROR.to_string(), filename)]
    );
}

#[tokio::test]
async fn test_mirror_failure_propagates() {
    let (url, filename) = primary(Variable::RF, Scenario::Ssp119);
    let fetcher = ScriptedFetcher::default()
        .on(&url, &filename, Outcome::ReadTimeout)
        .on(MIRROR, &filename, Outcome::Status(502));
    let client = OcadsClient::with_fetcher(fetcher, config());

    let err = client.download("RF", "ssp119").await.unwrap_err();
    match err {
        ClientError::Fetch { filename: f, source } => {
            assert_eq!(f, filename);
            assert!(matches!(source, FetchError::Status { status: 502, ref url } if url == MIRROR));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(client.fetcher().calls().len(), 2);
}

#[tokio::test]
async fn test_mirror_timeout_is_not_retried() {
    let (url, filename) = primary(Variable::H, Scenario::Historical);
    let fetcher = ScriptedFetcher::default()
        .on(&url, &filename, Outcome::ReadTimeout)
        .on(MIRROR, &filename, Outcome::ReadTimeout);
    let client = OcadsClient::with_fetcher(fetcher, config());

    let err = client.download("H", "historical").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Fetch { source: FetchError::ReadTimeout { .. }, .. }
    ));
    assert_eq!(client.fetcher().calls().len(), 2);
}

#[tokio::test]
async fn test_other_failures_skip_mirror() {
    let (url, filename) = primary(Variable::Hfree, Scenario::Ssp585);
    let fetcher = ScriptedFetcher::default().on(&url, &filename, Outcome::Status(500));
    let client = OcadsClient::with_fetcher(fetcher, config());

    let err = client.download("Hfree", "ssp585").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Fetch { source: FetchError::Status { status: 500, .. }, .. }
    ));
    assert_eq!(client.fetcher().calls(), vec![(url, filename)]);
}

// ============================================================================
// Assembly
// ============================================================================

#[tokio::test]
async fn test_two_by_two_request_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut fetcher = ScriptedFetcher::default();
    for variable in [Variable::Aragonite, Variable::Salinity] {
        for scenario in [Scenario::Historical, Scenario::Ssp585] {
            let (url, filename) = primary(variable, scenario);
            let path = fixture(dir.path(), variable, scenario);
            fetcher = fetcher.on(&url, &filename, Outcome::File(path));
        }
    }
    let client = OcadsClient::with_fetcher(fetcher, config());

    let data = client
        .download(["Aragonite", "Salinity"], ["historical", "ssp585"])
        .await
        .unwrap();

    assert_eq!(data.variables(), vec![Variable::Aragonite, Variable::Salinity]);
    for variable in data.variables() {
        assert_eq!(
            data.scenarios(variable),
            vec![Scenario::Historical, Scenario::Ssp585]
        );
    }
    let filenames: Vec<String> = client.fetcher().calls().into_iter().map(|(_, f)| f).collect();
    assert_eq!(
        filenames,
        vec![
            "Aragonite_median_historical.nc",
            "Aragonite_median_ssp585.nc",
            "Salinity_median_historical.nc",
            "Salinity_median_ssp585.nc",
        ]
    );
}

#[tokio::test]
async fn test_duplicates_are_fetched_again() {
    let dir = tempfile::tempdir().unwrap();
    let (url, filename) = primary(Variable::CO3, Scenario::Ssp126);
    let path = fixture(dir.path(), Variable::CO3, Scenario::Ssp126);
    let client = OcadsClient::with_fetcher(
        ScriptedFetcher::default().on(&url, &filename, Outcome::File(path)),
        config(),
    );

    let data = client
        .download(["CO3", "CO3"], ["ssp126", "ssp126"])
        .await
        .unwrap();

    assert_eq!(data.len(), 1);
    assert_eq!(data.scenarios(Variable::CO3), vec![Scenario::Ssp126]);
    assert_eq!(client.fetcher().calls().len(), 4);
}

#[tokio::test]
async fn test_first_failure_stops_the_call() {
    let dir = tempfile::tempdir().unwrap();
    let (ok_url, ok_name) = primary(Variable::TA, Scenario::Historical);
    let (bad_url, bad_name) = primary(Variable::TA, Scenario::Ssp119);
    let path = fixture(dir.path(), Variable::TA, Scenario::Historical);

    let fetcher = ScriptedFetcher::default()
        .on(&ok_url, &ok_name, Outcome::File(path))
        .on(&bad_url, &bad_name, Outcome::Status(403));
    let client = OcadsClient::with_fetcher(fetcher, config());

    let result = client
        .download("TA", ["historical", "ssp119", "ssp126"])
        .await;

    assert!(result.is_err());
    assert_eq!(client.fetcher().calls().len(), 2);
}
