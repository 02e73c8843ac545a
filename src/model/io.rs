//! Persistence boundary
//!
//! The dataset is serialized as the plain nested country map; runtime state
//! (age granularity) never hits the wire. Source adapters produce fragments
//! in the same shape, so loading a directory of per-source files is a glob
//! plus a merge.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::{debug, info, warn};

use crate::error::DataError;
use crate::model::dataset::Dataset;
use crate::model::types::CountryRecord;

type WireDataset = BTreeMap<String, CountryRecord>;

impl Dataset {
    pub(crate) fn from_json_file(path: &Path) -> Result<Self, DataError> {
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let countries: WireDataset =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| DataError::Json {
                path: path.display().to_string(),
                source,
            })?;
        debug!("Loaded {} countries from {}", countries.len(), path.display());
        Ok(Dataset::from_map(countries))
    }

    pub(crate) fn to_json_file(&self, path: &Path) -> Result<(), DataError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| DataError::Io {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }
        let file = File::create(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::to_writer(BufWriter::new(file), self.as_map()).map_err(|source| {
            DataError::Json {
                path: path.display().to_string(),
                source,
            }
        })
    }

    /// Loads and merges every fragment file matching `pattern` (a file path,
    /// a directory, or a glob). Fragments merge country→category→attribute;
    /// the first writer wins per attribute key.
    pub(crate) fn load_merged(pattern: &str) -> Result<Self, DataError> {
        let path = Path::new(pattern);
        if path.is_file() {
            return Self::from_json_file(path);
        }
        let expanded = if path.is_dir() {
            format!("{}/*.json", path.display())
        } else {
            pattern.to_string()
        };

        let mut dataset = Dataset::from_map(BTreeMap::new());
        let mut loaded = 0usize;
        if let Ok(entries) = glob::glob(&expanded) {
            for entry in entries.flatten() {
                match Self::from_json_file(&entry) {
                    Ok(fragment) => {
                        dataset.merge(fragment.into_map());
                        loaded += 1;
                    }
                    Err(e) => warn!("Skipping fragment {}: {e}", entry.display()),
                }
            }
        }
        if loaded == 0 {
            warn!("No dataset fragments matched {expanded}");
        } else {
            info!("Merged {loaded} dataset fragments from {expanded}");
        }
        Ok(dataset)
    }
}

/// Downloads a pre-serialized dataset JSON to `path`. This is the only
/// network touchpoint; it performs no retries and no adapter logic.
pub(crate) fn fetch_dataset(url: &str, path: &Path) -> Result<(), DataError> {
    let response = ureq::get(url).call().map_err(|e| DataError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let mut body = response.into_body();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| DataError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
    }
    let mut file = File::create(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    std::io::copy(&mut body.as_reader(), &mut file).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!("Fetched dataset from {url} to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{AttributeRecord, Category, Frequency, SeriesType};
    use std::collections::BTreeMap;

    fn write_fragment(dir: &Path, name: &str, country: &str, attr: &str, value: f64) {
        let json = serde_json::json!({
            country: {
                "COVID": {
                    attr: {
                        "ATTR_NAME": attr,
                        "SOURCE": "test",
                        "UNIT": "Number",
                        "FREQUENCY": "WEEKLY",
                        "SERIES_TYPE": "NEW",
                        "VALUE": {"2020W10": value}
                    }
                }
            }
        });
        std::fs::write(dir.join(name), serde_json::to_string(&json).unwrap()).unwrap();
    }

    #[test]
    fn round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.json");

        let record = AttributeRecord {
            name: "new_cases".to_string(),
            source: "test".to_string(),
            unit: "Number".to_string(),
            frequency: Some(Frequency::Weekly),
            series_type: Some(SeriesType::New),
            values: BTreeMap::from([("2020W10".to_string(), Some(5.0))]),
        };
        let countries = BTreeMap::from([(
            "Portugal".to_string(),
            BTreeMap::from([(
                Category::Covid,
                BTreeMap::from([("new_cases".to_string(), record)]),
            )]),
        )]);
        let dataset = Dataset::from_map(countries.clone());

        dataset.to_json_file(&path).unwrap();
        let loaded = Dataset::from_json_file(&path).unwrap();
        assert_eq!(loaded.as_map(), &countries);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Dataset::from_json_file(Path::new("/nonexistent/dataset.json")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = Dataset::from_json_file(&path).unwrap_err();
        assert!(matches!(err, DataError::Json { .. }));
    }

    #[test]
    fn load_merged_combines_directory_fragments() {
        let dir = tempfile::tempdir().unwrap();
        write_fragment(dir.path(), "covid.json", "Portugal", "new_cases", 5.0);
        write_fragment(dir.path(), "more.json", "Spain", "new_cases", 9.0);

        let dataset = Dataset::load_merged(&dir.path().display().to_string()).unwrap();
        assert_eq!(dataset.get_countries(), vec!["Portugal", "Spain"]);
    }

    #[test]
    fn load_merged_first_writer_wins() {
        let dir = tempfile::tempdir().unwrap();
        write_fragment(dir.path(), "a.json", "Portugal", "new_cases", 1.0);
        write_fragment(dir.path(), "b.json", "Portugal", "new_cases", 2.0);

        let dataset = Dataset::load_merged(&dir.path().display().to_string()).unwrap();
        let record = &dataset.as_map()["Portugal"][&Category::Covid]["new_cases"];
        assert_eq!(record.values["2020W10"], Some(1.0));
    }

    #[test]
    fn load_merged_empty_directory_is_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = Dataset::load_merged(&dir.path().display().to_string()).unwrap();
        assert!(dataset.is_empty());
    }
}
