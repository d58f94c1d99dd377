//! Run report loader
//!
//! Load one report file, or every report in a directory in file-name order.

use std::path::{Path, PathBuf};

use super::RunReport;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error in {file}: {error}")]
    Json {
        file: String,
        error: serde_json::Error,
    },

    #[error("YAML parse error in {file}: {error}")]
    Yaml {
        file: String,
        error: serde_yaml::Error,
    },

    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),
}

pub struct ReportLoader;

impl ReportLoader {
    pub fn load_directory(dir: &Path) -> Result<Vec<(PathBuf, RunReport)>, LoadError> {
        Self::report_files(dir)?
            .into_iter()
            .map(|path| {
                let report = Self::load_file(&path)?;
                Ok((path, report))
            })
            .collect()
    }

    /// Report files in a directory, sorted by file name
    pub fn report_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let mut paths = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();

            if !path.is_file() || !Self::is_report_file(&path) {
                continue;
            }

            // tracker.yaml configures the tracker, it is not a report
            let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if filename == "tracker.yaml" || filename == "tracker.yml" {
                continue;
            }

            paths.push(path);
        }

        paths.sort();
        Ok(paths)
    }

    pub fn load_file(path: &Path) -> Result<RunReport, LoadError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content).map_err(|e| LoadError::Json {
                file: path.display().to_string(),
                error: e,
            }),
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| LoadError::Yaml {
                    file: path.display().to_string(),
                    error: e,
                })
            }
            _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn is_report_file(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("json") | Some("yaml") | Some("yml")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const REPORT_YAML: &str = r#"
started: 2024-01-15T10:30:00Z
completed: 2024-01-15T10:30:01Z
classes:
  - name: FooTest
    tests:
      - name: a
        status: passed
"#;

    #[test]
    fn test_load_directory_sorted() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("002-second.yaml"), REPORT_YAML).unwrap();
        fs::write(
            dir.path().join("001-first.json"),
            r#"{"full": true, "started": "2024-01-15T10:00:00Z", "completed": "2024-01-15T10:00:05Z", "classes": []}"#,
        )
        .unwrap();
        fs::write(dir.path().join("tracker.yaml"), "history_limit: 3").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let reports = ReportLoader::load_directory(dir.path()).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].1.full);
        assert!(reports[0].0.ends_with("001-first.json"));
        assert_eq!(reports[1].1.classes.len(), 1);
    }

    #[test]
    fn test_load_file_bad_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "classes: [not: valid: yaml").unwrap();

        let err = ReportLoader::load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Yaml { .. }));
    }

    #[test]
    fn test_load_file_unsupported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.xml");
        fs::write(&path, "<testsuite/>").unwrap();

        let err = ReportLoader::load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
    }
}
