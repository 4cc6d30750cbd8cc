use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::QeError;

/**
A file that may hold the data, with a label describing it.
# Field:
* path: PathBuf
* label: String - e.g. "Corrected Path", shown in plot titles
*/
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Candidate {
    path: PathBuf,
    #[serde(default)]
    label: String,
}

impl Candidate {
    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_ref()
    }

    pub fn label(&self) -> &str {
        self.label.as_ref()
    }
}

/// Outcome of trying an ordered list of candidate sources.
#[derive(Debug)]
pub enum Selected<T> {
    Loaded { source: Candidate, value: T },
    /// Every candidate failed, with the reason for each.
    Exhausted { tried: Vec<(PathBuf, String)> },
}

impl<T> Selected<T> {
    pub fn into_result(self) -> Result<(Candidate, T), QeError> {
        match self {
            Selected::Loaded { source, value } => Ok((source, value)),
            Selected::Exhausted { tried } => Err(QeError::SourcesExhausted(tried)),
        }
    }
}

/// Read the first candidate `reader` accepts, in the given order.
pub fn select_source<T, F>(candidates: &[Candidate], reader: F) -> Selected<T>
where
    F: Fn(&Path) -> Result<T, QeError>,
{
    let mut tried = vec![];
    for candidate in candidates {
        match reader(candidate.path()) {
            Ok(value) => {
                if !tried.is_empty() {
                    log::info!(
                        "using {} as fallback ({})",
                        candidate.path().display(),
                        candidate.label()
                    );
                }
                return Selected::Loaded {
                    source: candidate.clone(),
                    value,
                };
            }
            Err(e) => {
                log::warn!("skipping {}: {}", candidate.path().display(), e);
                tried.push((candidate.path.clone(), e.to_string()));
            }
        }
    }
    Selected::Exhausted { tried }
}

#[cfg(test)]
mod test {
    use std::path::{Path, PathBuf};

    use super::{select_source, Candidate, Selected};
    use crate::error::QeError;

    fn reader(path: &Path) -> Result<usize, QeError> {
        match path.to_str() {
            Some("good.gnu") => Ok(1),
            Some("also_good.gnu") => Ok(2),
            _ => Err(QeError::InvalidConfig(format!("{} unreadable", path.display()))),
        }
    }

    #[test]
    fn test_first_readable_wins() {
        let candidates = vec![
            Candidate::new("missing.gnu", "Corrected Path"),
            Candidate::new("good.gnu", "Original Path"),
            Candidate::new("also_good.gnu", "Other"),
        ];
        match select_source(&candidates, reader) {
            Selected::Loaded { source, value } => {
                assert_eq!(source.label(), "Original Path");
                assert_eq!(value, 1);
            }
            Selected::Exhausted { .. } => panic!("expected a loaded source"),
        }
    }

    #[test]
    fn test_exhausted() {
        let candidates = vec![Candidate::new("a.gnu", ""), Candidate::new("b.gnu", "")];
        let selected = select_source(&candidates, reader);
        match &selected {
            Selected::Exhausted { tried } => assert_eq!(tried.len(), 2),
            Selected::Loaded { .. } => panic!("nothing should load"),
        }
        let error = selected.into_result().unwrap_err();
        match &error {
            QeError::SourcesExhausted(tried) => {
                let paths: Vec<&PathBuf> = tried.iter().map(|(path, _)| path).collect();
                assert_eq!(paths, vec![&PathBuf::from("a.gnu"), &PathBuf::from("b.gnu")]);
            }
            other => panic!("expected SourcesExhausted, got {:?}", other),
        }
        // every reason reaches the message
        let message = error.to_string();
        assert!(message.contains("a.gnu (invalid configuration: a.gnu unreadable)"));
        assert!(message.contains("b.gnu (invalid configuration: b.gnu unreadable)"));
        assert!(select_source::<usize, _>(&[], reader).into_result().is_err());
    }
}
