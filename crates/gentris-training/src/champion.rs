//! Persistence of the best genome found so far.
//!
//! The champion file is a pretty-printed JSON [`ChampionRecord`]. A run only
//! replaces it when its champion scores strictly higher, so repeated runs
//! keep the best weights seen across all of them.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write as _},
    path::Path,
};

use chrono::{DateTime, Utc};
use gentris_evaluator::weights::Weights;
use serde::{Deserialize, Serialize};

use crate::evolution::GenomeResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionRecord {
    pub score: usize,
    pub moves: usize,
    pub trained_at: DateTime<Utc>,
    pub weights: Weights,
}

impl ChampionRecord {
    #[must_use]
    pub fn from_result(result: &GenomeResult, trained_at: DateTime<Utc>) -> Self {
        Self {
            score: result.score,
            moves: result.moves,
            trained_at,
            weights: result.weights.clone(),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ChampionError {
    #[display("champion file I/O failed: {_0}")]
    Io(io::Error),
    #[display("champion file is not valid JSON: {_0}")]
    Json(serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SaveOutcome {
    Saved,
    /// The stored champion scored at least as high.
    KeptExisting { existing_score: usize },
}

/// Reads the champion file, or `None` if it does not exist.
pub fn load(path: &Path) -> Result<Option<ChampionRecord>, ChampionError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let record = serde_json::from_reader(BufReader::new(file))?;
    Ok(Some(record))
}

/// Writes `record` to `path`, replacing any existing file.
pub fn save(path: &Path, record: &ChampionRecord) -> Result<(), ChampionError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, record)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Saves `record` unless the stored champion scores at least as high.
///
/// A champion file that exists but cannot be read is an error and is left
/// untouched.
pub fn save_if_better(path: &Path, record: &ChampionRecord) -> Result<SaveOutcome, ChampionError> {
    if let Some(existing) = load(path)?
        && existing.score >= record.score
    {
        return Ok(SaveOutcome::KeptExisting {
            existing_score: existing.score,
        });
    }
    save(path, record)?;
    Ok(SaveOutcome::Saved)
}

/// Weights of the stored champion, falling back to
/// [`Weights::manual_default`] when the file is missing or unreadable.
#[must_use]
pub fn load_weights_or_default(path: &Path) -> Weights {
    match load(path) {
        Ok(Some(record)) => {
            tracing::info!(path = %path.display(), score = record.score, "loaded champion weights");
            record.weights
        }
        Ok(None) => {
            tracing::info!(path = %path.display(), "no champion file, using default weights");
            Weights::manual_default()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to load champion, using default weights");
            Weights::manual_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use gentris_evaluator::heuristic::Heuristic;

    use super::*;

    struct TempFile(PathBuf);

    impl TempFile {
        fn new(name: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "gentris-champion-{}-{name}.json",
                std::process::id()
            ));
            let _ = fs::remove_file(&path);
            Self(path)
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    fn record(score: usize) -> ChampionRecord {
        ChampionRecord {
            score,
            moves: 120,
            trained_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            weights: Weights::from_iter([(Heuristic::Holes, -7.5), (Heuristic::Lines, 30.0)]),
        }
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let file = TempFile::new("missing");
        assert!(load(&file.0).unwrap().is_none());
        assert_eq!(load_weights_or_default(&file.0), Weights::manual_default());
    }

    #[test]
    fn test_saved_record_loads_back() {
        let file = TempFile::new("roundtrip");
        save(&file.0, &record(300)).unwrap();
        assert_eq!(load(&file.0).unwrap(), Some(record(300)));
        assert_eq!(load_weights_or_default(&file.0), record(300).weights);
    }

    #[test]
    fn test_only_strictly_better_replaces() {
        let file = TempFile::new("better");
        assert_eq!(save_if_better(&file.0, &record(100)).unwrap(), SaveOutcome::Saved);
        assert_eq!(
            save_if_better(&file.0, &record(100)).unwrap(),
            SaveOutcome::KeptExisting { existing_score: 100 }
        );
        assert!(save_if_better(&file.0, &record(40)).unwrap().is_kept_existing());
        assert_eq!(save_if_better(&file.0, &record(140)).unwrap(), SaveOutcome::Saved);
        assert_eq!(load(&file.0).unwrap().unwrap().score, 140);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default_weights() {
        let file = TempFile::new("corrupt");
        fs::write(&file.0, "{ not json").unwrap();
        assert!(matches!(load(&file.0), Err(ChampionError::Json(_))));
        assert_eq!(load_weights_or_default(&file.0), Weights::manual_default());
    }

    #[test]
    fn test_unreadable_champion_is_never_overwritten() {
        let file = TempFile::new("unknown-key");
        let stored = r#"{
  "score": 99999,
  "moves": 500,
  "trained_at": "2024-01-01T00:00:00Z",
  "weights": { "holes": -1.0, "depth": 2.0 }
}
"#;
        fs::write(&file.0, stored).unwrap();

        let result = save_if_better(&file.0, &record(40));
        assert!(matches!(result, Err(ChampionError::Json(_))));
        assert_eq!(fs::read_to_string(&file.0).unwrap(), stored);
    }
}
