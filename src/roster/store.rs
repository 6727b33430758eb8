//! Roster store — append-only collection of student records loaded from CSV.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::RosterError;

/// One student, as loaded from a roster CSV row.
///
/// Identity is structural: there is no id field, and duplicate records are
/// legal (they show up as ambiguity during resolution).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub surname: String,
    pub given_name: String,
    pub class_id: String,
}

/// CSV row shape. The localized column names used by the school's exported
/// rosters are accepted as aliases.
#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(alias = "nom")]
    surname: String,
    #[serde(alias = "prenom")]
    given_name: String,
    #[serde(alias = "classe")]
    class_id: String,
}

/// Insertion-ordered set of student records, read-only once loading is done.
///
/// No index — rosters are classroom-sized, resolution is a linear scan.
#[derive(Debug, Default)]
pub struct Roster {
    records: Vec<StudentRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record. No validation, no deduplication.
    pub fn add(&mut self, surname: &str, given_name: &str, class_id: &str) {
        self.records.push(StudentRecord {
            surname: surname.to_string(),
            given_name: given_name.to_string(),
            class_id: class_id.to_string(),
        });
    }

    /// Append every row of one CSV file, in row order.
    ///
    /// A row missing a required column fails the whole file with
    /// [`RosterError::MalformedRecord`]; rows already appended stay in the
    /// roster, but callers treat the error as fatal for the run.
    pub fn load_csv(&mut self, path: &Path) -> Result<(), RosterError> {
        let mut reader = csv::Reader::from_path(path).map_err(|source| RosterError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        for row in reader.deserialize() {
            let row: RosterRow = row.map_err(|source| RosterError::MalformedRecord {
                path: path.to_path_buf(),
                line: source.position().map_or(0, |p| p.line()),
                source,
            })?;
            self.add(&row.surname, &row.given_name, &row.class_id);
        }

        Ok(())
    }

    /// All records, in insertion order.
    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Build a roster from every `*.csv` file in a directory, in directory-listing
/// order. Other files are ignored.
pub fn load_dir(dir: &Path) -> Result<Roster, RosterError> {
    let mut roster = Roster::new();

    let entries = std::fs::read_dir(dir).map_err(|source| RosterError::Dir {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| RosterError::Dir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "csv") {
            debug!(file = %path.display(), "Loading roster file");
            roster.load_csv(&path)?;
        }
    }

    debug!(records = roster.len(), "Roster loaded");
    Ok(roster)
}
