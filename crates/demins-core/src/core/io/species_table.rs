use crate::core::models::bed::BedKind;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// One row of a species table.
///
/// `removal_efficiency` may be left out of the header entirely, in which case
/// every species is tracked but not removed.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SpeciesRecord {
    pub bed: BedKind,
    pub name: String,
    pub concentration: f64,
    pub units: String,
    pub equivalents_per_mole: f64,
    pub molecular_weight: f64,
    #[serde(default)]
    pub removal_efficiency: f64,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

/// Species for both beds of a vessel, as read from a CSV file with the header
/// `bed,name,concentration,units,equivalents_per_mole,molecular_weight,removal_efficiency`.
///
/// Fields are trimmed and lines starting with `#` are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesTable {
    pub records: Vec<SpeciesRecord>,
}

impl SpeciesTable {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let csv_error = |source: csv::Error| LoadError::Csv {
            path: path.to_string_lossy().to_string(),
            source,
        };
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_path(path)
            .map_err(csv_error)?;
        Self::from_csv(reader).map_err(csv_error)
    }

    fn from_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self, csv::Error> {
        let records = reader
            .deserialize::<SpeciesRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    pub fn for_bed(&self, kind: BedKind) -> impl Iterator<Item = &SpeciesRecord> {
        self.records.iter().filter(move |r| r.bed == kind)
    }
}
