use crate::error::{CliError, Result};
use demins::core::io::species_table::SpeciesRecord;
use demins::core::models::bed::BedKind;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileQuantity {
    pub value: f64,
    pub unit: String,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileFlow {
    pub value: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileSpecies {
    pub name: String,
    pub concentration: f64,
    pub units: String,
    #[serde(rename = "equivalents-per-mole")]
    pub equivalents_per_mole: f64,
    #[serde(rename = "molecular-weight")]
    pub molecular_weight: f64,
    #[serde(rename = "removal-efficiency", default)]
    pub removal_efficiency: f64,
}

impl From<&SpeciesRecord> for FileSpecies {
    fn from(r: &SpeciesRecord) -> Self {
        Self {
            name: r.name.clone(),
            concentration: r.concentration,
            units: r.units.clone(),
            equivalents_per_mole: r.equivalents_per_mole,
            molecular_weight: r.molecular_weight,
            removal_efficiency: r.removal_efficiency,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileBed {
    pub volume: FileQuantity,
    #[serde(rename = "specific-capacity")]
    pub specific_capacity: FileQuantity,
    pub penalty: Option<f64>,
    #[serde(default)]
    pub species: Vec<FileSpecies>,
}

/// The vessel description file, every field optional so that command-line
/// flags and `--set` values can fill the gaps.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(rename = "start-date")]
    pub start_date: Option<toml::value::Datetime>,
    pub flow: Option<FileFlow>,
    pub density: Option<f64>,
    #[serde(rename = "target-fraction")]
    pub target_fraction: Option<f64>,
    pub cation: Option<FileBed>,
    pub anion: Option<FileBed>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading vessel description from {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn bed(&self, kind: BedKind) -> Option<&FileBed> {
        match kind {
            BedKind::Cation => self.cation.as_ref(),
            BedKind::Anion => self.anion.as_ref(),
        }
    }

    pub fn bed_mut(&mut self, kind: BedKind) -> Option<&mut FileBed> {
        match kind {
            BedKind::Cation => self.cation.as_mut(),
            BedKind::Anion => self.anion.as_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn from_file_reads_full_description() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vessel.toml");
        fs::write(
            &path,
            r#"
            start-date = 2024-01-15T08:00:00Z
            flow = { value = 120.0, unit = "gal / min" }
            density = 3790.0
            target-fraction = 0.8

            [cation]
            volume = { value = 20.0, unit = "ft3" }
            specific-capacity = { value = 2.4, unit = "eq / L" }
            penalty = 0.05

            [[cation.species]]
            name = "zinc"
            concentration = 10.0
            units = "ppb"
            equivalents-per-mole = 2.0
            molecular-weight = 65.38
            removal-efficiency = 0.98

            [[cation.species]]
            name = "lithium"
            concentration = 3.5
            units = "ppm"
            equivalents-per-mole = 1.0
            molecular-weight = 7.0
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(
            config.start_date.unwrap().to_string(),
            "2024-01-15T08:00:00Z"
        );
        let flow = config.flow.clone().unwrap();
        assert_eq!(flow.value, Some(120.0));
        assert_eq!(flow.unit.as_deref(), Some("gal / min"));
        assert_eq!(config.density, Some(3790.0));
        assert_eq!(config.target_fraction, Some(0.8));

        let cation = config.bed(BedKind::Cation).unwrap();
        assert_eq!(cation.penalty, Some(0.05));
        assert_eq!(cation.species.len(), 2);
        assert_eq!(cation.species[1].removal_efficiency, 0.0);
        assert!(config.bed(BedKind::Anion).is_none());
    }

    #[test]
    fn from_file_rejects_unknown_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vessel.toml");
        fs::write(&path, "flow-rate = 120.0\n").unwrap();
        assert!(matches!(
            FileConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn bare_date_is_accepted() {
        let config: FileConfig = toml::from_str("start-date = 2024-01-15\n").unwrap();
        assert_eq!(config.start_date.unwrap().to_string(), "2024-01-15");
    }
}
