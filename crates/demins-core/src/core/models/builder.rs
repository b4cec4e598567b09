use super::bed::{BedKind, ResinBed};
use super::species::{Species, SpeciesError, WATER_DENSITY_G_PER_GAL};
use super::vessel::{Vessel, VesselError};
use crate::core::units::{UnitError, UnitSystem};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Species '{0}' was added before any bed was started")]
    NoCurrentBed(String),

    #[error("{bed} bed penalty must lie in [0, 1), got {value}")]
    InvalidPenalty { bed: BedKind, value: f64 },

    #[error("Fluid density must be positive and finite, got {0} g/gal")]
    InvalidDensity(f64),

    #[error("Invalid species '{name}': {source}")]
    Species {
        name: String,
        #[source]
        source: SpeciesError,
    },

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error(transparent)]
    Vessel(#[from] VesselError),
}

#[derive(Debug, Clone)]
struct SpeciesDraft {
    name: String,
    concentration: f64,
    units: String,
    equivalents_per_mole: f64,
    molecular_weight: f64,
    removal_efficiency: f64,
}

#[derive(Debug, Clone)]
struct BedDraft {
    volume: (f64, String),
    specific_capacity: (f64, String),
    penalty: f64,
    species: Vec<SpeciesDraft>,
}

/// Assembles a [`Vessel`] from raw magnitudes and unit expressions.
///
/// Beds are opened with [`start_bed`](Self::start_bed); species added after
/// that go onto the most recently started bed. Nothing is resolved against the
/// unit system until [`build`](Self::build), which reports the first problem
/// found.
#[derive(Debug, Clone)]
pub struct VesselBuilder {
    unit_system: UnitSystem,
    start_date: Option<SystemTime>,
    flow: Option<(f64, String)>,
    density: f64,
    cation: Option<BedDraft>,
    anion: Option<BedDraft>,

    // --- Builder-specific state ---
    current_bed: Option<BedKind>,
    orphans: Vec<String>,
}

impl Default for VesselBuilder {
    fn default() -> Self {
        Self::new(UnitSystem::new())
    }
}

impl VesselBuilder {
    pub fn new(unit_system: UnitSystem) -> Self {
        Self {
            unit_system,
            start_date: None,
            flow: None,
            density: WATER_DENSITY_G_PER_GAL,
            cation: None,
            anion: None,
            current_bed: None,
            orphans: Vec::new(),
        }
    }

    pub fn start_date(&mut self, start_date: SystemTime) -> &mut Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn flow(&mut self, value: f64, unit: &str) -> &mut Self {
        self.flow = Some((value, unit.to_string()));
        self
    }

    pub fn density(&mut self, grams_per_gallon: f64) -> &mut Self {
        self.density = grams_per_gallon;
        self
    }

    /// Opens (or re-opens) a bed and makes it current. Re-opening keeps the
    /// species already added and replaces the bed's size.
    pub fn start_bed(
        &mut self,
        kind: BedKind,
        volume: f64,
        volume_unit: &str,
        specific_capacity: f64,
        specific_capacity_unit: &str,
    ) -> &mut Self {
        let slot = self.slot_mut(kind);
        let volume = (volume, volume_unit.to_string());
        let specific_capacity = (specific_capacity, specific_capacity_unit.to_string());
        match slot {
            Some(draft) => {
                draft.volume = volume;
                draft.specific_capacity = specific_capacity;
            }
            None => {
                *slot = Some(BedDraft {
                    volume,
                    specific_capacity,
                    penalty: 0.0,
                    species: Vec::new(),
                })
            }
        }
        self.current_bed = Some(kind);
        self
    }

    pub fn penalty(&mut self, penalty: f64) -> &mut Self {
        if let Some(draft) = self.current_draft() {
            draft.penalty = penalty;
        }
        self
    }

    pub fn add_species(
        &mut self,
        name: &str,
        concentration: f64,
        units: &str,
        equivalents_per_mole: f64,
        molecular_weight: f64,
        removal_efficiency: f64,
    ) -> &mut Self {
        let draft = SpeciesDraft {
            name: name.to_string(),
            concentration,
            units: units.to_string(),
            equivalents_per_mole,
            molecular_weight,
            removal_efficiency,
        };
        match self.current_draft() {
            Some(bed) => bed.species.push(draft),
            None => self.orphans.push(draft.name),
        }
        self
    }

    pub fn build(self) -> Result<Vessel, BuildError> {
        if let Some(name) = self.orphans.into_iter().next() {
            return Err(BuildError::NoCurrentBed(name));
        }
        let start_date = self
            .start_date
            .ok_or(BuildError::MissingParameter("start_date"))?;
        let (flow_value, flow_unit) = self.flow.ok_or(BuildError::MissingParameter("flow"))?;
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(BuildError::InvalidDensity(self.density));
        }

        let flow = self.unit_system.quantity(flow_value, &flow_unit)?;
        let mut vessel = Vessel::new(self.unit_system.clone(), flow, start_date)?;
        vessel.density = self.density;
        for (kind, draft) in [(BedKind::Cation, self.cation), (BedKind::Anion, self.anion)] {
            if let Some(draft) = draft {
                *vessel.bed_mut(kind) = resolve_bed(kind, draft, &self.unit_system)?;
            }
        }
        Ok(vessel)
    }

    fn slot_mut(&mut self, kind: BedKind) -> &mut Option<BedDraft> {
        match kind {
            BedKind::Cation => &mut self.cation,
            BedKind::Anion => &mut self.anion,
        }
    }

    fn current_draft(&mut self) -> Option<&mut BedDraft> {
        let kind = self.current_bed?;
        self.slot_mut(kind).as_mut()
    }
}

fn resolve_bed(
    kind: BedKind,
    draft: BedDraft,
    unit_system: &UnitSystem,
) -> Result<ResinBed, BuildError> {
    if !(0.0..1.0).contains(&draft.penalty) {
        return Err(BuildError::InvalidPenalty {
            bed: kind,
            value: draft.penalty,
        });
    }
    let volume = unit_system.quantity(draft.volume.0, &draft.volume.1)?;
    let specific_capacity =
        unit_system.quantity(draft.specific_capacity.0, &draft.specific_capacity.1)?;
    let species = draft
        .species
        .into_iter()
        .map(|s| {
            Species::new(
                s.concentration,
                &s.name,
                &s.units,
                s.equivalents_per_mole,
                s.molecular_weight,
                unit_system,
            )
            .and_then(|species| species.with_removal_efficiency(s.removal_efficiency))
            .map_err(|source| BuildError::Species {
                name: s.name.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResinBed::new(volume, specific_capacity)
        .with_penalty(draft.penalty)
        .with_species(species))
}
