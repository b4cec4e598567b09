use super::species::{Species, SpeciesRates};
use crate::core::units::{Quantity, UnitError, UnitSystem};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BedKind {
    #[serde(alias = "Cation", alias = "CATION")]
    Cation,
    #[serde(alias = "Anion", alias = "ANION")]
    Anion,
}

impl BedKind {
    pub const ALL: [BedKind; 2] = [BedKind::Cation, BedKind::Anion];

    pub fn label(&self) -> &'static str {
        match self {
            BedKind::Cation => "Cation",
            BedKind::Anion => "Anion",
        }
    }
}

impl fmt::Display for BedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One resin bed of a demineralizer vessel and the species it is loaded with.
///
/// A bed whose volume is zero is treated as not installed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResinBed {
    pub species: Vec<Species>,
    pub volume: Quantity,            // Volume
    pub specific_capacity: Quantity, // Equivalents per volume
    pub penalty: f64,                // Capacity derating for fouling and aging, [0, 1)
}

impl ResinBed {
    pub fn new(volume: Quantity, specific_capacity: Quantity) -> Self {
        Self {
            species: Vec::new(),
            volume,
            specific_capacity,
            penalty: 0.0,
        }
    }

    /// A bed that is not installed: zero volume and zero capacity.
    pub fn absent(unit_system: &UnitSystem) -> Result<Self, UnitError> {
        Ok(Self::new(
            unit_system.quantity(0.0, "L")?,
            unit_system.quantity(0.0, "eq / L")?,
        ))
    }

    pub fn with_species(mut self, species: Vec<Species>) -> Self {
        self.species = species;
        self
    }

    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn is_installed(&self) -> bool {
        !self.volume.is_zero()
    }

    /// Bed volume in liters times specific capacity, in equivalents.
    pub fn initial_capacity(&self, unit_system: &UnitSystem) -> Result<Quantity, UnitError> {
        let liters = unit_system.convert(&self.volume, "L")?;
        unit_system.convert(&(&liters * &self.specific_capacity), "eq")
    }

    pub fn species_rates(
        &self,
        flow: &Quantity,
        density: f64,
        unit_system: &UnitSystem,
    ) -> Result<Vec<SpeciesRates>, UnitError> {
        self.species
            .iter()
            .map(|s| s.rates(flow, density, unit_system))
            .collect()
    }

    /// Sum of the uptake rates of every species on the bed, in eq/min.
    pub fn uptake_rate(
        &self,
        flow: &Quantity,
        density: f64,
        unit_system: &UnitSystem,
    ) -> Result<Quantity, UnitError> {
        let rates = self.species_rates(flow, density, unit_system)?;
        Quantity::sum(
            rates.iter().map(|r| &r.uptake_rate),
            unit_system.quantity(0.0, "eq / min")?,
        )
    }
}
