use crate::core::units::{Quantity, UnitError, UnitSystem};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fluid density assumed when none is given: water, in grams per US gallon.
pub const WATER_DENSITY_G_PER_GAL: f64 = 3785.0;

/// Concentration units a species may be specified in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConcentrationUnit {
    Ppb,
    Ppm,
    I131,
    Cs137,
    Co58,
    Co60,
}

impl ConcentrationUnit {
    pub const ALL: [ConcentrationUnit; 6] = [
        ConcentrationUnit::Ppb,
        ConcentrationUnit::Ppm,
        ConcentrationUnit::I131,
        ConcentrationUnit::Cs137,
        ConcentrationUnit::Co58,
        ConcentrationUnit::Co60,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            ConcentrationUnit::Ppb => "ppb",
            ConcentrationUnit::Ppm => "ppm",
            ConcentrationUnit::I131 => "i131",
            ConcentrationUnit::Cs137 => "cs137",
            ConcentrationUnit::Co58 => "co58",
            ConcentrationUnit::Co60 => "co60",
        }
    }

    pub fn is_radionuclide(&self) -> bool {
        !matches!(self, ConcentrationUnit::Ppb | ConcentrationUnit::Ppm)
    }
}

impl FromStr for ConcentrationUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|u| u.tag() == lower)
            .ok_or_else(|| UnitError::UnknownUnit(s.to_string()))
    }
}

impl fmt::Display for ConcentrationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpeciesError {
    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("Removal efficiency for '{name}' must lie in [0, 1], got {value}")]
    RemovalEfficiency { name: String, value: f64 },

    #[error("Molecular weight for '{name}' must be positive, got {value}")]
    MolecularWeight { name: String, value: f64 },

    #[error("Invalid {field} for '{name}': {value}")]
    NonFinite {
        name: String,
        field: &'static str,
        value: f64,
    },
}

/// Molar-equivalent flow and uptake rate of one species at one operating point.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesRates {
    pub dot_e: Quantity,
    pub uptake_rate: Quantity,
}

/// A dissolved constituent of the process stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    name: String,
    units: ConcentrationUnit,
    concentration: Quantity,         // In `units`
    equivalents_per_mole: Quantity,  // eq / mol
    molecular_weight: Quantity,      // g / mol
    removal_efficiency: f64,         // Fraction captured by the bed
}

impl Species {
    /// Creates a species that is tracked but not removed (removal efficiency 0).
    ///
    /// `units` is one of `ppb`, `ppm`, `i131`, `cs137`, `co58`, `co60`,
    /// matched case-insensitively.
    pub fn new(
        concentration: f64,
        name: &str,
        units: &str,
        equivalents_per_mole: f64,
        molecular_weight: f64,
        unit_system: &UnitSystem,
    ) -> Result<Self, SpeciesError> {
        let tag: ConcentrationUnit = units.parse()?;
        for (field, value) in [
            ("concentration", concentration),
            ("equivalents per mole", equivalents_per_mole),
            ("molecular weight", molecular_weight),
        ] {
            if !value.is_finite() {
                return Err(SpeciesError::NonFinite {
                    name: name.to_string(),
                    field,
                    value,
                });
            }
        }
        if molecular_weight <= 0.0 {
            return Err(SpeciesError::MolecularWeight {
                name: name.to_string(),
                value: molecular_weight,
            });
        }

        Ok(Self {
            name: name.to_string(),
            units: tag,
            concentration: unit_system.quantity(concentration, tag.tag())?,
            equivalents_per_mole: unit_system.quantity(equivalents_per_mole, "eq / mol")?,
            molecular_weight: unit_system.quantity(molecular_weight, "g / mol")?,
            removal_efficiency: 0.0,
        })
    }

    pub fn with_removal_efficiency(mut self, removal_efficiency: f64) -> Result<Self, SpeciesError> {
        if !(0.0..=1.0).contains(&removal_efficiency) {
            return Err(SpeciesError::RemovalEfficiency {
                name: self.name,
                value: removal_efficiency,
            });
        }
        self.removal_efficiency = removal_efficiency;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> ConcentrationUnit {
        self.units
    }

    pub fn concentration(&self) -> &Quantity {
        &self.concentration
    }

    pub fn equivalents_per_mole(&self) -> &Quantity {
        &self.equivalents_per_mole
    }

    pub fn molecular_weight(&self) -> &Quantity {
        &self.molecular_weight
    }

    pub fn removal_efficiency(&self) -> f64 {
        self.removal_efficiency
    }

    /// Molar-equivalent flow rate of this species through the vessel, in eq/min.
    ///
    /// Solute mass rate is concentration × volumetric flow × fluid density;
    /// dividing by molecular weight gives moles per unit time, and multiplying
    /// by equivalents per mole gives equivalents per unit time. `density` is
    /// taken in grams per gallon. `flow` must be a volume per time.
    pub fn dot_e_calc(
        &self,
        flow: &Quantity,
        density: f64,
        unit_system: &UnitSystem,
    ) -> Result<Quantity, UnitError> {
        let ppb = unit_system.unit("ppb")?;
        let conc = self.concentration.to(&ppb)?;
        let density = unit_system.quantity(density, "g / gal")?;
        let scale = Quantity::new(1.0e9, ppb);

        let solute = &(&(&conc * &self.equivalents_per_mole) * flow) * &density;
        let per_mass = &(&self.molecular_weight * &scale);
        unit_system.convert(&(&solute / per_mass), "eq / min")
    }

    /// Rate at which the resin actually captures this species.
    pub fn uptake_calc(&self, dot_e: &Quantity) -> Quantity {
        dot_e * self.removal_efficiency
    }

    pub fn rates(
        &self,
        flow: &Quantity,
        density: f64,
        unit_system: &UnitSystem,
    ) -> Result<SpeciesRates, UnitError> {
        let dot_e = self.dot_e_calc(flow, density, unit_system)?;
        let uptake_rate = self.uptake_calc(&dot_e);
        Ok(SpeciesRates { dot_e, uptake_rate })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::Dimension;

    fn rel_eq(a: f64, b: f64, rel: f64) -> bool {
        (a - b).abs() <= rel * a.abs().max(b.abs())
    }

    fn flow(units: &UnitSystem) -> Quantity {
        units.quantity(120.0, "gal / min").unwrap()
    }

    #[test]
    fn concentration_unit_parses_case_insensitively() {
        assert_eq!("PPB".parse::<ConcentrationUnit>().unwrap(), ConcentrationUnit::Ppb);
        assert_eq!("Co60".parse::<ConcentrationUnit>().unwrap(), ConcentrationUnit::Co60);
        assert!(ConcentrationUnit::Cs137.is_radionuclide());
        assert!(!ConcentrationUnit::Ppm.is_radionuclide());
    }

    #[test]
    fn new_rejects_unknown_unit_tag() {
        let units = UnitSystem::new();
        let err = Species::new(1.0, "boron", "ppq", 1.0, 10.4, &units).unwrap_err();
        assert_eq!(err, SpeciesError::Unit(UnitError::UnknownUnit("ppq".to_string())));
    }

    #[test]
    fn new_rejects_registry_units_outside_the_species_tags() {
        let units = UnitSystem::new();
        assert!(Species::new(1.0, "boron", "ppt", 1.0, 10.4, &units).is_err());
    }

    #[test]
    fn new_defaults_removal_efficiency_to_zero() {
        let units = UnitSystem::new();
        let s = Species::new(3.5, "lithium", "ppm", 1.0, 7.0, &units).unwrap();
        assert_eq!(s.removal_efficiency(), 0.0);
        assert_eq!(s.units(), ConcentrationUnit::Ppm);
        assert_eq!(s.concentration().unit().symbol(), "ppm");
    }

    #[test]
    fn new_rejects_non_positive_molecular_weight() {
        let units = UnitSystem::new();
        assert!(matches!(
            Species::new(1.0, "x", "ppb", 1.0, 0.0, &units),
            Err(SpeciesError::MolecularWeight { .. })
        ));
    }

    #[test]
    fn new_rejects_non_finite_inputs() {
        let units = UnitSystem::new();
        assert!(matches!(
            Species::new(f64::NAN, "x", "ppb", 1.0, 1.0, &units),
            Err(SpeciesError::NonFinite { field: "concentration", .. })
        ));
    }

    #[test]
    fn removal_efficiency_outside_unit_interval_is_rejected() {
        let units = UnitSystem::new();
        let s = Species::new(1.0, "zinc", "ppb", 2.0, 65.38, &units).unwrap();
        assert!(s.clone().with_removal_efficiency(1.2).is_err());
        assert!(s.clone().with_removal_efficiency(-0.1).is_err());
        assert!(s.clone().with_removal_efficiency(f64::NAN).is_err());
        assert_eq!(s.with_removal_efficiency(0.98).unwrap().removal_efficiency(), 0.98);
    }

    #[test]
    fn dot_e_matches_hand_calculation() {
        let units = UnitSystem::new();
        let ammonia = Species::new(400.0, "ammonia", "ppb", 1.0, 18.04, &units).unwrap();
        let dot_e = ammonia
            .dot_e_calc(&flow(&units), WATER_DENSITY_G_PER_GAL, &units)
            .unwrap();
        let expected = 400.0 * 120.0 * 3785.0 / (18.04 * 1.0e9);
        assert!(rel_eq(dot_e.magnitude(), expected, 1e-12));
        assert_eq!(dot_e.dimension(), Dimension::EQUIVALENT / Dimension::TIME);
        assert_eq!(dot_e.unit().symbol(), "eq / min");
    }

    #[test]
    fn dot_e_is_independent_of_flow_unit() {
        let units = UnitSystem::new();
        let zinc = Species::new(10.0, "zinc", "ppb", 2.0, 65.38, &units).unwrap();
        let gpm = zinc.dot_e_calc(&flow(&units), 3785.0, &units).unwrap();
        let lps = units
            .convert(&flow(&units), "L / s")
            .and_then(|f| zinc.dot_e_calc(&f, 3785.0, &units))
            .unwrap();
        assert!(rel_eq(gpm.magnitude(), lps.magnitude(), 1e-12));
    }

    #[test]
    fn ppm_concentration_is_normalized_before_scaling() {
        let units = UnitSystem::new();
        let in_ppm = Species::new(0.4, "ammonia", "ppm", 1.0, 18.04, &units).unwrap();
        let in_ppb = Species::new(400.0, "ammonia", "ppb", 1.0, 18.04, &units).unwrap();
        let a = in_ppm.dot_e_calc(&flow(&units), 3785.0, &units).unwrap();
        let b = in_ppb.dot_e_calc(&flow(&units), 3785.0, &units).unwrap();
        assert!(rel_eq(a.magnitude(), b.magnitude(), 1e-12));
    }

    #[test]
    fn radionuclide_concentration_uses_specific_activity() {
        let units = UnitSystem::new();
        let cs = Species::new(4.0e-5, "cs137", "cs137", 1.0, 137.0, &units).unwrap();
        let dot_e = cs.dot_e_calc(&flow(&units), 3785.0, &units).unwrap();
        let ppb = 4.0e-5 * 1.0e9 / (1.0e6 * 88.0);
        let expected = ppb * 120.0 * 3785.0 / (137.0 * 1.0e9);
        assert!(rel_eq(dot_e.magnitude(), expected, 1e-12));
    }

    #[test]
    fn zero_equivalents_per_mole_yields_zero_dot_e() {
        let units = UnitSystem::new();
        let s = Species::new(1000.0, "inert", "ppm", 0.0, 10.0, &units).unwrap();
        let dot_e = s.dot_e_calc(&flow(&units), 3785.0, &units).unwrap();
        assert_eq!(dot_e.magnitude(), 0.0);
    }

    #[test]
    fn zero_removal_efficiency_yields_zero_uptake() {
        let units = UnitSystem::new();
        for conc in [0.5, 1000.0, 1.0e6] {
            let s = Species::new(conc, "boron", "ppm", 1.0, 10.4, &units).unwrap();
            let rates = s.rates(&flow(&units), 3785.0, &units).unwrap();
            assert!(rates.dot_e.magnitude() > 0.0);
            assert_eq!(rates.uptake_rate.magnitude(), 0.0);
        }
    }

    #[test]
    fn uptake_scales_dot_e_by_removal_efficiency() {
        let units = UnitSystem::new();
        let s = Species::new(10.0, "zinc", "ppb", 2.0, 65.38, &units)
            .and_then(|s| s.with_removal_efficiency(0.98))
            .unwrap();
        let rates = s.rates(&flow(&units), 3785.0, &units).unwrap();
        assert!(rel_eq(
            rates.uptake_rate.magnitude(),
            rates.dot_e.magnitude() * 0.98,
            1e-12
        ));
    }

    #[test]
    fn dot_e_rejects_flow_without_time_dimension() {
        let units = UnitSystem::new();
        let s = Species::new(10.0, "zinc", "ppb", 2.0, 65.38, &units).unwrap();
        let not_a_flow = units.quantity(120.0, "gal").unwrap();
        assert!(matches!(
            s.dot_e_calc(&not_a_flow, 3785.0, &units),
            Err(UnitError::Dimensionality { .. })
        ));
    }
}
