use crate::core::models::bed::BedKind;
use crate::core::models::species::{ConcentrationUnit, SpeciesRates};
use crate::core::units::Quantity;
use std::fmt;
use std::time::SystemTime;

/// Projection of a bed towards the target exhaustion fraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Forecast {
    /// The bed has zero volume.
    NotInstalled,
    /// The bed is installed but nothing on it is being removed.
    NoUptake,
    /// Days until the target is reached; negative once it has been passed.
    Remaining(Quantity),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesStatus {
    pub name: String,
    pub units: ConcentrationUnit,
    pub rates: SpeciesRates,
}

/// Everything computed for one bed at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct BedStatus {
    pub kind: BedKind,
    pub installed: bool,
    pub penalty: f64,
    pub initial_capacity: Quantity,  // eq
    pub uptake_rate: Quantity,       // eq / min
    pub capacity: Quantity,          // eq
    pub percent_exhausted: Quantity, // percent
    pub forecast: Forecast,
    pub species: Vec<SpeciesStatus>,
}

impl BedStatus {
    pub fn is_over_exhausted(&self) -> bool {
        self.installed && self.capacity.magnitude() < 0.0
    }

    fn sentence(&self) -> String {
        let pct = self.percent_exhausted.magnitude();
        match &self.forecast {
            Forecast::Remaining(days) => format!(
                "{} {:.2}% exh with {} days left.",
                self.kind,
                pct,
                days.magnitude().round() as i64
            ),
            Forecast::NoUptake => format!("{} {:.2}% exh with no uptake.", self.kind, pct),
            Forecast::NotInstalled => String::new(),
        }
    }
}

/// A point-in-time snapshot of a vessel.
#[derive(Debug, Clone, PartialEq)]
pub struct ExhaustionReport {
    pub evaluated_at: SystemTime,
    pub service_time: Quantity, // day
    pub throughput: Quantity,   // gal
    pub target_fraction: f64,
    /// Rounded percent of the most exhausted installed bed.
    pub max_pct_exhausted: i64,
    pub cation: BedStatus,
    pub anion: BedStatus,
}

impl ExhaustionReport {
    pub fn bed(&self, kind: BedKind) -> &BedStatus {
        match kind {
            BedKind::Cation => &self.cation,
            BedKind::Anion => &self.anion,
        }
    }

    /// Installed beds, anion first.
    pub fn installed_beds(&self) -> impl Iterator<Item = &BedStatus> {
        [&self.anion, &self.cation].into_iter().filter(|b| b.installed)
    }

    /// One sentence per installed bed, e.g.
    /// `Anion 0.72% exh with 29401 days left. Cation 298.54% exh with -233 days left.`
    pub fn status_line(&self) -> String {
        self.installed_beds()
            .map(BedStatus::sentence)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ExhaustionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::UnitSystem;

    fn status(kind: BedKind, installed: bool, pct: f64, forecast: Forecast) -> BedStatus {
        let units = UnitSystem::new();
        let eq = |v| units.quantity(v, "eq").unwrap();
        BedStatus {
            kind,
            installed,
            penalty: 0.0,
            initial_capacity: eq(100.0),
            uptake_rate: units.quantity(0.01, "eq / min").unwrap(),
            capacity: eq(100.0 - pct),
            percent_exhausted: units.quantity(pct, "percent").unwrap(),
            forecast,
            species: Vec::new(),
        }
    }

    fn days(v: f64) -> Forecast {
        Forecast::Remaining(UnitSystem::new().quantity(v, "day").unwrap())
    }

    fn report(cation: BedStatus, anion: BedStatus) -> ExhaustionReport {
        let units = UnitSystem::new();
        ExhaustionReport {
            evaluated_at: SystemTime::UNIX_EPOCH,
            service_time: units.quantity(305.0, "day").unwrap(),
            throughput: units.quantity(1.0, "gal").unwrap(),
            target_fraction: 0.7,
            max_pct_exhausted: 0,
            cation,
            anion,
        }
    }

    #[test]
    fn status_line_lists_anion_then_cation() {
        let r = report(
            status(BedKind::Cation, true, 298.543, days(-233.49)),
            status(BedKind::Anion, true, 0.7187, days(29401.4)),
        );
        assert_eq!(
            r.to_string(),
            "Anion 0.72% exh with 29401 days left. Cation 298.54% exh with -233 days left."
        );
    }

    #[test]
    fn status_line_rounds_days_to_whole_numbers() {
        let r = report(
            status(BedKind::Cation, false, 0.0, Forecast::NotInstalled),
            status(BedKind::Anion, true, 70.0, days(-0.3)),
        );
        assert_eq!(r.status_line(), "Anion 70.00% exh with 0 days left.");

        let r = report(
            status(BedKind::Cation, true, 69.0, days(2.5)),
            status(BedKind::Anion, false, 0.0, Forecast::NotInstalled),
        );
        assert_eq!(r.status_line(), "Cation 69.00% exh with 3 days left.");
    }

    #[test]
    fn status_line_omits_absent_beds() {
        let r = report(
            status(BedKind::Cation, false, 0.0, Forecast::NotInstalled),
            status(BedKind::Anion, true, 12.5, days(10.0)),
        );
        assert_eq!(r.status_line(), "Anion 12.50% exh with 10 days left.");

        let none = report(
            status(BedKind::Cation, false, 0.0, Forecast::NotInstalled),
            status(BedKind::Anion, false, 0.0, Forecast::NotInstalled),
        );
        assert_eq!(none.status_line(), "");
    }

    #[test]
    fn status_line_reports_beds_without_uptake() {
        let r = report(
            status(BedKind::Cation, true, 0.0, Forecast::NoUptake),
            status(BedKind::Anion, false, 0.0, Forecast::NotInstalled),
        );
        assert_eq!(r.status_line(), "Cation 0.00% exh with no uptake.");
    }

    #[test]
    fn over_exhaustion_requires_negative_capacity() {
        assert!(status(BedKind::Cation, true, 150.0, days(-1.0)).is_over_exhausted());
        assert!(!status(BedKind::Cation, true, 50.0, days(1.0)).is_over_exhausted());
    }
}
