use super::bed::{BedKind, ResinBed};
use super::species::WATER_DENSITY_G_PER_GAL;
use crate::core::units::{Quantity, Unit, UnitError, UnitSystem};
use std::cmp::Ordering;
use std::time::SystemTime;
use thiserror::Error;

/// Exhaustion fraction used for time-to-exhaustion projections unless told otherwise.
pub const DEFAULT_TARGET_FRACTION: f64 = 0.7;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VesselError {
    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("Service start date lies {seconds:.0} s in the future")]
    StartDateInFuture { seconds: f64 },

    #[error("{bed} bed has no uptake; time to exhaustion is undefined")]
    NoUptake { bed: BedKind },

    #[error("Target exhaustion fraction must be finite, got {0}")]
    InvalidTarget(f64),
}

/// A demineralizer vessel: a cation bed and an anion bed fed by one stream.
///
/// Every query is a pure function of the vessel and the supplied wall-clock
/// instant. Nothing is cached between calls, so results always reflect the
/// current species and bed parameters.
#[derive(Debug, Clone)]
pub struct Vessel {
    pub cation: ResinBed,
    pub anion: ResinBed,
    pub flow: Quantity,         // Volume per time
    pub density: f64,           // g / gal
    pub start_date: SystemTime, // Start of the current service run
    unit_system: UnitSystem,
}

impl Vessel {
    /// An empty vessel: both beds absent, water density.
    pub fn new(
        unit_system: UnitSystem,
        flow: Quantity,
        start_date: SystemTime,
    ) -> Result<Self, VesselError> {
        Ok(Self {
            cation: ResinBed::absent(&unit_system)?,
            anion: ResinBed::absent(&unit_system)?,
            flow,
            density: WATER_DENSITY_G_PER_GAL,
            start_date,
            unit_system,
        })
    }

    pub fn unit_system(&self) -> &UnitSystem {
        &self.unit_system
    }

    pub fn bed(&self, kind: BedKind) -> &ResinBed {
        match kind {
            BedKind::Cation => &self.cation,
            BedKind::Anion => &self.anion,
        }
    }

    pub fn bed_mut(&mut self, kind: BedKind) -> &mut ResinBed {
        match kind {
            BedKind::Cation => &mut self.cation,
            BedKind::Anion => &mut self.anion,
        }
    }

    pub fn initial_bed_capacity(&self, kind: BedKind) -> Result<Quantity, VesselError> {
        Ok(self.bed(kind).initial_capacity(&self.unit_system)?)
    }

    /// Summed uptake rate of the bed's species at the current flow, in eq/min.
    pub fn uptake_rate_calc(&self, kind: BedKind) -> Result<Quantity, VesselError> {
        Ok(self
            .bed(kind)
            .uptake_rate(&self.flow, self.density, &self.unit_system)?)
    }

    /// Time elapsed since the start date, read from the system clock.
    pub fn service_time_calc(&self) -> Result<Quantity, VesselError> {
        self.service_time_at(SystemTime::now())
    }

    pub fn service_time_at(&self, now: SystemTime) -> Result<Quantity, VesselError> {
        let elapsed = now.duration_since(self.start_date).map_err(|e| {
            VesselError::StartDateInFuture {
                seconds: e.duration().as_secs_f64(),
            }
        })?;
        Ok(self.unit_system.quantity(elapsed.as_secs_f64(), "s")?)
    }

    /// Remaining exchange capacity, in equivalents.
    ///
    /// Derated initial capacity less everything taken up over the service
    /// time so far. Goes negative once the bed is run past exhaustion.
    pub fn capacity_calc(&self, kind: BedKind, now: SystemTime) -> Result<Quantity, VesselError> {
        let initial = self.initial_bed_capacity(kind)?;
        let uptake = self.uptake_rate_calc(kind)?;
        self.capacity_with(kind, &initial, &uptake, &self.service_time_at(now)?)
    }

    pub(crate) fn capacity_with(
        &self,
        kind: BedKind,
        initial: &Quantity,
        uptake: &Quantity,
        service_time: &Quantity,
    ) -> Result<Quantity, VesselError> {
        let minutes = self.unit_system.convert(service_time, "min")?;
        let derated = initial * (1.0 - self.bed(kind).penalty);
        let consumed = self.unit_system.convert(&(uptake * &minutes), "eq")?;
        Ok(derated.checked_sub(&consumed)?)
    }

    /// Percent of initial capacity consumed; zero when the bed has no capacity.
    pub fn percent_exhausted(&self, kind: BedKind, now: SystemTime) -> Result<Quantity, VesselError> {
        let initial = self.initial_bed_capacity(kind)?;
        let capacity = self.capacity_calc(kind, now)?;
        self.percent_with(&initial, &capacity)
    }

    pub(crate) fn percent_with(
        &self,
        initial: &Quantity,
        capacity: &Quantity,
    ) -> Result<Quantity, VesselError> {
        let percent = self.unit_system.unit("percent")?;
        if initial.is_zero() {
            return Ok(Quantity::zero(percent));
        }
        let remaining = (capacity / initial).to(&Unit::dimensionless())?.magnitude();
        Ok(Quantity::new(100.0 * (1.0 - remaining), percent))
    }

    /// Projected time until the bed reaches `target_fraction` exhaustion,
    /// assuming the current uptake rate holds. Negative once the target has
    /// already been passed.
    ///
    /// An absent bed projects zero time. An installed bed with no uptake has
    /// no trajectory and reports [`VesselError::NoUptake`].
    pub fn time_to_exhaust(
        &self,
        kind: BedKind,
        target_fraction: f64,
        now: SystemTime,
    ) -> Result<Quantity, VesselError> {
        let initial = self.initial_bed_capacity(kind)?;
        let uptake = self.uptake_rate_calc(kind)?;
        let capacity = self.capacity_with(kind, &initial, &uptake, &self.service_time_at(now)?)?;
        self.time_to_exhaust_with(kind, target_fraction, &initial, &uptake, &capacity)
    }

    pub(crate) fn time_to_exhaust_with(
        &self,
        kind: BedKind,
        target_fraction: f64,
        initial: &Quantity,
        uptake: &Quantity,
        capacity: &Quantity,
    ) -> Result<Quantity, VesselError> {
        if !target_fraction.is_finite() {
            return Err(VesselError::InvalidTarget(target_fraction));
        }
        if !self.bed(kind).is_installed() {
            return Ok(self.unit_system.quantity(0.0, "min")?);
        }
        if uptake.is_zero() {
            return Err(VesselError::NoUptake { bed: kind });
        }
        let consumed = initial.checked_sub(capacity)?;
        let remaining = (initial * target_fraction).checked_sub(&consumed)?;
        Ok(self.unit_system.convert(&(&remaining / uptake), "min")?)
    }

    /// Volume processed since the start date at the current flow rate, in gallons.
    pub fn vessel_throughput(&self, now: SystemTime) -> Result<Quantity, VesselError> {
        let service_time = self.service_time_at(now)?;
        Ok(self.unit_system.convert(&(&service_time * &self.flow), "gal")?)
    }

    /// Largest percent exhausted over the installed beds, rounded to an integer.
    pub fn max_pct_exhausted(&self, now: SystemTime) -> Result<i64, VesselError> {
        let cation = self.percent_exhausted(BedKind::Cation, now)?;
        let anion = self.percent_exhausted(BedKind::Anion, now)?;
        Ok(max_installed_percent(
            (self.cation.is_installed(), &cation),
            (self.anion.is_installed(), &anion),
        )?)
    }
}

/// Rounded percent of whichever installed bed is further exhausted. With the
/// cation bed absent this is the anion figure, installed or not.
pub(crate) fn max_installed_percent(
    cation: (bool, &Quantity),
    anion: (bool, &Quantity),
) -> Result<i64, UnitError> {
    let percent = match (cation.0, anion.0) {
        (false, _) => anion.1,
        (true, false) => cation.1,
        (true, true) => match cation.1.checked_cmp(anion.1)? {
            Some(Ordering::Less) => anion.1,
            _ => cation.1,
        },
    };
    Ok(percent.magnitude().round() as i64)
}

/// Per-bed shorthands for the queries above.
impl Vessel {
    pub fn cation_uptake_rate_calc(&self) -> Result<Quantity, VesselError> {
        self.uptake_rate_calc(BedKind::Cation)
    }

    pub fn anion_uptake_rate_calc(&self) -> Result<Quantity, VesselError> {
        self.uptake_rate_calc(BedKind::Anion)
    }

    pub fn cation_capacity_calc(&self, now: SystemTime) -> Result<Quantity, VesselError> {
        self.capacity_calc(BedKind::Cation, now)
    }

    pub fn anion_capacity_calc(&self, now: SystemTime) -> Result<Quantity, VesselError> {
        self.capacity_calc(BedKind::Anion, now)
    }

    pub fn cation_percent_exhausted(&self, now: SystemTime) -> Result<Quantity, VesselError> {
        self.percent_exhausted(BedKind::Cation, now)
    }

    pub fn anion_percent_exhausted(&self, now: SystemTime) -> Result<Quantity, VesselError> {
        self.percent_exhausted(BedKind::Anion, now)
    }

    pub fn time_to_cation_exhaust(
        &self,
        target_fraction: f64,
        now: SystemTime,
    ) -> Result<Quantity, VesselError> {
        self.time_to_exhaust(BedKind::Cation, target_fraction, now)
    }

    pub fn time_to_anion_exhaust(
        &self,
        target_fraction: f64,
        now: SystemTime,
    ) -> Result<Quantity, VesselError> {
        self.time_to_exhaust(BedKind::Anion, target_fraction, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::species::Species;
    use std::time::Duration;

    const DAY: u64 = 86_400;

    fn rel_eq(a: f64, b: f64, rel: f64) -> bool {
        (a - b).abs() <= rel * a.abs().max(b.abs())
    }

    fn now() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_750_000_000)
    }

    fn species(units: &UnitSystem, conc: f64, name: &str, tag: &str, eq: f64, mw: f64, eff: f64) -> Species {
        Species::new(conc, name, tag, eq, mw, units)
            .and_then(|s| s.with_removal_efficiency(eff))
            .unwrap()
    }

    fn bed(units: &UnitSystem, ft3: f64, eq_per_l: f64) -> ResinBed {
        ResinBed::new(
            units.quantity(ft3, "ft3").unwrap(),
            units.quantity(eq_per_l, "eq / L").unwrap(),
        )
    }

    fn vessel(days_in_service: u64) -> Vessel {
        let units = UnitSystem::new();
        let flow = units.quantity(120.0, "gal / min").unwrap();
        let start = now() - Duration::from_secs(days_in_service * DAY);
        let mut v = Vessel::new(units.clone(), flow, start).unwrap();
        v.cation = bed(&units, 20.0, 2.4).with_species(vec![
            species(&units, 3.5, "lithium", "ppm", 1.0, 7.0, 0.0),
            species(&units, 400.0, "ammonia", "ppb", 1.0, 18.04, 0.9),
            species(&units, 10.0, "zinc", "ppb", 2.0, 65.38, 0.98),
        ]);
        v.anion = bed(&units, 10.0, 1.0).with_species(vec![
            species(&units, 1000.0, "boron", "ppm", 1.0, 10.4, 0.0),
            species(&units, 0.5, "sulfate", "ppb", 2.0, 96.06, 0.98),
        ]);
        v
    }

    fn reference_vessel() -> Vessel {
        let units = UnitSystem::new();
        let flow = units.quantity(120.0, "gal / min").unwrap();
        let start = now() - Duration::from_secs(305 * DAY);
        let mut v = Vessel::new(units.clone(), flow, start).unwrap();
        v.anion = bed(&units, 10.0, 1.0).with_species(vec![
            species(&units, 1000.0, "boron", "ppm", 1.0, 10.4, 0.0),
            species(&units, 0.5, "fluoride", "ppb", 1.0, 19.0, 0.0),
            species(&units, 0.5, "chloride", "ppb", 1.0, 34.453, 0.0),
            species(&units, 0.5, "sulfate", "ppb", 2.0, 96.06, 0.98),
            species(&units, 4e-5, "i131", "i131", 1.0, 131.0, 0.98),
        ]);
        v.cation = bed(&units, 20.0, 2.4).with_species(vec![
            species(&units, 3.5, "lithium", "ppm", 1.0, 7.0, 0.0),
            species(&units, 400.0, "ammonia", "ppb", 1.0, 18.04, 0.9),
            species(&units, 10.0, "zinc", "ppb", 2.0, 65.38, 0.98),
            species(&units, 0.5, "sodium", "ppb", 1.0, 22.9898, 0.98),
            species(&units, 0.5, "magnesium", "ppb", 2.0, 24.305, 0.98),
            species(&units, 0.5, "calcium", "ppb", 2.0, 40.08, 0.98),
            species(&units, 4e-5, "cs137", "cs137", 1.0, 137.0, 0.98),
            species(&units, 3e-4, "co58", "co58", 2.0, 58.0, 0.98),
            species(&units, 4e-5, "co60", "co60", 2.0, 60.0, 0.98),
        ]);
        v
    }

    #[test]
    fn reference_vessel_matches_plant_spreadsheet() {
        let v = reference_vessel();
        let t = now();
        let mag = |q: Result<Quantity, VesselError>| q.unwrap().magnitude();

        assert!(rel_eq(mag(v.uptake_rate_calc(BedKind::Cation)), 9.24e-3, 1e-3));
        assert!(rel_eq(mag(v.uptake_rate_calc(BedKind::Anion)), 4.63e-6, 1e-3));
        assert!(rel_eq(mag(v.initial_bed_capacity(BedKind::Cation)), 1359.2064, 1e-3));
        assert!(rel_eq(mag(v.initial_bed_capacity(BedKind::Anion)), 283.17, 1e-3));
        assert!(rel_eq(mag(v.capacity_calc(BedKind::Cation, t)), -2698.62, 1e-3));
        assert!(rel_eq(mag(v.capacity_calc(BedKind::Anion, t)), 281.13, 1e-3));
        assert!(rel_eq(mag(v.percent_exhausted(BedKind::Cation, t)), 298.54, 1e-3));
        assert!(rel_eq(mag(v.percent_exhausted(BedKind::Anion, t)), 0.7187, 1e-3));
        // The recorded cation projection sits about 0.3% off the model value.
        assert!(rel_eq(mag(v.time_to_exhaust(BedKind::Cation, 0.7, t)), -337294.14, 5e-3));
        assert!(rel_eq(mag(v.time_to_exhaust(BedKind::Anion, 0.7, t)), 42337925.0, 1e-3));
        assert_eq!(v.max_pct_exhausted(t).unwrap(), 299);
    }

    #[test]
    fn service_time_is_elapsed_seconds_since_start() {
        let v = vessel(305);
        let t = v.service_time_at(now()).unwrap();
        assert_eq!(t.magnitude(), (305 * DAY) as f64);
        assert_eq!(t.unit().symbol(), "s");
    }

    #[test]
    fn service_time_advances_with_the_clock() {
        let v = vessel(1);
        let a = v.service_time_at(now()).unwrap();
        let b = v.service_time_at(now() + Duration::from_secs(60)).unwrap();
        assert_eq!(b.magnitude() - a.magnitude(), 60.0);
    }

    #[test]
    fn service_time_rejects_future_start_date() {
        let mut v = vessel(0);
        v.start_date = now() + Duration::from_secs(10);
        assert!(matches!(
            v.service_time_at(now()),
            Err(VesselError::StartDateInFuture { .. })
        ));
    }

    #[test]
    fn capacity_subtracts_uptake_over_service_minutes() {
        let v = vessel(10);
        let initial = v.initial_bed_capacity(BedKind::Cation).unwrap().magnitude();
        let rate = v.uptake_rate_calc(BedKind::Cation).unwrap().magnitude();
        let cap = v.capacity_calc(BedKind::Cation, now()).unwrap();
        assert!(rel_eq(cap.magnitude(), initial - rate * 10.0 * 1440.0, 1e-12));
        assert_eq!(cap.unit().symbol(), "eq");
    }

    #[test]
    fn per_bed_shorthands_match_keyed_queries() {
        let v = vessel(120);
        assert_eq!(
            v.cation_uptake_rate_calc().unwrap(),
            v.uptake_rate_calc(BedKind::Cation).unwrap()
        );
        assert_eq!(
            v.anion_capacity_calc(now()).unwrap(),
            v.capacity_calc(BedKind::Anion, now()).unwrap()
        );
        assert_eq!(
            v.cation_percent_exhausted(now()).unwrap(),
            v.percent_exhausted(BedKind::Cation, now()).unwrap()
        );
        assert_eq!(
            v.time_to_anion_exhaust(0.7, now()).unwrap(),
            v.time_to_exhaust(BedKind::Anion, 0.7, now()).unwrap()
        );
    }

    #[test]
    fn percent_exhausted_is_independent_of_capacity_units() {
        let v = vessel(0);
        let units = v.unit_system();
        let initial = units.quantity(200.0, "eq").unwrap();
        let capacity = units.quantity(25.0, "2 * eq").unwrap();
        let pct = v.percent_with(&initial, &capacity).unwrap();
        assert!(rel_eq(pct.magnitude(), 75.0, 1e-12));
        assert_eq!(pct.unit().symbol(), "percent");

        let not_capacity = units.quantity(25.0, "L").unwrap();
        assert!(matches!(
            v.percent_with(&initial, &not_capacity),
            Err(VesselError::Unit(UnitError::Dimensionality { .. }))
        ));
    }

    #[test]
    fn penalty_derates_initial_capacity() {
        let mut v = vessel(0);
        v.cation.penalty = 0.25;
        let initial = v.initial_bed_capacity(BedKind::Cation).unwrap().magnitude();
        let cap = v.capacity_calc(BedKind::Cation, now()).unwrap();
        assert!(rel_eq(cap.magnitude(), 0.75 * initial, 1e-12));
        let pct = v.percent_exhausted(BedKind::Cation, now()).unwrap();
        assert!(rel_eq(pct.magnitude(), 25.0, 1e-9));
    }

    #[test]
    fn percent_exhausted_is_monotone_in_service_time() {
        let v = vessel(0);
        let mut last = f64::NEG_INFINITY;
        for days in [0u64, 1, 30, 180, 365, 1000] {
            let at = now() + Duration::from_secs(days * DAY);
            let pct = v.percent_exhausted(BedKind::Cation, at).unwrap().magnitude();
            assert!(pct >= last);
            last = pct;
        }
    }

    #[test]
    fn absent_bed_reports_zero_percent_and_zero_time() {
        let mut v = vessel(100);
        v.anion = ResinBed::absent(v.unit_system()).unwrap().with_species(v.anion.species.clone());
        let pct = v.percent_exhausted(BedKind::Anion, now()).unwrap();
        assert_eq!(pct.magnitude(), 0.0);
        assert_eq!(pct.unit().symbol(), "percent");
        let t = v.time_to_exhaust(BedKind::Anion, 0.7, now()).unwrap();
        assert_eq!(t.magnitude(), 0.0);
    }

    #[test]
    fn zero_initial_capacity_yields_zero_percent() {
        let mut v = vessel(100);
        v.cation.specific_capacity = v.unit_system().quantity(0.0, "eq / L").unwrap();
        let pct = v.percent_exhausted(BedKind::Cation, now()).unwrap();
        assert_eq!(pct.magnitude(), 0.0);
    }

    #[test]
    fn time_to_exhaust_without_uptake_is_an_error() {
        let mut v = vessel(100);
        v.anion.species.retain(|s| s.removal_efficiency() == 0.0);
        assert_eq!(
            v.time_to_exhaust(BedKind::Anion, 0.7, now()),
            Err(VesselError::NoUptake {
                bed: BedKind::Anion
            })
        );
    }

    #[test]
    fn time_to_exhaust_rejects_non_finite_target() {
        let v = vessel(1);
        assert!(matches!(
            v.time_to_exhaust(BedKind::Cation, f64::NAN, now()),
            Err(VesselError::InvalidTarget(_))
        ));
    }

    #[test]
    fn time_to_exhaust_reaches_zero_at_the_target() {
        let v = vessel(0);
        let minutes = v.time_to_exhaust(BedKind::Cation, 0.5, now()).unwrap();
        assert!(minutes.magnitude() > 0.0);
        let at = now() + Duration::from_secs_f64(minutes.magnitude() * 60.0);
        let pct = v.percent_exhausted(BedKind::Cation, at).unwrap();
        assert!(rel_eq(pct.magnitude(), 50.0, 1e-6));
        let after = v.time_to_exhaust(BedKind::Cation, 0.5, at).unwrap();
        assert!(after.magnitude().abs() < 1e-3);
    }

    #[test]
    fn throughput_is_flow_times_service_time() {
        let v = vessel(1);
        let gal = v.vessel_throughput(now()).unwrap();
        assert!(rel_eq(gal.magnitude(), 120.0 * 1440.0, 1e-12));
        assert_eq!(gal.unit().symbol(), "gal");
    }

    #[test]
    fn throughput_is_recomputed_on_every_call() {
        let v = vessel(1);
        let a = v.vessel_throughput(now()).unwrap();
        let b = v.vessel_throughput(now() + Duration::from_secs(DAY)).unwrap();
        assert!(rel_eq(b.magnitude(), 2.0 * a.magnitude(), 1e-12));
    }

    #[test]
    fn max_pct_exhausted_ignores_absent_beds() {
        let mut v = vessel(305);
        let cation = v.percent_exhausted(BedKind::Cation, now()).unwrap().magnitude();
        let anion = v.percent_exhausted(BedKind::Anion, now()).unwrap().magnitude();
        assert!(cation > anion);
        assert_eq!(v.max_pct_exhausted(now()).unwrap(), cation.round() as i64);

        v.cation = ResinBed::absent(v.unit_system()).unwrap();
        assert_eq!(v.max_pct_exhausted(now()).unwrap(), anion.round() as i64);
    }

    #[test]
    fn max_installed_percent_follows_installed_beds() {
        let units = UnitSystem::new();
        let pct = |v| units.quantity(v, "percent").unwrap();
        let (low, high) = (pct(40.4), pct(60.6));
        assert_eq!(max_installed_percent((true, &low), (true, &high)).unwrap(), 61);
        assert_eq!(max_installed_percent((true, &high), (true, &low)).unwrap(), 61);
        assert_eq!(max_installed_percent((false, &high), (true, &low)).unwrap(), 40);
        assert_eq!(max_installed_percent((true, &low), (false, &high)).unwrap(), 40);
        assert_eq!(max_installed_percent((false, &pct(0.0)), (false, &pct(0.0))).unwrap(), 0);
    }

    #[test]
    fn max_installed_percent_rejects_non_percent_figures() {
        let units = UnitSystem::new();
        let pct = units.quantity(10.0, "percent").unwrap();
        let eq = units.quantity(10.0, "eq").unwrap();
        assert!(matches!(
            max_installed_percent((true, &pct), (true, &eq)),
            Err(UnitError::Dimensionality { operation: "compare", .. })
        ));
    }

    #[test]
    fn flow_without_time_dimension_is_rejected() {
        let mut v = vessel(1);
        v.flow = v.unit_system().quantity(120.0, "gal").unwrap();
        assert!(matches!(
            v.uptake_rate_calc(BedKind::Cation),
            Err(VesselError::Unit(UnitError::Dimensionality { .. }))
        ));
    }
}
