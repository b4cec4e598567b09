use crate::core::models::bed::BedKind;
use crate::core::models::vessel::{Vessel, VesselError, max_installed_percent};
use crate::core::units::Quantity;
use crate::engine::config::AssessmentConfig;
use crate::engine::error::EngineError;
use crate::engine::report::{BedStatus, ExhaustionReport, Forecast, SpeciesStatus};
use std::time::SystemTime;
use tracing::{debug, info, instrument, warn};

/// Evaluates every figure of the exhaustion model for `vessel` at `now`.
#[instrument(skip_all, name = "assessment_workflow")]
pub fn run(
    vessel: &Vessel,
    config: &AssessmentConfig,
    now: SystemTime,
) -> Result<ExhaustionReport, EngineError> {
    let units = vessel.unit_system();
    let service_time = vessel.service_time_at(now)?;
    let throughput = vessel.vessel_throughput(now)?;
    let service_days = units.convert(&service_time, "day")?;
    info!(
        service_days = service_days.magnitude(),
        throughput_gal = throughput.magnitude(),
        "Assessing vessel."
    );

    let cation = assess_bed(vessel, BedKind::Cation, &service_time, config)?;
    let anion = assess_bed(vessel, BedKind::Anion, &service_time, config)?;

    let max_pct_exhausted = max_installed_percent(
        (cation.installed, &cation.percent_exhausted),
        (anion.installed, &anion.percent_exhausted),
    )?;
    let report = ExhaustionReport {
        evaluated_at: now,
        service_time: service_days,
        throughput,
        target_fraction: config.target_fraction,
        max_pct_exhausted,
        cation,
        anion,
    };
    info!(
        max_pct_exhausted,
        "Assessment complete."
    );
    Ok(report)
}

#[instrument(skip_all, fields(bed = %kind))]
fn assess_bed(
    vessel: &Vessel,
    kind: BedKind,
    service_time: &Quantity,
    config: &AssessmentConfig,
) -> Result<BedStatus, EngineError> {
    let units = vessel.unit_system();
    let bed = vessel.bed(kind);
    let installed = bed.is_installed();

    let initial_capacity = vessel.initial_bed_capacity(kind)?;
    let uptake_rate = vessel.uptake_rate_calc(kind)?;
    let capacity = vessel.capacity_with(kind, &initial_capacity, &uptake_rate, service_time)?;
    let percent_exhausted = vessel.percent_with(&initial_capacity, &capacity)?;

    let forecast = if !installed {
        if !bed.species.is_empty() {
            warn!(
                species = bed.species.len(),
                "Bed has species but no volume; treating it as not installed."
            );
        }
        Forecast::NotInstalled
    } else {
        match vessel.time_to_exhaust_with(
            kind,
            config.target_fraction,
            &initial_capacity,
            &uptake_rate,
            &capacity,
        ) {
            Ok(minutes) => Forecast::Remaining(units.convert(&minutes, "day")?),
            Err(VesselError::NoUptake { .. }) => {
                warn!("No species are being removed; exhaustion cannot be projected.");
                Forecast::NoUptake
            }
            Err(e) => return Err(e.into()),
        }
    };

    let species = if config.include_species {
        bed.species
            .iter()
            .map(|s| -> Result<SpeciesStatus, EngineError> {
                Ok(SpeciesStatus {
                    name: s.name().to_string(),
                    units: s.units(),
                    rates: s.rates(&vessel.flow, vessel.density, units)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };

    let status = BedStatus {
        kind,
        installed,
        penalty: bed.penalty,
        initial_capacity,
        uptake_rate,
        capacity,
        percent_exhausted,
        forecast,
        species,
    };
    debug!(
        initial_eq = status.initial_capacity.magnitude(),
        uptake_eq_per_min = status.uptake_rate.magnitude(),
        capacity_eq = status.capacity.magnitude(),
        percent = status.percent_exhausted.magnitude(),
        "Bed evaluated."
    );
    if status.is_over_exhausted() {
        warn!(
            percent = status.percent_exhausted.magnitude(),
            "Bed has been run past its rated capacity."
        );
    }
    Ok(status)
}
