use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileSpecies};
use super::models::AppConfig;
use crate::cli::AssessArgs;
use crate::error::{CliError, Result};
use crate::utils::time::parse_timestamp;
use demins::core::io::species_table::SpeciesTable;
use demins::core::models::bed::BedKind;
use demins::core::models::builder::VesselBuilder;
use demins::core::units::UnitSystem;
use demins::engine::config as core_config;
use std::time::SystemTime;
use tracing::{debug, info};

/// Layers defaults, the vessel file, `--set` values and dedicated flags (in
/// increasing precedence) into a ready-to-run vessel and assessment config.
pub fn build_config(args: &AssessArgs, include_species: bool) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = FileConfig::from_file(&args.config)?;
    let file_config = apply_species_table(file_config, args)?;
    let file_config = apply_set_values(file_config, &args.set_values)?;

    let unit_system = match &args.unit_definitions {
        Some(path) => {
            info!("Loading unit definitions from {:?}", path);
            UnitSystem::new().load_definitions(path)?
        }
        None => UnitSystem::new(),
    };

    let start_date = match (&args.start_date, &file_config.start_date) {
        (Some(cli), _) => parse_datetime("--start-date", cli)?,
        (None, Some(file)) => parse_datetime("start-date", &file.to_string())?,
        (None, None) => {
            return Err(CliError::Config(
                "`start-date` must be given in the vessel file or with --start-date".to_string(),
            ));
        }
    };
    let evaluated_at = match &args.at {
        Some(at) => parse_datetime("--at", at)?,
        None => SystemTime::now(),
    };

    let flow = file_config.flow.clone().unwrap_or_default();
    let flow_value = flow.value.ok_or_else(|| {
        CliError::Config("`flow.value` must be given in the vessel file or with -S".to_string())
    })?;
    let flow_unit = flow.unit.unwrap_or(defaults.flow_unit);
    let density = args
        .density
        .or(file_config.density)
        .unwrap_or(defaults.density);
    let target_fraction = args
        .target_fraction
        .or(file_config.target_fraction)
        .unwrap_or(defaults.target_fraction);

    let mut builder = VesselBuilder::new(unit_system);
    builder
        .start_date(start_date)
        .flow(flow_value, &flow_unit)
        .density(density);
    for kind in BedKind::ALL {
        let Some(bed) = file_config.bed(kind) else {
            debug!("No {} bed described; treating it as not installed.", kind);
            continue;
        };
        builder
            .start_bed(
                kind,
                bed.volume.value,
                &bed.volume.unit,
                bed.specific_capacity.value,
                &bed.specific_capacity.unit,
            )
            .penalty(bed.penalty.unwrap_or(defaults.penalty));
        for s in &bed.species {
            builder.add_species(
                &s.name,
                s.concentration,
                &s.units,
                s.equivalents_per_mole,
                s.molecular_weight,
                s.removal_efficiency,
            );
        }
    }
    let vessel = builder.build()?;

    let core_config = core_config::AssessmentConfigBuilder::new()
        .target_fraction(target_fraction)
        .include_species(include_species)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        vessel,
        evaluated_at,
        core_config,
    })
}

fn parse_datetime(key: &str, value: &str) -> Result<SystemTime> {
    parse_timestamp(value).map_err(|e| CliError::Config(format!("{}: {}", key, e)))
}

fn apply_species_table(mut config: FileConfig, args: &AssessArgs) -> Result<FileConfig> {
    let Some(path) = &args.species else {
        return Ok(config);
    };
    info!("Loading species table from {:?}", path);
    let table = SpeciesTable::load(path)?;
    for kind in BedKind::ALL {
        let species: Vec<FileSpecies> = table.for_bed(kind).map(FileSpecies::from).collect();
        match config.bed_mut(kind) {
            Some(bed) => {
                debug!("Replacing {} bed species with {} from table.", kind, species.len());
                bed.species = species;
            }
            None if species.is_empty() => {}
            None => {
                return Err(CliError::Config(format!(
                    "Species table lists {} {} species, but the vessel file does not describe that bed",
                    species.len(),
                    kind.label().to_lowercase()
                )));
            }
        }
    }
    Ok(config)
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let float = || -> Result<f64> {
            value_str.trim().parse().map_err(|_| {
                CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
            })
        };

        match key.trim() {
            "start-date" => {
                config.start_date = Some(value_str.trim().parse().map_err(|_| {
                    CliError::Config(format!("Invalid datetime for {}: {}", key, value_str))
                })?);
            }
            "flow.value" => {
                config.flow.get_or_insert_with(Default::default).value = Some(float()?);
            }
            "flow.unit" => {
                config.flow.get_or_insert_with(Default::default).unit =
                    Some(value_str.trim().to_string());
            }
            "density" => config.density = Some(float()?),
            "target-fraction" => config.target_fraction = Some(float()?),
            "cation.penalty" | "anion.penalty" => {
                let kind = if key.trim().starts_with("cation") {
                    BedKind::Cation
                } else {
                    BedKind::Anion
                };
                let penalty = float()?;
                let bed = config.bed_mut(kind).ok_or_else(|| {
                    CliError::Config(format!(
                        "Cannot set {}: the vessel file does not describe that bed",
                        key
                    ))
                })?;
                bed.penalty = Some(penalty);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
