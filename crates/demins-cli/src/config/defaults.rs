use demins::core::models::species::WATER_DENSITY_G_PER_GAL;
use demins::core::models::vessel::DEFAULT_TARGET_FRACTION;

pub struct DefaultsConfig {
    pub flow_unit: String,
    pub density: f64,
    pub target_fraction: f64,
    pub penalty: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            flow_unit: "gpm".to_string(),
            density: WATER_DENSITY_G_PER_GAL,
            target_fraction: DEFAULT_TARGET_FRACTION,
            penalty: 0.0,
        }
    }
}
