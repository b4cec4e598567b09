use demins::core::models::vessel::Vessel;
use demins::engine::config::AssessmentConfig;
use std::time::SystemTime;

#[derive(Debug)]
pub struct AppConfig {
    pub vessel: Vessel,
    pub evaluated_at: SystemTime,
    pub core_config: AssessmentConfig,
}
