use crate::cli::AssessArgs;
use crate::config::builder::build_config;
use crate::error::Result;
use demins::workflows;
use tracing::{info, warn};

pub fn run(args: AssessArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args, false)?;

    info!("Invoking the core assessment workflow...");
    let report = workflows::assess::run(&app.vessel, &app.core_config, app.evaluated_at)?;

    let line = report.status_line();
    if line.is_empty() {
        warn!("Neither bed is installed; nothing to report.");
        println!("No resin beds installed.");
    } else {
        println!("{}", line);
    }
    Ok(())
}
