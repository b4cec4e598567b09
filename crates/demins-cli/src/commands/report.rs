use crate::cli::ReportArgs;
use crate::config::builder::build_config;
use crate::error::Result;
use crate::utils::time::format_timestamp;
use demins::engine::report::{BedStatus, ExhaustionReport, Forecast};
use demins::workflows;
use std::fmt::Write;
use tracing::info;

pub fn run(args: ReportArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args.assess, args.species_rates)?;

    info!("Invoking the core assessment workflow...");
    let report = workflows::assess::run(&app.vessel, &app.core_config, app.evaluated_at)?;

    print!("{}", render(&report));
    Ok(())
}

fn render(report: &ExhaustionReport) -> String {
    let mut out = String::new();
    let target_pct = report.target_fraction * 100.0;
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Vessel assessment at {}", format_timestamp(report.evaluated_at));
    let _ = writeln!(out, "  In service:         {:.2}", report.service_time);
    let _ = writeln!(out, "  Throughput:         {:.0}", report.throughput);
    let _ = writeln!(out, "  Forecast target:    {:.0}% exhausted", target_pct);
    let _ = writeln!(out, "  Max exhausted:      {}%", report.max_pct_exhausted);

    for bed in [&report.cation, &report.anion] {
        let _ = writeln!(out);
        render_bed(&mut out, bed, target_pct);
    }
    out
}

fn render_bed(out: &mut String, bed: &BedStatus, target_pct: f64) {
    let _ = writeln!(out, "{} bed", bed.kind);
    if !bed.installed {
        let _ = writeln!(out, "  not installed");
        return;
    }
    let _ = writeln!(out, "  Initial capacity:   {:.2}", bed.initial_capacity);
    let _ = writeln!(out, "  Derating penalty:   {:.2}", bed.penalty);
    let _ = writeln!(out, "  Uptake rate:        {:.4e}", bed.uptake_rate.magnitude());
    let _ = writeln!(out, "  Remaining capacity: {:.2}", bed.capacity);
    let _ = writeln!(out, "  Percent exhausted:  {:.2}%", bed.percent_exhausted.magnitude());
    let forecast = match &bed.forecast {
        Forecast::Remaining(days) if days.magnitude() < 0.0 => format!(
            "{:.0}% reached {:.1} days ago",
            target_pct,
            -days.magnitude()
        ),
        Forecast::Remaining(days) => {
            format!("{:.0}% in {:.1} days", target_pct, days.magnitude())
        }
        Forecast::NoUptake => "no uptake; cannot be projected".to_string(),
        Forecast::NotInstalled => "not installed".to_string(),
    };
    let _ = writeln!(out, "  Forecast:           {}", forecast);

    if !bed.species.is_empty() {
        let _ = writeln!(
            out,
            "  {:<12} {:<6} {:>14} {:>14}",
            "species", "units", "dot_e eq/min", "uptake eq/min"
        );
        for s in &bed.species {
            let _ = writeln!(
                out,
                "  {:<12} {:<6} {:>14.4e} {:>14.4e}",
                s.name,
                s.units.tag(),
                s.rates.dot_e.magnitude(),
                s.rates.uptake_rate.magnitude()
            );
        }
    }
}
