// src/main.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use timetally::compute;

#[derive(Parser, Debug)]
#[command(
    name = "timetally",
    about = "Computes worked-vs-required hours from a spreadsheet time log"
)]
struct Cli {
    /// Time log to process (.xlsx, .xls, .ods or .csv)
    file: PathBuf,

    /// Emit the result record as JSON instead of readable text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let report = compute(&cli.file)
        .with_context(|| format!("Failed to process {}", cli.file.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Number of hours required: {}", report.hours_required);
    println!("Number of hours worked:   {}", report.hours_worked);
    println!("Number of days worked:    {}", report.days_worked);
    println!("Average hours per day:    {}", report.average_per_day);
    if report.goal_met {
        println!("Goal met, ahead by {}", report.extra_or_deficit);
    } else {
        println!("Goal not met, short by {}", report.extra_or_deficit);
    }
    println!("Checkpoint date:          {}", report.checkpoint_date);
    println!("Remaining working days:   {}", report.remaining_working_days);
    println!("Pace per remaining day:   {}", report.pace_per_day);
    println!();
    println!(
        "{:<12} {:<10} {:>9} {:>9} {:>10}",
        "Date", "Day", "In", "Out", "Worked"
    );
    for row in &report.table {
        println!(
            "{:<12} {:<10} {:>9} {:>9} {:>10}",
            row.date, row.weekday, row.clock_in, row.clock_out, row.worked
        );
    }
    Ok(())
}
