use clap::Parser;
use notam_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    commands::shared::setup_logging(&args.global);

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("NOTAM Processor - NOTAM and METAR text to structured tables");
    println!("===========================================================");
    println!();
    println!("USAGE:");
    println!("    notam-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    extract-notams  Extract notices from raw NOTAM text into a source table");
    println!("    merge           Merge source tables into the canonical NOTAM table");
    println!("    metar           Parse raw METAR lines into a weather table");
    println!("    date            Render a compact timestamp in the Persian calendar");
    println!("    report          Render all notices for one airport");
    println!();
    println!("EXAMPLES:");
    println!("    notam-processor extract-notams --icao OIII --input oiii.txt --output notam_fetch_faa.csv");
    println!("    notam-processor merge notam_fetch_*.csv");
    println!("    notam-processor metar --input metar.txt --format parquet --latest-only");
    println!("    notam-processor date 2503202200 EST --offset 3.5");
    println!("    notam-processor report --icao OIII --airports IRAN_AIRPORTS.csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    notam-processor <COMMAND> --help");
}
