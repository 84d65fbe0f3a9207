//! Bridge Lab - virtual electrical measurements bench
//!
//! Runs a scripted session of one experiment and prints the observation
//! table and results.
//!
//! # Usage
//!
//! ```bash
//! bridge-lab metre-bridge --known 2 --known 4 --known 6 --wire-length 1.0 --wire-diameter 0.5
//! bridge-lab ohms-law --seed 7
//! bridge-lab combination --r1 6 --r2 3
//! RUST_LOG=debug bridge-lab ohms-law
//! ```

use std::io;

use bridge_lab::{
    apparatus::{SeededNoise, ThreadRngNoise},
    error::Result,
    report,
};
use clap::{Parser, Subcommand};

/// Virtual electrical measurements bench
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    experiment: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find an unknown resistance and its resistivity with a metre bridge
    MetreBridge {
        /// Known resistance to balance against (Ω); repeat for several readings
        #[arg(short, long = "known", default_values_t = [1.0, 2.0, 4.0, 6.0, 8.0])]
        known: Vec<f64>,

        /// Length of the wire (m)
        #[arg(long, default_value_t = 1.0)]
        wire_length: f64,

        /// Diameter of the wire (mm)
        #[arg(long, default_value_t = 0.5)]
        wire_diameter: f64,
    },

    /// Determine resistance per cm from a V-I graph
    OhmsLaw {
        /// Rheostat positions (%) to take readings at
        #[arg(short, long = "rheostat", default_values_t = [0.0, 20.0, 40.0, 60.0, 80.0, 100.0])]
        rheostat: Vec<f64>,

        /// Seed the meter jitter for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Verify the series and parallel laws of resistances
    Combination {
        /// First coil (Ω)
        #[arg(long, default_value_t = bridge_lab::physics::R1_ACTUAL)]
        r1: f64,

        /// Second coil (Ω)
        #[arg(long, default_value_t = bridge_lab::physics::R2_ACTUAL)]
        r2: f64,

        /// Known resistance to balance against (Ω); repeat for several readings
        #[arg(short, long = "known", default_values_t = [4.0, 6.0, 8.0, 10.0])]
        known: Vec<f64>,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut out = io::stdout().lock();

    match args.experiment {
        Command::MetreBridge {
            known,
            wire_length,
            wire_diameter,
        } => report::run_metre_bridge(&known, wire_length, wire_diameter, &mut out)?,

        Command::OhmsLaw { rheostat, seed } => match seed {
            Some(seed) => report::run_ohms_law(SeededNoise::new(seed), &rheostat, &mut out)?,
            None => report::run_ohms_law(ThreadRngNoise, &rheostat, &mut out)?,
        },

        Command::Combination { r1, r2, known } => {
            report::run_combination(r1, r2, &known, &mut out)?
        }
    }

    Ok(())
}
