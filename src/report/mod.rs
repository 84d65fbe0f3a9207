//! Scripted bench sessions and plain-text reports for the CLI frontend.
//!
//! Each `run_*` function plays the student: it closes the key, sets the
//! apparatus, hunts for balance or steps the rheostat, records, calculates,
//! and writes the observation table and results to `out`.

use std::io::{self, Write};

use crate::apparatus::NoiseSource;
use crate::error::{LabError, Result};
use crate::experiment::{
    CombinationMode, Experiment, MetreBridge, OhmsLaw, Parameter, ResistanceCombination,
};

/// Jockey step used when hunting for the null point (cm).
pub const SEEK_STEP: f64 = 0.1;

fn output_error(e: io::Error) -> LabError {
    LabError::ReportOutputError {
        message: e.to_string(),
    }
}

/// Slide the jockey along the whole wire in [`SEEK_STEP`] increments and
/// leave it where the galvanometer reads closest to zero.
///
/// Returns the position if that point is inside the null band.
pub fn seek_balance<E: Experiment>(experiment: &mut E) -> Result<Option<f64>> {
    let steps = (100.0 / SEEK_STEP).round() as usize;
    let mut best: Option<(f64, f64)> = None;

    for step in 1..steps {
        let position = step as f64 * SEEK_STEP;
        experiment.set_parameter(Parameter::JockeyPosition, position)?;
        let deflection = experiment.readings().galvanometer_deflection.abs();
        if best.map_or(true, |(_, d)| deflection < d) {
            best = Some((position, deflection));
        }
    }

    let Some((position, _)) = best else {
        return Ok(None);
    };
    experiment.set_parameter(Parameter::JockeyPosition, position)?;
    Ok(experiment.check_record().is_ok().then_some(position))
}

/// Record the current reading, logging rather than failing on a rejection.
fn try_record<E: Experiment>(experiment: &mut E) -> Result<()> {
    match experiment.record() {
        Ok(_) => Ok(()),
        Err(err) if err.is_record_rejection() => {
            log::warn!("Reading not recorded: {}", err);
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Measure the hidden coil with each known resistance in turn.
pub fn run_metre_bridge<W: Write>(
    known_resistances: &[f64],
    wire_length: f64,
    wire_diameter: f64,
    out: &mut W,
) -> Result<()> {
    let mut bridge = MetreBridge::new();
    bridge.set_wire_length(wire_length)?;
    bridge.set_wire_diameter(wire_diameter)?;
    bridge.set_circuit_on(true);

    for &known in known_resistances {
        bridge.set_known_resistance(known)?;
        if seek_balance(&mut bridge)?.is_none() {
            log::warn!("No balance point found with R = {} Ω", known);
            continue;
        }
        try_record(&mut bridge)?;
    }

    writeln!(out, "Metre Bridge").map_err(output_error)?;
    writeln!(out, "{:>4} {:>10} {:>10} {:>10}", "S.No", "R (Ω)", "l (cm)", "S (Ω)")
        .map_err(output_error)?;
    for obs in bridge.observations() {
        writeln!(
            out,
            "{:>4} {:>10.1} {:>10.1} {:>10.2}",
            obs.serial, obs.known_resistance, obs.balance_length, obs.unknown_resistance
        )
        .map_err(output_error)?;
    }

    match bridge.calculate() {
        Ok(results) => {
            writeln!(out, "Mean unknown resistance S = {:.3} Ω", results.mean_resistance)
                .map_err(output_error)?;
            writeln!(
                out,
                "Specific resistance ρ = {:.3e} Ω·m (L = {} m, d = {} mm)",
                results.resistivity, wire_length, wire_diameter
            )
            .map_err(output_error)?;
        }
        Err(err) => writeln!(out, "No results: {}", err).map_err(output_error)?,
    }
    Ok(())
}

/// Step the rheostat through `positions`, recording V and I at each.
pub fn run_ohms_law<N: NoiseSource, W: Write>(
    noise: N,
    positions: &[f64],
    out: &mut W,
) -> Result<()> {
    let mut board = OhmsLaw::with_noise(noise);
    board.set_circuit_on(true);

    for &position in positions {
        board.set_rheostat(position)?;
        try_record(&mut board)?;
    }

    writeln!(out, "Ohm's Law").map_err(output_error)?;
    writeln!(out, "{:>4} {:>10} {:>10}", "S.No", "V (V)", "I (A)").map_err(output_error)?;
    for obs in board.observations() {
        writeln!(out, "{:>4} {:>10.3} {:>10.3}", obs.serial, obs.voltage, obs.current)
            .map_err(output_error)?;
    }

    let wire_length_cm = board.config().wire_length_cm;
    match board.calculate() {
        Ok(results) => {
            writeln!(out, "Resistance from graph R = {:.3} Ω", results.resistance)
                .map_err(output_error)?;
            writeln!(
                out,
                "Resistance per cm R/L = {:.3e} Ω/cm (L = {} cm)",
                results.resistance_per_cm, wire_length_cm
            )
            .map_err(output_error)?;
        }
        Err(err) => writeln!(out, "No results: {}", err).map_err(output_error)?,
    }
    Ok(())
}

/// Balance the bridge with the coils in series and then in parallel, once
/// per known resistance.
pub fn run_combination<W: Write>(
    r1: f64,
    r2: f64,
    known_resistances: &[f64],
    out: &mut W,
) -> Result<()> {
    let mut session = ResistanceCombination::new();
    session.set_r1(r1)?;
    session.set_r2(r2)?;
    session.set_circuit_on(true);

    for mode in [CombinationMode::Series, CombinationMode::Parallel] {
        session.set_mode(mode);
        for &known in known_resistances {
            session.set_known_resistance(known)?;
            if seek_balance(&mut session)?.is_none() {
                log::warn!("No balance point found in {} with R = {} Ω", mode, known);
                continue;
            }
            try_record(&mut session)?;
        }
    }

    writeln!(out, "Resistance Combination (r1 = {} Ω, r2 = {} Ω)", r1, r2)
        .map_err(output_error)?;
    writeln!(
        out,
        "{:>4} {:>9} {:>10} {:>10} {:>10}",
        "S.No", "Mode", "R (Ω)", "l (cm)", "S (Ω)"
    )
    .map_err(output_error)?;
    for obs in session.observations() {
        writeln!(
            out,
            "{:>4} {:>9} {:>10.1} {:>10.1} {:>10.2}",
            obs.serial, obs.mode, obs.known_resistance, obs.balance_length, obs.experimental_resistance
        )
        .map_err(output_error)?;
    }

    match session.calculate() {
        Ok(results) => {
            for mode in [CombinationMode::Series, CombinationMode::Parallel] {
                let result = results.for_mode(mode);
                let experimental = result
                    .experimental
                    .map_or_else(|| "-".to_string(), |e| format!("{:.2}", e));
                let error = result
                    .percentage_error
                    .map_or_else(|| "-".to_string(), |e| format!("{:.2}%", e));
                writeln!(
                    out,
                    "{}: theoretical {:.2} Ω, experimental {} Ω, error {}",
                    mode, result.theoretical, experimental, error
                )
                .map_err(output_error)?;
            }
        }
        Err(err) => writeln!(out, "No results: {}", err).map_err(output_error)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apparatus::FixedNoise;
    use crate::physics::{balance_point, S_ACTUAL};

    #[test]
    fn test_seek_balance_finds_null() {
        let mut bridge = MetreBridge::new();
        bridge.set_circuit_on(true);
        let position = seek_balance(&mut bridge).unwrap().unwrap();
        let expected = balance_point(2.0, S_ACTUAL).unwrap();
        assert!((position - expected).abs() <= SEEK_STEP);
        assert!(bridge.is_balanced());
    }

    #[test]
    fn test_seek_balance_with_key_open() {
        let mut bridge = MetreBridge::new();
        assert_eq!(seek_balance(&mut bridge).unwrap(), None);
    }

    #[test]
    fn test_metre_bridge_report() {
        let mut out = Vec::new();
        run_metre_bridge(&[2.0, 4.0, 6.0], 1.0, 0.5, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Metre Bridge"));
        assert_eq!(text.lines().filter(|l| l.trim_start().starts_with(char::is_numeric)).count(), 3);
        assert!(text.contains("Mean unknown resistance S = "));
    }

    #[test]
    fn test_ohms_law_report() {
        let mut out = Vec::new();
        run_ohms_law(FixedNoise(0.5), &[0.0, 50.0, 100.0], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Resistance from graph R = 2.000 Ω"));
    }

    #[test]
    fn test_ohms_law_report_without_results() {
        let mut out = Vec::new();
        run_ohms_law(FixedNoise(0.5), &[50.0, 50.0], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("No results: Need at least 2 observation(s)"));
    }

    #[test]
    fn test_combination_report() {
        let mut out = Vec::new();
        run_combination(6.0, 3.0, &[5.0, 10.0], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Series: theoretical 9.00 Ω"));
        assert!(text.contains("Parallel: theoretical 2.00 Ω"));
    }
}
