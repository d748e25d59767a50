use super::helpers::{read_image_grid, write_text_artifact};
use super::CliError;
use clap::Args;
use rotspec_core::common::config::{load_analysis_config, AnalysisConfig};
use rotspec_core::domain::{CoreResult, RotspecError, TemperatureEstimate};
use rotspec_core::solver::TemperatureSolver;
use rotspec_core::spectra::Spectrum;
use rotspec_core::synth::{lines, LineListInput};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

fn core_error(error: impl Into<RotspecError>) -> CliError {
    CliError::Compute(error.into())
}

#[derive(Debug, Args)]
pub(super) struct SynthArgs {
    /// Analysis configuration JSON
    #[arg(long)]
    config: PathBuf,
    /// Rotational temperature in kelvin
    #[arg(long)]
    temperature: f64,
    /// Output CSV path
    #[arg(long)]
    output: PathBuf,
    /// Convert vacuum wavelengths to air before writing
    #[arg(long)]
    air: bool,
}

pub(super) fn run_synth_command(args: SynthArgs) -> Result<i32, CliError> {
    let config = load_analysis_config(&args.config).map_err(core_error)?;
    config.validate().map_err(core_error)?;

    let set = config.band.constants;
    let input = LineListInput::new(
        set.upper_state(),
        config.band.initial_v,
        set.lower_state(),
        config.band.final_v,
        config.band.j_max,
        args.temperature,
    );
    let mut spectrum = lines(input)
        .map_err(core_error)?
        .normalize(1.0)
        .map_err(core_error)?;
    if args.air {
        spectrum.convert_to_air();
    }

    write_text_artifact(&args.output, &spectrum.render_csv())?;
    info!(
        lines = spectrum.len(),
        temperature = args.temperature,
        output = %args.output.display(),
        "synthesized line spectrum"
    );
    Ok(0)
}

#[derive(Debug, Args)]
pub(super) struct CollapseArgs {
    /// Analysis configuration JSON
    #[arg(long)]
    config: PathBuf,
    /// Image intensity grid as a JSON matrix
    #[arg(long)]
    image: PathBuf,
    /// Output CSV path
    #[arg(long)]
    output: PathBuf,
}

pub(super) fn run_collapse_command(args: CollapseArgs) -> Result<i32, CliError> {
    let config = load_analysis_config(&args.config).map_err(core_error)?;
    config.validate().map_err(core_error)?;

    let mut spectrum =
        reduce_frame(&config, &args.image).map_err(CliError::Compute)?;
    spectrum.shift_wavelengths(config.wavelength_shift);

    write_text_artifact(&args.output, &spectrum.render_csv())?;
    info!(
        points = spectrum.len(),
        output = %args.output.display(),
        "collapsed image to spectrum"
    );
    Ok(0)
}

#[derive(Debug, Args)]
pub(super) struct FitArgs {
    /// Analysis configuration JSON
    #[arg(long)]
    config: PathBuf,
    /// Output CSV of time, temperature, squared error
    #[arg(long)]
    results: PathBuf,
    /// Optional output CSV of time, raw peak signal
    #[arg(long)]
    signal: Option<PathBuf>,
    /// Ordered image sequence, one JSON matrix per frame
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

pub(super) fn run_fit_command(args: FitArgs) -> Result<i32, CliError> {
    let config = load_analysis_config(&args.config).map_err(core_error)?;
    let settings = config.fit_settings().map_err(core_error)?;
    let mut solver = TemperatureSolver::new(settings).map_err(core_error)?;

    let mut result_rows = Vec::with_capacity(args.images.len());
    let mut signal_rows = Vec::with_capacity(args.images.len());
    for (index, path) in args.images.iter().enumerate() {
        let time = index as f64 * config.time_step;

        // A frame that cannot be reduced is reported and zeroed; the
        // rest of the sequence still runs.
        let mut frame = match reduce_frame(&config, path) {
            Ok(frame) => frame,
            Err(error) => {
                warn!(frame = index, "{}", error.diagnostic_line());
                result_rows.push((time, 0.0, 0.0));
                signal_rows.push((time, 0.0));
                continue;
            }
        };
        frame.shift_wavelengths(config.wavelength_shift);
        let peak = frame.peak_intensity();

        let estimate = solver.fit(&frame).map_err(core_error)?;
        match estimate {
            TemperatureEstimate::Fitted {
                kelvin,
                squared_error,
            } => info!(
                frame = index,
                kelvin,
                squared_error,
                "fitted rotational temperature"
            ),
            TemperatureEstimate::Ambiguous { root_count } => warn!(
                frame = index,
                root_count, "temperature ambiguous, setting to zero"
            ),
            TemperatureEstimate::LowSignal { peak } => {
                warn!(frame = index, peak, "signal too low, setting to zero")
            }
        }

        result_rows.push((time, estimate.kelvin_or_zero(), estimate.error_or_zero()));
        signal_rows.push((time, peak));
    }

    write_text_artifact(&args.results, &render_triples(&result_rows))?;
    if let Some(signal_path) = &args.signal {
        write_text_artifact(signal_path, &render_pairs(&signal_rows))?;
    }
    info!(
        frames = result_rows.len(),
        results = %args.results.display(),
        "sequence analysis complete"
    );
    Ok(0)
}

fn reduce_frame(config: &AnalysisConfig, path: &Path) -> CoreResult<Spectrum> {
    let grid = read_image_grid(path)?;
    let image = config.configured_image(grid)?;
    let spectrum = image.collapse()?;
    Ok(spectrum)
}

fn render_pairs(rows: &[(f64, f64)]) -> String {
    let mut output = String::new();
    for (a, b) in rows {
        output.push_str(&format!("{:e}, {:e}\n", a, b));
    }
    output
}

fn render_triples(rows: &[(f64, f64, f64)]) -> String {
    let mut output = String::new();
    for (a, b, c) in rows {
        output.push_str(&format!("{:e}, {:e}, {:e}\n", a, b, c));
    }
    output
}
