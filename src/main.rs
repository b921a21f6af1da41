use clap::Parser;
use mfcc_features::audio::read_wav;
use mfcc_features::helpers::generate_sine_wave;
use mfcc_features::layout::{to_sequence_tensor, DEFAULT_TIME_STEPS};
use mfcc_features::visualize::render_png;
use mfcc_features::{MfccConfig, MfccError, MfccExtractor, FRAME_SIZE, SAMPLE_RATE};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mfcc_features")]
#[command(about = "Extract MFCC features from a WAV file")]
#[command(version)]
struct Args {
    /// Input WAV file; a 1 kHz test tone is analysed when omitted
    input: Option<PathBuf>,

    /// JSON extraction config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a pseudo-colored feature image here
    #[arg(long)]
    png: Option<PathBuf>,

    /// Frames in the sequence tensor
    #[arg(long, default_value_t = DEFAULT_TIME_STEPS)]
    time_steps: usize,
}

fn run(args: Args) -> Result<(), MfccError> {
    let config = match &args.config {
        Some(path) => MfccConfig::from_json_file(path)?,
        None => MfccConfig::default(),
    };
    let epsilon = config.epsilon;
    let extractor = MfccExtractor::new(config)?;

    let signal = match &args.input {
        Some(path) => read_wav(path)?,
        None => {
            info!("no input given, analysing a 1 kHz test tone");
            generate_sine_wave(1000.0, SAMPLE_RATE as f32, FRAME_SIZE * 8, 0.5)
        }
    };

    let matrix = extractor.extract_parallel(&signal)?;
    info!(
        frames = matrix.num_frames(),
        coefficients = matrix.num_coefficients(),
        "extracted mfcc features"
    );
    for (i, mean) in matrix.coefficient_means().iter().enumerate() {
        info!("  MFCC[{}]: mean={:.4}", i, mean);
    }

    let tensor = to_sequence_tensor(&matrix, args.time_steps);
    info!(shape = ?tensor.shape(), "sequence tensor");

    if let Some(png) = &args.png {
        render_png(&matrix, png, epsilon, 8)?;
        info!(path = %png.display(), "wrote feature image");
    }
    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        error!("feature extraction failed: {}", e);
        std::process::exit(1);
    }
}
