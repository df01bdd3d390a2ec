use anyhow::Context;
use clap::Parser;
use imgclean::codec::load_image;
use imgclean::tools::{binary_stats, grayscale_stats};
use imgclean::utils::grayscale::to_grayscale;
use imgclean::{CleanConfig, CleaningPipeline, ColorImage, Strategy, clean_and_save, clean_file};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "imgclean", version, about = "Binarize scanned document images")]
struct Cli {
    /// Input image (.ppm, .png, .jpg, .jpeg).
    #[arg(short, long)]
    input: PathBuf,

    /// Output image (.ppm, .png, .jpg, .jpeg).
    #[arg(short, long)]
    output: PathBuf,

    /// Thresholding strategy: "adaptive" or "integral".
    #[arg(short, long)]
    strategy: Option<Strategy>,

    /// Window radius for local statistics (window side is 2N+1).
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=255))]
    half_window: Option<u16>,

    /// Local-mean multiplier for the integral strategy, in (0, 2].
    #[arg(long, value_parser = parse_factor)]
    factor: Option<f32>,

    /// Process rows on a single thread.
    #[arg(long)]
    sequential: bool,

    /// Print grayscale and ink statistics.
    #[arg(long)]
    stats: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

/// Same upper bound as `IMGCLEAN_INTEGRAL_FACTOR`.
const MAX_FACTOR: f32 = 2.0;

fn parse_factor(value: &str) -> Result<f32, String> {
    let factor: f32 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if factor.is_finite() && factor > 0.0 && factor <= MAX_FACTOR {
        Ok(factor)
    } else {
        Err(format!("must be greater than 0 and at most {}", MAX_FACTOR))
    }
}

impl Cli {
    fn config(&self) -> CleanConfig {
        let mut config = CleanConfig::from_env();
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(half_window) = self.half_window {
            config.half_window = half_window as usize;
        }
        if let Some(factor) = self.factor {
            config.integral_factor = factor;
        }
        if self.sequential {
            config.parallel = false;
        }
        config
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "imgclean=debug" } else { "imgclean=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.config();
    let context = || {
        format!(
            "failed to clean '{}' into '{}'",
            cli.input.display(),
            cli.output.display()
        )
    };

    let report = if cli.stats {
        let image = load_image(&cli.input)
            .with_context(|| format!("failed to load image '{}'", cli.input.display()))?;
        print_input_stats(&cli.input, &image, &config);
        clean_and_save(image, &cli.output, &config).with_context(context)?
    } else {
        clean_file(&cli.input, &cli.output, &config).with_context(context)?
    };

    tracing::info!(
        width = report.width,
        height = report.height,
        strategy = %report.strategy,
        "Saved image to '{}'",
        cli.output.display()
    );

    if cli.stats {
        println!(
            "Output: {}x{} strategy={} ink_pixels={} total={} ink_ratio={:.2}% time={:.1}ms",
            report.width,
            report.height,
            report.strategy,
            report.ink.ink_pixels,
            report.ink.total_pixels,
            report.ink.ink_ratio * 100.0,
            report.elapsed.as_secs_f64() * 1000.0
        );
    }

    Ok(())
}

fn print_input_stats(input: &Path, image: &ColorImage, config: &CleanConfig) {
    println!("Image: {} ({}x{})", input.display(), image.width(), image.height());

    let gray = to_grayscale(image);
    let stats = grayscale_stats(&gray);
    println!(
        "Grayscale range: {}-{}, average: {}",
        stats.min, stats.max, stats.avg
    );

    for strategy in [Strategy::Adaptive, Strategy::Integral] {
        let pipeline = CleaningPipeline::new(config.clone().with_strategy(strategy));
        let ink = binary_stats(&pipeline.binarize(&gray));
        println!(
            "  {:>8}: ink_ratio={:.2}%",
            strategy,
            ink.ink_ratio * 100.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_range() {
        assert_eq!(parse_factor("0.85"), Ok(0.85));
        assert_eq!(parse_factor("2"), Ok(2.0));
        assert!(parse_factor("0").is_err());
        assert!(parse_factor("2.5").is_err());
        assert!(parse_factor("inf").is_err());
        assert!(parse_factor("abc").is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "imgclean", "-i", "in.ppm", "-o", "out.png", "-s", "adaptive", "--half-window", "3",
            "--factor", "1.5", "--sequential",
        ]);
        let config = cli.config();
        assert_eq!(config.strategy, Strategy::Adaptive);
        assert_eq!(config.half_window, 3);
        assert_eq!(config.integral_factor, 1.5);
        assert!(!config.parallel);
    }

    #[test]
    fn test_out_of_range_factor_rejected() {
        let parsed = Cli::try_parse_from(["imgclean", "-i", "a.ppm", "-o", "b.ppm", "--factor", "3"]);
        assert!(parsed.is_err());
    }
}
