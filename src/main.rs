//! `neural-style` CLI - Apply a pretrained style-transfer model to an image pair.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use neural_style::{image, transfer_style, Config, OnnxLoader};

/// Stylize a content image with the texture of a style image.
#[derive(Parser, Debug)]
#[command(name = "neural-style")]
#[command(version, about, long_about = None)]
struct Args {
    /// Content image path (.jpg or .png).
    #[arg(value_name = "CONTENT")]
    content: PathBuf,

    /// Style image path (.jpg or .png).
    #[arg(value_name = "STYLE")]
    style: PathBuf,

    /// Pretrained model: an .onnx file or a directory containing model.onnx.
    #[arg(value_name = "MODEL")]
    model: PathBuf,

    /// Output image path; the format follows the extension.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let spinner = ProgressBar::new_spinner();

    // Log lines go through the spinner so they don't overwrite it
    let log_spinner = spinner.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neural_style=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(move || SpinnerWriter(log_spinner.clone())),
        )
        .init();

    if let Err(err) = run(&args, &spinner) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Writes to stderr with the spinner cleared for the duration of the write.
struct SpinnerWriter(ProgressBar);

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.suspend(|| io::stderr().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.suspend(|| io::stderr().flush())
    }
}

fn run(args: &Args, spinner: &ProgressBar) -> Result<()> {
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .context("invalid spinner template")?,
    );
    spinner.set_message("Stylizing");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = stylize(args);
    spinner.finish_and_clear();
    result?;

    println!(
        "Stylized {} with {} -> {}",
        args.content.display(),
        args.style.display(),
        args.output.display()
    );

    Ok(())
}

fn stylize(args: &Args) -> Result<()> {
    let config = Config::default();

    let stylized = transfer_style(&args.content, &args.style, &args.model, &OnnxLoader::new())
        .with_context(|| format!("Failed to stylize {}", args.content.display()))?;

    tracing::info!("Saving output to: {}", args.output.display());
    image::save_image(&stylized, &args.output, config.output_quality)
        .context("Failed to save stylized image")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_writer_passes_bytes_through() {
        let spinner = ProgressBar::hidden();
        let mut writer = SpinnerWriter(spinner.clone());

        assert_eq!(writer.write(b"Loading images...\n").unwrap(), 18);
        writer.flush().unwrap();
        assert!(!spinner.is_finished());
    }

    #[test]
    fn test_args_are_four_positionals() {
        let args = Args::try_parse_from(["neural-style", "c.jpg", "s.png", "model", "out.jpeg"])
            .unwrap();
        assert_eq!(args.model, PathBuf::from("model"));

        assert!(Args::try_parse_from(["neural-style", "c.jpg", "s.png", "model"]).is_err());
        assert!(
            Args::try_parse_from(["neural-style", "c.jpg", "s.png", "m", "o.png", "--quality", "9"])
                .is_err()
        );
    }
}
