//! dds2png - terrain texture converter
//!
//! Converts the fixed set of terrain DDS textures under the working
//! directory into PNGs under `public/`.

use anyhow::{Context, Result};
use clap::Parser;
use dds2png::convert::{ConversionRunner, RunConfig};
use dds2png::textures::ImageCodec;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dds2png")]
#[command(version)]
#[command(about = "Convert terrain DDS textures to PNG for the browser renderer")]
struct Cli {
    /// Enable verbose logging (use RUST_LOG=debug for more detail)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Only initialize logging if verbose or RUST_LOG is set
    if cli.verbose || std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive(if cli.verbose { "dds2png=debug".parse()? } else { "dds2png=warn".parse()? }),
            )
            .init();
    }

    let codec = ImageCodec::new();
    for cap in codec.capabilities() {
        match cap.encode {
            Some(encoder) => println!("{}: decode via {}, encode via {}", cap.format, cap.decode, encoder),
            None => println!("{}: decode via {}", cap.format, cap.decode),
        }
    }
    println!();

    let config = RunConfig::from_current_dir().context("Failed to resolve working directory")?;
    let result = ConversionRunner::new(config, codec).run();

    println!("\nConverted {} files successfully", result);

    Ok(())
}
