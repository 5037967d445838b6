//! Veles CLI - command-line tool for inspecting DDS texture containers.
//!
//! This is the main entry point for the Veles command-line application.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use veles_dds::DdsTexture;

/// Veles - DDS texture container inspection tool
#[derive(Parser)]
#[command(name = "veles")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show header and format information for a DDS file
    Info {
        /// Path to the DDS file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the subresource layout of a DDS file
    Layout {
        /// Path to the DDS file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    simple_logger::SimpleLogger::new()
        .with_level(cli.log_level)
        .init()?;

    match cli.command {
        Commands::Info { input } => cmd_info(&input)?,
        Commands::Layout { input } => cmd_layout(&input)?,
    }

    Ok(())
}

fn cmd_info(input: &PathBuf) -> Result<()> {
    let data = fs::read(input).context("Failed to read input file")?;
    let texture = DdsTexture::parse(&data).context("Failed to parse DDS file")?;

    let header = texture.header;
    let width = header.width;
    let height = header.height;
    let depth = header.depth;

    let kind = if header.is_cubemap() {
        "cubemap"
    } else if header.is_volume() {
        "volume"
    } else {
        "2d"
    };

    println!("File: {} ({} bytes)", input.display(), data.len());
    println!("Dimensions: {}x{}x{}", width, height, depth);
    println!("Mip levels: {}", header.mip_levels());
    println!("Array elements: {}", texture.array_size());
    println!("Format: {:?}", texture.format);
    println!("Kind: {}", kind);

    if let Some(dxt10) = texture.dxt10 {
        let dxgi_format = dxt10.dxgi_format;
        let dimension = dxt10.resource_dimension;
        println!("DX10: dxgi format {}, resource dimension {}", dxgi_format, dimension);
    }

    Ok(())
}

fn cmd_layout(input: &PathBuf) -> Result<()> {
    let data = fs::read(input).context("Failed to read input file")?;
    let texture = DdsTexture::parse(&data).context("Failed to parse DDS file")?;

    let mip_levels = texture.header.mip_levels() as usize;

    println!(
        "{:>5} {:>7} {:>4} {:>10} {:>10} {:>10}",
        "index", "element", "mip", "offset", "pitch", "size"
    );

    for (index, subresource) in texture.subresources.iter().enumerate() {
        // The descriptor list carries offsets only; a level's size is the
        // gap to the next offset, or to the end of the file for the last.
        let next_offset = texture
            .subresources
            .get(index + 1)
            .map_or(data.len(), |s| s.data_offset);
        let size = next_offset.saturating_sub(subresource.data_offset);

        println!(
            "{:>5} {:>7} {:>4} {:>10} {:>10} {:>10}",
            index,
            index / mip_levels,
            index % mip_levels,
            subresource.data_offset,
            subresource.row_pitch,
            size,
        );
    }

    // The decoder trusts the header; check the computed ranges against the
    // real file length before anything uploads from them.
    if let Some(last) = texture.subresources.last() {
        if last.data_offset > data.len() {
            anyhow::bail!(
                "header claims more payload than the file holds: offset {} in a {} byte file",
                last.data_offset,
                data.len()
            );
        }
    }

    println!(
        "\nTotal: {} subresources, {} payload bytes",
        texture.subresources.len(),
        data.len() - texture.payload_offset
    );

    Ok(())
}
