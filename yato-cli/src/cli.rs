// ABOUTME: CLI argument definitions for the yato-img application
// ABOUTME: Defines the command-line interface structure using clap derive macros

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "yato-img")]
#[command(about = "Render cover art inline in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output for debugging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Read configuration from this file instead of the standard locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch (or load from cache) a cover and draw it
    Show {
        /// Media category (anime or manga)
        category: String,

        /// Numeric catalog id
        id: u64,

        /// Source image URL, used only on a cache miss
        url: String,

        /// Size variant stored in the cache (e.g. small, medium, large)
        #[arg(long, default_value = "medium")]
        size: String,

        /// Title shown if the image cannot be drawn
        #[arg(long)]
        title: Option<String>,

        /// Target width in pixels
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        width: Option<u32>,

        /// Target height in pixels
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        height: Option<u32>,

        /// Force a protocol (kitty, iterm2, sixel, ascii, none)
        #[arg(long)]
        protocol: Option<String>,
    },
    /// Show which inline image protocol this terminal gets
    Detect,
    /// Inspect and maintain the on-disk image cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Print the cache root directory
    Path,
    /// Print the total size of cached images
    Size,
    /// Delete least-recently-used images until the cache fits
    Prune {
        /// Size limit, e.g. 100MB, 512KB, 1GB
        #[arg(long, value_name = "SIZE")]
        max_size: String,
    },
    /// Delete the cached image for one identity
    Remove {
        /// Media category (anime or manga)
        category: String,

        /// Numeric catalog id
        id: u64,

        /// Size variant
        #[arg(long, default_value = "medium")]
        size: String,
    },
    /// Delete every cached image
    Clear {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}
