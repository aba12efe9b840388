// ABOUTME: Command handlers that wire config, detection, cache, and renderer together
// ABOUTME: Each handler maps one subcommand onto the yato-images library

use crate::cli::CacheCommands;
use crate::cli_output::CliOutput;
use crate::config::Config;
use crate::constants::render;
use crate::progress::ProgressFetcher;
use anyhow::{Context, Result, anyhow};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use yato_images::cache::{default_cache_root, parse_size};
use yato_images::constants::env;
use yato_images::{
    HttpFetcher, ImageCache, ImageManager, ImageRenderResult, ImageRenderer, MediaCategory,
    MediaIdentity, MediaItem, RenderStrategy, TerminalSignals,
};

pub struct ShowArgs {
    pub category: String,
    pub id: u64,
    pub url: String,
    pub size: String,
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub protocol: Option<String>,
}

/// Cache root: `YATO_IMAGE_CACHE`, then the config file, then the platform default
pub fn resolve_cache_dir(config: &Config) -> Result<PathBuf> {
    let env_override = std::env::var_os(env::CACHE_DIR).filter(|v| !v.is_empty());
    if env_override.is_none() {
        if let Some(ref dir) = config.cache_dir {
            return Ok(dir.clone());
        }
    }
    default_cache_root().ok_or_else(|| anyhow!("Cannot determine cache directory"))
}

/// Strategy: `--protocol`, then `YATO_FORCE_PROTOCOL`, then the config file,
/// then terminal detection.
pub fn resolve_strategy(
    flag: Option<&str>,
    config: &Config,
    mut signals: TerminalSignals,
) -> Result<RenderStrategy> {
    if let Some(flag) = flag {
        return flag.parse::<RenderStrategy>().map_err(|e| anyhow!(e));
    }

    let env_strategy = signals
        .forced
        .as_deref()
        .and_then(|forced| forced.parse::<RenderStrategy>().ok());
    if env_strategy.is_none() {
        if let Some(forced) = signals.forced.take() {
            log::warn!("Ignoring {}={:?}: unknown protocol", env::FORCE_PROTOCOL, forced);
        }
        if let Some(strategy) = config.render_strategy() {
            return Ok(strategy);
        }
    }
    Ok(RenderStrategy::from_signals(&signals))
}

fn open_cache(config: &Config, show_progress: bool) -> Result<ImageCache> {
    let cache_dir = resolve_cache_dir(config)?;
    let fetcher = match config.fetch_timeout() {
        Some(timeout) => HttpFetcher::with_timeout(timeout),
        None => HttpFetcher::new(),
    }
    .context("Failed to set up image fetcher")?;

    Ok(ImageCache::new(
        cache_dir,
        ProgressFetcher::new(fetcher, show_progress),
    ))
}

/// Requested box, falling back to the default clamped to the terminal's size
fn target_box(width: Option<u32>, height: Option<u32>) -> (u32, u32) {
    let (max_width, max_height) = terminal_pixels().unwrap_or((u32::MAX, u32::MAX));
    (
        width.unwrap_or(render::DEFAULT_WIDTH.min(max_width)),
        height.unwrap_or(render::DEFAULT_HEIGHT.min(max_height)),
    )
}

fn terminal_pixels() -> Option<(u32, u32)> {
    if let Ok(size) = crossterm::terminal::window_size() {
        if size.width > 0 && size.height > 0 {
            return Some((size.width as u32, size.height as u32));
        }
    }
    crossterm::terminal::size().ok().map(|(columns, rows)| {
        (
            columns as u32 * render::CELL_WIDTH_PX,
            rows as u32 * render::CELL_HEIGHT_PX,
        )
    })
}

pub fn show(args: ShowArgs, config: &Config, output: &CliOutput) -> Result<()> {
    let category: MediaCategory = args.category.parse().map_err(|e: String| anyhow!(e))?;
    let strategy = resolve_strategy(
        args.protocol.as_deref(),
        config,
        TerminalSignals::from_env(),
    )?;

    let show_progress = config.show_progress() && std::io::stderr().is_terminal();
    let cache = open_cache(config, show_progress)?;
    let renderer = ImageRenderer::new(strategy).with_sixel_max_palette(config.max_palette);
    let manager = ImageManager::new(cache, renderer);

    let mut item = MediaItem::new(MediaIdentity::new(category, args.id, args.size), args.url);
    if let Some(title) = args.title {
        item = item.with_title(title);
    }

    let (width, height) = target_box(args.width, args.height);
    log::debug!(
        "Showing {} at {}x{} with {}",
        item.identity,
        width,
        height,
        strategy
    );

    match manager.render_item(&item, width, height) {
        ImageRenderResult::Rendered(sequence) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(sequence.as_bytes())?;
            writeln!(stdout)?;
            stdout.flush()?;
        }
        ImageRenderResult::Fallback(text) => {
            output.warning("Image could not be loaded; showing a link instead");
            println!("{}", text);
        }
        ImageRenderResult::Disabled => {
            output.warning(&format!(
                "No inline image protocol for this terminal. Use --protocol or {} to force one.",
                env::FORCE_PROTOCOL
            ));
        }
    }

    Ok(())
}

pub fn detect(config: &Config, output: &CliOutput) -> Result<()> {
    let signals = TerminalSignals::from_env();
    let detected = RenderStrategy::from_signals(&TerminalSignals {
        forced: None,
        ..signals.clone()
    });
    let effective = resolve_strategy(None, config, signals.clone())?;

    output.field("Terminal", signals.terminal_name());
    output.field("TERM", or_unset(&signals.term));
    output.field("TERM_PROGRAM", or_unset(&signals.term_program));
    output.field("VTE_VERSION", or_unset(&signals.vte_version));
    output.field("Detected", detected.name());
    output.field("Effective", effective.name());
    Ok(())
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() { "(unset)" } else { value }
}

pub fn cache(command: CacheCommands, config: &Config, output: &CliOutput) -> Result<()> {
    let cache = open_cache(config, false)?;

    match command {
        CacheCommands::Path => {
            println!("{}", cache.cache_dir().display());
        }
        CacheCommands::Size => {
            let bytes = cache.size_bytes()?;
            output.field("Cache", &cache.cache_dir().display().to_string());
            output.field("Size", &format_size(bytes));
        }
        CacheCommands::Prune { max_size } => {
            let max_bytes = parse_size(&max_size).ok_or_else(|| {
                anyhow!(
                    "Invalid size '{}'. Expected a number with optional KB, MB, or GB",
                    max_size
                )
            })?;
            let removed = cache.prune(max_bytes)?;
            output.success(&format!(
                "Removed {} file(s); cache is now {}",
                removed,
                format_size(cache.size_bytes()?)
            ));
        }
        CacheCommands::Remove { category, id, size } => {
            let category: MediaCategory = category.parse().map_err(|e: String| anyhow!(e))?;
            let identity = MediaIdentity::new(category, id, size);
            if cache.remove(&identity)? {
                output.success(&format!("Removed {}", identity));
            } else {
                output.warning(&format!("Nothing cached for {}", identity));
            }
        }
        CacheCommands::Clear { force } => {
            if !force && !confirm_clear(&cache)? {
                output.warning("Cache left untouched");
                return Ok(());
            }
            cache.clear()?;
            output.success(&format!("Cleared {}", cache.cache_dir().display()));
        }
    }

    Ok(())
}

fn confirm_clear(cache: &ImageCache) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Err(anyhow!("Refusing to clear the cache without --force"));
    }

    dialoguer::Confirm::new()
        .with_prompt(format!(
            "Delete everything under {}?",
            cache.cache_dir().display()
        ))
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

/// Human-readable byte count
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
