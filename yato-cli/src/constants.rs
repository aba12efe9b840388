// ABOUTME: Centralized constants for the yato-img command-line host
// ABOUTME: Contains config file locations, default render box, and progress timing

/// Configuration file locations
pub mod config {
    /// Project-local config file, looked up in the working directory
    pub const PROJECT_FILE: &str = "yato-images.toml";

    /// Directory under the XDG config home
    pub const APP_DIR: &str = "yato";

    /// File name inside [`APP_DIR`]
    pub const FILE_NAME: &str = "images.toml";
}

/// Default pixel box for `show` when the terminal does not report one
pub mod render {
    /// Roughly the aspect ratio of a cover thumbnail
    pub const DEFAULT_WIDTH: u32 = 240;
    pub const DEFAULT_HEIGHT: u32 = 340;

    /// Cell size assumed when only the character grid is known
    pub const CELL_WIDTH_PX: u32 = 8;
    pub const CELL_HEIGHT_PX: u32 = 16;
}

/// Timeout configurations for various operations
pub mod timeouts {
    /// Progress spinner tick interval for smooth animation
    pub const PROGRESS_BAR_TICK_MS: u64 = 80;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_locations() {
        assert!(config::PROJECT_FILE.ends_with(".toml"));
        assert!(config::FILE_NAME.ends_with(".toml"));
        assert_eq!(config::APP_DIR, "yato");
    }

    #[test]
    fn test_render_defaults() {
        assert!(render::DEFAULT_HEIGHT > render::DEFAULT_WIDTH);
        assert_eq!(render::CELL_HEIGHT_PX, render::CELL_WIDTH_PX * 2);
    }

    #[test]
    fn test_timeouts() {
        assert_eq!(timeouts::PROGRESS_BAR_TICK_MS, 80);
    }
}
