// ABOUTME: Centralized constants for the yato image pipeline
// ABOUTME: Contains protocol framing sequences, cache layout, and fetch defaults

/// Kitty graphics protocol framing
pub mod kitty {
    /// Base64 characters carried by a single APC chunk
    pub const CHUNK_SIZE: usize = 4096;

    /// Application Program Command introducer for graphics commands
    pub const APC_START: &str = "\x1b_G";

    /// String terminator
    pub const ST: &str = "\x1b\\";

    /// Transmit-and-display action
    pub const ACTION_TRANSMIT_DISPLAY: char = 'T';

    /// `f=100` means the payload is a PNG file
    pub const FORMAT_PNG: u32 = 100;
}

/// iTerm2 inline image protocol framing
pub mod iterm2 {
    /// OSC 1337 file transfer introducer
    pub const OSC_FILE: &str = "\x1b]1337;File=";

    /// BEL terminates the OSC sequence
    pub const BEL: char = '\x07';

    /// Quality used when re-encoding the source image as JPEG
    pub const JPEG_QUALITY: u8 = 75;
}

/// Sixel framing
pub mod sixel {
    /// Device Control String introducer followed by the sixel `q` selector
    pub const DCS_START: &str = "\x1bPq";

    /// String terminator
    pub const ST: &str = "\x1b\\";

    /// Character for a zero bit; set bits are offsets from it
    pub const SIXEL_BASE: u8 = b'?';

    /// Graphics new line: moves to the start of the next sixel band
    pub const LINE_BREAK: char = '-';

    /// Bit-planes emitted per pixel row
    pub const PLANES: usize = 6;
}

/// ASCII fallback sampling
pub mod ascii {
    /// Rows sampled are spaced by `height / ROW_DIVISOR`
    pub const ROW_DIVISOR: u32 = 10;

    /// Columns sampled are spaced by `width / COLUMN_DIVISOR`
    pub const COLUMN_DIVISOR: u32 = 20;

    /// Luminance threshold on the 16-bit channel scale
    pub const BRIGHT_THRESHOLD: u32 = 32768;

    /// Glyph printed for dark samples
    pub const DARK_GLYPH: char = '#';
}

/// On-disk cache layout
pub mod cache {
    use std::time::Duration;

    /// Directory created under the platform cache dir
    pub const APP_DIR: &str = "yato";

    /// Subdirectory holding cached artwork
    pub const CACHE_SUBDIR: &str = "cache";

    /// Extension of every cached artifact
    pub const FILE_EXTENSION: &str = "jpg";

    /// Prune down to this percentage of the requested limit
    pub const PRUNE_TARGET_PERCENT: u64 = 80;

    /// Extension of in-flight downloads, renamed into place when complete
    pub const PARTIAL_EXTENSION: &str = "part";

    /// In-flight downloads untouched for this long were abandoned by a dead writer
    pub const STALE_PARTIAL_AGE: Duration = Duration::from_secs(60 * 60);
}

/// HTTP fetch defaults
pub mod fetch {
    use std::time::Duration;

    /// Default timeout for a single image request
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Redirects followed before giving up
    pub const MAX_REDIRECTS: usize = 3;

    /// User agent sent with image requests
    pub const USER_AGENT: &str = concat!("yato-images/", env!("CARGO_PKG_VERSION"));
}

/// Environment variables consulted by the library
pub mod env {
    /// Overrides the cache root directory
    pub const CACHE_DIR: &str = "YATO_IMAGE_CACHE";

    /// Forces a render strategy, bypassing terminal detection
    pub const FORCE_PROTOCOL: &str = "YATO_FORCE_PROTOCOL";
}
