// ABOUTME: Terminal capability detection for inline image protocol support
// ABOUTME: Resolves a single render strategy once from environment signals

use crate::constants;
use std::env;
use std::fmt;
use std::str::FromStr;

/// How images are written to the terminal.
///
/// Resolved once at startup and then passed around by value; nothing in this
/// crate re-reads the environment after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderStrategy {
    /// Kitty graphics protocol: chunked APC transfer of a PNG
    KittyProtocol,
    /// iTerm2 inline images: one OSC 1337 sequence carrying a JPEG
    ITerm2Protocol,
    /// DEC sixel scanlines with a per-image palette
    SixelProtocol,
    /// Coarse `#`/space art; only reachable by explicit selection
    AsciiFallback,
    #[default]
    None,
}

impl RenderStrategy {
    /// Resolve the strategy for the current process environment.
    ///
    /// `YATO_FORCE_PROTOCOL` wins when it names a known strategy; otherwise the
    /// decision is made from `TERM`, `TERM_PROGRAM`, and `VTE_VERSION`.
    pub fn resolve() -> Self {
        Self::from_signals(&TerminalSignals::from_env())
    }

    /// Pure decision function; first match wins
    pub fn from_signals(signals: &TerminalSignals) -> Self {
        if let Some(forced) = signals.forced.as_deref() {
            match forced.parse::<RenderStrategy>() {
                Ok(strategy) => {
                    log::debug!("Render strategy forced to {}", strategy);
                    return strategy;
                }
                Err(e) => log::warn!("Ignoring {}: {}", constants::env::FORCE_PROTOCOL, e),
            }
        }

        let strategy = if signals.term == "xterm-kitty" {
            RenderStrategy::KittyProtocol
        } else if signals.term_program == "iTerm.app" {
            RenderStrategy::ITerm2Protocol
        } else if signals.term == "xterm-256color" && !signals.vte_version.is_empty() {
            RenderStrategy::SixelProtocol
        } else {
            RenderStrategy::None
        };

        log::debug!(
            "Detected render strategy {} for terminal {}",
            strategy,
            signals.terminal_name()
        );
        strategy
    }

    pub fn name(&self) -> &'static str {
        match self {
            RenderStrategy::KittyProtocol => "kitty",
            RenderStrategy::ITerm2Protocol => "iterm2",
            RenderStrategy::SixelProtocol => "sixel",
            RenderStrategy::AsciiFallback => "ascii",
            RenderStrategy::None => "none",
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, RenderStrategy::None)
    }
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kitty" => Ok(RenderStrategy::KittyProtocol),
            "iterm2" | "iterm" => Ok(RenderStrategy::ITerm2Protocol),
            "sixel" => Ok(RenderStrategy::SixelProtocol),
            "ascii" => Ok(RenderStrategy::AsciiFallback),
            "none" | "disable" | "disabled" => Ok(RenderStrategy::None),
            other => Err(format!(
                "Unknown protocol '{}'. Valid values: kitty, iterm2, sixel, ascii, none",
                other
            )),
        }
    }
}

/// Snapshot of the environment variables that drive detection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalSignals {
    /// `TERM`
    pub term: String,
    /// `TERM_PROGRAM`
    pub term_program: String,
    /// `VTE_VERSION`
    pub vte_version: String,
    /// `YATO_FORCE_PROTOCOL`
    pub forced: Option<String>,
}

impl TerminalSignals {
    pub fn from_env() -> Self {
        Self {
            term: env::var("TERM").unwrap_or_default(),
            term_program: env::var("TERM_PROGRAM").unwrap_or_default(),
            vte_version: env::var("VTE_VERSION").unwrap_or_default(),
            forced: env::var(constants::env::FORCE_PROTOCOL)
                .ok()
                .filter(|value| !value.trim().is_empty()),
        }
    }

    pub fn terminal_name(&self) -> &str {
        if !self.term_program.is_empty() {
            &self.term_program
        } else if !self.term.is_empty() {
            &self.term
        } else {
            "unknown"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn signals(term: &str, term_program: &str, vte_version: &str) -> TerminalSignals {
        TerminalSignals {
            term: term.to_string(),
            term_program: term_program.to_string(),
            vte_version: vte_version.to_string(),
            forced: None,
        }
    }

    #[test]
    fn test_kitty_detection() {
        let strategy = RenderStrategy::from_signals(&signals("xterm-kitty", "", ""));
        assert_eq!(strategy, RenderStrategy::KittyProtocol);

        // TERM wins over TERM_PROGRAM
        let strategy = RenderStrategy::from_signals(&signals("xterm-kitty", "iTerm.app", "1"));
        assert_eq!(strategy, RenderStrategy::KittyProtocol);
    }

    #[test]
    fn test_iterm2_detection() {
        let strategy = RenderStrategy::from_signals(&signals("xterm-256color", "iTerm.app", ""));
        assert_eq!(strategy, RenderStrategy::ITerm2Protocol);
    }

    #[test]
    fn test_sixel_detection() {
        let strategy = RenderStrategy::from_signals(&signals("xterm-256color", "", "1.2"));
        assert_eq!(strategy, RenderStrategy::SixelProtocol);

        // VTE_VERSION must be non-empty
        let strategy = RenderStrategy::from_signals(&signals("xterm-256color", "", ""));
        assert_eq!(strategy, RenderStrategy::None);

        // Only for 256-colour xterm
        let strategy = RenderStrategy::from_signals(&signals("xterm", "", "6003"));
        assert_eq!(strategy, RenderStrategy::None);
    }

    #[test]
    fn test_no_support_detection() {
        assert_eq!(
            RenderStrategy::from_signals(&TerminalSignals::default()),
            RenderStrategy::None
        );
        assert_eq!(
            RenderStrategy::from_signals(&signals("dumb", "Apple_Terminal", "")),
            RenderStrategy::None
        );
        assert!(!RenderStrategy::None.is_enabled());
    }

    #[test]
    fn test_detection_is_deterministic() {
        let inputs = signals("xterm-256color", "vscode", "7600");
        let first = RenderStrategy::from_signals(&inputs);
        for _ in 0..10 {
            assert_eq!(RenderStrategy::from_signals(&inputs.clone()), first);
        }
    }

    #[test]
    fn test_forced_protocol() {
        let mut inputs = signals("xterm-kitty", "", "");
        inputs.forced = Some("ascii".to_string());
        assert_eq!(
            RenderStrategy::from_signals(&inputs),
            RenderStrategy::AsciiFallback
        );

        inputs.forced = Some("none".to_string());
        assert_eq!(RenderStrategy::from_signals(&inputs), RenderStrategy::None);

        // Unknown values fall through to detection
        inputs.forced = Some("braille".to_string());
        assert_eq!(
            RenderStrategy::from_signals(&inputs),
            RenderStrategy::KittyProtocol
        );
    }

    #[test]
    fn test_strategy_round_trips_through_name() {
        for strategy in [
            RenderStrategy::KittyProtocol,
            RenderStrategy::ITerm2Protocol,
            RenderStrategy::SixelProtocol,
            RenderStrategy::AsciiFallback,
            RenderStrategy::None,
        ] {
            assert_eq!(strategy.name().parse::<RenderStrategy>(), Ok(strategy));
        }
    }

    #[test]
    #[serial]
    fn test_resolve_from_environment() {
        let saved: Vec<(&str, Option<String>)> = [
            "TERM",
            "TERM_PROGRAM",
            "VTE_VERSION",
            constants::env::FORCE_PROTOCOL,
        ]
        .into_iter()
        .map(|key| (key, env::var(key).ok()))
        .collect();

        unsafe {
            env::remove_var("TERM_PROGRAM");
            env::remove_var(constants::env::FORCE_PROTOCOL);
            env::set_var("TERM", "xterm-256color");
            env::set_var("VTE_VERSION", "1.2");
        }
        assert_eq!(RenderStrategy::resolve(), RenderStrategy::SixelProtocol);

        unsafe {
            env::set_var(constants::env::FORCE_PROTOCOL, "iterm2");
        }
        assert_eq!(RenderStrategy::resolve(), RenderStrategy::ITerm2Protocol);

        // Restore env
        unsafe {
            for (key, value) in saved {
                match value {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
