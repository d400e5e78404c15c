//! User configuration — keybindings and scroll tuning.
//!
//! Stored as TOML at `$XDG_CONFIG_HOME/folio/config.toml` (default
//! `~/.config/folio/config.toml`).  Every key is optional; anything missing
//! or unparseable falls back to the built-in default.
//!
//! ```toml
//! [scroll]
//! damping = 0.075
//! wheel_step = 6
//!
//! [keys]
//! scroll_right = ["Right", "l"]
//! quit = ["q", "Ctrl+d"]
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;
use thiserror::Error;

use crate::core::smooth_scroll::ScrollTuning;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    Open,
    Back,
    ScrollLeft,
    ScrollRight,
    ScrollStart,
    ScrollEnd,
    CopyLink,
    Quit,
}

impl Action {
    pub const ALL: &[Action] = &[
        Action::MoveUp,
        Action::MoveDown,
        Action::Open,
        Action::Back,
        Action::ScrollLeft,
        Action::ScrollRight,
        Action::ScrollStart,
        Action::ScrollEnd,
        Action::CopyLink,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::Open => "open",
            Action::Back => "back",
            Action::ScrollLeft => "scroll_left",
            Action::ScrollRight => "scroll_right",
            Action::ScrollStart => "scroll_start",
            Action::ScrollEnd => "scroll_end",
            Action::CopyLink => "copy_link",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared (platform-specific modifiers like SUPER are ignored).
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"Alt+↑"`, `"Ctrl+c"`, `"q"`).
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Backspace => "Bksp".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.trim().to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let key = key_part.trim();
        let code = match key.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            // Single characters keep their case (`G` ≠ `g`).
            _ if key.chars().count() == 1 => KeyCode::Char(key.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── file format ───────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    scroll: ScrollSection,
    keys: HashMap<String, Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScrollSection {
    damping: Option<f64>,
    epsilon: Option<f64>,
    wheel_step: Option<f64>,
    frame_ms: Option<u64>,
    scrub_lag_ms: Option<u64>,
}

// ───────────────────────────────────────── config ────────────

/// Application configuration — keybindings and animation tuning.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Easing constants for every smooth-scroll controller.
    pub tuning: ScrollTuning,
    /// Offset units (columns or rows) per wheel notch.
    pub wheel_step: f64,
    /// Frame interval while something is animating.
    pub frame_interval: Duration,
    /// How far the home marble trails the scroll.
    pub scrub_lag: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            tuning: ScrollTuning::default(),
            wheel_step: 6.0,
            frame_interval: Duration::from_millis(16),
            scrub_lag: Duration::from_secs(2),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(MoveUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(MoveDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Open, vec![KeyBind::new(Enter, n)]);
        m.insert(Back, vec![KeyBind::new(Esc, n), KeyBind::new(Backspace, n)]);
        m.insert(ScrollLeft, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(ScrollRight, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(ScrollStart, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]);
        m.insert(ScrollEnd, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), KeyModifiers::SHIFT)]);
        m.insert(CopyLink, vec![KeyBind::new(Char('y'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Status-bar hint for the home page.
    pub fn home_hint(&self) -> String {
        format!(
            "{}/{}: select | {}: open | {}: copy link | {}: quit",
            self.short_binding(Action::MoveUp),
            self.short_binding(Action::MoveDown),
            self.short_binding(Action::Open),
            self.short_binding(Action::CopyLink),
            self.short_binding(Action::Quit),
        )
    }

    /// Status-bar hint for a project page.
    pub fn gallery_hint(&self) -> String {
        format!(
            "wheel/{}/{}: scroll | {}: close | {}: quit",
            self.short_binding(Action::ScrollLeft),
            self.short_binding(Action::ScrollRight),
            self.short_binding(Action::Back),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load the user config, falling back to defaults on any problem.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "config loaded");
                config
            }
            Err(err) => {
                tracing::warn!("{err}; using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(s)?;
        let mut config = Self::default();

        let scroll = file.scroll;
        config.tuning = ScrollTuning::new(
            scroll.damping.unwrap_or(config.tuning.damping),
            scroll.epsilon.unwrap_or(config.tuning.epsilon),
        );
        if let Some(step) = scroll.wheel_step.filter(|s| s.is_finite() && *s > 0.0) {
            config.wheel_step = step.min(200.0);
        }
        if let Some(ms) = scroll.frame_ms {
            // Keep this bounded for predictable UX.
            config.frame_interval = Duration::from_millis(ms.clamp(8, 100));
        }
        if let Some(ms) = scroll.scrub_lag_ms {
            config.scrub_lag = Duration::from_millis(ms.min(10_000));
        }

        for (key, values) in file.keys {
            let Some(action) = Action::from_config_key(&key) else {
                tracing::warn!(key = %key, "unknown action in [keys]");
                continue;
            };
            let parsed: Vec<KeyBind> = values.iter().filter_map(|v| KeyBind::parse(v)).collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        Ok(config)
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/folio/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("folio").join("config.toml")
}
