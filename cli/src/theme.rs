//! Theme — light/dark palettes and the persisted preference flag.
//!
//! DESIGN
//! ======
//! The two palettes are static lookup tables, not computed values. The
//! dark-mode flag is one JSON boolean in a small prefs file; absence of the
//! file or the key means light. Reads happen once at startup, writes are
//! fire-and-forget: in-memory state already reflects the user's intent, so
//! a failed write costs at most one session of the old preference.

use std::path::{Path, PathBuf};

/// JSON key holding the dark-mode flag in the prefs file.
const STORAGE_KEY: &str = "darkMode";

// =============================================================================
// MODE
// =============================================================================

/// Two-state theme machine. `toggle` flips unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

impl Mode {
    #[must_use]
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark { Mode::Dark } else { Mode::Light }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        matches!(self, Mode::Dark)
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Mode::Light => Mode::Dark,
            Mode::Dark => Mode::Light,
        }
    }

    #[must_use]
    pub fn palette(self) -> &'static Palette {
        match self {
            Mode::Light => &LIGHT,
            Mode::Dark => &DARK,
        }
    }
}

// =============================================================================
// PALETTE
// =============================================================================

/// Terminal content style paired with the active palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBarStyle {
    LightContent,
    DarkContent,
}

/// Paired gradient endpoints per semantic category.
#[derive(Debug, Clone, Copy)]
pub struct Gradients {
    pub background: [&'static str; 2],
    pub surface: [&'static str; 2],
    pub primary: [&'static str; 2],
    pub success: [&'static str; 2],
    pub warning: [&'static str; 2],
    pub danger: [&'static str; 2],
    pub muted: [&'static str; 2],
    pub empty: [&'static str; 2],
}

/// Named input-surface colors.
#[derive(Debug, Clone, Copy)]
pub struct InputBackgrounds {
    pub input: &'static str,
    pub edit_input: &'static str,
}

/// A complete color scheme. Components reference slots by semantic meaning
/// rather than raw values, so switching modes swaps the whole table at once.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub text_muted: &'static str,
    pub border: &'static str,
    pub primary: &'static str,
    pub success: &'static str,
    pub warning: &'static str,
    pub danger: &'static str,
    pub shadow: &'static str,
    pub gradients: Gradients,
    pub backgrounds: InputBackgrounds,
    pub status_bar: StatusBarStyle,
}

pub static LIGHT: Palette = Palette {
    bg: "#FFF7FB",
    surface: "#FFFFFF",
    text: "#2B1B24",
    text_muted: "#7A5B6B",
    border: "#F3D7E6",
    primary: "#FF4DA6",
    success: "#2EC4A6",
    warning: "#FFB020",
    danger: "#FF3B5C",
    shadow: "#000000",
    gradients: Gradients {
        background: ["#FFF7FB", "#FDE7F2"],
        surface: ["#FFFFFF", "#FFF0F7"],
        primary: ["#FF4DA6", "#E6007A"],
        success: ["#2EC4A6", "#159F86"],
        warning: ["#FFB020", "#F08A00"],
        danger: ["#FF3B5C", "#E11D48"],
        muted: ["#C9A4B6", "#8B6B7A"],
        empty: ["#FFF0F7", "#F7D9E8"],
    },
    backgrounds: InputBackgrounds { input: "#FFFFFF", edit_input: "#FFF0F7" },
    status_bar: StatusBarStyle::DarkContent,
};

pub static DARK: Palette = Palette {
    bg: "#120A10",
    surface: "#1C111A",
    text: "#FFEAF4",
    text_muted: "#D2A9BC",
    border: "#3A2131",
    primary: "#FF4DA6",
    success: "#2EC4A6",
    warning: "#FFB020",
    danger: "#FF3B5C",
    shadow: "#000000",
    gradients: Gradients {
        background: ["#120A10", "#1C0F18"],
        surface: ["#1C111A", "#241423"],
        primary: ["#FF4DA6", "#B3005E"],
        success: ["#2EC4A6", "#0F8B73"],
        warning: ["#FFB020", "#C96A00"],
        danger: ["#FF3B5C", "#BE123C"],
        muted: ["#6E4A5C", "#3A2131"],
        empty: ["#241423", "#1C111A"],
    },
    backgrounds: InputBackgrounds { input: "#241423", edit_input: "#2A1630" },
    status_bar: StatusBarStyle::LightContent,
};

// =============================================================================
// PREFERENCE STORE
// =============================================================================

/// Resolve the prefs file path: `TICKLIST_PREFS`, else a dotfile in `$HOME`,
/// else the working directory.
#[must_use]
pub fn default_prefs_path() -> PathBuf {
    if let Ok(path) = std::env::var("TICKLIST_PREFS") {
        return PathBuf::from(path);
    }
    if let Ok(home) = std::env::var("HOME") {
        return Path::new(&home).join(".ticklist_prefs.json");
    }
    PathBuf::from(".ticklist_prefs.json")
}

/// Read the dark-mode preference. A missing file, unreadable contents, or
/// absent key all mean light.
#[must_use]
pub fn read_preference(path: &Path) -> Mode {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return Mode::Light;
    };
    let dark = serde_json::from_str::<serde_json::Value>(&raw)
        .ok()
        .and_then(|v| v.get(STORAGE_KEY).and_then(serde_json::Value::as_bool))
        .unwrap_or(false);
    Mode::from_dark_flag(dark)
}

/// Flip the mode and persist the new preference. The write is best-effort;
/// the returned mode is authoritative for this session either way.
#[must_use]
pub fn toggle(path: &Path, current: Mode) -> Mode {
    let next = current.toggled();
    write_preference(path, next);
    next
}

fn write_preference(path: &Path, mode: Mode) {
    let body = serde_json::json!({ STORAGE_KEY: mode.is_dark() });
    let _ = std::fs::write(path, body.to_string());
}

// =============================================================================
// RENDERING
// =============================================================================

/// Parse a `#RRGGBB` hex color.
#[must_use]
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    // get() rather than indexing: a multi-byte char must not panic.
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
    Some((r, g, b))
}

/// Wrap text in a 24-bit ANSI foreground color. Unparseable colors render
/// the text unstyled.
#[must_use]
pub fn paint(hex: &str, text: &str) -> String {
    let Some((r, g, b)) = hex_to_rgb(hex) else {
        return text.to_string();
    };
    format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m")
}

#[cfg(test)]
#[path = "theme_test.rs"]
mod tests;
