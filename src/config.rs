// SPDX-License-Identifier: MIT
//
// Config file for the y-prism binary.
//
// Precedence, lowest first: built-in defaults, the TOML file named by
// `--config` or `$Y_PRISM_CONFIG`, then command-line flags (applied in
// main.rs). A missing file named by the environment is not an error; a
// missing file named on the command line is.
//
//   theme = "ocean"
//   line_numbers = true
//   context = 2
//   control_escape = true
//   tab_width = 4
//
//   [palette]            # registers a theme named "custom"
//   base = "dark"
//   key = "#7aa2f7"
//
//   [styles.comment]     # per-category tweaks on top of the theme
//   fg = "#565f89"
//   italic = true

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;
use y_term::{Attr, Color, Style};
use y_theme::builtin::{DEFAULT_THEME, builtin_palette};
use y_theme::{Category, Styles, ThemeError, registry};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "Y_PRISM_CONFIG";

/// Name the `[palette]` table registers its theme under.
pub const CUSTOM_THEME: &str = "custom";

// ─── Config ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Registered theme to render with.
    pub theme: Option<String>,
    pub line_numbers: bool,
    /// Unchanged lines around each hunk of a summary diff.
    pub context: usize,
    pub control_escape: bool,
    pub tab_width: usize,
    pub palette: Option<PaletteConfig>,
    pub styles: BTreeMap<String, StyleConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: None,
            line_numbers: false,
            context: Self::DEFAULT_CONTEXT,
            control_escape: true,
            tab_width: y_print::DEFAULT_TAB_WIDTH,
            palette: None,
            styles: BTreeMap::new(),
        }
    }
}

/// A palette derived from a builtin, with some roles replaced.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaletteConfig {
    /// Builtin palette to start from. Default: the default theme.
    pub base: Option<String>,
    /// Role name to hex color.
    #[serde(flatten)]
    pub roles: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub dim: bool,
}

impl Config {
    const DEFAULT_CONTEXT: usize = 3;

    /// Load from `explicit`, else from `$Y_PRISM_CONFIG`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match env::var_os(CONFIG_ENV).map(PathBuf::from) {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                debug!("{CONFIG_ENV} names {}, which does not exist", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Register the `[palette]` table, if any, as the `custom` theme.
    pub fn register_palette(&self) -> Result<()> {
        match &self.palette {
            Some(palette) => palette.register(),
            None => Ok(()),
        }
    }

    /// Register the `[palette]` theme, if any, and resolve the styles for
    /// `theme` (or the configured theme, or the default), with `[styles]`
    /// applied on top.
    pub fn styles(&self, theme: Option<&str>) -> Result<Arc<Styles>> {
        self.register_palette()?;
        let fallback = if self.palette.is_some() { CUSTOM_THEME } else { DEFAULT_THEME };
        let name = theme.or(self.theme.as_deref()).unwrap_or(fallback);
        let Some(styles) = registry::lookup(name) else {
            bail!(
                "unknown theme {name:?}; available: {}",
                registry::names().join(", ")
            );
        };

        if self.styles.is_empty() {
            return Ok(styles);
        }
        let overrides = self
            .styles
            .iter()
            .map(|(category, style)| Ok((category.parse::<Category>()?, style.to_style()?)))
            .collect::<Result<Vec<_>, ThemeError>>()?;
        Ok(Arc::new(styles.with(overrides)))
    }
}

impl PaletteConfig {
    fn register(&self) -> Result<()> {
        let base = self.base.as_deref().unwrap_or(DEFAULT_THEME);
        let Some(palette) = builtin_palette(base) else {
            bail!("palette base {base:?} is not a builtin palette theme");
        };
        let palette = palette
            .with_overrides(self.roles.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
        let mode = palette.mode;
        registry::register(CUSTOM_THEME, move || palette.styles(), mode);
        Ok(())
    }
}

impl StyleConfig {
    fn to_style(&self) -> Result<Style, ThemeError> {
        let color = |hex: &Option<String>| {
            hex.as_deref()
                .map(|h| Color::hex(h).ok_or_else(|| ThemeError::InvalidColor(h.to_owned())))
                .transpose()
        };
        let mut attrs = Attr::empty();
        for (on, flag) in [
            (self.bold, Attr::BOLD),
            (self.italic, Attr::ITALIC),
            (self.underline, Attr::UNDERLINE),
            (self.dim, Attr::DIM),
        ] {
            attrs.set(flag, on);
        }
        Ok(Style::new().colors(color(&self.fg)?, color(&self.bg)?).attrs(attrs))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn scalar_keys() {
        let config = Config::parse(
            "theme = \"ocean\"\nline_numbers = true\ncontext = 1\ncontrol_escape = false\ntab_width = 2\n",
        )
        .unwrap();
        assert_eq!(config.theme.as_deref(), Some("ocean"));
        assert!(config.line_numbers);
        assert_eq!(config.context, 1);
        assert!(!config.control_escape);
        assert_eq!(config.tab_width, 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("colour = 1\n").is_err());
    }

    #[test]
    fn unknown_theme_is_an_error() {
        let err = Config::default().styles(Some("no-such-theme")).unwrap_err();
        assert!(err.to_string().contains("no-such-theme"));
    }

    #[test]
    fn style_overrides_apply() {
        let config = Config::parse("[styles.comment]\nbold = true\nfg = \"#ff0000\"\n").unwrap();
        let styles = config.styles(Some("dark")).unwrap();
        assert!(styles.get(Category::Comment).is_bold());
        assert!(styles.get(Category::Comment).foreground().is_some());
    }

    #[test]
    fn bad_style_entries_are_reported() {
        let config = Config::parse("[styles.nope]\nbold = true\n").unwrap();
        let err = config.styles(None).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ThemeError>(),
            Some(&ThemeError::UnknownCategory("nope".into()))
        );

        let config = Config::parse("[styles.comment]\nfg = \"red\"\n").unwrap();
        let err = config.styles(None).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ThemeError>(),
            Some(&ThemeError::InvalidColor("red".into()))
        );
    }

    #[test]
    fn palette_registers_custom_theme() {
        let config = Config::parse("[palette]\nbase = \"light\"\nkey = \"#123456\"\n").unwrap();
        config.styles(None).unwrap();
        assert_eq!(registry::mode(CUSTOM_THEME), Some(y_theme::Mode::Light));
        assert!(registry::names().iter().any(|n| n == CUSTOM_THEME));
    }

    #[test]
    fn bad_palette_color_is_invalid_color() {
        let config = Config::parse("[palette]\nkey = \"#12\"\n").unwrap();
        let err = config.styles(None).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ThemeError>(),
            Some(&ThemeError::InvalidColor("#12".into()))
        );
    }
}
