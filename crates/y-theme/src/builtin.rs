//! Named preset themes.
//!
//! Each preset is a base hue and a mode fed through palette generation,
//! except `mono`, which styles with attributes only and works on terminals
//! without color.

use y_term::Style;

use crate::category::Category;
use crate::palette::{Mode, Palette};
use crate::styles::Styles;

/// Name of the theme used when none is requested.
pub const DEFAULT_THEME: &str = "dark";

/// Every builtin theme name.
pub const BUILTIN_NAMES: &[&str] = &["dark", "light", "ocean", "ember", "mono"];

/// Hue and mode of a palette-backed builtin.
#[must_use]
pub fn builtin_palette(name: &str) -> Option<Palette> {
    Some(match name {
        "dark" => Palette::dark(265.0),
        "light" => Palette::light(265.0),
        "ocean" => Palette::dark(205.0),
        "ember" => Palette::dark(35.0),
        _ => return None,
    })
}

/// Mode of a builtin theme.
#[must_use]
pub fn builtin_mode(name: &str) -> Option<Mode> {
    match name {
        "mono" => Some(Mode::Dark),
        _ => builtin_palette(name).map(|p| p.mode),
    }
}

/// Build a builtin theme by name. `None` if the name is not a builtin.
#[must_use]
pub fn builtin_styles(name: &str) -> Option<Styles> {
    if name == "mono" {
        return Some(mono());
    }
    builtin_palette(name).map(|p| p.styles())
}

/// The default theme.
#[must_use]
pub fn default_styles() -> Styles {
    Palette::dark(265.0).styles()
}

fn mono() -> Styles {
    use Category as C;

    Styles::new(
        Style::new(),
        [
            (C::Comment, Style::new().dim().italic()),
            (C::LiteralNull, Style::new().italic()),
            (C::NameTag, Style::new().bold()),
            (C::NameAnchor, Style::new().underline()),
            (C::NameAlias, Style::new().italic().underline()),
            (C::NameDecorator, Style::new().italic()),
            (C::GenericInserted, Style::new().bold()),
            (C::GenericDeleted, Style::new().dim()),
            (C::GenericError, Style::new().underline()),
            (C::PunctuationHeading, Style::new().bold()),
            (C::TextSubtle, Style::new().dim()),
            (C::Highlight, Style::new().attrs(y_term::Attr::INVERSE)),
            (C::Dim, Style::new().dim()),
            (C::Title, Style::new().bold()),
        ],
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
