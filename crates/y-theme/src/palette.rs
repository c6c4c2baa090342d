//! Palette generation — from one base hue to every color a theme needs.
//!
//! A [`Palette`] holds concrete colors for a fixed set of roles (background,
//! foreground, key, string, number, diff markers, ...). Roles are laid out
//! around the base hue at fixed offsets, given lightness and chroma suited to
//! the [`Mode`], then pushed through the contrast checks so every text role
//! stays readable on the background.
//!
//! [`Palette::styles`] maps the roles onto style categories.

use std::fmt;

use y_term::{Color, Style};

use crate::category::Category;
use crate::contrast::{adjust_comment_color, ensure_readability};
use crate::error::ThemeError;
use crate::styles::Styles;

/// Minimum contrast for body text.
const TEXT_CONTRAST: f64 = 7.0;
/// Minimum contrast for syntax colors.
const SYNTAX_CONTRAST: f64 = 4.5;
/// Minimum contrast for subtle helpers (gutters, separators).
const SUBTLE_CONTRAST: f64 = 3.0;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Whether a palette is meant for a dark or a light terminal background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Mode {
    #[default]
    Dark,
    Light,
}

impl Mode {
    /// Pick the dark or light variant of a value.
    #[inline]
    #[must_use]
    pub const fn pick<T: Copy>(self, dark: T, light: T) -> T {
        match self {
            Self::Dark => dark,
            Self::Light => light,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pick("dark", "light"))
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Concrete colors for every theme role.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub mode: Mode,

    // ── Surfaces ──────────────────────────────────────────────
    /// The assumed terminal background. Used for contrast, never painted.
    pub background: Color,
    pub foreground: Color,
    pub subtle: Color,
    pub comment: Color,

    // ── Accents ───────────────────────────────────────────────
    pub accent: Color,
    pub accent2: Color,

    // ── Syntax ────────────────────────────────────────────────
    pub key: Color,
    pub string: Color,
    pub number: Color,
    pub boolean: Color,
    pub null: Color,
    pub anchor: Color,
    pub decorator: Color,
    pub punctuation: Color,

    // ── Semantic ──────────────────────────────────────────────
    pub inserted: Color,
    pub inserted_bg: Color,
    pub deleted: Color,
    pub deleted_bg: Color,
    pub error: Color,
    pub warning: Color,
    pub ok: Color,
    pub highlight_bg: Color,
}

/// Role names accepted by [`Palette::with_overrides`], in declaration order.
pub const ROLES: &[&str] = &[
    "background",
    "foreground",
    "subtle",
    "comment",
    "accent",
    "accent2",
    "key",
    "string",
    "number",
    "boolean",
    "null",
    "anchor",
    "decorator",
    "punctuation",
    "inserted",
    "inserted_bg",
    "deleted",
    "deleted_bg",
    "error",
    "warning",
    "ok",
    "highlight_bg",
];

impl Palette {
    /// Generate a palette around `hue` (degrees).
    ///
    /// Deterministic: the same hue and mode always give the same palette.
    #[must_use]
    pub fn generate(hue: f32, mode: Mode) -> Self {
        let tone = |dark: f32, light: f32, c: f32, h: f32| {
            Color::oklch(mode.pick(dark, light), c, (h % 360.0 + 360.0) % 360.0).to_gamut()
        };

        let background = tone(0.18, 0.97, 0.012, hue);
        let readable = |c: Color, ratio: f64| ensure_readability(c, background, ratio, mode);
        let syntax = |offset: f32, c: f32| readable(tone(0.76, 0.48, c, hue + offset), SYNTAX_CONTRAST);

        let inserted = readable(tone(0.76, 0.45, 0.15, 145.0), SYNTAX_CONTRAST);
        Self {
            mode,
            background,
            foreground: readable(tone(0.90, 0.25, 0.010, hue), TEXT_CONTRAST),
            subtle: readable(tone(0.58, 0.62, 0.020, hue), SUBTLE_CONTRAST),
            comment: adjust_comment_color(tone(0.55, 0.60, 0.030, hue), background, mode),

            accent: syntax(0.0, 0.14),
            accent2: syntax(180.0, 0.10),

            key: syntax(0.0, 0.11),
            string: syntax(120.0, 0.12),
            number: syntax(60.0, 0.13),
            boolean: syntax(200.0, 0.12),
            null: syntax(240.0, 0.05),
            anchor: syntax(300.0, 0.13),
            decorator: syntax(330.0, 0.09),
            punctuation: readable(tone(0.66, 0.52, 0.030, hue), SUBTLE_CONTRAST),

            inserted,
            inserted_bg: tone(0.30, 0.92, 0.060, 145.0),
            deleted: readable(tone(0.70, 0.48, 0.170, 25.0), SYNTAX_CONTRAST),
            deleted_bg: tone(0.30, 0.92, 0.070, 25.0),
            error: readable(tone(0.66, 0.50, 0.200, 25.0), SYNTAX_CONTRAST),
            warning: readable(tone(0.82, 0.55, 0.150, 85.0), SYNTAX_CONTRAST),
            ok: inserted,
            highlight_bg: tone(0.45, 0.88, 0.100, 85.0),
        }
    }

    /// Standard dark palette around `hue`.
    #[must_use]
    pub fn dark(hue: f32) -> Self {
        Self::generate(hue, Mode::Dark)
    }

    /// Standard light palette around `hue`.
    #[must_use]
    pub fn light(hue: f32) -> Self {
        Self::generate(hue, Mode::Light)
    }

    fn role_mut(&mut self, role: &str) -> Option<&mut Color> {
        Some(match role {
            "background" => &mut self.background,
            "foreground" => &mut self.foreground,
            "subtle" => &mut self.subtle,
            "comment" => &mut self.comment,
            "accent" => &mut self.accent,
            "accent2" => &mut self.accent2,
            "key" => &mut self.key,
            "string" => &mut self.string,
            "number" => &mut self.number,
            "boolean" => &mut self.boolean,
            "null" => &mut self.null,
            "anchor" => &mut self.anchor,
            "decorator" => &mut self.decorator,
            "punctuation" => &mut self.punctuation,
            "inserted" => &mut self.inserted,
            "inserted_bg" => &mut self.inserted_bg,
            "deleted" => &mut self.deleted,
            "deleted_bg" => &mut self.deleted_bg,
            "error" => &mut self.error,
            "warning" => &mut self.warning,
            "ok" => &mut self.ok,
            "highlight_bg" => &mut self.highlight_bg,
            _ => return None,
        })
    }

    /// Replace roles with hex colors, e.g. from a config file.
    ///
    /// # Errors
    ///
    /// [`ThemeError::UnknownRole`] for a key not in [`ROLES`],
    /// [`ThemeError::InvalidColor`] for a value that is not a hex color.
    pub fn with_overrides<'a>(
        mut self,
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ThemeError> {
        for (role, hex) in entries {
            let color = Color::hex(hex).ok_or_else(|| ThemeError::InvalidColor(hex.to_owned()))?;
            let slot = self
                .role_mut(role)
                .ok_or_else(|| ThemeError::UnknownRole(role.to_owned()))?;
            *slot = color;
        }
        Ok(self)
    }

    /// Build the category styles for this palette.
    ///
    /// The background role is not painted: output keeps the terminal's own
    /// background and only highlights carry background colors.
    #[must_use]
    pub fn styles(&self) -> Styles {
        use Category as C;

        let fg = |c: Color| Style::new().fg(c);
        let overrides = [
            (C::Comment, fg(self.comment).italic()),
            (C::CommentPreproc, fg(self.accent2).italic()),
            (C::LiteralBoolean, fg(self.boolean)),
            (C::LiteralNull, fg(self.null).italic()),
            (C::LiteralNullImplicit, fg(self.null).dim()),
            (C::LiteralNumber, fg(self.number)),
            (C::LiteralString, fg(self.string)),
            (C::Name, fg(self.key)),
            (C::NameAnchor, fg(self.anchor)),
            (C::NameAlias, fg(self.anchor).italic()),
            (C::NameAliasMerge, Style::new().bold()),
            (C::NameTag, fg(self.key).bold()),
            (C::NameDecorator, fg(self.decorator).italic()),
            (C::GenericInserted, fg(self.inserted).bg(self.inserted_bg)),
            (C::GenericDeleted, fg(self.deleted).bg(self.deleted_bg)),
            (C::GenericError, fg(self.error)),
            (C::GenericErrorInvalid, Style::new().underline()),
            (C::Punctuation, fg(self.punctuation)),
            (C::PunctuationBlock, fg(self.accent2)),
            (C::PunctuationHeading, fg(self.accent).bold()),
            (C::TextAccent, fg(self.accent)),
            (C::TextAccentDim, Style::new().dim()),
            (C::TextSubtle, fg(self.subtle)),
            (C::TextSubtleDim, Style::new().dim()),
            (C::Highlight, Style::new().bg(self.highlight_bg)),
            (C::Dim, Style::new().dim()),
            (C::Title, Style::new().bold()),
            (C::TitleOk, fg(self.ok)),
            (C::TitleWarn, fg(self.warning)),
            (C::TitleError, fg(self.error)),
            (C::TitleAccent, fg(self.accent)),
            (C::TitleSubtle, fg(self.subtle)),
        ];
        Styles::new(fg(self.foreground), overrides)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
