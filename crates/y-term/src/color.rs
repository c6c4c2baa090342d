// SPDX-License-Identifier: MIT
//
// y-term color system — OKLCH storage, Oklab blending, terminal resolution.
//
// Single-character variable names (r, g, b, l, c, h, a) are the standard
// notation in color science and are kept that way on purpose.
#![allow(clippy::many_single_char_names)]
//
// Styles carry `Color` values. A color is stored in OKLCH with alpha so that
// themes can be generated by walking hue and lightness, and so that two
// overlapping styles can be blended in a perceptual space (Oklab) instead of
// raw RGB. A fully transparent color is treated everywhere as "no color".
//
// Conversion pipeline:
//
//   OKLCH ↔ Oklab ↔ Linear sRGB ↔ sRGB ↔ CellColor (TrueColor / 256 / 16)

use std::fmt;

// ─── Color ───────────────────────────────────────────────────────────────────

/// A perceptual color stored in OKLCH space with alpha.
///
/// ```
/// use y_term::color::Color;
///
/// let teal = Color::hex("#1abc9c").unwrap();
/// let red = Color::rgb8(231, 76, 60);
/// let mixed = teal.blend_lab(&red, 0.5);
/// assert!(mixed.is_visible());
/// ```
#[derive(Clone, Copy)]
pub struct Color {
    /// Lightness: 0.0 (black) to 1.0 (white).
    pub l: f32,
    /// Chroma: 0.0 (gray) to ~0.37.
    pub c: f32,
    /// Hue angle in degrees, 0.0 to 360.0.
    pub h: f32,
    /// Opacity: 0.0 (transparent) to 1.0 (opaque).
    pub alpha: f32,
}

impl Color {
    // ─── Constructors ────────────────────────────────────────────────────

    /// Create a color from OKLCH values.
    #[inline]
    #[must_use]
    pub const fn oklch(l: f32, c: f32, h: f32) -> Self {
        Self { l, c, h, alpha: 1.0 }
    }

    /// Create a color from OKLCH values with alpha.
    #[inline]
    #[must_use]
    pub const fn oklcha(l: f32, c: f32, h: f32, alpha: f32) -> Self {
        Self { l, c, h, alpha }
    }

    /// Create a color from sRGB components in `0.0..=1.0`.
    #[must_use]
    pub fn srgb(r: f32, g: f32, b: f32) -> Self {
        let (l, c, h) = srgb_to_oklch(r, g, b);
        Self { l, c, h, alpha: 1.0 }
    }

    /// Create a color from 8-bit sRGB components.
    #[must_use]
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::srgb(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// Create a color from 8-bit sRGB components with alpha.
    #[must_use]
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            alpha: f32::from(a) / 255.0,
            ..Self::rgb8(r, g, b)
        }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    ///
    /// Returns `None` if the string is not a valid hex color.
    #[must_use]
    pub fn hex(s: &str) -> Option<Self> {
        parse_hex(s)
    }

    /// Fully transparent. Equivalent to "no color" in every style operation.
    pub const TRANSPARENT: Self = Self::oklcha(0.0, 0.0, 0.0, 0.0);

    /// Pure black.
    pub const BLACK: Self = Self::oklch(0.0, 0.0, 0.0);

    /// Pure white.
    pub const WHITE: Self = Self::oklch(1.0, 0.0, 0.0);

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Whether alpha is at or below zero.
    #[inline]
    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.alpha <= 0.0
    }

    /// Whether this color would paint anything. The complement of
    /// [`is_transparent`](Self::is_transparent).
    #[inline]
    #[must_use]
    pub fn is_visible(self) -> bool {
        !self.is_transparent()
    }

    /// Whether this color has no visible chroma.
    #[inline]
    #[must_use]
    pub fn is_achromatic(self) -> bool {
        self.c.abs() < 1e-5
    }

    // ─── Blending ────────────────────────────────────────────────────────

    /// Blend toward `other` in Oklab (the Cartesian form of OKLCH).
    ///
    /// `t = 0.0` returns `self`, `t = 1.0` returns `other`. Interpolating the
    /// a/b axes rather than the hue angle keeps the midpoint of two
    /// complementary colors a neutral gray instead of a detour around the
    /// wheel, which is what overlapping highlights should look like.
    #[must_use]
    pub fn blend_lab(self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let (l1, a1, b1) = oklch_to_oklab(self.l, self.c, self.h);
        let (l2, a2, b2) = oklch_to_oklab(other.l, other.c, other.h);
        let lerp = |x: f32, y: f32| (y - x).mul_add(t, x);
        let (l, c, h) = oklab_to_oklch(lerp(l1, l2), lerp(a1, a2), lerp(b1, b2));
        Self {
            l,
            c,
            h,
            alpha: lerp(self.alpha, other.alpha),
        }
    }

    /// Perceptual distance (Euclidean in Oklab). Below ~0.02 is invisible.
    #[must_use]
    pub fn distance(self, other: &Self) -> f32 {
        let (l1, a1, b1) = oklch_to_oklab(self.l, self.c, self.h);
        let (l2, a2, b2) = oklch_to_oklab(other.l, other.c, other.h);
        let dl = l1 - l2;
        let da = a1 - a2;
        let db = b1 - b2;
        db.mul_add(db, dl.mul_add(dl, da * da)).sqrt()
    }

    // ─── Conversions ─────────────────────────────────────────────────────

    /// sRGB components clamped to `0.0..=1.0`.
    #[must_use]
    pub fn to_srgb(self) -> (f32, f32, f32) {
        let (r, g, b) = oklch_to_srgb(self.l, self.c, self.h);
        (r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
    }

    /// 8-bit sRGB components.
    #[must_use]
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let (r, g, b) = self.to_srgb();
        (to_u8(r), to_u8(g), to_u8(b))
    }

    /// `#rrggbb`, or `#rrggbbaa` when not opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_rgb8();
        if self.alpha >= 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            let a = to_u8(self.alpha.clamp(0.0, 1.0));
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    /// Whether the color is displayable in sRGB without clamping.
    #[must_use]
    pub fn in_srgb_gamut(self) -> bool {
        let (r, g, b) = oklch_to_srgb(self.l, self.c, self.h);
        (0.0..=1.0).contains(&r) && (0.0..=1.0).contains(&g) && (0.0..=1.0).contains(&b)
    }

    /// Reduce chroma (binary search) until the color fits in sRGB.
    #[must_use]
    pub fn to_gamut(self) -> Self {
        if self.in_srgb_gamut() {
            return self;
        }
        let mut lo: f32 = 0.0;
        let mut hi: f32 = self.c;
        for _ in 0..16 {
            let mid = (lo + hi) * 0.5;
            if (Self { c: mid, ..self }).in_srgb_gamut() {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Self { c: lo, ..self }
    }

    /// Resolve to a terminal color. Transparent colors resolve to the
    /// terminal default; partial alpha is dropped.
    #[must_use]
    pub fn to_cell_color(self) -> CellColor {
        if self.is_transparent() {
            return CellColor::Default;
        }
        let (r, g, b) = self.to_rgb8();
        CellColor::Rgb(r, g, b)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha >= 1.0 {
            write!(f, "Color::oklch({:.4}, {:.4}, {:.1})", self.l, self.c, self.h)
        } else {
            write!(
                f,
                "Color::oklcha({:.4}, {:.4}, {:.1}, {:.2})",
                self.l, self.c, self.h, self.alpha
            )
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        const EPS: f32 = 1e-4;
        if self.is_transparent() && other.is_transparent() {
            return true;
        }
        (self.l - other.l).abs() < EPS
            && (self.c - other.c).abs() < EPS
            && (self.alpha - other.alpha).abs() < EPS
            && (self.is_achromatic() || other.is_achromatic() || hue_diff(self.h, other.h) < EPS)
    }
}

// ─── CellColor ───────────────────────────────────────────────────────────────

/// A color as the terminal sees it: what SGR sequences are built from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),
    /// ANSI 256-color palette index (0–15 are the classic 16 colors).
    Ansi256(u8),
    /// The terminal's own default foreground/background.
    #[default]
    Default,
}

/// How many colors the output terminal understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorDepth {
    /// 24-bit color.
    #[default]
    TrueColor,
    /// The xterm 256-color palette.
    Ansi256,
    /// The 16 classic ANSI colors.
    Ansi16,
}

impl CellColor {
    /// Map this color down to what `depth` can display.
    #[must_use]
    pub fn downgrade(self, depth: ColorDepth) -> Self {
        match (depth, self) {
            (_, Self::Default) | (ColorDepth::TrueColor, _) => self,
            (ColorDepth::Ansi256, Self::Rgb(r, g, b)) => {
                Self::Ansi256(palette::nearest_ansi256(Color::rgb8(r, g, b)))
            }
            (ColorDepth::Ansi256, Self::Ansi256(_)) => self,
            (ColorDepth::Ansi16, Self::Rgb(r, g, b)) => {
                Self::Ansi256(palette::nearest_ansi16(Color::rgb8(r, g, b)))
            }
            (ColorDepth::Ansi16, Self::Ansi256(idx)) => {
                Self::Ansi256(palette::nearest_ansi16(palette::ansi256_to_color(idx)))
            }
        }
    }

    /// Whether this is the terminal default color.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Ansi256(idx) => write!(f, "ansi({idx})"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl From<Color> for CellColor {
    fn from(color: Color) -> Self {
        color.to_cell_color()
    }
}

// ─── Color Space Math ────────────────────────────────────────────────────────
//
// Oklab by Björn Ottosson: https://bottosson.github.io/posts/oklab/

#[inline]
fn normalize_hue(h: f32) -> f32 {
    let h = h % 360.0;
    if h < 0.0 { h + 360.0 } else { h }
}

#[inline]
fn hue_diff(a: f32, b: f32) -> f32 {
    let d = (a - b).abs() % 360.0;
    if d > 180.0 { 360.0 - d } else { d }
}

#[inline]
fn oklch_to_oklab(l: f32, c: f32, h: f32) -> (f32, f32, f32) {
    let h_rad = h.to_radians();
    (l, c * h_rad.cos(), c * h_rad.sin())
}

#[inline]
fn oklab_to_oklch(l: f32, a: f32, b: f32) -> (f32, f32, f32) {
    let c = a.hypot(b);
    if c < 1e-8 {
        return (l, c, 0.0);
    }
    (l, c, normalize_hue(b.atan2(a).to_degrees()))
}

/// Oklab → linear sRGB through the LMS cone space.
#[inline]
fn oklab_to_linear_srgb(l_ok: f32, a: f32, b: f32) -> (f32, f32, f32) {
    let l_ = 0.215_803_76f32.mul_add(b, 0.396_337_78f32.mul_add(a, l_ok));
    let m_ = 0.063_854_17f32.mul_add(-b, 0.105_561_346f32.mul_add(-a, l_ok));
    let s_ = 1.291_485_5f32.mul_add(-b, 0.089_484_18f32.mul_add(-a, l_ok));

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    let r = 0.230_969_94f32.mul_add(s, 4.076_741_7f32.mul_add(l, -(3.307_711_6 * m)));
    let g = 0.341_319_38f32.mul_add(-s, (-1.268_438f32).mul_add(l, 2.609_757_4 * m));
    let bl = 1.707_614_7f32.mul_add(s, (-0.004_196_086_3f32).mul_add(l, -(0.703_418_6 * m)));
    (r, g, bl)
}

/// Linear sRGB → Oklab.
#[inline]
fn linear_srgb_to_oklab(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let l = 0.051_445_995f32.mul_add(b, 0.412_221_47f32.mul_add(r, 0.536_332_55 * g));
    let m = 0.107_396_96f32.mul_add(b, 0.211_903_5f32.mul_add(r, 0.680_699_5 * g));
    let s = 0.629_978_7f32.mul_add(b, 0.088_302_46f32.mul_add(r, 0.281_718_84 * g));

    let l_ = l.cbrt();
    let m_ = m.cbrt();
    let s_ = s.cbrt();

    let l_ok = 0.004_072_047f32.mul_add(-s_, 0.210_454_26f32.mul_add(l_, 0.793_617_8 * m_));
    let a = 0.450_593_7f32.mul_add(s_, 1.977_998_5f32.mul_add(l_, -(2.428_592_2 * m_)));
    let b_ok = 0.808_675_77f32.mul_add(-s_, 0.025_904_037f32.mul_add(l_, 0.782_771_77 * m_));
    (l_ok, a, b_ok)
}

/// Apply the sRGB transfer curve to one linear component.
#[inline]
#[must_use]
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055f32.mul_add(c.powf(1.0 / 2.4), -0.055)
    }
}

/// Remove the sRGB transfer curve from one component.
#[inline]
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn srgb_to_oklch(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let (l, a, b_ok) =
        linear_srgb_to_oklab(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b));
    oklab_to_oklch(l, a, b_ok)
}

fn oklch_to_srgb(l: f32, c: f32, h: f32) -> (f32, f32, f32) {
    let (l, a, b) = oklch_to_oklab(l, c, h);
    let (lr, lg, lb) = oklab_to_linear_srgb(l, a, b);
    (linear_to_srgb(lr), linear_to_srgb(lg), linear_to_srgb(lb))
}

// ─── Hex Parsing ─────────────────────────────────────────────────────────────

fn parse_hex(s: &str) -> Option<Color> {
    let s = s.strip_prefix('#').unwrap_or(s);
    let bytes = s.as_bytes();
    let nibble = |i: usize| parse_hex_digit(bytes[i]).map(|n| n << 4 | n);
    let byte = |i: usize| Some(parse_hex_digit(bytes[i])? << 4 | parse_hex_digit(bytes[i + 1])?);

    match bytes.len() {
        3 => Some(Color::rgb8(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::rgba8(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Color::rgb8(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(v: f32) -> u8 {
    v.mul_add(255.0, 0.5).clamp(0.0, 255.0) as u8
}

// ─── ANSI Palette ────────────────────────────────────────────────────────────

pub mod palette {
    //! The xterm 256-color palette and perceptual nearest-match lookup.

    use super::Color;

    /// The 16 classic colors, xterm defaults.
    pub const ANSI16_RGB: [(u8, u8, u8); 16] = [
        (0, 0, 0),
        (128, 0, 0),
        (0, 128, 0),
        (128, 128, 0),
        (0, 0, 128),
        (128, 0, 128),
        (0, 128, 128),
        (192, 192, 192),
        (128, 128, 128),
        (255, 0, 0),
        (0, 255, 0),
        (255, 255, 0),
        (0, 0, 255),
        (255, 0, 255),
        (0, 255, 255),
        (255, 255, 255),
    ];

    /// RGB value of a 256-color palette index.
    #[must_use]
    pub fn ansi256_to_rgb(idx: u8) -> (u8, u8, u8) {
        match idx {
            0..=15 => ANSI16_RGB[idx as usize],
            16..=231 => {
                let idx = idx - 16;
                let level = |i: u8| if i == 0 { 0 } else { 55 + 40 * i };
                (level(idx / 36), level((idx % 36) / 6), level(idx % 6))
            }
            232..=255 => {
                let v = 8 + 10 * (idx - 232);
                (v, v, v)
            }
        }
    }

    /// A 256-color palette index as a [`Color`].
    #[must_use]
    pub fn ansi256_to_color(idx: u8) -> Color {
        let (r, g, b) = ansi256_to_rgb(idx);
        Color::rgb8(r, g, b)
    }

    fn nearest(color: Color, candidates: impl Iterator<Item = u8>) -> u8 {
        candidates
            .map(|idx| (idx, color.distance(&ansi256_to_color(idx))))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(0, |(idx, _)| idx)
    }

    /// Closest of the 256 palette entries by Oklab distance.
    #[must_use]
    pub fn nearest_ansi256(color: Color) -> u8 {
        nearest(color, 0u8..=255)
    }

    /// Closest of the 16 classic colors by Oklab distance.
    #[must_use]
    pub fn nearest_ansi16(color: Color) -> u8 {
        nearest(color, 0u8..16)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
