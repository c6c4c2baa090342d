//! WCAG contrast enforcement for generated palettes.
//!
//! Contrast is measured in sRGB relative luminance (the WCAG definition) but
//! corrected by moving OKLCH lightness, which keeps hue and chroma intact
//! and changes perceived brightness evenly.
//!
//! - Text roles: at least the requested ratio against the background.
//! - Comments: held inside a narrow band so they read as de-emphasized.

use y_term::color::{Color, srgb_to_linear};

use crate::palette::Mode;

/// Relative luminance of a color per WCAG 2.1, in `0.0..=1.0`.
#[must_use]
pub fn relative_luminance(color: Color) -> f64 {
    let (r, g, b) = color.to_srgb();
    let r_lin = f64::from(srgb_to_linear(r));
    let g_lin = f64::from(srgb_to_linear(g));
    let b_lin = f64::from(srgb_to_linear(b));
    0.2126f64.mul_add(r_lin, 0.7152f64.mul_add(g_lin, 0.0722 * b_lin))
}

/// WCAG 2.1 contrast ratio, in `1.0..=21.0` regardless of argument order.
#[must_use]
pub fn contrast_ratio(a: Color, b: Color) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Move `fg`'s lightness until it reaches `min_ratio` against `bg`.
///
/// Dark palettes brighten the foreground, light palettes darken it. The
/// binary search settles on the smallest change that satisfies the ratio.
/// The result is gamut-mapped to sRGB.
#[must_use]
pub fn ensure_readability(fg: Color, bg: Color, min_ratio: f64, mode: Mode) -> Color {
    if contrast_ratio(fg, bg) >= min_ratio {
        return fg.to_gamut();
    }

    let dark = mode == Mode::Dark;
    let (mut lo, mut hi) = if dark { (fg.l, 1.0) } else { (0.0, fg.l) };

    let mut best = fg;
    for _ in 0..32 {
        let mid = (lo + hi) * 0.5;
        let candidate = Color::oklch(mid, fg.c, fg.h).to_gamut();
        if contrast_ratio(candidate, bg) >= min_ratio {
            best = candidate;
            if dark {
                hi = mid;
            } else {
                lo = mid;
            }
        } else if dark {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    best
}

/// Place a comment color inside its contrast band against `bg`.
///
/// Dark palettes target 2.5–3.5:1, light palettes 1.5–3.0:1, aiming for
/// the middle of the band.
#[must_use]
pub fn adjust_comment_color(comment: Color, bg: Color, mode: Mode) -> Color {
    let dark = mode == Mode::Dark;
    let (target_min, target_max) = if dark { (2.5, 3.5) } else { (1.5, 3.0) };
    let target_mid = (target_min + target_max) * 0.5;

    let mut lo: f32 = 0.0;
    let mut hi: f32 = 1.0;
    let mut best = comment;
    let mut best_dist = f64::MAX;

    for _ in 0..32 {
        let mid = (lo + hi) * 0.5;
        let candidate = Color::oklch(mid, comment.c, comment.h).to_gamut();
        let ratio = contrast_ratio(candidate, bg);
        let dist = (ratio - target_mid).abs();
        if dist < best_dist {
            best_dist = dist;
            best = candidate;
        }

        // Too much contrast: move toward the background.
        let toward_bg = ratio > target_mid;
        if dark == toward_bg {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    // ── Luminance and ratio ─────────────────────────────────────────

    #[test]
    fn luminance_extremes() {
        assert!(approx_eq(relative_luminance(Color::BLACK), 0.0, 0.001));
        assert!(approx_eq(relative_luminance(Color::WHITE), 1.0, 0.001));
    }

    #[test]
    fn luminance_pure_green() {
        let lum = relative_luminance(Color::srgb(0.0, 1.0, 0.0));
        assert!(approx_eq(lum, 0.7152, 0.01), "Green luminance: {lum}");
    }

    #[test]
    fn contrast_black_white_is_21() {
        let ratio = contrast_ratio(Color::BLACK, Color::WHITE);
        assert!(approx_eq(ratio, 21.0, 0.1), "B/W contrast: {ratio}");
    }

    #[test]
    fn contrast_is_symmetric() {
        let a = Color::srgb(0.8, 0.2, 0.3);
        let b = Color::srgb(0.1, 0.1, 0.4);
        assert!(approx_eq(contrast_ratio(a, b), contrast_ratio(b, a), 0.001));
    }

    // ── ensure_readability ──────────────────────────────────────────

    #[test]
    fn readability_dark_lightens() {
        let fg = Color::oklch(0.25, 0.05, 270.0);
        let bg = Color::oklch(0.15, 0.005, 270.0);
        let adjusted = ensure_readability(fg, bg, 5.5, Mode::Dark);
        assert!(contrast_ratio(adjusted, bg) >= 5.5);
        assert!(adjusted.l > fg.l);
    }

    #[test]
    fn readability_light_darkens() {
        let fg = Color::oklch(0.85, 0.05, 90.0);
        let bg = Color::oklch(0.97, 0.002, 0.0);
        let adjusted = ensure_readability(fg, bg, 5.5, Mode::Light);
        assert!(contrast_ratio(adjusted, bg) >= 5.5);
        assert!(adjusted.l < fg.l);
    }

    // ── adjust_comment_color ────────────────────────────────────────

    #[test]
    fn comment_dark_in_band() {
        let bg = Color::oklch(0.15, 0.005, 270.0);
        let adjusted = adjust_comment_color(Color::oklch(0.5, 0.02, 270.0), bg, Mode::Dark);
        let ratio = contrast_ratio(adjusted, bg);
        assert!((2.3..=3.8).contains(&ratio), "Dark comment contrast: {ratio}");
    }

    #[test]
    fn comment_light_in_band() {
        let bg = Color::oklch(0.97, 0.002, 0.0);
        let adjusted = adjust_comment_color(Color::oklch(0.5, 0.02, 90.0), bg, Mode::Light);
        let ratio = contrast_ratio(adjusted, bg);
        assert!((1.3..=3.3).contains(&ratio), "Light comment contrast: {ratio}");
    }
}
