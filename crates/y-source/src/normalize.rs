//! Unicode folding for search.
//!
//! A [`Normalizer`] maps text to a canonical form so that "Café", "cafe" and
//! "CAFE" compare equal. The pipeline is applied one character at a time:
//!
//! 1. width fold (off by default): fullwidth and halfwidth forms to their
//!    ordinary counterparts;
//! 2. case fold (on): lowercase, plus the folds lowercase alone misses
//!    (`ß` → `ss`, final sigma, long s, Latin ligatures);
//! 3. diacritic fold (on): canonical decomposition, then combining marks
//!    dropped;
//! 4. extra [`Transformer`]s, in the order they were added.
//!
//! Working per character keeps `normalize(a + b) == normalize(a) +
//! normalize(b)`, which is what lets the finder map every normalized byte
//! back to exactly one source column.

use std::fmt;
use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// An extra folding step run after the built-in ones.
pub trait Transformer: Send + Sync {
    fn transform(&self, input: &str) -> String;
}

impl<F> Transformer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn transform(&self, input: &str) -> String {
        self(input)
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct NormalizerOptions {
    pub case_fold: bool,
    pub diacritic_fold: bool,
    pub width_fold: bool,
    pub transformers: Vec<Arc<dyn Transformer>>,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            case_fold: true,
            diacritic_fold: true,
            width_fold: false,
            transformers: Vec::new(),
        }
    }
}

impl NormalizerOptions {
    #[must_use]
    pub fn with_case_fold(mut self, on: bool) -> Self {
        self.case_fold = on;
        self
    }

    #[must_use]
    pub fn with_diacritic_fold(mut self, on: bool) -> Self {
        self.diacritic_fold = on;
        self
    }

    #[must_use]
    pub fn with_width_fold(mut self, on: bool) -> Self {
        self.width_fold = on;
        self
    }

    #[must_use]
    pub fn with_transformer(mut self, transformer: impl Transformer + 'static) -> Self {
        self.transformers.push(Arc::new(transformer));
        self
    }
}

impl fmt::Debug for NormalizerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizerOptions")
            .field("case_fold", &self.case_fold)
            .field("diacritic_fold", &self.diacritic_fold)
            .field("width_fold", &self.width_fold)
            .field("transformers", &self.transformers.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// A configured folding pipeline. Stateless, so one instance may serve any
/// number of threads.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizerOptions,
}

impl Normalizer {
    #[must_use]
    pub const fn new(options: NormalizerOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    #[must_use]
    pub fn normalize(&self, input: &str) -> String {
        input.chars().map(|c| self.normalize_char(c)).collect()
    }

    /// The folded form of one character; may be empty or several chars.
    #[must_use]
    pub fn normalize_char(&self, c: char) -> String {
        let opts = &self.options;
        let mut out = if opts.width_fold && is_width_variant(c) {
            std::iter::once(c).nfkc().collect()
        } else {
            c.to_string()
        };
        if opts.case_fold {
            let mut folded = String::with_capacity(out.len());
            for ch in out.chars().flat_map(char::to_lowercase) {
                match fold_case(ch) {
                    Some(s) => folded.push_str(s),
                    None => folded.push(ch),
                }
            }
            out = folded;
        }
        if opts.diacritic_fold {
            out = out.nfd().filter(|&ch| !is_combining_mark(ch)).collect();
        }
        for transformer in &opts.transformers {
            out = transformer.transform(&out);
        }
        out
    }
}

/// Fullwidth ASCII, halfwidth CJK/Katakana/Hangul, and the ideographic space.
const fn is_width_variant(c: char) -> bool {
    matches!(c, '\u{3000}' | '\u{FF01}'..='\u{FFEE}')
}

/// Case folds that lowercasing leaves alone.
const fn fold_case(c: char) -> Option<&'static str> {
    match c {
        'ß' => Some("ss"),
        'ſ' => Some("s"),
        'ς' => Some("σ"),
        'ﬀ' => Some("ff"),
        'ﬁ' => Some("fi"),
        'ﬂ' => Some("fl"),
        'ﬃ' => Some("ffi"),
        'ﬄ' => Some("ffl"),
        'ﬅ' | 'ﬆ' => Some("st"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn default() -> Normalizer {
        Normalizer::default()
    }

    // ── Built-in folds ──

    #[test]
    fn case_and_diacritics() {
        assert_eq!(default().normalize("Café CAFÉ"), "cafe cafe");
        assert_eq!(default().normalize("Straße"), "strasse");
        assert_eq!(default().normalize("ΟΔΟΣ"), "οδοσ");
    }

    #[test]
    fn folds_can_be_disabled() {
        let exact = Normalizer::new(
            NormalizerOptions::default()
                .with_case_fold(false)
                .with_diacritic_fold(false),
        );
        assert_eq!(exact.normalize("Café"), "Café");
        let case_only = Normalizer::new(NormalizerOptions::default().with_diacritic_fold(false));
        assert_eq!(case_only.normalize("Café"), "café");
    }

    #[test]
    fn width_fold_is_opt_in() {
        assert_eq!(default().normalize("ＡＢＣ"), "ａｂｃ");
        let wide = Normalizer::new(NormalizerOptions::default().with_width_fold(true));
        assert_eq!(wide.normalize("ＡＢＣ\u{3000}１"), "abc 1");
    }

    #[test]
    fn transformers_run_last_in_order() {
        let n = Normalizer::new(
            NormalizerOptions::default()
                .with_transformer(|s: &str| s.replace('-', "_"))
                .with_transformer(|s: &str| s.replace('_', ".")),
        );
        assert_eq!(n.normalize("A-B"), "a.b");
    }

    #[test]
    fn normalization_is_per_character() {
        let n = default();
        let (a, b) = ("Éa", "ẞx");
        assert_eq!(n.normalize(&format!("{a}{b}")), n.normalize(a) + &n.normalize(b));
        assert_eq!(n.normalize_char('\u{301}'), "");
    }

    #[test]
    fn shared_across_threads() {
        let n = Arc::new(default());
        std::thread::scope(|scope| {
            for _ in 0..4 {
                let n = Arc::clone(&n);
                scope.spawn(move || assert_eq!(n.normalize("ÀÉÎ"), "aei"));
            }
        });
    }
}
