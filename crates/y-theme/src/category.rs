//! Style categories — the fixed token-class hierarchy.
//!
//! Every classified piece of YAML and every presentation helper (diff
//! markers, search hits, gutters) is tagged with a [`Category`]. Categories
//! form a single-inheritance tree rooted at [`Category::Text`]; a category a
//! theme leaves undefined looks like its parent.
//!
//! Variants are declared parent-before-child, so iterating [`Category::ALL`]
//! visits every parent before any of its children. [`Styles`](crate::Styles)
//! relies on this to resolve the whole tree in a single pass.

use std::fmt;
use std::str::FromStr;

use crate::error::ThemeError;

macro_rules! categories {
    ($( $(#[$doc:meta])* $variant:ident = $name:literal => $parent:ident ),+ $(,)?) => {
        /// A named token class.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Category {
            $( $(#[$doc])* $variant, )+
        }

        impl Category {
            /// Every category, parents before children.
            pub const ALL: &'static [Self] = &[ $( Self::$variant, )+ ];

            /// Number of categories.
            pub const COUNT: usize = Self::ALL.len();

            /// Kebab-case name, e.g. `literal-number-hex`.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )+
                }
            }

            /// The parent category. The root is its own parent.
            #[must_use]
            pub const fn parent(self) -> Self {
                match self {
                    $( Self::$variant => Self::$parent, )+
                }
            }
        }
    };
}

categories! {
    /// Root of the hierarchy: unclassified text and whitespace.
    Text = "text" => Text,

    Comment = "comment" => Text,
    /// `%YAML` and `%TAG` directives.
    CommentPreproc = "comment-preproc" => Comment,

    Literal = "literal" => Text,
    LiteralBoolean = "literal-boolean" => Literal,
    LiteralNull = "literal-null" => Literal,
    /// A mapping value left empty. Zero-width; only visible through a
    /// transform.
    LiteralNullImplicit = "literal-null-implicit" => LiteralNull,
    LiteralNumber = "literal-number" => Literal,
    LiteralNumberBin = "literal-number-bin" => LiteralNumber,
    LiteralNumberOct = "literal-number-oct" => LiteralNumber,
    LiteralNumberHex = "literal-number-hex" => LiteralNumber,
    LiteralNumberInteger = "literal-number-integer" => LiteralNumber,
    LiteralNumberFloat = "literal-number-float" => LiteralNumber,
    LiteralNumberInfinity = "literal-number-infinity" => LiteralNumber,
    LiteralNumberNaN = "literal-number-nan" => LiteralNumber,
    LiteralString = "literal-string" => Literal,
    LiteralStringDouble = "literal-string-double" => LiteralString,
    LiteralStringSingle = "literal-string-single" => LiteralString,

    Name = "name" => Text,
    NameAnchor = "name-anchor" => Name,
    NameAlias = "name-alias" => Name,
    /// The `<<` merge key.
    NameAliasMerge = "name-alias-merge" => NameAlias,
    /// A mapping key.
    NameTag = "name-tag" => Name,
    /// A `!tag` or `!!tag`.
    NameDecorator = "name-decorator" => Name,

    Generic = "generic" => Text,
    GenericInserted = "generic-inserted" => Generic,
    GenericDeleted = "generic-deleted" => Generic,
    GenericError = "generic-error" => Generic,
    GenericErrorInvalid = "generic-error-invalid" => GenericError,
    GenericErrorUnknown = "generic-error-unknown" => GenericError,

    Punctuation = "punctuation" => Text,
    PunctuationBlock = "punctuation-block" => Punctuation,
    PunctuationBlockFolded = "punctuation-block-folded" => PunctuationBlock,
    PunctuationBlockLiteral = "punctuation-block-literal" => PunctuationBlock,
    PunctuationCollectEntry = "punctuation-collect-entry" => Punctuation,
    /// `---` and `...` document markers.
    PunctuationHeading = "punctuation-heading" => Punctuation,
    PunctuationMapping = "punctuation-mapping" => Punctuation,
    PunctuationMappingStart = "punctuation-mapping-start" => PunctuationMapping,
    PunctuationMappingEnd = "punctuation-mapping-end" => PunctuationMapping,
    PunctuationMappingValue = "punctuation-mapping-value" => PunctuationMapping,
    PunctuationSequence = "punctuation-sequence" => Punctuation,
    PunctuationSequenceStart = "punctuation-sequence-start" => PunctuationSequence,
    PunctuationSequenceEntry = "punctuation-sequence-entry" => PunctuationSequence,
    PunctuationSequenceEnd = "punctuation-sequence-end" => PunctuationSequence,

    TextAccent = "text-accent" => Text,
    TextAccentDim = "text-accent-dim" => TextAccent,
    TextSubtle = "text-subtle" => Text,
    TextSubtleDim = "text-subtle-dim" => TextSubtle,
    /// Search hits and other call-outs.
    Highlight = "highlight" => Text,
    Dim = "dim" => Text,

    Title = "title" => Text,
    TitleOk = "title-ok" => Title,
    TitleWarn = "title-warn" => Title,
    TitleError = "title-error" => Title,
    TitleAccent = "title-accent" => Title,
    TitleSubtle = "title-subtle" => Title,
}

impl Category {
    /// Position in [`Category::ALL`]; stable for table indexing.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this is the root category.
    #[inline]
    #[must_use]
    pub fn is_root(self) -> bool {
        self == Self::Text
    }

    /// Parents from `self` (exclusive) up to the root (inclusive).
    pub fn ancestors(self) -> impl Iterator<Item = Self> {
        std::iter::successors(Some(self), |c| (!c.is_root()).then(|| c.parent())).skip(1)
    }

    /// Whether `self` is `other` or descends from it.
    #[must_use]
    pub fn is_a(self, other: Self) -> bool {
        self == other || self.ancestors().any(|c| c == other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| ThemeError::UnknownCategory(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
