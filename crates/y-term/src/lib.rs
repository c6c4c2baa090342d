// SPDX-License-Identifier: MIT
//
// y-term — terminal styling primitives for the y-prism render engine.
//
// Colors live in OKLCH so themes can be generated by walking hue and
// lightness and so overlapping highlights blend perceptually. A Style bundles
// colors, attribute flags and an optional text transform; the ANSI layer
// turns styles into SGR sequences and the stateful writer keeps the emitted
// stream free of redundant escapes. Control characters are escaped into
// visible one-rune stand-ins before anything reaches the terminal.

pub mod ansi;
pub mod color;
pub mod control;
pub mod output;
pub mod style;

pub use color::{CellColor, Color, ColorDepth};
pub use style::{Attr, Style, Transform};
