//! Errors raised while building themes from user input.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThemeError {
    /// A color string that is not `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    #[error("invalid color {0:?}: expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("unknown style category {0:?}")]
    UnknownCategory(String),

    /// A palette key that names no palette role.
    #[error("unknown palette role {0:?}")]
    UnknownRole(String),
}
