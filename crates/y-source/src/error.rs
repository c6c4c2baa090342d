//! Errors for source construction and annotation.

use thiserror::Error;

use crate::position::Position;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// A span whose start lies after its end.
    #[error("invalid span: start {start} is after end {end}")]
    InvalidSpan { start: Position, end: Position },

    /// Two classified segments claim the same characters. This is a bug in
    /// the classifier, never a property of the input.
    #[error("overlapping segments on line {line}: columns {first:?} and {second:?}")]
    OverlappingSegments {
        line: usize,
        first: (usize, usize),
        second: (usize, usize),
    },

    #[error("line {line} is out of range (source has {count} lines)")]
    LineOutOfRange { line: usize, count: usize },
}
