// SPDX-License-Identifier: MIT
//
// Command-line arguments.
//
// Flags override the config file; anything left unset falls back to it.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use y_term::ColorDepth;

/// y-prism - render YAML as styled terminal output
#[derive(Debug, Parser)]
#[command(name = "y-prism")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML file to render. Use '-' to read from stdin.
    #[arg(value_name = "FILE", required_unless_present = "list_themes")]
    pub file: Option<PathBuf>,

    /// Compare FILE (the origin) against OTHER (the tip)
    #[arg(long, value_name = "OTHER")]
    pub diff: Option<PathBuf>,

    /// Show only changed lines of the diff, with N lines of context
    /// (default: `context` from the config file)
    #[arg(long, value_name = "N", requires = "diff", num_args = 0..=1)]
    pub summary: Option<Option<usize>>,

    /// Highlight matches of QUERY (case and diacritic insensitive)
    #[arg(long, value_name = "QUERY")]
    pub find: Option<String>,

    /// With --find, print only the lines that contain a match
    #[arg(long, requires = "find")]
    pub only_matches: bool,

    /// Print only lines A through B (1-based, inclusive; either end may be
    /// omitted)
    #[arg(long, value_name = "A:B")]
    pub lines: Option<LineRange>,

    /// Show line numbers in a gutter
    #[arg(short = 'n', long)]
    pub line_numbers: bool,

    /// Theme to render with
    #[arg(short, long, value_name = "NAME")]
    pub theme: Option<String>,

    /// List the available themes and exit
    #[arg(long)]
    pub list_themes: bool,

    /// Config file (default: $Y_PRISM_CONFIG)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Expand tabs and pass other control characters through instead of
    /// showing them as control pictures
    #[arg(long)]
    pub no_escape: bool,

    /// Tab stop interval used with --no-escape
    #[arg(long, value_name = "N")]
    pub tab_width: Option<usize>,

    /// Colors the terminal understands
    #[arg(long, value_enum, value_name = "DEPTH", default_value = "truecolor")]
    pub color_depth: ColorDepthArg,

    /// Log to stderr at this level (overrides $Y_PRISM_LOG)
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,
}

// ─── Value enums ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorDepthArg {
    Truecolor,
    #[value(name = "256")]
    Ansi256,
    #[value(name = "16")]
    Ansi16,
}

impl From<ColorDepthArg> for ColorDepth {
    fn from(arg: ColorDepthArg) -> Self {
        match arg {
            ColorDepthArg::Truecolor => Self::TrueColor,
            ColorDepthArg::Ansi256 => Self::Ansi256,
            ColorDepthArg::Ansi16 => Self::Ansi16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    pub const fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Off => log::LevelFilter::Off,
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

// ─── Line ranges ────────────────────────────────────────────────────────────

/// `A:B`, `A:`, `:B` or a single `A`. Open ends reach the first or last line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub first: usize,
    pub last: usize,
}

impl LineRange {
    /// Inclusive bounds, with an open end clipped to `line_count`.
    pub fn bounds(self, line_count: usize) -> (usize, usize) {
        (self.first, self.last.min(line_count))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid line range {0:?}: expected A:B with 1 <= A <= B")]
pub struct LineRangeError(String);

impl FromStr for LineRange {
    type Err = LineRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || LineRangeError(s.to_owned());
        let bound = |part: &str, open: usize| -> Result<usize, LineRangeError> {
            let part = part.trim();
            if part.is_empty() {
                Ok(open)
            } else {
                part.parse().map_err(|_| err())
            }
        };

        let (first, last) = match s.split_once(':') {
            Some((a, b)) => (bound(a, 1)?, bound(b, usize::MAX)?),
            None => {
                let n = bound(s, 0)?;
                (n, n)
            }
        };
        if first == 0 || first > last {
            return Err(err());
        }
        Ok(Self { first, last })
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    // ── LineRange ──

    #[test]
    fn ranges_parse() {
        assert_eq!("2:3".parse::<LineRange>(), Ok(LineRange { first: 2, last: 3 }));
        assert_eq!("4".parse::<LineRange>(), Ok(LineRange { first: 4, last: 4 }));
        assert_eq!(":3".parse::<LineRange>(), Ok(LineRange { first: 1, last: 3 }));
        assert_eq!("5:".parse::<LineRange>().unwrap().bounds(9), (5, 9));
    }

    #[test]
    fn bad_ranges_are_rejected() {
        for s in ["", "0:2", "3:2", "a:b", "1:2:3"] {
            assert!(s.parse::<LineRange>().is_err(), "{s:?}");
        }
    }

    // ── Flags ──

    #[test]
    fn summary_takes_an_optional_count() {
        let cli = Cli::parse_from(["y-prism", "a.yaml", "--diff", "b.yaml", "--summary"]);
        assert_eq!(cli.summary, Some(None));
        let cli = Cli::parse_from(["y-prism", "a.yaml", "--diff", "b.yaml", "--summary", "2"]);
        assert_eq!(cli.summary, Some(Some(2)));
    }

    #[test]
    fn summary_needs_diff() {
        assert!(Cli::try_parse_from(["y-prism", "a.yaml", "--summary", "1"]).is_err());
    }

    #[test]
    fn list_themes_needs_no_file() {
        let cli = Cli::parse_from(["y-prism", "--list-themes"]);
        assert!(cli.list_themes);
        assert!(cli.file.is_none());
        assert!(Cli::try_parse_from(["y-prism"]).is_err());
    }
}
