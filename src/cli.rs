//! Command-line interface definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::Severity;

#[derive(Parser)]
#[command(
    name = "pyqual",
    about = "Python code quality analyzer with safe, mechanical auto-fixes",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze files and report scores, grades, and issues
    Review {
        /// Python file or directory to analyze
        path: PathBuf,

        /// Lowest severity to display
        #[arg(long, value_enum, default_value_t = SeverityArg::Info)]
        severity: SeverityArg,

        /// Output format
        #[arg(long, value_enum, default_value_t = FormatArg::Terminal)]
        format: FormatArg,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Apply safe mechanical fixes (naming, docstrings, whitespace)
    Fix {
        /// Python file or directory to fix
        path: PathBuf,

        /// Preview fixes without writing any file
        #[arg(long)]
        dry_run: bool,

        /// Write fixed text here instead of in place (single file only)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SeverityArg {
    Critical,
    Warning,
    Info,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Critical => Severity::Critical,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Info => Severity::Info,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn severity_arg_maps_to_core_severity() {
        assert_eq!(Severity::from(SeverityArg::Critical), Severity::Critical);
        assert_eq!(Severity::from(SeverityArg::Info), Severity::Info);
    }
}
