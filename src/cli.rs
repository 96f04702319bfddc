//! CLI argument definitions using clap derive macros.
//!
//! The run itself has no configurable behavior beyond environment variables
//! and fixed file paths; the flags here only control log output.

use clap::Parser;

/// Export medical test records from a hospital patient portal to CSV.
///
/// Credentials and the portal URL come from the environment (`USERNAME`,
/// `PASSWORD`, `URL`, or a `.env` file). Session cookies persist in
/// `cookies.json`; records land in `output.csv`.
#[derive(Parser, Debug)]
#[command(name = "portal-export")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["portal-export"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["portal-export", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["portal-export", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_rejects_unknown_flags() {
        assert!(Args::try_parse_from(["portal-export", "--pages", "3"]).is_err());
    }
}
