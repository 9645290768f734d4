use asar_trim::cmd::{self, TrimArgs};
use asar_trim::pipeline::DEFAULT_ARCHIVE_NAME;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process;

/// Electron app.asar size trimmer
///
/// asar-trim extracts an Electron app.asar, deletes files the app never
/// loads at runtime (docs, licenses, sources, build configs), minifies JSON
/// and repacks the archive in place.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct Cli {
    /// Directory containing the archive (usually the app's resources directory)
    #[arg(short, long, value_name = "DIR", required = true)]
    path: Option<PathBuf>,

    /// File listing the preferred order of files in the repacked archive
    #[arg(short = 'H', long, value_name = "FILE")]
    hint_file: Option<PathBuf>,

    /// Copy the archive to <ARCHIVE>.bak before modifying it
    #[arg(short, long)]
    backup: bool,

    /// Keep the extracted directory after repacking
    #[arg(short, long)]
    keep_extracted: bool,

    /// Archive file name inside --path
    #[arg(long, value_name = "NAME", default_value = DEFAULT_ARCHIVE_NAME)]
    archive: String,

    /// Rule config file (defaults to <DIR>/.asar-trim.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output the report as JSON
    #[arg(long)]
    json: bool,

    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long)]
    no_emoji: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    if cli.no_emoji {
        std::env::set_var("NO_EMOJI", "1");
    }

    let result = match (cli.command, cli.path) {
        (Some(Commands::Completions { shell }), _) => {
            cmd::cmd_completions(shell, &mut Cli::command(), &mut std::io::stdout());
            Ok(())
        }
        (None, Some(path)) => cmd::cmd_trim(&TrimArgs {
            path,
            hint_file: cli.hint_file,
            backup: cli.backup,
            keep_extracted: cli.keep_extracted,
            archive: cli.archive,
            config: cli.config,
            json: cli.json,
        }),
        (None, None) => {
            // clap enforces --path; keep a readable fallback anyway
            let _ = Cli::command().print_help();
            process::exit(64);
        }
    };

    if let Err(e) = result {
        use asar_trim::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert()
    }

    #[test]
    fn test_short_flags_parse() {
        let cli = Cli::try_parse_from(["asar-trim", "-p", "res", "-H", "order.txt", "-b", "-k"])
            .unwrap();
        assert_eq!(cli.path, Some(PathBuf::from("res")));
        assert_eq!(cli.hint_file, Some(PathBuf::from("order.txt")));
        assert!(cli.backup);
        assert!(cli.keep_extracted);
        assert_eq!(cli.archive, "app.asar");
    }

    #[test]
    fn test_path_is_required_without_subcommand() {
        assert!(Cli::try_parse_from(["asar-trim", "--backup"]).is_err());
    }

    #[test]
    fn test_completions_subcommand_needs_no_path() {
        let cli = Cli::try_parse_from(["asar-trim", "completions", "bash"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Completions { .. })));
    }
}
