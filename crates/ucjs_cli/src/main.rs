use std::error::Error as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use ucjs_convert::{convert_tree, ConvertError, ConvertOptions};

#[derive(Parser, Debug)]
#[command(name = "ucjs", version, about = "Convert ESM files or folders into CommonJS")]
struct Cli {
    /// Source file or folder.
    source: Option<PathBuf>,
    /// Destination file or folder.
    dest: Option<PathBuf>,
    /// Avoid import/export related bloat.
    #[arg(long, alias = "no-default")]
    no_interop: bool,
    /// Log every discovered and converted file.
    #[arg(short, long)]
    verbose: bool,
}

fn banner() -> String {
    format!(
        "\n{} v{}\n{}\n  ucjs source.js dest.js\n  ucjs --no-interop source_dir dest_dir\n{}\n  --no-interop  {}\n  --no-default  {}\n",
        style(env!("CARGO_PKG_DESCRIPTION")).bold(),
        env!("CARGO_PKG_VERSION"),
        style("usage:").dim(),
        style("options:").dim(),
        style("# avoid import/export related bloat").dim(),
        style("# alias for --no-interop").dim(),
    )
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

fn report_failure(err: &ConvertError) {
    debug!(operation = err.operation(), path = %err.path().display(), "conversion failed");
    eprintln!("{}: {}", style("Warning").bold(), err);
    let mut cause = err.source();
    while let Some(e) = cause {
        eprintln!("{e}");
        cause = e.source();
    }
}

/// Convert `cli.source` into `cli.dest`, both resolved against `cwd`.
/// Without both paths only the banner is printed.
fn run(cli: &Cli, cwd: &Path) -> ExitCode {
    let (Some(source), Some(dest)) = (&cli.source, &cli.dest) else {
        println!("{}", banner());
        return ExitCode::SUCCESS;
    };

    let source = cwd.join(source);
    let dest = cwd.join(dest);
    let options = ConvertOptions::default().with_interop(!cli.no_interop);
    debug!(source = %source.display(), dest = %dest.display(), ?options, "starting");

    match convert_tree(&source, &dest, options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err);
            ExitCode::FAILURE
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().context("failed to resolve the working directory")?;
    Ok(run(&cli, &cwd))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_paths_and_flags() {
        let cli = Cli::parse_from(["ucjs", "--no-interop", "src", "out"]);
        assert_eq!(cli.source, Some(PathBuf::from("src")));
        assert_eq!(cli.dest, Some(PathBuf::from("out")));
        assert!(cli.no_interop);
        assert!(!cli.verbose);
    }

    #[test]
    fn no_default_is_an_alias() {
        let cli = Cli::parse_from(["ucjs", "a.js", "--no-default", "b.js"]);
        assert!(cli.no_interop);
        assert_eq!(cli.dest, Some(PathBuf::from("b.js")));
    }

    #[test]
    fn missing_paths_parse_as_none() {
        let cli = Cli::parse_from(["ucjs"]);
        assert!(cli.source.is_none() && cli.dest.is_none());

        let cli = Cli::parse_from(["ucjs", "-v", "only-source"]);
        assert!(cli.verbose);
        assert!(cli.dest.is_none());
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["ucjs", "--no-bundle", "a", "b"]).is_err());
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn missing_paths_write_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("only.js"), "export const a = 1;\n").unwrap();

        assert_eq!(run(&Cli::parse_from(["ucjs"]), tmp.path()), ExitCode::SUCCESS);
        assert_eq!(
            run(&Cli::parse_from(["ucjs", "only.js"]), tmp.path()),
            ExitCode::SUCCESS
        );
        assert_eq!(entries(tmp.path()), 1);
    }

    #[test]
    fn paths_resolve_against_the_working_directory() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("in.mjs"), "export const a = 1;\n").unwrap();

        let cli = Cli::parse_from(["ucjs", "in.mjs", "out/in.mjs"]);
        assert_eq!(run(&cli, tmp.path()), ExitCode::SUCCESS);
        assert!(tmp.path().join("out/in.js").is_file());
        assert!(tmp.path().join("out/package.json").is_file());
    }

    #[test]
    fn failures_exit_with_status_one() {
        let tmp = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from(["ucjs", "missing.js", "out.js"]);
        assert_eq!(run(&cli, tmp.path()), ExitCode::FAILURE);
        assert_eq!(entries(tmp.path()), 0);
    }

    #[test]
    fn banner_lists_usage() {
        let text = banner();
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
        assert!(text.contains("ucjs source.js dest.js"));
        assert!(text.contains("ucjs --no-interop source_dir dest_dir"));
        assert!(text.contains("--no-default"));
    }
}
