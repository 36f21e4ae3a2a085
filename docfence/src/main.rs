//! Tutorial snippet checker.
//!
//! Validates the fenced code snippets of a tutorial directory and renders
//! each tutorial to HTML or JSON, flagging snippets that do not parse.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use docfence::core::format::OutputFormat;
use docfence::exit_codes;
use docfence::io::config::{CliOverrides, resolve_config};
use docfence::logging;
use docfence::render::render_tutorials;
use docfence::validate::{RunRequest, validate_tutorials};

#[derive(Parser)]
#[command(
    name = "docfence",
    version,
    about = "Validate and render code snippets in tutorial files"
)]
struct Cli {
    /// Debug-level diagnostics on stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every tutorial under INPUT_DIR into OUTPUT_DIR.
    Render {
        input_dir: PathBuf,
        output_dir: PathBuf,
        #[command(flatten)]
        run: RunArgs,
        /// Output encoding (default from config, else html).
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Check snippets and print the report without writing anything.
    Validate {
        input_dir: PathBuf,
        #[command(flatten)]
        run: RunArgs,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List fence tags that are checked and the grammar each maps to.
    Languages {
        /// Config file with language aliases (default: ./docfence.toml when present).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Exit with code 2 when any snippet is invalid.
    #[arg(long)]
    strict: bool,
    /// Config file (default: <INPUT_DIR>/docfence.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Worker threads (0 = one per core).
    #[arg(short, long)]
    jobs: Option<usize>,
}

impl RunArgs {
    fn into_request(self, input_dir: PathBuf, format: Option<OutputFormat>) -> RunRequest {
        RunRequest {
            input_dir,
            config_path: self.config,
            overrides: CliOverrides {
                strict: self.strict,
                format,
                jobs: self.jobs,
            },
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match run(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::LOAD_FAILED);
        }
    }
}

fn run(command: Command) -> Result<i32> {
    match command {
        Command::Render {
            input_dir,
            output_dir,
            run,
            format,
        } => {
            let request = run.into_request(input_dir, format);
            let outcome = render_tutorials(&request, &output_dir)?;
            print!("{}", outcome.report.to_text());
            println!(
                "render: files={} written={} unchanged={} output={}",
                outcome.report.summary.files,
                outcome.written,
                outcome.unchanged,
                outcome.output_dir.display()
            );
            Ok(outcome.exit_code)
        }
        Command::Validate {
            input_dir,
            run,
            json,
        } => {
            let request = run.into_request(input_dir, None);
            let outcome = validate_tutorials(&request)?;
            if json {
                print!("{}", outcome.report.to_json()?);
            } else {
                print!("{}", outcome.report.to_text());
            }
            Ok(outcome.exit_code)
        }
        Command::Languages { config } => {
            let (config, _) = resolve_config(config.as_deref(), Path::new("."))?;
            for (tag, grammar) in config.language_table()?.entries() {
                println!("{tag} -> {grammar}");
            }
            Ok(exit_codes::OK)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_flags_parse() {
        let cli = Cli::try_parse_from([
            "docfence", "-v", "render", "docs", "site", "--strict", "--format", "json", "-j", "2",
        ])
        .expect("parse");
        assert!(cli.verbose);
        let Command::Render {
            input_dir,
            output_dir,
            run,
            format,
        } = cli.command
        else {
            panic!("expected render");
        };
        assert_eq!(input_dir, PathBuf::from("docs"));
        assert_eq!(output_dir, PathBuf::from("site"));
        assert!(run.strict);
        assert_eq!(run.jobs, Some(2));
        assert_eq!(format, Some(OutputFormat::Json));
    }

    #[test]
    fn validate_requires_input_dir() {
        assert!(Cli::try_parse_from(["docfence", "validate"]).is_err());
        let cli = Cli::try_parse_from(["docfence", "validate", "docs", "--json"]).expect("parse");
        assert!(matches!(cli.command, Command::Validate { json: true, .. }));
    }
}
