use std::process::ExitCode;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use dql_errors::Renderer;
use dql_inputs::Document;
use dql_parse::ParserConfig;
use dql_yellow::query::Pattern;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "dql", about = "Parse Doctrine Query Language files")]
struct Options {
    #[command(flatten)]
    config: ConfigArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ConfigArgs {
    /// Tokens deletion recovery may skip to find what it expects.
    #[arg(long, global = true, default_value_t = ParserConfig::default().recovery_lookahead)]
    recovery_lookahead: usize,
    /// Deepest nesting accepted before a statement is given up.
    #[arg(long, global = true, default_value_t = ParserConfig::default().max_depth)]
    max_depth: u32,
}

#[derive(Subcommand)]
enum Command {
    /// Report syntax errors; exits with a failure status if there are any.
    Check { paths: Vec<Utf8PathBuf> },
    /// Print the syntax tree.
    Tree { path: Utf8PathBuf },
    /// Print every node matching an S-expression pattern.
    Query { path: Utf8PathBuf, pattern: String },
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("DQL_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let Options { config, command } = Options::parse();
    let config =
        ParserConfig { recovery_lookahead: config.recovery_lookahead, max_depth: config.max_depth };

    match command {
        Command::Check { paths } => {
            let renderer = Renderer::styled();
            let mut errors = 0;

            for path in &paths {
                let document = open(path, &config)?;
                for diagnostic in document.parse().diagnostics() {
                    eprintln!("{}", diagnostic.render(&renderer, path.as_str(), document.text()));
                    errors += 1;
                }
            }

            tracing::info!(files = paths.len(), errors, "checked");
            Ok(if errors == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Tree { path } => {
            let document = open(&path, &config)?;
            print!("{}", document.parse().debug_dump());
            Ok(ExitCode::SUCCESS)
        }
        Command::Query { path, pattern } => {
            let pattern = Pattern::parse(&pattern)
                .with_context(|| format!("invalid pattern `{pattern}`"))?;
            let document = open(&path, &config)?;

            for node in pattern.find_all(document.parse().root()) {
                let range = node.trimmed_range();
                let start = document.line_col(range.start());
                println!(
                    "{path}:{}:{}: {:?} {}",
                    start.line + 1,
                    start.col + 1,
                    node.kind(),
                    node.text_trimmed()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open(path: &Utf8Path, config: &ParserConfig) -> anyhow::Result<Document> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))?;
    Ok(Document::with_config(path, text, config))
}
