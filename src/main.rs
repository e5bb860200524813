//! ppl-grammar CLI - parse and inspect PCBoard Programming Language sources

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as _;
use tracing::Level;

use ppl_grammar::cli::{Args, SubCommand};
use ppl_grammar::output::{
    format_output, CheckReport, FileStatus, LanguageInfo, OutputConfig, OutputFormat, Report,
};
use ppl_grammar::{highlight, language, Config, Parser};

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run(args: Args) -> Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if args.json {
        config.output.format = OutputFormat::Json;
    }
    if args.no_comments {
        config.parser.keep_comments = false;
    }

    let language = language::language()?;
    let mut parser = Parser::with_options(config.parser.clone());
    parser.set_language(&language)?;

    match args.command {
        SubCommand::Parse { file } => {
            let source = read_source(&file)?;
            let tree = parser
                .parse(&source)
                .with_context(|| format!("failed to parse {}", file.display()))?;
            print_report(&Report::Tree(&tree), &config.output);
        }

        SubCommand::Check { files } => {
            let mut report = CheckReport::default();
            for file in &files {
                let path = file.display().to_string();
                let status = match read_source(file).and_then(|source| Ok(parser.parse(&source)?)) {
                    Ok(tree) => FileStatus::passed(path, tree.node_count()),
                    Err(e) => FileStatus::failed(path, format!("{:#}", e)),
                };
                tracing::debug!(file = %status.path, ok = status.ok, "checked");
                report.files.push(status);
            }
            print_report(&Report::Check(&report), &config.output);
            if !report.is_success() {
                return Ok(ExitCode::from(1));
            }
        }

        SubCommand::Highlight { file } => {
            let source = read_source(&file)?;
            let tree = parser
                .parse(&source)
                .with_context(|| format!("failed to parse {}", file.display()))?;
            let spans = highlight::highlight(&tree);
            print_report(&Report::Highlights(&tree, &spans), &config.output);
        }

        SubCommand::Info => {
            let info = LanguageInfo::new(&language);
            print_report(&Report::Language(&info), &config.output);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// PPL sources are often CP437; anything that is not UTF-8 is replaced.
fn read_source(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn print_report(report: &Report<'_>, config: &OutputConfig) {
    let output = format_output(report, config);
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
}
