use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use masterlist_converter::{convert, ConvertOptions, InputSource, OutputTarget};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "masterlist-converter")]
#[command(author, version, about = "Convert a legacy MF2 masterlist to the MF3 YAML format", long_about = None)]
struct Cli {
    /// Legacy masterlist to read ('-' for stdin)
    input: String,

    /// Converted masterlist path ('-' for stdout) [default: INPUT with a .yaml extension]
    #[arg(short, long)]
    output: Option<String>,

    /// Write conversion statistics as JSON ('-' for stdout)
    #[arg(long)]
    report: Option<String>,

    /// Leave comments out of the converted document
    #[arg(long)]
    strip_comments: bool,

    /// Only validate the input, write no document
    #[arg(long)]
    check: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };

    // Logs go to stderr so converted output can be piped from stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let mut options = ConvertOptions::new(InputSource::from_arg(&cli.input));
    if let Some(output) = &cli.output {
        options.output = OutputTarget::from_arg(output);
    }
    options.report = cli.report.as_deref().map(OutputTarget::from_arg);
    options.strip_comments = cli.strip_comments;
    options.check_only = cli.check;

    let report = convert(&options).with_context(|| format!("failed to convert {}", cli.input))?;

    info!(
        plugins = report.plugins,
        tags = report.tags_added + report.tags_removed,
        messages = report.messages.total() + report.global_messages,
        passed_through = report.passed_through,
        "Done"
    );

    Ok(())
}
