mod context;
mod runner;

pub use context::{CommentState, ConverterContext};
pub use runner::run_converter;

use crate::error::{ConvertError, Result};
use crate::report::ConversionReport;
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the legacy masterlist comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

/// Where converted text or a report goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl InputSource {
    /// `-` means standard input
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(arg))
        }
    }
}

impl OutputTarget {
    /// `-` means standard output
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(PathBuf::from(arg))
        }
    }

    /// Default output: the input path with a `.yaml` extension
    pub fn default_for(input: &InputSource) -> Self {
        match input {
            InputSource::Stdin => OutputTarget::Stdout,
            InputSource::File(path) => {
                let mut out = path.with_extension("yaml");
                if out == *path {
                    out = path.with_extension("mf3.yaml");
                }
                OutputTarget::File(out)
            }
        }
    }

    fn write_all(&self, bytes: &[u8]) -> Result<()> {
        match self {
            OutputTarget::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(bytes)?;
                stdout.flush()?;
            }
            OutputTarget::File(path) => {
                fs::write(path, bytes).map_err(|source| ConvertError::Create {
                    path: path.clone(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}

/// Options for one conversion run
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input: InputSource,
    pub output: OutputTarget,
    pub report: Option<OutputTarget>,
    /// Drop comments from the output document
    pub strip_comments: bool,
    /// Validate only, write no document
    pub check_only: bool,
}

impl ConvertOptions {
    pub fn new(input: InputSource) -> Self {
        let output = OutputTarget::default_for(&input);
        Self {
            input,
            output,
            report: None,
            strip_comments: false,
            check_only: false,
        }
    }
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| ConvertError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Convert a whole document held in memory
pub fn convert_str(input: &str, strip_comments: bool) -> Result<(String, ConversionReport)> {
    let mut out = Vec::new();
    let report = run_converter(input.as_bytes(), &mut out, strip_comments)?;
    Ok((String::from_utf8_lossy(&out).into_owned(), report))
}

/// Run a conversion as described by `options`.
///
/// The document is built in memory and only written once the whole input
/// converted cleanly, so a failed run never leaves a partial output file.
pub fn convert(options: &ConvertOptions) -> Result<ConversionReport> {
    let mut buffer = Vec::new();

    let report = match &options.input {
        InputSource::Stdin => {
            run_converter(io::stdin().lock(), &mut buffer, options.strip_comments)?
        }
        InputSource::File(path) => {
            info!("Converting {}", path.display());
            run_converter(open_input(path)?, &mut buffer, options.strip_comments)?
        }
    };

    if options.check_only {
        info!("Check passed, no output written");
    } else {
        options.output.write_all(&buffer)?;
        if let OutputTarget::File(path) = &options.output {
            info!("Wrote {}", path.display());
        }
    }

    if let Some(target) = &options.report {
        let mut json = report.to_json()?;
        json.push('\n');
        target.write_all(json.as_bytes())?;
    }

    Ok(report)
}
