use ariadne::{Label, Report, ReportKind, Source};
use cas_symbolic::{dictionary::InvalidCategory, expr::json::MathJsonError};
use std::io;

/// Utility enum to package errors that can occur while reading input.
#[derive(Debug)]
pub enum Error {
    /// The text is not valid JSON. The text is kept so that the error can point into it.
    Json {
        source: String,
        err: serde_json::Error,
    },

    /// The JSON is valid, but is not an expression.
    MathJson(MathJsonError),

    /// A library file names an unknown category.
    Category(InvalidCategory),

    /// A file could not be read.
    Io(io::Error),

    /// A command was used incorrectly.
    Usage(String),
}

impl Error {
    /// Creates an [`Error::Json`] for an error found while parsing `source`.
    pub fn json(source: &str, err: serde_json::Error) -> Self {
        Self::Json { source: source.to_string(), err }
    }

    /// Report this [`Error`] to stderr.
    ///
    /// JSON syntax errors are displayed as a report pointing at the offending character.
    pub fn report_to_stderr(&self) {
        match self {
            Self::Json { source, err } if err.line() > 0 => {
                let offset = offset_of(source, err.line(), err.column());
                let report = Report::build(ReportKind::Error, "input", offset)
                    .with_message("invalid JSON")
                    .with_label(Label::new(("input", offset..(offset + 1).min(source.len()))).with_message(err.to_string()))
                    .finish();
                if report.eprint(("input", Source::from(source))).is_err() {
                    eprintln!("error: {}", err);
                }
            },
            Self::Json { err, .. } => eprintln!("error: {}", err),
            Self::MathJson(err) => eprintln!("error: {}", err),
            Self::Category(err) => eprintln!("error: {}", err),
            Self::Io(err) => eprintln!("error: {}", err),
            Self::Usage(usage) => eprintln!("usage: {}", usage),
        }
    }
}

/// Converts a 1-based line and column into a byte offset into `source`.
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let line_start = source.split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum::<usize>();
    (line_start + column.saturating_sub(1)).min(source.len())
}

impl From<MathJsonError> for Error {
    fn from(err: MathJsonError) -> Self {
        Self::MathJson(err)
    }
}

impl From<InvalidCategory> for Error {
    fn from(err: InvalidCategory) -> Self {
        Self::Category(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
