//! Contains the [`SignalKind`] trait and the [`Signal`] record used to report diagnostics found
//! while compiling a dictionary of definitions.
//!
//! Compilation never aborts on a bad entry. Instead, every problem is described by a [`Signal`]
//! with a [`Severity`], the name of the entry it concerns, and a kind that knows how to describe
//! itself. Signals can be turned into [`ariadne`] reports for display.

#[cfg(test)]
extern crate self as cas_error;

use ariadne::{Color, Fmt, Label, Report, ReportKind};
use std::{any::Any, fmt::{self, Debug, Display, Formatter}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// How serious a [`Signal`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The entry (or relation) is unusable, and was dropped or left undefined.
    Error,

    /// The entry was kept despite an inconsistency.
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Describes one kind of diagnostic.
///
/// This trait is usually derived with `#[derive(SignalKind)]` from the `cas-attrs` crate.
pub trait SignalKind: Debug + Send + Sync {
    /// A short, stable identifier for this kind of signal, such as `cyclic-definition`.
    fn code(&self) -> &'static str;

    /// The message displayed at the top of the report.
    fn message(&self) -> String;

    /// Optional help text, describing what the user can do to fix the problem.
    fn help(&self) -> Option<String> {
        None
    }

    /// Returns `self` as [`Any`], so that the concrete kind can be recovered.
    fn as_any(&self) -> &dyn Any;
}

/// A diagnostic associated with a named dictionary entry.
#[derive(Debug)]
pub struct Signal {
    /// How serious the problem is.
    pub severity: Severity,

    /// The name of the entry this signal is about.
    pub name: String,

    /// The kind of problem that was found.
    pub kind: Box<dyn SignalKind>,
}

impl Signal {
    /// Creates a new signal with the given severity, entry name and kind.
    pub fn new(severity: Severity, name: impl Into<String>, kind: impl SignalKind + 'static) -> Self {
        Self { severity, name: name.into(), kind: Box::new(kind) }
    }

    /// Creates a new [`Severity::Error`] signal.
    pub fn error(name: impl Into<String>, kind: impl SignalKind + 'static) -> Self {
        Self::new(Severity::Error, name, kind)
    }

    /// Creates a new [`Severity::Warning`] signal.
    pub fn warning(name: impl Into<String>, kind: impl SignalKind + 'static) -> Self {
        Self::new(Severity::Warning, name, kind)
    }

    /// The stable identifier of the kind of this signal.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Returns the kind of this signal if it is of type `T`.
    pub fn downcast_ref<T: SignalKind + 'static>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    /// Build a report from this signal.
    ///
    /// `span` is the region of the source (with id `src_id`) where the entry is defined. Callers
    /// that have no source text for the dictionary can render the entry name itself as the
    /// source, with a span covering the whole name.
    pub fn build_report<'a>(&self, src_id: &'a str, span: Range<usize>) -> Report<(&'a str, Range<usize>)> {
        let kind = match self.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
        };

        let mut builder = Report::build(kind, src_id, span.start)
            .with_code(self.code())
            .with_message(self.kind.message())
            .with_label(
                Label::new((src_id, span))
                    .with_color(EXPR)
                    .with_message(format!("`{}` is defined here", (&self.name).fg(EXPR))),
            );

        if let Some(help) = self.kind.help() {
            builder.set_help(help);
        }
        builder.finish()
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] `{}`: {}", self.severity, self.code(), self.name, self.kind.message())
    }
}

#[cfg(test)]
mod tests {
    use ariadne::Source;
    use cas_attrs::SignalKind;
    use super::*;

    #[derive(Debug, Clone, SignalKind, PartialEq)]
    #[signal(
        code = "unknown-thing",
        message = format!("`{}` is not a known thing", thing),
        help = "define it first",
    )]
    struct UnknownThing {
        thing: String,
    }

    #[derive(Debug, Clone, SignalKind, PartialEq)]
    #[signal(code = "bare", message = "something is off")]
    struct Bare;

    #[test]
    fn derived_kind() {
        let signal = Signal::warning("Foo", UnknownThing { thing: "Bar".to_string() });
        assert_eq!(signal.code(), "unknown-thing");
        assert_eq!(signal.kind.message(), "`Bar` is not a known thing");
        assert_eq!(signal.kind.help().as_deref(), Some("define it first"));
        assert_eq!(signal.to_string(), "warning[unknown-thing] `Foo`: `Bar` is not a known thing");
    }

    #[test]
    fn downcast() {
        let signal = Signal::error("x", Bare);
        assert_eq!(signal.kind.help(), None);
        assert_eq!(signal.downcast_ref::<Bare>(), Some(&Bare));
        assert!(signal.downcast_ref::<UnknownThing>().is_none());
    }

    #[test]
    fn render_report() {
        let source = "{\n  \"Foo\": { \"domain\": \"Bar\" }\n}";
        let start = source.find("\"Foo\"").unwrap();
        let signal = Signal::warning("Foo", UnknownThing { thing: "Bar".to_string() });

        let mut out = Vec::new();
        signal.build_report("dict.json", start..start + 5)
            .write(("dict.json", Source::from(source)), &mut out)
            .unwrap();
        let out = String::from_utf8(strip_ansi_escapes::strip(out)).unwrap();

        assert!(out.contains("Warning"));
        assert!(out.contains("`Bar` is not a known thing"));
        assert!(out.contains("`Foo` is defined here"));
        assert!(out.contains("define it first"));
    }
}
