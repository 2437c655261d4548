mod error;

use ariadne::Source;
use cas_error::Signal;
use cas_symbolic::{
    dictionary::{compile_library, default_library, describe_supersets, Category, CompiledDictionary, Definition, RawDictionary},
    engine::{BasicEngine, Scope},
    expr::Expr,
    pattern::{match_expr, substitute, MatchOptions, Substitution},
};
use env_logger::Env;
use error::Error;
use log::info;
use rustyline::{error::ReadlineError, DefaultEditor};
use serde_json::{Map, Value};
use std::{fs, io::{self, IsTerminal, Read}, ops::Range};

const HELP: &str = "\
<subject> <pattern>    match the subject against the pattern, e.g. [\"Add\", 1, 2] [\"Add\", 1, \"_a\"]
:subst <expr>          apply the last substitution to the expression
:tolerance <number>    set the numeric tolerance used when matching
:load <file>           compile a library file and add its definitions
:lookup <name>         show the definition with the given name
:help                  show this message";

/// Parses every MathJSON expression in the input, separated by whitespace.
fn parse_exprs(input: &str) -> Result<Vec<Expr>, Error> {
    serde_json::Deserializer::from_str(input)
        .into_iter::<Value>()
        .map(|value| -> Result<Expr, Error> {
            let value = value.map_err(|err| Error::json(input, err))?;
            Ok(Expr::try_from(value)?)
        })
        .collect()
}

/// Parses a library file: an object mapping category names to dictionaries.
fn read_library(input: &str) -> Result<Vec<(Category, RawDictionary)>, Error> {
    let categories: Map<String, Value> = serde_json::from_str(input)
        .map_err(|err| Error::json(input, err))?;
    categories.into_iter()
        .map(|(name, value)| -> Result<_, Error> {
            let category = name.parse::<Category>()?;
            let raw: RawDictionary = serde_json::from_value(value).map_err(|err| Error::json(input, err))?;
            Ok((category, raw))
        })
        .collect()
}

/// Returns the span of the first occurrence of the quoted name in the source.
fn span_of(source: &str, name: &str) -> Range<usize> {
    let quoted = format!("\"{}\"", name);
    match source.find(&quoted) {
        Some(start) => start..start + quoted.len(),
        None => 0..0,
    }
}

/// Prints a report for each signal, pointing at the entry it concerns in the source file.
fn report_signals(filename: &str, source: &str, signals: &[Signal]) {
    for signal in signals {
        let report = signal.build_report(filename, span_of(source, &signal.name));
        if report.eprint((filename, Source::from(source))).is_err() {
            eprintln!("{}", signal);
        }
    }
}

/// Compiles a library file in a scope containing `library`, reporting every signal.
fn compile_file(filename: &str, library: &CompiledDictionary) -> Result<CompiledDictionary, Error> {
    let source = fs::read_to_string(filename)?;
    let categories = read_library(&source)?;

    let mut engine = BasicEngine::new();
    let compiled = compile_library(
        &mut engine,
        &Scope::root(library),
        categories.iter().map(|(category, raw)| (*category, raw)),
    );
    report_signals(filename, &source, engine.signals());
    info!("compiled {} definitions from `{}`", compiled.len(), filename);
    Ok(compiled)
}

/// The state of an interactive session.
struct Session {
    library: CompiledDictionary,
    options: MatchOptions,
    last: Option<Substitution>,
}

impl Session {
    /// Creates a session with the built-in domains.
    fn new() -> Self {
        let mut engine = BasicEngine::new();
        let library = default_library(&mut engine);
        Self { library, options: MatchOptions::default(), last: None }
    }

    /// Executes one line of input.
    fn execute(&mut self, input: &str) -> Result<(), Error> {
        let (command, rest) = match input.strip_prefix(':') {
            Some(command) => command.split_once(char::is_whitespace).unwrap_or((command, "")),
            None => ("", input),
        };
        let rest = rest.trim();

        match command {
            "" => {
                let [subject, pattern] = <[Expr; 2]>::try_from(parse_exprs(rest)?)
                    .map_err(|_| Error::Usage("<subject> <pattern>".to_string()))?;
                match match_expr(&subject, &pattern, &self.options) {
                    Some(substitution) => {
                        println!("{}", substitution);
                        self.last = Some(substitution);
                    },
                    None => println!("no match"),
                }
            },
            "subst" => {
                let [expr] = <[Expr; 1]>::try_from(parse_exprs(rest)?)
                    .map_err(|_| Error::Usage(":subst <expr>".to_string()))?;
                let substitution = self.last.clone().unwrap_or_default();
                println!("{}", substitute(&expr, &substitution));
            },
            "tolerance" => {
                let tolerance = rest.parse::<f64>()
                    .ok()
                    .filter(|tolerance| *tolerance >= 0.0)
                    .ok_or_else(|| Error::Usage(":tolerance <non-negative number>".to_string()))?;
                self.options = MatchOptions::with_tolerance(tolerance);
            },
            "load" if !rest.is_empty() => {
                let compiled = compile_file(rest, &self.library)?;
                println!("{} definitions", compiled.len());
                self.library.extend(compiled);
            },
            "lookup" if !rest.is_empty() => {
                let engine = BasicEngine::new();
                let scope = Scope::root(&self.library);
                match self.library.get(rest) {
                    Some(Definition::Set(_)) => println!("{}", describe_supersets(&engine, &scope, rest)),
                    Some(def) => println!("{:#?}", def),
                    None => println!("`{}` is not defined", rest),
                }
            },
            "load" => return Err(Error::Usage(":load <file>".to_string())),
            "lookup" => return Err(Error::Usage(":lookup <name>".to_string())),
            _ => println!("{}", HELP),
        }
        Ok(())
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut args = std::env::args();
    args.next();

    if let Some(filename) = args.next() {
        // compile a library file and report its signals
        let mut engine = BasicEngine::new();
        let library = default_library(&mut engine);
        match compile_file(&filename, &library) {
            Ok(compiled) => println!("{} definitions", compiled.len()),
            Err(err) => {
                err.report_to_stderr();
                std::process::exit(1);
            },
        }
    } else if !io::stdin().is_terminal() {
        // read commands from stdin
        let mut input = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut input) {
            Error::from(err).report_to_stderr();
            std::process::exit(1);
        }

        let mut session = Session::new();
        for line in input.lines().filter(|line| !line.trim().is_empty()) {
            if let Err(err) = session.execute(line) {
                err.report_to_stderr();
            }
        }
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            },
        };
        let mut session = Session::new();

        fn process_line(rl: &mut DefaultEditor, session: &mut Session) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            if let Err(err) = session.execute(input.trim()) {
                err.report_to_stderr();
            }
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl, &mut session) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_several() {
        let exprs = parse_exprs(r#"["Add", 1, 2] ["Add", 1, "_a"]"#).unwrap();
        assert_eq!(exprs.len(), 2);
        assert!(matches!(parse_exprs("[1,"), Err(Error::Json { .. })));
        assert!(matches!(parse_exprs("null"), Err(Error::MathJson(_))));
    }

    #[test]
    fn library_files() {
        let categories = read_library(r#"{ "core": { "x": 1 }, "domains": {} }"#).unwrap();
        assert_eq!(categories.iter().map(|(category, _)| *category).collect::<Vec<_>>(), vec![Category::Core, Category::Domains]);
        assert!(matches!(read_library(r#"{ "geometry": {} }"#), Err(Error::Category(_))));
    }

    #[test]
    fn entry_spans() {
        let source = r#"{ "core": { "Pi": 3.14, "P": 1 } }"#;
        assert_eq!(&source[span_of(source, "P")], "\"P\"");
        assert_eq!(&source[span_of(source, "Pi")], "\"Pi\"");
        assert_eq!(span_of(source, "Q"), 0..0);
    }

    #[test]
    fn session() {
        let mut session = Session::new();
        session.execute(r#"["Add", 1, 2] ["Add", 1, "_a"]"#).unwrap();
        assert_eq!(session.last.as_ref().map(ToString::to_string), Some("{a: 2}".to_string()));

        session.execute(":tolerance 0.5").unwrap();
        assert_eq!(session.options.numeric_tolerance, 0.5);
        assert!(session.execute(":tolerance -1").is_err());
        assert!(session.execute(r#"["Add", 1]"#).is_err());
    }
}
