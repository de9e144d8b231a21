use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use clap::Parser as ClapParser;

use lr1check::{build_tables, recognize, GrammarStore, Terminal, TerminalRegistry};

/// A terminal kind discovered at runtime from the grammar file: its name is
/// leaked to `'static` once at start-up so it can be a plain `Copy` value,
/// the same way the engine's compile-time `Terminal` enums are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct CliTerminal(&'static str);

impl fmt::Display for CliTerminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const END_MARKER: &str = "$end";

impl Terminal for CliTerminal {
    fn end() -> Self {
        CliTerminal(END_MARKER)
    }
}

/// Check whether a token stream is a sentence of a grammar, via canonical
/// LR(1) table construction and a shift/reduce recognizer.
#[derive(ClapParser, Debug)]
#[command(name = "parser", version, about)]
struct Cli {
    /// Path to the grammar source file.
    grammar_file: String,

    /// Parse this file instead of standard input.
    parse_file: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let grammar_text = match fs::read_to_string(&cli.grammar_file) {
        Ok(text) => text,
        Err(error) => {
            eprintln!("error: could not read {}: {}.", cli.grammar_file, error);
            return ExitCode::FAILURE;
        }
    };

    let store = match GrammarStore::load(&grammar_text) {
        Ok(store) => store,
        Err(error) => {
            eprintln!("error: {}.", error);
            return ExitCode::FAILURE;
        }
    };

    let terminal_names = store.referenced_terminal_names();
    let leaked: Vec<(CliTerminal, &'static str)> = terminal_names
        .iter()
        .map(|name| {
            let leaked: &'static str = &*Box::leak(name.clone().into_boxed_str());
            (CliTerminal(leaked), leaked)
        })
        .collect();
    let registry = TerminalRegistry::new(&leaked);

    let grammar = match store.resolve(&registry) {
        Ok(grammar) => grammar,
        Err(error) => {
            eprintln!("error: {}.", error);
            return ExitCode::FAILURE;
        }
    };

    let tables = build_tables(&grammar);
    if !tables.conflicts.is_empty() {
        for conflict in &tables.conflicts {
            eprintln!("warning: {:?}", conflict);
        }
    }

    let input_text = match &cli.parse_file {
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) => {
                eprintln!("error: could not read {}: {}.", path, error);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut text = String::new();
            if let Err(error) = io::stdin().read_to_string(&mut text) {
                eprintln!("error: could not read standard input: {}.", error);
                return ExitCode::FAILURE;
            }
            text
        }
    };

    let literals: Vec<(CliTerminal, &str)> = leaked.iter().map(|(t, name)| (*t, *name)).collect();
    let lexer = lexan::LexicalAnalyzer::new(&literals, &[], &[r"[ \t\r\n]+"], CliTerminal::end());
    let mut source = lr1check::lexicon::LexanSource::new(&lexer, input_text, cli.grammar_file.clone());

    let accepted = recognize(&tables, &mut source);
    if accepted {
        println!("Grammar correct");
        ExitCode::SUCCESS
    } else {
        println!("Grammar incorrect");
        ExitCode::FAILURE
    }
}
