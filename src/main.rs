//! Command-line calculator built on the arithmetic grammar.
//!
//! Usage:
//!   calc `<expr>`...            - Evaluate each expression
//!   calc                        - Evaluate each non-empty line of stdin
//!   calc --tree `<expr>`        - Also print the parsed tree
//!   calc --grammar right `<expr>` - Use the right-recursive grammar

use std::io::{self, BufRead};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use log::LevelFilter;

use ruparsec::config::ParseOptions;
use ruparsec::grammars::arithmetic::{Arithmetic, CalcError};
use ruparsec::parser::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GrammarKind {
    /// Left-associative, skips blanks
    Full,
    /// Right-recursive, skips blanks
    Right,
    /// Left-associative, no blanks allowed
    Compact,
}

#[derive(Parser)]
#[command(name = "calc")]
#[command(version, about = "Evaluate integer arithmetic with a backtracking parser")]
struct Args {
    /// Expressions to evaluate. Reads lines from stdin when omitted.
    expressions: Vec<String>,

    /// Grammar variant
    #[arg(short, long, value_enum, default_value_t = GrammarKind::Full)]
    grammar: GrammarKind,

    /// Disable memoization of shared sequence prefixes
    #[arg(long)]
    no_memo: bool,

    /// Fail when rules nest deeper than this
    #[arg(long, value_name = "N")]
    recursion_limit: Option<usize>,

    /// Require each expression to consume its whole input
    #[arg(long)]
    all: bool,

    /// Print the parsed tree next to the result
    #[arg(long)]
    tree: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn options(&self) -> ParseOptions {
        let options = ParseOptions::new().memoize(!self.no_memo);
        match self.recursion_limit {
            Some(limit) => options.recursion_limit(limit),
            None => options,
        }
    }

    fn grammar(&self) -> anyhow::Result<Arithmetic> {
        let grammar = match self.grammar {
            GrammarKind::Full => Arithmetic::new(),
            GrammarKind::Right => Arithmetic::right_recursive(),
            GrammarKind::Compact => Arithmetic::compact(),
        };
        grammar.context("failed to build the arithmetic grammar")
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let grammar = args.grammar()?;
    let options = args.options();

    let inputs = if args.expressions.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .context("failed to read stdin")?
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect()
    } else {
        args.expressions.clone()
    };

    let mut failures = 0;
    for input in &inputs {
        match evaluate(&grammar, input, &options, args.all) {
            Ok((tree, value)) if args.tree => println!("{tree} = {value}"),
            Ok((_, value)) => println!("{value}"),
            Err(err) => {
                failures += 1;
                eprintln!("error: {input:?}: {err}");
                if let CalcError::Parse(err) = &err {
                    if let Some(marker) = marker(input, err) {
                        eprintln!("  {input}\n  {marker}");
                    }
                }
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} expressions failed", inputs.len());
    }
    Ok(())
}

fn evaluate(
    grammar: &Arithmetic,
    input: &str,
    options: &ParseOptions,
    all: bool,
) -> Result<(String, i64), CalcError> {
    let mut cursor = 0;
    let expr = grammar.parse_with(input, &mut cursor, options)?;

    if cursor != input.len() {
        if all {
            return Err(ParseError::TrailingInput { position: cursor }.into());
        }
        log::warn!("ignoring trailing input {:?} at {cursor}", &input[cursor..]);
    }

    let value = expr.evaluate()?;
    Ok((expr.to_string(), value))
}

/// A `^` under the char at which `err` occurred.
fn marker(input: &str, err: &ParseError) -> Option<String> {
    let column = input.get(..err.position()?)?.chars().count();
    Some(format!("{}^", " ".repeat(column)))
}
