use std::{
    io::{stdin, stdout, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser as _;
use errors::LoxErrors;
use itertools::Itertools;
use parser::Parser;
use scanner::Token;

/// Exit status for malformed input, following the Lox convention (sysexits' EX_DATAERR).
const EXIT_DATA_ERROR: u8 = 65;

/// Parse Lox expressions and print their syntax tree.
#[derive(clap::Parser)]
struct Args {
    /// Source file to parse. Starts a prompt if omitted.
    file: Option<PathBuf>,

    /// Print the scanned tokens before the tree.
    #[arg(long)]
    tokens: bool,
}

fn format_token(token: &Token) -> String {
    match token.literal() {
        Some(literal) => format!("{:?} {} {}", token.ty(), token.lexeme(), literal),
        None => format!("{:?} {}", token.ty(), token.lexeme()),
    }
}

/// Scans and parses `source`. The parser only runs if scanning succeeded.
fn run(source: &str, print_tokens: bool) -> Result<String, LoxErrors> {
    let mut errors = LoxErrors::default();
    let tokens = scanner::tokenize(source, &mut errors);

    if print_tokens {
        println!("{}", tokens.iter().map(format_token).join("\n"));
    }

    if !errors.is_empty() {
        log::debug!("Skipping parser after {} scan error(s)", errors.len());
        return Err(errors);
    }

    Parser::new(&tokens).parse().map(|expr| expr.to_string())
}

fn run_file(path: PathBuf, print_tokens: bool) -> anyhow::Result<ExitCode> {
    let source = std::fs::read_to_string(&path)?;
    log::info!("Parsing {}", path.display());

    match run(&source, print_tokens) {
        Ok(tree) => {
            println!("{tree}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{e}");
            Ok(ExitCode::from(EXIT_DATA_ERROR))
        }
    }
}

fn run_prompt(print_tokens: bool) -> anyhow::Result<ExitCode> {
    loop {
        print!("> ");
        stdout().flush()?;
        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            return Ok(ExitCode::SUCCESS);
        }
        match run(&line, print_tokens) {
            Ok(tree) => println!("{tree}"),
            Err(e) => eprintln!("{e}"),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    match args.file {
        Some(file) => run_file(file, args.tokens),
        None => run_prompt(args.tokens),
    }
}
