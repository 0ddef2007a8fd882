// ABOUTME: CLI entry point: script runner and interactive REPL

use clap::Parser;
use log::error;
use lux_lang::config::{
    HELP_TEXT, HISTORY_FILE, VERSION, WELCOME_FOOTER, WELCOME_MESSAGE, WELCOME_SUBTITLE,
};
use lux_lang::lexer::Lexer;
use lux_lang::token::TokenKind;
use lux_lang::ModuleLoader;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Tree-walking interpreter for the Lux scripting language
#[derive(Parser, Debug)]
#[command(name = "lux")]
#[command(version = VERSION)]
#[command(about = "Tree-walking interpreter for the Lux scripting language")]
struct CliArgs {
    /// Script file to execute (optional - if not provided, starts REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let level = if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    simple_logger::init_with_level(level)?;

    match args.script {
        Some(path) => run_script(&path),
        None => repl(),
    }
}

fn run_script(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let loader = ModuleLoader::new();
    let outcome = loader.run_file(path);

    for line in &outcome.output {
        println!("{}", line);
    }
    if let Some(err) = outcome.error {
        error!("script failed after {} steps", outcome.steps);
        eprintln!("{}", err);
        std::process::exit(1);
    }
    Ok(())
}

fn repl() -> Result<(), Box<dyn std::error::Error>> {
    let mut rl = DefaultEditor::new()?;
    let _ = rl.load_history(HISTORY_FILE);

    println!("{} v{}", WELCOME_MESSAGE, VERSION);
    println!("{}", WELCOME_SUBTITLE);
    println!("{}", WELCOME_FOOTER);

    let loader = ModuleLoader::new();
    let mut printed = 0;

    loop {
        let mut snippet = String::new();
        let mut depth: i32 = 0;
        let mut prompt = "lux> ";

        // Keep reading while the entered text opens more blocks than it
        // closes.
        loop {
            match rl.readline(prompt) {
                Ok(line) => {
                    depth += block_delta(&line);
                    snippet.push_str(&line);
                    snippet.push('\n');
                    if depth <= 0 {
                        break;
                    }
                    prompt = "...> ";
                }
                Err(ReadlineError::Interrupted) => {
                    snippet.clear();
                    break;
                }
                Err(ReadlineError::Eof) => {
                    let _ = rl.save_history(HISTORY_FILE);
                    println!("Goodbye!");
                    return Ok(());
                }
                Err(err) => {
                    let _ = rl.save_history(HISTORY_FILE);
                    return Err(err.into());
                }
            }
        }

        let trimmed = snippet.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(trimmed);

        match trimmed {
            ".exit" => {
                let _ = rl.save_history(HISTORY_FILE);
                println!("Goodbye!");
                return Ok(());
            }
            ".help" => {
                println!("{}", HELP_TEXT);
                continue;
            }
            _ => {}
        }

        let outcome = loader.run_source(&snippet, "<repl>");
        for line in &outcome.output[printed..] {
            println!("{}", line);
        }
        printed = outcome.output.len();
        if let Some(err) = outcome.error {
            eprintln!("{}", err);
        }
    }
}

/// Net number of blocks a line opens: `if`/`while`/`for`/`func`/`try` open,
/// `end` closes. An `if` directly after `else` shares its `end`. Lines that
/// fail to lex contribute nothing and are left to the parser to reject.
fn block_delta(line: &str) -> i32 {
    let Ok(tokens) = Lexer::new(line, "<repl>").tokenize() else {
        return 0;
    };

    let mut delta = 0;
    let mut previous: Option<TokenKind> = None;
    for token in &tokens {
        match token.kind {
            TokenKind::While | TokenKind::For | TokenKind::Func | TokenKind::Try => delta += 1,
            TokenKind::If if previous != Some(TokenKind::Else) => delta += 1,
            TokenKind::End => delta -= 1,
            _ => {}
        }
        previous = Some(token.kind);
    }
    delta
}
