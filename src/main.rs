use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::exit;

use argh::FromArgs;
use micro::lexer::{Lexer, Token, TokenKind};
use micro::Error;
use ron::ser::PrettyConfig;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Micro compiler
#[derive(FromArgs)]
struct Opts {
    /// source file (reads stdin when omitted)
    #[argh(positional)]
    source: Option<PathBuf>,
    /// dump the token stream instead of compiling
    #[argh(switch)]
    tokens: bool,
}

fn print_ron<T: Serialize>(value: &T) -> Result<(), Error> {
    println!(
        "{}",
        ron::ser::to_string_pretty(
            value,
            PrettyConfig::default()
                .struct_names(true)
                .indentor("  ")
                .compact_arrays(true)
        )?
    );

    Ok(())
}

fn lex_all(source: &[char]) -> Result<Vec<Token>, Error> {
    let mut lexer = Lexer::new(source);
    let mut tokens = vec![];

    loop {
        let token = lexer.next_token()?;
        let eof = token.kind == TokenKind::Eof;
        tokens.push(token);

        if eof {
            return Ok(tokens);
        }
    }
}

fn cmd(opts: Opts) -> Result<(), Error> {
    let (source, name) = match &opts.source {
        Some(path) => (fs::read_to_string(path)?, path.display().to_string()),
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            (source, "stdin".to_string())
        }
    };

    let chars = source.chars().collect::<Vec<_>>();

    if opts.tokens {
        return print_ron(&lex_all(&chars)?);
    }

    micro::compile_translation_unit(&chars, &name, io::stdout().lock())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = argh::from_env();

    if let Err(e) = cmd(opts) {
        eprintln!("{e} at {}", e.span());
        exit(1);
    }
}
