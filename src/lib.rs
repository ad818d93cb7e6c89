use std::io;

pub mod ast;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod symtab;
pub mod types;

pub use error::Error;
pub use lexer::Lexer;
pub use parser::Parser;
pub use symtab::SymbolTable;
pub use types::Type;

/// Compiles one translation unit, writing the IR trace to `out`. Runs to
/// completion or to the first fatal error; nothing is recovered internally.
pub fn compile_translation_unit<W: io::Write>(
    source: &[char],
    name: &str,
    out: W,
) -> Result<(), Error> {
    Parser::new(Lexer::new(source), out)?.parse(name)
}
