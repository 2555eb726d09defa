//! `ParseError`, hand-rolled in the style of `ouros::repl_error::ReplError`
//! rather than via `thiserror`.

use std::fmt;

use crate::token::TokenKind;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnexpectedToken { expected: TokenKind, found: TokenKind, file: String, line: u32 },
    UnexpectedEof { expected: TokenKind, file: String, line: u32 },
    InvalidFactor { found: TokenKind, file: String, line: u32 },
    UnknownDirective { name: String, file: String, line: u32 },
    /// `do`-`while` is recognized but explicitly not implemented, matching
    /// `ast_generator.cpp`'s `throw ASTException("unhandled statement do while")`.
    UnhandledStatement { statement: &'static str, file: String, line: u32 },
    DanglingThread { file: String, line: u32 },
    UnterminatedFunctionPointerCall { file: String, line: u32 },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { expected, found, file, line } => {
                write!(f, "{file}:{line}: expected {expected}, found {found}")
            }
            Self::UnexpectedEof { expected, file, line } => {
                write!(f, "{file}:{line}: expected {expected}, found end of file")
            }
            Self::InvalidFactor { found, file, line } => {
                write!(f, "{file}:{line}: unexpected token {found} in expression")
            }
            Self::UnknownDirective { name, file, line } => {
                write!(f, "{file}:{line}: unknown directive {name}")
            }
            Self::UnhandledStatement { statement, file, line } => {
                write!(f, "{file}:{line}: unhandled statement {statement}")
            }
            Self::DanglingThread { file, line } => {
                write!(f, "{file}:{line}: thread keyword not followed by a call")
            }
            Self::UnterminatedFunctionPointerCall { file, line } => {
                write!(f, "{file}:{line}: expected ]] to close function pointer expression")
            }
        }
    }
}

impl std::error::Error for ParseError {}
