//! Parser, AST, and cooperative bytecode VM for a C-like, object/event-oriented
//! scripting dialect.
//!
//! The pipeline is: [`token`] stream (produced upstream by a lexer outside this
//! crate's scope) → [`parser`] → [`ast`] → bytecode (assembled with
//! [`bytecode::CodeBuilder`], normally by an external compiler) → [`vm::VM`].
//!
//! ```
//! use gsc::bytecode::{CodeBuilder, Opcode};
//! use gsc::value::Variant;
//! use gsc::vm::VM;
//!
//! let mut builder = CodeBuilder::new("test.gsc", "main");
//! builder.emit_push_integer(40);
//! builder.emit_push_integer(2);
//! builder.emit_binop(gsc::bytecode::BinaryOp::Add);
//! builder.emit_ret(true);
//! let function = builder.build();
//!
//! let mut table = gsc::bytecode::FunctionTable::new();
//! table.insert("test.gsc", "main", function);
//!
//! let mut vm = VM::new(table);
//! let thread = vm.spawn_thread("test.gsc", "main", vec![]).unwrap();
//! let result = vm.run_to_completion(thread).unwrap();
//! assert_eq!(result, Some(Variant::Integer(42)));
//! ```

pub mod ast;
pub mod bytecode;
pub mod error;
pub mod object;
pub mod parser;
pub mod token;
pub mod value;
pub mod vm;

pub use ast::{Expression, Program, Statement};
pub use error::RuntimeError;
pub use object::Object;
pub use parser::{ParseError, Parser};
pub use token::{Token, TokenKind};
pub use value::Variant;
pub use vm::VM;
