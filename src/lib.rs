//! tinyawk - a small tree-walking AWK interpreter
//!
//! Script text goes through the [`Lexer`], the [`Parser`] builds a
//! [`Program`](ast::Program), and the [`Interpreter`] runs it against input
//! text, writing printed output to any [`std::io::Write`] sink.
//!
//! The language is a subset of AWK: `BEGIN`/`END`/pattern-action blocks,
//! `print`, assignment (`=`, `+=`, `-=`, `*=`, `/=`, `%=`), `if`/`else`,
//! C-style `for` with `break`, `++`/`--`, field references (`$1`, `$NF`)
//! and the builtin variables FS, OFS, RS, ORS, NF and NR.
//!
//! # Example
//!
//! ```
//! use tinyawk::Interpreter;
//!
//! let mut interpreter = Interpreter::from_script(r#"BEGIN { print "Hello, World!" }"#).unwrap();
//! let mut output = Vec::new();
//! interpreter.run("", &mut output).unwrap();
//!
//! assert_eq!(String::from_utf8(output).unwrap(), "Hello, World!\n");
//! ```
//!
//! # Field Processing Example
//!
//! ```
//! use tinyawk::{Interpreter, Lexer, Parser};
//!
//! let source = r#"BEGIN { FS = "," } { total = 0; for (i = 1; i <= NF; ++i) total += $i; print total }"#;
//! let tokens = Lexer::new(source).tokenize().unwrap();
//! let program = Parser::new(tokens).parse().unwrap();
//!
//! let mut interpreter = Interpreter::new(program);
//! let mut output = Vec::new();
//! interpreter.run("1,2,3\n4,5,6\n", &mut output).unwrap();
//!
//! assert_eq!(String::from_utf8(output).unwrap(), "6\n15\n");
//! ```
//!
//! # Errors
//!
//! ```
//! use tinyawk::{Error, Interpreter};
//!
//! let err = Interpreter::from_script("{ print $1 @ }").err().unwrap();
//! assert!(matches!(err, Error::Lexical { character: '@', .. }));
//! ```

pub mod ast;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod value;

pub use error::{Error, Result, SourceLocation};
pub use interpreter::Interpreter;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use value::Value;
