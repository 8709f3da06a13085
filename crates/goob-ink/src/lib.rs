//! Lexer, parser, and vectorised interpreter for **Ink** (`.ink`) sprite
//! behaviour scripts.
//!
//! An Ink file declares one behaviour: an indentation-structured block of
//! assignments and `if`/`elif`/`else` statements. The interpreter runs it
//! over every sprite of a batch at once, with conditionals turned into lane
//! masks.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Behavior`, `Stmt`, `Expr`, operators |
//! | [`error`] | `InkError` |
//! | [`lexer`] | `Lexer`, `Token` (with `Indent`/`Dedent`) |
//! | [`parser`] | `parse_str` entry point |
//! | [`interpreter`] | `Interpreter`, `Bindings`, `Value` |
//!
//! # Quick start
//!
//! ```rust
//! use goob_ink::{parse_str, Bindings, Interpreter};
//!
//! let src = "
//! @behavior drift:
//!     pos.x += speed * dt
//!     if pos.x > 10:
//!         pos.x = 0
//! ";
//!
//! let behavior = parse_str(src).unwrap();
//! let mut xs = vec![1.0, 9.5];
//! let mut speeds = vec![1.0, 2.0];
//!
//! let mut b = Bindings::new(2);
//! b.bind_field("pos.x", &mut xs).unwrap();
//! b.bind_field("speed", &mut speeds).unwrap();
//! b.bind_constant("dt", 0.5);
//! Interpreter::new().execute(&behavior, &mut b).unwrap();
//!
//! assert_eq!(xs, vec![1.5, 0.0]);
//! ```

pub mod ast;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;

pub use ast::Behavior;
pub use error::InkError;
pub use interpreter::{Bindings, Interpreter, Value};
pub use parser::parse_str;
