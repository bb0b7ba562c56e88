//! Compiles SQL-like filter expressions such as
//!  `(year(CreatedOn) == ?) && (month(CreatedOn) == ?)` into the SQL dialect
//!  of a particular backend:
//!
//! ```rust
//! let compiler = filter_expr::Compiler::for_driver("postgres").unwrap();
//! assert_eq!(
//!     compiler.compile("(year(CreatedOn) == ?) && (month(CreatedOn) == ?)").unwrap(),
//!     "(date_part('year', created_on) = ?) AND (date_part('month', created_on) = ?)"
//! );
//! ```
//!
//! Placeholders stay `?`; binding them is up to whoever executes the SQL.

pub mod ast;
pub mod config;
pub mod lex;
pub mod naming;
pub mod parser;
pub mod to_sql;
pub mod translate;

pub use config::CompilerConfig;
pub use translate::{CompileError, Compiler};

#[cfg(test)]
mod tests;
