use std::str::FromStr;

use log::debug;

use crate::{
    ast::{LeafKind, Node},
    config::CompilerConfig,
    naming::{is_valid_column_name, snake_case},
    parser, to_sql,
};

pub mod postgres;
pub mod sqlite;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),
    #[error("function {function} takes {expected} argument(s), got {found}")]
    ArityError {
        function: String,
        expected: usize,
        found: usize,
    },
    #[error("unresolved reference `{0}`")]
    UnresolvedReference(String),
    #[error("unsupported driver `{0}`")]
    UnknownDriver(String),
}

/// A backend's take on the generic expression tree.
///
/// [Dialect::rewrite] is called once per node, parent before children (see
///  [to_sql::resolve]). A dialect rewrites operators, identifiers and calls in
///  place; returning an error abandons the whole translation.
///
/// A new backend can start by delegating to [postgres::rewrite] and only
///  intercept what it spells differently:
///
/// ```rust
/// # use filter_expr::{ast::Node, translate::{self, Dialect, Error}};
/// struct Shouty;
///
/// impl Dialect for Shouty {
///     fn name(&self) -> &'static str {
///         "shouty"
///     }
///
///     fn rewrite(&self, node: &mut Node) -> Result<(), Error> {
///         if let Node::Call { name, .. } = node {
///             name.make_ascii_uppercase();
///         }
///         translate::postgres::rewrite(node, false)
///     }
/// }
///
/// let mut tree = filter_expr::parser::build("len(Name) == ?").unwrap();
/// assert_eq!(translate::translate(&mut tree, &Shouty).unwrap(), "LEN(name) = ?");
/// ```
pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;

    fn rewrite(&self, node: &mut Node) -> Result<(), Error>;
}

/// Resolves [tree] through [dialect]. The tree is left in its rewritten
///  state, so build a fresh one for each translation.
pub fn translate<D: Dialect + ?Sized>(tree: &mut Node, dialect: &D) -> Result<String, Error> {
    to_sql::resolve(tree, |node| dialect.rewrite(node))
}

/// Operator spellings every SQL backend we support agrees on.
pub fn sql_operator(op: &str) -> Option<&'static str> {
    match op {
        "&&" => Some("AND"),
        "||" => Some("OR"),
        "!" => Some("NOT"),
        "==" => Some("="),
        _ => None,
    }
}

/// Validates a column reference and converts it to the snake_case column name.
pub fn column_name(name: &str) -> Result<String, Error> {
    if !is_valid_column_name(name) {
        return Err(Error::InvalidIdentifier(name.to_string()));
    }
    Ok(snake_case(name))
}

/// Rewrites a leaf. Field references become column names; unclassified text
///  is rejected when [strict], otherwise left alone.
pub fn rewrite_leaf(value: &mut String, kind: LeafKind, strict: bool) -> Result<(), Error> {
    match kind {
        LeafKind::Field => *value = column_name(value)?,
        LeafKind::Unset if strict => return Err(Error::UnresolvedReference(value.clone())),
        LeafKind::Param | LeafKind::Const | LeafKind::Unset => {}
    }
    Ok(())
}

/// The calendar accessors: `year(x)`, `month(x)`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl CalendarUnit {
    pub const ALL: [CalendarUnit; 6] = [
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
    ];

    /// Case insensitive.
    pub fn from_function(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        }
    }

    /// Replaces `unit(x)` with `function(<first_arg>, x)`, in place.
    pub fn rewrite_call(
        &self,
        name: &mut String,
        args: &mut Vec<Node>,
        function: &str,
        first_arg: String,
    ) -> Result<(), Error> {
        if args.len() != 1 {
            return Err(Error::ArityError {
                function: name.clone(),
                expected: 1,
                found: args.len(),
            });
        }
        *name = function.to_string();
        args.insert(0, Node::constant(first_arg));
        Ok(())
    }
}

/// The backends a [Compiler] can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Postgres,
    Sqlite,
}

impl FromStr for Driver {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Driver::Postgres),
            "sqlite" | "sqlite3" => Ok(Driver::Sqlite),
            _ => Err(Error::UnknownDriver(s.to_string())),
        }
    }
}

impl Driver {
    pub fn dialect(&self, strict: bool) -> Box<dyn Dialect> {
        match self {
            Driver::Postgres => Box::new(postgres::Postgres { strict }),
            Driver::Sqlite => Box::new(sqlite::Sqlite { strict }),
        }
    }
}

/// Looks up the dialect for a driver name (non-strict).
pub fn dialect_for(driver: &str) -> Result<Box<dyn Dialect>, Error> {
    Ok(driver.parse::<Driver>()?.dialect(false))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileErrorKind {
    #[error(transparent)]
    Build(#[from] parser::Error),
    #[error(transparent)]
    Resolve(#[from] Error),
}

/// A failed compilation, carrying the expression it was given.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("error compiling expression `{expr}`: {kind}")]
pub struct CompileError {
    pub expr: String,
    #[source]
    pub kind: CompileErrorKind,
}

/// Filter expression in, SQL fragment out.
///
/// Build one per configuration and pass it around; it holds no per-call state
///  and can be shared between threads.
pub struct Compiler {
    dialect: Box<dyn Dialect>,
}

impl Compiler {
    pub fn new(dialect: Box<dyn Dialect>) -> Self {
        Self { dialect }
    }

    pub fn for_driver(driver: &str) -> Result<Self, Error> {
        Ok(Self::new(dialect_for(driver)?))
    }

    pub fn from_config(config: &CompilerConfig) -> Result<Self, Error> {
        let driver: Driver = config.driver.parse()?;
        Ok(Self::new(driver.dialect(config.strict)))
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn compile(&self, expr: &str) -> Result<String, CompileError> {
        let wrap = |kind: CompileErrorKind| CompileError {
            expr: expr.to_string(),
            kind,
        };
        let mut tree = parser::build(expr).map_err(|e| wrap(e.into()))?;
        let sql = translate(&mut tree, self.dialect.as_ref()).map_err(|e| wrap(e.into()))?;
        debug!("[{}] `{expr}` => `{sql}`", self.dialect.name());
        Ok(sql)
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("dialect", &self.dialect.name())
            .finish()
    }
}
