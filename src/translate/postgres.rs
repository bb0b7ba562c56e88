use super::{CalendarUnit, Dialect, Error, rewrite_leaf, sql_operator};
use crate::ast::Node;

/// The reference dialect.
///
/// `&&`/`||`/`==` become `AND`/`OR`/`=`, columns become snake_case, and the
///  calendar accessors (`year(x)` etc.) become `date_part('year', x)`. Calls
///  it doesn't know are left as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres {
    /// Reject anything the parser couldn't classify instead of passing it
    ///  through verbatim.
    pub strict: bool,
}

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn rewrite(&self, node: &mut Node) -> Result<(), Error> {
        rewrite(node, self.strict)
    }
}

/// Postgres rewriting of a single node, for dialects that want to delegate.
pub fn rewrite(node: &mut Node, strict: bool) -> Result<(), Error> {
    match node {
        Node::Binary { op, .. } => {
            if let Some(sql) = sql_operator(op) {
                *op = sql.to_string();
            }
            Ok(())
        }
        Node::Leaf { value, kind } => rewrite_leaf(value, *kind, strict),
        Node::Call { name, args } => rewrite_fn_call(name, args),
        Node::Grouping(_) => Ok(()),
    }
}

// year(x) => date_part('year', x)
pub fn rewrite_fn_call(name: &mut String, args: &mut Vec<Node>) -> Result<(), Error> {
    match CalendarUnit::from_function(name) {
        Some(unit) => unit.rewrite_call(name, args, "date_part", format!("'{}'", unit.as_str())),
        None => Ok(()),
    }
}
