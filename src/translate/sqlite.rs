use super::{CalendarUnit, Dialect, Error, postgres};
use crate::ast::Node;

/// SQLite has no `date_part`; calendar accessors go through `strftime`.
///  Everything else is spelled the same as in Postgres.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite {
    pub strict: bool,
}

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn rewrite(&self, node: &mut Node) -> Result<(), Error> {
        if let Node::Call { name, args } = node {
            return rewrite_fn_call(name, args);
        }
        postgres::rewrite(node, self.strict)
    }
}

fn strftime_format(unit: CalendarUnit) -> &'static str {
    match unit {
        CalendarUnit::Year => "%Y",
        CalendarUnit::Month => "%m",
        CalendarUnit::Day => "%d",
        CalendarUnit::Hour => "%H",
        CalendarUnit::Minute => "%M",
        CalendarUnit::Second => "%S",
    }
}

// year(x) => strftime('%Y', x)
pub fn rewrite_fn_call(name: &mut String, args: &mut Vec<Node>) -> Result<(), Error> {
    match CalendarUnit::from_function(name) {
        Some(unit) => unit.rewrite_call(
            name,
            args,
            "strftime",
            format!("'{}'", strftime_format(unit)),
        ),
        None => Ok(()),
    }
}
