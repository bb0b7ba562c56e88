use log::trace;

use crate::ast::{LeafKind, Node};
use crate::lex::{classify, is_identifier};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("malformed expression `{fragment}`: {reason}")]
    MalformedExpression {
        fragment: String,
        reason: &'static str,
    },
    #[error("invalid argument list `{fragment}`: {reason}")]
    InvalidArgumentList {
        fragment: String,
        reason: &'static str,
    },
}

fn malformed(fragment: &str, reason: &'static str) -> Error {
    Error::MalformedExpression {
        fragment: fragment.to_string(),
        reason,
    }
}

fn invalid_args(fragment: &str, reason: &'static str) -> Error {
    Error::InvalidArgumentList {
        fragment: fragment.to_string(),
        reason,
    }
}

/// Lower precedence binds more loosely, which makes it the better place to
///  split an expression in two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Or = 1,
    And = 2,
    Comparison = 3,
    Additive = 4,
    Multiplicative = 5,
}

// NOTE order matters: longer spellings must come before their prefixes
//  (`<=` before `<`, `==` before `=`).
const SYMBOLS: &[(&str, Precedence)] = &[
    ("||", Precedence::Or),
    ("&&", Precedence::And),
    ("==", Precedence::Comparison),
    ("<=", Precedence::Comparison),
    (">=", Precedence::Comparison),
    ("!=", Precedence::Comparison),
    ("<>", Precedence::Comparison),
    ("=", Precedence::Comparison),
    ("<", Precedence::Comparison),
    (">", Precedence::Comparison),
    ("+", Precedence::Additive),
    ("-", Precedence::Additive),
    ("*", Precedence::Multiplicative),
    ("/", Precedence::Multiplicative),
    ("%", Precedence::Multiplicative),
    ("^", Precedence::Multiplicative),
];

// Matched case insensitively, and only as whole words.
const WORDS: &[(&str, Precedence)] = &[
    ("or", Precedence::Or),
    ("and", Precedence::And),
    ("like", Precedence::Comparison),
];

/// Where the precedence scanner decided to split an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// The operator as written in the source
    pub op: &'a str,
    /// Byte offset of the operator
    pub at: usize,
    pub precedence: Precedence,
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn operator_at(bytes: &[u8], i: usize) -> Option<(usize, Precedence)> {
    let rest = &bytes[i..];
    if let Some((sym, precedence)) = SYMBOLS
        .iter()
        .find(|(sym, _)| rest.starts_with(sym.as_bytes()))
    {
        return Some((sym.len(), *precedence));
    }

    let boundary_before = i == 0 || !is_word_byte(bytes[i - 1]);
    if !boundary_before {
        return None;
    }
    WORDS.iter().find_map(|(word, precedence)| {
        let len = word.len();
        let matches = rest.len() >= len
            && rest[..len].eq_ignore_ascii_case(word.as_bytes())
            && !rest.get(len).is_some_and(|b| is_word_byte(*b));
        matches.then_some((len, *precedence))
    })
}

/// Finds the operator with the lowest precedence outside of any parentheses
///  or single quoted regions.
///
/// Only a strictly lower precedence replaces the current pick, so among equal
///  operators the leftmost one wins. Splitting there means `a or b or c`
///  becomes `a` and `b or c`: chains of equal precedence lean right.
///
/// The quote handling is a plain toggle. A doubled quote inside a literal
///  (`'it''s'`) toggles twice, which happens to work out for balanced input.
pub fn find_split_operator(expr: &str) -> Option<Split<'_>> {
    let bytes = expr.as_bytes();
    let mut depth = 0i32;
    let mut in_quotes = false;
    let mut best: Option<Split> = None;

    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ if depth == 0 => {
                if let Some((len, precedence)) = operator_at(bytes, i) {
                    if best.is_none_or(|b| precedence < b.precedence) {
                        best = Some(Split {
                            op: &expr[i..i + len],
                            at: i,
                            precedence,
                        });
                    }
                    i += len;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    best
}

/// Checks that parentheses pair up and every quoted region is closed.
fn check_balanced(expr: &str) -> Result<(), &'static str> {
    let mut depth = 0i32;
    let mut in_quotes = false;
    for b in expr.bytes() {
        match b {
            b'\'' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth < 0 {
                    return Err("unexpected closing parenthesis");
                }
            }
            _ => {}
        }
    }
    if in_quotes {
        Err("unterminated string literal")
    } else if depth != 0 {
        Err("missing closing parenthesis")
    } else {
        Ok(())
    }
}

fn first_open_paren(expr: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (i, b) in expr.bytes().enumerate() {
        match b {
            b'\'' => in_quotes = !in_quotes,
            b'(' if !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

/// Index of the `)` closing the `(` at [open].
fn matching_close(expr: &str, open: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_quotes = false;
    for (i, b) in expr.bytes().enumerate().skip(open) {
        match b {
            b'\'' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// True if the whole of [expr] is a single parenthesized group, so `(a)` but
///  not `(a) + (b)`.
fn is_wrapped_in_parens(expr: &str) -> bool {
    expr.starts_with('(') && matching_close(expr, 0) == Some(expr.len() - 1)
}

/// Splits the text between a call's parentheses on its top level commas.
///
/// Each argument comes back trimmed. An empty (or all whitespace) list is
///  zero arguments; an empty argument between commas is an error.
pub fn split_args(list: &str) -> Result<Vec<&str>, Error> {
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut args = Vec::new();
    let mut depth = 0i32;
    let mut in_quotes = false;
    let mut start = 0;
    for (i, b) in list.bytes().enumerate() {
        match b {
            b'\'' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(invalid_args(list, "unbalanced parentheses"));
                }
            }
            b',' if depth == 0 => {
                args.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(invalid_args(list, "unbalanced parentheses"));
    }
    if in_quotes {
        return Err(invalid_args(list, "unterminated string literal"));
    }
    args.push(list[start..].trim());

    if args.iter().any(|arg| arg.is_empty()) {
        return Err(invalid_args(list, "empty argument"));
    }
    Ok(args)
}

/// Deepest a tree may get. Every parenthesis, call and operator in a chain of
///  equal precedence adds a level, and each level is a stack frame here and
///  again when the tree is resolved.
pub const MAX_DEPTH: usize = 256;

/// Builds the expression tree for [expr].
pub fn build(expr: &str) -> Result<Node, Error> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(malformed(expr, "empty expression"));
    }
    check_balanced(expr).map_err(|reason| malformed(expr, reason))?;
    build_node(expr, 0)
}

fn build_node(expr: &str, depth: usize) -> Result<Node, Error> {
    let expr = expr.trim();
    if depth >= MAX_DEPTH {
        return Err(malformed(expr, "expression nested too deeply"));
    }

    // Already irreducible
    if let Some(kind) = classify(expr) {
        return Ok(Node::leaf(expr, kind));
    }

    // `( ... )`: peel one layer and remember it was there
    if is_wrapped_in_parens(expr) {
        let inner = &expr[1..expr.len() - 1];
        if inner.trim().is_empty() {
            return Err(malformed(expr, "empty parentheses"));
        }
        return Ok(Node::grouping(build_node(inner, depth + 1)?));
    }

    if let Some(split) = find_split_operator(expr) {
        trace!("splitting `{expr}` at `{}` (offset {})", split.op, split.at);
        let left = expr[..split.at].trim();
        let right = expr[split.at + split.op.len()..].trim();

        let mut operands = Vec::with_capacity(2);
        if !left.is_empty() {
            operands.push(build_node(left, depth + 1)?);
        }
        if !right.is_empty() {
            operands.push(build_node(right, depth + 1)?);
        }
        if operands.is_empty() {
            return Err(malformed(expr, "operator without operands"));
        }
        return Ok(Node::binary(split.op, operands));
    }

    // `name(args...)`
    if let Some(open) = first_open_paren(expr)
        && is_identifier(&expr[..open])
    {
        let close =
            matching_close(expr, open).ok_or_else(|| malformed(expr, "unbalanced parentheses"))?;
        if close != expr.len() - 1 {
            return Err(malformed(expr, "unexpected text after function call"));
        }
        let args = split_args(&expr[open + 1..close])?
            .into_iter()
            .map(|arg| build_node(arg, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Node::call(&expr[..open], args));
    }

    // Nothing we recognize. Pass it through and let the resolver decide.
    trace!("passing through unrecognized `{expr}`");
    Ok(Node::leaf(expr, LeafKind::Unset))
}
