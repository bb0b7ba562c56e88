use std::fmt::{Display, Formatter};

pub use crate::lex::LeafKind;

/// The textual operator reported for a [Node::Grouping].
pub const GROUPING: &str = "()";

/// A node of the filter expression tree.
///
/// Every node exclusively owns its children, in left-to-right source order.
///  A resolver pass may rewrite a node's content in place (see
///  [crate::to_sql::resolve]) but nothing is ever shared between trees.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// Something irreducible: a placeholder, a literal, or an identifier. Also
    ///  used for content the parser passed through without understanding.
    Leaf { value: String, kind: LeafKind },
    /// One layer of explicit parentheses.
    Grouping(Box<Node>),
    /// `name(arg, ...)`, possibly with no arguments at all.
    Call { name: String, args: Vec<Node> },
    /// An infix operator. Usually two operands; one when the source had
    ///  nothing on one side of the operator (e.g. a leading `-`).
    Binary { op: String, operands: Vec<Node> },
}

/// The flat node classification used by resolvers that don't care about the
///  shape of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Param,
    Const,
    Field,
    Func,
    Unset,
}

impl Node {
    pub fn leaf(value: impl Into<String>, kind: LeafKind) -> Self {
        Node::Leaf {
            value: value.into(),
            kind,
        }
    }

    pub fn constant(value: impl Into<String>) -> Self {
        Self::leaf(value, LeafKind::Const)
    }

    pub fn field(value: impl Into<String>) -> Self {
        Self::leaf(value, LeafKind::Field)
    }

    pub fn grouping(inner: Node) -> Self {
        Node::Grouping(Box::new(inner))
    }

    pub fn call(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::Call {
            name: name.into(),
            args,
        }
    }

    pub fn binary(op: impl Into<String>, operands: Vec<Node>) -> Self {
        Node::Binary {
            op: op.into(),
            operands,
        }
    }

    /// Leaf text, or the callee name for calls. Empty for everything else.
    pub fn value(&self) -> &str {
        match self {
            Node::Leaf { value, .. } => value,
            Node::Call { name, .. } => name,
            Node::Grouping(_) | Node::Binary { .. } => "",
        }
    }

    /// The infix operator, [GROUPING] for groupings, empty otherwise.
    pub fn operator(&self) -> &str {
        match self {
            Node::Binary { op, .. } => op,
            Node::Grouping(_) => GROUPING,
            Node::Leaf { .. } | Node::Call { .. } => "",
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Leaf { .. } => &[],
            Node::Grouping(inner) => std::slice::from_ref(inner.as_ref()),
            Node::Call { args, .. } => args,
            Node::Binary { operands, .. } => operands,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Leaf { kind, .. } => match kind {
                LeafKind::Param => NodeKind::Param,
                LeafKind::Const => NodeKind::Const,
                LeafKind::Field => NodeKind::Field,
                LeafKind::Unset => NodeKind::Unset,
            },
            Node::Call { .. } => NodeKind::Func,
            Node::Grouping(_) | Node::Binary { .. } => NodeKind::Unset,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    fn write(&self, f: &mut Formatter, parenthesize: bool) -> std::fmt::Result {
        match self {
            Node::Leaf { value, .. } => write!(f, "{value}"),
            Node::Grouping(inner) if parenthesize => {
                write!(f, "(")?;
                inner.write(f, parenthesize)?;
                write!(f, ")")
            }
            Node::Grouping(inner) => inner.write(f, parenthesize),
            Node::Call { name, args } => {
                write!(f, "{name}(")?;
                write_separated(f, args, ", ", parenthesize)?;
                write!(f, ")")
            }
            Node::Binary { op, operands } => {
                write_separated(f, operands, &format!(" {op} "), parenthesize)
            }
        }
    }
}

fn write_separated(
    f: &mut Formatter,
    nodes: &[Node],
    sep: &str,
    parenthesize: bool,
) -> std::fmt::Result {
    let mut first = true;
    for node in nodes {
        if first {
            first = false;
        } else {
            write!(f, "{sep}")?;
        }
        node.write(f, parenthesize)?;
    }
    Ok(())
}

/// Full reconstruction: every grouping keeps its parentheses. Identical to
///  resolving with a rewrite that changes nothing.
impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.write(f, true)
    }
}

/// Reconstruction without any parentheses except those of call syntax. Handy
///  for comparing the canonical form of two trees.
pub struct SimpleForm<'a>(pub &'a Node);

impl Display for SimpleForm<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.write(f, false)
    }
}
