use crate::ast::Node;

/// Walks [node] pre-order, handing every node to [rewrite] before its
///  children, then prints the rewritten tree.
///
/// The rewrite gets the node mutably and may change its content (and even
///  replace a call's argument list, as the calendar rewrites do); whatever
///  children the node has afterwards are the ones visited next. The first
///  error stops the walk and nothing is printed.
pub fn resolve<E, F>(node: &mut Node, mut rewrite: F) -> Result<String, E>
where
    F: FnMut(&mut Node) -> Result<(), E>,
{
    let mut out = String::new();
    resolve_into(node, &mut rewrite, &mut out)?;
    Ok(out)
}

fn resolve_into<E, F>(node: &mut Node, rewrite: &mut F, out: &mut String) -> Result<(), E>
where
    F: FnMut(&mut Node) -> Result<(), E>,
{
    rewrite(node)?;

    match node {
        Node::Leaf { value, .. } => out.push_str(value),
        Node::Grouping(inner) => {
            out.push('(');
            resolve_into(inner, rewrite, out)?;
            out.push(')');
        }
        Node::Call { name, args } => {
            out.push_str(name);
            out.push('(');
            for (i, arg) in args.iter_mut().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                resolve_into(arg, rewrite, out)?;
            }
            out.push(')');
        }
        // With a single operand the operator itself never shows up
        Node::Binary { op, operands } => {
            for (i, operand) in operands.iter_mut().enumerate() {
                if i > 0 {
                    out.push(' ');
                    out.push_str(op);
                    out.push(' ');
                }
                resolve_into(operand, rewrite, out)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::NodeKind, parser::build};

    fn identity(_: &mut Node) -> Result<(), ()> {
        Ok(())
    }

    #[test]
    fn identity_matches_display() {
        for input in [
            "(a+b)/c*d-f+sum(1,3,5)",
            "(Code==? and Price<=?) or len(name)==?",
            "((x)) like 'y'",
            "now() > -a",
        ] {
            let mut tree = build(input).unwrap();
            let expected = tree.to_string();
            assert_eq!(resolve(&mut tree, identity).unwrap(), expected);
        }
    }

    #[test]
    fn visits_parent_before_children() {
        let mut tree = build("f(a + b, c)").unwrap();
        let mut seen = Vec::new();
        resolve(&mut tree, |n: &mut Node| -> Result<(), ()> {
            seen.push(match n.kind() {
                NodeKind::Func | NodeKind::Field => n.value().to_string(),
                _ => n.operator().to_string(),
            });
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, ["f", "+", "a", "b", "c"]);
    }

    #[test]
    fn rewrites_are_printed() {
        let mut tree = build("a == b").unwrap();
        let out = resolve(&mut tree, |n: &mut Node| -> Result<(), ()> {
            match n {
                Node::Binary { op, .. } => *op = "=".into(),
                Node::Leaf { value, .. } => value.make_ascii_uppercase(),
                _ => {}
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(out, "A = B");
    }

    #[test]
    fn error_stops_the_walk() {
        let mut tree = build("a + bad + c").unwrap();
        let mut visited = 0;
        let res = resolve(&mut tree, |n: &mut Node| {
            visited += 1;
            if n.value() == "bad" {
                Err(format!("rejected {}", n.value()))
            } else {
                Ok(())
            }
        });
        assert_eq!(res, Err("rejected bad".to_string()));
        // +, a, + (right side), bad; `c` is never reached
        assert_eq!(visited, 4);
    }
}
