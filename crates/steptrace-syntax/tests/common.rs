//! Shared helpers for parser tests.
#![allow(dead_code, unused_imports)]

pub use steptrace_syntax::ast::{Expr, Literal, Module, Stmt, StmtKind, Target};
pub use steptrace_syntax::parse;

/// Parse a single expression statement and return its expression.
pub fn parse_expr(source: &str) -> Expr {
    let module = parse(source).expect("expression should parse");
    assert_eq!(module.body.len(), 1, "expected one statement in {source:?}");
    match module.body.into_iter().next().map(|stmt| stmt.kind) {
        Some(StmtKind::Expr(expr)) => expr,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

/// Render an expression as a compact s-expression so precedence and
/// associativity can be asserted on a single string.
pub fn sexpr(expr: &Expr) -> String {
    match expr {
        Expr::Literal(literal) => match literal {
            Literal::None => "None".to_string(),
            Literal::Bool(value) => (if *value { "True" } else { "False" }).to_string(),
            Literal::Int(value) => value.to_string(),
            Literal::Float(value) => format!("{value:?}"),
            Literal::Str(value) => format!("{value:?}"),
        },
        Expr::Name(name) => name.to_string(),
        Expr::List(items) => format!("[{}]", join(items)),
        Expr::Tuple(items) => format!("(tuple {})", join(items)),
        Expr::Dict(entries) => {
            let parts: Vec<_> = entries
                .iter()
                .map(|(key, value)| format!("{}: {}", sexpr(key), sexpr(value)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Expr::Subscript { value, index } => format!("(index {} {})", sexpr(value), sexpr(index)),
        Expr::Slice { lower, upper, step } => format!(
            "(slice {} {} {})",
            optional(lower.as_deref()),
            optional(upper.as_deref()),
            optional(step.as_deref())
        ),
        Expr::Attribute { value, attr } => format!("(. {} {attr})", sexpr(value)),
        Expr::Call {
            func,
            args,
            keywords,
        } => {
            let mut parts: Vec<_> = args.iter().map(sexpr).collect();
            parts.extend(
                keywords
                    .iter()
                    .map(|keyword| format!("{}={}", keyword.name, sexpr(&keyword.value))),
            );
            format!("(call {} {})", sexpr(func), parts.join(" "))
        }
        Expr::Unary { op, operand } => format!("({op:?} {})", sexpr(operand)),
        Expr::Binary { op, left, right } => {
            format!("({} {} {})", op.symbol(), sexpr(left), sexpr(right))
        }
        Expr::BoolOp { op, left, right } => {
            format!("({op:?} {} {})", sexpr(left), sexpr(right))
        }
        Expr::Compare { left, rest } => {
            let mut out = format!("(cmp {}", sexpr(left));
            for (op, operand) in rest {
                out.push_str(&format!(" {} {}", op.symbol(), sexpr(operand)));
            }
            out.push(')');
            out
        }
        Expr::IfExp { test, body, orelse } => format!(
            "(if {} {} {})",
            sexpr(test),
            sexpr(body),
            sexpr(orelse)
        ),
    }
}

fn join(items: &[Expr]) -> String {
    items.iter().map(sexpr).collect::<Vec<_>>().join(" ")
}

fn optional(expr: Option<&Expr>) -> String {
    expr.map_or_else(|| "_".to_string(), sexpr)
}

/// Lines of the top-level statements, in order.
pub fn statement_lines(module: &Module) -> Vec<u32> {
    module.body.iter().map(|stmt| stmt.line).collect()
}
