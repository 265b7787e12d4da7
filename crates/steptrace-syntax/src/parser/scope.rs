//! Local name collection for function bodies.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::ast::{Param, Stmt, StmtKind, Target};

/// Names a function binds: its parameters plus every name assigned, used as
/// a loop target, or defined anywhere in its body (nested `def` bodies
/// excluded).
pub(crate) fn collect_locals(params: &[Param], body: &[Stmt]) -> FxHashSet<SmolStr> {
    let mut locals = FxHashSet::default();
    for param in params {
        locals.insert(param.name.clone());
    }
    collect_block(body, &mut locals);
    locals
}

fn collect_block(body: &[Stmt], locals: &mut FxHashSet<SmolStr>) {
    for stmt in body {
        match &stmt.kind {
            StmtKind::Assign { targets, .. } => {
                for target in targets {
                    insert_target(target, locals);
                }
            }
            StmtKind::AugAssign { target, .. } => insert_target(target, locals),
            StmtKind::For { target, body, .. } => {
                insert_target(target, locals);
                collect_block(body, locals);
            }
            StmtKind::While { body, .. } => collect_block(body, locals),
            StmtKind::If { branches, orelse } => {
                for branch in branches {
                    collect_block(&branch.body, locals);
                }
                collect_block(orelse, locals);
            }
            StmtKind::FunctionDef(def) => {
                locals.insert(def.name.clone());
            }
            StmtKind::Expr(_)
            | StmtKind::Break
            | StmtKind::Continue
            | StmtKind::Pass
            | StmtKind::Return(_)
            | StmtKind::Raise(_) => {}
        }
    }
}

fn insert_target(target: &Target, locals: &mut FxHashSet<SmolStr>) {
    let mut names = Vec::new();
    target.bound_names(&mut names);
    for name in names {
        locals.insert(name.clone());
    }
}
