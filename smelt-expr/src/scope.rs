//! Free-variable analysis over bodies.
//!
//! A variable occurrence is free when it is neither in the supplied bound set
//! (a member's parameters) nor declared by an enclosing block of the same
//! body. The result preserves first-occurrence order, which is the parameter
//! order of extracted helper methods.

use crate::expr::{Expr, Var};

/// Collect the free variables of `body`, given the variables `bound` outside
/// it, in order of first occurrence.
pub fn free_variables(body: &Expr, bound: &[Var]) -> Vec<Var> {
    let mut scope: Vec<Var> = bound.to_vec();
    let mut free: Vec<Var> = Vec::new();
    collect(body, &mut scope, &mut free);
    free
}

fn collect(expr: &Expr, scope: &mut Vec<Var>, free: &mut Vec<Var>) {
    match expr {
        Expr::Var(var) => {
            let is_bound = scope.iter().any(|v| v.same(var));
            let already_seen = free.iter().any(|v| v.same(var));
            if !is_bound && !already_seen {
                free.push(var.clone());
            }
        }
        Expr::Block(block) => {
            let depth = scope.len();
            scope.extend(block.variables.iter().cloned());
            for statement in &block.statements {
                collect(statement, scope, free);
            }
            scope.truncate(depth);
        }
        other => {
            crate::visit::each_child(other, &mut |child| collect(child, scope, free));
        }
    }
}
