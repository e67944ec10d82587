//! Stoppable postorder traversal over an expression subtree.
//!
//! Uses an explicit frame stack, so arbitrarily deep trees (long comma or
//! `&&` chains) do not grow the native stack.

use crate::sema::{Expr, ExprArena, ExprId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkControl {
    Continue,
    Stop,
}

/// Callback invoked on every node after all of its children.
pub trait StoppableVisitor {
    fn visit(&mut self, id: ExprId, expr: &Expr) -> WalkControl;
}

impl<F> StoppableVisitor for F
where
    F: FnMut(ExprId, &Expr) -> WalkControl,
{
    fn visit(&mut self, id: ExprId, expr: &Expr) -> WalkControl {
        self(id, expr)
    }
}

enum Frame {
    Enter(ExprId),
    Exit(ExprId),
}

/// Visit `root` and everything below it, children left to right before parents.
///
/// Returns `true` if the visitor stopped the walk, `false` if every node was visited.
pub fn walk_postorder<V>(exprs: &ExprArena, root: ExprId, visitor: &mut V) -> bool
where
    V: StoppableVisitor + ?Sized,
{
    let mut stack = vec![Frame::Enter(root)];
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(id) => {
                stack.push(Frame::Exit(id));
                let first_child = stack.len();
                stack.extend(exprs[id].kind.children().map(Frame::Enter));
                stack[first_child..].reverse();
            }
            Frame::Exit(id) => {
                if visitor.visit(id, &exprs[id]) == WalkControl::Stop {
                    return true;
                }
            }
        }
    }
    false
}
