//! Source-like rendering of lowered expressions, used only in messages.

use super::expr::{ExprId, ExprKind};
use super::program::Program;
use super::types::TypeId;
use crate::ops::{Fixity, Precedence};

impl Program {
    /// Render an expression the way it would be written, parenthesized by precedence.
    pub fn expr_text(&self, id: ExprId) -> String {
        let mut out = String::new();
        self.write_expr(&mut out, id, Precedence::COMMA);
        out
    }

    pub fn type_text(&self, ty: TypeId) -> String {
        self.types.display(ty, &self.interner)
    }

    /// Operands are expanded from an explicit stack; operand chains can be
    /// as deep as the arena allows.
    fn write_expr(&self, out: &mut String, root: ExprId, min_prec: u8) {
        let mut pending = vec![Piece::Expr(root, min_prec)];
        while let Some(piece) = pending.pop() {
            let (id, min_prec) = match piece {
                Piece::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Piece::Owned(text) => {
                    out.push_str(&text);
                    continue;
                }
                Piece::Expr(id, min_prec) => (id, min_prec),
            };

            let kind = &self.exprs[id].kind;
            let prec = precedence(kind);
            let wrap = prec < min_prec;
            let mut pieces = Vec::new();
            if wrap {
                pieces.push(Piece::Text("("));
            }
            self.expand(&mut pieces, kind, prec);
            if wrap {
                pieces.push(Piece::Text(")"));
            }
            pending.extend(pieces.into_iter().rev());
        }
    }

    /// Pieces of one node in output order; operands stay unexpanded.
    fn expand<'p>(&'p self, pieces: &mut Vec<Piece<'p>>, kind: &'p ExprKind, prec: u8) {
        use Piece::{Expr, Owned, Text};

        match kind {
            ExprKind::Assign { lhs, rhs }
            | ExprKind::Construct { lhs, rhs }
            | ExprKind::Blit { lhs, rhs } => infix(pieces, *lhs, "=", *rhs, prec + 1, prec),
            ExprKind::CompoundAssign { op, lhs, rhs } => {
                infix(pieces, *lhs, op.token(), *rhs, prec + 1, prec)
            }
            ExprKind::Increment { operand, fixity } => step(pieces, *operand, "++", *fixity),
            ExprKind::Decrement { operand, fixity } => step(pieces, *operand, "--", *fixity),
            ExprKind::Declaration { var, init } => {
                let decl = self.symbols.var(*var);
                pieces.push(Owned(self.type_text(decl.ty)));
                pieces.push(Text(" "));
                pieces.push(Text(self.interner.resolve(decl.name)));
                let value = init.and_then(|init| match &self.exprs[init].kind {
                    ExprKind::Construct { rhs, .. } => Some(*rhs),
                    _ => None,
                });
                if let Some(value) = value {
                    pieces.push(Text(" = "));
                    pieces.push(Expr(value, Precedence::ASSIGN));
                }
            }
            ExprKind::In { key, container } => {
                infix(pieces, *key, "in", *container, prec, prec + 1)
            }
            ExprKind::Remove { container, key } => {
                pieces.push(Expr(*container, Precedence::POSTFIX));
                pieces.push(Text(".remove("));
                pieces.push(Expr(*key, Precedence::ASSIGN));
                pieces.push(Text(")"));
            }
            ExprKind::Assert { condition, message } => {
                pieces.push(Text("assert("));
                pieces.push(Expr(*condition, Precedence::ASSIGN));
                if let Some(message) = message {
                    pieces.push(Text(", "));
                    pieces.push(Expr(*message, Precedence::ASSIGN));
                }
                pieces.push(Text(")"));
            }
            ExprKind::Halt => pieces.push(Text("assert(0)")),
            ExprKind::Delete(operand) => {
                pieces.push(Text("delete "));
                pieces.push(Expr(*operand, Precedence::POW));
            }
            ExprKind::New { class } => {
                pieces.push(Text("new "));
                pieces.push(Owned(self.type_text(*class)));
            }
            ExprKind::NewAnonClass => pieces.push(Text("new class {}")),
            ExprKind::Call { callee, args, .. } => {
                pieces.push(Expr(*callee, Precedence::POSTFIX));
                list(pieces, args);
            }
            ExprKind::Cast { to, operand } => {
                pieces.push(Owned(format!("cast({}) ", self.type_text(*to))));
                pieces.push(Expr(*operand, Precedence::POW));
            }
            ExprKind::AndAnd { lhs, rhs } => infix(pieces, *lhs, "&&", *rhs, prec, prec + 1),
            ExprKind::OrOr { lhs, rhs } => infix(pieces, *lhs, "||", *rhs, prec, prec + 1),
            ExprKind::Cond {
                cond,
                then_branch,
                else_branch,
            } => {
                pieces.push(Expr(*cond, Precedence::OR_OR));
                pieces.push(Text(" ? "));
                pieces.push(Expr(*then_branch, Precedence::COMMA));
                pieces.push(Text(" : "));
                pieces.push(Expr(*else_branch, Precedence::COND));
            }
            ExprKind::Comma { lhs, rhs } => {
                pieces.push(Expr(*lhs, Precedence::COMMA));
                pieces.push(Text(", "));
                pieces.push(Expr(*rhs, Precedence::ASSIGN));
            }
            ExprKind::Var(var) => {
                pieces.push(Text(self.interner.resolve(self.symbols.var(*var).name)))
            }
            ExprKind::Func(func) => {
                pieces.push(Text(self.interner.resolve(self.symbols.func(*func).name)))
            }
            ExprKind::Tuple(elements) => {
                pieces.push(Text("tuple"));
                list(pieces, elements);
            }
            ExprKind::Error => pieces.push(Text("__error")),
            ExprKind::Import(module) => {
                pieces.push(Text(self.interner.resolve(self.symbols.module(*module).name)))
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let (left, right) = if op.is_right_assoc() {
                    (Precedence::POSTFIX, prec)
                } else {
                    (prec, prec + 1)
                };
                infix(pieces, *lhs, op.token(), *rhs, left, right)
            }
            ExprKind::Unary { op, operand } => {
                pieces.push(Text(op.token()));
                pieces.push(Expr(*operand, Precedence::POW));
            }
            ExprKind::Deref(operand) => {
                pieces.push(Text("*"));
                pieces.push(Expr(*operand, Precedence::POW));
            }
            ExprKind::AddressOf(operand) => {
                pieces.push(Text("&"));
                pieces.push(Expr(*operand, Precedence::POW));
            }
            ExprKind::Index { base, index } => {
                pieces.push(Expr(*base, Precedence::POSTFIX));
                pieces.push(Text("["));
                pieces.push(Expr(*index, Precedence::ASSIGN));
                pieces.push(Text("]"));
            }
            ExprKind::IntLiteral(value) => pieces.push(Owned(value.to_string())),
            ExprKind::BoolLiteral(value) => {
                pieces.push(Text(if *value { "true" } else { "false" }))
            }
            ExprKind::StringLiteral(text) => {
                pieces.push(Text("\""));
                pieces.push(Text(text));
                pieces.push(Text("\""));
            }
            ExprKind::Null => pieces.push(Text("null")),
        }
    }
}

enum Piece<'p> {
    Expr(ExprId, u8),
    Text(&'p str),
    Owned(String),
}

fn infix<'p>(
    pieces: &mut Vec<Piece<'p>>,
    lhs: ExprId,
    op: &'p str,
    rhs: ExprId,
    lhs_prec: u8,
    rhs_prec: u8,
) {
    pieces.push(Piece::Expr(lhs, lhs_prec));
    pieces.push(Piece::Text(" "));
    pieces.push(Piece::Text(op));
    pieces.push(Piece::Text(" "));
    pieces.push(Piece::Expr(rhs, rhs_prec));
}

fn step<'p>(pieces: &mut Vec<Piece<'p>>, operand: ExprId, op: &'p str, fixity: Fixity) {
    match fixity {
        Fixity::Prefix => {
            pieces.push(Piece::Text(op));
            pieces.push(Piece::Expr(operand, Precedence::POW));
        }
        Fixity::Postfix => {
            pieces.push(Piece::Expr(operand, Precedence::POSTFIX));
            pieces.push(Piece::Text(op));
        }
    }
}

fn list(pieces: &mut Vec<Piece<'_>>, items: &[ExprId]) {
    pieces.push(Piece::Text("("));
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            pieces.push(Piece::Text(", "));
        }
        pieces.push(Piece::Expr(*item, Precedence::ASSIGN));
    }
    pieces.push(Piece::Text(")"));
}

/// Binding strength of the construct as printed.
fn precedence(kind: &ExprKind) -> u8 {
    match kind {
        ExprKind::Comma { .. } => Precedence::COMMA,
        ExprKind::Assign { .. }
        | ExprKind::Construct { .. }
        | ExprKind::Blit { .. }
        | ExprKind::CompoundAssign { .. }
        | ExprKind::Declaration { .. } => Precedence::ASSIGN,
        ExprKind::Cond { .. } => Precedence::COND,
        ExprKind::OrOr { .. } => Precedence::OR_OR,
        ExprKind::AndAnd { .. } => Precedence::AND_AND,
        ExprKind::Binary { op, .. } => op.precedence(),
        ExprKind::In { .. } => Precedence::CMP,
        ExprKind::Unary { .. }
        | ExprKind::Deref(_)
        | ExprKind::AddressOf(_)
        | ExprKind::Cast { .. }
        | ExprKind::Delete(_)
        | ExprKind::New { .. }
        | ExprKind::NewAnonClass => Precedence::UNARY,
        ExprKind::Increment { fixity, .. } | ExprKind::Decrement { fixity, .. } => match fixity {
            Fixity::Prefix => Precedence::UNARY,
            Fixity::Postfix => Precedence::POSTFIX,
        },
        ExprKind::Call { .. } | ExprKind::Index { .. } | ExprKind::Remove { .. } => {
            Precedence::POSTFIX
        }
        ExprKind::Assert { .. }
        | ExprKind::Halt
        | ExprKind::Var(_)
        | ExprKind::Func(_)
        | ExprKind::Tuple(_)
        | ExprKind::Error
        | ExprKind::Import(_)
        | ExprKind::IntLiteral(_)
        | ExprKind::BoolLiteral(_)
        | ExprKind::StringLiteral(_)
        | ExprKind::Null => Precedence::PRIMARY,
    }
}
