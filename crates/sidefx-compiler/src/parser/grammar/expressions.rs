use rowan::{TextRange, TextSize};

use crate::diagnostics::DiagnosticKind;
use crate::ops::{AssignOp, BinaryOp, Fixity, Precedence, UnaryOp};
use crate::parser::Parser;
use crate::parser::ast::{Expr, ExprKind};
use crate::parser::lexer::TokenKind;

/// Operators handled by the precedence-climbing loop.
#[derive(Debug, Clone, Copy)]
enum Infix {
    Binary(BinaryOp),
    AndAnd,
    OrOr,
    In,
}

impl Infix {
    fn precedence(self) -> u8 {
        match self {
            Self::Binary(op) => op.precedence(),
            Self::OrOr => Precedence::OR_OR,
            Self::AndAnd => Precedence::AND_AND,
            Self::In => Precedence::CMP,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Prefix {
    Unary(UnaryOp),
    Deref,
    AddressOf,
    Delete,
    Step { increment: bool },
}

impl Parser<'_> {
    /// Full expression including the comma operator.
    pub(crate) fn parse_expr(&mut self) -> Expr {
        let start = self.current_start();
        let depth = self.depth;
        let mut lhs = self.parse_assign_expr();
        // Each link deepens the left spine, so it counts against the recursion budget.
        while self.eat(TokenKind::Comma) {
            if !self.enter() {
                break;
            }
            let rhs = self.parse_assign_expr();
            lhs = Expr {
                kind: ExprKind::Comma(Box::new(lhs), Box::new(rhs)),
                range: self.range_from(start),
            };
        }
        self.depth = depth;
        lhs
    }

    /// Assignment level (right-associative); what argument lists and initializers accept.
    pub(crate) fn parse_assign_expr(&mut self) -> Expr {
        let start = self.current_start();
        let lhs = self.parse_cond_expr();

        let op = match self.current() {
            Some(TokenKind::Eq) => None,
            Some(kind) => match assign_op(kind) {
                Some(op) => Some(op),
                None => return lhs,
            },
            None => return lhs,
        };
        self.bump();

        if !self.enter() {
            return lhs;
        }
        let rhs = self.parse_assign_expr();
        self.exit();

        Expr {
            kind: ExprKind::Assign {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            range: self.range_from(start),
        }
    }

    /// `c ? a : b`
    fn parse_cond_expr(&mut self) -> Expr {
        let start = self.current_start();
        let cond = self.parse_binary_expr(Precedence::OR_OR);
        if !self.eat(TokenKind::Question) {
            return cond;
        }

        if !self.enter() {
            return cond;
        }
        let then_branch = self.parse_expr();
        self.expect(TokenKind::Colon, DiagnosticKind::UnexpectedToken);
        let else_branch = self.parse_cond_expr();
        self.exit();

        Expr {
            kind: ExprKind::Cond {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            range: self.range_from(start),
        }
    }

    /// Precedence climbing over the binary operator table.
    fn parse_binary_expr(&mut self, min_prec: u8) -> Expr {
        let start = self.current_start();
        let depth = self.depth;
        let mut lhs = self.parse_unary_expr();

        loop {
            let Some((infix, width)) = self.infix_at_current() else {
                break;
            };
            let prec = infix.precedence();
            if prec < min_prec || !self.enter() {
                break;
            }
            for _ in 0..width {
                self.bump();
            }

            let rhs = self.parse_binary_expr(prec + 1);
            let (lhs_box, rhs_box) = (Box::new(lhs), Box::new(rhs));
            let kind = match infix {
                Infix::Binary(op) => ExprKind::Binary {
                    op,
                    lhs: lhs_box,
                    rhs: rhs_box,
                },
                Infix::AndAnd => ExprKind::AndAnd(lhs_box, rhs_box),
                Infix::OrOr => ExprKind::OrOr(lhs_box, rhs_box),
                Infix::In => ExprKind::In {
                    key: lhs_box,
                    container: rhs_box,
                },
            };
            lhs = Expr {
                kind,
                range: self.range_from(start),
            };
        }

        self.depth = depth;
        lhs
    }

    /// Infix operator at the cursor and how many tokens spell it (`!is` takes two).
    fn infix_at_current(&mut self) -> Option<(Infix, usize)> {
        let infix = match self.current()? {
            TokenKind::PipePipe => Infix::OrOr,
            TokenKind::AmpAmp => Infix::AndAnd,
            TokenKind::KwIn => Infix::In,
            TokenKind::Bang if self.nth(1) == Some(TokenKind::KwIs) => {
                return Some((Infix::Binary(BinaryOp::NotIdentity), 2));
            }
            TokenKind::Pipe => Infix::Binary(BinaryOp::BitOr),
            TokenKind::Caret => Infix::Binary(BinaryOp::BitXor),
            TokenKind::Amp => Infix::Binary(BinaryOp::BitAnd),
            TokenKind::EqEq => Infix::Binary(BinaryOp::Eq),
            TokenKind::NotEq => Infix::Binary(BinaryOp::Ne),
            TokenKind::Lt => Infix::Binary(BinaryOp::Lt),
            TokenKind::Le => Infix::Binary(BinaryOp::Le),
            TokenKind::Gt => Infix::Binary(BinaryOp::Gt),
            TokenKind::Ge => Infix::Binary(BinaryOp::Ge),
            TokenKind::KwIs => Infix::Binary(BinaryOp::Identity),
            TokenKind::Shl => Infix::Binary(BinaryOp::Shl),
            TokenKind::Shr => Infix::Binary(BinaryOp::Shr),
            TokenKind::UShr => Infix::Binary(BinaryOp::UShr),
            TokenKind::Plus => Infix::Binary(BinaryOp::Add),
            TokenKind::Minus => Infix::Binary(BinaryOp::Sub),
            TokenKind::Tilde => Infix::Binary(BinaryOp::Cat),
            TokenKind::Star => Infix::Binary(BinaryOp::Mul),
            TokenKind::Slash => Infix::Binary(BinaryOp::Div),
            TokenKind::Percent => Infix::Binary(BinaryOp::Mod),
            _ => return None,
        };
        Some((infix, 1))
    }

    fn parse_unary_expr(&mut self) -> Expr {
        if !self.enter() {
            return self.error_expr(self.current_span());
        }
        let expr = self.parse_unary_inner();
        self.exit();
        expr
    }

    fn parse_unary_inner(&mut self) -> Expr {
        let start = self.current_start();
        let Some(kind) = self.current() else {
            return self.parse_pow_expr();
        };

        let prefix = match kind {
            TokenKind::Minus => Prefix::Unary(UnaryOp::Neg),
            TokenKind::Plus => Prefix::Unary(UnaryOp::Plus),
            TokenKind::Bang => Prefix::Unary(UnaryOp::Not),
            TokenKind::Tilde => Prefix::Unary(UnaryOp::Complement),
            TokenKind::Star => Prefix::Deref,
            TokenKind::Amp => Prefix::AddressOf,
            TokenKind::KwDelete => Prefix::Delete,
            TokenKind::PlusPlus => Prefix::Step { increment: true },
            TokenKind::MinusMinus => Prefix::Step { increment: false },
            TokenKind::KwCast => return self.parse_cast(start),
            TokenKind::KwNew => return self.parse_new(start),
            _ => return self.parse_pow_expr(),
        };

        self.bump();
        let operand = Box::new(self.parse_unary_expr());
        let kind = match prefix {
            Prefix::Unary(op) => ExprKind::Unary { op, operand },
            Prefix::Deref => ExprKind::Deref(operand),
            Prefix::AddressOf => ExprKind::AddressOf(operand),
            Prefix::Delete => ExprKind::Delete(operand),
            Prefix::Step { increment } => ExprKind::Step {
                increment,
                fixity: Fixity::Prefix,
                operand,
            },
        };
        Expr {
            kind,
            range: self.range_from(start),
        }
    }

    /// `cast(T) e`
    fn parse_cast(&mut self, start: TextSize) -> Expr {
        self.bump();
        let open = self.current_span();
        self.expect(TokenKind::ParenOpen, DiagnosticKind::UnexpectedToken);
        let ty = self.parse_type();
        self.expect_close_paren(open);
        let operand = self.parse_unary_expr();
        Expr {
            kind: ExprKind::Cast {
                ty,
                operand: Box::new(operand),
            },
            range: self.range_from(start),
        }
    }

    /// `new C` or `new class {}`
    fn parse_new(&mut self, start: TextSize) -> Expr {
        self.bump();
        if self.eat(TokenKind::KwClass) {
            let open = self.current_span();
            self.expect(TokenKind::BraceOpen, DiagnosticKind::UnexpectedToken);
            if !self.eat(TokenKind::BraceClose) {
                let span = self.current_span();
                self.diagnostics
                    .report(DiagnosticKind::UnclosedBrace, span)
                    .related_to("class body starts here", open)
                    .emit();
            }
            return Expr {
                kind: ExprKind::NewAnonClass,
                range: self.range_from(start),
            };
        }

        match self.expect_ident() {
            Some(name) => Expr {
                kind: ExprKind::New(name),
                range: self.range_from(start),
            },
            None => self.error_expr(self.range_from(start)),
        }
    }

    /// `a ^^ b` binds tighter than prefix operators and is right-associative.
    fn parse_pow_expr(&mut self) -> Expr {
        let start = self.current_start();
        let base = self.parse_postfix_expr();
        if !self.eat(TokenKind::Pow) {
            return base;
        }
        let exponent = self.parse_unary_expr();
        Expr {
            kind: ExprKind::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            },
            range: self.range_from(start),
        }
    }

    fn parse_postfix_expr(&mut self) -> Expr {
        let start = self.current_start();
        let depth = self.depth;
        let mut expr = self.parse_primary_expr();

        loop {
            if !self.at_postfix_operator() || !self.enter() {
                break;
            }
            let kind = match self.current() {
                Some(TokenKind::ParenOpen) => {
                    let args = self.parse_args();
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    }
                }
                Some(TokenKind::BracketOpen) => {
                    let open = self.current_span();
                    self.bump();
                    let index = self.parse_assign_expr();
                    if !self.eat(TokenKind::BracketClose) {
                        let span = self.current_span();
                        self.diagnostics
                            .report(DiagnosticKind::UnclosedBracket, span)
                            .related_to("index starts here", open)
                            .emit();
                    }
                    ExprKind::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    }
                }
                Some(kind @ (TokenKind::PlusPlus | TokenKind::MinusMinus)) => {
                    self.bump();
                    ExprKind::Step {
                        increment: kind == TokenKind::PlusPlus,
                        fixity: Fixity::Postfix,
                        operand: Box::new(expr),
                    }
                }
                Some(TokenKind::Dot) => {
                    self.bump();
                    match self.parse_member(expr) {
                        Some(kind) => kind,
                        None => ExprKind::Error,
                    }
                }
                _ => break,
            };
            expr = Expr {
                kind,
                range: self.range_from(start),
            };
        }

        self.depth = depth;
        expr
    }

    fn at_postfix_operator(&mut self) -> bool {
        matches!(
            self.current(),
            Some(
                TokenKind::ParenOpen
                    | TokenKind::BracketOpen
                    | TokenKind::PlusPlus
                    | TokenKind::MinusMinus
                    | TokenKind::Dot
            )
        )
    }

    /// Only `.remove(key)` is a member; anything else is rejected.
    fn parse_member(&mut self, container: Expr) -> Option<ExprKind> {
        let name = self.expect_ident()?;
        if name.text != "remove" || !self.at(TokenKind::ParenOpen) {
            self.error_with(
                DiagnosticKind::UnexpectedToken,
                name.range,
                Some(&format!("member `{}` is not supported", name.text)),
            );
            return None;
        }

        let open = self.current_span();
        let mut args = self.parse_args();
        if args.len() != 1 {
            let range = TextRange::new(open.start(), self.prev_end());
            self.error_with(
                DiagnosticKind::WrongArgumentCount,
                range,
                Some(&format!("`remove` takes 1 argument but {} were given", args.len())),
            );
            return None;
        }
        let key = args.pop()?;
        Some(ExprKind::Remove {
            container: Box::new(container),
            key: Box::new(key),
        })
    }

    fn parse_primary_expr(&mut self) -> Expr {
        let start = self.current_start();
        let span = self.current_span();
        let Some(kind) = self.current() else {
            self.error(DiagnosticKind::ExpectedExpression, span);
            return self.error_expr(span);
        };

        let expr_kind = match kind {
            TokenKind::Ident => {
                self.bump();
                ExprKind::Ident(self.span_text(span).to_string())
            }
            TokenKind::IntLiteral => {
                self.bump();
                let digits: String = self.span_text(span).chars().filter(|c| *c != '_').collect();
                match digits.parse::<i64>() {
                    Ok(value) => ExprKind::Int(value),
                    Err(_) => {
                        self.error_with(
                            DiagnosticKind::UnexpectedToken,
                            span,
                            Some("integer literal is out of range"),
                        );
                        ExprKind::Error
                    }
                }
            }
            TokenKind::StringLiteral => {
                self.bump();
                let text = self.span_text(span);
                ExprKind::Str(text[1..text.len() - 1].to_string())
            }
            TokenKind::KwTrue | TokenKind::KwFalse => {
                self.bump();
                ExprKind::Bool(kind == TokenKind::KwTrue)
            }
            TokenKind::KwNull => {
                self.bump();
                ExprKind::Null
            }
            TokenKind::ParenOpen => {
                self.bump();
                let inner = self.parse_expr();
                self.expect_close_paren(span);
                ExprKind::Paren(Box::new(inner))
            }
            TokenKind::KwTuple => {
                self.bump();
                ExprKind::Tuple(self.parse_args())
            }
            TokenKind::KwAssert => {
                self.bump();
                let open = self.current_span();
                self.expect(TokenKind::ParenOpen, DiagnosticKind::UnexpectedToken);
                let cond = self.parse_assign_expr();
                let message = if self.eat(TokenKind::Comma) {
                    Some(Box::new(self.parse_assign_expr()))
                } else {
                    None
                };
                self.expect_close_paren(open);
                ExprKind::Assert {
                    cond: Box::new(cond),
                    message,
                }
            }
            TokenKind::KwAuto => {
                self.bump();
                let Some(name) = self.expect_ident() else {
                    return self.error_expr(self.range_from(start));
                };
                self.expect(TokenKind::Eq, DiagnosticKind::UnexpectedToken);
                let init = self.parse_assign_expr();
                ExprKind::AutoDecl {
                    name,
                    init: Box::new(init),
                }
            }
            TokenKind::KwTraits => {
                self.bump();
                return self.parse_traits(start);
            }
            _ => {
                self.error_with(
                    DiagnosticKind::ExpectedExpression,
                    span,
                    Some(&format!("found {}", kind.describe())),
                );
                return self.error_expr(span);
            }
        };

        Expr {
            kind: expr_kind,
            range: self.range_from(start),
        }
    }

    /// `__traits(compiles, e)`
    fn parse_traits(&mut self, start: TextSize) -> Expr {
        let open = self.current_span();
        self.expect(TokenKind::ParenOpen, DiagnosticKind::UnexpectedToken);
        let trait_name = self.expect_ident();
        if let Some(name) = &trait_name
            && name.text != "compiles"
        {
            self.error_with(
                DiagnosticKind::UnexpectedToken,
                name.range,
                Some(&format!("unsupported trait `{}`", name.text)),
            );
        }
        self.expect(TokenKind::Comma, DiagnosticKind::UnexpectedToken);
        let operand = self.parse_assign_expr();
        self.expect_close_paren(open);

        let kind = match trait_name {
            Some(name) if name.text == "compiles" => ExprKind::TraitsCompiles(Box::new(operand)),
            _ => ExprKind::Error,
        };
        Expr {
            kind,
            range: self.range_from(start),
        }
    }

    /// `(` [expr (`,` expr)*] `)`
    fn parse_args(&mut self) -> Vec<Expr> {
        let open = self.current_span();
        let mut args = Vec::new();
        self.bump();

        while !self.at(TokenKind::ParenClose) && !self.should_stop() {
            args.push(self.parse_assign_expr());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_close_paren(open);
        args
    }

    pub(crate) fn expect_close_paren(&mut self, open: TextRange) {
        if self.eat(TokenKind::ParenClose) {
            return;
        }
        let span = self.current_span();
        self.diagnostics
            .report(DiagnosticKind::UnclosedParen, span)
            .related_to("opened here", open)
            .emit();
    }

    fn error_expr(&self, range: TextRange) -> Expr {
        Expr {
            kind: ExprKind::Error,
            range,
        }
    }
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::TildeEq => AssignOp::Cat,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Mod,
        TokenKind::ShlEq => AssignOp::Shl,
        TokenKind::ShrEq => AssignOp::Shr,
        TokenKind::UShrEq => AssignOp::UShr,
        TokenKind::AmpEq => AssignOp::BitAnd,
        TokenKind::PipeEq => AssignOp::BitOr,
        TokenKind::CaretEq => AssignOp::BitXor,
        TokenKind::PowEq => AssignOp::Pow,
        _ => return None,
    };
    Some(op)
}
