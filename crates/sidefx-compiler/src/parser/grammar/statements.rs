use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::ast::{Block, Expr, Ident, Stmt, VarDecl};
use crate::parser::lexer::TokenKind;

impl Parser<'_> {
    /// `{` stmt* `}`
    pub(crate) fn parse_block(&mut self) -> Block {
        let start = self.current_start();
        let open = self.current_span();
        let mut stmts = Vec::new();
        self.expect(TokenKind::BraceOpen, DiagnosticKind::UnexpectedToken);

        while !self.at(TokenKind::BraceClose) && !self.should_stop() {
            let before = self.pos;
            if let Some(stmt) = self.parse_stmt() {
                stmts.push(stmt);
            }
            if self.pos == before && !self.should_stop() {
                self.bump();
            }
        }

        if !self.eat(TokenKind::BraceClose) && !self.has_fatal_error() {
            let span = self.current_span();
            self.diagnostics
                .report(DiagnosticKind::UnclosedBrace, span)
                .related_to("block starts here", open)
                .emit();
        }

        Block {
            stmts,
            range: self.range_from(start),
        }
    }

    pub(crate) fn parse_stmt(&mut self) -> Option<Stmt> {
        if !self.enter() {
            return None;
        }
        let stmt = self.parse_stmt_inner();
        self.exit();
        stmt
    }

    fn parse_stmt_inner(&mut self) -> Option<Stmt> {
        let start = self.current_start();
        match self.current()? {
            TokenKind::BraceOpen => Some(Stmt::Block(self.parse_block())),
            TokenKind::Semicolon => {
                let span = self.current_span();
                self.bump();
                Some(Stmt::Empty(span))
            }
            TokenKind::KwReturn => {
                self.bump();
                let value = if self.at(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr())
                };
                self.expect_semicolon();
                Some(Stmt::Return {
                    value,
                    range: self.range_from(start),
                })
            }
            TokenKind::KwIf => {
                self.bump();
                let cond = self.parse_paren_condition();
                let then_branch = Box::new(self.parse_stmt()?);
                let else_branch = if self.eat(TokenKind::KwElse) {
                    Some(Box::new(self.parse_stmt()?))
                } else {
                    None
                };
                Some(Stmt::If {
                    cond,
                    then_branch,
                    else_branch,
                })
            }
            TokenKind::KwWhile => {
                self.bump();
                let cond = self.parse_paren_condition();
                let body = Box::new(self.parse_stmt()?);
                Some(Stmt::While { cond, body })
            }
            TokenKind::KwFor => {
                self.bump();
                self.parse_for()
            }
            _ if self.looks_like_declaration() => Some(Stmt::Local(self.parse_local())),
            _ => {
                let expr = self.parse_expr();
                self.expect_semicolon();
                Some(Stmt::Expr(expr))
            }
        }
    }

    /// `for (init; cond; step) body`, each header part optional.
    fn parse_for(&mut self) -> Option<Stmt> {
        let open = self.current_span();
        self.expect(TokenKind::ParenOpen, DiagnosticKind::UnexpectedToken);

        let init = if self.eat(TokenKind::Semicolon) {
            None
        } else if self.looks_like_declaration() {
            Some(Box::new(Stmt::Local(self.parse_local())))
        } else {
            let expr = self.parse_expr();
            self.expect_semicolon();
            Some(Box::new(Stmt::Expr(expr)))
        };

        let cond = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr())
        };
        self.expect(TokenKind::Semicolon, DiagnosticKind::ExpectedSemicolon);

        let step = if self.at(TokenKind::ParenClose) {
            None
        } else {
            Some(self.parse_expr())
        };
        self.expect_close_paren(open);

        let body = Box::new(self.parse_stmt()?);
        Some(Stmt::For {
            init,
            cond,
            step,
            body,
        })
    }

    fn parse_paren_condition(&mut self) -> Expr {
        let open = self.current_span();
        self.expect(TokenKind::ParenOpen, DiagnosticKind::UnexpectedToken);
        let cond = self.parse_expr();
        self.expect_close_paren(open);
        cond
    }

    /// `Type name [= init];`
    fn parse_local(&mut self) -> VarDecl {
        let start = self.current_start();
        let ty = self.parse_type();
        let name = match self.expect_ident() {
            Some(name) => name,
            None => Ident {
                text: String::new(),
                range: self.current_span(),
            },
        };
        let init = if self.eat(TokenKind::Eq) {
            Some(self.parse_assign_expr())
        } else {
            None
        };
        self.expect_semicolon();
        VarDecl {
            ty,
            name,
            init,
            range: self.range_from(start),
        }
    }

    /// LL(k) check for `Type name` at statement start.
    ///
    /// `a * b;` is read as a declaration of `b` with type `a*`.
    fn looks_like_declaration(&mut self) -> bool {
        match self.current() {
            Some(kind) if kind.is_basic_type() => return true,
            Some(TokenKind::Ident) => {}
            _ => return false,
        }

        let mut i = 1;
        loop {
            match self.nth(i) {
                Some(TokenKind::Star) => i += 1,
                Some(TokenKind::KwFunction | TokenKind::KwDelegate) => return true,
                Some(TokenKind::BracketOpen) => match (self.nth(i + 1), self.nth(i + 2)) {
                    (Some(TokenKind::BracketClose), _) => i += 2,
                    (Some(key), Some(TokenKind::BracketClose))
                        if key == TokenKind::Ident || key.is_basic_type() =>
                    {
                        i += 3
                    }
                    _ => return false,
                },
                Some(TokenKind::Ident) => {
                    return matches!(
                        self.nth(i + 1),
                        Some(TokenKind::Semicolon | TokenKind::Eq)
                    );
                }
                _ => return false,
            }
        }
    }
}
