use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::ast::{FnAttrs, FunctionDecl, Item, Param, SourceFile, VarDecl};
use crate::parser::lexer::TokenKind;

impl Parser<'_> {
    pub(crate) fn parse_source_file(&mut self) -> SourceFile {
        let mut items = Vec::new();
        while !self.should_stop() {
            let before = self.pos;
            if let Some(item) = self.parse_item() {
                items.push(item);
            }
            if self.pos == before && !self.should_stop() {
                self.bump();
            }
        }
        SourceFile { items }
    }

    fn parse_item(&mut self) -> Option<Item> {
        match self.current()? {
            TokenKind::KwImport => {
                self.bump();
                let name = self.expect_ident()?;
                self.expect_semicolon();
                Some(Item::Import(name))
            }
            TokenKind::KwAlias => {
                self.bump();
                let name = self.expect_ident()?;
                self.expect(TokenKind::Eq, DiagnosticKind::UnexpectedToken);
                let target = self.parse_type();
                self.expect_semicolon();
                Some(Item::Alias { name, target })
            }
            TokenKind::KwClass => {
                self.bump();
                let name = self.expect_ident()?;
                self.expect_semicolon();
                Some(Item::Class(name))
            }
            TokenKind::Semicolon => {
                self.bump();
                None
            }
            kind if kind.is_basic_type()
                || kind.is_function_attribute()
                || kind == TokenKind::Ident =>
            {
                self.parse_declaration()
            }
            kind => {
                let span = self.current_span();
                self.error_with(
                    DiagnosticKind::UnexpectedToken,
                    span,
                    Some(&format!("{} at top level", kind.describe())),
                );
                self.recover_item();
                None
            }
        }
    }

    /// Function or global variable; both start with an optional attribute list and a type.
    fn parse_declaration(&mut self) -> Option<Item> {
        let start = self.current_start();
        let leading = self.parse_fn_attrs();
        let ty = self.parse_type();
        let Some(name) = self.expect_ident() else {
            self.recover_item();
            return None;
        };

        if !self.at(TokenKind::ParenOpen) {
            let init = if self.eat(TokenKind::Eq) {
                Some(self.parse_assign_expr())
            } else {
                None
            };
            self.expect_semicolon();
            return Some(Item::Global(VarDecl {
                ty,
                name,
                init,
                range: self.range_from(start),
            }));
        }

        let params = self.parse_params();
        let attrs = leading.merge(self.parse_fn_attrs());
        let body = if self.at(TokenKind::BraceOpen) {
            Some(self.parse_block())
        } else {
            self.expect_semicolon();
            None
        };

        Some(Item::Function(FunctionDecl {
            name,
            ret: ty,
            params,
            attrs,
            body,
            range: self.range_from(start),
        }))
    }

    pub(crate) fn parse_fn_attrs(&mut self) -> FnAttrs {
        let mut attrs = FnAttrs::default();
        loop {
            if self.eat(TokenKind::KwPure) {
                attrs.is_pure = true;
            } else if self.eat(TokenKind::KwNothrow) {
                attrs.is_nothrow = true;
            } else {
                return attrs;
            }
        }
    }

    /// `(` [param (`,` param)*] `)`
    pub(crate) fn parse_params(&mut self) -> Vec<Param> {
        let mut params = Vec::new();
        let open = self.current_span();
        if !self.expect(TokenKind::ParenOpen, DiagnosticKind::UnexpectedToken) {
            return params;
        }

        while !self.at(TokenKind::ParenClose) && !self.should_stop() {
            let is_ref = self.eat(TokenKind::KwRef);
            let ty = self.parse_type();
            let name = if self.at(TokenKind::Ident) {
                self.expect_ident()
            } else {
                None
            };
            params.push(Param { ty, name, is_ref });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        if !self.eat(TokenKind::ParenClose) {
            let span = self.current_span();
            self.diagnostics
                .report(DiagnosticKind::UnclosedParen, span)
                .related_to("parameter list starts here", open)
                .emit();
        }
        params
    }

    pub(crate) fn expect_semicolon(&mut self) {
        if self.eat(TokenKind::Semicolon) {
            return;
        }
        let span = self.current_span();
        self.error(DiagnosticKind::ExpectedSemicolon, span);
        self.recover_to_statement_end();
    }

    /// Skip past the next `;` or `}` at top level.
    fn recover_item(&mut self) {
        while let Some(kind) = self.current() {
            self.bump();
            if matches!(kind, TokenKind::Semicolon | TokenKind::BraceClose) {
                return;
            }
        }
    }
}
