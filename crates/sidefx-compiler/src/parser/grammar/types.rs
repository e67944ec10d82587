use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::ast::{BasicTypeName, TypeExpr, TypeExprKind};
use crate::parser::lexer::TokenKind;

impl Parser<'_> {
    /// Base type followed by any number of suffixes: `*`, `[]`, `[K]`,
    /// `function(..) attrs`, `delegate(..) attrs`.
    pub(crate) fn parse_type(&mut self) -> TypeExpr {
        let start = self.current_start();
        let mut ty = self.parse_base_type();
        if matches!(ty.kind, TypeExprKind::Error) {
            return ty;
        }

        loop {
            match self.current() {
                Some(TokenKind::Star) => {
                    self.bump();
                    ty = TypeExpr {
                        kind: TypeExprKind::Pointer(Box::new(ty)),
                        range: self.range_from(start),
                    };
                }
                Some(TokenKind::BracketOpen) => {
                    let open = self.current_span();
                    self.bump();
                    let kind = if self.eat(TokenKind::BracketClose) {
                        TypeExprKind::Array(Box::new(ty))
                    } else {
                        let key = self.parse_type();
                        if !self.eat(TokenKind::BracketClose) {
                            let span = self.current_span();
                            self.diagnostics
                                .report(DiagnosticKind::UnclosedBracket, span)
                                .related_to("key type starts here", open)
                                .emit();
                        }
                        TypeExprKind::AssocArray {
                            value: Box::new(ty),
                            key: Box::new(key),
                        }
                    };
                    ty = TypeExpr {
                        kind,
                        range: self.range_from(start),
                    };
                }
                Some(kind @ (TokenKind::KwFunction | TokenKind::KwDelegate)) => {
                    self.bump();
                    let params = self.parse_params();
                    let attrs = self.parse_fn_attrs();
                    ty = TypeExpr {
                        kind: TypeExprKind::Callable {
                            ret: Box::new(ty),
                            params,
                            attrs,
                            is_delegate: kind == TokenKind::KwDelegate,
                        },
                        range: self.range_from(start),
                    };
                }
                _ => return ty,
            }
        }
    }

    fn parse_base_type(&mut self) -> TypeExpr {
        let span = self.current_span();
        let basic = match self.current() {
            Some(TokenKind::KwVoid) => BasicTypeName::Void,
            Some(TokenKind::KwBool) => BasicTypeName::Bool,
            Some(TokenKind::KwInt) => BasicTypeName::Int,
            Some(TokenKind::KwLong) => BasicTypeName::Long,
            Some(TokenKind::KwUint) => BasicTypeName::Uint,
            Some(TokenKind::KwChar) => BasicTypeName::Char,
            Some(TokenKind::KwDouble) => BasicTypeName::Double,
            Some(TokenKind::KwString) => BasicTypeName::String,
            Some(TokenKind::Ident) => {
                if let Some(name) = self.expect_ident() {
                    return TypeExpr {
                        kind: TypeExprKind::Named(name),
                        range: span,
                    };
                }
                return TypeExpr {
                    kind: TypeExprKind::Error,
                    range: span,
                };
            }
            _ => {
                self.error(DiagnosticKind::ExpectedType, span);
                return TypeExpr {
                    kind: TypeExprKind::Error,
                    range: span,
                };
            }
        };
        self.bump();
        TypeExpr {
            kind: TypeExprKind::Basic(basic),
            range: span,
        }
    }
}
