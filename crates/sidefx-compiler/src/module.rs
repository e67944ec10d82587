//! Staged facade: source text to analyzed module.
//!
//! `ModuleBuilder::parse` → [`ModuleParsed`] → `analyze` → [`ModuleAnalyzed`].
//! Each stage keeps the diagnostics of the stages before it.

use crate::analyze::check_discarded_values;
use crate::diagnostics::{DiagnosticContext, Diagnostics, WarningMode};
use crate::parser::ast::SourceFile;
use crate::parser::parse_with_limits;
use crate::sema::{Program, lower};
use crate::{Error, Result};

pub const DEFAULT_PARSE_FUEL: u32 = 1_000_000;
pub const DEFAULT_RECURSION_LIMIT: u32 = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModuleConfig {
    pub parse_fuel: u32,
    pub parse_recursion_limit: u32,
    pub warnings: WarningMode,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            parse_fuel: DEFAULT_PARSE_FUEL,
            parse_recursion_limit: DEFAULT_RECURSION_LIMIT,
            warnings: WarningMode::default(),
        }
    }
}

pub struct ModuleBuilder<'s> {
    source: &'s str,
    config: ModuleConfig,
}

impl<'s> ModuleBuilder<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            config: ModuleConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ModuleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_parse_fuel(mut self, fuel: u32) -> Self {
        self.config.parse_fuel = fuel;
        self
    }

    pub fn with_parse_recursion_limit(mut self, limit: u32) -> Self {
        self.config.parse_recursion_limit = limit;
        self
    }

    pub fn with_warnings(mut self, warnings: WarningMode) -> Self {
        self.config.warnings = warnings;
        self
    }

    /// Parse the source. Fails only when a parse budget is exhausted.
    pub fn parse(self) -> Result<ModuleParsed<'s>> {
        let (ast, diagnostics) = parse_with_limits(
            self.source,
            self.config.parse_fuel,
            self.config.parse_recursion_limit,
        )?;
        tracing::debug!(
            items = ast.items.len(),
            errors = diagnostics.error_count(),
            "parsed module"
        );
        Ok(ModuleParsed {
            source: self.source,
            config: self.config,
            ast,
            diagnostics,
        })
    }
}

pub struct ModuleParsed<'s> {
    source: &'s str,
    config: ModuleConfig,
    ast: SourceFile,
    diagnostics: Diagnostics,
}

impl<'s> ModuleParsed<'s> {
    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn ast(&self) -> &SourceFile {
        &self.ast
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn is_valid(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    pub fn into_result(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::ParseFailed(self.diagnostics))
        }
    }

    /// Lower the syntax tree and check every discarded value.
    pub fn analyze(self) -> ModuleAnalyzed<'s> {
        let mut ctx = DiagnosticContext::with_diagnostics(self.diagnostics, self.config.warnings);
        let program = lower(&self.ast, self.source, &mut ctx);
        check_discarded_values(&program, &mut ctx);
        tracing::debug!(
            errors = ctx.diagnostics().error_count(),
            warnings = ctx.diagnostics().warning_count(),
            gagged = ctx.gagged_errors(),
            "analyzed module"
        );
        ModuleAnalyzed {
            source: self.source,
            program,
            ctx,
        }
    }
}

pub struct ModuleAnalyzed<'s> {
    source: &'s str,
    program: Program,
    ctx: DiagnosticContext,
}

impl<'s> ModuleAnalyzed<'s> {
    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        self.ctx.diagnostics()
    }

    pub fn context(&self) -> &DiagnosticContext {
        &self.ctx
    }

    /// No errors, and no warnings when warnings count as errors.
    pub fn is_valid(&self) -> bool {
        !self.ctx.has_failures()
    }

    pub fn into_result(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::AnalysisFailed(self.ctx.into_diagnostics()))
        }
    }
}

impl<'s> TryFrom<&'s str> for ModuleAnalyzed<'s> {
    type Error = Error;

    fn try_from(source: &'s str) -> Result<Self> {
        Ok(ModuleBuilder::new(source).parse()?.analyze())
    }
}
