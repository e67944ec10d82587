use rowan::TextRange;
use serde::{Serialize, Serializer};

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// Priority rationale:
/// - Unclosed delimiters derail everything after them
/// - Missing tokens are root causes the user should fix first
/// - Resolution errors assume valid syntax
/// - Discarded-value diagnostics assume a fully resolved expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    UnclosedParen,
    UnclosedBrace,
    UnclosedBracket,

    ExpectedExpression,
    ExpectedType,
    ExpectedIdentifier,
    ExpectedSemicolon,
    UnexpectedToken,

    DuplicateDefinition,
    UndefinedIdentifier,
    UnknownType,
    NotAValue,
    NotCallable,
    WrongArgumentCount,
    CannotDereference,
    NotIndexable,
    NotAClass,
    NotAssociative,

    NoEffect,
    ModuleHasNoEffect,
    DiscardedPureCall,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::DiscardedPureCall => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Base message, used when no detail is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnclosedParen => "missing closing `)`",
            Self::UnclosedBrace => "missing closing `}`",
            Self::UnclosedBracket => "missing closing `]`",

            Self::ExpectedExpression => "expected an expression",
            Self::ExpectedType => "expected a type",
            Self::ExpectedIdentifier => "expected an identifier",
            Self::ExpectedSemicolon => "expected `;`",
            Self::UnexpectedToken => "unexpected token",

            Self::DuplicateDefinition => "duplicate definition",
            Self::UndefinedIdentifier => "undefined identifier",
            Self::UnknownType => "unknown type",
            Self::NotAValue => "type used as a value",
            Self::NotCallable => "expression is not callable",
            Self::WrongArgumentCount => "wrong number of arguments",
            Self::CannotDereference => "cannot dereference a non-pointer",
            Self::NotIndexable => "expression cannot be indexed",
            Self::NotAClass => "`new` requires a class type",
            Self::NotAssociative => "expected an associative array",

            Self::NoEffect => "expression has no effect",
            Self::ModuleHasNoEffect => "module reference has no effect",
            Self::DiscardedPureCall => "discarded return value of a call without side effects",
        }
    }

    /// Template for custom messages. `{}` is replaced by the caller's detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::DuplicateDefinition => "`{}` is already defined".to_string(),
            Self::UndefinedIdentifier => "undefined identifier `{}`".to_string(),
            Self::UnknownType => "unknown type `{}`".to_string(),
            Self::NotAValue => "`{}` is a type, not a value".to_string(),
            Self::NotCallable => "`{}` is not callable".to_string(),
            Self::CannotDereference => "cannot dereference `{}`".to_string(),
            Self::NotIndexable => "`{}` cannot be indexed".to_string(),
            Self::NotAClass => "`{}` is not a class".to_string(),
            Self::NotAssociative => "`{}` is not an associative array".to_string(),
            Self::ModuleHasNoEffect => "module `{}` has no effect".to_string(),

            // Callers pass the full sentence
            Self::NoEffect | Self::DiscardedPureCall | Self::WrongArgumentCount => "{}".to_string(),

            Self::UnclosedParen | Self::UnclosedBrace | Self::UnclosedBracket => {
                format!("{}; {{}}", self.fallback_message())
            }

            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → `fallback_message()`
    /// - `Some(detail)` → `custom_message()` with `{}` replaced by detail
    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fix {
    pub(crate) replacement: String,
    pub(crate) description: String,
}

impl Fix {
    pub fn new(replacement: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
            description: description.into(),
        }
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedInfo {
    #[serde(serialize_with = "serialize_range")]
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) severity: Severity,
    #[serde(serialize_with = "serialize_range")]
    pub(crate) range: TextRange,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) fix: Option<Fix>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) related: Vec<RelatedInfo>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            range,
            message: message.into(),
            fix: None,
            related: Vec::new(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self::new(kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fix(&self) -> Option<&Fix> {
        self.fix.as_ref()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity,
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        if let Some(fix) = &self.fix {
            write!(f, " (fix: {})", fix.description)?;
        }
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct RangeRepr {
    start: u32,
    end: u32,
}

fn serialize_range<S: Serializer>(range: &TextRange, serializer: S) -> Result<S::Ok, S::Error> {
    RangeRepr {
        start: range.start().into(),
        end: range.end().into(),
    }
    .serialize(serializer)
}
