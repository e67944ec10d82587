//! ANSI color codes for terminal dumps.
//!
//! Roles:
//! - kind: expression kind names
//! - ty: type names
//! - effect: the shallow-effect marker
//! - dim: structure and metadata

/// ANSI palette for `sidefx dump`.
///
/// Standard 16-color codes only, readable on light and dark themes.
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    pub kind: &'static str,
    pub ty: &'static str,
    pub effect: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        kind: "\x1b[34m",
        ty: "\x1b[32m",
        effect: "\x1b[31m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        kind: "",
        ty: "",
        effect: "",
        dim: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.reset.is_empty()
    }
}
