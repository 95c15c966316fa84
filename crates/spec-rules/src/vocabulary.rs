//! Display tokens for the logical operators.
//!
//! Rendering reads a [`Vocabulary`]; evaluation never does. Descriptions
//! can be rendered with an explicit vocabulary (`Spec::describe_with`,
//! [`Vocabulary::render`]) or with the process-wide one (`describe`), which
//! starts as `AND` / `OR` / `XOR` / `NOT` and may be swapped at any time.
//!
//! The process-wide value is replaced atomically as a whole: a concurrent
//! `describe` sees either the old tokens or the new ones, never a mix.

use serde::Deserialize;
use std::env;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use crate::operators::Spec;

/// Process-wide vocabulary used by `describe()`
static GLOBAL: LazyLock<RwLock<Arc<Vocabulary>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Vocabulary::default())));

/// Display tokens for AND, OR, XOR and NOT.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub and: String,
    pub or: String,
    pub xor: String,
    pub not: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new("AND", "OR", "XOR", "NOT")
    }
}

impl Vocabulary {
    pub fn new(
        and: impl Into<String>,
        or: impl Into<String>,
        xor: impl Into<String>,
        not: impl Into<String>,
    ) -> Self {
        Self {
            and: and.into(),
            or: or.into(),
            xor: xor.into(),
            not: not.into(),
        }
    }

    /// C-style symbols: `&&`, `||`, `!=`, `!`.
    pub fn symbolic() -> Self {
        Self::new("&&", "||", "!=", "!")
    }

    /// Load tokens from `SPEC_OP_AND`, `SPEC_OP_OR`, `SPEC_OP_XOR` and
    /// `SPEC_OP_NOT`. Unset or empty variables keep the default token.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Vocabulary::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let token = |key: &str, fallback: String| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(fallback)
        };

        Self {
            and: token("SPEC_OP_AND", defaults.and),
            or: token("SPEC_OP_OR", defaults.or),
            xor: token("SPEC_OP_XOR", defaults.xor),
            not: token("SPEC_OP_NOT", defaults.not),
        }
    }

    /// Render a specification tree with this vocabulary.
    pub fn render<T: Send + Sync + 'static>(&self, spec: &Spec<T>) -> String {
        spec.describe_with(self)
    }
}

/// Snapshot of the process-wide vocabulary.
pub fn current() -> Arc<Vocabulary> {
    let guard = GLOBAL.read().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(&guard)
}

/// Replace the process-wide vocabulary.
///
/// Affects every later `describe()` call, including on trees built earlier.
pub fn set_global(vocabulary: Vocabulary) {
    tracing::debug!(
        and = %vocabulary.and,
        or = %vocabulary.or,
        xor = %vocabulary.xor,
        not = %vocabulary.not,
        "Replacing operator vocabulary"
    );
    let mut guard = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    *guard = Arc::new(vocabulary);
}

/// Replace all four process-wide tokens at once.
pub fn set_operators(
    and: impl Into<String>,
    or: impl Into<String>,
    xor: impl Into<String>,
    not: impl Into<String>,
) {
    set_global(Vocabulary::new(and, or, xor, not));
}

/// Restore the default process-wide vocabulary.
pub fn reset() {
    set_global(Vocabulary::default());
}
