//! Specification Pattern implementation for composable business rules.
//!
//! Small, independently testable predicates over a candidate value are
//! composed into AND / OR / XOR / NOT trees that can be evaluated, combined
//! further, and rendered as readable descriptions.
//!
//! # Example
//!
//! ```ignore
//! use spec_rules::prelude::*;
//!
//! // Compose rules
//! let rule = Spec::leaf(IsRecent::new(cutoff))
//!     .and(Spec::leaf(TitleMentions::new("x")).or(Spec::leaf(ContentMentions::new("x"))));
//!
//! // Evaluate
//! if rule.evaluate(&token, &document).await? {
//!     // keep the document
//! }
//!
//! // (doc is recent AND (title mentions 'x' OR content mentions 'x'))
//! println!("{}", rule.describe());
//! ```
//!
//! # Evaluation
//!
//! Children are evaluated depth-first in insertion order. AND stops at the
//! first `false`, OR at the first `true`; XOR always needs both sides. The
//! first error from any leaf aborts the whole evaluation and is returned to
//! the caller as is.

pub mod error;
pub mod node;
pub mod operators;
pub mod specification;
pub mod vocabulary;

#[cfg(test)]
mod test_utils;

pub use error::{SpecError, SpecResult};
pub use operators::{all_of, any_of, IntoSpec, Spec};
pub use specification::{BoxedSpec, Specification};
pub use tokio_util::sync::CancellationToken;
pub use vocabulary::Vocabulary;

/// Prelude module - import everything you need with `use spec_rules::prelude::*`
pub mod prelude {
    pub use crate::error::{SpecError, SpecResult};
    pub use crate::node::{Children, Node};
    pub use crate::operators::{all_of, any_of, IntoSpec, Spec};
    pub use crate::specification::{AlwaysFalse, AlwaysTrue, BoxedSpec, FnSpec, Specification};
    pub use crate::vocabulary::{self, Vocabulary};
    pub use async_trait::async_trait;
    pub use tokio_util::sync::CancellationToken;
}
