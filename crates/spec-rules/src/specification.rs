//! Core Specification trait and leaf predicates.

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::error::SpecResult;
use crate::operators::{IntoSpec, Spec};
use crate::vocabulary::Vocabulary;

/// Core specification trait for composable business rules.
///
/// Anything that can decide whether a candidate satisfies a rule, and say
/// in words what the rule is, is a specification. Leaf rules implement this
/// directly; composite trees built with [`Spec`] implement it as well.
///
/// `evaluate` must not mutate the candidate and should depend only on the
/// token and the candidate. `describe` must be callable at any time, whether
/// or not the rule was ever evaluated.
#[async_trait]
pub trait Specification<T>: Send + Sync {
    /// Check whether `candidate` satisfies this specification.
    ///
    /// The token is threaded down the whole tree. Leaves doing slow work
    /// may watch it; composite nodes never check it on their own.
    async fn evaluate(&self, token: &CancellationToken, candidate: &T) -> SpecResult<bool>;

    /// Human-readable description of the rule.
    fn describe(&self) -> String;

    /// Description rendered with an explicit operator vocabulary.
    ///
    /// Leaves have no operators, so the default ignores the vocabulary.
    /// Composite trees override it to render every nested level with it.
    fn describe_with(&self, _vocabulary: &Vocabulary) -> String {
        self.describe()
    }

    /// Combine this specification with another using AND logic.
    fn and(self, other: impl IntoSpec<T>) -> Spec<T>
    where
        Self: Sized + 'static,
        T: Send + Sync + 'static,
    {
        Spec::leaf(self).and(other)
    }

    /// Combine this specification with another using OR logic.
    fn or(self, other: impl IntoSpec<T>) -> Spec<T>
    where
        Self: Sized + 'static,
        T: Send + Sync + 'static,
    {
        Spec::leaf(self).or(other)
    }

    /// Combine this specification with another using XOR logic.
    fn xor(self, other: impl IntoSpec<T>) -> Spec<T>
    where
        Self: Sized + 'static,
        T: Send + Sync + 'static,
    {
        Spec::leaf(self).xor(other)
    }

    /// Negate this specification.
    fn not(self) -> Spec<T>
    where
        Self: Sized + 'static,
        T: Send + Sync + 'static,
    {
        Spec::leaf(self).not()
    }
}

/// A boxed specification for dynamic dispatch.
pub type BoxedSpec<T> = Arc<dyn Specification<T>>;

#[async_trait]
impl<T: Send + Sync> Specification<T> for BoxedSpec<T> {
    async fn evaluate(&self, token: &CancellationToken, candidate: &T) -> SpecResult<bool> {
        self.as_ref().evaluate(token, candidate).await
    }

    fn describe(&self) -> String {
        self.as_ref().describe()
    }

    fn describe_with(&self, vocabulary: &Vocabulary) -> String {
        self.as_ref().describe_with(vocabulary)
    }
}

/// A specification that always returns true.
#[derive(Debug, Clone, Copy)]
pub struct AlwaysTrue;

#[async_trait]
impl<T: Send + Sync> Specification<T> for AlwaysTrue {
    async fn evaluate(&self, _token: &CancellationToken, _candidate: &T) -> SpecResult<bool> {
        Ok(true)
    }

    fn describe(&self) -> String {
        "always true".to_string()
    }
}

/// A specification that always returns false.
#[derive(Debug, Clone, Copy)]
pub struct AlwaysFalse;

#[async_trait]
impl<T: Send + Sync> Specification<T> for AlwaysFalse {
    async fn evaluate(&self, _token: &CancellationToken, _candidate: &T) -> SpecResult<bool> {
        Ok(false)
    }

    fn describe(&self) -> String {
        "always false".to_string()
    }
}

/// Leaf specification backed by a plain function or closure.
///
/// Usually built through [`Spec::from_fn`].
pub struct FnSpec<F> {
    description: String,
    predicate: F,
}

impl<F> FnSpec<F> {
    pub fn new<T>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&CancellationToken, &T) -> SpecResult<bool>,
    {
        Self {
            description: description.into(),
            predicate,
        }
    }
}

#[async_trait]
impl<T, F> Specification<T> for FnSpec<F>
where
    T: Send + Sync,
    F: Fn(&CancellationToken, &T) -> SpecResult<bool> + Send + Sync,
{
    async fn evaluate(&self, token: &CancellationToken, candidate: &T) -> SpecResult<bool> {
        (self.predicate)(token, candidate)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}
