//! Composite builder and operator overloading.
//!
//! [`Spec`] is a cheap, clonable handle on an immutable specification tree.
//! Every combinator returns a new node wrapping the existing tree and the new
//! operand; nothing is evaluated while building.
//!
//! Besides the named methods, `BitAnd` (&), `BitOr` (|), `BitXor` (^) and
//! `Not` (!) are implemented, allowing intuitive syntax like:
//!
//! ```ignore
//! let rule = Spec::leaf(IsRecent) & (Spec::leaf(TitleMentions("x")) | Spec::leaf(BodyMentions("x")));
//! ```

use async_trait::async_trait;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not as StdNot};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::error::SpecResult;
use crate::node::{Children, Node};
use crate::specification::{AlwaysFalse, AlwaysTrue, BoxedSpec, FnSpec, Specification};
use crate::vocabulary::{self, Vocabulary};

/// Handle on a specification tree, leaf or composite.
///
/// Cloning shares the tree. The same handle may appear in any number of
/// other trees and be evaluated from several tasks at once.
pub struct Spec<T>(Arc<Node<T>>);

impl<T> Clone for Spec<T> {
    fn clone(&self) -> Self {
        Spec(Arc::clone(&self.0))
    }
}

/// Conversion accepted by every combinator.
pub trait IntoSpec<T> {
    fn into_spec(self) -> Spec<T>;
}

impl<T> IntoSpec<T> for Spec<T> {
    fn into_spec(self) -> Spec<T> {
        self
    }
}

impl<T> IntoSpec<T> for &Spec<T> {
    fn into_spec(self) -> Spec<T> {
        self.clone()
    }
}

impl<T: Send + Sync + 'static> IntoSpec<T> for BoxedSpec<T> {
    fn into_spec(self) -> Spec<T> {
        Spec::from_boxed(self)
    }
}

impl<T: Send + Sync + 'static> Spec<T> {
    fn from_node(node: Node<T>) -> Self {
        Spec(Arc::new(node))
    }

    /// Wrap a leaf predicate so it can be composed.
    pub fn leaf<S: Specification<T> + 'static>(spec: S) -> Self {
        Self::from_boxed(Arc::new(spec))
    }

    pub fn from_boxed(spec: BoxedSpec<T>) -> Self {
        Self::from_node(Node::Leaf(spec))
    }

    /// Leaf from a closure, no named type required.
    pub fn from_fn<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&CancellationToken, &T) -> SpecResult<bool> + Send + Sync + 'static,
    {
        Self::leaf(FnSpec::new(description, predicate))
    }

    /// Constant leaf (`AlwaysTrue` or `AlwaysFalse`).
    pub fn always(value: bool) -> Self {
        if value {
            Self::leaf(AlwaysTrue)
        } else {
            Self::leaf(AlwaysFalse)
        }
    }

    /// Root node of this tree.
    pub fn node(&self) -> &Node<T> {
        &self.0
    }

    /// Conjunction of this specification and `other`.
    pub fn and(self, other: impl IntoSpec<T>) -> Self {
        self.and_all(other, std::iter::empty::<Spec<T>>())
    }

    /// Conjunction of this specification, `other` and every item of `more`,
    /// evaluated in that order.
    pub fn and_all<I>(self, other: impl IntoSpec<T>, more: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoSpec<T>,
    {
        Self::from_node(Node::And(Children::new(self, operands(other, more))))
    }

    /// Disjunction of this specification and `other`.
    pub fn or(self, other: impl IntoSpec<T>) -> Self {
        self.or_all(other, std::iter::empty::<Spec<T>>())
    }

    /// Disjunction of this specification, `other` and every item of `more`,
    /// evaluated in that order.
    pub fn or_all<I>(self, other: impl IntoSpec<T>, more: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoSpec<T>,
    {
        Self::from_node(Node::Or(Children::new(self, operands(other, more))))
    }

    /// Exclusive-or of this specification and `other`.
    pub fn xor(self, other: impl IntoSpec<T>) -> Self {
        Self::from_node(Node::Xor(self, other.into_spec()))
    }

    /// Negate this specification.
    pub fn not(self) -> Self {
        Self::from_node(Node::Not(self))
    }

    /// Cancellation checkpoint: if the token is already cancelled when this
    /// subtree is reached, evaluation stops with `SpecError::Cancelled`.
    /// Invisible in descriptions.
    pub fn guarded(self) -> Self {
        Self::from_node(Node::Guard(self))
    }

    /// Describe the tree with the given vocabulary instead of the global one.
    pub fn describe_with(&self, vocabulary: &Vocabulary) -> String {
        let mut out = String::new();
        self.render(vocabulary, &mut out);
        out
    }

    pub(crate) fn render(&self, vocabulary: &Vocabulary, out: &mut String) {
        self.0.render(vocabulary, out);
    }
}

fn operands<T, I>(other: impl IntoSpec<T>, more: I) -> Vec<Spec<T>>
where
    I: IntoIterator,
    I::Item: IntoSpec<T>,
{
    let mut specs = vec![other.into_spec()];
    specs.extend(more.into_iter().map(IntoSpec::into_spec));
    specs
}

/// All specifications in the collection must be satisfied.
///
/// An empty collection is vacuously true.
pub fn all_of<T, I>(specs: I) -> Spec<T>
where
    T: Send + Sync + 'static,
    I: IntoIterator,
    I::Item: IntoSpec<T>,
{
    let specs: Vec<Spec<T>> = specs.into_iter().map(IntoSpec::into_spec).collect();
    match Children::from_vec(specs) {
        Some(children) => Spec::from_node(Node::And(children)),
        None => Spec::always(true),
    }
}

/// Any specification in the collection must be satisfied.
///
/// An empty collection is false.
pub fn any_of<T, I>(specs: I) -> Spec<T>
where
    T: Send + Sync + 'static,
    I: IntoIterator,
    I::Item: IntoSpec<T>,
{
    let specs: Vec<Spec<T>> = specs.into_iter().map(IntoSpec::into_spec).collect();
    match Children::from_vec(specs) {
        Some(children) => Spec::from_node(Node::Or(children)),
        None => Spec::always(false),
    }
}

impl<T: Send + Sync + 'static, R: IntoSpec<T>> BitAnd<R> for Spec<T> {
    type Output = Spec<T>;

    fn bitand(self, rhs: R) -> Self::Output {
        self.and(rhs)
    }
}

impl<T: Send + Sync + 'static, R: IntoSpec<T>> BitOr<R> for Spec<T> {
    type Output = Spec<T>;

    fn bitor(self, rhs: R) -> Self::Output {
        self.or(rhs)
    }
}

impl<T: Send + Sync + 'static, R: IntoSpec<T>> BitXor<R> for Spec<T> {
    type Output = Spec<T>;

    fn bitxor(self, rhs: R) -> Self::Output {
        self.xor(rhs)
    }
}

impl<T: Send + Sync + 'static> StdNot for Spec<T> {
    type Output = Spec<T>;

    fn not(self) -> Self::Output {
        Spec::not(self)
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Specification<T> for Spec<T> {
    async fn evaluate(&self, token: &CancellationToken, candidate: &T) -> SpecResult<bool> {
        self.0.evaluate(token, candidate).await
    }

    /// Renders with the process-wide vocabulary.
    fn describe(&self) -> String {
        Spec::describe_with(self, &vocabulary::current())
    }

    fn describe_with(&self, vocabulary: &Vocabulary) -> String {
        Spec::describe_with(self, vocabulary)
    }
}

impl<T: Send + Sync + 'static> fmt::Debug for Spec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Spec")
            .field(&self.describe_with(&Vocabulary::default()))
            .finish()
    }
}
