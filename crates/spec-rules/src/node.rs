//! Composite tree nodes.
//!
//! A tree is built from a closed set of node kinds. Children are evaluated
//! depth-first in insertion order and rendered the same way. Nodes are never
//! modified after construction, so subtrees can be shared freely.

use tokio_util::sync::CancellationToken;

use crate::error::{SpecError, SpecResult};
use crate::operators::Spec;
use crate::specification::{BoxedSpec, Specification};
use crate::vocabulary::Vocabulary;

/// One node of a specification tree.
pub enum Node<T> {
    /// Caller-supplied predicate, opaque to the engine
    Leaf(BoxedSpec<T>),
    /// All children must hold; stops at the first `false`
    And(Children<T>),
    /// Any child must hold; stops at the first `true`
    Or(Children<T>),
    /// Exactly one side must hold; both sides are always needed
    Xor(Spec<T>, Spec<T>),
    /// Logical complement of the child
    Not(Spec<T>),
    /// Checks the token before evaluating the child
    Guard(Spec<T>),
}

/// Ordered, non-empty list of child specifications.
pub struct Children<T> {
    first: Spec<T>,
    rest: Vec<Spec<T>>,
}

impl<T> Children<T> {
    pub fn new(first: Spec<T>, rest: Vec<Spec<T>>) -> Self {
        Self { first, rest }
    }

    /// Returns `None` for an empty list.
    pub fn from_vec(specs: Vec<Spec<T>>) -> Option<Self> {
        let mut iter = specs.into_iter();
        let first = iter.next()?;
        Some(Self::new(first, iter.collect()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spec<T>> + '_ {
        std::iter::once(&self.first).chain(self.rest.iter())
    }
}

impl<T: Send + Sync + 'static> Node<T> {
    pub(crate) async fn evaluate(
        &self,
        token: &CancellationToken,
        candidate: &T,
    ) -> SpecResult<bool> {
        match self {
            Node::Leaf(spec) => spec.evaluate(token, candidate).await,
            Node::And(children) => {
                for child in children.iter() {
                    if !child.evaluate(token, candidate).await? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Node::Or(children) => {
                for child in children.iter() {
                    if child.evaluate(token, candidate).await? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Node::Xor(left, right) => {
                let left = left.evaluate(token, candidate).await?;
                let right = right.evaluate(token, candidate).await?;
                Ok(left != right)
            }
            Node::Not(child) => Ok(!child.evaluate(token, candidate).await?),
            Node::Guard(child) => {
                if token.is_cancelled() {
                    return Err(SpecError::Cancelled);
                }
                child.evaluate(token, candidate).await
            }
        }
    }

    pub(crate) fn render(&self, vocabulary: &Vocabulary, out: &mut String) {
        match self {
            Node::Leaf(spec) => out.push_str(&spec.describe_with(vocabulary)),
            Node::And(children) => render_infix(children.iter(), &vocabulary.and, vocabulary, out),
            Node::Or(children) => render_infix(children.iter(), &vocabulary.or, vocabulary, out),
            Node::Xor(left, right) => {
                render_infix([left, right].into_iter(), &vocabulary.xor, vocabulary, out)
            }
            Node::Not(child) => {
                out.push_str(&vocabulary.not);
                out.push('(');
                child.render(vocabulary, out);
                out.push(')');
            }
            Node::Guard(child) => child.render(vocabulary, out),
        }
    }
}

fn render_infix<'a, T, I>(children: I, token: &str, vocabulary: &Vocabulary, out: &mut String)
where
    T: Send + Sync + 'static,
    I: Iterator<Item = &'a Spec<T>>,
{
    out.push('(');
    for (i, child) in children.enumerate() {
        if i > 0 {
            out.push(' ');
            out.push_str(token);
            out.push(' ');
        }
        child.render(vocabulary, out);
    }
    out.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Probe;

    fn token() -> CancellationToken {
        CancellationToken::new()
    }

    #[tokio::test]
    async fn test_and_short_circuits_on_false() {
        let falsy = Probe::failing("a");
        let boom = Probe::erroring("b");
        let boom_calls = boom.calls();

        let rule = Spec::leaf(falsy).and(Spec::leaf(boom));
        assert!(!rule.evaluate(&token(), &()).await.unwrap());
        assert_eq!(boom_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_or_short_circuits_on_true() {
        let truthy = Probe::passing("a");
        let boom = Probe::erroring("b");
        let boom_calls = boom.calls();

        let rule = Spec::leaf(truthy).or(Spec::leaf(boom));
        assert!(rule.evaluate(&token(), &()).await.unwrap());
        assert_eq!(boom_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_error_aborts_and_is_returned_unchanged() {
        let boom = Probe::erroring("boom");
        let after = Probe::passing("after");
        let after_calls = after.calls();

        let rule = Spec::leaf(boom).and(Spec::leaf(after));
        let err = rule.evaluate(&token(), &()).await.unwrap_err();
        assert!(matches!(err, SpecError::Failed(ref m) if m == "boom exploded"));
        assert_eq!(after_calls.get(), 0);

        let rule = Spec::leaf(Probe::failing("x")).or(Spec::leaf(Probe::erroring("deep")));
        let err = rule.evaluate(&token(), &()).await.unwrap_err();
        assert_eq!(err.to_string(), "Predicate failed: deep exploded");
    }

    #[tokio::test]
    async fn test_children_run_in_insertion_order() {
        let order = Probe::order_log();
        let rule = Spec::leaf(Probe::passing("1").logging_to(&order)).and_all(
            Spec::leaf(Probe::passing("2").logging_to(&order)),
            [Spec::leaf(Probe::passing("3").logging_to(&order))],
        );
        assert!(rule.evaluate(&token(), &()).await.unwrap());
        assert_eq!(*order.lock().unwrap(), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_xor_truth_table() {
        for (a, b) in [(true, true), (true, false), (false, true), (false, false)] {
            let rule = Spec::always(a).xor(Spec::always(b));
            assert_eq!(rule.evaluate(&token(), &()).await.unwrap(), a != b, "{a} xor {b}");
        }
    }

    #[tokio::test]
    async fn test_xor_evaluates_both_sides_and_stops_on_left_error() {
        let right = Probe::passing("r");
        let right_calls = right.calls();
        let rule = Spec::leaf(Probe::passing("l")).xor(Spec::leaf(right));
        assert!(!rule.evaluate(&token(), &()).await.unwrap());
        assert_eq!(right_calls.get(), 1);

        let right = Probe::passing("r");
        let right_calls = right.calls();
        let rule = Spec::leaf(Probe::erroring("l")).xor(Spec::leaf(right));
        assert!(rule.evaluate(&token(), &()).await.is_err());
        assert_eq!(right_calls.get(), 0);

        let rule = Spec::leaf(Probe::passing("l")).xor(Spec::leaf(Probe::erroring("r")));
        let err = rule.evaluate(&token(), &()).await.unwrap_err();
        assert_eq!(err.to_string(), "Predicate failed: r exploded");
    }

    #[tokio::test]
    async fn test_not_propagates_error() {
        let rule = Spec::leaf(Probe::erroring("inner")).not();
        assert!(rule.evaluate(&token(), &()).await.is_err());

        let rule = Spec::always(false).not();
        assert!(rule.evaluate(&token(), &()).await.unwrap());
    }

    #[tokio::test]
    async fn test_composites_ignore_cancelled_token() {
        let cancelled = token();
        cancelled.cancel();
        let leaf = Probe::passing("b");
        let calls = leaf.calls();

        let rule = Spec::always(true).and(Spec::leaf(leaf));
        assert!(rule.evaluate(&cancelled, &()).await.unwrap());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_guard_stops_on_cancelled_token() {
        let cancelled = token();
        cancelled.cancel();
        let leaf = Probe::passing("b");
        let calls = leaf.calls();

        let rule = Spec::always(true).and(Spec::leaf(leaf).guarded());
        let err = rule.evaluate(&cancelled, &()).await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(calls.get(), 0);

        let rule = Spec::always(true).and(Spec::always(true).guarded());
        assert!(rule.evaluate(&token(), &()).await.unwrap());
    }

    #[test]
    fn test_render_shapes() {
        let vocabulary = Vocabulary::default();
        let a = Spec::<()>::leaf(Probe::passing("A"));
        let b = Spec::<()>::leaf(Probe::passing("B"));
        let c = Spec::<()>::leaf(Probe::passing("C"));

        assert_eq!(a.clone().and(&b).describe_with(&vocabulary), "(A AND B)");
        assert_eq!(
            a.clone().or_all(&b, [&c]).describe_with(&vocabulary),
            "(A OR B OR C)"
        );
        assert_eq!(a.clone().xor(&b).describe_with(&vocabulary), "(A XOR B)");
        assert_eq!(a.clone().not().describe_with(&vocabulary), "NOT(A)");
        assert_eq!(
            a.clone().and(&b).and(&c).describe_with(&vocabulary),
            "((A AND B) AND C)"
        );
        assert_eq!(a.guarded().not().describe_with(&vocabulary), "NOT(A)");
    }

    #[test]
    fn test_nested_tree_leaf_uses_given_vocabulary() {
        let symbolic = Vocabulary::symbolic();
        let a = Spec::<()>::leaf(Probe::passing("A"));
        let b = Spec::<()>::leaf(Probe::passing("B"));
        let inner = a.and(&b);

        let boxed: BoxedSpec<()> = std::sync::Arc::new(inner.clone());
        let rule = Spec::always(true).or(boxed);
        assert_eq!(rule.describe_with(&symbolic), "(always true || (A && B))");

        let rule = Spec::leaf(inner.clone()).not();
        assert_eq!(rule.describe_with(&symbolic), "!((A && B))");
        assert_eq!(rule.describe_with(&Vocabulary::default()), "NOT((A AND B))");
    }

    #[test]
    fn test_children_from_vec() {
        assert!(Children::<()>::from_vec(Vec::new()).is_none());
        let children = Children::from_vec(vec![Spec::<()>::always(true), Spec::always(false)])
            .expect("two children");
        assert_eq!(children.iter().count(), 2);
    }
}
