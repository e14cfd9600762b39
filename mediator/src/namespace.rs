//! Hierarchical namespace matching and the namespace table
//!
//! Namespaces are strings split into segments on a delimiter. A subscriber
//! namespace matches a published namespace when its segments are a
//! segment-wise prefix of the published ones:
//!
//! ```text
//! subscribed "foo"       receives  "foo", "foo::bar", "foo::bar::lol"
//! subscribed "foo"       ignores   "foox", "bar"
//! subscribed "foo::bar"  ignores   "foo"
//! ```

use crate::subscription::{Callback, Subscription};

/// Whether `outer` is an ancestor-or-equal namespace of `target`
///
/// Every segment of `outer` must equal the segment at the same position in
/// `target`; extra segments of `target` are ignored. Matching is exact and
/// case-sensitive.
///
/// ```rust
/// use mediator::namespace::namespace_match;
///
/// assert!(namespace_match("foo::bar", "foo", "::"));
/// assert!(!namespace_match("foo", "foo::bar", "::"));
/// assert!(!namespace_match("foox", "foo", "::"));
/// ```
pub fn namespace_match(target: &str, outer: &str, delimiter: &str) -> bool {
    let mut target_segments = target.split(delimiter);
    outer
        .split(delimiter)
        .all(|segment| target_segments.next() == Some(segment))
}

/// Which subscriptions a removal applies to
pub(crate) enum Selector<'a, A> {
    /// Every subscription of the matched namespaces, keys included
    All,

    /// Subscriptions created from this callback
    Callback(&'a Callback<A>),

    /// This subscription
    Subscription(&'a Subscription<A>),
}

impl<A> Selector<'_, A> {
    fn selects(&self, subscription: &Subscription<A>) -> bool {
        match self {
            Selector::All => true,
            Selector::Callback(callback) => subscription.callback().ptr_eq(callback),
            Selector::Subscription(target) => subscription == *target,
        }
    }
}

struct Bucket<A> {
    namespace: String,
    subscriptions: Vec<Subscription<A>>,
}

/// Insertion-ordered mapping from namespace to its subscriptions
///
/// Every lookup scans all keys for prefix matches, so a plain vector keeps
/// the key order without a second index.
pub(crate) struct NamespaceTable<A> {
    buckets: Vec<Bucket<A>>,
}

impl<A> NamespaceTable<A> {
    pub(crate) fn new() -> Self {
        Self {
            buckets: Vec::new(),
        }
    }

    /// Append a subscription to `namespace`, creating the key if absent
    pub(crate) fn insert(&mut self, namespace: &str, subscription: Subscription<A>) {
        match self
            .buckets
            .iter_mut()
            .find(|bucket| bucket.namespace == namespace)
        {
            Some(bucket) => bucket.subscriptions.push(subscription),
            None => self.buckets.push(Bucket {
                namespace: namespace.to_string(),
                subscriptions: vec![subscription],
            }),
        }
    }

    /// Subscriptions of every key that is an ancestor-or-equal of `target`
    ///
    /// Keys in insertion order, subscriptions in insertion order within
    /// each key.
    pub(crate) fn matching(&self, target: &str, delimiter: &str) -> Vec<Subscription<A>> {
        self.buckets
            .iter()
            .filter(|bucket| namespace_match(target, &bucket.namespace, delimiter))
            .flat_map(|bucket| bucket.subscriptions.iter().cloned())
            .collect()
    }

    /// Remove selected subscriptions from every key at or below `namespace`
    ///
    /// Returns the number of subscriptions removed.
    pub(crate) fn remove(
        &mut self,
        namespace: &str,
        delimiter: &str,
        selector: Selector<'_, A>,
    ) -> usize {
        let mut removed = 0;

        if let Selector::All = selector {
            self.buckets.retain(|bucket| {
                let matched = namespace_match(&bucket.namespace, namespace, delimiter);
                if matched {
                    removed += bucket.subscriptions.len();
                }
                !matched
            });
            return removed;
        }

        for bucket in self
            .buckets
            .iter_mut()
            .filter(|bucket| namespace_match(&bucket.namespace, namespace, delimiter))
        {
            let before = bucket.subscriptions.len();
            bucket
                .subscriptions
                .retain(|subscription| !selector.selects(subscription));
            removed += before - bucket.subscriptions.len();
        }

        removed
    }

    /// Namespace keys in insertion order
    pub(crate) fn namespaces(&self) -> Vec<String> {
        self.buckets
            .iter()
            .map(|bucket| bucket.namespace.clone())
            .collect()
    }

    /// Total number of stored subscriptions
    pub(crate) fn subscription_count(&self) -> usize {
        self.buckets
            .iter()
            .map(|bucket| bucket.subscriptions.len())
            .sum()
    }
}
