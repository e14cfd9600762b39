//! Namespace mediator with hierarchical dispatch
//!
//! The `Mediator` owns the namespace table and implements registration,
//! removal, hierarchical lookup and fan-out publish on top of
//! [`Subscription`].

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde_json::Value;

use crate::config::MediatorConfig;
use crate::error::{CallbackResult, Result};
use crate::namespace::{self, NamespaceTable, Selector};
use crate::signal::Signal;
use crate::subscription::{Callback, Context, Subscription, SubscriptionOptions};

struct Shared<A> {
    configuration: MediatorConfig,
    namespaces: RwLock<NamespaceTable<A>>,
}

/// Hierarchical publish/subscribe mediator
///
/// Callbacks subscribe to namespaces such as `"foo::bar"`; publishing to a
/// namespace invokes every callback subscribed to it or to any of its
/// ancestors. The argument type `A` is what `publish` hands to callbacks and
/// defaults to `serde_json::Value`.
///
/// Clones share the same namespace table.
///
/// # Example
///
/// ```rust
/// use mediator::Mediator;
/// use std::sync::atomic::{AtomicI64, Ordering};
/// use std::sync::Arc;
///
/// let mediator = Mediator::<i64>::new();
/// let total = Arc::new(AtomicI64::new(0));
///
/// let sink = total.clone();
/// mediator.subscribe("foo", move |_ctx, args| {
///     sink.fetch_add(args[0], Ordering::SeqCst);
///     Ok(())
/// });
///
/// assert!(mediator.publish("foo::bar", &[2]).unwrap());
/// assert!(!mediator.publish("bar", &[5]).unwrap());
/// assert_eq!(total.load(Ordering::SeqCst), 2);
/// ```
pub struct Mediator<A = Value> {
    inner: Arc<Shared<A>>,
}

impl<A: 'static> Mediator<A> {
    /// Create a new Mediator with default configuration
    pub fn new() -> Self {
        Self::from_config(MediatorConfig::default())
    }

    /// Create a new Mediator with custom configuration
    ///
    /// Fails with `InvalidArgument` if the configuration does not validate.
    pub fn with_config(config: MediatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(configuration: MediatorConfig) -> Self {
        Self {
            inner: Arc::new(Shared {
                configuration,
                namespaces: RwLock::new(NamespaceTable::new()),
            }),
        }
    }

    /// The configuration this mediator was created with
    pub fn configuration(&self) -> &MediatorConfig {
        &self.inner.configuration
    }

    /// Subscribe a closure to `namespace`
    ///
    /// The closure is invoked with the subscription itself as its context.
    /// Use [`subscribe_with`](Self::subscribe_with) to supply a context or
    /// to reuse a [`Callback`] handle.
    pub fn subscribe<F>(&self, namespace: &str, callback: F) -> Subscription<A>
    where
        F: Fn(&Context<'_, A>, &[A]) -> CallbackResult + Send + Sync + 'static,
    {
        self.register(namespace, Subscription::new(Callback::new(callback), None))
    }

    /// Subscribe to `namespace` from structured options
    ///
    /// Fails with `InvalidArgument` when the options carry no callback.
    pub fn subscribe_with(
        &self,
        namespace: &str,
        options: SubscriptionOptions<A>,
    ) -> Result<Subscription<A>> {
        let subscription = Subscription::from_options(options)?;
        Ok(self.register(namespace, subscription))
    }

    fn register(&self, namespace: &str, subscription: Subscription<A>) -> Subscription<A> {
        let mediator = Arc::downgrade(&self.inner);
        let owned_namespace = namespace.to_string();

        // The table holds the subscription, so the listener must only hold a
        // weak reference back to it.
        subscription.once(Signal::Cancel, move |canceled| {
            if let Some(mediator) = upgrade(&mediator) {
                mediator.unsubscribe_subscription(&owned_namespace, canceled);
            }
        });

        self.inner
            .namespaces
            .write()
            .insert(namespace, subscription.clone());

        tracing::debug!(
            namespace,
            subscription = %subscription.id(),
            "subscribed"
        );

        subscription
    }

    /// Remove every subscription at or below `namespace`
    ///
    /// The namespace keys themselves are dropped. Returns the number of
    /// subscriptions removed; unknown namespaces remove nothing.
    pub fn unsubscribe(&self, namespace: &str) -> usize {
        self.remove(namespace, Selector::All)
    }

    /// Remove subscriptions created from `callback` at or below `namespace`
    pub fn unsubscribe_callback(&self, namespace: &str, callback: &Callback<A>) -> usize {
        self.remove(namespace, Selector::Callback(callback))
    }

    /// Remove `subscription` if it is stored at or below `namespace`
    ///
    /// This does not cancel the handle; it only stops the mediator from
    /// dispatching to it.
    pub fn unsubscribe_subscription(
        &self,
        namespace: &str,
        subscription: &Subscription<A>,
    ) -> usize {
        self.remove(namespace, Selector::Subscription(subscription))
    }

    fn remove(&self, namespace: &str, selector: Selector<'_, A>) -> usize {
        let removed = self.inner.namespaces.write().remove(
            namespace,
            &self.inner.configuration.namespace_delimiter,
            selector,
        );

        tracing::debug!(namespace, removed, "unsubscribed");
        removed
    }

    /// Publish `args` to `namespace`
    ///
    /// Triggers every subscription whose namespace is an ancestor-or-equal of
    /// `namespace`, in resolution order. Returns `Ok(false)` when nothing
    /// matched and `Ok(true)` otherwise.
    ///
    /// The matching subscriptions are collected before any callback runs:
    /// subscriptions added by a callback are not reached by this publish,
    /// and subscriptions canceled by a callback are skipped. The first
    /// failing callback aborts the rest of the dispatch and its error is
    /// returned.
    ///
    /// Skipping canceled entries departs from calling
    /// [`Subscription::trigger`] on them, which fails with `InvalidState`:
    /// a cancel issued mid-dispatch never turns into a publish error.
    pub fn publish(&self, namespace: &str, args: &[A]) -> Result<bool> {
        let subscriptions = self.get_subscriptions_for_namespace(namespace);

        if subscriptions.is_empty() {
            tracing::trace!(namespace, "publish matched no subscriptions");
            return Ok(false);
        }

        tracing::trace!(
            namespace,
            subscriptions = subscriptions.len(),
            "publishing"
        );

        for subscription in &subscriptions {
            if subscription.is_canceled() {
                continue;
            }
            subscription.trigger(args)?;
        }

        Ok(true)
    }

    /// Subscriptions that a publish to `namespace` would trigger
    ///
    /// Namespace keys in subscription order, and within each key the
    /// subscriptions in the order they were added.
    pub fn get_subscriptions_for_namespace(&self, namespace: &str) -> Vec<Subscription<A>> {
        self.inner
            .namespaces
            .read()
            .matching(namespace, &self.inner.configuration.namespace_delimiter)
    }

    /// Whether `outer` is an ancestor-or-equal namespace of `target`
    ///
    /// Uses this mediator's delimiter, see [`namespace::namespace_match`].
    pub fn namespace_match(&self, target: &str, outer: &str) -> bool {
        namespace::namespace_match(
            target,
            outer,
            &self.inner.configuration.namespace_delimiter,
        )
    }

    /// Namespace keys in the order they were first subscribed to
    pub fn namespaces(&self) -> Vec<String> {
        self.inner.namespaces.read().namespaces()
    }

    /// Total number of stored subscriptions
    pub fn subscription_count(&self) -> usize {
        self.inner.namespaces.read().subscription_count()
    }

    /// Whether no subscriptions are stored
    pub fn is_empty(&self) -> bool {
        self.subscription_count() == 0
    }
}

fn upgrade<A>(weak: &Weak<Shared<A>>) -> Option<Mediator<A>> {
    weak.upgrade().map(|inner| Mediator { inner })
}

impl<A: 'static> Default for Mediator<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for Mediator<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> fmt::Debug for Mediator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let namespaces = self.inner.namespaces.read();
        f.debug_struct("Mediator")
            .field("configuration", &self.inner.configuration)
            .field("namespaces", &namespaces.namespaces())
            .field("subscriptions", &namespaces.subscription_count())
            .finish()
    }
}
