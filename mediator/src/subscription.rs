//! Cancelable callback subscriptions
//!
//! A `Subscription` wraps one callback together with the context it is
//! invoked with and a lifecycle state. It works on its own; the mediator only
//! stores subscriptions and listens for their cancel signal.
//!
//! # Example
//!
//! ```rust
//! use mediator::{Callback, Subscription};
//!
//! let subscription = Subscription::new(
//!     Callback::new(|_ctx, args: &[i32]| {
//!         assert_eq!(args, &[1, 2]);
//!         Ok(())
//!     }),
//!     None,
//! );
//!
//! subscription.trigger(&[1, 2]).unwrap();
//!
//! subscription.cancel();
//! assert!(subscription.trigger(&[]).is_err());
//! ```

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{CallbackResult, MediatorError, Result};
use crate::signal::{ListenerId, Listeners, Signal};

/// Context value shared with a callback as its receiver
pub type SharedContext = Arc<dyn Any + Send + Sync>;

type CallbackFn<A> = dyn Fn(&Context<'_, A>, &[A]) -> CallbackResult + Send + Sync;

type ListenerFn<A> = dyn Fn(&Subscription<A>) + Send + Sync;

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Numeric value of the id
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscription#{}", self.0)
    }
}

/// Lifecycle state of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Active,
    Canceled,
}

/// Shared handle to a user callback
///
/// Cloning is cheap and keeps the identity: two handles compare equal with
/// [`Callback::ptr_eq`] iff they were cloned from the same `Callback::new`.
/// Keep a clone around to remove subscriptions by callback later.
pub struct Callback<A> {
    inner: Arc<CallbackFn<A>>,
}

impl<A> Callback<A> {
    /// Wrap a closure as a callback
    ///
    /// The closure receives the invocation context and the published
    /// arguments.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Context<'_, A>, &[A]) -> CallbackResult + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(callback),
        }
    }

    /// Whether both handles refer to the same callback
    pub fn ptr_eq(&self, other: &Callback<A>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn call(&self, context: &Context<'_, A>, args: &[A]) -> CallbackResult {
        (self.inner)(context, args)
    }
}

impl<A> Clone for Callback<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> fmt::Debug for Callback<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback")
            .field(&Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

/// Receiver a callback is invoked with
///
/// Either the context value supplied at subscription time, or the
/// subscription itself when none was supplied.
pub enum Context<'a, A> {
    /// No context was supplied; the receiver is the subscription
    Subscription(&'a Subscription<A>),

    /// The context value supplied at subscription time
    Value(&'a SharedContext),
}

impl<'a, A> Context<'a, A> {
    /// The subscription, when it is its own context
    pub fn subscription(&self) -> Option<&'a Subscription<A>> {
        match *self {
            Context::Subscription(subscription) => Some(subscription),
            Context::Value(_) => None,
        }
    }

    /// The supplied context value, if any
    pub fn value(&self) -> Option<&'a SharedContext> {
        match *self {
            Context::Subscription(_) => None,
            Context::Value(value) => Some(value),
        }
    }

    /// Downcast the supplied context value to a concrete type
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.value().and_then(|value| (**value).downcast_ref::<T>())
    }
}

impl<A> fmt::Debug for Context<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Subscription(subscription) => {
                f.debug_tuple("Subscription").field(&subscription.id()).finish()
            }
            Context::Value(_) => f.write_str("Value(..)"),
        }
    }
}

/// Structured form of subscription arguments
///
/// Building fails with `InvalidArgument` when no callback was set.
///
/// # Example
///
/// ```rust
/// use mediator::SubscriptionOptions;
///
/// let subscription = SubscriptionOptions::<i32>::new()
///     .callback(|ctx, _args| {
///         assert_eq!(ctx.downcast_ref::<&'static str>(), Some(&"owner"));
///         Ok(())
///     })
///     .context("owner")
///     .build()
///     .unwrap();
///
/// subscription.trigger(&[]).unwrap();
/// ```
pub struct SubscriptionOptions<A> {
    callback: Option<Callback<A>>,
    context: Option<SharedContext>,
}

impl<A> SubscriptionOptions<A> {
    /// Empty options; a callback must be set before building
    pub fn new() -> Self {
        Self {
            callback: None,
            context: None,
        }
    }

    /// Set the callback from a closure
    pub fn callback<F>(self, callback: F) -> Self
    where
        F: Fn(&Context<'_, A>, &[A]) -> CallbackResult + Send + Sync + 'static,
    {
        self.shared_callback(Callback::new(callback))
    }

    /// Set the callback from an existing handle, keeping its identity
    pub fn shared_callback(mut self, callback: Callback<A>) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Set the context value the callback is invoked with
    pub fn context<T: Any + Send + Sync>(self, context: T) -> Self {
        self.shared_context(Arc::new(context))
    }

    /// Set an already shared context value
    pub fn shared_context(mut self, context: SharedContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Create the subscription
    pub fn build(self) -> Result<Subscription<A>> {
        Subscription::from_options(self)
    }
}

impl<A> Default for SubscriptionOptions<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for SubscriptionOptions<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionOptions")
            .field("callback", &self.callback)
            .field("has_context", &self.context.is_some())
            .finish()
    }
}

struct Inner<A> {
    id: SubscriptionId,
    callback: Callback<A>,
    context: Option<SharedContext>,
    canceled: AtomicBool,
    listeners: Mutex<Listeners<ListenerFn<A>>>,
}

/// Handle to one registered callback and its lifecycle
///
/// Handles are cheap to clone and compare equal only to clones of
/// themselves. Once canceled a subscription never becomes active again and
/// never runs its callback again.
pub struct Subscription<A> {
    inner: Arc<Inner<A>>,
}

impl<A> Subscription<A> {
    /// Create an active subscription from a callback
    ///
    /// Without a context the callback is invoked with the subscription
    /// itself as its receiver.
    pub fn new(callback: Callback<A>, context: Option<SharedContext>) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: SubscriptionId::next(),
                callback,
                context,
                canceled: AtomicBool::new(false),
                listeners: Mutex::new(Listeners::new()),
            }),
        }
    }

    /// Create an active subscription from structured options
    pub fn from_options(options: SubscriptionOptions<A>) -> Result<Self> {
        let callback = options.callback.ok_or_else(|| {
            MediatorError::InvalidArgument("subscription options carry no callback".to_string())
        })?;
        Ok(Self::new(callback, options.context))
    }

    pub fn id(&self) -> SubscriptionId {
        self.inner.id
    }

    pub fn state(&self) -> SubscriptionState {
        if self.inner.canceled.load(Ordering::Acquire) {
            SubscriptionState::Canceled
        } else {
            SubscriptionState::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == SubscriptionState::Active
    }

    pub fn is_canceled(&self) -> bool {
        self.state() == SubscriptionState::Canceled
    }

    /// The callback handle this subscription invokes
    pub fn callback(&self) -> &Callback<A> {
        &self.inner.callback
    }

    /// The context the callback is invoked with
    pub fn context(&self) -> Context<'_, A> {
        match &self.inner.context {
            Some(value) => Context::Value(value),
            None => Context::Subscription(self),
        }
    }

    /// Invoke the callback with `args`, then emit `Signal::Trigger`
    ///
    /// Fails with `InvalidState` once canceled, and with `CallbackFailure`
    /// when the callback returns an error. No signal is emitted on failure.
    pub fn trigger(&self, args: &[A]) -> Result<()> {
        if self.is_canceled() {
            return Err(MediatorError::InvalidState(self.id()));
        }

        self.inner
            .callback
            .call(&self.context(), args)
            .map_err(|source| MediatorError::CallbackFailure {
                subscription: self.id(),
                source,
            })?;

        self.emit(Signal::Trigger);
        Ok(())
    }

    /// Cancel the subscription
    ///
    /// Only the first call changes state and emits `Signal::Cancel`; later
    /// calls are no-ops. Returns whether this call canceled it.
    pub fn cancel(&self) -> bool {
        if self.inner.canceled.swap(true, Ordering::AcqRel) {
            return false;
        }

        tracing::debug!(subscription = %self.id(), "subscription canceled");
        self.emit(Signal::Cancel);
        true
    }

    /// Register a listener that runs every time `signal` is emitted
    pub fn on<F>(&self, signal: Signal, listener: F) -> ListenerId
    where
        F: Fn(&Subscription<A>) + Send + Sync + 'static,
    {
        self.inner.listeners.lock().add(signal, false, Arc::new(listener))
    }

    /// Register a listener that runs the next time `signal` is emitted only
    pub fn once<F>(&self, signal: Signal, listener: F) -> ListenerId
    where
        F: Fn(&Subscription<A>) + Send + Sync + 'static,
    {
        self.inner.listeners.lock().add(signal, true, Arc::new(listener))
    }

    /// Remove a listener, returning whether it was still registered
    pub fn off(&self, id: ListenerId) -> bool {
        self.inner.listeners.lock().remove(id)
    }

    /// Number of listeners registered for `signal`
    pub fn listener_count(&self, signal: Signal) -> usize {
        self.inner.listeners.lock().count(signal)
    }

    // Listeners run without the lock held so they can register listeners,
    // cancel, or call back into a mediator.
    fn emit(&self, signal: Signal) {
        let listeners = self.inner.listeners.lock().take(signal);
        for listener in listeners {
            listener(self);
        }
    }
}

impl<A> Clone for Subscription<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> PartialEq for Subscription<A> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<A> Eq for Subscription<A> {}

impl<A> fmt::Debug for Subscription<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id())
            .field("state", &self.state())
            .field("has_context", &self.inner.context.is_some())
            .field("listeners", &self.inner.listeners.lock().len())
            .finish()
    }
}
