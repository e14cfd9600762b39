//! Hierarchical Publish/Subscribe Mediator
//!
//! An in-process mediator that dispatches published arguments to callbacks
//! subscribed on delimiter-segmented namespaces such as `"foo::bar::lol"`.
//!
//! # Features
//!
//! - **Hierarchical Matching**: A subscription on `"foo"` receives publishes to
//!   `"foo"`, `"foo::bar"` and `"foo::bar::lol"`, but not `"foox"`
//! - **Cancelable Subscriptions**: Canceling a subscription removes it from its
//!   mediator immediately
//! - **Signals**: Subscriptions emit `Trigger` and `Cancel` signals to listeners
//! - **Callback Context**: Callbacks receive a context value, defaulting to the
//!   subscription itself
//! - **Ordered Dispatch**: Namespaces in subscription order, callbacks in
//!   insertion order within a namespace
//!
//! # Quick Start
//!
//! ```rust
//! use mediator::Mediator;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let mediator = Mediator::<String>::new();
//! let calls = Arc::new(AtomicUsize::new(0));
//!
//! let counter = calls.clone();
//! let subscription = mediator.subscribe("chat", move |_ctx, args| {
//!     assert_eq!(args[0], "hello");
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     Ok(())
//! });
//!
//! // Ancestors receive publishes to descendants
//! mediator.publish("chat::room-1", &["hello".to_string()]).unwrap();
//!
//! // Canceled subscriptions leave the mediator
//! subscription.cancel();
//! assert!(!mediator.publish("chat", &["hello".to_string()]).unwrap());
//!
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! ```
//!
//! # Architecture
//!
//! ```text
//! Mediator<A>
//!     │
//!     ├── configuration: MediatorConfig { namespace_delimiter }
//!     │
//!     └── namespaces: RwLock<NamespaceTable<A>>
//!             │
//!             └── [(namespace, [Subscription<A>, ...]), ...]   (insertion order)
//!                         │
//!                         ├── callback: Callback<A>
//!                         ├── context: Option<SharedContext>
//!                         ├── state: Active | Canceled
//!                         └── listeners: Trigger / Cancel
//! ```

// Modules
pub mod config;
pub mod error;
pub mod mediator;
pub mod namespace;
pub mod signal;
pub mod subscription;

// Re-exports - Public API
pub use config::{MediatorConfig, DEFAULT_NAMESPACE_DELIMITER};
pub use error::{CallbackError, CallbackResult, MediatorError, Result};
pub use mediator::Mediator;
pub use namespace::namespace_match;
pub use signal::{ListenerId, Signal};
pub use subscription::{
    Callback, Context, SharedContext, Subscription, SubscriptionId, SubscriptionOptions,
    SubscriptionState,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::MediatorConfig;
    pub use crate::error::{CallbackResult, MediatorError};
    pub use crate::mediator::Mediator;
    pub use crate::signal::Signal;
    pub use crate::subscription::{Callback, Context, Subscription, SubscriptionOptions};
}
