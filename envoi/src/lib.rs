//! # Envoi - Hierarchical Publish/Subscribe
//!
//! Envoi routes published arguments to callbacks subscribed on
//! delimiter-segmented namespaces. A subscriber on `"chat"` hears
//! everything published to `"chat"`, `"chat::room-1"` or
//! `"chat::room-1::typing"`.
//!
//! ```rust
//! use envoi::prelude::*;
//! use serde_json::json;
//!
//! let envoi: Envoi = Envoi::new();
//!
//! let subscription = envoi.subscribe("chat", |_ctx, args| {
//!     println!("chat got {:?}", args);
//!     Ok(())
//! });
//!
//! assert!(envoi.publish("chat::room-1", &[json!("hello")])?);
//!
//! subscription.cancel();
//! assert!(!envoi.publish("chat::room-1", &[json!("hello")])?);
//! # Ok::<(), envoi::MediatorError>(())
//! ```
//!
//! ## Key Features
//!
//! - **Hierarchical matching**: segment-wise prefixes, so `"chat"` never hears `"chatter"`
//! - **Ordered dispatch**: namespaces in first-subscription order, callbacks in insertion order
//! - **Cancelable subscriptions**: `cancel()` removes the subscription from its mediator
//! - **Signals**: observe `Trigger` and `Cancel` on any subscription
//! - **Any argument type**: JSON values by default, any `A` with `Mediator<A>`
//!
//! ## Architecture
//!
//! ```text
//! envoi (facade, logging setup)
//!     ↓
//! mediator (Mediator, Subscription, namespace matching)
//! ```

pub mod logging;

// Main exports
pub use logging::{LoggingError, LoggingMode};
pub use mediator::{
    namespace_match, Callback, CallbackError, CallbackResult, Context, ListenerId, Mediator,
    MediatorConfig, MediatorError, Result, SharedContext, Signal, Subscription, SubscriptionId,
    SubscriptionOptions, SubscriptionState, DEFAULT_NAMESPACE_DELIMITER,
};

/// A mediator carrying JSON arguments unless another type is named
pub type Envoi<A = serde_json::Value> = Mediator<A>;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::Envoi;
    pub use mediator::prelude::*;
}
