//! Namespaces - Minimal mediator demo
//!
//! Subscribes a few listeners at different depths of a namespace tree,
//! publishes into it and shows how cancel and unsubscribe prune dispatch.
//!
//! Run: cargo run -p envoi-mediator --example namespaces

use mediator::prelude::*;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

fn listener(mediator: &Mediator, namespace: &'static str) -> Subscription<Value> {
    mediator.subscribe(namespace, move |ctx, args| {
        let id = ctx.subscription().map(|subscription| subscription.id());
        println!("  {namespace:<14} {id:?} <- {}", Value::from(args.to_vec()));
        Ok(())
    })
}

fn publish(mediator: &Mediator, namespace: &str, args: &[Value]) -> Result<(), MediatorError> {
    println!("publish {namespace}");
    if !mediator.publish(namespace, args)? {
        println!("  (no subscribers)");
    }
    Ok(())
}

fn main() -> Result<(), MediatorError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .init();

    let mediator = Mediator::new();

    let _chat = listener(&mediator, "chat");
    let room = listener(&mediator, "chat::room-1");
    let _alerts = listener(&mediator, "alerts");

    publish(&mediator, "chat::room-1", &[json!({"from": "ada", "text": "hi"})])?;
    publish(&mediator, "chat::room-2", &[json!("anyone?")])?;
    publish(&mediator, "chatter", &[json!("not a child of chat")])?;

    room.on(Signal::Cancel, |subscription| {
        println!("  {} canceled", subscription.id());
    });
    room.cancel();
    publish(&mediator, "chat::room-1", &[json!("after cancel")])?;

    let removed = mediator.unsubscribe("chat");
    println!("unsubscribe chat removed {removed}");
    publish(&mediator, "chat::room-1", &[json!("after unsubscribe")])?;

    println!("remaining namespaces: {:?}", mediator.namespaces());
    Ok(())
}
