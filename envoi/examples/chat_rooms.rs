//! Chat Rooms - envoi facade demo
//!
//! A moderator listens to every room, each member listens to one room, and a
//! member leaving cancels their subscription.
//!
//! Run: ENVOI_LOG_MODE=development cargo run -p envoi --example chat_rooms

use envoi::logging::init_logging_from_env;
use envoi::prelude::*;
use serde_json::{json, Value};

fn member(envoi: &Envoi, room: &str, name: &'static str) -> Subscription<Value> {
    envoi.subscribe(&format!("chat::{room}"), move |_ctx, args| {
        for message in args {
            println!("  {name} reads {message}");
        }
        Ok(())
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging_from_env()?;

    let envoi: Envoi = Envoi::new();

    let moderator = envoi.subscribe_with(
        "chat",
        SubscriptionOptions::new()
            .callback(|ctx, args| {
                let name = ctx.downcast_ref::<&'static str>().copied().unwrap_or("?");
                println!("  [{name}] saw {} message(s)", args.len());
                Ok(())
            })
            .context("moderator"),
    )?;

    let ada = member(&envoi, "lobby", "ada");
    let _grace = member(&envoi, "lobby", "grace");
    let _linus = member(&envoi, "kernel", "linus");

    println!("publish chat::lobby");
    envoi.publish("chat::lobby", &[json!({"from": "ada", "text": "hello"})])?;

    println!("publish chat::kernel");
    envoi.publish("chat::kernel", &[json!("patch v2"), json!("patch v3")])?;

    ada.on(Signal::Cancel, |subscription| {
        println!("  {} left", subscription.id());
    });
    ada.cancel();

    println!("publish chat::lobby");
    envoi.publish("chat::lobby", &[json!("is ada still here?")])?;

    moderator.cancel();
    println!(
        "{} subscription(s) left under {:?}",
        envoi.subscription_count(),
        envoi.namespaces()
    );

    Ok(())
}
