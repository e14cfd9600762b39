//! Facade tests: the `Envoi` alias with its default JSON arguments

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rstest::{fixture, rstest};
use serde_json::{json, Value};

use envoi::prelude::*;
use envoi::{MediatorConfig, SubscriptionState};

// ============================================================================
// Test Helpers
// ============================================================================

#[fixture]
fn bus() -> Envoi {
    Envoi::new()
}

fn counter(envoi: &Envoi, namespace: &str, calls: &Arc<AtomicUsize>) -> Subscription<Value> {
    let calls = Arc::clone(calls);
    envoi.subscribe(namespace, move |_ctx, _args| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

// ============================================================================
// subscribe / publish
// ============================================================================

#[rstest]
fn binds_json_context(bus: Envoi) {
    let seen = Arc::new(Mutex::new(None::<Value>));

    let sink = seen.clone();
    bus.subscribe_with(
        "context",
        SubscriptionOptions::new()
            .callback(move |ctx, _args| {
                let context = ctx
                    .downcast_ref::<Value>()
                    .ok_or("expected a JSON context")?;
                *sink.lock() = Some(context["foo"].clone());
                Ok(())
            })
            .context(json!({ "foo": "bar" })),
    )
    .unwrap();

    bus.publish("context", &[]).unwrap();

    assert_eq!(*seen.lock(), Some(json!("bar")));
}

#[rstest]
fn passes_json_arguments_in_order(bus: Envoi) {
    let seen = Arc::new(Mutex::new(None::<Value>));

    let sink = seen.clone();
    bus.subscribe("abc", move |_ctx, args| {
        *sink.lock() = Some(Value::from(args.to_vec()));
        Ok(())
    });

    bus.publish("abc", &[json!("a"), json!(2), json!({ "c": true })])
        .unwrap();

    assert_eq!(*seen.lock(), Some(json!(["a", 2, { "c": true }])));
}

#[rstest]
fn sums_numeric_arguments_through_the_hierarchy(bus: Envoi) {
    let totals: Vec<_> = ["foo", "foo::bar", "foo::bar::lol"]
        .into_iter()
        .map(|namespace| {
            let total = Arc::new(AtomicUsize::new(0));
            let sink = total.clone();
            bus.subscribe(namespace, move |_ctx, args| {
                let n = args
                    .first()
                    .and_then(Value::as_u64)
                    .ok_or("expected a count")?;
                sink.fetch_add(n as usize, Ordering::SeqCst);
                Ok(())
            });
            total
        })
        .collect();

    for namespace in ["foo", "foo::bar", "foo::doesntexist", "foo::bar::lol"] {
        bus.publish(namespace, &[json!(1)]).unwrap();
    }

    let totals: Vec<_> = totals.iter().map(|t| t.load(Ordering::SeqCst)).collect();
    assert_eq!(totals, vec![4, 2, 1]);
}

#[rstest]
fn non_numeric_argument_surfaces_as_callback_failure(bus: Envoi) {
    let subscription = bus.subscribe("foo", |_ctx, args| {
        args.first()
            .and_then(Value::as_u64)
            .ok_or("expected a count")?;
        Ok(())
    });

    let err = bus.publish("foo", &[json!("one")]).unwrap_err();

    match err {
        MediatorError::CallbackFailure { subscription: id, .. } => {
            assert_eq!(id, subscription.id());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(subscription.state(), SubscriptionState::Active);
}

// ============================================================================
// unsubscribe / cancel
// ============================================================================

#[rstest]
fn unsubscribe_by_namespace_and_callback(bus: Envoi) {
    let calls = Arc::new(AtomicUsize::new(0));
    for _ in 0..3 {
        counter(&bus, "foo", &calls);
    }
    bus.publish("foo", &[]).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    assert_eq!(bus.unsubscribe("foo"), 3);
    bus.publish("foo", &[]).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let increments = Arc::new(AtomicUsize::new(0));
    let sink = increments.clone();
    let callback = Callback::new(move |_ctx, _args| {
        sink.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    bus.subscribe_with(
        "increment",
        SubscriptionOptions::new().shared_callback(callback.clone()),
    )
    .unwrap();

    bus.publish("increment", &[]).unwrap();
    bus.publish("increment", &[]).unwrap();
    assert_eq!(bus.unsubscribe_callback("increment", &callback), 1);
    bus.publish("increment", &[]).unwrap();

    assert_eq!(increments.load(Ordering::SeqCst), 2);
}

#[rstest]
fn cancel_signal_reaches_listeners_once(bus: Envoi) {
    let calls = Arc::new(AtomicUsize::new(0));
    let cancels = Arc::new(AtomicUsize::new(0));
    let subscription = counter(&bus, "foo", &calls);

    let sink = cancels.clone();
    subscription.on(Signal::Cancel, move |_subscription| {
        sink.fetch_add(1, Ordering::SeqCst);
    });

    assert!(subscription.cancel());
    assert!(!subscription.cancel());

    assert_eq!(cancels.load(Ordering::SeqCst), 1);
    assert!(bus.is_empty());
    assert!(matches!(
        subscription.trigger(&[]),
        Err(MediatorError::InvalidState(_))
    ));
}

// ============================================================================
// configuration
// ============================================================================

#[rstest]
#[case("foo", "foo", true)]
#[case("foo::bar", "foo", true)]
#[case("foo::bar::lol", "foo", true)]
#[case("foo::bar", "foo::bar", true)]
#[case("foo::bar::nice", "foo::bar", true)]
#[case("not::bar::nice", "foo::bar", false)]
fn namespace_match_uses_default_delimiter(
    bus: Envoi,
    #[case] target: &str,
    #[case] outer: &str,
    #[case] expected: bool,
) {
    assert_eq!(bus.namespace_match(target, outer), expected);
    assert_eq!(envoi::namespace_match(target, outer, "::"), expected);
}

#[test]
fn custom_delimiter_from_json_configuration() {
    let config = MediatorConfig::from_json(r#"{ "namespaceDelimiter": "." }"#).unwrap();
    let envoi: Envoi = Envoi::with_config(config).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    counter(&envoi, "foo", &calls);

    envoi.publish("foo.bar", &[]).unwrap();
    envoi.publish("foo::bar", &[]).unwrap();

    assert_eq!(envoi.configuration().namespace_delimiter, ".");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_delimiter_is_rejected() {
    let result = Envoi::<Value>::with_config(MediatorConfig::new().with_namespace_delimiter(""));
    assert!(matches!(result, Err(MediatorError::InvalidArgument(_))));
}
