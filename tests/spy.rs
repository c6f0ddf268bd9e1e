use std::sync::Arc;

use testvisor::{
    deep_equal, intercept, reporters::Recorder, Config, Operand, Outcome, SetupError, Suite,
    Value, Verdict,
};

fn counter() -> (Value, Value) {
    let add = Value::function("add", |args| {
        let sum: f64 = args.iter().filter_map(Value::as_number).sum();
        Outcome::resolved(sum)
    });
    (Value::record([("add", add.clone())]), add)
}

#[test]
fn call_count_and_arguments_follow_invocations() {
    let (obj, _) = counter();
    let spy = intercept(&obj, "add").expect("add is callable");

    for i in 0..3 {
        obj.call_method("add", vec![Value::from(i), Value::from("x")]);
    }

    assert_eq!(spy.call_count(), 3);
    let calls = spy.calls();
    for (i, args) in calls.iter().enumerate() {
        let expected = Value::array([Value::from(i as i32), Value::from("x")]);
        assert!(deep_equal(&Value::array(args.clone()), &expected));
    }
}

#[test]
fn restore_puts_back_the_same_function() {
    let (obj, add) = counter();
    let spy = intercept(&obj, "add").expect("add is callable");
    assert!(!obj.get("add").ptr_eq(&add));

    spy.restore();
    spy.restore();
    assert!(obj.get("add").ptr_eq(&add));
}

#[test]
fn targets_without_a_method_are_rejected() {
    let (obj, _) = counter();
    let err = intercept(&obj, "missing").err();
    assert!(matches!(err, Some(SetupError::InvalidTarget { .. })));

    let err = intercept(&Value::from(3), "add").err();
    assert!(matches!(err, Some(SetupError::InvalidTarget { .. })));
}

#[tokio::test]
async fn spied_method_drives_test_verdicts() {
    let (obj, _) = counter();
    let spy = intercept(&obj, "add").expect("add is callable");

    let recorder = Arc::new(Recorder::new());
    let suite = Suite::new(Config::default(), vec![recorder.clone()]);

    let real = obj.clone();
    suite.test(
        "original behavior",
        Operand::call(move |_ctx| real.call_method("add", vec![1.into(), 2.into()])),
        3,
    );

    let stubbed = obj.clone();
    let handle = spy.clone();
    suite.group("stubbed", move |g| {
        g.test(
            "resolves stub",
            Operand::call(move |_ctx| {
                handle.resolves(40);
                stubbed.call_method("add", vec![1.into()])
            }),
            40,
        );
    });

    assert_eq!(suite.drain_and_run().await, Verdict::Pass);
    assert_eq!(spy.call_count(), 2);
    assert_eq!(recorder.descriptions(), ["original behavior", "resolves stub"]);

    spy.rejects(Value::error("Error", "down"));
    let out = obj.call_method("add", vec![]);
    assert!(out.is_pending());
    let thrown = out.settle().await.err();
    let name = thrown.and_then(|e| e.as_object().and_then(|o| o.error_name()));
    assert_eq!(name.as_deref(), Some("Error"));
}
