//! # Example: spy_usage
//!
//! Intercepts a method on a shared object, substitutes its behavior inside a
//! test, and restores it afterwards.
//!
//! ## Flow
//! ```text
//! intercept(&client, "get") ──► client.get = trampoline
//! client.call_method("get", args)
//!     └─► trampoline ──► calls.push(args) ──► active(args)
//! spy.restore() ──► client.get = original
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example spy_usage
//! ```

use std::sync::Arc;

use testvisor::{intercept, reporters::Recorder, Config, Operand, Suite, Value, Verdict};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let get = Value::function("get", |args| {
        Value::from(format!("GET {}", args.first().cloned().unwrap_or_default())).into()
    });
    let client = Value::record([("get", get.clone())]);

    let spy = intercept(&client, "get")?;
    spy.resolves(Value::record([("status", Value::from(200))]));

    let recorder = Arc::new(Recorder::new());
    let suite = Suite::builder(Config::default())
        .with_reporter(recorder.clone())
        .with_reporter_named("null")?
        .build();

    let target = client.clone();
    suite.test(
        "stubbed request resolves",
        Operand::call(move |_ctx| target.call_method("get", vec![Value::from("/health")])),
        Value::record([("status", Value::from(200))]),
    );

    assert_eq!(suite.drain_and_run().await, Verdict::Pass);
    println!("calls recorded: {}", spy.call_count());
    for (i, args) in spy.calls().iter().enumerate() {
        println!("  #{i}: {args:?}");
    }

    spy.restore();
    assert!(client.get("get").ptr_eq(&get));
    println!("restored: {:?}", client.get("get"));

    for result in recorder.results() {
        println!("{} -> {} ({})", result.description, result.verdict, result.actual);
    }
    Ok(())
}
