//! # Example: basic_suite
//!
//! Declares a small suite and prints every reporter call with [`LogReporter`].
//!
//! Shows how to:
//! - Declare plain, synchronous and asynchronous tests.
//! - Group tests so they run concurrently but report in declaration order.
//! - Override the timeout of a single test.
//!
//! ## Flow
//! ```text
//! suite.test / info / skip / group ──► TaskQueue
//! suite.drain_and_run()
//!     ├─► sequential tests: execute + await
//!     ├─► group "network": start all, await together, report in order
//!     └─► LogReporter prints [pass] / [fail] / [error] / [group] / [progress] / [complete]
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_suite --features logging
//! ```

use std::{sync::Arc, time::Duration};

use testvisor::{wait, Config, LogReporter, Operand, Reporter, Suite, TestOptions, Value, Verdict};

fn fetch(latency_ms: u64, body: &'static str) -> Operand {
    Operand::from_async(move |_ctx| async move {
        wait(Duration::from_millis(latency_ms)).await;
        Ok(Value::from(body))
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let reporters: Vec<Arc<dyn Reporter>> = vec![Arc::new(LogReporter::new())];
    let suite = Suite::new(Config::default(), reporters);

    suite.info("arithmetic");
    suite.test("adds", 1 + 1, 2);
    suite.test(
        "parses",
        Operand::from_fn(|| {
            "42".parse::<i64>()
                .map(Value::from)
                .map_err(|e| Value::error("SyntaxError", e.to_string()))
        }),
        42,
    );
    suite.test(
        "records compare structurally",
        Value::record([("port", Value::from(8080))]),
        Value::record([("port", Value::from(8080))]),
    );
    suite.skip("not on this platform", 1, 1);

    suite.group("network", |g| {
        g.test("slow endpoint", fetch(120, "ok"), "ok");
        g.test("fast endpoint", fetch(10, "ok"), "ok");
        g.test("wrong body", fetch(30, "teapot"), "ok");
    });

    suite.test_with(
        "hangs",
        Operand::from_async(|ctx| async move {
            ctx.cancelled().await;
            Err(Value::error("Error", "cancelled"))
        }),
        Value::Undefined,
        TestOptions::default().with_timeout(Duration::from_millis(50)),
    );

    let verdict = suite.drain_and_run().await;
    println!("suite verdict: {verdict}");
    assert_eq!(verdict, Verdict::Fail);
}
