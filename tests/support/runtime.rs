//! Tokio runtime and mock generator helpers for integration tests.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use rstest_bdd::Slot;
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use wiremock::MockServer;

/// Shared runtime wrapper that can be stored in an `rstest-bdd` Slot.
///
/// Blocking generator calls must run outside `block_on`; the mock server
/// keeps serving from its own thread in between.
#[derive(Clone)]
pub struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    pub fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

/// Ensures a Tokio runtime and mock generator server are initialised.
///
/// # Errors
///
/// Returns an error if the Tokio runtime cannot be created or if the slots behave unexpectedly.
pub fn ensure_runtime_and_server(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
) -> Result<SharedRuntime, io::Error> {
    if runtime.with_ref(|_| ()).is_none() {
        runtime.set(SharedRuntime::new(Runtime::new()?));
    }

    let shared_runtime = runtime
        .get()
        .ok_or_else(|| io::Error::other("runtime not initialised after set"))?;

    if server.with_ref(|_| ()).is_none() {
        server.set(shared_runtime.block_on(MockServer::start()));
    }

    Ok(shared_runtime)
}

/// Body of a successful foundation-models completion answering `text`.
pub fn completion_body(text: &str) -> Value {
    json!({
        "result": {
            "alternatives": [{
                "message": {"role": "assistant", "text": text},
                "status": "ALTERNATIVE_STATUS_FINAL"
            }],
            "usage": {"inputTextTokens": "12", "completionTokens": "4", "totalTokens": "16"},
            "modelVersion": "23.10.2024"
        }
    })
}
