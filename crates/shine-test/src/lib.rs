pub use shine_test_macros::test;
use std::sync::Once;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

fn init_tracing_with_env_like() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt = fmt::layer()
        .with_test_writer() // keep the output captured by the test harness
        .with_target(false);

    // log records of the libraries are forwarded through the tracing-log bridge
    if let Err(err) = tracing_subscriber::registry().with(fmt).with(filter).try_init() {
        eprintln!("Failed to set up test logging: {err}");
    }
}

/// Test setup executed before each test.
pub fn setup_test() {
    INIT.call_once(|| {
        init_tracing_with_env_like();
        log::debug!("Test logging initialized");
    });
}
