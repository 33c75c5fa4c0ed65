//! Shared helpers for chrono-bench integration tests.
//!
//! - [`builders`]: `BenchConfig` construction without going through a file.
//! - [`fake_launcher`]: an in-memory [`ProcessLauncher`] with scripted output.
//!
//! [`ProcessLauncher`]: chrono_bench::exec::ProcessLauncher

pub mod builders;
pub mod fake_launcher;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for any single awaited step in a test.
pub const TEST_DEADLINE: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Route chrono's tracing output into the test harness.
///
/// Output is captured per test and shown only when a test fails. Raise the
/// level with `CHRONO_LOG=debug`; `RUST_LOG` is not consulted so test runs
/// behave like the binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env("CHRONO_LOG")
            .unwrap_or_else(|_| EnvFilter::new("chrono_bench=info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .init();
    });
}

/// Await `fut`, failing the test if it takes longer than [`TEST_DEADLINE`].
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    match tokio::time::timeout(TEST_DEADLINE, fut).await {
        Ok(output) => output,
        Err(_) => panic!("test step did not finish within {TEST_DEADLINE:?}"),
    }
}

/// `sh -c <script>` as a command vector.
pub fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}
