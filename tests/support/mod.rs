// ABOUTME: Test support utilities.
// ABOUTME: Provides an in-memory control plane and a simulated clock for rollout tests.

use std::sync::Once;

// Each test binary only uses some of these modules, so allow dead_code.
#[allow(dead_code)]
pub mod fake_control_plane;
#[allow(dead_code)]
pub mod simulated_clock;

#[allow(unused_imports)]
pub use fake_control_plane::{AppBehavior, Call, FakeControlPlane, ScaleRecord};
#[allow(unused_imports)]
pub use simulated_clock::SimulatedClock;

use marathon_deploy::definition::AppDefinition;
use serde_json::json;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("marathon_deploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// App definition with an HTTP health check.
#[allow(dead_code)]
pub fn definition(id: &str) -> AppDefinition {
    AppDefinition::from_value(json!({
        "id": id,
        "cpus": 0.1,
        "mem": 64,
        "container": {"type": "DOCKER", "docker": {"image": "nginx:1.27"}},
        "healthChecks": [{"protocol": "HTTP", "path": "/", "intervalSeconds": 2}]
    }))
    .unwrap()
}

/// App definition without health checks.
#[allow(dead_code)]
pub fn definition_without_health_checks(id: &str) -> AppDefinition {
    AppDefinition::from_value(json!({"id": id, "cmd": "sleep 3600"})).unwrap()
}
