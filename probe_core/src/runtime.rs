//! Runtime introspection for the hosting application.

use crate::health::RuntimeIntrospector;

/// Snapshot of the application's runtime identity, constructed once the
/// server has finished initializing. A default instance carries no name and
/// reads as "not yet initialized" to the health checker.
#[derive(Clone, Default)]
pub struct AppRuntime {
    app_name: String,
}

impl AppRuntime {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl RuntimeIntrospector for AppRuntime {
    fn application_name(&self) -> String {
        self.app_name.clone()
    }
}
