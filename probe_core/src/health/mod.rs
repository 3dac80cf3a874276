pub mod checks;


pub use checks::{ConfigReader, HealthChecker, RuntimeIntrospector, StoreClient};
