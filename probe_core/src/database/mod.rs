pub mod connection;
pub mod migrations;
pub mod options;

pub use connection::{get_database_pool, DatabaseManager};
pub use migrations::{run_migrations, MigrationManager};
pub use options::{OptionsRepository, PROBE_PATH_OPTION, SITE_URL_OPTION};
