// Public modules
pub mod defaults;
pub mod error;
pub mod events;
pub mod gradle;
pub mod migrate;
pub mod package_id;
pub mod source_tree;

// Internal modules - not part of public API
pub(crate) mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use events::{EventLevel, EventLog, MigrationEvent};
pub use migrate::{migrate_project, plan_migration, MigrationPlan, MigrationResult};
pub use package_id::{Detection, DetectionSource, GeneratedId, PackageId};
