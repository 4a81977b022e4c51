// Application layer: ports to the collaborators and the migration driving loop

pub mod batch;
pub mod context;
pub mod migrate_use_case;
pub mod ports;

pub use batch::BatchSubmitter;
pub use context::{MigrationContext, RunReport};
pub use migrate_use_case::MigrateUseCase;
