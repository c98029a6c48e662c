pub use sea_orm_migration::prelude::*;

mod m20250605_000001_initial;
mod m20250612_000001_add_study_tables;
mod m20250619_000001_add_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250605_000001_initial::Migration),
            Box::new(m20250612_000001_add_study_tables::Migration),
            Box::new(m20250619_000001_add_notifications::Migration),
        ]
    }
}
