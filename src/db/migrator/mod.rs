use sea_orm_migration::prelude::*;

mod m20250801_initial;
mod m20250812_add_nominations;
mod m20250820_add_sponsorships;
mod m20250825_add_reference_data;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_initial::Migration),
            Box::new(m20250812_add_nominations::Migration),
            Box::new(m20250820_add_sponsorships::Migration),
            Box::new(m20250825_add_reference_data::Migration),
        ]
    }
}
