use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};
use tracing::info;

use crate::infrastructure::entity::users;

/// Create the `users` table with its unique constraints if it does not exist yet
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut table = schema.create_table_from_entity(users::Entity);
    table.if_not_exists();

    db.execute(backend.build(&table)).await?;
    info!("users table ready");
    Ok(())
}
