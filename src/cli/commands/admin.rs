//! Create admin command handler

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, SeaOrmAuthService};

pub async fn cmd_create_admin(
    config: &Config,
    username: &str,
    password: &str,
    superuser: bool,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let auth = SeaOrmAuthService::new(store, config.security.clone(), config.admin.clone());

    let admin = auth.create_admin(username, password, superuser).await?;

    let role = if admin.is_superuser {
        "superuser"
    } else {
        "admin"
    };
    println!("Created {} '{}' (ID: {})", role, admin.username, admin.id);

    Ok(())
}
