//! One-shot maintenance command handlers

use crate::config::Config;
use crate::db::Store;
use crate::state::SharedState;

pub async fn cmd_sweep_otps(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let removed = store.sweep_expired_otps().await?;

    if removed == 0 {
        println!("No expired verification codes.");
    } else {
        println!("Removed {} expired verification code(s).", removed);
    }

    Ok(())
}

pub async fn cmd_seed(config: Config) -> anyhow::Result<()> {
    let shared = SharedState::new(config).await?;
    shared.seed().await?;

    let courses = shared.reference_service.courses().await?;
    let countries = shared.reference_service.countries().await?;
    println!(
        "Reference data ready: {} course(s), {} country(ies).",
        courses.len(),
        countries.len()
    );

    Ok(())
}
