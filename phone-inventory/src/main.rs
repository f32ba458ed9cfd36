use phone_inventory::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    let store = open_store(&config).await?;
    tracing::info!(backend = store.backend(), "Phone store ready");

    let state = AppState::new(store, config.clone());
    Server::new(config).serve(router(state)).await
}

/// Connect to Postgres when `[database]` is configured, otherwise keep
/// phones in memory
async fn open_store(config: &Config) -> Result<PhoneStore> {
    let Some(db) = config.database.as_ref() else {
        tracing::warn!("No [database] section configured; phones are kept in memory only");
        return Ok(PhoneStore::Memory(MemoryPhoneRepository::new()));
    };

    let pool = create_pool(db).await?;
    if db.run_migrations {
        run_migrations(&pool).await?;
    }
    Ok(PhoneStore::Postgres(PgPhoneRepository::new(pool)))
}
