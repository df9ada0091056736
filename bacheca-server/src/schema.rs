use anyhow::Context;

use crate::store::Store;

/// Crea la tabella `messages` se non esiste. Safe to run on every start.
pub async fn init_schema(store: &Store) -> anyhow::Result<()> {
    let mut tx = store.pool().begin().await.context("begin schema transaction")?;

    sqlx::query(store.dialect().create_messages_table())
        .execute(&mut *tx)
        .await
        .context("create messages table")?;

    tx.commit().await.context("commit schema")?;
    tracing::info!(dialect = ?store.dialect(), "database initialized");
    Ok(())
}
