use anyhow::Result;
use tempfile::TempDir;
use std::path::Path;
use bacheca_server::config::PoolConfig;
use bacheca_server::{
    health_with_store, init_schema, wait_for_db, AppState, Connectivity, Dialect, RetryPolicy,
    Store,
};

mod common;
use common::sqlite_url_for_path;

// Funzione di utilità: store SQLite su un file dentro la directory temporanea
fn sqlite_store(dir: &Path) -> Result<Store> {
    let url = sqlite_url_for_path(&dir.join("bacheca.db"))?;
    Ok(Store::connect_lazy(&url, &PoolConfig::default())?)
}

async fn column_names(store: &Store) -> Result<Vec<String>> {
    let names: Vec<String> =
        sqlx::query_scalar("SELECT name FROM pragma_table_info('messages') ORDER BY cid")
            .fetch_all(store.pool())
            .await?;
    Ok(names)
}

// Test che verifica che lo schema crei la tabella messages con le colonne attese
#[tokio::test]
async fn init_schema_creates_messages_table() -> Result<()> {
    let td = TempDir::new()?;
    let store = sqlite_store(td.path())?;
    assert_eq!(store.dialect(), Dialect::Sqlite);

    init_schema(&store).await?;

    assert_eq!(column_names(&store).await?, vec!["id".to_string(), "text".to_string()]);
    Ok(())
}

// Second run must keep both the structure and the rows already there
#[tokio::test]
async fn init_schema_twice_keeps_structure_and_rows() -> Result<()> {
    let td = TempDir::new()?;
    let store = sqlite_store(td.path())?;

    init_schema(&store).await?;
    let id = store.insert_message("sopravvivo").await?;
    let before = column_names(&store).await?;

    init_schema(&store).await?;

    assert_eq!(column_names(&store).await?, before);
    let messages = store.list_messages().await?;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, id);
    assert_eq!(messages[0].text, "sopravvivo");
    Ok(())
}

#[tokio::test]
async fn text_column_rejects_null() -> Result<()> {
    let td = TempDir::new()?;
    let store = sqlite_store(td.path())?;
    init_schema(&store).await?;

    let res = sqlx::query("INSERT INTO messages (text) VALUES (NULL)")
        .execute(store.pool())
        .await;
    assert!(res.is_err(), "NULL text must be refused by the schema");
    Ok(())
}

// Test che verifica che il controllo di health funzioni dopo l'inizializzazione
#[tokio::test]
async fn health_check_works_after_init() -> Result<()> {
    let td = TempDir::new()?;
    let store = sqlite_store(td.path())?;
    init_schema(&store).await?;

    let state = AppState::new(store);
    let (status, body) = health_with_store(&state).await;
    assert!(status.is_success(), "health should return 200 OK");
    assert!(body.0.is_healthy());
    Ok(())
}

#[tokio::test]
async fn health_check_reports_unreachable_database() -> Result<()> {
    let mut pool = PoolConfig::default();
    pool.acquire_timeout = std::time::Duration::from_millis(500);
    // nothing listens on port 1
    let store = Store::connect_lazy("mysql://board:pw@127.0.0.1:1/bacheca", &pool)?;

    let state = AppState::new(store);
    let (status, body) = health_with_store(&state).await;
    assert_eq!(status.as_u16(), 500);
    assert_eq!(body.0.status, "unhealthy");
    assert!(body.0.error.is_some());
    Ok(())
}

// The startup gate against a real handle: a reachable sqlite file connects on the first try
#[tokio::test]
async fn startup_gate_connects_to_reachable_database() -> Result<()> {
    let td = TempDir::new()?;
    let store = sqlite_store(td.path())?;

    let state = wait_for_db(&RetryPolicy::default(), || store.probe()).await;

    assert_eq!(state, Connectivity::Established { attempts: 1 });
    Ok(())
}

#[tokio::test]
async fn startup_gate_gives_up_on_unreachable_database() -> Result<()> {
    let mut pool = PoolConfig::default();
    pool.acquire_timeout = std::time::Duration::from_millis(200);
    let store = Store::connect_lazy("mysql://board:pw@127.0.0.1:1/bacheca", &pool)?;
    let policy = RetryPolicy { max_attempts: 2, delay: std::time::Duration::from_millis(10) };

    let state = wait_for_db(&policy, || store.probe()).await;

    assert!(!state.is_established());
    assert_eq!(state.attempts(), 2);
    Ok(())
}

// Test che verifica che la creazione del file DB e delle directory genitrici sia idempotente
#[tokio::test]
async fn creating_db_file_and_parent_dirs_is_idempotent() -> Result<()> {
    let td = TempDir::new()?;
    let nested = td.path().join("a").join("b").join("bacheca.db");
    let parent = nested.parent().map(Path::to_path_buf).expect("parent");
    assert!(!parent.exists());

    let url = sqlite_url_for_path(nested.as_path())?;
    let again = sqlite_url_for_path(nested.as_path())?;
    assert_eq!(url, again);

    let store = Store::connect_lazy(&url, &PoolConfig::default())?;
    init_schema(&store).await?;

    assert!(parent.exists(), "parent dir should have been created");
    assert!(nested.exists(), "db file should have been created");
    Ok(())
}

// Test che verifica che ogni insert su SQLite restituisca l'id effettivamente salvato
#[tokio::test]
async fn sqlite_insert_returns_stored_ids() -> Result<()> {
    let td = TempDir::new()?;
    let store = sqlite_store(td.path())?;
    init_schema(&store).await?;

    let first = store.insert_message("uno").await?;
    let second = store.insert_message("due").await?;
    assert!(second > first, "ids must grow: {first} then {second}");

    let ids: Vec<i64> = store.list_messages().await?.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![first, second]);
    Ok(())
}
