use anyhow::Context;
use std::path::Path;

// Dato un percorso di file, restituisce un URL SQLite valido.
// Crea le directory genitrici e il file se non esistono.
pub fn sqlite_url_for_path(p: &Path) -> anyhow::Result<String> {
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };
    if let Some(parent) = abs.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent dirs for {:?}", parent))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&abs)
        .with_context(|| format!("create/open sqlite file {:?}", abs))?;
    let s = abs.to_string_lossy().replace('\\', "/");
    Ok(format!("sqlite:///{}", s.trim_start_matches('/')))
}
