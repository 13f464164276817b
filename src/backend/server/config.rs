/**
 * Server Configuration
 *
 * Turns a validated `ServerConfig` into live resources. Unlike the request
 * path, a failure here is fatal: the server does not start without its store.
 */

use std::sync::Arc;

use crate::backend::error::BackendResult;
use crate::backend::notes::{open_store, NoteSchema, NoteStore};
use crate::shared::ServerConfig;

/// Open the note store named by the configuration
///
/// # Errors
///
/// `StoreUnavailable` if the database cannot be reached, `QueryFailed` if
/// migrations fail.
pub async fn load_store(config: &ServerConfig) -> BackendResult<Arc<dyn NoteStore>> {
    config.validate()?;
    let store = open_store(config, NoteSchema::default()).await?;
    tracing::info!("Note store ready ({})", store.backend_name());
    Ok(store)
}
