use std::sync::Arc;

use sqlx::PgPool;

use wayfarer_core::model::TextModel;
use wayfarer_core::places::LocalSearch;

/// Shared handler state: the connection pool, the generative model, and
/// the local place-search provider.
///
/// All are constructed once at startup and cloned per request; there is
/// no other shared in-process state.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub model: Arc<dyn TextModel>,
    pub places: Arc<dyn LocalSearch>,
}
