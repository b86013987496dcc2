use std::sync::Arc;

use crate::db::{DbPool, OrmConn};
use crate::tokens::TokenRegistry;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub tokens: Arc<TokenRegistry>,
}

impl AppState {
    pub fn new(pool: DbPool, orm: OrmConn) -> Self {
        Self {
            pool,
            orm,
            tokens: Arc::new(TokenRegistry::new()),
        }
    }
}
