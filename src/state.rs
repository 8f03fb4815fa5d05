use sqlx::PgPool;

use crate::database::{SavedTeaStore, TeaStore, UserStore};

/// Shared application state: one store per entity, each handed a clone of
/// the process-lifetime pool at construction.
#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub teas: TeaStore,
    pub saved: SavedTeaStore,
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserStore::new(pool.clone()),
            teas: TeaStore::new(pool.clone()),
            saved: SavedTeaStore::new(pool.clone()),
            pool,
        }
    }
}
