use sqlx::PgPool;

pub mod bike;
pub mod driver;
pub mod garage;
pub mod maintenance;
pub mod shift;

/// Postgres-backed implementation of every storage trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
