use sqlx::SqlitePool;
use tracing::warn;

#[derive(Clone)]
pub struct RatingRepository {
    pool: SqlitePool,
}

impl RatingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Current rating of a player. Unknown players and database errors yield `None`.
    pub async fn get_rating(&self, username: &str) -> Option<u32> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT rating FROM players WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .inspect_err(|e| warn!(username, error = %e, "Rating lookup failed"))
            .ok()?;

        let (rating,) = row?;
        u32::try_from(rating).ok()
    }
}
