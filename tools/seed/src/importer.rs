use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::Path;

/// Statistics from an import operation
#[derive(Debug, Default)]
pub struct ImportStats {
    /// Rows inserted or updated
    pub upserted: usize,
    /// Entries skipped (empty username)
    pub skipped: usize,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct PlayerRating {
    pub username: String,
    pub rating: u32,
}

pub fn parse_ratings(path: &Path) -> Result<Vec<PlayerRating>, Box<dyn std::error::Error>> {
    let file = std::fs::File::open(path)?;
    let players = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(players)
}

/// Upsert player ratings. A later entry for the same username wins.
pub async fn import_ratings(
    pool: &SqlitePool,
    players: Vec<PlayerRating>,
) -> Result<ImportStats, Box<dyn std::error::Error>> {
    let mut stats = ImportStats::default();

    let players: Vec<PlayerRating> = players
        .into_iter()
        .filter(|p| {
            let keep = !p.username.trim().is_empty();
            if !keep {
                stats.skipped += 1;
            }
            keep
        })
        .collect();

    let mut tx = pool.begin().await?;
    for player in &players {
        let result = sqlx::query(
            "INSERT INTO players (username, rating) VALUES (?, ?) \
             ON CONFLICT(username) DO UPDATE SET rating = excluded.rating",
        )
        .bind(&player.username)
        .bind(i64::from(player.rating))
        .execute(&mut *tx)
        .await?;
        stats.upserted += result.rows_affected() as usize;
    }
    tx.commit().await?;

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("../../migrations").run(&pool).await.unwrap();
        pool
    }

    fn player(username: &str, rating: u32) -> PlayerRating {
        PlayerRating {
            username: username.to_string(),
            rating,
        }
    }

    #[test]
    fn parses_rating_list() {
        let json = r#"[{"username": "eve", "rating": 1720}]"#;
        let players: Vec<PlayerRating> = serde_json::from_str(json).unwrap();
        assert_eq!(players, vec![player("eve", 1720)]);
    }

    #[tokio::test]
    async fn inserts_new_and_updates_existing() {
        let pool = pool().await;

        let stats = import_ratings(&pool, vec![player("eve", 1720), player("bob", 1590)])
            .await
            .unwrap();
        assert_eq!(stats.upserted, 2);

        let (rating,): (i64,) = sqlx::query_as("SELECT rating FROM players WHERE username = 'bob'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rating, 1590);
    }

    #[tokio::test]
    async fn skips_blank_usernames() {
        let pool = pool().await;

        let stats = import_ratings(&pool, vec![player("  ", 1400), player("eve", 1720)])
            .await
            .unwrap();

        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.upserted, 1);
    }
}
