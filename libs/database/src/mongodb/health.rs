use mongodb::Database;
use mongodb::bson::doc;
use tracing::warn;

/// Ping the database. Returns `true` when the server responds.
pub async fn check_health(db: &Database) -> bool {
    match db.run_command(doc! { "ping": 1 }).await {
        Ok(_) => true,
        Err(e) => {
            warn!("MongoDB health check failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::Client;

    #[tokio::test]
    #[ignore] // Requires actual MongoDB instance
    async fn test_check_health() {
        let client = Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        assert!(check_health(&client.database("test")).await);
    }
}
