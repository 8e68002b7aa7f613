//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that starts a single-node replica set
//! container, so tests can exercise multi-document transactions.

use mongodb::{Client, Database};
use testcontainers::ContainerAsync;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;
use uuid::Uuid;

/// Test MongoDB wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct
/// is dropped.
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    pub client: Client,
    pub connection_string: String,
}

impl TestMongo {
    /// Start a single-node replica set and connect to it
    ///
    /// # Example
    ///
    /// ```no_run
    /// use test_utils::TestMongo;
    ///
    /// # async fn example() {
    /// let mongo = TestMongo::new().await;
    /// let db = mongo.database();
    /// # }
    /// ```
    pub async fn new() -> Self {
        let container = Mongo::repl_set()
            .start()
            .await
            .expect("Failed to start Mongo container");

        let host_port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get host port");

        let connection_string =
            format!("mongodb://127.0.0.1:{host_port}/?directConnection=true");

        let client = Client::with_uri_str(&connection_string)
            .await
            .expect("Failed to connect to test MongoDB");

        Self {
            container,
            client,
            connection_string,
        }
    }

    /// A database with a unique name, isolating tests from each other
    pub fn database(&self) -> Database {
        let name = format!("test_{}", Uuid::new_v4().simple());
        self.client.database(&name)
    }
}
