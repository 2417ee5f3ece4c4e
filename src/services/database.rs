use crate::config::Config;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Debug;
use surrealdb::engine::remote::http::{Client, Http};
use surrealdb::opt::auth::Root;
use surrealdb::{Response, Surreal};
use tracing::{debug, error, info};

/// Database service wrapping the SurrealDB HTTP client.
#[derive(Clone)]
pub struct Database {
    client: Surreal<Client>,
    pub config: Config,
}

impl Database {
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Initializing database connection to {}", config.database_url);

        let address = config
            .database_url
            .trim_start_matches("http://")
            .trim_start_matches("https://");

        let client = Surreal::new::<Http>(address).await?;

        client
            .signin(Root {
                username: &config.database_username,
                password: &config.database_password,
            })
            .await?;

        client
            .use_ns(&config.database_namespace)
            .use_db(&config.database_name)
            .await?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Verifies the connection with a trivial query.
    pub async fn verify_connection(&self) -> Result<()> {
        match self.client.query("INFO FOR DB").await {
            Ok(_) => {
                info!("Database connection verified successfully");
                Ok(())
            }
            Err(e) => {
                error!("Failed to verify database connection: {}", e);
                Err(AppError::from(e))
            }
        }
    }

    /// Executes a raw query.
    pub async fn query(&self, sql: &str) -> Result<Response> {
        self.client.query(sql).await.map_err(AppError::from)
    }

    /// Executes a query with bound parameters.
    pub async fn query_with_params<P>(&self, sql: &str, params: P) -> Result<Response>
    where
        P: Serialize,
    {
        self.client
            .query(sql)
            .bind(params)
            .await
            .map_err(AppError::from)
    }

    /// Creates a record.
    pub async fn create<T>(&self, table: &str, data: T) -> Result<T>
    where
        T: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + Debug,
    {
        let results: Vec<T> = self
            .client
            .create(table)
            .content(data)
            .await
            .map_err(AppError::from)?;

        results
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("Failed to create record".to_string()))
    }

    /// Selects all records of a table.
    pub async fn select<T>(&self, table: &str) -> Result<Vec<T>>
    where
        T: for<'de> Deserialize<'de> + Send + Sync + Debug,
    {
        self.client.select(table).await.map_err(AppError::from)
    }

    /// Fetches a single record by id.
    pub async fn get_by_id<T>(&self, table: &str, id: &str) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de> + Send + Sync + Debug,
    {
        // Accept both plain ids and ids carrying the table prefix
        let prefix = format!("{}:", table);
        let pure_id = id.strip_prefix(&prefix).unwrap_or(id);

        // Backtick-quote the id to survive UUID dashes
        let query = format!("SELECT * FROM {}:`{}`", table, pure_id);
        debug!("Executing query: {}", query);

        let mut response = self.client.query(&query).await.map_err(AppError::from)?;
        let results: Vec<T> = response.take(0)?;
        Ok(results.into_iter().next())
    }

    /// Merges a JSON patch into a record and returns the updated row.
    pub async fn update_by_id_with_json<T>(
        &self,
        table: &str,
        id: &str,
        updates: serde_json::Value,
    ) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de> + Send + Sync + Debug,
    {
        let prefix = format!("{}:", table);
        let pure_id = id.strip_prefix(&prefix).unwrap_or(id);

        let query = format!("UPDATE {}:`{}` MERGE $updates RETURN AFTER", table, pure_id);
        let mut response = self
            .query_with_params(&query, json!({ "updates": updates }))
            .await?;
        let results: Vec<T> = response.take(0)?;
        Ok(results.into_iter().next())
    }

    /// Deletes a record by id.
    pub async fn delete_by_id(&self, table: &str, id: &str) -> Result<()> {
        let prefix = format!("{}:", table);
        let pure_id = id.strip_prefix(&prefix).unwrap_or(id);

        let query = format!("DELETE {}:`{}`", table, pure_id);
        self.client.query(&query).await.map_err(AppError::from)?;
        Ok(())
    }

    /// Finds the first record matching a field equality.
    pub async fn find_one<T>(&self, table: &str, field: &str, value: &str) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de> + Send + Sync + Debug,
    {
        let query = format!("SELECT * FROM {} WHERE {} = $value LIMIT 1", table, field);
        let mut response = self
            .query_with_params(&query, json!({ "value": value }))
            .await?;
        let results: Vec<T> = response.take(0)?;
        Ok(results.into_iter().next())
    }

    /// Counts records matching a WHERE clause.
    pub async fn count_where<P>(&self, table: &str, condition: &str, params: P) -> Result<i64>
    where
        P: Serialize,
    {
        let query = format!(
            "SELECT count() AS count FROM {} WHERE {} GROUP ALL",
            table, condition
        );
        let mut response = self.query_with_params(&query, params).await?;
        let rows: Vec<serde_json::Value> = response.take(0)?;

        Ok(rows
            .first()
            .and_then(|row| row["count"].as_i64())
            .unwrap_or(0))
    }
}
