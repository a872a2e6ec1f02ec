// PostgREST (Supabase) backed datastore
use crate::error::{DatabaseError, DatabaseResult};
use crate::query::Query;
use crate::Datastore;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, info};

pub const URL_ENV: &str = "SUPABASE_URL";
pub const KEY_ENV: &str = "SUPABASE_SERVICE_KEY";

/// Connection parameters for the REST datastore
#[derive(Debug, Clone)]
pub struct DatastoreConfig {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl DatastoreConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Build from optional values, naming the first missing parameter
    pub fn from_parts(url: Option<String>, api_key: Option<String>) -> DatabaseResult<Self> {
        let url = url
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| DatabaseError::Configuration(format!("{URL_ENV} is not set")))?;
        let api_key = api_key
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| DatabaseError::Configuration(format!("{KEY_ENV} is not set")))?;
        Ok(Self::new(url, api_key))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> DatabaseResult<Self> {
        Self::from_parts(std::env::var(URL_ENV).ok(), std::env::var(KEY_ENV).ok())
    }
}

/// Datastore speaking the PostgREST dialect over HTTP
#[derive(Clone)]
pub struct RestDatastore {
    client: Client,
    rest_url: String,
}

impl RestDatastore {
    /// Build the HTTP client. PostgREST is stateless, so no request is made here.
    pub fn connect(config: &DatastoreConfig) -> DatabaseResult<Self> {
        let base = reqwest::Url::parse(&config.url)
            .map_err(|e| DatabaseError::Configuration(format!("invalid {URL_ENV}: {e}")))?;

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| DatabaseError::Configuration(format!("invalid {KEY_ENV}: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| DatabaseError::Configuration(format!("invalid {KEY_ENV}: {e}")))?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let rest_url = format!("{}/rest/v1", base.as_str().trim_end_matches('/'));
        info!(rest_url = %rest_url, "Datastore client configured");

        Ok(Self { client, rest_url })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.rest_url)
    }

    async fn send_for_rows(&self, table: &str, request: RequestBuilder) -> DatabaseResult<Vec<JsonValue>> {
        let response = request.send().await?;
        let response = check_status(table, response).await?;
        let rows: Vec<JsonValue> = response.json().await?;
        Ok(rows)
    }
}

async fn check_status(table: &str, response: Response) -> DatabaseResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    // PostgREST error bodies carry a `message` field.
    let message = serde_json::from_str::<JsonValue>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(JsonValue::as_str).map(str::to_string))
        .unwrap_or(body);

    Err(DatabaseError::query_failed(table, format!("HTTP {status}: {message}")))
}

#[async_trait]
impl Datastore for RestDatastore {
    async fn select(&self, query: &Query) -> DatabaseResult<Vec<JsonValue>> {
        let params = query.to_postgrest_params();
        debug!(table = %query.table, ?params, "Selecting rows");

        let request = self.client.get(self.table_url(&query.table)).query(&params);
        self.send_for_rows(&query.table, request).await
    }

    async fn insert(&self, table: &str, row: JsonValue) -> DatabaseResult<JsonValue> {
        debug!(table, "Inserting row");

        let request = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&row);

        self.send_for_rows(table, request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DatabaseError::query_failed(table, "insert returned no row"))
    }

    async fn update(&self, table: &str, id: &str, patch: JsonValue) -> DatabaseResult<JsonValue> {
        debug!(table, id, "Updating row");

        let request = self
            .client
            .patch(self.table_url(table))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&patch);

        self.send_for_rows(table, request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DatabaseError::not_found(table, id))
    }

    async fn delete(&self, table: &str, id: &str) -> DatabaseResult<()> {
        debug!(table, id, "Deleting row");

        let response = self
            .client
            .delete(self.table_url(table))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        check_status(table, response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Direction;
    use mockito::Matcher;
    use serde_json::json;

    fn store_for(server: &mockito::ServerGuard) -> RestDatastore {
        RestDatastore::connect(&DatastoreConfig::new(server.url(), "service-key")).unwrap()
    }

    #[test]
    fn test_missing_parameters_are_named() {
        let err = DatastoreConfig::from_parts(None, Some("key".into())).unwrap_err();
        assert!(err.to_string().contains(URL_ENV));

        let err = DatastoreConfig::from_parts(Some("https://x.supabase.co".into()), Some("  ".into()))
            .unwrap_err();
        assert!(err.to_string().contains(KEY_ENV));
    }

    #[tokio::test]
    async fn test_select_sends_postgrest_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/tasks")
            .match_header("apikey", "service-key")
            .match_header("authorization", "Bearer service-key")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), "*,patients(name)".into()),
                Matcher::UrlEncoded("status".into(), "in.(pending,inProgress)".into()),
                Matcher::UrlEncoded("order".into(), "priority.desc.nullslast".into()),
                Matcher::UrlEncoded("limit".into(), "5".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"t1","priority":4,"patients":{"name":"Ada"}}]"#)
            .create_async()
            .await;

        let query = Query::table("tasks")
            .in_list("status", ["pending", "inProgress"])
            .order_by("priority", Direction::Descending)
            .limit(5)
            .embed("patients", "patient_id", &["name"]);
        let rows = store_for(&server).select(&query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(rows, vec![json!({"id":"t1","priority":4,"patients":{"name":"Ada"}})]);
    }

    #[tokio::test]
    async fn test_error_body_message_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/visits")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"message":"column visits.foo does not exist"}"#)
            .create_async()
            .await;

        let err = store_for(&server)
            .select(&Query::table("visits"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("column visits.foo does not exist"));
    }

    #[tokio::test]
    async fn test_update_without_rows_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("PATCH", "/rest/v1/tasks")
            .match_query(Matcher::UrlEncoded("id".into(), "eq.t9".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let err = store_for(&server)
            .update("tasks", "t9", json!({"status": "completed"}))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }
}
