//! Tracker-database API client.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use serde_json::{Map, Value, json};

use super::error::NotionError;
use super::types::{CreatedPage, QueryResponse, TrackedRow};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::http::reqwest_transport::ReqwestTransport;

/// API version header value required on every request.
const API_VERSION: &str = "2022-06-28";

/// Tracker-database API client.
///
/// Bound to a single database (table): the database ID is part of the
/// client, not of each call.
#[derive(Clone)]
pub struct NotionClient {
    transport: Arc<dyn HttpTransport>,
    host: String,
    token: String,
    database_id: String,
}

impl NotionClient {
    /// Create a new client against `host` (e.g. "https://api.notion.com").
    pub fn new(host: &str, token: &str, database_id: &str) -> Result<Self, NotionError> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))
            .map_err(|e| NotionError::Http(e.to_string()))?;
        Ok(Self::new_with_transport(
            host,
            token,
            database_id,
            Arc::new(transport),
        ))
    }

    pub fn new_with_transport(
        host: &str,
        token: &str,
        database_id: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            host: host.trim_end_matches('/').to_string(),
            token: token.to_string(),
            database_id: database_id.to_string(),
        }
    }

    /// Get the database ID this client writes to.
    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: &Value,
    ) -> Result<HttpResponse, NotionError> {
        let request = HttpRequest {
            method,
            url: format!("{}{}", self.host, path),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.token),
                ),
                ("Notion-Version".to_string(), API_VERSION.to_string()),
            ],
            body: serde_json::to_vec(body)?,
        };

        self.transport
            .send(request)
            .await
            .map_err(|e| NotionError::Http(e.to_string()))
    }

    /// Fetch the full current snapshot of tracked rows.
    ///
    /// Single query, no cursor handling; databases beyond one response page
    /// are out of scope for this tool.
    pub async fn list_rows(&self) -> Result<Vec<TrackedRow>, NotionError> {
        let path = format!("/v1/databases/{}/query", self.database_id);
        let response = self.send(HttpMethod::Post, &path, &json!({})).await?;

        if !(200..300).contains(&response.status) {
            return Err(NotionError::Query {
                status: response.status,
                message: response.body_text(),
            });
        }

        let query: QueryResponse = serde_json::from_slice(&response.body)?;
        let rows = query
            .results
            .iter()
            .filter_map(|page| {
                let row = page.to_tracked_row();
                if row.is_none() {
                    tracing::debug!(page_id = %page.id, "Skipping row without numeric ID property");
                }
                row
            })
            .collect();
        Ok(rows)
    }

    /// Create a new row with a full property set and optional cover image.
    ///
    /// Returns the new page ID.
    pub async fn create_row(
        &self,
        properties: Map<String, Value>,
        cover_url: Option<&str>,
    ) -> Result<String, NotionError> {
        let mut body = json!({
            "parent": { "database_id": self.database_id },
            "properties": properties,
        });
        if let Some(url) = cover_url {
            body["cover"] = json!({ "external": { "url": url } });
        }

        let response = self.send(HttpMethod::Post, "/v1/pages", &body).await?;

        if !(200..300).contains(&response.status) {
            return Err(NotionError::Write {
                status: response.status,
                message: response.body_text(),
            });
        }

        let created: CreatedPage = serde_json::from_slice(&response.body)?;
        Ok(created.id)
    }

    /// Apply a partial property update to an existing row.
    pub async fn patch_row(
        &self,
        page_id: &str,
        properties: Map<String, Value>,
    ) -> Result<(), NotionError> {
        let path = format!("/v1/pages/{page_id}");
        let body = json!({ "properties": properties });

        let response = self.send(HttpMethod::Patch, &path, &body).await?;

        if !(200..300).contains(&response.status) {
            return Err(NotionError::Write {
                status: response.status,
                message: response.body_text(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{MockTransport, header_get};

    const HOST: &str = "https://notion.test";
    const DB: &str = "db-1";

    fn client(transport: &MockTransport) -> NotionClient {
        NotionClient::new_with_transport(HOST, "secret", DB, Arc::new(transport.clone()))
    }

    #[tokio::test]
    async fn list_rows_extracts_tracked_rows() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Post,
            format!("{HOST}/v1/databases/{DB}/query"),
            r#"{"results": [
                {"id": "p1", "properties": {"ID": {"number": 551},
                    "Box": {"title": [{"text": {"content": "Sau"}}]}}},
                {"id": "p2", "properties": {"ID": {"number": 480},
                    "Box": {"title": [{"text": {"content": "Cascade"}}]}}},
                {"id": "stray", "properties": {"Box": {"title": []}}}
            ]}"#,
        );

        let rows = client(&transport).list_rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].machine_id, 551);
        assert_eq!(rows[0].name, "Sau");
        assert_eq!(rows[1].page_id, "p2");
    }

    #[tokio::test]
    async fn list_rows_non_success_is_query_error() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Post,
            format!("{HOST}/v1/databases/{DB}/query"),
            HttpResponse {
                status: 401,
                headers: Vec::new(),
                body: b"unauthorized".to_vec(),
            },
        );

        let err = client(&transport).list_rows().await.unwrap_err();
        assert!(matches!(err, NotionError::Query { status: 401, .. }));
    }

    #[tokio::test]
    async fn create_row_posts_parent_and_cover_and_returns_page_id() {
        let transport = MockTransport::new();
        transport.push_json(HttpMethod::Post, format!("{HOST}/v1/pages"), r#"{"id": "new-page"}"#);

        let mut properties = Map::new();
        properties.insert("ID".to_string(), json!({ "number": 42 }));

        let page_id = client(&transport)
            .create_row(properties, Some("https://htb.test/storage/avatars/42.png"))
            .await
            .unwrap();
        assert_eq!(page_id, "new-page");

        let requests = transport.requests();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["parent"]["database_id"], DB);
        assert_eq!(
            body["cover"]["external"]["url"],
            "https://htb.test/storage/avatars/42.png"
        );
        assert_eq!(body["properties"]["ID"]["number"], 42);
    }

    #[tokio::test]
    async fn create_row_non_success_is_write_error() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Post,
            format!("{HOST}/v1/pages"),
            HttpResponse {
                status: 400,
                headers: Vec::new(),
                body: b"validation_error".to_vec(),
            },
        );

        let err = client(&transport)
            .create_row(Map::new(), None)
            .await
            .unwrap_err();
        match err {
            NotionError::Write { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "validation_error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn patch_row_sends_properties_only() {
        let transport = MockTransport::new();
        transport.push_json(HttpMethod::Patch, format!("{HOST}/v1/pages/p1"), r#"{"id": "p1"}"#);

        let mut properties = Map::new();
        properties.insert(
            "Status".to_string(),
            json!({ "select": { "name": "Retired" } }),
        );

        client(&transport).patch_row("p1", properties).await.unwrap();

        let requests = transport.requests();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["properties"]["Status"]["select"]["name"], "Retired");
        assert!(body.get("parent").is_none());
    }

    #[tokio::test]
    async fn requests_carry_versioned_auth_headers() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Post,
            format!("{HOST}/v1/databases/{DB}/query"),
            r#"{"results": []}"#,
        );

        client(&transport).list_rows().await.unwrap();

        let requests = transport.requests();
        let headers = &requests[0].headers;
        assert_eq!(header_get(headers, "authorization"), Some("Bearer secret"));
        assert_eq!(header_get(headers, "notion-version"), Some("2022-06-28"));
        assert_eq!(header_get(headers, "content-type"), Some("application/json"));
    }
}
