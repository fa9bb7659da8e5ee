use {
    crate::notion::{
        Filter,
        NotionError,
        Page,
        PropertyUpdate,
        QueryRequest,
        QueryResponse,
        UpdatePageRequest,
    },
    log::debug,
    reqwest::{Client, RequestBuilder},
    serde::de::DeserializeOwned,
    std::collections::BTreeMap,
};

/// Default Notion API endpoint.
pub const NOTION_API_BASE: &str = "https://api.notion.com";
/// API version sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Builder for NotionClient configuration
pub struct NotionClientBuilder {
    client: Client,
    base_url: String,
    token: String,
    version: String,
}

impl NotionClientBuilder {
    /// Create a new NotionClientBuilder authenticating with the given
    /// integration token.
    pub fn new(token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: NOTION_API_BASE.to_string(),
            token: token.to_string(),
            version: NOTION_VERSION.to_string(),
        }
    }

    /// Set a custom HTTP client
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Set a custom API base URL
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set a custom `Notion-Version` header value
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Build the NotionClient with the configured settings
    pub fn build(self) -> NotionClient {
        NotionClient {
            client: self.client,
            base_url: self.base_url,
            token: self.token,
            version: self.version,
        }
    }
}

/// Client for the Notion REST API
pub struct NotionClient {
    client: Client,
    base_url: String,
    token: String,
    version: String,
}

impl NotionClient {
    /// Get a builder to create a customized NotionClient
    pub fn builder(token: &str) -> NotionClientBuilder {
        NotionClientBuilder::new(token)
    }

    /// Query one page of results from a database.
    ///
    /// # Arguments
    /// * `database_id` - The database to query
    /// * `filter` - Optional filter, all rows are returned without one
    /// * `start_cursor` - Cursor returned as `next_cursor` by the previous page
    pub async fn query_database(
        &self,
        database_id: &str,
        filter: Option<&Filter>,
        start_cursor: Option<&str>,
    ) -> Result<QueryResponse, NotionError> {
        let url = format!("{}/v1/databases/{}/query", self.base_url, database_id);

        debug!("POST {url} (cursor: {start_cursor:?})");

        let body = QueryRequest {
            filter,
            start_cursor,
        };

        self.send(self.client.post(&url).json(&body)).await
    }

    /// Partially update a page. Properties not present in `properties` are
    /// left as they are.
    pub async fn update_page(
        &self,
        page_id: &str,
        properties: &BTreeMap<String, PropertyUpdate>,
    ) -> Result<Page, NotionError> {
        let url = format!("{}/v1/pages/{}", self.base_url, page_id);

        debug!("PATCH {url}");

        let body = UpdatePageRequest { properties };

        self.send(self.client.patch(&url).json(&body)).await
    }

    async fn send<T>(&self, request: RequestBuilder) -> Result<T, NotionError>
    where
        T: DeserializeOwned,
    {
        let response = request
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.version)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(NotionError::from_response(status, text));
        }

        Ok(serde_json::from_str::<T>(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        assert_matches::assert_matches,
        mockito::{Matcher, Server},
        rust_decimal_macros::dec,
        serde_json::json,
    };

    async fn create_server_and_client() -> (mockito::ServerGuard, NotionClient) {
        let server = Server::new_async().await;
        let client = NotionClient::builder("secret_token")
            .with_base_url(&server.url())
            .build();

        (server, client)
    }

    #[tokio::test]
    async fn test_query_database_sends_filter_and_cursor() {
        let (mut server, client) = create_server_and_client().await;

        let filter = Filter::select_equals("Ticker", "BTC");

        let mock = server
            .mock("POST", "/v1/databases/db-1/query")
            .match_header("authorization", "Bearer secret_token")
            .match_header("notion-version", NOTION_VERSION)
            .match_body(Matcher::Json(json!({
                "filter": { "property": "Ticker", "select": { "equals": "BTC" } },
                "start_cursor": "cursor-1"
            })))
            .with_status(200)
            .with_body(
                json!({
                    "object": "list",
                    "results": [{ "object": "page", "id": "page-1", "properties": {} }],
                    "has_more": false,
                    "next_cursor": null
                })
                .to_string(),
            )
            .create_async()
            .await;

        let response = client
            .query_database("db-1", Some(&filter), Some("cursor-1"))
            .await
            .expect("Query should succeed");

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].id, "page-1");
        assert!(!response.has_more);
        assert_eq!(response.next_cursor, None);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_page() {
        let (mut server, client) = create_server_and_client().await;

        let mock = server
            .mock("PATCH", "/v1/pages/page-1")
            .match_body(Matcher::Json(json!({
                "properties": { "Price today": { "number": 50000.0 } }
            })))
            .with_status(200)
            .with_body(json!({ "object": "page", "id": "page-1", "properties": {} }).to_string())
            .create_async()
            .await;

        let mut properties = BTreeMap::new();
        properties.insert("Price today".to_string(), PropertyUpdate::Number(dec!(50000)));

        let page = client
            .update_page("page-1", &properties)
            .await
            .expect("Update should succeed");

        assert_eq!(page.id, "page-1");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_is_decoded() {
        let (mut server, client) = create_server_and_client().await;

        let mock = server
            .mock("POST", "/v1/databases/missing/query")
            .with_status(404)
            .with_body(
                json!({
                    "object": "error",
                    "status": 404,
                    "code": "object_not_found",
                    "message": "Could not find database with ID: missing."
                })
                .to_string(),
            )
            .create_async()
            .await;

        let result = client.query_database("missing", None, None).await;

        assert_matches!(
            result,
            Err(NotionError::Api { status, code, .. })
                if status.as_u16() == 404 && code == "object_not_found"
        );

        mock.assert_async().await;
    }
}
