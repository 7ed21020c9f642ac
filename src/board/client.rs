use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::board::queries;
use crate::board::retry::RetryPolicy;
use crate::board::types::*;
use crate::board::BoardError;
use crate::config::BoardSweepConfig;
use crate::observability::board_metrics;

/// Trait for board operations to enable testing with mocks
#[async_trait]
pub trait BoardOps: Send + Sync {
    fn board_id(&self) -> BoardId;
    async fn list_groups(&self) -> Result<Vec<GroupId>, BoardError>;
    async fn list_items(&self, group_id: &GroupId) -> Result<Vec<Item>, BoardError>;
    async fn update_numeric_field(&self, item_id: &ItemId, value: f64) -> Result<(), BoardError>;
    async fn archive_item(&self, item_id: &ItemId) -> Result<(), BoardError>;
}

/// Rate-limited GraphQL client for a single board and numeric column
pub struct BoardClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    api_version: Option<String>,
    board_id: BoardId,
    column_id: String,
    page_size: u32,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for BoardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardClient")
            .field("endpoint", &self.endpoint)
            .field("board_id", &self.board_id)
            .field("column_id", &self.column_id)
            .field("page_size", &self.page_size)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl BoardClient {
    /// Create a client from validated configuration
    pub fn new(config: &BoardSweepConfig) -> Result<Self, BoardError> {
        let token = config.board.token.clone().ok_or_else(|| {
            BoardError::TokenNotFound(
                "Board API token not found. Please set the MONDAY_TOKEN environment variable."
                    .to_string(),
            )
        })?;
        let board_id = config.board.board_id.ok_or_else(|| {
            BoardError::ConfigNotFound(
                "Board id not configured. Please set the BOARD_ID environment variable."
                    .to_string(),
            )
        })?;

        let per_minute = NonZeroU32::new(config.rate_limit.requests_per_minute).ok_or_else(|| {
            BoardError::ConfigNotFound("rate_limit.requests_per_minute must be at least 1".to_string())
        })?;
        let burst = NonZeroU32::new(config.rate_limit.burst_capacity).ok_or_else(|| {
            BoardError::ConfigNotFound("rate_limit.burst_capacity must be at least 1".to_string())
        })?;
        let quota = Quota::per_minute(per_minute).allow_burst(burst);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.board.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.board.api_url.clone(),
            token,
            api_version: config.board.api_version.clone(),
            board_id: BoardId(board_id),
            column_id: config.board.column_id.clone(),
            page_size: config.board.page_size.max(1),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            retry: RetryPolicy::new(config.retry.clone()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn column_id(&self) -> &str {
        &self.column_id
    }

    /// Execute a GraphQL request with rate limiting and the configured retry policy
    async fn execute<T>(&self, operation: &str, query: &str, variables: Value) -> Result<T, BoardError>
    where
        T: DeserializeOwned,
    {
        let body = json!({ "query": query, "variables": variables });
        let result = self
            .retry
            .execute(operation, || self.send_once::<T>(operation, &body))
            .await;

        if result.is_err() {
            board_metrics().record_error();
        }
        result
    }

    async fn send_once<T>(&self, operation: &str, body: &Value) -> Result<T, BoardError>
    where
        T: DeserializeOwned,
    {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
            .await;

        board_metrics().record_request();
        debug!(operation, endpoint = %self.endpoint, "Executing board API request");

        let mut request = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, &self.token)
            .json(body);
        if let Some(version) = &self.api_version {
            request = request.header("API-Version", version);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BoardError::Http { status, body });
        }

        let text = response.text().await?;
        let parsed: GraphQlResponse<T> = serde_json::from_str(&text).map_err(|e| {
            BoardError::Protocol(format!("{operation}: could not decode response: {e}"))
        })?;

        if !parsed.errors.is_empty() || parsed.error_message.is_some() {
            let mut messages: Vec<String> = parsed.errors.into_iter().map(|e| e.message).collect();
            messages.extend(parsed.error_message);
            return Err(BoardError::Api {
                code: parsed.error_code,
                messages,
            });
        }

        parsed
            .data
            .ok_or_else(|| BoardError::Protocol(format!("{operation}: response has no data")))
    }

    fn first_board<B>(&self, operation: &str, data: BoardsData<B>) -> Result<B, BoardError> {
        data.boards.into_iter().next().ok_or_else(|| {
            BoardError::Protocol(format!(
                "{operation}: board {} not found in response",
                self.board_id
            ))
        })
    }
}

#[async_trait]
impl BoardOps for BoardClient {
    fn board_id(&self) -> BoardId {
        self.board_id
    }

    async fn list_groups(&self) -> Result<Vec<GroupId>, BoardError> {
        let data: BoardsData<BoardGroups> = self
            .execute(
                "list_groups",
                queries::LIST_GROUPS,
                json!({ "boardId": [self.board_id] }),
            )
            .await?;

        let board = self.first_board("list_groups", data)?;
        Ok(board.groups.into_iter().map(|g| GroupId(g.id)).collect())
    }

    async fn list_items(&self, group_id: &GroupId) -> Result<Vec<Item>, BoardError> {
        let data: BoardsData<BoardGroupItems> = self
            .execute(
                "list_items",
                queries::LIST_GROUP_ITEMS,
                json!({
                    "boardId": [self.board_id],
                    "groupId": [group_id],
                    "columnId": [self.column_id],
                    "limit": self.page_size,
                }),
            )
            .await?;

        let board = self.first_board("list_items", data)?;
        let mut page = board
            .groups
            .into_iter()
            .next()
            .map(|group| group.items_page)
            .ok_or_else(|| {
                BoardError::Protocol(format!("list_items: group {group_id} not found on board"))
            })?;

        let mut items = Vec::new();
        loop {
            items.extend(page.items.into_iter().map(|raw| Item::from_raw(raw, &self.column_id)));

            let cursor = match page.cursor {
                Some(cursor) => cursor,
                None => break,
            };
            debug!(group.id = %group_id, fetched = items.len(), "Fetching next items page");

            let next: NextItemsPageData = self
                .execute(
                    "list_items",
                    queries::NEXT_ITEMS_PAGE,
                    json!({
                        "cursor": cursor,
                        "columnId": [self.column_id],
                        "limit": self.page_size,
                    }),
                )
                .await?;
            page = next.next_items_page;
        }

        Ok(items)
    }

    async fn update_numeric_field(&self, item_id: &ItemId, value: f64) -> Result<(), BoardError> {
        let encoded = encode_number_value(value).ok_or_else(|| {
            BoardError::Protocol(format!(
                "update_numeric_field: {value} cannot be written to item {item_id}"
            ))
        })?;

        let data: ChangeColumnValueData = self
            .execute(
                "update_numeric_field",
                queries::UPDATE_NUMERIC_FIELD,
                json!({
                    "itemId": item_id,
                    "boardId": self.board_id,
                    "columnId": self.column_id,
                    "value": encoded,
                }),
            )
            .await?;

        data.change_column_value.map(|_| ()).ok_or_else(|| {
            BoardError::Protocol(format!("update_numeric_field: item {item_id} was not updated"))
        })
    }

    async fn archive_item(&self, item_id: &ItemId) -> Result<(), BoardError> {
        let data: ArchiveItemData = self
            .execute(
                "archive_item",
                queries::ARCHIVE_ITEM,
                json!({ "itemId": item_id }),
            )
            .await?;

        data.archive_item.map(|_| ()).ok_or_else(|| {
            BoardError::Protocol(format!("archive_item: item {item_id} was not archived"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_token() {
        let mut config = BoardSweepConfig::default();
        config.board.board_id = Some(42);

        assert!(matches!(
            BoardClient::new(&config),
            Err(BoardError::TokenNotFound(_))
        ));
    }

    #[test]
    fn test_client_requires_board_id() {
        let mut config = BoardSweepConfig::default();
        config.board.token = Some("test_token".to_string());

        assert!(matches!(
            BoardClient::new(&config),
            Err(BoardError::ConfigNotFound(_))
        ));
    }

    #[test]
    fn test_client_rejects_zero_rate_limit() {
        let mut config = BoardSweepConfig::default();
        config.board.token = Some("test_token".to_string());
        config.board.board_id = Some(42);
        config.rate_limit.requests_per_minute = 0;

        assert!(matches!(
            BoardClient::new(&config),
            Err(BoardError::ConfigNotFound(_))
        ));
    }

    #[test]
    fn test_client_uses_configured_board() {
        let mut config = BoardSweepConfig::default();
        config.board.token = Some("test_token".to_string());
        config.board.board_id = Some(42);
        config.board.column_id = "numbers7".to_string();

        let client = BoardClient::new(&config).unwrap();
        assert_eq!(client.board_id(), BoardId(42));
        assert_eq!(client.column_id(), "numbers7");
        assert_eq!(client.endpoint(), "https://api.monday.com/v2");
    }
}
