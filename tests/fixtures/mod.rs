//! Board API mock server for deterministic testing
//!
//! Every GraphQL document carries an operation name, so mocks are matched on
//! that name plus the variables they care about.

#![allow(dead_code)]

use board_sweep::config::BoardSweepConfig;
use board_sweep::BoardClient;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "mock-token";
pub const BOARD_ID: u64 = 4242;
pub const COLUMN_ID: &str = "numbers";

pub struct BoardApiMock {
    pub server: MockServer,
}

impl BoardApiMock {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v2", self.server.uri())
    }

    /// Configuration pointing at the mock server, with a generous rate limit
    pub fn config(&self) -> BoardSweepConfig {
        let mut config = BoardSweepConfig::default();
        config.board.token = Some(TOKEN.to_string());
        config.board.board_id = Some(BOARD_ID);
        config.board.api_url = self.endpoint();
        config.rate_limit.requests_per_minute = 6000;
        config.rate_limit.burst_capacity = 100;
        config
    }

    pub fn client(&self) -> BoardClient {
        BoardClient::new(&self.config()).unwrap()
    }

    fn graphql(operation: &str) -> wiremock::MockBuilder {
        Mock::given(method("POST"))
            .and(path("/v2"))
            .and(header("authorization", TOKEN))
            .and(body_string_contains(operation))
    }

    pub async fn mock_groups(&self, group_ids: &[&str]) {
        let groups: Vec<Value> = group_ids.iter().map(|id| json!({ "id": id })).collect();
        Self::graphql("query ListGroups")
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "boards": [{ "groups": groups }] } })),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock a single-page group listing
    pub async fn mock_group_items(&self, group_id: &str, items: Vec<Value>) {
        self.mock_group_page(group_id, items, None).await;
    }

    pub async fn mock_group_page(&self, group_id: &str, items: Vec<Value>, cursor: Option<&str>) {
        Self::graphql("query ListGroupItems")
            .and(body_partial_json(json!({ "variables": { "groupId": [group_id] } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "boards": [{ "groups": [{
                    "items_page": { "cursor": cursor, "items": items }
                }] }] }
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_next_page(&self, cursor: &str, items: Vec<Value>, next: Option<&str>) {
        Self::graphql("query NextItemsPage")
            .and(body_partial_json(json!({ "variables": { "cursor": cursor } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "next_items_page": { "cursor": next, "items": items } }
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_update(&self, item_id: &str, expected_calls: u64) {
        Self::graphql("mutation UpdateNumericField")
            .and(body_partial_json(json!({ "variables": { "itemId": item_id } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "change_column_value": { "id": item_id } }
            })))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_archive(&self, item_id: &str, expected_calls: u64) {
        Self::graphql("mutation ArchiveItem")
            .and(body_partial_json(json!({ "variables": { "itemId": item_id } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "archive_item": { "id": item_id } }
            })))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_archive_failure(&self, item_id: &str, status: u16) {
        Self::graphql("mutation ArchiveItem")
            .and(body_partial_json(json!({ "variables": { "itemId": item_id } })))
            .respond_with(ResponseTemplate::new(status).set_body_string("item is locked"))
            .mount(&self.server)
            .await;
    }

    /// Any operation matching `operation` answers with the given status
    pub async fn mock_status(&self, operation: &str, status: u16) {
        Self::graphql(operation)
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream unavailable"))
            .mount(&self.server)
            .await;
    }

    /// Like `mock_status`, but only for the first `times` matching requests.
    /// Mount it before the mock that should answer afterwards.
    pub async fn mock_status_times(&self, operation: &str, status: u16, times: u64) {
        Self::graphql(operation)
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream unavailable"))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_error_payload(&self, operation: &str, body: Value) {
        Self::graphql(operation)
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Operation names of every request received, in order
    pub async fn received_operations(&self) -> Vec<(String, Value)> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| {
                let body: Value = serde_json::from_slice(&request.body).unwrap();
                let query = body["query"].as_str().unwrap_or_default();
                let operation = query
                    .split(|c: char| c == '(' || c == '{')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                (operation, body["variables"].clone())
            })
            .collect()
    }
}

/// An item as the board API returns it, with a double-encoded number
pub fn raw_item(id: &str, name: &str, number: Option<&str>) -> Value {
    let value = number.map(|n| serde_json::to_string(n).unwrap());
    json!({
        "id": id,
        "name": name,
        "column_values": [{ "id": COLUMN_ID, "value": value }]
    })
}
