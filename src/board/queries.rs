// GraphQL documents sent to the board API. Every document is parameterized
// through variables; nothing user-supplied is spliced into the query text.

pub const LIST_GROUPS: &str = r#"query ListGroups($boardId: [ID!]) {
  boards(ids: $boardId) {
    groups {
      id
    }
  }
}"#;

pub const LIST_GROUP_ITEMS: &str = r#"query ListGroupItems($boardId: [ID!], $groupId: [String], $columnId: [String!], $limit: Int!) {
  boards(ids: $boardId) {
    groups(ids: $groupId) {
      items_page(limit: $limit) {
        cursor
        items {
          id
          name
          column_values(ids: $columnId) {
            id
            value
          }
        }
      }
    }
  }
}"#;

pub const NEXT_ITEMS_PAGE: &str = r#"query NextItemsPage($cursor: String!, $columnId: [String!], $limit: Int!) {
  next_items_page(cursor: $cursor, limit: $limit) {
    cursor
    items {
      id
      name
      column_values(ids: $columnId) {
        id
        value
      }
    }
  }
}"#;

pub const UPDATE_NUMERIC_FIELD: &str = r#"mutation UpdateNumericField($itemId: ID!, $boardId: ID!, $columnId: String!, $value: JSON!) {
  change_column_value(item_id: $itemId, board_id: $boardId, column_id: $columnId, value: $value) {
    id
  }
}"#;

pub const ARCHIVE_ITEM: &str = r#"mutation ArchiveItem($itemId: ID!) {
  archive_item(item_id: $itemId) {
    id
  }
}"#;
