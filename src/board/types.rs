use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric board identifier, sent as an integer in mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        GroupId(id.to_string())
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId(id.to_string())
    }
}

/// Decoded value of the numeric column on an item.
///
/// The board stores column values as JSON-encoded text, so a number arrives
/// as `"\"5\""` and has to be decoded twice. Anything that does not end up as
/// a finite number counts as zero when summed.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericValue {
    Present(f64),
    Missing,
    Unparseable(String),
}

impl NumericValue {
    /// Decode the raw column value as returned by the board API
    pub fn decode(raw: Option<&str>) -> Self {
        let raw = match raw {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return NumericValue::Missing,
        };

        let decoded: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(_) => return NumericValue::Unparseable(raw.to_string()),
        };

        let number = match &decoded {
            serde_json::Value::Null => return NumericValue::Missing,
            serde_json::Value::String(text) if text.trim().is_empty() => {
                return NumericValue::Missing
            }
            // Whole-string parse: a numeric prefix such as "5abc" is not a number
            serde_json::Value::String(text) => text.trim().parse::<f64>().ok(),
            serde_json::Value::Number(number) => number.as_f64(),
            _ => None,
        };

        match number {
            Some(n) if n.is_finite() => NumericValue::Present(n),
            _ => NumericValue::Unparseable(raw.to_string()),
        }
    }

    /// Contribution of this value to a sum
    pub fn amount(&self) -> f64 {
        match self {
            NumericValue::Present(n) => *n,
            NumericValue::Missing | NumericValue::Unparseable(_) => 0.0,
        }
    }
}

impl From<f64> for NumericValue {
    fn from(n: f64) -> Self {
        NumericValue::Present(n)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub value: NumericValue,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, value: NumericValue) -> Self {
        Self {
            id: ItemId(id.into()),
            name: name.into(),
            value,
        }
    }

    /// Build an item from its wire form, reading the given numeric column
    pub fn from_raw(raw: RawItem, column_id: &str) -> Self {
        let value = raw
            .column_values
            .iter()
            .find(|column| column.id == column_id)
            .map(|column| NumericValue::decode(column.value.as_deref()))
            .unwrap_or(NumericValue::Missing);

        if let NumericValue::Unparseable(text) = &value {
            tracing::debug!(
                item.id = %raw.id,
                column.id = column_id,
                raw = %text,
                "Numeric column value could not be parsed, counting it as 0"
            );
        }

        Self {
            id: ItemId(raw.id),
            name: raw.name,
            value,
        }
    }
}

/// Encode a reconciled sum the way the board expects it: `{"number": <value>}`
/// as a JSON string, with integral sums written without a fraction.
/// `None` for sums that have no JSON representation (infinite or NaN).
pub fn encode_number_value(value: f64) -> Option<String> {
    let number = if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serde_json::Number::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)?
    };
    Some(serde_json::json!({ "number": number }).to_string())
}

// Wire formats

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorEntry>,
    pub error_message: Option<String>,
    pub error_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlErrorEntry {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct BoardsData<B> {
    pub boards: Vec<B>,
}

#[derive(Debug, Deserialize)]
pub struct BoardGroups {
    pub groups: Vec<GroupRef>,
}

#[derive(Debug, Deserialize)]
pub struct GroupRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct BoardGroupItems {
    pub groups: Vec<GroupItems>,
}

#[derive(Debug, Deserialize)]
pub struct GroupItems {
    pub items_page: ItemsPage,
}

#[derive(Debug, Deserialize)]
pub struct NextItemsPageData {
    pub next_items_page: ItemsPage,
}

#[derive(Debug, Deserialize)]
pub struct ItemsPage {
    pub cursor: Option<String>,
    pub items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
pub struct RawItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub column_values: Vec<RawColumnValue>,
}

#[derive(Debug, Deserialize)]
pub struct RawColumnValue {
    pub id: String,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeColumnValueData {
    pub change_column_value: Option<MutatedItem>,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveItemData {
    pub archive_item: Option<MutatedItem>,
}

#[derive(Debug, Deserialize)]
pub struct MutatedItem {
    pub id: String,
}
