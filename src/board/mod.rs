pub mod client;
pub mod errors;
#[cfg(test)]
pub mod mocks;
pub mod queries;
pub mod retry;
pub mod types;

pub use client::{BoardClient, BoardOps};
pub use errors::BoardError;
pub use retry::RetryPolicy;
pub use types::{BoardId, GroupId, Item, ItemId, NumericValue};
