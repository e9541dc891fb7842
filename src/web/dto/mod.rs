//! Data transfer objects for the Web API.

pub mod response;

pub use response::{HealthResponse, MessagesResponse, OnlineUsersResponse};
