//! Backend trait for the memory API
//!
//! The stores and the conversation engine talk to the server through
//! this seam so they can be exercised against an in-memory mock in
//! tests. `remote::ApiClient` is the production implementation.

use async_trait::async_trait;

use crate::remote::error::ApiResult;
use crate::remote::types::{
    ActionResponse, Content, MessageResponse, Network, QueryRequest, QueryResponse, SaveRequest,
};

/// Operations the interaction core issues against the Hae server
#[async_trait]
pub trait MemoryBackend: Send + Sync {
    /// Fetch all networks
    async fn list_networks(&self) -> ApiResult<Vec<Network>>;

    /// Delete a network and all its contents
    async fn delete_network(&self, nid: i64) -> ApiResult<MessageResponse>;

    /// Rename a network
    async fn rename_network(&self, nid: i64, name: &str) -> ApiResult<MessageResponse>;

    /// Fetch the contents of one network
    async fn list_contents(&self, nid: i64) -> ApiResult<Vec<Content>>;

    /// Update a content's text; the returned content is authoritative
    async fn update_content(&self, nid: i64, cid: i64, content: &str) -> ApiResult<Content>;

    /// Delete one content
    async fn delete_content(&self, nid: i64, cid: i64) -> ApiResult<MessageResponse>;

    /// Persist a fact; absent `nid` lets the server infer or create
    /// the network from the text
    async fn save(&self, req: &SaveRequest) -> ApiResult<MessageResponse>;

    /// Answer a question from stored facts
    async fn query(&self, req: &QueryRequest) -> ApiResult<QueryResponse>;

    /// Classify a raw submission as save or send
    async fn determine_action(&self, text: &str) -> ApiResult<ActionResponse>;
}
