use crate::semantic::Embedder;
use crate::state::LinkState;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ResetRequest {}

/// Clears the session: last analysis, excluded keywords and cached embeddings.
pub async fn handle_reset<E: Embedder>(state: &LinkState<E>, _request: ResetRequest) -> String {
    state.reset().await;
    "Session cleared: results, excluded keywords and cached embeddings were discarded.".to_string()
}
