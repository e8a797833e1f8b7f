//! MCP server exposing the link analysis tools.

use crate::config::Config;
use crate::semantic::{DefaultEmbedder, HashingLoader, LazyEmbedder};
use crate::state::LinkState;
use crate::tools::analyze_links::{AnalyzeDefaults, AnalyzeLinksRequest, handle_analyze_links};
use crate::tools::normalize_urls::{NormalizeUrlsRequest, handle_normalize_urls};
use crate::tools::reset::{ResetRequest, handle_reset};
use crate::tools::toggle_keyword::{ToggleKeywordRequest, handle_toggle_keyword};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    service::{RequestContext, RoleServer},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP server for internal-link suggestions
#[derive(Clone)]
pub struct LinkServer {
    /// Session state (exclusions, last analysis, embedding cache)
    state: Arc<LinkState<DefaultEmbedder>>,

    /// Mode and limit used when a request omits them
    defaults: AnalyzeDefaults,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for LinkServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkServer")
            .field("state", &self.state)
            .field("defaults", &self.defaults)
            .finish()
    }
}

#[tool_router]
impl LinkServer {
    /// Create a server with the built-in hashing embedder.
    pub fn new(config: &Config) -> Self {
        let embedder = Arc::new(LazyEmbedder::new(HashingLoader {
            dimensions: config.embedding_dimensions,
        }));
        Self {
            state: Arc::new(LinkState::from_config(embedder, config)),
            defaults: AnalyzeDefaults {
                mode: config.default_mode,
                max_results: config.max_results,
            },
            tool_router: Self::tool_router(),
        }
    }

    /// Get a reference to the shared session state.
    pub fn link_state(&self) -> &Arc<LinkState<DefaultEmbedder>> {
        &self.state
    }

    #[tool(
        description = "Suggest internal links for an article. Scores each candidate URL by exact overlap between its slug and the article's keywords, then blends in semantic similarity between the slug and the article's paragraphs. Accepts URLs one per line, comma separated, or as sitemap XML.",
        input_schema = inline_schema_for_type::<AnalyzeLinksRequest>()
    )]
    async fn analyze_links(
        &self,
        Parameters(request): Parameters<AnalyzeLinksRequest>,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<String, String> {
        handle_analyze_links(self.state.as_ref(), self.defaults, request, &context.ct).await
    }

    #[tool(
        description = "Exclude a keyword from matching (or include it again if already excluded) and re-run the last analysis.",
        input_schema = inline_schema_for_type::<ToggleKeywordRequest>()
    )]
    async fn toggle_keyword(
        &self,
        Parameters(request): Parameters<ToggleKeywordRequest>,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<String, String> {
        handle_toggle_keyword(self.state.as_ref(), request, &context.ct).await
    }

    #[tool(
        description = "Clean a URL list: extracts sitemap <loc> entries, strips query strings, fragments and trailing slashes, and removes duplicates.",
        input_schema = inline_schema_for_type::<NormalizeUrlsRequest>()
    )]
    async fn normalize_urls(
        &self,
        Parameters(request): Parameters<NormalizeUrlsRequest>,
    ) -> std::result::Result<String, String> {
        handle_normalize_urls(&request)
    }

    #[tool(
        description = "Forget the last analysis, all excluded keywords and every cached embedding.",
        input_schema = inline_schema_for_type::<ResetRequest>()
    )]
    async fn reset(
        &self,
        Parameters(request): Parameters<ResetRequest>,
    ) -> std::result::Result<String, String> {
        Ok(handle_reset(self.state.as_ref(), request).await)
    }
}

#[tool_handler]
impl ServerHandler for LinkServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "interlink-mcp: suggests internal links for an article. \
                 Call analyze_links with the article text and candidate URLs, \
                 then toggle_keyword to drop misleading keywords. \
                 Results stay in the session until reset."
                    .to_string(),
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Sets `inline_subschemas = true` so enums such as the analysis mode are
/// inlined rather than referenced through `$ref`.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let object = serde_json::to_value(schema).expect("failed to serialize schema");

    let serde_json::Value::Object(json_object) = object else {
        panic!("Schema serialization produced non-object value");
    };

    Arc::new(json_object)
}
