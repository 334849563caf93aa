//! MCP (Model Context Protocol) server implementation.
//!
//! This module exposes the dataset queries over the MCP protocol, making them
//! available to AI assistants (Claude Code, Cursor, etc.) via stdio transport.
//!
//! # Architecture
//!
//! The MCP server is a presentation layer. It wraps the same core library and
//! report builders the CLI commands use, so a tool returns the same JSON as
//! the matching command with `--json`. Every tool call is one request with
//! its own [`RequestCache`].
//!
//! # Adding Tools
//!
//! 1. Define a parameter struct with `Deserialize` + `JsonSchema`
//! 2. Add a `#[tool(description = "...")]` method to the `#[tool_router]` impl
//! 3. Call core library functions, convert errors with `tool_error`
//! 4. Return `CallToolResult::success(vec![Content::text(...)])`

use std::sync::Arc;

use camino::Utf8PathBuf;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use royal_pipes_core::signature::{Prior, PriorBasis};
use royal_pipes_core::source::{ComparisonKind, CountSource, EntitySource};
use royal_pipes_core::{Config, Dataset, Facet, QueryError, RequestCache, SignatureOptions};

use crate::commands::word::Layout;
use crate::commands::{decades, monarchs, signatures, speeches, word};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `word_frequency` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct WordFrequencyParams {
    /// The word, matched exactly.
    pub word: String,
    /// Count table: "word" (every word) or "odds" (betting-pool words).
    #[serde(default = "default_count_source")]
    pub source: CountSource,
}

const fn default_count_source() -> CountSource {
    CountSource::Word
}

/// Ranking criterion for `top_words`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WordRanking {
    /// Total occurrences.
    #[default]
    Count,
    /// Number of speeches using the word.
    Speeches,
}

/// Parameters for the `top_words` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct TopWordsParams {
    /// Ranking criterion: "count" or "speeches".
    #[serde(default)]
    pub by: WordRanking,
    /// Number of words to return (default 20).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Keep stopwords in the ranking.
    #[serde(default)]
    pub include_stopwords: bool,
}

const fn default_limit() -> usize {
    20
}

/// Parameters for the `top_entities` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct TopEntitiesParams {
    /// Entity table: "person" or "place".
    pub kind: EntitySource,
    /// Number of entities to return (default 20).
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Parameters for the `search_words` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchWordsParams {
    /// Case-insensitive prefix. Empty returns the most widespread words.
    #[serde(default)]
    pub prefix: String,
    /// Number of suggestions (default 10).
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

const fn default_search_limit() -> usize {
    10
}

/// Parameters for the `corpus_breakdown` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CorpusBreakdownParams {
    /// Group speeches by "monarch" or "decade".
    pub kind: ComparisonKind,
    /// Stored signature words per group (defaults to 12 for monarchs, 10 for decades).
    pub top_k: Option<usize>,
}

/// Parameters for the `signature_words` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SignatureWordsParams {
    /// Slice the corpus by "decade" or "monarch".
    pub kind: ComparisonKind,
    /// Decade (e.g. "1980s" or "1987") or monarch name.
    pub value: String,
    /// Prior concentration (defaults to the configured value).
    pub alpha: Option<f64>,
    /// Prior basis: "background" or "pooled".
    pub prior: Option<PriorBasis>,
    /// Keep stopwords (defaults to the configured value).
    pub include_stopwords: Option<bool>,
    /// Number of words to return (defaults to the configured top_k).
    pub top_k: Option<usize>,
}

/// Where the dataset comes from.
#[derive(Clone)]
enum DatasetHandle {
    /// Open the shared handle on first use.
    Lazy(Utf8PathBuf),
    /// Already open.
    Ready(&'static Dataset),
}

impl DatasetHandle {
    fn get(&self) -> Result<&'static Dataset, McpError> {
        match self {
            Self::Lazy(path) => Dataset::shared(path).map_err(|e| tool_error(e.into())),
            Self::Ready(dataset) => Ok(dataset),
        }
    }
}

/// Map an error to MCP: bad input is `invalid_params`, the rest is internal.
fn tool_error(err: anyhow::Error) -> McpError {
    let message = format!("{err:#}");
    match err.downcast_ref::<QueryError>() {
        Some(QueryError::Dataset(_)) | None => McpError::internal_error(message, None),
        Some(_) => McpError::invalid_params(message, None),
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// MCP server exposing the dataset queries to AI assistants.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct ProjectServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    dataset: DatasetHandle,
    config: Arc<Config>,
}

#[tool_router]
impl ProjectServer {
    /// Create a server that opens the dataset at `dataset_path` on first use.
    pub fn new(dataset_path: Utf8PathBuf, config: Config) -> Self {
        Self {
            tool_router: Self::tool_router(),
            dataset: DatasetHandle::Lazy(dataset_path),
            config: Arc::new(config),
        }
    }

    /// Create a server over an already open dataset.
    pub fn with_dataset(dataset: &'static Dataset, config: Config) -> Self {
        Self {
            tool_router: Self::tool_router(),
            dataset: DatasetHandle::Ready(dataset),
            config: Arc::new(config),
        }
    }

    /// Fresh request cache for one tool call.
    fn request(&self) -> Result<RequestCache<'static>, McpError> {
        Ok(RequestCache::new(self.dataset.get()?))
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        #[allow(unused_variables)] Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// One word's total, yearly series, and summary.
    #[tool(
        description = "How often a word was said in each New Year's speech: total count, per-year series with the monarch, first/last mention, peak year, top monarch, and longest streak."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", word = %params.word))]
    fn word_frequency(
        &self,
        Parameters(params): Parameters<WordFrequencyParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "word_frequency", source = %params.source, "executing MCP tool");

        let cache = self.request()?;
        let report = word::word_report(&cache, params.word, params.source, Layout::Years)
            .map_err(tool_error)?;

        tracing::info!(tool = "word_frequency", "MCP tool completed");
        json_result(&report)
    }

    /// Most used words.
    #[tool(
        description = "Rank words by total occurrences or by number of speeches using them. Stopwords are excluded unless include_stopwords is set."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn top_words(
        &self,
        Parameters(params): Parameters<TopWordsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "top_words", by = ?params.by, limit = params.limit, "executing MCP tool");

        let cache = self.request()?;
        let words = match params.by {
            WordRanking::Count => cache.most_used_words(params.limit, params.include_stopwords),
            WordRanking::Speeches => {
                cache.words_in_most_speeches(params.limit, params.include_stopwords)
            }
        }
        .map_err(|e| tool_error(e.into()))?;

        tracing::info!(tool = "top_words", count = words.len(), "MCP tool completed");
        json_result(&words)
    }

    /// Most mentioned people or places.
    #[tool(description = "Rank the most mentioned people (person) or places (place).")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", kind = %params.kind))]
    fn top_entities(
        &self,
        Parameters(params): Parameters<TopEntitiesParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "top_entities", limit = params.limit, "executing MCP tool");

        let cache = self.request()?;
        let entities = cache
            .most_used_entities(params.limit, params.kind)
            .map_err(|e| tool_error(e.into()))?;

        tracing::info!(tool = "top_entities", count = entities.len(), "MCP tool completed");
        json_result(&entities)
    }

    /// Prefix search over every known word.
    #[tool(
        description = "Find words starting with a prefix (case-insensitive), most widespread first. Betting-pool words are tagged type=odds."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", prefix = %params.prefix))]
    fn search_words(
        &self,
        Parameters(params): Parameters<SearchWordsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "search_words", limit = params.limit, "executing MCP tool");

        let cache = self.request()?;
        let suggestions = cache
            .search_suggestions(&params.prefix, params.limit)
            .map_err(|e| tool_error(e.into()))?;

        tracing::info!(tool = "search_words", count = suggestions.len(), "MCP tool completed");
        json_result(&suggestions)
    }

    /// Betting-pool words.
    #[tool(
        description = "Every betting-pool word with its odds, last mention, and whether it was said in each of the five most recent speeches (newest first)."
    )]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn odds_words(&self) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "odds_words", "executing MCP tool");

        let cache = self.request()?;
        let words = cache.all_odds_words().map_err(|e| tool_error(e.into()))?;

        tracing::info!(tool = "odds_words", count = words.len(), "MCP tool completed");
        json_result(&words)
    }

    /// Every speech.
    #[tool(description = "List every speech (year, monarch, word count) in year order.")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn list_speeches(&self) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "list_speeches", "executing MCP tool");

        let cache = self.request()?;
        let report = speeches::speeches_report(&cache).map_err(|e| tool_error(e.into()))?;

        tracing::info!(tool = "list_speeches", "MCP tool completed");
        json_result(&report)
    }

    /// Per-monarch or per-decade statistics with stored signature words.
    #[tool(
        description = "Per-monarch or per-decade statistics (speech count, years, average length) with the precomputed signature words of each group."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", kind = %params.kind))]
    fn corpus_breakdown(
        &self,
        Parameters(params): Parameters<CorpusBreakdownParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "corpus_breakdown", top_k = ?params.top_k, "executing MCP tool");

        let cache = self.request()?;
        let top_k = params.top_k.or(self.config.top_k);
        let result = match params.kind {
            ComparisonKind::Monarch => {
                let rows = monarchs::monarch_rows(&cache, top_k.unwrap_or(monarchs::DEFAULT_TOP))
                    .map_err(|e| tool_error(e.into()))?;
                json_result(&rows)
            }
            ComparisonKind::Decade => {
                let rows = decades::decade_rows(&cache, top_k.unwrap_or(decades::DEFAULT_TOP))
                    .map_err(|e| tool_error(e.into()))?;
                json_result(&rows)
            }
        };

        tracing::info!(tool = "corpus_breakdown", "MCP tool completed");
        result
    }

    /// Score signature words on demand.
    #[tool(
        description = "Score the words that characterize one decade or monarch against all other speeches (weighted log-odds with an informative Dirichlet prior). Returns the top words by score."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", kind = %params.kind, value = %params.value))]
    fn signature_words(
        &self,
        Parameters(params): Parameters<SignatureWordsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "signature_words", alpha = ?params.alpha, "executing MCP tool");

        let configured = self.config.signature_options();
        let options = SignatureOptions {
            prior: Prior::new(params.alpha.unwrap_or(configured.prior.alpha))
                .with_basis(params.prior.unwrap_or(configured.prior.basis)),
            include_stopwords: params
                .include_stopwords
                .unwrap_or(configured.include_stopwords),
        };
        let top = params.top_k.unwrap_or_else(|| self.config.top_k());

        let facet = Facet::new(params.kind, &params.value).map_err(|e| tool_error(e.into()))?;
        let cache = self.request()?;
        let report =
            signatures::signatures_report(&cache, facet, options, top).map_err(tool_error)?;

        tracing::info!(tool = "signature_words", "MCP tool completed");
        json_result(&report)
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Word statistics and signature words from the Danish New Year's Eve speeches. Words are matched exactly as stored (lowercase).",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;
    use rusqlite::Connection;

    const SEED: &str = include_str!("../tests/fixtures/seed.sql");

    fn server() -> ProjectServer {
        let conn = Connection::open_in_memory().expect("in-memory sqlite");
        conn.execute_batch(royal_pipes_core::dataset::SCHEMA)
            .expect("schema");
        conn.execute_batch(SEED).expect("seed");
        let dataset = Dataset::from_connection(conn).expect("dataset");
        ProjectServer::with_dataset(Box::leak(Box::new(dataset)), Config::default())
    }

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn json_of(result: &CallToolResult) -> serde_json::Value {
        let text = extract_text(result).expect("should have text content");
        serde_json::from_str(text).expect("valid JSON")
    }

    #[test]
    fn server_info_has_correct_name() {
        let server = server();
        let info = ServerHandler::get_info(&server);

        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
        let instructions = info.instructions.expect("server should have instructions");
        assert!(instructions.contains(env!("CARGO_PKG_NAME")));
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let server = server();
        let params = Parameters(GetInfoParams {
            format: "json".to_string(),
        });

        let result = server.get_info(params).expect("get_info should succeed");
        let json = json_of(&result);
        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn word_frequency_tool_reports_series() {
        let server = server();
        let result = server
            .word_frequency(Parameters(WordFrequencyParams {
                word: "danmark".to_string(),
                source: CountSource::Word,
            }))
            .expect("word_frequency should succeed");
        assert!(!result.is_error.unwrap_or(false));

        let json = json_of(&result);
        assert_eq!(json["total_count"], 9);
        assert_eq!(json["series"].as_array().unwrap().len(), 5);
        assert_eq!(json["statistics"]["peak"]["year"], 2024);
        assert!(json.get("last_mention").is_none());
    }

    #[test]
    fn word_frequency_tool_on_odds_table() {
        let server = server();
        let result = server
            .word_frequency(Parameters(WordFrequencyParams {
                word: "grønland".to_string(),
                source: CountSource::Odds,
            }))
            .expect("word_frequency should succeed");

        let json = json_of(&result);
        assert_eq!(json["total_count"], 2);
        assert_eq!(json["last_mention"]["year"], 2024);
        assert_eq!(json["last_mention"]["monarch"], "Frederik X");
    }

    #[test]
    fn unknown_word_is_not_an_error() {
        let server = server();
        let result = server
            .word_frequency(Parameters(WordFrequencyParams {
                word: "rumskib".to_string(),
                source: CountSource::Word,
            }))
            .expect("word_frequency should succeed");

        let json = json_of(&result);
        assert_eq!(json["total_count"], 0);
        assert!(json["statistics"].is_null());
    }

    #[test]
    fn top_words_tool_skips_stopwords_by_default() {
        let server = server();
        let result = server
            .top_words(Parameters(TopWordsParams {
                by: WordRanking::Count,
                limit: 3,
                include_stopwords: false,
            }))
            .expect("top_words should succeed");

        let json = json_of(&result);
        let words: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w["word"].as_str().unwrap())
            .collect();
        assert_eq!(words, ["danmark", "corona", "krig"]);
    }

    #[test]
    fn top_entities_tool_works() {
        let server = server();
        let result = server
            .top_entities(Parameters(TopEntitiesParams {
                kind: EntitySource::Place,
                limit: 20,
            }))
            .expect("top_entities should succeed");

        let json = json_of(&result);
        assert_eq!(json[0]["entity"], "Grønland");
        assert_eq!(json[0]["total_count"], 3);
    }

    #[test]
    fn search_words_tool_is_case_insensitive() {
        let server = server();
        let result = server
            .search_words(Parameters(SearchWordsParams {
                prefix: "KR".to_string(),
                limit: 10,
            }))
            .expect("search_words should succeed");

        let json = json_of(&result);
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["word"], "krig");
    }

    #[test]
    fn odds_words_tool_orders_by_odds() {
        let server = server();
        let result = server.odds_words().expect("odds_words should succeed");

        let json = json_of(&result);
        assert_eq!(json[0]["word"], "klima");
        assert_eq!(json[2]["word"], "rumfart");
        assert!(json[2]["last_mentioned"].is_null());
    }

    #[test]
    fn list_speeches_tool_counts_words() {
        let server = server();
        let result = server.list_speeches().expect("list_speeches should succeed");

        let json = json_of(&result);
        assert_eq!(json["total_speeches"], 5);
        assert_eq!(json["speeches"][0]["year"], 1970);
        assert_eq!(json["speeches"][0]["word_count"], 15);
    }

    #[test]
    fn corpus_breakdown_tool_attaches_stored_words() {
        let server = server();
        let result = server
            .corpus_breakdown(Parameters(CorpusBreakdownParams {
                kind: ComparisonKind::Monarch,
                top_k: Some(1),
            }))
            .expect("corpus_breakdown should succeed");

        let json = json_of(&result);
        let margrethe = json
            .as_array()
            .unwrap()
            .iter()
            .find(|row| row["monarch"] == "Margrethe II")
            .expect("Margrethe II row");
        assert_eq!(margrethe["speech_count"], 2);
        assert_eq!(margrethe["signature_words"].as_array().unwrap().len(), 1);
        assert_eq!(margrethe["signature_words"][0]["word"], "corona");
    }

    #[test]
    fn signature_words_tool_scores_on_demand() {
        let server = server();
        let result = server
            .signature_words(Parameters(SignatureWordsParams {
                kind: ComparisonKind::Monarch,
                value: "Margrethe II".to_string(),
                alpha: None,
                prior: None,
                include_stopwords: None,
                top_k: Some(3),
            }))
            .expect("signature_words should succeed");

        let json = json_of(&result);
        assert_eq!(json["focal_corpus_size"], 11);
        assert_eq!(json["background_corpus_size"], 10);
        assert_eq!(json["words"][0]["word"], "corona");
        assert_eq!(json["words"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn signature_words_tool_rejects_bad_decade() {
        let server = server();
        let err = server
            .signature_words(Parameters(SignatureWordsParams {
                kind: ComparisonKind::Decade,
                value: "the eighties".to_string(),
                alpha: None,
                prior: None,
                include_stopwords: None,
                top_k: None,
            }))
            .expect_err("bad decade should fail");
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn signature_words_tool_rejects_empty_slice() {
        let server = server();
        let err = server
            .signature_words(Parameters(SignatureWordsParams {
                kind: ComparisonKind::Decade,
                value: "1950s".to_string(),
                alpha: None,
                prior: None,
                include_stopwords: None,
                top_k: None,
            }))
            .expect_err("empty decade should fail");
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn missing_dataset_is_an_internal_error() {
        let server = ProjectServer::new(
            Utf8PathBuf::from("/nonexistent/royal-pipes/analytics.db"),
            Config::default(),
        );
        let err = server.odds_words().expect_err("missing dataset should fail");
        assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("dataset not found"));
    }
}
