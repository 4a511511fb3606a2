// newswire-core/src/catalog.rs
// ============================================================================
// Module: Tool Catalog
// Description: Canonical tool declarations and wire schemas for Newswire.
// Purpose: Single source of truth for tool contracts and upstream bindings.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module declares the canonical tool surface. Every tool is defined
//! once as a [`ToolSpec`] carrying its description, upstream endpoint, and
//! parameter constraints; the wire-visible `inputSchema` advertised by
//! `tools/list` is generated mechanically from the same declaration that the
//! validator compiles, so the two can never drift apart.
//!
//! ## Invariants
//! - Each tool name appears exactly once and binds exactly one endpoint.
//! - Catalog order is stable and preserved in `tools/list` responses.
//! - Generated schemas never set `additionalProperties: false`; unknown
//!   fields are ignored rather than rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::tooling::ToolName;

// ============================================================================
// SECTION: Parameter Declarations
// ============================================================================

/// Value types accepted by tool parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// UTF-8 string parameter.
    String,
    /// Whole-number parameter.
    Integer,
    /// Floating-point parameter.
    Number,
    /// Boolean flag parameter.
    Boolean,
}

impl ParamKind {
    /// Returns the JSON Schema type keyword for the kind.
    #[must_use]
    pub const fn schema_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// Declarative constraints for a single tool parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Wire-exact parameter name (the upstream API is case-sensitive).
    pub name: &'static str,
    /// Human-readable parameter description.
    pub description: &'static str,
    /// Accepted value type.
    pub kind: ParamKind,
    /// Whether the parameter must be present.
    pub required: bool,
    /// Default value filled in when the parameter is absent.
    pub default: Option<Value>,
    /// Inclusive numeric lower bound.
    pub minimum: Option<Value>,
    /// Inclusive numeric upper bound.
    pub maximum: Option<Value>,
    /// Minimum string length.
    pub min_length: Option<u64>,
    /// Maximum string length.
    pub max_length: Option<u64>,
    /// Closed set of accepted values.
    pub allowed: Option<&'static [&'static str]>,
}

impl ParamSpec {
    /// Declares an optional string parameter with a length cap.
    #[must_use]
    fn string(name: &'static str, description: &'static str, max_length: u64) -> Self {
        Self {
            name,
            description,
            kind: ParamKind::String,
            required: false,
            default: None,
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: Some(max_length),
            allowed: None,
        }
    }

    /// Declares an optional two-letter code parameter (country or language).
    #[must_use]
    fn code(name: &'static str, description: &'static str) -> Self {
        Self {
            min_length: Some(2),
            max_length: Some(2),
            ..Self::string(name, description, 2)
        }
    }

    /// Declares an optional bounded integer parameter.
    #[must_use]
    fn integer_range(
        name: &'static str,
        description: &'static str,
        minimum: i64,
        maximum: i64,
    ) -> Self {
        Self {
            name,
            description,
            kind: ParamKind::Integer,
            required: false,
            default: None,
            minimum: Some(json!(minimum)),
            maximum: Some(json!(maximum)),
            min_length: None,
            max_length: None,
            allowed: None,
        }
    }

    /// Declares an optional bounded floating-point parameter.
    #[must_use]
    fn number_range(
        name: &'static str,
        description: &'static str,
        minimum: f64,
        maximum: f64,
    ) -> Self {
        Self {
            name,
            description,
            kind: ParamKind::Number,
            required: false,
            default: None,
            minimum: Some(json!(minimum)),
            maximum: Some(json!(maximum)),
            min_length: None,
            max_length: None,
            allowed: None,
        }
    }

    /// Declares an optional boolean parameter.
    #[must_use]
    fn boolean(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind: ParamKind::Boolean,
            required: false,
            default: None,
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
            allowed: None,
        }
    }

    /// Declares an optional enumerated string parameter.
    #[must_use]
    fn enumerated(
        name: &'static str,
        description: &'static str,
        allowed: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            description,
            kind: ParamKind::String,
            required: false,
            default: None,
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
            allowed: Some(allowed),
        }
    }

    /// Marks the parameter as required.
    #[must_use]
    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attaches a default value applied when the parameter is absent.
    #[must_use]
    fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Renders the JSON Schema fragment for this parameter.
    #[must_use]
    pub fn schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!(self.kind.schema_type()));
        schema.insert("description".to_string(), json!(self.description));
        if let Some(allowed) = self.allowed {
            schema.insert("enum".to_string(), json!(allowed));
        }
        if let Some(minimum) = &self.minimum {
            schema.insert("minimum".to_string(), minimum.clone());
        }
        if let Some(maximum) = &self.maximum {
            schema.insert("maximum".to_string(), maximum.clone());
        }
        if let Some(min_length) = self.min_length {
            schema.insert("minLength".to_string(), json!(min_length));
        }
        if let Some(max_length) = self.max_length {
            schema.insert("maxLength".to_string(), json!(max_length));
        }
        if let Some(default) = &self.default {
            schema.insert("default".to_string(), default.clone());
        }
        Value::Object(schema)
    }
}

// ============================================================================
// SECTION: Tool Declarations
// ============================================================================

/// A single tool declaration: descriptor, constraints, and upstream binding.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Canonical tool name.
    pub name: ToolName,
    /// Human-readable tool description.
    pub description: &'static str,
    /// Upstream endpoint path the tool maps to.
    pub endpoint: &'static str,
    /// Parameter declarations in wire order.
    pub params: Vec<ParamSpec>,
}

impl ToolSpec {
    /// Generates the wire-visible JSON Schema for the tool's arguments.
    ///
    /// The schema intentionally omits `additionalProperties: false`; unknown
    /// fields are tolerated to keep older clients working as the catalog
    /// evolves.
    #[must_use]
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in &self.params {
            properties.insert(param.name.to_string(), param.schema());
            if param.required {
                required.push(Value::String(param.name.to_string()));
            }
        }
        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "required": required,
            "properties": properties
        })
    }
}

/// Tool definition shape used by MCP tool listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// MCP tool name.
    pub name: ToolName,
    /// Tool description for clients.
    pub description: String,
    /// JSON schema for tool input, advertised as `inputSchema`.
    pub input_schema: Value,
}

/// Returns the canonical tool catalog.
///
/// The order is intentional: it is the order `tools/list` advertises and the
/// order clients see in documentation. Append new tools at the end.
#[must_use]
pub fn catalog() -> Vec<ToolSpec> {
    vec![
        search_news_spec(),
        get_top_news_spec(),
        retrieve_newspaper_front_page_spec(),
        retrieve_news_articles_spec(),
        extract_news_spec(),
        extract_news_links_spec(),
        search_news_sources_spec(),
        get_geo_coordinates_spec(),
    ]
}

/// Returns the MCP tool definitions for tool listing.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    catalog()
        .into_iter()
        .map(|spec| ToolDefinition {
            name: spec.name,
            description: spec.description.to_string(),
            input_schema: spec.input_schema(),
        })
        .collect()
}

/// Builds the tool declaration for `search_news`.
fn search_news_spec() -> ToolSpec {
    ToolSpec {
        name: ToolName::SearchNews,
        description: "Search and filter news by text, date, location, category, language, and \
                      more.",
        endpoint: "/search-news",
        params: vec![
            ParamSpec::string("text", "Text to match in the news content.", 500),
            ParamSpec::code(
                "source-country",
                "ISO 3166 country code of the country the news source is located in.",
            ),
            ParamSpec::code("language", "ISO 6391 language code of the news."),
            ParamSpec::number_range(
                "min-sentiment",
                "Minimal sentiment of the news in range [-1,1].",
                -1.0,
                1.0,
            ),
            ParamSpec::number_range(
                "max-sentiment",
                "Maximal sentiment of the news in range [-1,1].",
                -1.0,
                1.0,
            ),
            ParamSpec::string(
                "earliest-publish-date",
                "The news must have been published after this date, format YYYY-MM-DD HH:MM:SS.",
                19,
            ),
            ParamSpec::string(
                "latest-publish-date",
                "The news must have been published before this date, format YYYY-MM-DD HH:MM:SS.",
                19,
            ),
            ParamSpec::string(
                "news-sources",
                "Comma-separated list of news source domains the news must come from.",
                500,
            ),
            ParamSpec::string(
                "authors",
                "Comma-separated list of author names the news must have been written by.",
                300,
            ),
            ParamSpec::string(
                "categories",
                "Comma-separated list of categories, e.g. politics, sports, business, technology, \
                 entertainment, health, science, lifestyle, travel, culture, education, \
                 environment, other.",
                300,
            ),
            ParamSpec::string(
                "entities",
                "Filter news by entities, e.g. ORG:Tesla to find news about the organization \
                 Tesla.",
                300,
            ),
            ParamSpec::string(
                "location-filter",
                "Filter news by a radius around a point, format latitude,longitude,radius-km.",
                100,
            ),
            ParamSpec::enumerated(
                "sort",
                "The sorting criterion.",
                &["publish-time", "sentiment"],
            ),
            ParamSpec::enumerated("sort-direction", "The sort direction.", &["ASC", "DESC"]),
            ParamSpec::integer_range(
                "offset",
                "The number of news to skip in range [0,10000].",
                0,
                10_000,
            ),
            ParamSpec::integer_range(
                "number",
                "The number of news to return in range [1,100].",
                1,
                100,
            )
            .with_default(json!(10)),
        ],
    }
}

/// Builds the tool declaration for `get_top_news`.
fn get_top_news_spec() -> ToolSpec {
    ToolSpec {
        name: ToolName::GetTopNews,
        description: "Get the top news from a country in a language for a date.",
        endpoint: "/top-news",
        params: vec![
            ParamSpec::code(
                "source-country",
                "ISO 3166 country code of the country for which to get the top news.",
            )
            .required(),
            ParamSpec::code("language", "ISO 6391 language code of the top news.").required(),
            ParamSpec::string(
                "date",
                "The date for which to get the top news, format YYYY-MM-DD.",
                10,
            ),
            ParamSpec::boolean(
                "headlines-only",
                "Whether to only return the headlines without the full news text.",
            ),
        ],
    }
}

/// Builds the tool declaration for `retrieve_newspaper_front_page`.
fn retrieve_newspaper_front_page_spec() -> ToolSpec {
    ToolSpec {
        name: ToolName::RetrieveNewspaperFrontPage,
        description: "Get the latest or a historical front page of a newspaper from a country \
                      for a date.",
        endpoint: "/retrieve-front-page",
        params: vec![
            ParamSpec::code(
                "source-country",
                "ISO 3166 country code of the country the newspaper is published in.",
            ),
            ParamSpec::string(
                "source-name",
                "Identifier of the newspaper, e.g. herald-sun.",
                100,
            ),
            ParamSpec::string(
                "date",
                "The date for which to get the front page, format YYYY-MM-DD.",
                10,
            ),
        ],
    }
}

/// Builds the tool declaration for `retrieve_news_articles`.
fn retrieve_news_articles_spec() -> ToolSpec {
    ToolSpec {
        name: ToolName::RetrieveNewsArticles,
        description: "Retrieve one or more news articles by their identifiers.",
        endpoint: "/retrieve-news",
        params: vec![
            ParamSpec::string(
                "ids",
                "Comma-separated list of news identifiers to retrieve.",
                500,
            )
            .required(),
        ],
    }
}

/// Builds the tool declaration for `extract_news`.
fn extract_news_spec() -> ToolSpec {
    ToolSpec {
        name: ToolName::ExtractNews,
        description: "Extract a news article from a URL.",
        endpoint: "/extract-news",
        params: vec![
            ParamSpec::string("url", "URL of the news article to extract.", 2048).required(),
            ParamSpec::boolean(
                "analyze",
                "Whether to analyze the extracted news (entities, sentiment, etc.).",
            ),
        ],
    }
}

/// Builds the tool declaration for `extract_news_links`.
fn extract_news_links_spec() -> ToolSpec {
    ToolSpec {
        name: ToolName::ExtractNewsLinks,
        description: "Extract news links from a news website.",
        endpoint: "/extract-news-links",
        params: vec![
            ParamSpec::string("url", "URL of the news website to extract links from.", 2048)
                .required(),
            ParamSpec::boolean(
                "analyze",
                "Whether to analyze the extracted news (entities, sentiment, etc.).",
            ),
        ],
    }
}

/// Builds the tool declaration for `search_news_sources`.
fn search_news_sources_spec() -> ToolSpec {
    ToolSpec {
        name: ToolName::SearchNewsSources,
        description: "Search whether a news source is being monitored.",
        endpoint: "/search-news-sources",
        params: vec![
            ParamSpec::string("name", "(Part of) the name of the source to search.", 100)
                .required(),
        ],
    }
}

/// Builds the tool declaration for `get_geo_coordinates`.
fn get_geo_coordinates_spec() -> ToolSpec {
    ToolSpec {
        name: ToolName::GetGeoCoordinates,
        description: "Retrieve the latitude and longitude of a location name.",
        endpoint: "/geo-coordinates",
        params: vec![
            ParamSpec::string("location", "Name of the location to resolve.", 100).required(),
        ],
    }
}
