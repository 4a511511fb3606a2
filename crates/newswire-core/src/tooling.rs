// newswire-core/src/tooling.rs
// ============================================================================
// Module: Tooling Identifiers
// Description: Canonical MCP tool identifiers for Newswire.
// Purpose: Shared tool naming across the catalog, dispatcher, and transports.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Canonical tool identifiers used by the Newswire MCP gateway.
//! These names are part of the external contract surface.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Canonical tool names for the Newswire MCP gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Search and filter news articles.
    SearchNews,
    /// Fetch the top news for a country and language.
    GetTopNews,
    /// Fetch a newspaper front page.
    RetrieveNewspaperFrontPage,
    /// Retrieve news articles by identifier.
    RetrieveNewsArticles,
    /// Extract a news article from a URL.
    ExtractNews,
    /// Extract news links from a website URL.
    ExtractNewsLinks,
    /// Search monitored news sources.
    SearchNewsSources,
    /// Resolve a location name to geographic coordinates.
    GetGeoCoordinates,
}

impl ToolName {
    /// Returns the canonical string name for the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SearchNews => "search_news",
            Self::GetTopNews => "get_top_news",
            Self::RetrieveNewspaperFrontPage => "retrieve_newspaper_front_page",
            Self::RetrieveNewsArticles => "retrieve_news_articles",
            Self::ExtractNews => "extract_news",
            Self::ExtractNewsLinks => "extract_news_links",
            Self::SearchNewsSources => "search_news_sources",
            Self::GetGeoCoordinates => "get_geo_coordinates",
        }
    }

    /// Returns all Newswire tool names in canonical catalog order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::SearchNews,
            Self::GetTopNews,
            Self::RetrieveNewspaperFrontPage,
            Self::RetrieveNewsArticles,
            Self::ExtractNews,
            Self::ExtractNewsLinks,
            Self::SearchNewsSources,
            Self::GetGeoCoordinates,
        ]
    }

    /// Parses a tool name from its string representation.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "search_news" => Some(Self::SearchNews),
            "get_top_news" => Some(Self::GetTopNews),
            "retrieve_newspaper_front_page" => Some(Self::RetrieveNewspaperFrontPage),
            "retrieve_news_articles" => Some(Self::RetrieveNewsArticles),
            "extract_news" => Some(Self::ExtractNews),
            "extract_news_links" => Some(Self::ExtractNewsLinks),
            "search_news_sources" => Some(Self::SearchNewsSources),
            "get_geo_coordinates" => Some(Self::GetGeoCoordinates),
            _ => None,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
