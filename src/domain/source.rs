//! Knowledge source entity with a tagged per-provider config.
//!
//! Source configs are a discriminated union keyed by provider type, so
//! mismatched shapes are rejected at construction rather than at use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AppError, OrgId, SourceId};

/// Provider discriminant for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Github,
    Discord,
    Webpage,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Github => "github",
            SourceKind::Discord => "discord",
            SourceKind::Webpage => "webpage",
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(SourceKind::Github),
            "discord" => Ok(SourceKind::Discord),
            "webpage" => Ok(SourceKind::Webpage),
            other => Err(format!("unknown source type: {}", other)),
        }
    }
}

/// Provider-specific configuration, tagged by source type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "lowercase")]
pub enum SourceConfig {
    Github { url: String },
    Discord { guild_id: String },
    Webpage { url: String },
}

impl SourceConfig {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceConfig::Github { .. } => SourceKind::Github,
            SourceConfig::Discord { .. } => SourceKind::Discord,
            SourceConfig::Webpage { .. } => SourceKind::Webpage,
        }
    }

    /// The location string used both for the per-org uniqueness check
    /// and as the crawl target handed to the reasoning engine.
    pub fn location(&self) -> &str {
        match self {
            SourceConfig::Github { url } => url,
            SourceConfig::Discord { guild_id } => guild_id,
            SourceConfig::Webpage { url } => url,
        }
    }

    /// Rejects empty locations before any persistence or remote call.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.location().trim().is_empty() {
            return Err(AppError::validation(match self {
                SourceConfig::Discord { .. } => "Source guild_id is required",
                _ => "Source url is required",
            }));
        }
        Ok(())
    }
}

/// A registered content origin that the reasoning engine indexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: SourceId,
    pub org_id: OrgId,
    pub name: String,
    #[serde(flatten)]
    pub config: SourceConfig,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Source {
    /// Creates a new source; fails on a structurally invalid config.
    pub fn new(
        org_id: OrgId,
        name: impl Into<String>,
        config: SourceConfig,
    ) -> Result<Self, AppError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::validation("Source name is required"));
        }
        config.validate()?;
        Ok(Self {
            id: SourceId::new(),
            org_id,
            name,
            config,
            last_sync_at: None,
            created_at: Utc::now(),
        })
    }
}
