//! Wire shapes exchanged with the backend.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Body of both the preview and the full generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationPayload {
    pub source_doc_ids: Vec<String>,
    pub custom_prompt: String,
}

/// Preview answer. Every field is advisory: a missing or null field reads as
/// absent, and the token estimate accepts any JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct PreviewResponse {
    /// Proposed table of contents, as sent by the service.
    pub toc: Option<Value>,
    /// Proposed tone, audience and similar, as sent by the service.
    pub style_guide: Option<Value>,
    pub example_snippet: Option<String>,
    #[serde(deserialize_with = "token_estimate")]
    pub estimated_tokens: Option<u32>,
    #[serde(deserialize_with = "null_as_empty")]
    pub source_citations: Vec<String>,
}

/// Accepts any JSON number; fractions are rounded, out-of-range values dropped.
fn token_estimate<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(whole) = number.as_u64() {
        return Ok(u32::try_from(whole).ok());
    }
    let estimate = number
        .as_f64()
        .map(f64::round)
        .filter(|value| value.is_finite() && *value >= 0.0 && *value <= f64::from(u32::MAX))
        .map(|value| value as u32);
    Ok(estimate)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Uploading,
    #[default]
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub folder_path: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityRecord {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Optional listing filters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentQuery {
    pub folder_path: Option<String>,
    pub tags: Vec<String>,
}
