// Third-party live-score feed records.
//
// The feed is loosely typed: ids show up as strings or numbers, team lists are
// sometimes missing or not arrays, flags are sometimes strings. Every field is
// decoded leniently so a malformed entry degrades to "absent" instead of
// failing the whole response.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalMatch {
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,

    #[serde(
        rename = "unique_id",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub unique_id: Option<String>,

    #[serde(
        rename = "match_id",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub legacy_match_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Free-text status line, e.g. "Kolkata Knight Riders won by 7 wkts".
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(
        rename = "dateTimeGMT",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_time_gmt: Option<String>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,

    #[serde(default, deserialize_with = "lenient::string_list", skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient::team_info", skip_serializing_if = "Option::is_none")]
    pub team_info: Option<Vec<ExternalTeamInfo>>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub match_started: bool,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub match_ended: bool,

    /// Scorecards and anything else the feed sends, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalTeamInfo {
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub shortname: Option<String>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

/// Response envelope of the `currentMatches` endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct FeedEnvelope {
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub reason: Option<String>,

    #[serde(default, deserialize_with = "lenient::match_list")]
    pub data: Vec<ExternalMatch>,
}

/// Body of `POST /api/admin/cricket-matches/publish`.
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    #[serde(rename = "match", default)]
    pub feed_match: Option<ExternalMatch>,
}

#[derive(Debug, Serialize)]
pub struct FeedMatchesResponse {
    pub data: Vec<ExternalMatch>,
}

mod lenient {
    use super::*;

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(scalar_to_string(Value::deserialize(deserializer)?))
    }

    pub fn string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .map(|item| scalar_to_string(item).unwrap_or_default())
                    .collect(),
            ),
            _ => None,
        })
    }

    pub fn team_info<'de, D>(deserializer: D) -> Result<Option<Vec<ExternalTeamInfo>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .map(|item| serde_json::from_value(item).unwrap_or_default())
                    .collect(),
            ),
            _ => None,
        })
    }

    /// Truthiness as the feed's producers mean it: `true`, non-zero, non-empty.
    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
            Value::Null => false,
        })
    }

    pub fn match_list<'de, D>(deserializer: D) -> Result<Vec<ExternalMatch>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}
