use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    #[serde(default)]
    pub login: String,
    pub avatar_url: String,
}

/// A repository as returned by the search API and as kept in favorites.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    pub description: Option<String>,
    pub owner: Owner,
    #[serde(default)]
    pub html_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    pub language: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<Repository>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("repository id must be non-zero")]
    ZeroId,

    #[error("repository {0} has an empty name")]
    EmptyName(u64),

    #[error("repository {id} has an invalid {field} timestamp: {value}")]
    BadTimestamp {
        id: u64,
        field: &'static str,
        value: String,
    },
}

impl Repository {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id == 0 {
            return Err(ValidationError::ZeroId);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName(self.id));
        }
        for (field, value) in [("created_at", &self.created_at), ("updated_at", &self.updated_at)] {
            if parse_timestamp(value).is_none() {
                return Err(ValidationError::BadTimestamp {
                    id: self.id,
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    /// `owner/name` when the API sent it, otherwise just the name.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.name
        } else {
            &self.full_name
        }
    }

    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or("No description")
    }

    pub fn language_or_default(&self) -> &str {
        self.language.as_deref().unwrap_or("Not specified")
    }
}

/// Trims surrounding whitespace. An all-blank query is treated as empty.
pub fn normalize_query(text: &str) -> &str {
    text.trim()
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Renders how long ago `timestamp` was, relative to `now`.
pub fn relative_age(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(timestamp) else {
        return "unknown".to_string();
    };

    let seconds = (now - then).num_seconds().max(0);
    let (amount, unit) = match seconds {
        s if s < 60 => return "less than a minute ago".to_string(),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 2_592_000 => (s / 86_400, "day"),
        s if s < 31_536_000 => (s / 2_592_000, "month"),
        s => (s / 31_536_000, "year"),
    };

    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}

#[cfg(test)]
pub(crate) fn sample_repo(id: u64, name: &str) -> Repository {
    Repository {
        id,
        name: name.to_string(),
        full_name: format!("octo/{}", name),
        description: None,
        owner: Owner {
            login: "octo".to_string(),
            avatar_url: format!("https://avatars.example.com/u/{}", id),
        },
        html_url: Some(format!("https://github.com/octo/{}", name)),
        created_at: "2020-01-01T00:00:00Z".to_string(),
        updated_at: "2024-06-01T12:00:00Z".to_string(),
        stargazers_count: 42,
        forks_count: 7,
        language: Some("Rust".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn search_response_defaults_missing_items() {
        let resp: SearchResponse = serde_json::from_str(r#"{"total_count": 0}"#).unwrap();
        assert!(resp.items.is_empty());
    }

    #[test]
    fn repository_parses_github_payload_and_ignores_extra_fields() {
        let json = r#"{
            "id": 5,
            "name": "redux",
            "full_name": "reduxjs/redux",
            "description": null,
            "owner": {"login": "reduxjs", "avatar_url": "https://a/1", "type": "Organization"},
            "html_url": "https://github.com/reduxjs/redux",
            "created_at": "2015-05-29T23:53:15Z",
            "updated_at": "2024-01-02T03:04:05Z",
            "stargazers_count": 60000,
            "forks_count": 15000,
            "language": "TypeScript",
            "score": 1.0
        }"#;
        let repo: Repository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.id, 5);
        assert_eq!(repo.display_name(), "reduxjs/redux");
        assert_eq!(repo.description_or_default(), "No description");
        assert!(repo.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_fields() {
        let mut repo = sample_repo(0, "x");
        assert_eq!(repo.validate(), Err(ValidationError::ZeroId));

        repo.id = 3;
        repo.name = "  ".to_string();
        assert_eq!(repo.validate(), Err(ValidationError::EmptyName(3)));

        repo.name = "x".to_string();
        repo.updated_at = "yesterday".to_string();
        assert!(matches!(
            repo.validate(),
            Err(ValidationError::BadTimestamp { field: "updated_at", .. })
        ));
    }

    #[test]
    fn normalize_query_trims() {
        assert_eq!(normalize_query("  redux "), "redux");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn relative_age_picks_largest_unit() {
        let now = Utc.with_ymd_and_hms(2024, 6, 4, 12, 0, 0).unwrap();
        assert_eq!(relative_age("2024-06-04T11:59:30Z", now), "less than a minute ago");
        assert_eq!(relative_age("2024-06-04T11:00:00Z", now), "1 hour ago");
        assert_eq!(relative_age("2024-06-01T12:00:00Z", now), "3 days ago");
        assert_eq!(relative_age("2020-01-01T00:00:00Z", now), "4 years ago");
        assert_eq!(relative_age("garbage", now), "unknown");
    }
}
