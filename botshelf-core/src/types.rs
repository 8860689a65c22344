use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// One showcased bot, as described by a JSON file in the catalog directory.
///
/// Field names follow the published record format (`invite_link`, `repo`,
/// `additional_links`, `desc`). Records are immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BotRecord {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub invite_link: String,
    /// Backing repository as `"owner/name"`; bots without one have no changelog.
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub features: Vec<FeatureEntry>,
    #[serde(default, rename = "additional_links")]
    pub links: Vec<LinkEntry>,
}

/// A highlighted feature on a bot's profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeatureEntry {
    pub title: String,
    #[serde(default, rename = "desc")]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

/// A tutorial or guide link on a bot's profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkEntry {
    pub label: String,
    #[serde(default, rename = "desc")]
    pub description: String,
    pub url: String,
}

/// One changelog row.
///
/// `sha` is `None` only for the synthetic entry that stands in for a failed
/// history fetch; such an entry cannot be expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub sha: Option<String>,
    pub message: String,
    pub date: DateTime<Utc>,
    pub url: Option<String>,
}

impl BotRecord {
    /// Repository identifier, treating a blank `repo` as absent.
    pub fn repository(&self) -> Option<&str> {
        self.repo.as_deref().map(str::trim).filter(|r| !r.is_empty())
    }
}

impl CommitSummary {
    /// Builds the synthetic entry shown when the history cannot be fetched.
    pub fn placeholder(message: impl Into<String>) -> Self {
        Self {
            sha: None,
            message: message.into(),
            date: Utc::now(),
            url: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.sha.is_none()
    }

    /// First line of the commit message.
    pub fn headline(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Seven-character abbreviated sha, empty for the placeholder.
    pub fn short_sha(&self) -> &str {
        match &self.sha {
            Some(sha) => sha.get(..7).unwrap_or(sha),
            None => "",
        }
    }
}

/// A file touched by a commit, with its unified patch text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileChange {
    pub filename: String,
    #[serde(default)]
    pub additions: u32,
    #[serde(default)]
    pub deletions: u32,
    /// Empty when GitHub omits the patch (binary or oversized files).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub patch: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Changelog of the selected bot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Changelog {
    /// No bot selected.
    #[default]
    Idle,
    /// The selected bot has no backing repository.
    Unlinked,
    Loading,
    Ready(Vec<CommitSummary>),
}

/// Changed-file list of the expanded commit.
///
/// `Loading`, `Absent` and `Failed` are distinct so the UI can show a spinner,
/// nothing, or a retry hint respectively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CommitDetail {
    #[default]
    Absent,
    Loading { sha: String },
    Loaded { sha: String, files: Vec<FileChange> },
    Failed { sha: String, reason: String },
}

impl CommitDetail {
    /// Sha this detail belongs to, if any.
    pub fn sha(&self) -> Option<&str> {
        match self {
            CommitDetail::Absent => None,
            CommitDetail::Loading { sha }
            | CommitDetail::Loaded { sha, .. }
            | CommitDetail::Failed { sha, .. } => Some(sha),
        }
    }

    pub fn files(&self) -> &[FileChange] {
        match self {
            CommitDetail::Loaded { files, .. } => files,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_record_reads_published_field_names() {
        let json = r#"{
            "name": "Aqua",
            "avatar": "https://example.com/aqua.png",
            "platform": "WhatsApp",
            "tagline": "Multi-device helper",
            "description": "Downloader and sticker maker.",
            "invite_link": "https://wa.me/1",
            "repo": "aqua/aqua-bot",
            "features": [{"title": "Stickers", "desc": "Image to sticker", "image": "s.png"}],
            "additional_links": [{"label": "Setup", "desc": "Install guide", "url": "https://x.y"}]
        }"#;
        let bot: BotRecord = serde_json::from_str(json).unwrap();
        assert_eq!(bot.repo.as_deref(), Some("aqua/aqua-bot"));
        assert_eq!(bot.features[0].description, "Image to sticker");
        assert_eq!(bot.links[0].label, "Setup");
    }

    #[test]
    fn optional_profile_fields_default() {
        let bot: BotRecord = serde_json::from_str(r#"{"name": "Bare"}"#).unwrap();
        assert!(bot.repo.is_none());
        assert!(bot.features.is_empty());
        assert!(bot.links.is_empty());
    }

    #[test]
    fn headline_and_short_sha() {
        let commit = CommitSummary {
            sha: Some("0123456789abcdef".to_owned()),
            message: "fix: stickers\n\nlong body".to_owned(),
            date: Utc::now(),
            url: None,
        };
        assert_eq!(commit.headline(), "fix: stickers");
        assert_eq!(commit.short_sha(), "0123456");
        assert!(CommitSummary::placeholder("x").is_placeholder());
    }

    #[test]
    fn missing_patch_defaults_to_empty() {
        let file: FileChange =
            serde_json::from_str(r#"{"filename": "logo.png", "additions": 0, "deletions": 0}"#)
                .unwrap();
        assert!(file.patch.is_empty());

        let file: FileChange =
            serde_json::from_str(r#"{"filename": "logo.png", "patch": null}"#).unwrap();
        assert!(file.patch.is_empty());
    }
}
