//! Session data types and the persisted document shape

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One answered question, tagged with the round it was asked in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRecord {
    pub round: u32,
    pub question: String,
    pub answer: String,
    /// ISO-8601 creation time
    #[serde(default)]
    pub timestamp: String,
}

impl QaRecord {
    /// Create a record stamped with the current time
    pub fn new(round: u32, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            round,
            question: question.into(),
            answer: answer.into(),
            timestamp: now_timestamp(),
        }
    }
}

/// A content/article idea
///
/// Older session files stored ideas as bare title strings; those are
/// accepted on load and upgraded to an idea with an empty summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IdeaRepr")]
pub struct ContentIdea {
    pub title: String,
    pub summary: String,
}

impl ContentIdea {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdeaRepr {
    Legacy(String),
    Current {
        #[serde(default)]
        title: String,
        #[serde(default)]
        summary: String,
    },
}

impl From<IdeaRepr> for ContentIdea {
    fn from(repr: IdeaRepr) -> Self {
        match repr {
            IdeaRepr::Legacy(title) => {
                debug!(%title, "ContentIdea::from: upgrading legacy idea");
                Self {
                    title,
                    summary: String::new(),
                }
            }
            IdeaRepr::Current { title, summary } => Self { title, summary },
        }
    }
}

/// The on-disk session document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionDocument {
    #[serde(default)]
    pub product_name: String,

    #[serde(default)]
    pub rounds: u32,

    #[serde(default)]
    pub qa_history: Vec<QaRecord>,

    #[serde(default)]
    pub content_ideas: Vec<ContentIdea>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Preview of a persisted session, read without loading it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub product_name: String,
    pub rounds: u32,
    pub qa_count: usize,
    pub ideas_count: usize,
    pub last_updated: String,
}

/// Lenient view of the session file used for summaries
///
/// Entries are only counted, so malformed records do not hide the summary.
#[derive(Deserialize)]
struct SummaryDocument {
    #[serde(default)]
    product_name: String,
    #[serde(default)]
    rounds: u32,
    #[serde(default)]
    qa_history: Vec<serde_json::Value>,
    #[serde(default)]
    content_ideas: Vec<serde_json::Value>,
    #[serde(default)]
    last_updated: Option<String>,
}

impl SessionSummary {
    /// Build a summary from the raw contents of a session file
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let doc: SummaryDocument = serde_json::from_str(content)?;
        Ok(Self {
            product_name: doc.product_name,
            rounds: doc.rounds,
            qa_count: doc.qa_history.len(),
            ideas_count: doc.content_ideas.len(),
            last_updated: doc.last_updated.unwrap_or_else(|| "Unknown".to_string()),
        })
    }

    /// A session is worth offering for resume only if it names a product
    pub fn is_resumable(&self) -> bool {
        !self.product_name.is_empty()
    }
}

/// Current local time as an ISO-8601 string
pub(crate) fn now_timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}
