use serde::{Deserialize, Serialize};
use std::fmt;

/// Recency/importance bucket of a thought, from most to least salient.
///
/// Unknown or missing tiers on the wire fall back to [`Heat::Quiet`], the
/// least salient tier, instead of failing the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Heat {
    Hot,
    Warm,
    Growing,
    #[default]
    Quiet,
}

impl Heat {
    pub const ALL: [Heat; 4] = [Heat::Hot, Heat::Warm, Heat::Growing, Heat::Quiet];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hot" => Heat::Hot,
            "warm" => Heat::Warm,
            "growing" => Heat::Growing,
            _ => Heat::Quiet,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Heat::Hot => "hot",
            Heat::Warm => "warm",
            Heat::Growing => "growing",
            Heat::Quiet => "quiet",
        }
    }
}

impl fmt::Display for Heat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<String>> for Heat {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Heat::parse).unwrap_or_default()
    }
}

impl From<Heat> for String {
    fn from(value: Heat) -> Self {
        value.as_str().to_string()
    }
}
