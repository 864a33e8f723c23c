use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Who wrote a thought.
///
/// The wire tag is a plain string: `human`, `claude`/`assistant`,
/// `claude:<voice>`/`assistant:<voice>` for an alternate persona, and
/// `both`/`shared` for co-authored thoughts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Authorship {
    Human,
    Assistant,
    Voice(String),
    Shared,
    Other(String),
    #[default]
    Unknown,
}

const ASSISTANT_TAGS: [&str; 2] = ["claude", "assistant"];

impl Authorship {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Authorship::Unknown;
        }
        if let Some((prefix, voice)) = raw.split_once(':')
            && ASSISTANT_TAGS.contains(&prefix)
        {
            return if voice.is_empty() {
                Authorship::Assistant
            } else {
                Authorship::Voice(voice.to_string())
            };
        }
        match raw {
            "human" => Authorship::Human,
            "both" | "shared" => Authorship::Shared,
            tag if ASSISTANT_TAGS.contains(&tag) => Authorship::Assistant,
            other => Authorship::Other(other.to_string()),
        }
    }

    pub fn voice(&self) -> Option<&str> {
        match self {
            Authorship::Voice(voice) => Some(voice),
            _ => None,
        }
    }

    pub fn to_tag(&self) -> String {
        match self {
            Authorship::Human => "human".to_string(),
            Authorship::Assistant => "claude".to_string(),
            Authorship::Voice(voice) => format!("claude:{voice}"),
            Authorship::Shared => "both".to_string(),
            Authorship::Other(tag) => tag.clone(),
            Authorship::Unknown => String::new(),
        }
    }

    /// Human readable attribution line shown under a thought.
    pub fn byline(&self, voices: &VoiceRegistry) -> String {
        match self {
            Authorship::Human => "from human".to_string(),
            Authorship::Assistant => "from assistant".to_string(),
            Authorship::Voice(voice) => format!("from {}", voices.display_name(voice)),
            Authorship::Shared => "shared thought".to_string(),
            Authorship::Other(tag) => format!("from {tag}"),
            Authorship::Unknown => String::new(),
        }
    }
}

impl From<Option<String>> for Authorship {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Authorship::parse).unwrap_or_default()
    }
}

impl From<Authorship> for String {
    fn from(value: Authorship) -> Self {
        value.to_tag()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub id: String,
    pub name: String,
    /// CSS style hex color (`#rrggbb`) used for the persona ring.
    #[serde(default)]
    pub color: Option<String>,
}

/// Known assistant personas. Owned by the personality collaborator; the
/// canvas only reads names and colors from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceRegistry {
    voices: HashMap<String, VoiceInfo>,
}

impl VoiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, info: VoiceInfo) {
        self.voices.insert(info.id.clone(), info);
    }

    pub fn get(&self, id: &str) -> Option<&VoiceInfo> {
        self.voices.get(id)
    }

    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.voices
            .get(id)
            .map(|info| info.name.as_str())
            .unwrap_or(id)
    }

    pub fn color(&self, id: &str) -> Option<&str> {
        self.voices.get(id).and_then(|info| info.color.as_deref())
    }
}
