//! Language-model reply parsing
//!
//! The model is asked for `{"response": "...", "emotion": "..."}` but
//! sometimes wraps it in a markdown code fence or ignores the format
//! altogether. Anything unparseable becomes a neutral reply carrying the
//! raw text, so the avatar always has something to say.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Emotion tag attached to a model reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    #[default]
    Neutral,
    Confused,
}

impl FromStr for Emotion {
    type Err = std::convert::Infallible;

    /// Unrecognized emotions read as neutral
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "happy" => Emotion::Happy,
            "confused" => Emotion::Confused,
            _ => Emotion::Neutral,
        })
    }
}

/// A parsed model reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarReply {
    pub response: String,
    pub emotion: Emotion,
}

#[derive(Deserialize)]
struct RawReply {
    response: String,
    #[serde(default)]
    emotion: Option<String>,
}

impl AvatarReply {
    /// Parse a raw model reply, falling back to neutral plain text
    pub fn parse(raw: &str) -> Self {
        let cleaned = strip_code_fences(raw);
        match serde_json::from_str::<RawReply>(&cleaned) {
            Ok(reply) => Self {
                response: reply.response,
                emotion: reply
                    .emotion
                    .as_deref()
                    .map(|e| e.parse::<Emotion>().unwrap_or_default())
                    .unwrap_or_default(),
            },
            Err(e) => {
                debug!(%e, "reply is not structured JSON, using raw text");
                Self {
                    response: raw.to_string(),
                    emotion: Emotion::Neutral,
                }
            }
        }
    }
}

fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let reply = AvatarReply::parse(r#"{"response":"Thank you!","emotion":"happy"}"#);
        assert_eq!(reply.response, "Thank you!");
        assert_eq!(reply.emotion, Emotion::Happy);
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"response\": \"Hmm, what do you mean?\", \"emotion\": \"confused\"}\n```";
        let reply = AvatarReply::parse(raw);
        assert_eq!(reply.response, "Hmm, what do you mean?");
        assert_eq!(reply.emotion, Emotion::Confused);
    }

    #[test]
    fn test_unknown_or_missing_emotion_is_neutral() {
        let reply = AvatarReply::parse(r#"{"response":"ok","emotion":"ecstatic"}"#);
        assert_eq!(reply.emotion, Emotion::Neutral);

        let reply = AvatarReply::parse(r#"{"response":"ok"}"#);
        assert_eq!(reply.emotion, Emotion::Neutral);
    }

    #[test]
    fn test_plain_text_falls_back() {
        let raw = "Sure, brush for two minutes!";
        let reply = AvatarReply::parse(raw);
        assert_eq!(reply.response, raw);
        assert_eq!(reply.emotion, Emotion::Neutral);
    }
}
