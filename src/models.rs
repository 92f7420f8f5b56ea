use serde::{Deserialize, Serialize};
use serde_json::Value;

// Report as decoded from the client, brainrots already cleaned by the validator.
// The remaining fields stay raw until the sanitize stage.
#[derive(Debug, Clone, Default)]
pub struct IncomingReport {
    pub brainrots: Vec<String>,
    pub player_count: Option<Value>,
    pub private_server_link: Option<Value>,
    pub player_name: Option<Value>,
    pub username: Option<Value>,
    pub title: Option<Value>,
}

// Every field bounded and defaulted, ready for the payload builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedReport {
    pub brainrots: Vec<String>,
    pub player_count: u64,
    pub private_server_link: String,
    pub player_name: String,
    pub username: String,
    pub title: String,
}

// Webhook message format expected by the sink
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutboundMessage {
    pub username: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

// Successful delivery, carrying the sink's status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub status: u16,
}

// Body of every /report response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ReportResponse {
    pub fn success() -> Self {
        Self {
            ok: true,
            msg: None,
            status: None,
        }
    }

    pub fn failure(msg: &str, status: Option<u16>) -> Self {
        Self {
            ok: false,
            msg: Some(msg.to_string()),
            status,
        }
    }
}
