//! Maps a validated report onto the webhook message schema.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::{Embed, EmbedField, IncomingReport, OutboundMessage, SanitizedReport};
use crate::sanitize::{coerce_count, text_or};

pub const USERNAME_MAX_LEN: usize = 60;
pub const TITLE_MAX_LEN: usize = 80;
pub const PLAYER_NAME_MAX_LEN: usize = 60;
pub const SERVER_LINK_MAX_LEN: usize = 200;

pub const EMBED_COLOR: u32 = 3447003;
pub const BRAINROTS_HEADING: &str = "**Brainrots Found:**";
pub const NONE_FOUND: &str = "No secret brainrots detected in this scan.";

// Literals used when a client leaves a field out or sends nothing usable
#[derive(Debug, Clone)]
pub struct Fallbacks {
    pub username: String,
    pub title: String,
    pub player_name: String,
    pub server_link: String,
}

impl Default for Fallbacks {
    fn default() -> Self {
        Self {
            username: "Souza Logger".to_string(),
            title: "Auto Souza".to_string(),
            player_name: "N/A".to_string(),
            server_link: "N/A".to_string(),
        }
    }
}

impl SanitizedReport {
    pub fn from_incoming(report: &IncomingReport, fallbacks: &Fallbacks) -> Self {
        Self {
            brainrots: report.brainrots.clone(),
            player_count: coerce_count(report.player_count.as_ref()),
            private_server_link: text_or(
                report.private_server_link.as_ref(),
                SERVER_LINK_MAX_LEN,
                &fallbacks.server_link,
            ),
            player_name: text_or(
                report.player_name.as_ref(),
                PLAYER_NAME_MAX_LEN,
                &fallbacks.player_name,
            ),
            username: text_or(report.username.as_ref(), USERNAME_MAX_LEN, &fallbacks.username),
            title: text_or(report.title.as_ref(), TITLE_MAX_LEN, &fallbacks.title),
        }
    }
}

pub fn describe(brainrots: &[String]) -> String {
    if brainrots.is_empty() {
        NONE_FOUND.to_string()
    } else {
        format!("{}\n{}", BRAINROTS_HEADING, brainrots.join("\n"))
    }
}

/// Builds the outbound message, stamped with `at` rather than anything the
/// client sent.
pub fn build_message(report: &SanitizedReport, at: DateTime<Utc>) -> OutboundMessage {
    OutboundMessage {
        username: report.username.clone(),
        embeds: vec![Embed {
            title: report.title.clone(),
            description: describe(&report.brainrots),
            color: EMBED_COLOR,
            fields: vec![
                EmbedField {
                    name: "👤 Player".to_string(),
                    value: report.player_name.clone(),
                    inline: true,
                },
                EmbedField {
                    name: "👥 Players in Server".to_string(),
                    value: report.player_count.to_string(),
                    inline: true,
                },
                EmbedField {
                    name: "🔗 Private Server Link".to_string(),
                    value: report.private_server_link.clone(),
                    inline: false,
                },
            ],
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }],
    }
}

pub fn build(report: &SanitizedReport) -> OutboundMessage {
    build_message(report, Utc::now())
}
