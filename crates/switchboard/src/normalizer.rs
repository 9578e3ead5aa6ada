//! Message normalization.
//!
//! Turns a raw [`MessageEvent`] into a [`MessageSession`]: detects and
//! strips a leading "addressed to me" nickname prefix, concatenates the
//! text segments into the normalized plain text, and collects image
//! locators in order. Normalization is pure and synchronous.

use regex::Regex;
use tracing::trace;

use switchboard_core::{MessageEvent, MessageSession, Segment, SharedGateway};

use crate::error::ConfigError;

/// Builds message sessions from raw message events.
pub struct Normalizer {
    prefix: Option<Regex>,
}

impl Normalizer {
    /// Creates a normalizer, compiling the nickname prefix pattern.
    ///
    /// The pattern is `^<nickname>` followed by at least one whitespace or
    /// comma (ASCII or fullwidth). The nickname is interpolated verbatim,
    /// so a nickname that is not a valid pattern fragment is a
    /// configuration error.
    pub fn new(nickname: Option<&str>) -> Result<Self, ConfigError> {
        let prefix = match nickname {
            Some(nick) if !nick.is_empty() => Some(
                Regex::new(&format!(r"^{nick}[\s,，]+")).map_err(|err| {
                    ConfigError::InvalidNickname {
                        pattern: nick.to_string(),
                        reason: err.to_string(),
                    }
                })?,
            ),
            _ => None,
        };
        Ok(Self { prefix })
    }

    /// Normalizes one message event into a session.
    ///
    /// The nickname prefix is only looked for when the message *starts*
    /// with a text segment; the raw segment sequence on the event is left
    /// untouched, only the derived text view is stripped.
    pub fn normalize(&self, gateway: SharedGateway, mut event: MessageEvent) -> MessageSession {
        let mut addressed_by_prefix = false;

        let text = {
            let segments = event.message.as_slice();
            let mut parts: Vec<&str> = Vec::with_capacity(segments.len());
            for (index, segment) in segments.iter().enumerate() {
                let Some(text) = segment.as_text() else {
                    continue;
                };
                if index == 0
                    && let Some(prefix) = &self.prefix
                    && let Some(found) = prefix.find(text)
                {
                    addressed_by_prefix = true;
                    parts.push(&text[found.end()..]);
                } else {
                    parts.push(text);
                }
            }
            parts.concat()
        };

        if addressed_by_prefix {
            trace!(user_id = event.user_id, "nickname prefix detected, marking addressed");
            event.to_me = true;
        }

        let images = event
            .message
            .iter()
            .filter_map(|seg: &Segment| seg.image_url().map(str::to_owned))
            .collect();

        MessageSession::new(gateway, event, text, images)
    }
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("prefix", &self.prefix.as_ref().map(Regex::as_str))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
