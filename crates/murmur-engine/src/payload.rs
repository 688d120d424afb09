//! Validation of the per-type parts of an outgoing message.
//!
//! Callers hand over a message type plus optional file info and payload, the
//! way a compose box produces them. [`compose_body`] turns that into a
//! [`MessageBody`], rejecting combinations the type does not allow.

use serde::{Deserialize, Serialize};

use murmur_shared::constants::{POLL_MAX_OPTIONS, POLL_MIN_OPTIONS};
use murmur_shared::MessageType;
use murmur_store::{EventDetails, FileInfo, GeoLocation, MessageBody, Poll};

use crate::error::{EngineError, Result};

/// A poll as typed by its author, before any vote exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollDraft {
    pub question: String,
    pub options: Vec<String>,
}

/// Type-specific payload of an outgoing message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum MessagePayload {
    Poll(PollDraft),
    Event(EventDetails),
    Location(GeoLocation),
}

impl MessagePayload {
    fn kind(&self) -> MessageType {
        match self {
            Self::Poll(_) => MessageType::Poll,
            Self::Event(_) => MessageType::Event,
            Self::Location(_) => MessageType::Location,
        }
    }
}

/// Build the body of a message of type `kind`.
pub fn compose_body(
    kind: MessageType,
    file_info: Option<FileInfo>,
    payload: Option<MessagePayload>,
) -> Result<MessageBody> {
    if file_info.is_some() && !kind.carries_file() {
        return Err(EngineError::invalid_payload(kind, "file info not allowed"));
    }
    if let Some(p) = &payload {
        if p.kind() != kind {
            return Err(EngineError::invalid_payload(
                kind,
                format!("unexpected {} payload", p.kind()),
            ));
        }
    }

    let body = match (kind, payload) {
        (MessageType::Text, None) => MessageBody::Text,
        (MessageType::System, None) => MessageBody::System,
        (MessageType::Image, None) => MessageBody::Image(file_info),
        (MessageType::Video, None) => MessageBody::Video(file_info),
        (MessageType::File, None) => MessageBody::File(file_info),
        (MessageType::Poll, Some(MessagePayload::Poll(draft))) => MessageBody::Poll(poll_from_draft(draft)?),
        (MessageType::Event, Some(MessagePayload::Event(event))) => {
            if [&event.title, &event.date_time, &event.location]
                .iter()
                .any(|field| field.trim().is_empty())
            {
                return Err(EngineError::invalid_payload(kind, "title, date and location are required"));
            }
            MessageBody::Event(event)
        }
        (MessageType::Location, Some(MessagePayload::Location(location))) => {
            let valid = location.latitude.is_finite()
                && location.longitude.is_finite()
                && (-90.0..=90.0).contains(&location.latitude)
                && (-180.0..=180.0).contains(&location.longitude);
            if !valid {
                return Err(EngineError::invalid_payload(kind, "coordinates out of range"));
            }
            MessageBody::Location(location)
        }
        (kind, _) => return Err(EngineError::invalid_payload(kind, "payload missing")),
    };

    Ok(body)
}

fn poll_from_draft(draft: PollDraft) -> Result<Poll> {
    let question = draft.question.trim();
    if question.is_empty() {
        return Err(EngineError::invalid_payload(MessageType::Poll, "question is empty"));
    }

    let options: Vec<&str> = draft
        .options
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .collect();
    if !(POLL_MIN_OPTIONS..=POLL_MAX_OPTIONS).contains(&options.len()) {
        return Err(EngineError::invalid_payload(
            MessageType::Poll,
            format!(
                "expected {POLL_MIN_OPTIONS} to {POLL_MAX_OPTIONS} options, got {}",
                options.len()
            ),
        ));
    }

    Ok(Poll::new(question, options))
}
