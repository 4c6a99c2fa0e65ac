//! Per-request correlation

use crate::interface::{ChatId, MessageId};
use uuid::Uuid;

/// Where one request's output goes
///
/// Created once the placeholder is posted and dropped when the pipeline returns;
/// never shared between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    /// Log correlation id
    pub request_id: Uuid,
    pub chat_id: ChatId,
    /// The "processing" message to delete on success or edit on failure
    pub placeholder_id: MessageId,
}

impl RequestContext {
    pub fn new(chat_id: ChatId, placeholder_id: MessageId) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            chat_id,
            placeholder_id,
        }
    }
}
