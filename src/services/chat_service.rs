//! Farmer chat with scheme hints and mock translation.

use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ChatReply, ChatRequest};
use crate::domain::ports::LookupTable;

/// Prefix the text with the target language name for the languages the mock
/// translator knows; everything else is returned unchanged.
pub fn translate(text: &str, language: &str) -> String {
    let name = match language {
        "hi" => "Hindi",
        "ta" => "Tamil",
        "te" => "Telugu",
        "mr" => "Marathi",
        _ => return text.to_string(),
    };
    format!("[{name}] {text}")
}

pub struct ChatService {
    schemes: Arc<dyn LookupTable<Vec<String>>>,
}

impl ChatService {
    pub fn new(schemes: Arc<dyn LookupTable<Vec<String>>>) -> Self {
        Self { schemes }
    }

    pub fn reply(&self, request: &ChatRequest) -> DomainResult<ChatReply> {
        if request.message.trim().is_empty() {
            return Err(DomainError::ValidationFailed("message must not be empty".to_string()));
        }

        let crop = request
            .context
            .as_ref()
            .and_then(|c| c.crop.as_deref())
            .filter(|c| !c.is_empty());
        let schemes = match crop {
            Some(crop) => self.schemes.lookup_or_default(crop),
            None => self.schemes.default_for(""),
        }
        .unwrap_or_default();

        let subject = if crop.is_some() { "your crop" } else { "general farming" };
        let response = format!(
            "Based on your query '{}', I recommend checking soil health and consulting local agricultural guidelines. \
             Relevant government schemes for {subject}: {}.",
            request.message,
            schemes.join(", ")
        );

        Ok(ChatReply {
            response: translate(&response, &request.language),
            language: request.language.clone(),
        })
    }
}
