//! General-purpose assistant chat.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::gemini::TextGenerator;

/// Reply used when the model returns nothing.
pub const NO_RESPONSE: &str = "No response from Gemini.";

/// Free-form chat backed by a text generator.
#[derive(Clone)]
pub struct ChatService {
    generator: Arc<dyn TextGenerator>,
}

impl ChatService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Answer `text`, substituting a fixed reply for empty completions.
    pub async fn reply(&self, text: &str) -> Result<String> {
        let text = text.trim();
        debug!(chars = text.len(), "chat request");

        match self.generator.generate(text).await? {
            Some(answer) => Ok(answer),
            None => {
                warn!("model returned no text for chat request");
                Ok(NO_RESPONSE.to_string())
            }
        }
    }
}
