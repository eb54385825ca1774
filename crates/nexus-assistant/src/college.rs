//! Question answering over a college reference document.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::error::{AssistantError, Result};
use crate::gemini::TextGenerator;

/// Environment variable naming the college document.
pub const COLLEGE_DOC_ENV: &str = "NEXUS_COLLEGE_DOC";

/// Reply used when the model returns nothing.
pub const NO_ANSWER: &str = "Sorry, no answer.";

/// Build the prompt sent for a college question.
pub fn college_prompt(document: &str, query: &str) -> String {
    format!(
        "Use the following college document to answer this question:\n\n{}\n\nUser asked: {}",
        document, query
    )
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Read the document text from `path`.
///
/// `.pdf` files have their text extracted; anything else is read as UTF-8.
pub fn read_document(path: &Path) -> Result<String> {
    let read_error = |source| AssistantError::Read {
        path: path.to_path_buf(),
        source,
    };

    if !is_pdf(path) {
        return std::fs::read_to_string(path).map_err(read_error);
    }

    let bytes = std::fs::read(path).map_err(read_error)?;
    let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| AssistantError::Extract {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), chars = text.len(), "extracted PDF text");
    Ok(text)
}

/// Answers questions grounded in a document loaded at startup.
#[derive(Clone)]
pub struct CollegeAdvisor {
    generator: Arc<dyn TextGenerator>,
    document: Arc<str>,
}

impl CollegeAdvisor {
    pub fn new(generator: Arc<dyn TextGenerator>, document: impl Into<String>) -> Self {
        Self {
            generator,
            document: Arc::from(document.into()),
        }
    }

    /// Load the document from `path`. A missing or unreadable file leaves the
    /// document empty.
    pub fn load(generator: Arc<dyn TextGenerator>, path: Option<&Path>) -> Self {
        let document = match path {
            Some(path) => match read_document(path) {
                Ok(text) => {
                    info!(path = %path.display(), chars = text.len(), "college document loaded");
                    text
                }
                Err(e) => {
                    error!(error = %e, "failed to load college document");
                    String::new()
                }
            },
            None => {
                info!("no college document configured");
                String::new()
            }
        };
        Self::new(generator, document)
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn has_document(&self) -> bool {
        !self.document.trim().is_empty()
    }

    /// Answer `query` using the document as context.
    pub async fn ask(&self, query: &str) -> Result<String> {
        let prompt = college_prompt(&self.document, query.trim());
        Ok(self
            .generator
            .generate(&prompt)
            .await?
            .unwrap_or_else(|| NO_ANSWER.to_string()))
    }
}
