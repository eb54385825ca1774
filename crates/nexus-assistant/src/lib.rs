//! Question answering and voice command handling for Nexus.
//!
//! - [`GeminiClient`] calls the Gemini `generateContent` API
//! - [`ChatService`] and [`CollegeAdvisor`] build prompts on top of any
//!   [`TextGenerator`]
//! - [`HospitalKnowledge`] answers from a fixed FAQ without a model
//! - [`VoiceGate`] decides which speech transcripts are commands

pub mod chat;
pub mod college;
pub mod error;
pub mod gemini;
pub mod hospital;
pub mod voice;

pub use chat::{ChatService, NO_RESPONSE};
pub use college::{college_prompt, CollegeAdvisor, COLLEGE_DOC_ENV, NO_ANSWER};
pub use error::{AssistantError, Result};
pub use gemini::{GeminiClient, GeminiConfig, GenerateRequest, GenerateResponse, TextGenerator};
pub use hospital::{HospitalKnowledge, HOSPITAL_DATA_ENV, UNKNOWN_ANSWER};
pub use voice::{parse_clock, to_24_hour, Meridiem, View, VoiceGate, VoiceOutcome};
