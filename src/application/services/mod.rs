mod document;
mod rag;

pub use document::{DocumentService, UNSUPPORTED_ENCODING};
pub use rag::{Answer, RagService, EMPTY_STORE, QUESTION_REQUIRED};
