//! bacheca-core: tipi condivisi dal server e dai test (modello, DTO HTTP, errori).
//! Niente I/O qui dentro.

pub mod models;
pub mod protocol;
pub mod error;

// Re-export utili per ridurre i percorsi nel crate server
pub use error::ErrorResponse;
pub use models::message::Message;
pub use protocol::http::{
    EditRequest, EditResponse, HealthResponse, ListMessagesResponse, StatusResponse,
    SubmitRequest, SubmitResponse,
};
