pub mod http;

pub use http::{
    EditRequest, EditResponse, HealthResponse, ListMessagesResponse, StatusResponse,
    SubmitRequest, SubmitResponse,
};
