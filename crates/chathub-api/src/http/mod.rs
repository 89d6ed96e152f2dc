//! HTTP transport for Chat Hub.
//!
//! Protocol endpoints (`/chat`, `/command`) take and return the raw protocol
//! JSON. Inspection endpoints under `/api/v1/` use the envelope format.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
