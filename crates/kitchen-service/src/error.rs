//! Errors surfaced by the request handler

use std::io;
use std::num::ParseIntError;

use kitchen_core::{StatusCode, StoreError};
use thiserror::Error;

/// Reason a ticket request failed
#[derive(Debug, Error)]
pub enum TicketError {
    /// The path does not end in an integer ticket ID
    #[error("invalid ticket ID {id:?}: {source}")]
    InvalidId {
        /// Offending path segment
        id: String,
        /// Parse failure
        source: ParseIntError,
    },
    /// Reading the request body failed
    #[error("unable to read request body: {0}")]
    Body(#[from] io::Error),
    /// The body holds no JSON value at all
    #[error("request body is empty")]
    EmptyBody,
    /// The body is not a valid ticket document
    #[error("unable to unmarshal ticket JSON: {0}")]
    Decode(#[from] serde_json::Error),
    /// The body has no `Items`, or they are null
    #[error("ticket JSON has no items, cannot persist")]
    MissingItems,
    /// Lookup failed
    #[error("unable to fetch ticket: {0}")]
    Fetch(#[source] StoreError),
    /// Persisting failed
    #[error("unable to persist ticket: {0}")]
    Store(#[source] StoreError),
}

impl TicketError {
    /// HTTP status the error is reported with
    ///
    /// Storage failures on creation are indistinguishable from malformed
    /// input on the wire.
    pub fn status(&self) -> StatusCode {
        match self {
            TicketError::Fetch(_) => StatusCode::NotFound,
            TicketError::InvalidId { .. }
            | TicketError::Body(_)
            | TicketError::EmptyBody
            | TicketError::Decode(_)
            | TicketError::MissingItems
            | TicketError::Store(_) => StatusCode::BadRequest,
        }
    }
}
