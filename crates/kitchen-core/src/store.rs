use std::sync::Arc;

use thiserror::Error;

use crate::{Ticket, TicketId};

/// Failure reported by a [`KitchenStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    /// No ticket carries the requested ID
    #[error("no ticket with ID = {0}")]
    NotFound(TicketId),
    /// The ticket could not be written
    #[error("unable to store ticket: {0}")]
    Write(String),
}

/// Storage for tickets
///
/// The trait does not promise anything about concurrent use. Implementations
/// that are shared between threads have to serialize their own writes.
pub trait KitchenStore {
    /// Look up the ticket with the given ID
    ///
    /// Fails with [`StoreError::NotFound`] if there is none.
    fn ticket_by_id(&self, id: TicketId) -> Result<Ticket, StoreError>;

    /// Persist a new ticket and return the ID assigned to it
    ///
    /// The `id` carried by `ticket` is ignored.
    fn store_ticket(&self, ticket: Ticket) -> Result<TicketId, StoreError>;
}

impl<S: KitchenStore + ?Sized> KitchenStore for Arc<S> {
    fn ticket_by_id(&self, id: TicketId) -> Result<Ticket, StoreError> {
        (**self).ticket_by_id(id)
    }

    fn store_ticket(&self, ticket: Ticket) -> Result<TicketId, StoreError> {
        (**self).store_ticket(ticket)
    }
}
