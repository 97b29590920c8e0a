//! Stores for exercising the handler

use kitchen_core::{KitchenStore, StoreError, Ticket, TicketId};
use parking_lot::Mutex;

/// Minimal store: a ticket's ID is the number of tickets stored before it
///
/// Lookups scan the list for a matching ID, so seeded tickets keep theirs.
#[derive(Default)]
pub struct StubKitchenStore {
    tickets: Mutex<Vec<Ticket>>,
}

impl StubKitchenStore {
    pub fn new(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: Mutex::new(tickets),
        }
    }

    /// Copy of everything stored so far
    pub fn tickets(&self) -> Vec<Ticket> {
        self.tickets.lock().clone()
    }
}

impl KitchenStore for StubKitchenStore {
    fn ticket_by_id(&self, id: TicketId) -> Result<Ticket, StoreError> {
        self.tickets
            .lock()
            .iter()
            .find(|ticket| ticket.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn store_ticket(&self, mut ticket: Ticket) -> Result<TicketId, StoreError> {
        let mut tickets = self.tickets.lock();
        ticket.id = tickets.len() as TicketId;
        let id = ticket.id;
        tickets.push(ticket);
        Ok(id)
    }
}

/// Store whose writes always fail and which holds no tickets
#[derive(Default)]
pub struct FailingKitchenStore;

impl KitchenStore for FailingKitchenStore {
    fn ticket_by_id(&self, id: TicketId) -> Result<Ticket, StoreError> {
        Err(StoreError::NotFound(id))
    }

    fn store_ticket(&self, _ticket: Ticket) -> Result<TicketId, StoreError> {
        Err(StoreError::Write("disk on fire".into()))
    }
}
