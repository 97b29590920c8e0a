//! In-memory ticket storage

use std::collections::BTreeMap;

use kitchen_core::{KitchenStore, StoreError, Ticket, TicketId};
use parking_lot::Mutex;

/// ID handed out to the first ticket of an empty store
const FIRST_ID: TicketId = 1;

struct Inner {
    /// ID the next stored ticket receives
    next_id: TicketId,
    tickets: BTreeMap<TicketId, Ticket>,
}

/// Ticket storage kept in process memory
///
/// Safe to share between threads; writes are serialized by a mutex. Nothing
/// survives a restart.
pub struct InMemoryKitchenStore(Mutex<Inner>);

impl InMemoryKitchenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self(Mutex::new(Inner {
            next_id: FIRST_ID,
            tickets: BTreeMap::new(),
        }))
    }

    /// Create a store holding `tickets` under their own IDs
    ///
    /// Newly stored tickets get IDs above the largest seeded one.
    pub fn with_tickets(tickets: impl IntoIterator<Item = Ticket>) -> Self {
        let tickets: BTreeMap<_, _> = tickets.into_iter().map(|t| (t.id, t)).collect();
        let next_id = tickets
            .last_key_value()
            .map_or(FIRST_ID, |(&id, _)| id.saturating_add(1).max(FIRST_ID));
        Self(Mutex::new(Inner { next_id, tickets }))
    }

    /// Get the number of stored tickets
    pub fn len(&self) -> usize {
        self.0.lock().tickets.len()
    }

    /// Check whether the store holds no tickets
    pub fn is_empty(&self) -> bool {
        self.0.lock().tickets.is_empty()
    }
}

impl Default for InMemoryKitchenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KitchenStore for InMemoryKitchenStore {
    fn ticket_by_id(&self, id: TicketId) -> Result<Ticket, StoreError> {
        self.0
            .lock()
            .tickets
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn store_ticket(&self, mut ticket: Ticket) -> Result<TicketId, StoreError> {
        let mut inner = self.0.lock();
        let id = inner.next_id;
        if inner.tickets.contains_key(&id) {
            return Err(StoreError::Write("ticket ID space exhausted".into()));
        }
        inner.next_id = id.saturating_add(1);

        ticket.id = id;
        inner.tickets.insert(id, ticket);
        Ok(id)
    }
}
