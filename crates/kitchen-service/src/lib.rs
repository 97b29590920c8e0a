//! The kitchen ticket service: routes requests to ticket creation and lookup
//! on top of a [`KitchenStore`].
#![warn(missing_docs)]

use kitchen_core::{
    CreateTicketResponse, KitchenStore, NewTicket, Request, RequestHandler, RequestMethod,
    StatusCode, Ticket, TicketId, TicketStatus,
};
use tracing::{debug, info};

mod error;
mod store;

pub use error::TicketError;
pub use store::InMemoryKitchenStore;

/// Path prefix in front of the ticket ID of a lookup
pub const TICKET_PATH_PREFIX: &str = "/ticket/";

/// Request handler for the ticket endpoints
///
/// `GET /ticket/{id}` looks a ticket up, `POST` on any path creates one.
/// Requests with any other method are dropped without a response.
pub struct KitchenServer<S> {
    store: S,
}

impl<S: KitchenStore> KitchenServer<S> {
    /// Create a handler backed by `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn get_ticket(&self, rq: Request) {
        let found = self.lookup(&rq.path());
        match found {
            Ok(ticket) => {
                debug!(id = ticket.id, "ticket found");
                rq.respond_with_json(StatusCode::Ok, &ticket);
            }
            Err(err) => {
                debug!(%err, "ticket lookup rejected");
                rq.respond_with_status(err.status());
            }
        }
    }

    fn lookup(&self, path: &str) -> Result<Ticket, TicketError> {
        let id = parse_ticket_id(path)?;
        self.store.ticket_by_id(id).map_err(TicketError::Fetch)
    }

    fn create_ticket(&self, mut rq: Request) {
        match self.create(&mut rq) {
            Ok(id) => {
                info!(id, "ticket created");
                rq.respond_with_json(StatusCode::Accepted, &CreateTicketResponse { id });
            }
            Err(err) => {
                debug!(%err, "ticket creation rejected");
                rq.respond_with_status(err.status());
            }
        }
    }

    fn create(&self, rq: &mut Request) -> Result<TicketId, TicketError> {
        let body = rq.read_bytes()?;
        let ticket = decode_ticket(&body)?;
        self.store.store_ticket(ticket).map_err(TicketError::Store)
    }
}

impl<S: KitchenStore> RequestHandler for KitchenServer<S> {
    fn handle(&self, rq: Request) {
        match rq.method() {
            RequestMethod::Get => self.get_ticket(rq),
            RequestMethod::Post => self.create_ticket(rq),
            RequestMethod::Other(method) => {
                debug!(%method, "dropping request with unsupported method");
            }
        }
    }
}

/// Extract the ticket ID from a lookup path
///
/// Paths without the `/ticket/` prefix are parsed as a whole, which fails
/// for anything but a bare integer.
pub fn parse_ticket_id(path: &str) -> Result<TicketId, TicketError> {
    let raw = path.strip_prefix(TICKET_PATH_PREFIX).unwrap_or(path);
    raw.parse().map_err(|source| TicketError::InvalidId {
        id: raw.to_owned(),
        source,
    })
}

/// Decode and validate the body of a creation request
///
/// The result is a pending ticket without an ID; whatever `ID` and `Status`
/// the client sent are dropped here. Only the first JSON value of the body is
/// decoded, anything after it is ignored.
pub fn decode_ticket(body: &[u8]) -> Result<Ticket, TicketError> {
    let NewTicket { items, .. } = serde_json::Deserializer::from_slice(body)
        .into_iter::<NewTicket>()
        .next()
        .ok_or(TicketError::EmptyBody)??;
    let items = items.ok_or(TicketError::MissingItems)?;
    Ok(Ticket {
        id: TicketId::default(),
        status: TicketStatus::Pending,
        items,
    })
}
