//! 🏗 Infrastructure shared by the kitchen ticket service: the ticket model,
//! the storage contract, and the plumbing for handling requests.
#![warn(missing_docs)]

mod request;
mod store;
mod ticket;

pub use request::{RawRequest, Request, RequestHandler, RequestMethod, StatusCode};
pub use store::{KitchenStore, StoreError};
pub use ticket::{CreateTicketResponse, InvalidStatus, NewTicket, Ticket, TicketId, TicketStatus};
