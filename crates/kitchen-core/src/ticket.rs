use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier the storage provider assigns to a ticket
pub type TicketId = i64;

/// Lifecycle state of a ticket
///
/// On the wire a status is its integer discriminant.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum TicketStatus {
    /// The kitchen has not looked at the order yet
    #[default]
    Pending = 0,
    /// The kitchen accepted the order
    Accepted = 1,
    /// The order is ready
    Completed = 2,
}

impl From<TicketStatus> for u8 {
    fn from(status: TicketStatus) -> u8 {
        status as u8
    }
}

impl TryFrom<u8> for TicketStatus {
    type Error = InvalidStatus;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Accepted),
            2 => Ok(Self::Completed),
            other => Err(InvalidStatus(other)),
        }
    }
}

/// A status discriminant outside of `0..=2`
#[derive(Debug)]
pub struct InvalidStatus(u8);

impl fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown ticket status {}", self.0)
    }
}

/// One food order
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ticket {
    /// Assigned by the storage provider
    #[serde(rename = "ID", alias = "id")]
    pub id: TicketId,
    /// Current lifecycle state
    #[serde(rename = "Status", alias = "status")]
    pub status: TicketStatus,
    /// Names of the ordered menu items
    #[serde(rename = "Items", alias = "items")]
    pub items: Vec<String>,
}

impl Ticket {
    /// Create a ticket with the given fields
    pub fn new<I, S>(id: TicketId, status: TicketStatus, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            status,
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Body of a ticket creation request
///
/// Every field is optional at this stage so that presence can be checked
/// after decoding. `id` and `status` are accepted as any integer because the
/// service overwrites both.
///
/// Decoding is lenient in the same places as Go's `encoding/json`: field
/// names match regardless of ASCII case, a repeated field overwrites the
/// earlier one, and `null` entries in `Items` become empty strings. Unknown
/// fields are still rejected.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct NewTicket {
    /// Client-supplied ID, discarded
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Client-supplied status, discarded
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    /// Ordered menu items; required
    #[serde(rename = "Items", skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
}

impl NewTicket {
    /// Request body listing `items`
    pub fn with_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: Some(items.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }
}

const NEW_TICKET_FIELDS: &[&str] = &["ID", "Status", "Items"];

impl<'de> Deserialize<'de> for NewTicket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NewTicketVisitor)
    }
}

struct NewTicketVisitor;

impl<'de> Visitor<'de> for NewTicketVisitor {
    type Value = NewTicket;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a ticket JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<NewTicket, A::Error> {
        let mut ticket = NewTicket::default();
        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case("ID") {
                ticket.id = map.next_value()?;
            } else if key.eq_ignore_ascii_case("Status") {
                ticket.status = map.next_value()?;
            } else if key.eq_ignore_ascii_case("Items") {
                let items: Option<Vec<Option<String>>> = map.next_value()?;
                ticket.items = items
                    .map(|items| items.into_iter().map(Option::unwrap_or_default).collect());
            } else {
                return Err(de::Error::unknown_field(&key, NEW_TICKET_FIELDS));
            }
        }
        Ok(ticket)
    }
}

/// Response to a successful ticket creation
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CreateTicketResponse {
    /// ID of the created ticket
    #[serde(rename = "ID", alias = "id")]
    pub id: TicketId,
}
