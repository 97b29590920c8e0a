use std::sync::Arc;

use eyre::Result;
use flume::Sender;
use kitchen_core::{NewTicket, RequestMethod, StatusCode, TicketId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;

pub mod mock;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("the handler dropped the request without responding")]
    Unanswered,
    #[error("expected a response body, got none")]
    NoBody,
}

#[derive(Debug)]
enum Response {
    Answered {
        status: StatusCode,
        body: Option<Vec<u8>>,
    },
    Unanswered,
}

struct RequestMsg {
    method: RequestMethod,
    url: String,
    body: Vec<u8>,
    response_channel: oneshot::Sender<Response>,
}

/// Client side of the mock transport
pub struct Api {
    /// One channel per worker thread
    channels: Arc<Vec<Sender<RequestMsg>>>,

    my_channel: Sender<RequestMsg>,
    my_index: usize,
}

impl Api {
    fn new(channels: Vec<Sender<RequestMsg>>) -> Self {
        let my_channel = channels[0].clone();
        Self {
            channels: Arc::new(channels),
            my_channel,
            my_index: 0,
        }
    }
}

impl Clone for Api {
    fn clone(&self) -> Self {
        let my_index = (self.my_index + 1) % self.channels.len();
        Self {
            channels: self.channels.clone(),
            my_channel: self.channels[my_index].clone(),
            my_index,
        }
    }
}

impl Api {
    /// Send an arbitrary request and wait for the handler to finish with it
    pub async fn request(
        &self,
        method: RequestMethod,
        url: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Result<ApiResponse> {
        let (sender, receiver) = oneshot::channel();
        let msg = RequestMsg {
            method,
            url: url.into(),
            body: body.into(),
            response_channel: sender,
        };
        self.my_channel.send_async(msg).await?;
        Ok(match receiver.await? {
            Response::Answered { status, body } => ApiResponse {
                status: Some(status),
                body,
            },
            Response::Unanswered => ApiResponse {
                status: None,
                body: None,
            },
        })
    }

    /// `GET /ticket/{id}`
    pub async fn get_ticket(&self, id: TicketId) -> Result<ApiResponse> {
        self.get(format!("/ticket/{id}")).await
    }

    /// `GET` on an arbitrary URL
    pub async fn get(&self, url: impl Into<String>) -> Result<ApiResponse> {
        self.request(RequestMethod::Get, url, Vec::new()).await
    }

    /// `POST /ticket/` with `ticket` as JSON body
    pub async fn create_ticket<T: Serialize + ?Sized>(&self, ticket: &T) -> Result<ApiResponse> {
        self.create_ticket_raw(serde_json::to_vec(ticket)?).await
    }

    /// `POST /ticket/` listing `items`
    pub async fn order<I, S>(&self, items: I) -> Result<ApiResponse>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.create_ticket(&NewTicket::with_items(items)).await
    }

    /// `POST /ticket/` with a verbatim body
    pub async fn create_ticket_raw(&self, body: impl Into<Vec<u8>>) -> Result<ApiResponse> {
        self.request(RequestMethod::Post, "/ticket/", body).await
    }
}

/// What the handler answered
#[derive(Debug)]
pub struct ApiResponse {
    /// [`None`] if the request was dropped without a response
    pub status: Option<StatusCode>,
    pub body: Option<Vec<u8>>,
}

impl ApiResponse {
    pub fn status(&self) -> Result<StatusCode, ApiError> {
        self.status.ok_or(ApiError::Unanswered)
    }

    pub fn is_unanswered(&self) -> bool {
        self.status.is_none()
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let body = self.body.as_deref().ok_or(ApiError::NoBody)?;
        Ok(serde_json::from_slice(body)?)
    }
}
