//! Mock transport calling a [`KitchenServer`] directly, without HTTP

use std::sync::Arc;

use kitchen_core::{KitchenStore, RawRequest, Request, RequestHandler, RequestMethod, StatusCode};
use kitchen_service::KitchenServer;
use tokio::sync::oneshot;
use tokio::task::{self, JoinHandle};

use super::{Api, RequestMsg, Response};

pub struct MockServer {
    join_handles: Vec<JoinHandle<()>>,
}

struct MockRawRequest {
    method: RequestMethod,
    url: String,
    body: Option<Vec<u8>>,
    /// `None` once a response has been sent
    response_channel: Option<oneshot::Sender<Response>>,
}

pub fn start<S>(threads: u16, handler: Arc<KitchenServer<S>>) -> (MockServer, Api)
where
    S: KitchenStore + Send + Sync + 'static,
{
    let it = (0..threads).map(|_| {
        let (sender, receiver) = flume::bounded::<RequestMsg>(65536);
        let handler = handler.clone();
        let handle = task::spawn_blocking(move || {
            let handler = &*handler;
            for msg in receiver.into_iter() {
                let raw = Box::new(MockRawRequest {
                    method: msg.method,
                    url: msg.url,
                    body: Some(msg.body),
                    response_channel: Some(msg.response_channel),
                });
                handler.handle(Request::from_raw(raw))
            }
        });
        (sender, handle)
    });
    let (senders, join_handles) = it.unzip();

    (MockServer { join_handles }, Api::new(senders))
}

impl MockServer {
    /// Wait for the workers to drain their queues
    ///
    /// Every [`Api`] handle has to be dropped first.
    pub async fn shutdown(self) {
        for handle in self.join_handles {
            handle.await.unwrap()
        }
    }
}

impl RawRequest for MockRawRequest {
    fn url(&self) -> &str {
        &self.url
    }

    fn method(&self) -> RequestMethod {
        self.method.clone()
    }

    fn read_bytes(&mut self) -> std::io::Result<Vec<u8>> {
        Ok(self.body.take().unwrap_or_default())
    }

    fn respond(mut self: Box<Self>, status: StatusCode, body: Option<Vec<u8>>) {
        let channel = self
            .response_channel
            .take()
            .expect("responded to a request twice");
        channel.send(Response::Answered { status, body }).unwrap()
    }
}

impl Drop for MockRawRequest {
    fn drop(&mut self) {
        if let Some(channel) = self.response_channel.take() {
            let _ = channel.send(Response::Unanswered);
        }
    }
}
