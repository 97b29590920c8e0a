use std::sync::Arc;

use kitchen_core::{KitchenStore, Ticket, TicketStatus};
use kitchen_service::KitchenServer;

mod api;
mod stub;
pub use api::{Api, ApiError, ApiResponse};
pub use stub::{FailingKitchenStore, StubKitchenStore};

pub struct TestCtxBuilder {
    /// Count of worker threads calling the handler
    pub worker_threads: u16,
}

impl TestCtxBuilder {
    pub fn new() -> Self {
        TestCtxBuilder { worker_threads: 2 }
    }

    /// Set the number of worker threads to use
    pub fn with_worker_threads(mut self, threads: u16) -> Self {
        assert_ne!(threads, 0);
        self.worker_threads = threads;
        self
    }

    /// Build the test context serving a handler backed by `store`
    pub fn build<S>(self, store: S) -> TestCtx<S>
    where
        S: KitchenStore + Send + Sync + 'static,
    {
        let store = Arc::new(store);
        let handler = Arc::new(KitchenServer::new(store.clone()));
        let (server, api) = api::mock::start(self.worker_threads, handler);

        TestCtx {
            api,
            store,
            server,
            worker_threads: self.worker_threads,
            drop_bomb: DropBomb,
        }
    }
}

impl Default for TestCtxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Test context
pub struct TestCtx<S> {
    /// API allowing to interact with the handler
    pub api: Api,
    /// The store behind the handler
    pub store: Arc<S>,
    server: api::mock::MockServer,
    /// Number of worker threads
    pub worker_threads: u16,

    drop_bomb: DropBomb,
}

impl<S> TestCtx<S> {
    /// Shut the workers down and finish the test
    pub async fn finish(self) {
        std::mem::forget(self.drop_bomb);
        drop(self.api);
        self.server.shutdown().await;
    }
}

struct DropBomb;

impl Drop for DropBomb {
    fn drop(&mut self) {
        eprintln!("@TestAuthor: You should call `ctx.finish().await` to shut the workers down");
    }
}

/// The two tickets most scenarios start from
pub fn seeded_tickets() -> Vec<Ticket> {
    vec![
        Ticket::new(1, TicketStatus::Accepted, ["burger", "fries"]),
        Ticket::new(2, TicketStatus::Pending, ["pizza", "water"]),
    ]
}
