//! HTTP front end of the kitchen ticket service

#![warn(missing_docs)]

pub mod config;
mod http;

use std::thread;

use eyre::{eyre, Report, Result};
use kitchen_core::RequestHandler;
use tracing::{info, info_span, warn};

pub use config::ServerSettings;
pub use http::{MAX_BODY_LEN, MAX_DISCARD_LEN};

/// Bind an HTTP server to the configured address
pub fn bind(settings: &ServerSettings) -> Result<tiny_http::Server> {
    tiny_http::Server::http((settings.host.as_str(), settings.port))
        .map_err(|err| eyre!("could not listen on {}:{}: {err}", settings.host, settings.port))
}

/// Receive requests from `server` and pass them to `handler`
///
/// Returns once receiving fails, e.g. after [`tiny_http::Server::unblock`].
pub fn http_loop<H: RequestHandler>(server: &tiny_http::Server, handler: &H) {
    loop {
        let rq = match server.recv() {
            Ok(rq) => rq,
            Err(err) => {
                warn!(%err, "HTTP receive failed, stopping worker");
                return;
            }
        };
        if http::exceeds_discard_limit(&rq) {
            http::reject_oversized(rq);
            continue;
        }

        let (id, rq) = http::parse(rq);
        let span = info_span!("request", %id, method = %rq.method(), url = rq.url());
        let _guard = span.enter();
        handler.handle(rq);
    }
}

/// Serve `handler` on `server` from `worker_threads` threads
///
/// Blocks until every worker has stopped.
pub fn serve<H: RequestHandler + Sync>(
    server: &tiny_http::Server,
    handler: &H,
    worker_threads: u32,
) -> Result<()> {
    info!(addr = ?server.server_addr(), worker_threads, "serving tickets");
    thread::scope(|s| -> Result<()> {
        for i in 0..worker_threads {
            let spawned = thread::Builder::new()
                .name(format!("http_worker_{i}"))
                .spawn_scoped(s, || http_loop(server, handler));
            if let Err(err) = spawned {
                // the scope joins the workers already running before returning
                stop_workers(server, i);
                return Err(Report::new(err).wrap_err(format!("could not spawn HTTP worker {i}")));
            }
        }
        Ok(())
    })
}

/// Make `count` threads blocked in [`http_loop`] on `server` return
pub fn stop_workers(server: &tiny_http::Server, count: u32) {
    for _ in 0..count {
        server.unblock();
    }
}
