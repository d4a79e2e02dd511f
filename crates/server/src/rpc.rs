//! Line-delimited JSON RPC server
//!
//! One task accepts connections; each connection gets its own task that reads
//! a request line, runs it against the [`Service`] and writes the response
//! line. Requests on one connection are answered in order.
//!
//! A successful `Stop` op shuts the whole server down and is still answered;
//! [`ServerHandle::shutdown`] does the same without a reply.

use async_trait::async_trait;
use occkv_core::{Error, Result};
use occkv_wire::{decode_frame, encode_frame, Operation, Reply, Request, Response};
use serde::de::DeserializeOwned;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A service that can be exposed over the wire
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Operations this service accepts
    type Op: Operation + DeserializeOwned + fmt::Debug + Send + 'static;

    /// Service name, for logs
    const NAME: &'static str;

    /// Run one operation
    async fn handle(&self, op: Self::Op) -> Result<Reply>;
}

/// Handle to a running server
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Arc<watch::Sender<bool>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Port the listener is bound to
    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// Ask the server to stop accepting and close every connection
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// True once shutdown has been requested, locally or by a `Stop` op
    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Wait until shutdown has been requested
    pub async fn stopped(&self) {
        let mut rx = self.shutdown.subscribe();
        // The sender lives in `self`, so this only fails if it was dropped.
        let _ = rx.wait_for(|stopping| *stopping).await;
    }

    /// Wait for the accept loop to exit
    pub async fn join(self) -> Result<()> {
        self.task
            .await
            .map_err(|e| Error::Internal(format!("server task failed: {}", e)))
    }
}

/// Bind `addr` and serve `service` on it
pub async fn serve<S: Service>(addr: &str, service: Arc<S>) -> Result<ServerHandle> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Connectivity(format!("bind {}: {}", addr, e)))?;
    spawn(listener, service)
}

/// Serve `service` on an already bound listener
pub fn spawn<S: Service>(listener: TcpListener, service: Arc<S>) -> Result<ServerHandle> {
    let local_addr = listener.local_addr()?;
    let (tx, rx) = watch::channel(false);
    let shutdown = Arc::new(tx);

    let task = tokio::spawn(accept_loop(listener, service, Arc::clone(&shutdown), rx));
    info!(service = S::NAME, addr = %local_addr, "Listening");

    Ok(ServerHandle {
        local_addr,
        shutdown,
        task,
    })
}

async fn accept_loop<S: Service>(
    listener: TcpListener,
    service: Arc<S>,
    shutdown: Arc<watch::Sender<bool>>,
    mut rx: watch::Receiver<bool>,
) {
    loop {
        if *rx.borrow() {
            break;
        }
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((socket, peer)) => {
                        debug!(service = S::NAME, %peer, "Accepted connection");
                        let service = Arc::clone(&service);
                        let shutdown = Arc::clone(&shutdown);
                        let rx = rx.clone();
                        tokio::spawn(async move {
                            if let Err(e) = serve_connection(socket, service, shutdown, rx).await {
                                debug!(service = S::NAME, %peer, error = %e, "Connection closed with error");
                            }
                        });
                    }
                    Err(e) => {
                        warn!(service = S::NAME, error = %e, "Accept failed");
                    }
                }
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    info!(service = S::NAME, "Stopped listening");
}

async fn serve_connection<S: Service>(
    socket: TcpStream,
    service: Arc<S>,
    shutdown: Arc<watch::Sender<bool>>,
    mut rx: watch::Receiver<bool>,
) -> Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut lines = BufReader::new(reader).lines();

    loop {
        if *rx.borrow() {
            return Ok(());
        }
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = rx.changed() => return Ok(()),
        };
        let Some(line) = line else {
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        let (response, stop) = match decode_frame::<Request<S::Op>>(&line) {
            Ok(request) => {
                let op_name = request.op.name();
                let stop = request.op.is_stop();
                debug!(service = S::NAME, id = request.id, op = op_name, "Request");

                let result = service.handle(request.op).await;
                if let Err(e) = &result {
                    debug!(service = S::NAME, id = request.id, op = op_name, error = %e, "Request failed");
                }
                let stop = stop && result.is_ok();
                (Response::from_result(request.id, result), stop)
            }
            // The id is unknown for an undecodable frame; 0 is never issued by clients.
            Err(e) => {
                warn!(service = S::NAME, error = %e, "Malformed request");
                (Response::err(0, &e), false)
            }
        };

        // Raised before the reply goes out, so a caller that sees the ack
        // also sees the server as shutting down.
        if stop {
            info!(service = S::NAME, "Stop requested");
            shutdown.send_replace(true);
        }
        writer.write_all(encode_frame(&response)?.as_bytes()).await?;
        writer.flush().await?;
        if stop {
            return Ok(());
        }
    }
}
