//! Remote clients
//!
//! Each remote type implements the same trait as its in-process counterpart,
//! so a [`Coordinator`](occkv_engine::Coordinator) works unchanged against a
//! store and validator on other hosts.
//!
//! A [`Connection`] carries one call at a time; concurrent callers queue on
//! its lock. Transport failures surface as [`Error::Connectivity`].

use async_trait::async_trait;
use occkv_core::{
    CoordinatorApi, Entry, Error, Outcome, Result, RwSet, StoreApi, TxnStats, ValidatorApi,
    Version,
};
use occkv_wire::{
    decode_frame, encode_frame, CoordinatorOp, DispatcherOp, Operation, Reply, Request, Response,
    StoreOp, ValidatorOp,
};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, trace};

struct Stream {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    /// Ids go out in increasing order on the socket
    next_id: u64,
    /// Set while a request is being written. Still set on entry means an
    /// abandoned call may have left a partial frame on the socket.
    writing: bool,
}

/// One TCP connection to a service
pub struct Connection {
    peer: String,
    stream: Mutex<Stream>,
}

impl Connection {
    /// Connect to `addr`
    pub async fn connect(addr: &str) -> Result<Self> {
        let socket = TcpStream::connect(addr)
            .await
            .map_err(|e| Error::Connectivity(format!("connect to {}: {}", addr, e)))?;
        socket.set_nodelay(true)?;
        let (reader, writer) = socket.into_split();

        Ok(Self {
            peer: addr.to_string(),
            stream: Mutex::new(Stream {
                lines: BufReader::new(reader).lines(),
                writer,
                next_id: 1,
                writing: false,
            }),
        })
    }

    /// Address this connection was opened to
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Send one request and wait for its response
    ///
    /// A call whose future is dropped after its request went out leaves that
    /// response unread; it is skipped by the next call on this connection.
    pub async fn call<Op>(&self, op: Op) -> Result<Reply>
    where
        Op: Operation + Serialize + Send,
    {
        let mut stream = self.stream.lock().await;
        if stream.writing {
            return Err(Error::Connectivity(format!(
                "{}: connection left mid-request by an abandoned call",
                self.peer
            )));
        }
        let id = stream.next_id;
        stream.next_id += 1;
        trace!(peer = %self.peer, id, op = op.name(), "Call");
        let frame = encode_frame(&Request::new(id, op))?;

        stream.writing = true;
        stream
            .writer
            .write_all(frame.as_bytes())
            .await
            .map_err(|e| self.broken(e))?;
        stream.writing = false;

        loop {
            let line = stream
                .lines
                .next_line()
                .await
                .map_err(|e| self.broken(e))?
                .ok_or_else(|| Error::Connectivity(format!("{} closed the connection", self.peer)))?;

            let response: Response = decode_frame(&line)?;
            // Ids are issued in order, so a lower one answers an abandoned call.
            if response.id != 0 && response.id < id {
                debug!(peer = %self.peer, stale = response.id, id, "Discarding stale response");
                continue;
            }
            if response.id != id {
                return Err(Error::Protocol(format!(
                    "response id {} does not match request id {}",
                    response.id, id
                )));
            }
            return response.into_result();
        }
    }

    fn broken(&self, e: std::io::Error) -> Error {
        Error::Connectivity(format!("{}: {}", self.peer, e))
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection").field("peer", &self.peer).finish()
    }
}

/// [`StoreApi`] over the wire
#[derive(Debug)]
pub struct RemoteStore {
    conn: Connection,
}

impl RemoteStore {
    /// Connect to a store server
    pub async fn connect(addr: &str) -> Result<Self> {
        Ok(Self {
            conn: Connection::connect(addr).await?,
        })
    }
}

#[async_trait]
impl StoreApi for RemoteStore {
    async fn read(&self, key: &str) -> Result<Entry> {
        self.conn
            .call(StoreOp::Read {
                key: key.to_string(),
            })
            .await?
            .into_entry()
    }

    async fn write(&self, key: &str, new_value: &str, version: Version) -> Result<()> {
        self.conn
            .call(StoreOp::Write {
                key: key.to_string(),
                new_value: new_value.to_string(),
                version,
            })
            .await?
            .into_ack()
    }

    async fn read_all(&self) -> Result<Vec<Entry>> {
        self.conn.call(StoreOp::ReadAll).await?.into_entries()
    }

    async fn stop(&self) -> Result<()> {
        self.conn.call(StoreOp::Stop).await?.into_ack()
    }
}

/// [`ValidatorApi`] over the wire
#[derive(Debug)]
pub struct RemoteValidator {
    conn: Connection,
}

impl RemoteValidator {
    /// Connect to a validator server
    pub async fn connect(addr: &str) -> Result<Self> {
        Ok(Self {
            conn: Connection::connect(addr).await?,
        })
    }
}

#[async_trait]
impl ValidatorApi for RemoteValidator {
    async fn validate(&self, rwset: RwSet) -> Result<Outcome> {
        self.conn
            .call(ValidatorOp::Validate { rwset })
            .await?
            .into_outcome()
    }

    async fn stats(&self) -> Result<TxnStats> {
        self.conn.call(ValidatorOp::GetStats).await?.into_stats()
    }

    async fn stop(&self) -> Result<()> {
        self.conn.call(ValidatorOp::Stop).await?.into_ack()
    }
}

/// [`CoordinatorApi`] over the wire
#[derive(Debug)]
pub struct RemoteCoordinator {
    conn: Connection,
}

impl RemoteCoordinator {
    /// Connect to a coordinator allocated by a dispatcher
    pub async fn connect(addr: &str) -> Result<Self> {
        Ok(Self {
            conn: Connection::connect(addr).await?,
        })
    }
}

#[async_trait]
impl CoordinatorApi for RemoteCoordinator {
    async fn read(&self, key: &str) -> Result<Entry> {
        self.conn
            .call(CoordinatorOp::Read {
                key: key.to_string(),
            })
            .await?
            .into_entry()
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .call(CoordinatorOp::Write {
                key: key.to_string(),
                value: value.to_string(),
            })
            .await?
            .into_ack()
    }

    async fn commit(&self) -> Result<Outcome> {
        self.conn.call(CoordinatorOp::Commit).await?.into_outcome()
    }

    async fn read_all(&self) -> Result<Vec<Entry>> {
        self.conn.call(CoordinatorOp::ReadAll).await?.into_entries()
    }

    async fn stats(&self) -> Result<TxnStats> {
        self.conn.call(CoordinatorOp::GetStats).await?.into_stats()
    }

    async fn stop(&self) -> Result<()> {
        self.conn.call(CoordinatorOp::Stop).await?.into_ack()
    }
}

/// Client for the dispatcher
#[derive(Debug)]
pub struct DispatcherClient {
    conn: Connection,
    host: String,
}

impl DispatcherClient {
    /// Connect to a dispatcher. Coordinators are assumed to live on the same host.
    pub async fn connect(addr: &str) -> Result<Self> {
        let host = match addr.rsplit_once(':') {
            Some((host, _)) => host.to_string(),
            None => addr.to_string(),
        };
        Ok(Self {
            conn: Connection::connect(addr).await?,
            host,
        })
    }

    /// Ask for a fresh coordinator and return its port
    pub async fn get_handler_port(&self) -> Result<u16> {
        self.conn.call(DispatcherOp::GetHandlerPort).await?.into_port()
    }

    /// Ask for a fresh coordinator and connect to it
    pub async fn open_coordinator(&self) -> Result<RemoteCoordinator> {
        let port = self.get_handler_port().await?;
        RemoteCoordinator::connect(&format!("{}:{}", self.host, port)).await
    }

    /// Shut the dispatcher and every coordinator it started down
    pub async fn stop(&self) -> Result<()> {
        self.conn.call(DispatcherOp::Stop).await?.into_ack()
    }
}
