//! Request/response envelopes and per-service operations

use super::error::WireError;
use occkv_core::{Entry, Error, Outcome, Result, RwSet, TxnStats, Version};
use serde::{Deserialize, Serialize};

/// Behaviour shared by every service's op enum
pub trait Operation {
    /// Op name, for logs
    fn name(&self) -> &'static str;

    /// True for the op that asks the service to shut down
    fn is_stop(&self) -> bool;
}

/// Store operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreOp {
    /// Read one key
    Read {
        /// Key to read
        key: String,
    },
    /// Set value and version of an existing key
    Write {
        /// Key to write
        key: String,
        /// New value
        new_value: String,
        /// Version chosen by the validator
        version: Version,
    },
    /// Every entry (diagnostic)
    ReadAll,
    /// Shut the store down
    Stop,
}

impl Operation for StoreOp {
    fn name(&self) -> &'static str {
        match self {
            StoreOp::Read { .. } => "Read",
            StoreOp::Write { .. } => "Write",
            StoreOp::ReadAll => "ReadAll",
            StoreOp::Stop => "Stop",
        }
    }

    fn is_stop(&self) -> bool {
        matches!(self, StoreOp::Stop)
    }
}

/// Validator operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidatorOp {
    /// Validate and possibly apply a transaction
    Validate {
        /// Read and write sets
        rwset: RwSet,
    },
    /// Attempt/success counters
    GetStats,
    /// Shut the validator down
    Stop,
}

impl Operation for ValidatorOp {
    fn name(&self) -> &'static str {
        match self {
            ValidatorOp::Validate { .. } => "Validate",
            ValidatorOp::GetStats => "GetStats",
            ValidatorOp::Stop => "Stop",
        }
    }

    fn is_stop(&self) -> bool {
        matches!(self, ValidatorOp::Stop)
    }
}

/// Coordinator operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinatorOp {
    /// Transactional read
    Read {
        /// Key to read
        key: String,
    },
    /// Buffered write
    Write {
        /// Key to write
        key: String,
        /// Value to write
        value: String,
    },
    /// Commit the open transaction
    Commit,
    /// Every store entry (diagnostic)
    ReadAll,
    /// Coordinator counters
    GetStats,
    /// Release the coordinator
    Stop,
}

impl Operation for CoordinatorOp {
    fn name(&self) -> &'static str {
        match self {
            CoordinatorOp::Read { .. } => "Read",
            CoordinatorOp::Write { .. } => "Write",
            CoordinatorOp::Commit => "Commit",
            CoordinatorOp::ReadAll => "ReadAll",
            CoordinatorOp::GetStats => "GetStats",
            CoordinatorOp::Stop => "Stop",
        }
    }

    fn is_stop(&self) -> bool {
        matches!(self, CoordinatorOp::Stop)
    }
}

/// Dispatcher operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatcherOp {
    /// Start a coordinator for a new client and return its port
    GetHandlerPort,
    /// Shut the dispatcher and its coordinators down
    Stop,
}

impl Operation for DispatcherOp {
    fn name(&self) -> &'static str {
        match self {
            DispatcherOp::GetHandlerPort => "GetHandlerPort",
            DispatcherOp::Stop => "Stop",
        }
    }

    fn is_stop(&self) -> bool {
        matches!(self, DispatcherOp::Stop)
    }
}

/// Request envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request<Op> {
    /// Correlates the response
    pub id: u64,
    /// Operation to run
    pub op: Op,
}

impl<Op> Request<Op> {
    /// Create a request
    pub fn new(id: u64, op: Op) -> Self {
        Self { id, op }
    }
}

/// Successful reply payload, shared by all services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reply {
    /// Operation done, nothing to return
    Ack,
    /// One entry
    Entry(Entry),
    /// Many entries
    Entries(Vec<Entry>),
    /// Commit decision
    Outcome(Outcome),
    /// Counters
    Stats(TxnStats),
    /// Port of a freshly started coordinator
    Port(u16),
}

impl Reply {
    fn kind(&self) -> &'static str {
        match self {
            Reply::Ack => "Ack",
            Reply::Entry(_) => "Entry",
            Reply::Entries(_) => "Entries",
            Reply::Outcome(_) => "Outcome",
            Reply::Stats(_) => "Stats",
            Reply::Port(_) => "Port",
        }
    }

    fn unexpected(self, wanted: &str) -> Error {
        Error::Protocol(format!("expected {} reply, got {}", wanted, self.kind()))
    }

    /// Expect [`Reply::Ack`]
    pub fn into_ack(self) -> Result<()> {
        match self {
            Reply::Ack => Ok(()),
            other => Err(other.unexpected("Ack")),
        }
    }

    /// Expect [`Reply::Entry`]
    pub fn into_entry(self) -> Result<Entry> {
        match self {
            Reply::Entry(entry) => Ok(entry),
            other => Err(other.unexpected("Entry")),
        }
    }

    /// Expect [`Reply::Entries`]
    pub fn into_entries(self) -> Result<Vec<Entry>> {
        match self {
            Reply::Entries(entries) => Ok(entries),
            other => Err(other.unexpected("Entries")),
        }
    }

    /// Expect [`Reply::Outcome`]
    pub fn into_outcome(self) -> Result<Outcome> {
        match self {
            Reply::Outcome(outcome) => Ok(outcome),
            other => Err(other.unexpected("Outcome")),
        }
    }

    /// Expect [`Reply::Stats`]
    pub fn into_stats(self) -> Result<TxnStats> {
        match self {
            Reply::Stats(stats) => Ok(stats),
            other => Err(other.unexpected("Stats")),
        }
    }

    /// Expect [`Reply::Port`]
    pub fn into_port(self) -> Result<u16> {
        match self {
            Reply::Port(port) => Ok(port),
            other => Err(other.unexpected("Port")),
        }
    }
}

/// Result carried by a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WireResult {
    /// Operation succeeded
    Ok(Reply),
    /// Operation failed
    Err(WireError),
}

/// Response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Id of the request being answered
    pub id: u64,
    /// Reply or error
    pub result: WireResult,
}

impl Response {
    /// Successful response
    pub fn ok(id: u64, reply: Reply) -> Self {
        Self {
            id,
            result: WireResult::Ok(reply),
        }
    }

    /// Failed response
    pub fn err(id: u64, error: &Error) -> Self {
        Self {
            id,
            result: WireResult::Err(WireError::from_error(error)),
        }
    }

    /// Response for a handler result
    pub fn from_result(id: u64, result: Result<Reply>) -> Self {
        match result {
            Ok(reply) => Self::ok(id, reply),
            Err(e) => Self::err(id, &e),
        }
    }

    /// Back to a handler result, restoring the error variant
    pub fn into_result(self) -> Result<Reply> {
        match self.result {
            WireResult::Ok(reply) => Ok(reply),
            WireResult::Err(error) => Err(error.into_error()),
        }
    }
}
