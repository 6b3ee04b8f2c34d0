//! Engine error types.

use thiserror::Error;

/// Operator actions the engine refuses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no open reroute proposals to approve")]
    NothingToApprove,
    #[error("reroutes are locked for this session")]
    Locked,
    #[error("proposal {0} not found")]
    ProposalNotFound(String),
    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),
    #[error("unknown ingestion provider '{0}'")]
    UnknownProvider(String),
}
