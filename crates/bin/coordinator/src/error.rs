use thiserror::Error;

/// Crate-wide error taxonomy. Variants map to the kinds named in spec §7
/// (Precondition, AuthN, Input, Budget, Internal) rather than to individual
/// call sites; the `From<CoordinatorError> for tonic::Status` impl below is
/// the single place that decides the wire-visible gRPC code.
#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("coordinator is not accepting marbles yet")]
    NotReady,

    #[error("no peer certificate on the activation channel")]
    MissingPeerCertificate,

    #[error("quote validation failed: {0}")]
    QuoteRejected(String),

    #[error("unknown marble type: {0}")]
    UnknownMarbleType(String),

    #[error("invalid uuid: {0}")]
    InvalidUuid(String),

    #[error("invalid csr: {0}")]
    InvalidCsr(String),

    #[error("activation budget exhausted for marble type {0}")]
    BudgetExhausted(String),

    #[error("manifest is inconsistent: {0}")]
    InconsistentManifest(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("template error in {path}: {reason}")]
    Template { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, CoordinatorError>;

impl From<CoordinatorError> for tonic::Status {
    fn from(err: CoordinatorError) -> Self {
        use CoordinatorError::*;
        match err {
            NotReady => tonic::Status::failed_precondition(err.to_string()),
            MissingPeerCertificate | QuoteRejected(_) => {
                tonic::Status::unauthenticated(err.to_string())
            }
            UnknownMarbleType(_) | InvalidUuid(_) | InvalidCsr(_) => {
                tonic::Status::invalid_argument(err.to_string())
            }
            BudgetExhausted(_) => tonic::Status::resource_exhausted(err.to_string()),
            InconsistentManifest(_) | Store(_) | Crypto(_) | Template { .. } => {
                tonic::Status::internal(err.to_string())
            }
        }
    }
}
