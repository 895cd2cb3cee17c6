use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// A request's uuid is assigned exactly once, by the scheduler
    /// that accepts it.
    #[error("identity already assigned to this request: {existing}")]
    IdentityAlreadyAssigned { existing: String },
}
