use uuid::Uuid;

/// How a [`RepresentativesError`] should be reported to the caller.
///
/// The API layer maps these onto HTTP status codes; the core only classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// A referenced user or profile does not exist (or is logically deleted).
    NotFound,
    /// The request is well-formed but the operation is not allowed.
    InvalidOperation,
    /// The operation collides with an existing active record or invite.
    Conflict,
    /// A collaborator failed; nothing about the request itself is wrong.
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum RepresentativesError {
    #[error("no existing user was found for that identity document")]
    UserNotFound,
    #[error("the user has no patient profile and cannot act as a representative")]
    MissingPatientProfile,
    #[error("no user is linked to patient profile {0}")]
    ProfileNotFound(Uuid),
    #[error("the user is a minor and cannot be added as a representative")]
    RepresentativeUnderage,
    #[error("you cannot add yourself as your own representative")]
    SelfRepresentation,
    #[error("a request was already sent to this person; it is awaiting confirmation")]
    InvitePending,
    #[error("this representative is already registered")]
    AlreadyRegistered,
    #[error("an active relationship already exists for this pair")]
    DuplicateActivePair,
    #[error("representation store failure: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("pending-actions collaborator failure: {0}")]
    PendingActions(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("order-update collaborator failure: {0}")]
    Orders(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepresentativesError {
    /// Classifies the error for the request layer.
    pub fn kind(&self) -> RejectionKind {
        match self {
            RepresentativesError::UserNotFound
            | RepresentativesError::MissingPatientProfile
            | RepresentativesError::ProfileNotFound(_) => RejectionKind::NotFound,
            RepresentativesError::RepresentativeUnderage
            | RepresentativesError::SelfRepresentation => RejectionKind::InvalidOperation,
            RepresentativesError::InvitePending
            | RepresentativesError::AlreadyRegistered
            | RepresentativesError::DuplicateActivePair => RejectionKind::Conflict,
            RepresentativesError::Store(_)
            | RepresentativesError::PendingActions(_)
            | RepresentativesError::Orders(_) => RejectionKind::Internal,
        }
    }
}

pub type RepresentativesResult<T> = std::result::Result<T, RepresentativesError>;
