use uuid::Uuid;

/// Why a request can no longer be resolved by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessFailure {
    /// A newer request replaced it before the user acted
    Superseded,
    /// The provider was torn down while the request was pending
    Abandoned,
}

/// Errors returned by [`RequestBroker`](super::RequestBroker).
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("dialog request {request_id} was superseded by a newer request")]
    Superseded { request_id: Uuid },

    #[error("dialog request {request_id} was abandoned before the user responded")]
    Abandoned { request_id: Uuid },

    /// The caller's result callback failed
    #[error(transparent)]
    Callback(#[from] anyhow::Error),
}

impl DialogError {
    pub fn liveness(&self) -> Option<LivenessFailure> {
        match self {
            DialogError::Superseded { .. } => Some(LivenessFailure::Superseded),
            DialogError::Abandoned { .. } => Some(LivenessFailure::Abandoned),
            DialogError::Callback(_) => None,
        }
    }

    pub(crate) fn unresolved(failure: LivenessFailure, request_id: Uuid) -> Self {
        match failure {
            LivenessFailure::Superseded => DialogError::Superseded { request_id },
            LivenessFailure::Abandoned => DialogError::Abandoned { request_id },
        }
    }
}
