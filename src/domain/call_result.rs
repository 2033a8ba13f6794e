use crate::error::{GatewayError, root_cause};
use serde::{Deserialize, Serialize};

/// Why a checkout call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorStatus {
    /// Transport failure before any gateway response.
    RequestNotSent,
    /// The gateway rejected the request at the protocol level.
    ResponseIndicatesInvalidRequest,
    /// The gateway replied with something that is not a checkout response.
    ResponseInvalid,
}

impl ErrorStatus {
    /// Classifies a fault by its category alone.
    pub fn classify(fault: &GatewayError) -> Self {
        match fault {
            GatewayError::Api(_) => Self::ResponseIndicatesInvalidRequest,
            GatewayError::Transport(_) => Self::RequestNotSent,
            GatewayError::Decode(_) => Self::ResponseInvalid,
        }
    }
}

/// The failing half of a [`CallResult`].
#[derive(Debug)]
pub struct FailedCall {
    pub status: ErrorStatus,
    /// Message of the innermost error in the fault's cause chain.
    pub root_cause: String,
    pub fault: GatewayError,
}

/// Outcome of one checkout API call.
///
/// Every call returns one of these; gateway faults are carried as data and
/// never propagated.
#[derive(Debug)]
pub enum CallResult<T> {
    Successful { response: T, duration_ms: u64 },
    Failed(FailedCall),
}

impl<T> CallResult<T> {
    pub fn successful(response: T, duration_ms: u64) -> Self {
        Self::Successful {
            response,
            duration_ms,
        }
    }

    pub fn failed(status: ErrorStatus, fault: GatewayError) -> Self {
        let root_cause = root_cause(&fault).to_string();
        Self::Failed(FailedCall {
            status,
            root_cause,
            fault,
        })
    }

    /// Builds a failed result whose status is derived from the fault.
    pub fn from_fault(fault: GatewayError) -> Self {
        Self::failed(ErrorStatus::classify(&fault), fault)
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Successful { .. })
    }

    pub fn response(&self) -> Option<&T> {
        match self {
            Self::Successful { response, .. } => Some(response),
            Self::Failed(_) => None,
        }
    }

    pub fn into_response(self) -> Option<T> {
        match self {
            Self::Successful { response, .. } => Some(response),
            Self::Failed(_) => None,
        }
    }

    pub fn duration_ms(&self) -> Option<u64> {
        match self {
            Self::Successful { duration_ms, .. } => Some(*duration_ms),
            Self::Failed(_) => None,
        }
    }

    pub fn error_status(&self) -> Option<ErrorStatus> {
        match self {
            Self::Successful { .. } => None,
            Self::Failed(failed) => Some(failed.status),
        }
    }

    pub fn exception_message(&self) -> Option<&str> {
        match self {
            Self::Successful { .. } => None,
            Self::Failed(failed) => Some(&failed.root_cause),
        }
    }

    /// True when the gateway replied with a response we could decode.
    pub fn received_well_formed_response(&self) -> bool {
        self.is_successful()
    }
}
