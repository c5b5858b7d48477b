use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Trust level of a caller, established by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerKind {
    /// Unauthenticated caller of the public event and read surface.
    Public,
    /// Trusted internal caller such as the orchestration engine or its actions.
    Internal,
}

/// Pre-validated identity of the caller of a ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    subject: String,
    kind: CallerKind,
}

impl CallerIdentity {
    /// Creates an identity for a public caller.
    #[must_use]
    pub fn public(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            kind: CallerKind::Public,
        }
    }

    /// Creates an identity for a trusted internal caller.
    #[must_use]
    pub fn internal(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            kind: CallerKind::Internal,
        }
    }

    /// Returns the caller subject used in logs.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the caller trust level.
    #[must_use]
    pub fn kind(&self) -> CallerKind {
        self.kind
    }

    /// Fails unless the caller is a trusted internal caller.
    pub fn require_internal(&self) -> AppResult<()> {
        match self.kind {
            CallerKind::Internal => Ok(()),
            CallerKind::Public => Err(AppError::Forbidden(format!(
                "caller '{}' is not allowed to use internal ledger operations",
                self.subject
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CallerIdentity;
    use crate::AppError;

    #[test]
    fn public_caller_is_rejected_for_internal_operations() {
        let caller = CallerIdentity::public("browser");
        assert!(matches!(
            caller.require_internal(),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn internal_caller_is_accepted() {
        let caller = CallerIdentity::internal("orchestrator");
        assert!(caller.require_internal().is_ok());
    }
}
