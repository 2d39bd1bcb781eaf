//! Security Manager
//!
//! Request validation at the kernel boundary. Deliberately thin: the kernel
//! has no user-facing auth of its own (that lives at the deployment edge),
//! but every dispatch passes through request id policy enforced here.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::Manager;

/// Longest request id the kernel will echo back.
const MAX_REQUEST_ID_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("request id exceeds {MAX_REQUEST_ID_LEN} characters")]
    RequestIdTooLong,

    #[error("request id contains characters outside [A-Za-z0-9._:-]")]
    RequestIdInvalid,
}

/// Enforces request id policy and anchors the start of the manager chain.
pub struct SecurityManager;

impl SecurityManager {
    pub fn new() -> Self {
        Self
    }

    /// Validate a caller-supplied request id, or mint one when absent.
    ///
    /// Request ids are echoed into logs and response envelopes, so they are
    /// restricted to a safe character set and bounded length.
    pub fn ensure_request_id(&self, supplied: Option<String>) -> Result<String, SecurityError> {
        match supplied {
            None => Ok(Uuid::new_v4().to_string()),
            Some(id) if id.is_empty() => Ok(Uuid::new_v4().to_string()),
            Some(id) => {
                if id.len() > MAX_REQUEST_ID_LEN {
                    return Err(SecurityError::RequestIdTooLong);
                }
                if !id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
                {
                    return Err(SecurityError::RequestIdInvalid);
                }
                Ok(id)
            }
        }
    }
}

impl Default for SecurityManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Manager for SecurityManager {
    fn name(&self) -> &'static str {
        "security"
    }

    async fn start(&self) -> anyhow::Result<()> {
        tracing::info!("Security manager started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!("Security manager stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplied_id_echoed() {
        let security = SecurityManager::new();
        let id = security
            .ensure_request_id(Some("req-1.2:abc_DEF".into()))
            .unwrap();
        assert_eq!(id, "req-1.2:abc_DEF");
    }

    #[test]
    fn test_missing_or_empty_id_generated() {
        let security = SecurityManager::new();
        let generated = security.ensure_request_id(None).unwrap();
        assert!(Uuid::parse_str(&generated).is_ok());

        let generated = security.ensure_request_id(Some(String::new())).unwrap();
        assert!(Uuid::parse_str(&generated).is_ok());
    }

    #[test]
    fn test_invalid_ids_rejected() {
        let security = SecurityManager::new();
        assert!(matches!(
            security.ensure_request_id(Some("bad id with spaces".into())),
            Err(SecurityError::RequestIdInvalid)
        ));
        assert!(matches!(
            security.ensure_request_id(Some("x".repeat(200))),
            Err(SecurityError::RequestIdTooLong)
        ));
    }
}
