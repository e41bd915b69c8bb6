use log::error;
use serde::Serialize;

use crate::GymError;

pub const INTERNAL_ERROR_KIND: &str = "InternalError";
pub const INTERNAL_ERROR_MESSAGE: &str = "internal system error";
pub const SUCCESS_MESSAGE: &str = "operation successful";

/// Uniform result of an operation as seen by callers of the API.
///
/// Serialises to `{"error": false, "result": ..., "message": ...}` on success and to
/// `{"error": true, "kind": ..., "message": ...}` on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    pub message: String,
}

impl<T> Envelope<T> {
    pub fn success(result: T, message: impl Into<String>) -> Self {
        Self {
            error: false,
            kind: None,
            result: Some(result),
            message: message.into(),
        }
    }

    pub fn failure(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: true,
            kind: Some(kind.into()),
            result: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Replace the message of a successful envelope.
    #[must_use]
    pub fn with_message(mut self, message: impl FnOnce(&T) -> String) -> Self {
        if let Some(result) = &self.result {
            self.message = message(result);
        }
        self
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            error: self.error,
            kind: self.kind,
            result: self.result.map(f),
            message: self.message,
        }
    }
}

/// Run an operation and convert its outcome into an envelope.
///
/// Domain errors are reported with their kind and message. Any other error is logged as critical
/// and reported without details.
pub fn guard<T>(operation: impl FnOnce() -> anyhow::Result<T>) -> Envelope<T> {
    match operation() {
        Ok(result) => Envelope::success(result, SUCCESS_MESSAGE),
        Err(err) => match err.downcast::<GymError>() {
            Ok(err) => {
                error!("{}: {err}", err.name());
                Envelope::failure(err.name(), err.to_string())
            }
            Err(err) => {
                error!("critical: unexpected error: {err:#}");
                Envelope::failure(INTERNAL_ERROR_KIND, INTERNAL_ERROR_MESSAGE)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{ErrorKind, MemberID};

    #[test]
    fn test_guard_success() {
        let envelope = guard(|| Ok(42));
        assert_eq!(envelope, Envelope::success(42, SUCCESS_MESSAGE));
        assert!(!envelope.is_error());
    }

    #[test]
    fn test_guard_domain_error() {
        let envelope: Envelope<()> = guard(|| {
            Err(GymError::from(ErrorKind::MemberNotFound(MemberID::new("U001").unwrap())).into())
        });
        assert_eq!(
            envelope,
            Envelope::failure("MemberNotFound", "member with ID U001 not found")
        );
        assert!(envelope.is_error());
    }

    #[test]
    fn test_guard_unexpected_error() {
        let envelope: Envelope<()> = guard(|| Err(anyhow::anyhow!("disk on fire")));
        assert_eq!(
            envelope,
            Envelope::failure(INTERNAL_ERROR_KIND, INTERNAL_ERROR_MESSAGE)
        );
    }

    #[test]
    fn test_with_message() {
        assert_eq!(
            Envelope::success(2, SUCCESS_MESSAGE)
                .with_message(|n| format!("{n} members"))
                .message,
            "2 members"
        );
        assert_eq!(
            Envelope::<u8>::failure("Report", "bad month")
                .with_message(|n| format!("{n} members"))
                .message,
            "bad month"
        );
    }

    #[test]
    fn test_map() {
        assert_eq!(
            Envelope::success(2, "ok").map(|n| n * 10),
            Envelope::success(20, "ok")
        );
        assert_eq!(
            Envelope::<u8>::failure("Report", "bad month").map(|n| n * 10),
            Envelope::<u8>::failure("Report", "bad month")
        );
    }

    #[test]
    fn test_serialize() {
        assert_eq!(
            serde_json::to_value(Envelope::success("U001", "member registered")).unwrap(),
            json!({"error": false, "result": "U001", "message": "member registered"})
        );
        assert_eq!(
            serde_json::to_value(Envelope::<()>::failure(
                "DuplicateMember",
                "member with ID U001 is already registered"
            ))
            .unwrap(),
            json!({
                "error": true,
                "kind": "DuplicateMember",
                "message": "member with ID U001 is already registered"
            })
        );
    }
}
