//! Moderation decision model shared by the local layer and the pipeline.

/// Why a decision came out the way it did. Logged and counted, never shown
/// to the end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonCode {
    Clean,
    EmptyContent,
    PiiDetected,
    BlocklistedTerm,
    HeuristicMatch,
    ClassifierFlagged,
    ToxicityFlagged,
    ServiceUnavailable,
}

/// Generic sentence for content rejections. Never names the rule or term
/// that matched.
pub const USER_MESSAGE_REJECTED: &str =
    "This message can't be posted right now. Please review the community guidelines and try again.";

/// Generic sentence for dependency failures.
pub const USER_MESSAGE_SERVICE: &str =
    "We couldn't check this message right now. Please try again in a moment.";

/// The one decision the pipeline hands back to its caller.
///
/// Constructed through the three factory functions below; fields are
/// private so a `service_error` decision can never carry `allowed = true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationDecision {
    allowed: bool,
    reason: ReasonCode,
    user_message: String,
    service_error: bool,
}

impl ModerationDecision {
    /// Content passed every layer.
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: ReasonCode::Clean,
            user_message: String::new(),
            service_error: false,
        }
    }

    /// Content violates a rule. User-correctable.
    pub fn reject_content(reason: ReasonCode) -> Self {
        Self {
            allowed: false,
            reason,
            user_message: USER_MESSAGE_REJECTED.to_string(),
            service_error: false,
        }
    }

    /// A dependency failed. Operator-correctable, never an approval.
    pub fn reject_service() -> Self {
        Self {
            allowed: false,
            reason: ReasonCode::ServiceUnavailable,
            user_message: USER_MESSAGE_SERVICE.to_string(),
            service_error: true,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub fn reason(&self) -> ReasonCode {
        self.reason
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn is_service_error(&self) -> bool {
        self.service_error
    }
}
