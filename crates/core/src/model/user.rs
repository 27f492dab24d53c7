/// Entitlement context for the user driving a session.
///
/// Passed explicitly into selection and session services instead of living
/// as process-wide state, so concurrent sessions and tests cannot interfere
/// with each other's tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserContext {
    pub is_pro: bool,
}

impl UserContext {
    /// Free-tier user.
    #[must_use]
    pub fn free() -> Self {
        Self { is_pro: false }
    }

    /// Paid-tier user with access to the full bank and mock exams.
    #[must_use]
    pub fn pro() -> Self {
        Self { is_pro: true }
    }
}
