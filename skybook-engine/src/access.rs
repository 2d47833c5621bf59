use skybook_core::error::EngineError;
use skybook_shared::Session;

/// Capability gate in front of every admin operation. The role rides on
/// the authenticated session; there is no duck-typed fallback.
pub fn require_admin(session: &Session) -> Result<(), EngineError> {
    if session.is_admin() {
        Ok(())
    } else {
        Err(EngineError::Forbidden)
    }
}
