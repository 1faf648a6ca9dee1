//! Cached "has access" flag for the generation services.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Shared flag recording whether the current credentials may call the
/// paid generation models.
///
/// Permission failures revoke it; the caller re-authorizes by calling
/// [`ApiAccess::grant`] after selecting a key.
///
/// # Examples
///
/// ```
/// use storyboard_interface::ApiAccess;
///
/// let access = ApiAccess::granted();
/// let shared = access.clone();
/// shared.revoke("403 from image model");
/// assert!(!access.has_access());
/// access.grant();
/// assert!(shared.has_access());
/// ```
#[derive(Debug, Clone)]
pub struct ApiAccess(Arc<AtomicBool>);

impl ApiAccess {
    /// A flag that starts granted.
    pub fn granted() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Whether access is currently believed valid.
    pub fn has_access(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark access as valid again.
    pub fn grant(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Drop cached access, forcing re-authorization.
    pub fn revoke(&self, reason: &str) {
        if self.0.swap(false, Ordering::AcqRel) {
            warn!(reason, "Revoking cached API access");
        }
    }
}

impl Default for ApiAccess {
    fn default() -> Self {
        Self::granted()
    }
}
