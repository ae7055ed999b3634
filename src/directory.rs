//! Identity lookup seam.

use crate::error::Result;
use crate::session::Identity;
use async_trait::async_trait;

/// Resolves an authenticated identifier to its user record.
///
/// A real deployment backs this with a user store; the demo implementation
/// fabricates a static identity the way the reference backend does.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find(&self, identifier: &str) -> Result<Identity>;
}

/// Returns the static demo identity bound to whatever identifier asked.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoDirectory;

impl DemoDirectory {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UserDirectory for DemoDirectory {
    async fn find(&self, identifier: &str) -> Result<Identity> {
        Ok(Identity {
            id: 1,
            identifier: identifier.to_string(),
            name: "Demo User".to_string(),
        })
    }
}
