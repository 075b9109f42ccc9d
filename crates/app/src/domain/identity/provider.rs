//! Identity provider boundary.

use async_trait::async_trait;
use mockall::automock;

use crate::domain::identity::models::Identity;

#[automock]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the identity attached to the current session.
    async fn current(&self) -> Identity;
}

/// Identity provider that always reports the same identity.
///
/// Used by the CLI and by tests, where the session identity is fixed up
/// front rather than resolved from a session token.
#[derive(Debug, Clone)]
pub struct FixedIdentityProvider {
    identity: Identity,
}

impl FixedIdentityProvider {
    #[must_use]
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl IdentityProvider for FixedIdentityProvider {
    async fn current(&self) -> Identity {
        self.identity
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::domain::identity::models::CustomerUuid;

    use super::*;

    #[tokio::test]
    async fn fixed_provider_returns_its_identity() {
        let uuid = CustomerUuid::from_uuid(Uuid::now_v7());
        let provider = FixedIdentityProvider::new(Identity::Customer(uuid));

        assert_eq!(provider.current().await, Identity::Customer(uuid));
    }
}
