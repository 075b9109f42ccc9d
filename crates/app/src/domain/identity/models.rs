//! Identity Models

use crate::uuids::TypedUuid;

/// Marker for customer identities.
#[derive(Debug, Clone, Copy)]
pub struct Customer;

/// Customer UUID
pub type CustomerUuid = TypedUuid<Customer>;

/// The identity attached to the current storefront session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// Browsing without an account.
    Guest,

    /// Signed-in customer.
    Customer(CustomerUuid),
}

impl Identity {
    /// The signed-in customer, if any.
    #[must_use]
    pub fn customer(&self) -> Option<CustomerUuid> {
        match self {
            Self::Customer(uuid) => Some(*uuid),
            Self::Guest => None,
        }
    }

    /// Whether the session is authenticated.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Customer(_))
    }
}
