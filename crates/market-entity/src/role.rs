//! Role entity and capability flags.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// A named bundle of capability flags attached to accounts.
///
/// Roles are immutable from the authorization path's perspective; only
/// the administrative handlers create or update them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// Role name (e.g. `"unverified"`, `"verified"`).
    pub name: String,
    /// May read catalog and account data.
    pub can_view: bool,
    /// May create records.
    pub can_add: bool,
    /// May modify records.
    pub can_edit: bool,
    /// May delete records.
    pub can_delete: bool,
    /// May purchase products.
    pub can_purchase: bool,
    /// May manage a wishlist.
    pub can_wishlist: bool,
    /// Administrative role; satisfies every capability.
    pub is_admin: bool,
    /// Marketplace owner role.
    pub is_owner: bool,
    /// Deprecated roles are excluded from authorization.
    pub deprecated: bool,
}

/// A single capability a route can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Read access.
    View,
    /// Create access.
    Add,
    /// Modify access.
    Edit,
    /// Delete access.
    Delete,
    /// Checkout/purchase access.
    Purchase,
    /// Wishlist access.
    Wishlist,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::View => "view",
            Self::Add => "add",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Purchase => "purchase",
            Self::Wishlist => "wishlist",
        };
        write!(f, "{s}")
    }
}

impl Role {
    /// Whether this role satisfies the given capability.
    ///
    /// Admin roles satisfy every capability.
    pub fn allows(&self, capability: Capability) -> bool {
        if self.is_admin {
            return true;
        }
        match capability {
            Capability::View => self.can_view,
            Capability::Add => self.can_add,
            Capability::Edit => self.can_edit,
            Capability::Delete => self.can_delete,
            Capability::Purchase => self.can_purchase,
            Capability::Wishlist => self.can_wishlist,
        }
    }

    /// Whether this role satisfies all of the given capabilities.
    pub fn allows_all(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().all(|c| self.allows(*c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer() -> Role {
        Role {
            id: Uuid::new_v4(),
            name: "unverified".to_string(),
            can_view: true,
            can_add: false,
            can_edit: false,
            can_delete: false,
            can_purchase: false,
            can_wishlist: false,
            is_admin: false,
            is_owner: false,
            deprecated: false,
        }
    }

    #[test]
    fn test_flags_gate_capabilities() {
        let role = viewer();
        assert!(role.allows(Capability::View));
        assert!(!role.allows(Capability::Edit));
        assert!(!role.allows(Capability::Purchase));
    }

    #[test]
    fn test_admin_satisfies_everything() {
        let role = Role {
            is_admin: true,
            ..viewer()
        };
        assert!(role.allows_all(&[
            Capability::View,
            Capability::Add,
            Capability::Edit,
            Capability::Delete,
            Capability::Purchase,
            Capability::Wishlist,
        ]));
    }

    #[test]
    fn test_allows_all_requires_every_flag() {
        let role = viewer();
        assert!(role.allows_all(&[Capability::View]));
        assert!(!role.allows_all(&[Capability::View, Capability::Edit]));
        assert!(role.allows_all(&[]));
    }
}
