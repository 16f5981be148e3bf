//! Caller identity and roles.
//!
//! Authentication itself is an external collaborator; the HTTP layer turns
//! its claims into a [`Caller`] that is passed explicitly into the order
//! service. The core never re-derives roles from user records.

use common::UserId;
use serde::{Deserialize, Serialize};

/// Role attached to an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer: may place orders and read their own.
    Customer,

    /// Privileged role: may read all orders and mutate status fields.
    Admin,
}

impl Role {
    /// Parses a role from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(Role::Customer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Returns the role name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }

    /// Returns true if this role may see all orders and mutate status.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated caller: identity plus role claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub role: Role,
}

impl Caller {
    /// Creates a customer caller.
    pub fn customer(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Customer,
        }
    }

    /// Creates an admin caller.
    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }

    /// Returns true if the caller holds the privileged role.
    pub fn is_privileged(&self) -> bool {
        self.role.is_privileged()
    }
}
