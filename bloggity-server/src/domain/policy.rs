//! Ownership rules for posts, comments and users.
//!
//! Every check is a plain function over the actor, the kind of access and,
//! when the resource is already loaded, its owner. Handlers call the
//! collection-level checks before anything is loaded; services call the
//! instance-level checks once the row is in hand.

use super::error::DomainError;

/// Identity attached to a request after token resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Actor {
    Anonymous,
    User(i64),
}

impl Actor {
    pub(crate) fn user_id(self) -> Option<i64> {
        match self {
            Actor::Anonymous => None,
            Actor::User(id) => Some(id),
        }
    }

    /// Resolved user id, or `Unauthorized` for an anonymous actor.
    pub(crate) fn require_user(self) -> Result<i64, DomainError> {
        self.user_id().ok_or(DomainError::Unauthorized)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Read,
    Create,
    Update,
    Delete,
}

impl Access {
    pub(crate) fn is_read_only(self) -> bool {
        matches!(self, Access::Read)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Denial {
    /// No identity could be resolved.
    Unauthorized,
    /// Identity resolved, but it does not own the resource.
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub(crate) fn into_result(self) -> Result<(), DomainError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(Denial::Unauthorized) => Err(DomainError::Unauthorized),
            Decision::Deny(Denial::Forbidden) => Err(DomainError::Forbidden),
        }
    }
}

/// Coarse pre-screen for any write: reads pass, writes need an identity.
pub(crate) fn identity_required(actor: Actor, access: Access) -> Decision {
    if access.is_read_only() || actor.user_id().is_some() {
        Decision::Allow
    } else {
        Decision::Deny(Denial::Unauthorized)
    }
}

/// Collection-level check for authored resources (posts, comments).
///
/// `declared_author` is the `author_id` carried by the payload, if any.
/// Update and delete are only pre-screened for identity here; ownership is
/// decided by [`authored_instance_access`] once the row is loaded.
pub(crate) fn authored_collection_access(
    actor: Actor,
    access: Access,
    declared_author: Option<i64>,
) -> Decision {
    if access.is_read_only() {
        return Decision::Allow;
    }

    let Some(actor_id) = actor.user_id() else {
        return Decision::Deny(Denial::Unauthorized);
    };

    match declared_author {
        Some(author_id) if author_id != actor_id => Decision::Deny(Denial::Forbidden),
        _ => Decision::Allow,
    }
}

/// Instance-level check for authored resources (posts, comments).
pub(crate) fn authored_instance_access(actor: Actor, access: Access, author_id: i64) -> Decision {
    if access.is_read_only() {
        return Decision::Allow;
    }

    match actor.user_id() {
        None => Decision::Deny(Denial::Unauthorized),
        Some(actor_id) if actor_id == author_id => Decision::Allow,
        Some(_) => Decision::Deny(Denial::Forbidden),
    }
}

/// Instance-level check for user records: anyone reads, only the user
/// themself writes.
pub(crate) fn user_instance_access(actor: Actor, access: Access, target_user_id: i64) -> Decision {
    if access.is_read_only() {
        return Decision::Allow;
    }

    match actor.user_id() {
        None => Decision::Deny(Denial::Unauthorized),
        Some(actor_id) if actor_id == target_user_id => Decision::Allow,
        Some(_) => Decision::Deny(Denial::Forbidden),
    }
}
