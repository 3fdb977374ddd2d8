//! Capability table and the allow/deny decision for a request
//!
//! A capability is the pair of an [`Action`] and an [`EntityKind`], stored
//! as a `<action>_<entity>` codename such as `create_topping`.

use axum::http::Method;
use std::fmt;
use std::str::FromStr;

use super::Caller;
use crate::error::ApiError;

/// Resource type a capability applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Topping,
    Pizza,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Topping => "topping",
            EntityKind::Pizza => "pizza",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    View,
    Create,
    Change,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Change => "change",
            Action::Delete => "delete",
        }
    }

    /// Action required by an unsafe method
    ///
    /// Returns `None` for methods that carry no write semantics here.
    pub fn for_method(method: &Method) -> Option<Self> {
        match *method {
            Method::POST => Some(Action::Create),
            Method::PUT | Method::PATCH => Some(Action::Change),
            Method::DELETE => Some(Action::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capability {
    pub action: Action,
    pub entity: EntityKind,
}

impl Capability {
    pub const fn new(action: Action, entity: EntityKind) -> Self {
        Self { action, entity }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.action.as_str(), self.entity.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown capability '{0}'")]
pub struct UnknownCapability(pub String);

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (action, entity) = s
            .split_once('_')
            .ok_or_else(|| UnknownCapability(s.to_string()))?;

        let action = match action {
            "view" => Action::View,
            "create" => Action::Create,
            "change" => Action::Change,
            "delete" => Action::Delete,
            _ => return Err(UnknownCapability(s.to_string())),
        };
        let entity = match entity {
            "topping" => EntityKind::Topping,
            "pizza" => EntityKind::Pizza,
            _ => return Err(UnknownCapability(s.to_string())),
        };

        Ok(Capability::new(action, entity))
    }
}

/// GET, HEAD and OPTIONS never need credentials
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Capability a request must hold, or `None` for safe methods
pub fn required_capability(
    method: &Method,
    entity: EntityKind,
) -> Result<Option<Capability>, ApiError> {
    if is_safe_method(method) {
        return Ok(None);
    }

    let action = Action::for_method(method).ok_or_else(|| ApiError::MethodNotAllowed {
        method: method.clone(),
        allow: String::new(),
    })?;

    Ok(Some(Capability::new(action, entity)))
}

/// Decide whether `caller` may perform `method` on `entity`
///
/// # Errors
///
/// - `NotAuthenticated` for an anonymous caller on an unsafe method
/// - `PermissionDenied` for an authenticated caller lacking the capability
pub fn authorize(method: &Method, entity: EntityKind, caller: &Caller) -> Result<(), ApiError> {
    let Some(capability) = required_capability(method, entity)? else {
        return Ok(());
    };

    match caller {
        Caller::Anonymous => Err(ApiError::NotAuthenticated),
        Caller::User(user) if user.has(capability) => {
            tracing::debug!(user = %user.username, %capability, "Capability granted");
            Ok(())
        },
        Caller::User(user) => {
            tracing::info!(user = %user.username, %capability, "Capability missing");
            Err(ApiError::PermissionDenied)
        },
    }
}
