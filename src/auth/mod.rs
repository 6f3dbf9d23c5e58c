//! Authentication state handed to the API handlers
//!
//! Session management happens in the transport layer. It resolves each
//! request to an [`AuthState`] and passes it to the handlers, which only need
//! to know whether a user is signed in and which one.

use crate::models::UserId;
use serde::{Deserialize, Serialize};

/// Authentication state of one request
///
/// # Example
///
/// ```rust
/// use api_creator_sdk::auth::AuthState;
///
/// // Signed-in user
/// let state = AuthState::user(42);
/// assert_eq!(state.user_id(), Some(42));
///
/// // No session
/// let anonymous = AuthState::default();
/// assert!(!anonymous.is_authenticated());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AuthState {
    /// No valid session
    #[default]
    Anonymous,
    /// Session of a signed-in user
    Authenticated { user_id: UserId },
}

impl AuthState {
    /// State of a signed-in user
    pub fn user(user_id: UserId) -> Self {
        Self::Authenticated { user_id }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Id of the signed-in user, if any
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Authenticated { user_id } => Some(*user_id),
            Self::Anonymous => None,
        }
    }
}

impl From<Option<UserId>> for AuthState {
    fn from(user_id: Option<UserId>) -> Self {
        user_id.map_or(Self::Anonymous, Self::user)
    }
}
