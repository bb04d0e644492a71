//! Mock identity helpers for integration tests.
//!
//! Services behind the gateway receive `x-foodgram-user-id` + `x-foodgram-user-role`
//! headers. In tests, `MockAuth` produces these headers directly so no real
//! gateway is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use foodgram_auth_types::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use foodgram_domain::user::UserRole;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub user_role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, user_role: UserRole) -> Self {
        Self { user_id, user_role }
    }

    pub fn user() -> Self {
        Self::new(Uuid::now_v7(), UserRole::Normal)
    }

    pub fn admin() -> Self {
        Self::new(Uuid::now_v7(), UserRole::Admin)
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        );
        map.insert(
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from(u16::from(self.user_role.as_u8())),
        );
        map
    }
}
