//! Gateway-injected identity headers extractors.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use foodgram_domain::user::UserRole;
use foodgram_domain::viewer::Viewer;

pub const USER_ID_HEADER: &str = "x-foodgram-user-id";
pub const USER_ROLE_HEADER: &str = "x-foodgram-user-role";

/// User identity injected by the gateway via `x-foodgram-user-id` and `x-foodgram-user-role`.
///
/// Returns 401 if either header is absent or malformed.
/// Role enforcement (403) is done by handlers after extraction.
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
    pub user_role: u8,
}

impl IdentityHeaders {
    pub fn viewer(&self) -> Viewer {
        Viewer::User(self.user_id)
    }

    /// Unknown role values are treated as the least privileged role.
    pub fn role(&self) -> UserRole {
        UserRole::from_u8(self.user_role).unwrap_or(UserRole::Normal)
    }
}

/// Identity for endpoints that also serve anonymous viewers.
///
/// Absent `x-foodgram-user-id` means anonymous; a present but malformed
/// identity is still rejected with 401.
#[derive(Debug, Clone, Default)]
pub struct MaybeIdentity(pub Option<IdentityHeaders>);

impl MaybeIdentity {
    pub fn viewer(&self) -> Viewer {
        self.0
            .as_ref()
            .map_or(Viewer::Anonymous, IdentityHeaders::viewer)
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_identity(parts: &Parts) -> Result<IdentityHeaders, StatusCode> {
    let user_id = header(parts, USER_ID_HEADER)
        .and_then(|s| s.parse::<Uuid>().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let user_role = header(parts, USER_ROLE_HEADER)
        .and_then(|s| s.parse::<u8>().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(IdentityHeaders { user_id, user_role })
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Values are extracted synchronously so the returned future is 'static.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parse_identity(parts);
        async move { identity }
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = if parts.headers.contains_key(USER_ID_HEADER) {
            parse_identity(parts).map(|identity| Self(Some(identity)))
        } else {
            Ok(Self(None))
        };
        async move { identity }
    }
}
