//! The identity a read or write is performed on behalf of.

use uuid::Uuid;

/// Viewer of a projection: either an authenticated user or anonymous.
///
/// Passed explicitly to every projection and membership query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    User(Uuid),
}

impl Viewer {
    pub fn user_id(self) -> Option<Uuid> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(id),
        }
    }

    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::User(_))
    }
}

impl From<Option<Uuid>> for Viewer {
    fn from(id: Option<Uuid>) -> Self {
        id.map_or(Self::Anonymous, Self::User)
    }
}
