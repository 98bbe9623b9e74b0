use thiserror::Error;
use uuid::Uuid;

/// Everything that can go wrong operating on flats.
///
/// All of these are recoverable and surface to the caller as user
/// feedback; none of them abort anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlatError {
    #[error("a flat named '{0}' already exists")]
    DuplicateName(String),

    #[error("no flat named '{0}'")]
    NotFound(String),

    /// The candidate area intersects an existing one. Carries the
    /// conflicting flat's name and area string for user feedback.
    #[error("area intersects flat '{flat}' at {area}")]
    Overlap { flat: String, area: String },

    /// Malformed area string, or one referring to an unknown world.
    #[error("invalid area string '{0}'")]
    InvalidFormat(String),

    #[error("only the owner of this flat may do that")]
    NotOwner,

    #[error("flat is already owned by {owner}")]
    AlreadyOwned { owner: Uuid },

    #[error("flat is already yours")]
    AlreadyYours,

    #[error("{0} is already trusted here")]
    AlreadyTrusted(Uuid),

    #[error("{0} is not trusted here")]
    NotTrusted(Uuid),

    #[error("the owner does not need to be trusted")]
    CannotTrustOwner,
}
