//! Typed identifiers for auth entities.

use kernel::id::Id;

pub struct UserMarker;
pub struct RoleMarker;
pub struct RecoveryTokenMarker;

pub type UserId = Id<UserMarker>;
pub type RoleId = Id<RoleMarker>;
pub type RecoveryTokenId = Id<RecoveryTokenMarker>;
