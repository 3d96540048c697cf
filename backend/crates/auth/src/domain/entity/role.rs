//! Role Entity
//!
//! Seeded reference data; read-only after construction.

use crate::domain::value_object::{ids::RoleId, role_name::RoleName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Role {
    id: RoleId,
    name: RoleName,
}

impl Role {
    pub fn new(id: RoleId, name: RoleName) -> Self {
        Self { id, name }
    }

    pub fn id(&self) -> RoleId {
        self.id
    }

    pub fn name(&self) -> RoleName {
        self.name
    }
}
