//! Role-path resolver.
//!
//! Maps `(user, current path, file name)` to the key a new object is written
//! to. Writes at the root are redirected into the writer's own zone; writes
//! anywhere else land where the user is standing.
//!
//! The resolver does not enforce anything: a teacher standing in the admin
//! zone still gets an admin-zone key back. [`can_manage`](crate::access::can_manage)
//! is the gate, and every caller must check it before using the key.

use studysphere_types::{Role, User, VirtualPath};

use crate::zones::ZoneTable;

/// Directory a write from `current` lands in.
pub fn target_dir(zones: &ZoneTable, user: Option<&User>, current: &VirtualPath) -> VirtualPath {
    match user {
        Some(u) if current.is_root() => match u.role {
            Role::Admin => zones.admin_root(),
            Role::Teacher => zones.teacher_root(u.zone_name()),
            Role::Student | Role::Pending => current.clone(),
        },
        _ => current.clone(),
    }
}

/// Storage key for a write from `current`.
///
/// With a `file_name`, that name is the last segment; without one, the
/// directory key itself is returned.
pub fn resolve_target(
    zones: &ZoneTable,
    user: Option<&User>,
    current: &VirtualPath,
    file_name: Option<&str>,
) -> String {
    let dir = target_dir(zones, user, current);
    match file_name {
        Some(name) => dir.key_for(name),
        None => dir.key(),
    }
}
