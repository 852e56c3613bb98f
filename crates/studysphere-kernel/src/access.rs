//! Access-control predicate.
//!
//! Decides whether a user may create, rename, delete, or upload in a
//! directory. Pure and cheap; the browser calls it fresh before every
//! mutating store call rather than caching a result per path.

use studysphere_types::{Role, User, VirtualPath};

use crate::zones::{Zone, ZoneTable};

/// Whether `user` may mutate entries directly inside `path`.
///
/// - admins: everywhere
/// - teachers: only inside `teachers/<own name>`
/// - students, pending users, nobody: never
pub fn can_manage(zones: &ZoneTable, user: Option<&User>, path: &VirtualPath) -> bool {
    let Some(user) = user else {
        return false;
    };

    match (user.role, zones.classify(path)) {
        (Role::Admin, _) => true,
        (Role::Teacher, Zone::Teacher(owner)) => owner == user.zone_name(),
        (Role::Teacher, Zone::Root | Zone::Admin | Zone::TeachersIndex | Zone::Shared) => false,
        (Role::Student | Role::Pending, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studysphere_types::UserId;

    fn user(name: &str, role: Role) -> User {
        User::new(UserId::new(), name, role)
    }

    fn check(u: Option<&User>, path: &str) -> bool {
        can_manage(&ZoneTable::default(), u, &VirtualPath::parse(path))
    }

    #[test]
    fn test_absent_user_and_students_never_manage() {
        let student = user("kid", Role::Student);
        let pending = user("new", Role::Pending);
        for path in [".", "admin", "teachers", "teachers/kid", "teachers/kid/x", "misc"] {
            assert!(!check(None, path), "nobody @ {path}");
            assert!(!check(Some(&student), path), "student @ {path}");
            assert!(!check(Some(&pending), path), "pending @ {path}");
        }
    }

    #[test]
    fn test_admin_manages_everywhere() {
        let admin = user("root", Role::Admin);
        for path in [".", "admin", "teachers/amy/notes", "misc"] {
            assert!(check(Some(&admin), path), "admin @ {path}");
        }
    }

    #[test]
    fn test_teacher_own_zone_only() {
        let t = user("T", Role::Teacher);
        assert!(check(Some(&t), "teachers/T"));
        assert!(check(Some(&t), "teachers/T/anything"));
        assert!(!check(Some(&t), "admin"));
        assert!(!check(Some(&t), "admin/teachers/T"));
        assert!(!check(Some(&t), "."));
        assert!(!check(Some(&t), "teachers"));
        assert!(!check(Some(&t), "teachers/Other"));
        assert!(!check(Some(&t), "teachers/TT"));
        assert!(!check(Some(&t), "misc/teachers/T"));
    }

    #[test]
    fn test_nameless_teacher_uses_unknown_zone() {
        let t = user("", Role::Teacher);
        assert!(check(Some(&t), "teachers/unknown"));
    }
}
