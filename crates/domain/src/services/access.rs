//! Ownership and access-control decisions.
//!
//! Pure functions: callers load whatever context is needed (actor role,
//! enterprise memberships, device ownership) and the decision itself does no
//! I/O. Authorization failures surface as `Forbidden` at the boundary.

use uuid::Uuid;

use crate::models::user::Role;

/// Capabilities granted by a global role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Read and mutate any device regardless of ownership.
    ManageAnyDevice,
    /// List and edit user accounts (subject to the role hierarchy).
    ManageUsers,
    /// Create enterprises and manage their memberships.
    ManageEnterprises,
    /// Unfiltered device listing (the admin dashboard path).
    ViewAllDevices,
}

/// Permission set for each role, resolved through one lookup.
pub fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::Owner => &[
            Permission::ManageAnyDevice,
            Permission::ManageUsers,
            Permission::ManageEnterprises,
            Permission::ViewAllDevices,
        ],
        Role::Admin => &[
            Permission::ManageAnyDevice,
            Permission::ManageUsers,
            Permission::ViewAllDevices,
        ],
        Role::User => &[],
    }
}

/// True when the role's permission set contains `permission`.
pub fn has_permission(role: Role, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

/// The acting principal plus the enterprise scopes where it holds an
/// admin-equivalent membership.
#[derive(Debug, Clone)]
pub struct AccessScope {
    pub user_id: Uuid,
    pub role: Role,
    /// Enterprises where the actor is an enabled ADMIN member.
    pub admin_enterprise_ids: Vec<Uuid>,
}

impl AccessScope {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self {
            user_id,
            role,
            admin_enterprise_ids: Vec::new(),
        }
    }

    pub fn with_admin_enterprises(mut self, ids: Vec<Uuid>) -> Self {
        self.admin_enterprise_ids = ids;
        self
    }
}

/// Whether the actor may read or mutate a device.
///
/// Rules, in order:
/// - owners access their own devices;
/// - globally privileged roles access any device;
/// - an enterprise ADMIN accesses devices owned by members of that enterprise.
///
/// `owner_enterprise_ids` are the enterprises the device owner is an enabled
/// member of.
pub fn can_access_device(
    scope: &AccessScope,
    owner_user_id: Uuid,
    owner_enterprise_ids: &[Uuid],
) -> bool {
    if scope.user_id == owner_user_id {
        return true;
    }
    if has_permission(scope.role, Permission::ManageAnyDevice) {
        return true;
    }
    shares_admin_enterprise(scope, owner_enterprise_ids)
}

/// Whether `actor_role` may edit an account holding `target_role`.
///
/// Strictly-higher rank is required: peers cannot edit peers.
pub fn can_edit_user(actor_role: Role, target_role: Role) -> bool {
    actor_role.rank() > target_role.rank()
}

/// Whether the actor may view an account's profile.
///
/// Everyone reads their own profile; user managers read any; an enterprise
/// ADMIN reads the accounts of that enterprise's members.
pub fn can_view_user(
    scope: &AccessScope,
    target_id: Uuid,
    target_enterprise_ids: &[Uuid],
) -> bool {
    if scope.user_id == target_id || has_permission(scope.role, Permission::ManageUsers) {
        return true;
    }
    shares_admin_enterprise(scope, target_enterprise_ids)
}

/// Whether the actor may edit an account.
///
/// Globally, edits require `ManageUsers` plus a strictly higher rank. Within
/// an enterprise the actor administers, member accounts are editable as long
/// as the target does not hold a higher global rank than the actor.
pub fn can_manage_user(
    scope: &AccessScope,
    target_role: Role,
    target_enterprise_ids: &[Uuid],
) -> bool {
    if has_permission(scope.role, Permission::ManageUsers)
        && can_edit_user(scope.role, target_role)
    {
        return true;
    }
    target_role.rank() <= scope.role.rank()
        && shares_admin_enterprise(scope, target_enterprise_ids)
}

fn shares_admin_enterprise(scope: &AccessScope, enterprise_ids: &[Uuid]) -> bool {
    scope
        .admin_enterprise_ids
        .iter()
        .any(|id| enterprise_ids.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_accesses_own_device() {
        let user_id = Uuid::new_v4();
        let scope = AccessScope::new(user_id, Role::User);
        assert!(can_access_device(&scope, user_id, &[]));
    }

    #[test]
    fn test_plain_user_cannot_access_others_device() {
        let scope = AccessScope::new(Uuid::new_v4(), Role::User);
        assert!(!can_access_device(&scope, Uuid::new_v4(), &[]));
    }

    #[test]
    fn test_global_admin_accesses_any_device() {
        let scope = AccessScope::new(Uuid::new_v4(), Role::Admin);
        assert!(can_access_device(&scope, Uuid::new_v4(), &[]));
    }

    #[test]
    fn test_enterprise_admin_accesses_member_device() {
        let enterprise = Uuid::new_v4();
        let scope = AccessScope::new(Uuid::new_v4(), Role::User)
            .with_admin_enterprises(vec![enterprise]);

        // Device owner belongs to the same enterprise.
        assert!(can_access_device(&scope, Uuid::new_v4(), &[enterprise]));

        // Device owner belongs to a different enterprise.
        assert!(!can_access_device(&scope, Uuid::new_v4(), &[Uuid::new_v4()]));
    }

    #[test]
    fn test_edit_requires_strictly_higher_rank() {
        assert!(can_edit_user(Role::Owner, Role::Admin));
        assert!(can_edit_user(Role::Owner, Role::User));
        assert!(can_edit_user(Role::Admin, Role::User));

        // Peers cannot edit peers.
        assert!(!can_edit_user(Role::Admin, Role::Admin));
        assert!(!can_edit_user(Role::User, Role::User));
        assert!(!can_edit_user(Role::Owner, Role::Owner));

        // Lower never edits higher.
        assert!(!can_edit_user(Role::User, Role::Admin));
        assert!(!can_edit_user(Role::Admin, Role::Owner));
    }

    #[test]
    fn test_enterprise_admin_views_member_profile() {
        let enterprise = Uuid::new_v4();
        let scope = AccessScope::new(Uuid::new_v4(), Role::User)
            .with_admin_enterprises(vec![enterprise]);

        assert!(can_view_user(&scope, Uuid::new_v4(), &[enterprise]));
        assert!(!can_view_user(&scope, Uuid::new_v4(), &[Uuid::new_v4()]));

        // Without an admin membership nothing opens up.
        let plain = AccessScope::new(Uuid::new_v4(), Role::User);
        assert!(!can_view_user(&plain, Uuid::new_v4(), &[enterprise]));
    }

    #[test]
    fn test_enterprise_admin_manages_member_account() {
        let enterprise = Uuid::new_v4();
        let scope = AccessScope::new(Uuid::new_v4(), Role::User)
            .with_admin_enterprises(vec![enterprise]);

        // Same-rank member of the administered enterprise.
        assert!(can_manage_user(&scope, Role::User, &[enterprise]));

        // A member with a higher global rank stays out of reach.
        assert!(!can_manage_user(&scope, Role::Admin, &[enterprise]));

        // Members of other enterprises are not covered.
        assert!(!can_manage_user(&scope, Role::User, &[Uuid::new_v4()]));
    }

    #[test]
    fn test_global_hierarchy_still_applies_to_manage() {
        let scope = AccessScope::new(Uuid::new_v4(), Role::Admin);
        assert!(can_manage_user(&scope, Role::User, &[]));
        assert!(!can_manage_user(&scope, Role::Admin, &[]));
        assert!(!can_manage_user(&scope, Role::Owner, &[]));
    }

    #[test]
    fn test_permission_sets() {
        assert!(has_permission(Role::Owner, Permission::ManageEnterprises));
        assert!(has_permission(Role::Admin, Permission::ViewAllDevices));
        assert!(!has_permission(Role::Admin, Permission::ManageEnterprises));
        assert!(!has_permission(Role::User, Permission::ViewAllDevices));
        assert!(permissions_for(Role::User).is_empty());
    }
}
