use super::permission::{Permission, PermissionSet};

/// True if `granted` holds any of `required`. Admin satisfies every requirement.
pub fn grants(granted: &PermissionSet, required: &[Permission]) -> bool {
    granted.contains(&Permission::Admin) || required.iter().any(|p| granted.contains(p))
}
