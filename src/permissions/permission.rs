use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A project-level permission.
///
/// Variants are declared in display order, so ordered collections of
/// permissions iterate the way the assignment list renders them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Admin,
    ViewProject,
    EditProject,
    DeleteProject,
    AddDocument,
    EditDocument,
    DeleteDocument,
    ManageApiKeys,
}

pub type PermissionSet = BTreeSet<Permission>;

impl Permission {
    pub const ALL: [Permission; 8] = [
        Permission::Admin,
        Permission::ViewProject,
        Permission::EditProject,
        Permission::DeleteProject,
        Permission::AddDocument,
        Permission::EditDocument,
        Permission::DeleteDocument,
        Permission::ManageApiKeys,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Admin => "admin",
            Permission::ViewProject => "view_project",
            Permission::EditProject => "edit_project",
            Permission::DeleteProject => "delete_project",
            Permission::AddDocument => "add_document",
            Permission::EditDocument => "edit_document",
            Permission::DeleteDocument => "delete_document",
            Permission::ManageApiKeys => "manage_api_keys",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Permission::Admin => "Has all permissions for the project",
            Permission::ViewProject => "Can view project details and content",
            Permission::EditProject => "Can edit project settings and metadata",
            Permission::DeleteProject => "Can delete the project",
            Permission::AddDocument => "Can add documents to the project",
            Permission::EditDocument => "Can edit documents in the project",
            Permission::DeleteDocument => "Can delete documents from the project",
            Permission::ManageApiKeys => "Can create and manage API keys for the project",
        }
    }

    /// System-level permissions apply to the whole project rather than one capability.
    pub fn is_system_level(&self) -> bool {
        matches!(self, Permission::Admin)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Permission::Admin)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

/// Every name that failed to parse, in input order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid permissions: {}", .0.join(", "))]
pub struct UnknownPermissions(pub Vec<String>);

/// Parse a list of wire names, collecting all unknown names instead of stopping at the first.
///
/// Duplicates collapse into the returned set.
pub fn parse_permissions<I, S>(names: I) -> Result<PermissionSet, UnknownPermissions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = PermissionSet::new();
    let mut unknown = Vec::new();

    for name in names {
        match name.as_ref().parse::<Permission>() {
            Ok(permission) => {
                parsed.insert(permission);
            }
            Err(UnknownPermission(name)) => {
                if !unknown.contains(&name) {
                    unknown.push(name);
                }
            }
        }
    }

    if unknown.is_empty() {
        Ok(parsed)
    } else {
        Err(UnknownPermissions(unknown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_serde_representation() {
        for permission in Permission::ALL {
            let json = serde_json::to_value(permission).unwrap();
            assert_eq!(json, serde_json::Value::String(permission.as_str().to_string()));
            assert_eq!(permission.as_str().parse::<Permission>(), Ok(permission));
        }
    }

    #[test]
    fn ordering_follows_display_order() {
        let set: PermissionSet = [
            Permission::ManageApiKeys,
            Permission::ViewProject,
            Permission::Admin,
        ]
        .into_iter()
        .collect();

        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(
            ordered,
            vec![Permission::Admin, Permission::ViewProject, Permission::ManageApiKeys]
        );
    }

    #[test]
    fn only_admin_is_system_level() {
        let system: Vec<_> = Permission::ALL.iter().filter(|p| p.is_system_level()).collect();
        assert_eq!(system, vec![&Permission::Admin]);
    }

    #[test]
    fn parse_reports_every_unknown_name() {
        let names = ["view_project", "view_projects", "owner", "owner"];
        let err = parse_permissions(names).unwrap_err();
        assert_eq!(err.0, vec!["view_projects".to_string(), "owner".to_string()]);
        assert_eq!(err.to_string(), "invalid permissions: view_projects, owner");
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert!("Admin".parse::<Permission>().is_err());
        assert!(" admin".parse::<Permission>().is_err());
    }

    #[test]
    fn parse_deduplicates() {
        let set = parse_permissions(["admin", "admin", "view_project"]).unwrap();
        assert_eq!(set.len(), 2);
    }
}
