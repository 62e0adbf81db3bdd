//! Roles and capabilities
//!
//! Roles form a closed set. Display labels and capability sets are exhaustive
//! `match` tables, so adding a role fails to compile until every table
//! covers it.

use crate::error::RoleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ADMIN_CAPS: &[Capability] = &Capability::ALL;

const OPERATIONS_LEAD_CAPS: &[Capability] = &[
    Capability::ViewDashboard,
    Capability::CompleteChecklists,
    Capability::ViewReports,
    Capability::PrintReports,
    Capability::ManageChecklists,
    Capability::ManageBranches,
];

// Dispatcher and central kitchen share one set.
const LOGISTICS_CAPS: &[Capability] = &[
    Capability::ViewDashboard,
    Capability::CompleteChecklists,
    Capability::ViewReports,
];

const BRANCH_MANAGER_CAPS: &[Capability] = &[
    Capability::ViewDashboard,
    Capability::CompleteChecklists,
    Capability::ViewReports,
    Capability::PrintReports,
];

const BRANCH_STAFF_CAPS: &[Capability] = &[Capability::ViewDashboard, Capability::CompleteChecklists];

/// Authenticated user role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Oversees operations across branches
    OperationsLead,
    /// Coordinates deliveries between kitchen and branches
    Dispatcher,
    /// Central kitchen production staff
    CentralKitchen,
    /// Manager of a single branch
    BranchManager,
    /// Front-line branch staff
    BranchStaff,
}

impl Role {
    /// Every role, in privilege order
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::OperationsLead,
        Role::Dispatcher,
        Role::CentralKitchen,
        Role::BranchManager,
        Role::BranchStaff,
    ];

    /// Stable identifier used in storage keys and serialized state
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::OperationsLead => "operations_lead",
            Role::Dispatcher => "dispatcher",
            Role::CentralKitchen => "central_kitchen",
            Role::BranchManager => "branch_manager",
            Role::BranchStaff => "branch_staff",
        }
    }

    /// Human-readable label shown in the UI
    #[inline]
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::OperationsLead => "Operations Lead",
            Role::Dispatcher => "Dispatcher",
            Role::CentralKitchen => "Central Kitchen",
            Role::BranchManager => "Branch Manager",
            Role::BranchStaff => "Branch Staff",
        }
    }

    /// Capabilities granted to this role
    #[must_use]
    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Role::Admin => ADMIN_CAPS,
            Role::OperationsLead => OPERATIONS_LEAD_CAPS,
            Role::Dispatcher | Role::CentralKitchen => LOGISTICS_CAPS,
            Role::BranchManager => BRANCH_MANAGER_CAPS,
            Role::BranchStaff => BRANCH_STAFF_CAPS,
        }
    }

    /// Check if this role holds a capability
    #[inline]
    #[must_use]
    pub fn has(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| RoleError::InvalidRole(s.to_string()))
    }
}

/// Action gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// See the branch dashboard
    ViewDashboard,
    /// Tick off daily checklist items
    CompleteChecklists,
    /// Read KPI and operations reports
    ViewReports,
    /// Produce print-friendly reports
    PrintReports,
    /// Edit checklist templates
    ManageChecklists,
    /// Create and edit branches
    ManageBranches,
    /// Manage user accounts and role assignments
    ManageUsers,
    /// Preview the application as another role
    PreviewRoles,
    /// Open the admin panel
    AdminPanel,
}

impl Capability {
    /// Every capability
    pub const ALL: [Capability; 9] = [
        Capability::ViewDashboard,
        Capability::CompleteChecklists,
        Capability::ViewReports,
        Capability::PrintReports,
        Capability::ManageChecklists,
        Capability::ManageBranches,
        Capability::ManageUsers,
        Capability::PreviewRoles,
        Capability::AdminPanel,
    ];

    /// Stable identifier
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::ViewDashboard => "view_dashboard",
            Capability::CompleteChecklists => "complete_checklists",
            Capability::ViewReports => "view_reports",
            Capability::PrintReports => "print_reports",
            Capability::ManageChecklists => "manage_checklists",
            Capability::ManageBranches => "manage_branches",
            Capability::ManageUsers => "manage_users",
            Capability::PreviewRoles => "preview_roles",
            Capability::AdminPanel => "admin_panel",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| RoleError::InvalidCapability(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_string_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn role_rejects_unknown() {
        assert_eq!(
            "chef".parse::<Role>(),
            Err(RoleError::InvalidRole("chef".to_string()))
        );
        assert!("Admin".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn serde_matches_identifier() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
        let cap: Capability = serde_json::from_str("\"print_reports\"").unwrap();
        assert_eq!(cap, Capability::PrintReports);
    }

    #[test]
    fn display_names_are_distinct() {
        let mut names: Vec<_> = Role::ALL.iter().map(|r| r.display_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Role::ALL.len());
    }

    #[test]
    fn only_admin_can_preview_and_administer() {
        for role in Role::ALL {
            let expected = role == Role::Admin;
            assert_eq!(role.has(Capability::PreviewRoles), expected, "{role}");
            assert_eq!(role.has(Capability::AdminPanel), expected, "{role}");
            assert_eq!(role.has(Capability::ManageUsers), expected, "{role}");
        }
    }

    #[test]
    fn every_role_sees_dashboard() {
        assert!(Role::ALL.iter().all(|r| r.has(Capability::ViewDashboard)));
    }

    #[test]
    fn branch_staff_cannot_print() {
        assert!(!Role::BranchStaff.has(Capability::PrintReports));
        assert!(Role::BranchManager.has(Capability::PrintReports));
    }
}
