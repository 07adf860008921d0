//! Route access rules for the dashboard's protected subtrees.

use std::collections::BTreeSet;

use pawdesk_core::{DomainError, DomainResult};
use crate::RoleKind;

/// Who may enter a route subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// No session required (sign-in page, health, auth endpoints).
    Public,
    /// Any authenticated principal, whatever its role.
    Authenticated,
    /// Authenticated and the role is one of these.
    Roles(BTreeSet<RoleKind>),
}

impl Access {
    pub fn roles(kinds: impl IntoIterator<Item = RoleKind>) -> Self {
        Self::Roles(kinds.into_iter().collect())
    }
}

/// The access rule guarding one route subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAccessRule {
    pub prefix: String,
    pub access: Access,
}

impl RouteAccessRule {
    /// Segment-aware prefix match: `/vet` covers `/vet` and `/vet/home`, not `/veterans`.
    pub fn covers(&self, path: &str) -> bool {
        if self.prefix == "/" {
            return true;
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Role-gated groups of the dashboard.
pub const ADMIN_ROLES: [RoleKind; 2] = [RoleKind::Admin, RoleKind::Superadmin];
pub const VET_ROLES: [RoleKind; 2] = [RoleKind::Veterinary, RoleKind::Veterinarian];
pub const OWNER_ROLES: [RoleKind; 1] = [RoleKind::Owner];

/// Admin screens, each its own subtree.
pub const ADMIN_SECTIONS: [&str; 8] = [
    "/bookings",
    "/clinics",
    "/veterinarians",
    "/pets",
    "/locations",
    "/notifications",
    "/roles",
    "/billing",
];

/// Set of route rules with at most one rule per subtree prefix.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    rules: Vec<RouteAccessRule>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The platform's route table.
    pub fn dashboard() -> DomainResult<Self> {
        let mut table = Self::new();
        table.insert("/signin", Access::Public)?;
        table.insert("/health", Access::Public)?;
        table.insert("/auth", Access::Public)?;
        table.insert("/home", Access::Authenticated)?;
        table.insert("/profile", Access::Authenticated)?;
        for section in ADMIN_SECTIONS {
            table.insert(section, Access::roles(ADMIN_ROLES))?;
        }
        table.insert("/vet", Access::roles(VET_ROLES))?;
        table.insert("/owner", Access::roles(OWNER_ROLES))?;
        Ok(table)
    }

    /// Add a rule; a second rule for the same subtree is rejected.
    pub fn insert(&mut self, prefix: impl Into<String>, access: Access) -> DomainResult<()> {
        let prefix = normalize_path(&prefix.into());
        if !prefix.starts_with('/') {
            return Err(DomainError::validation(format!(
                "route prefix '{prefix}' must start with '/'"
            )));
        }
        if self.rules.iter().any(|r| r.prefix == prefix) {
            return Err(DomainError::conflict(format!(
                "route subtree '{prefix}' already has an access rule"
            )));
        }
        self.rules.push(RouteAccessRule { prefix, access });
        Ok(())
    }

    /// Most specific rule covering `path`, if any.
    pub fn lookup(&self, path: &str) -> Option<&RouteAccessRule> {
        let path = normalize_path(path);
        self.rules
            .iter()
            .filter(|rule| rule.covers(&path))
            .max_by_key(|rule| rule.prefix.len())
    }

    /// Access for `path`; paths without a rule are public.
    pub fn access_for(&self, path: &str) -> &Access {
        self.lookup(path).map_or(&Access::Public, |rule| &rule.access)
    }

    pub fn rules(&self) -> &[RouteAccessRule] {
        &self.rules
    }
}

/// Strip query/fragment and trailing slashes (keeping a lone `/`).
pub(crate) fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
