use pawdesk_auth::{ResolvedRole, Sidebar, home_path_for, sidebar_for};

/// Navigation context for a permitted request (role + what the view mounts).
///
/// Inserted by the guard middleware; handlers never re-derive the role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationContext {
    role: ResolvedRole,
}

impl NavigationContext {
    pub fn new(role: ResolvedRole) -> Self {
        Self { role }
    }

    pub fn role(&self) -> &ResolvedRole {
        &self.role
    }

    pub fn home(&self) -> &'static str {
        home_path_for(&self.role)
    }

    pub fn sidebar(&self) -> Sidebar {
        sidebar_for(&self.role)
    }
}
