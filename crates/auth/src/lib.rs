//! `pawdesk-auth` — role resolution and route guarding for the dashboard.
//!
//! This crate is intentionally decoupled from HTTP and storage: every
//! decision here is a pure function of in-memory data.

pub mod guard;
pub mod identity;
pub mod resolver;
pub mod roles;
pub mod routes;
pub mod session;

pub use guard::{GuardOutcome, SIGN_IN_PATH, evaluate, post_login_destination};
pub use identity::{RoleRepresentation, UserIdentity};
pub use resolver::{
    ADMIN_HOME, DEFAULT_HOME, OWNER_HOME, Sidebar, VET_HOME, extract_role, home_path_for,
    is_allowed, sidebar_for,
};
pub use roles::{NormalizedRole, ResolvedRole, RoleKind};
pub use routes::{Access, RouteAccessRule, RouteTable};
pub use session::{LoginResponse, Session, SessionId, SessionState};
