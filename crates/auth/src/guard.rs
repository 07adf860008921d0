//! Route guard: decides what a navigation attempt turns into.
//!
//! `Pending` session → loading; no principal → sign-in (remembering the path);
//! principal → permitted, or redirected to the principal's own home. There is
//! no "access denied" page.

use crate::routes::normalize_path;
use crate::{
    Access, ResolvedRole, RouteTable, SessionState, UserIdentity, extract_role, home_path_for,
    is_allowed,
};

pub const SIGN_IN_PATH: &str = "/signin";

/// Result of evaluating a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Permitted { role: ResolvedRole },
    /// Session restore still in flight; render a neutral loading state.
    Loading,
    RedirectToSignIn { return_to: String },
    RedirectHome { path: &'static str, role: ResolvedRole },
}

impl GuardOutcome {
    /// Redirect target, if this outcome is a redirect.
    pub fn location(&self) -> Option<String> {
        match self {
            Self::RedirectToSignIn { return_to } => Some(format!(
                "{SIGN_IN_PATH}?next={}",
                urlencoding::encode(return_to)
            )),
            Self::RedirectHome { path, .. } => Some((*path).to_string()),
            Self::Permitted { .. } | Self::Loading => None,
        }
    }
}

/// Evaluate a navigation to `requested` under the given session state. Total.
pub fn evaluate(state: &SessionState, table: &RouteTable, requested: &str) -> GuardOutcome {
    let access = table.access_for(requested);

    let outcome = match (access, state) {
        (Access::Public, SessionState::Authenticated(session)) => GuardOutcome::Permitted {
            role: session.role().clone(),
        },
        (Access::Public, _) => GuardOutcome::Permitted {
            role: ResolvedRole::Undetermined,
        },
        (_, SessionState::Pending) => GuardOutcome::Loading,
        (_, SessionState::Anonymous) => GuardOutcome::RedirectToSignIn {
            return_to: requested.to_string(),
        },
        (Access::Authenticated, SessionState::Authenticated(session)) => GuardOutcome::Permitted {
            role: session.role().clone(),
        },
        (Access::Roles(allowed), SessionState::Authenticated(session)) => {
            let role = session.role().clone();
            if is_allowed(&role, allowed) {
                GuardOutcome::Permitted { role }
            } else {
                GuardOutcome::RedirectHome {
                    path: home_path_for(&role),
                    role,
                }
            }
        }
    };

    tracing::debug!(path = requested, ?outcome, "route guard decision");
    outcome
}

/// Where to send a principal right after sign-in.
///
/// The remembered path is restored only when it is an in-app absolute path
/// the new principal may enter; otherwise the principal's home path.
pub fn post_login_destination(
    identity: &UserIdentity,
    return_to: Option<&str>,
    table: &RouteTable,
) -> String {
    let role = extract_role(identity);
    let home = home_path_for(&role);

    let Some(path) = return_to.filter(|p| is_local_path(p)) else {
        return home.to_string();
    };

    let permitted = match table.access_for(path) {
        Access::Public | Access::Authenticated => true,
        Access::Roles(allowed) => is_allowed(&role, allowed),
    };

    if permitted && normalize_path(path) != SIGN_IN_PATH {
        path.to_string()
    } else {
        home.to_string()
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
