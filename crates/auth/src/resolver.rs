use std::collections::BTreeSet;

use serde::Serialize;

use crate::{ResolvedRole, RoleKind, UserIdentity};

/// Landing page for administrators; also the fallback for every other role.
pub const ADMIN_HOME: &str = "/home";
pub const VET_HOME: &str = "/vet/home";
pub const OWNER_HOME: &str = "/owner/home";
pub const DEFAULT_HOME: &str = ADMIN_HOME;

/// Derive the single role a principal acts under.
///
/// The `role` field wins when non-empty; otherwise the *first* entry of
/// `roles` is used and later entries are ignored.
///
/// - No IO
/// - No panics
pub fn extract_role(identity: &UserIdentity) -> ResolvedRole {
    let candidate = identity
        .role
        .as_deref()
        .filter(|r| !r.is_empty())
        .or_else(|| {
            identity
                .roles
                .as_deref()
                .and_then(|roles| roles.first())
                .map(|entry| entry.candidate())
        })
        .unwrap_or("");

    let resolved = ResolvedRole::from_candidate(candidate);
    if resolved.is_undetermined() && identity.has_role_data() {
        tracing::warn!(email = %identity.email, "role data present but unusable; treating role as undetermined");
    }
    resolved
}

/// Canonical landing route for a role. Total: unknown roles land on [`DEFAULT_HOME`].
pub fn home_path_for(role: &ResolvedRole) -> &'static str {
    match role.kind() {
        Some(RoleKind::Veterinary | RoleKind::Veterinarian) => VET_HOME,
        Some(RoleKind::Owner) => OWNER_HOME,
        Some(RoleKind::Admin | RoleKind::Superadmin) => ADMIN_HOME,
        // TODO: doctors share the admin landing page until product decides on a dedicated one.
        Some(RoleKind::Doctor) | None => DEFAULT_HOME,
    }
}

/// Exact membership test of the normalized role in a rule's allowed set.
///
/// An undetermined role is never a member.
pub fn is_allowed(role: &ResolvedRole, allowed: &BTreeSet<RoleKind>) -> bool {
    let name = role.as_str();
    allowed.iter().any(|kind| kind.as_str() == name)
}

/// Navigation set the view layer mounts for a role.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sidebar {
    Admin,
    Vet,
    Owner,
    /// Home and profile only.
    Minimal,
}

pub fn sidebar_for(role: &ResolvedRole) -> Sidebar {
    match role.kind() {
        Some(RoleKind::Admin | RoleKind::Superadmin) => Sidebar::Admin,
        Some(RoleKind::Veterinary | RoleKind::Veterinarian) => Sidebar::Vet,
        Some(RoleKind::Owner) => Sidebar::Owner,
        Some(RoleKind::Doctor) | None => Sidebar::Minimal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoleRepresentation;
    use proptest::prelude::*;

    fn set(kinds: &[RoleKind]) -> BTreeSet<RoleKind> {
        kinds.iter().copied().collect()
    }

    fn named(raw: &str) -> ResolvedRole {
        ResolvedRole::from_candidate(raw)
    }

    #[test]
    fn role_field_wins_over_collection() {
        let identity = UserIdentity {
            email: "a@b.c".to_string(),
            role: Some("Owner".to_string()),
            roles: Some(vec![RoleRepresentation::plain("admin")]),
        };
        assert_eq!(extract_role(&identity).as_str(), "owner");
    }

    #[test]
    fn empty_role_field_falls_through_to_collection() {
        let identity = UserIdentity {
            email: String::new(),
            role: Some(String::new()),
            roles: Some(vec![RoleRepresentation::structured(Some("Veterinarian"), None)]),
        };
        assert_eq!(extract_role(&identity).as_str(), "veterinarian");
    }

    #[test]
    fn whitespace_only_role_field_is_undetermined() {
        // Non-empty, so the collection is not consulted.
        let identity = UserIdentity {
            email: String::new(),
            role: Some("   ".to_string()),
            roles: Some(vec![RoleRepresentation::plain("admin")]),
        };
        assert_eq!(extract_role(&identity), ResolvedRole::Undetermined);
    }

    #[test]
    fn structured_entry_uses_name_when_slug_missing() {
        let identity = UserIdentity::with_roles(
            "a@b.c",
            vec![RoleRepresentation::structured(None, Some(" SuperAdmin "))],
        );
        assert_eq!(extract_role(&identity).as_str(), "superadmin");
    }

    #[test]
    fn missing_and_malformed_role_data_is_undetermined() {
        assert_eq!(extract_role(&UserIdentity::default()), ResolvedRole::Undetermined);

        let empty = UserIdentity::with_roles("a@b.c", Vec::new());
        assert_eq!(extract_role(&empty), ResolvedRole::Undetermined);

        let malformed = UserIdentity::with_roles(
            "a@b.c",
            vec![RoleRepresentation::Malformed(serde_json::json!(42))],
        );
        assert_eq!(extract_role(&malformed), ResolvedRole::Undetermined);
    }

    #[test]
    fn extraction_is_idempotent() {
        let identity = UserIdentity::with_roles("a@b.c", vec![RoleRepresentation::plain("Doctor")]);
        assert_eq!(extract_role(&identity), extract_role(&identity));
    }

    #[test]
    fn home_paths() {
        assert_eq!(home_path_for(&named("veterinarian")), "/vet/home");
        assert_eq!(home_path_for(&named("veterinary")), "/vet/home");
        assert_eq!(home_path_for(&named("owner")), "/owner/home");
        assert_eq!(home_path_for(&named("admin")), "/home");
        assert_eq!(home_path_for(&named("superadmin")), "/home");
        assert_eq!(home_path_for(&named("doctor")), "/home");
        assert_eq!(home_path_for(&named("receptionist")), "/home");
        assert_eq!(home_path_for(&ResolvedRole::Undetermined), "/home");
    }

    #[test]
    fn membership_is_exact() {
        assert!(is_allowed(&named("owner"), &set(&[RoleKind::Owner])));
        assert!(!is_allowed(&named("owner"), &set(&[RoleKind::Admin, RoleKind::Superadmin])));
        assert!(!is_allowed(&ResolvedRole::Undetermined, &set(&RoleKind::ALL)));
        assert!(!is_allowed(&named("receptionist"), &set(&RoleKind::ALL)));
        assert!(!is_allowed(&named("admin"), &BTreeSet::new()));
    }

    #[test]
    fn sidebars_follow_role_groups() {
        assert_eq!(sidebar_for(&named("superadmin")), Sidebar::Admin);
        assert_eq!(sidebar_for(&named("veterinary")), Sidebar::Vet);
        assert_eq!(sidebar_for(&named("owner")), Sidebar::Owner);
        assert_eq!(sidebar_for(&named("doctor")), Sidebar::Minimal);
        assert_eq!(sidebar_for(&ResolvedRole::Undetermined), Sidebar::Minimal);
    }

    fn kind_strategy() -> impl Strategy<Value = RoleKind> {
        prop::sample::select(RoleKind::ALL.to_vec())
    }

    fn recase(literal: &str, mask: &[bool]) -> String {
        literal
            .chars()
            .zip(mask.iter().cycle())
            .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any casing/whitespace variant of a known role in the
        /// `role` field extracts to its canonical literal.
        #[test]
        fn role_field_normalizes_to_canonical(
            kind in kind_strategy(),
            mask in prop::collection::vec(any::<bool>(), 1..12),
            lead in "[ \t]{0,3}",
            trail in "[ \t]{0,3}",
        ) {
            let raw = format!("{lead}{}{trail}", recase(kind.as_str(), &mask));
            let identity = UserIdentity::with_role("a@b.c", raw);
            let resolved = extract_role(&identity);
            prop_assert_eq!(resolved.as_str(), kind.as_str());
            prop_assert_eq!(resolved.kind(), Some(kind));
        }

        /// Property: with only a collection, the first element decides.
        #[test]
        fn first_collection_entry_wins(
            first in kind_strategy(),
            rest in prop::collection::vec(kind_strategy(), 0..5),
            structured in any::<bool>(),
        ) {
            let head = if structured {
                RoleRepresentation::structured(Some(first.as_str()), Some("ignored"))
            } else {
                RoleRepresentation::plain(first.as_str())
            };
            let mut roles = vec![head];
            roles.extend(rest.iter().map(|k| RoleRepresentation::plain(k.as_str())));

            let identity = UserIdentity::with_roles("a@b.c", roles);
            prop_assert_eq!(extract_role(&identity).kind(), Some(first));
        }
    }
}
