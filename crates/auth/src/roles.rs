use serde::{Deserialize, Serialize};

/// A role identifier after normalization: trimmed, lowercased, never empty.
///
/// The value is not restricted to [`RoleKind`]; the backend may hand out
/// roles this dashboard has no rules for, and those still resolve to a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedRole(String);

impl NormalizedRole {
    /// Normalize a raw role candidate. Returns `None` when nothing is left after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim().to_lowercase();
        if value.is_empty() { None } else { Some(Self(value)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for NormalizedRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of role extraction for a principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedRole {
    Named(NormalizedRole),
    /// No usable role data; routed to the default home.
    Undetermined,
}

impl ResolvedRole {
    pub fn from_candidate(raw: &str) -> Self {
        NormalizedRole::parse(raw).map_or(Self::Undetermined, Self::Named)
    }

    /// Normalized role string; empty for [`ResolvedRole::Undetermined`].
    pub fn as_str(&self) -> &str {
        match self {
            Self::Named(role) => role.as_str(),
            Self::Undetermined => "",
        }
    }

    pub fn is_undetermined(&self) -> bool {
        matches!(self, Self::Undetermined)
    }

    /// The recognized role, if the name is one this dashboard knows.
    pub fn kind(&self) -> Option<RoleKind> {
        match self {
            Self::Named(role) => RoleKind::from_normalized(role),
            Self::Undetermined => None,
        }
    }
}

impl core::fmt::Display for ResolvedRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Named(role) => f.write_str(role.as_str()),
            Self::Undetermined => f.write_str("undetermined"),
        }
    }
}

impl Serialize for ResolvedRole {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Named(role) => serializer.serialize_some(role.as_str()),
            Self::Undetermined => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ResolvedRole {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map_or(Self::Undetermined, |r| Self::from_candidate(&r)))
    }
}

/// The closed set of roles the dashboard recognizes in access rules.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoleKind {
    Admin,
    Superadmin,
    Veterinary,
    Veterinarian,
    Owner,
    Doctor,
}

impl RoleKind {
    pub const ALL: [RoleKind; 6] = [
        RoleKind::Admin,
        RoleKind::Superadmin,
        RoleKind::Veterinary,
        RoleKind::Veterinarian,
        RoleKind::Owner,
        RoleKind::Doctor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::Admin => "admin",
            RoleKind::Superadmin => "superadmin",
            RoleKind::Veterinary => "veterinary",
            RoleKind::Veterinarian => "veterinarian",
            RoleKind::Owner => "owner",
            RoleKind::Doctor => "doctor",
        }
    }

    pub fn from_normalized(role: &NormalizedRole) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == role.as_str())
    }
}

impl core::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_lowercases() {
        let role = NormalizedRole::parse("  SuperAdmin\t").unwrap();
        assert_eq!(role.as_str(), "superadmin");
    }

    #[test]
    fn blank_candidate_is_undetermined() {
        assert!(NormalizedRole::parse("   ").is_none());
        assert_eq!(ResolvedRole::from_candidate(""), ResolvedRole::Undetermined);
        assert_eq!(ResolvedRole::Undetermined.as_str(), "");
    }

    #[test]
    fn every_kind_round_trips_through_its_literal() {
        for kind in RoleKind::ALL {
            let role = NormalizedRole::parse(kind.as_str()).unwrap();
            assert_eq!(RoleKind::from_normalized(&role), Some(kind));
        }
    }

    #[test]
    fn unknown_names_stay_named_but_have_no_kind() {
        let role = ResolvedRole::from_candidate("Receptionist");
        assert_eq!(role.as_str(), "receptionist");
        assert_eq!(role.kind(), None);
    }

    #[test]
    fn resolved_role_serializes_as_nullable_string() {
        let named = serde_json::to_value(ResolvedRole::from_candidate("Owner")).unwrap();
        assert_eq!(named, serde_json::json!("owner"));
        let none = serde_json::to_value(ResolvedRole::Undetermined).unwrap();
        assert!(none.is_null());
    }

    #[test]
    fn resolved_role_deserializes_from_nullable_string() {
        let named: ResolvedRole = serde_json::from_str("\" Vet \"").unwrap();
        assert_eq!(named.as_str(), "vet");
        let none: ResolvedRole = serde_json::from_str("null").unwrap();
        assert_eq!(none, ResolvedRole::Undetermined);
    }
}
