use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One entry of a user's `roles` collection as the backend sends it.
///
/// Entries are either bare strings or objects carrying `slug` and/or `name`.
/// Anything else is kept as [`RoleRepresentation::Malformed`] so that one odd
/// entry never fails the whole identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleRepresentation {
    PlainString(String),
    Structured {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slug: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Malformed(Value),
}

impl RoleRepresentation {
    pub fn plain(role: impl Into<String>) -> Self {
        Self::PlainString(role.into())
    }

    pub fn structured(slug: Option<&str>, name: Option<&str>) -> Self {
        Self::Structured {
            slug: slug.map(str::to_owned),
            name: name.map(str::to_owned),
        }
    }

    /// The raw (not yet normalized) role name this entry stands for.
    ///
    /// `slug` wins unless it is absent or empty, then `name`; otherwise empty.
    pub fn candidate(&self) -> &str {
        match self {
            Self::PlainString(role) => role,
            Self::Structured { slug, name } => slug
                .as_deref()
                .filter(|s| !s.is_empty())
                .or(name.as_deref())
                .unwrap_or(""),
            Self::Malformed(_) => "",
        }
    }
}

/// The authenticated principal as delivered in the login response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_role")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_roles")]
    pub roles: Option<Vec<RoleRepresentation>>,
}

impl UserIdentity {
    pub fn with_role(email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: Some(role.into()),
            roles: None,
        }
    }

    pub fn with_roles(email: impl Into<String>, roles: Vec<RoleRepresentation>) -> Self {
        Self {
            email: email.into(),
            role: None,
            roles: Some(roles),
        }
    }

    /// Whether the backend sent any role data at all.
    pub fn has_role_data(&self) -> bool {
        self.role.is_some() || self.roles.as_ref().is_some_and(|r| !r.is_empty())
    }
}

// A non-string `role` is treated as absent.
fn lenient_role<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(role) => Some(role),
        _ => None,
    })
}

// A non-array `roles` becomes a single malformed entry.
fn lenient_roles<'de, D>(deserializer: D) -> Result<Option<Vec<RoleRepresentation>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let roles = items
                .into_iter()
                .map(serde_json::from_value::<RoleRepresentation>)
                .collect::<Result<Vec<_>, serde_json::Error>>()
                .map_err(<D::Error as serde::de::Error>::custom)?;
            Ok(Some(roles))
        }
        other => Ok(Some(vec![RoleRepresentation::Malformed(other)])),
    }
}
