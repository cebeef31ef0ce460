use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed role set.
///
/// Stored as text in the accounts table; the mapping is explicit so an
/// unknown stored value surfaces as a decode error instead of being
/// silently coerced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("unknown role: {0}")]
pub struct UnknownRole(String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A login identity row.
///
/// The credential columns stay inside this crate: they are crate-private,
/// never serialized, and redacted from debug output. Everything a caller
/// outside the hashing boundary may see of an account is its `Identity`.
#[derive(Clone, Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub login: String,
    #[serde(skip_serializing)]
    pub(crate) credential_digest: String,
    #[serde(skip_serializing)]
    pub(crate) credential_salt: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub active: bool,
}

impl Account {
    pub fn new(
        id: i64,
        login: impl Into<String>,
        credential_digest: impl Into<String>,
        credential_salt: impl Into<String>,
        role: Role,
        active: bool,
    ) -> Self {
        Self {
            id,
            login: login.into(),
            credential_digest: credential_digest.into(),
            credential_salt: credential_salt.into(),
            role,
            active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The claims-shaped projection of this account, minus secret material.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            login: self.login.clone(),
            role: self.role,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("login", &self.login)
            .field("credential_digest", &"<redacted>")
            .field("credential_salt", &"<redacted>")
            .field("role", &self.role)
            .field("active", &self.active)
            .finish()
    }
}

/// Descriptive attributes tied 1:1 to an account.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    pub full_name: String,
    pub register_number: String,
    pub photo_path: Option<String>,
}

/// Resolved identity attached to an authenticated request, and the claim
/// set tokens are minted from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub login: String,
    pub role: Role,
}

impl From<&Account> for Identity {
    fn from(account: &Account) -> Self {
        account.identity()
    }
}

/// Profile fields accepted on create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileFields {
    pub name: String,
    pub full_name: String,
    pub register_number: String,
}

/// Input for account creation. Pre-validated by the caller.
#[derive(Clone, Deserialize)]
pub struct NewUser {
    pub login: String,
    pub password: String,
    pub profile: ProfileFields,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("profile", &self.profile)
            .field("role", &self.role)
            .field("active", &self.active)
            .finish()
    }
}

/// Input for account update. A `None` password leaves the stored
/// credential untouched.
#[derive(Clone, Deserialize)]
pub struct UserUpdate {
    pub login: String,
    pub password: Option<String>,
    pub profile: ProfileFields,
    pub role: Role,
    pub active: bool,
}

impl fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserUpdate")
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("profile", &self.profile)
            .field("role", &self.role)
            .field("active", &self.active)
            .finish()
    }
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_mapping_roundtrip() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_account_serialization_omits_secrets() {
        let account = Account {
            id: 7,
            login: "a@b.com".to_string(),
            credential_digest: "digest-value-v1".to_string(),
            credential_salt: "salt-value-v1".to_string(),
            role: Role::User,
            active: true,
        };

        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("credential_digest").is_none());
        assert!(json.get("credential_salt").is_none());
        assert_eq!(json["login"], "a@b.com");

        let debug = format!("{account:?}");
        assert!(!debug.contains("digest-value-v1"));
        assert!(!debug.contains("salt-value-v1"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_new_user_debug_redacts_password() {
        let new = NewUser {
            login: "a@b.com".to_string(),
            password: "Hunter2Hunter2".to_string(),
            profile: ProfileFields {
                name: "A".to_string(),
                full_name: "A Full".to_string(),
                register_number: "123".to_string(),
            },
            role: Role::default(),
            active: true,
        };

        let debug = format!("{new:?}");
        assert!(!debug.contains("Hunter2Hunter2"));
    }
}
