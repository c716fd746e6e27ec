//! Login payloads and the authenticated user view

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Account role, stored in `users.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Provider,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Provider => "provider",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Self::Patient),
            "provider" => Ok(Self::Provider),
            other => Err(crate::Error::Internal(format!("Unknown account type '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// The signed-in user as returned by signup and login.
///
/// `navigation_id` is the role id the client should route to, i.e. the
/// `patient_id` or `provider_id`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub role: Role,
    pub navigation_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_information: Option<String>,
}

impl AuthUser {
    pub fn role_id(&self) -> i32 {
        self.navigation_id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_text() {
        assert_eq!("provider".parse::<Role>().unwrap(), Role::Provider);
        assert_eq!(Role::Patient.to_string(), "patient");
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn patient_user_omits_provider_fields() {
        let user = AuthUser {
            user_id: 1,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            role: Role::Patient,
            navigation_id: 7,
            patient_id: Some(7),
            provider_id: None,
            provider_type: None,
            bio: None,
            contact_information: None,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["type"], "patient");
        assert_eq!(value["patient_id"], 7);
        assert!(value.get("provider_id").is_none());
    }
}
