use serde::de::IgnoredAny;
use serde::Deserialize;

use models::errors::ModelError;
use models::validate::{is_email, is_present, Violations};
use models::Role;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub role: String,
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub display_name: String,
}

impl CreateUserInput {
    pub fn validate(self) -> Result<NewUser, ModelError> {
        if [&self.email, &self.password, &self.role, &self.display_name].iter().any(|v| !is_present(v)) {
            return Err(ModelError::Validation("Email, password, role, and display name are required".into()));
        }
        let role: Role = self.role.parse()?;
        let mut v = Violations::new();
        v.check(is_email(&self.email), "email", "Valid email is required");
        v.finish()?;
        Ok(NewUser {
            email: self.email.trim().to_lowercase(),
            password: self.password,
            role,
            display_name: self.display_name.trim().to_string(),
        })
    }
}

/// Profile edit. Server-managed keys echoed back by clients are accepted and ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserInput {
    pub email: Option<String>,
    pub role: Option<String>,
    pub display_name: Option<String>,
    id: Option<IgnoredAny>,
    password: Option<IgnoredAny>,
    created_at: Option<IgnoredAny>,
    updated_at: Option<IgnoredAny>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub display_name: Option<String>,
}

impl UpdateUserInput {
    pub fn validate(self) -> Result<ProfilePatch, ModelError> {
        let _ = (self.id, self.password, self.created_at, self.updated_at);
        let role = self.role.as_deref().map(str::parse::<Role>).transpose()?;
        let mut v = Violations::new();
        v.check(self.email.as_deref().map_or(true, is_email), "email", "Valid email is required")
            .check(self.display_name.as_deref().map_or(true, is_present), "displayName", "Display name is required");
        v.finish()?;
        Ok(ProfilePatch {
            email: self.email.map(|e| e.trim().to_lowercase()),
            role,
            display_name: self.display_name.map(|n| n.trim().to_string()),
        })
    }
}

/// Profile row to insert; `id` is the identity uid.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(email: &str, password: &str, role: &str, name: &str) -> CreateUserInput {
        CreateUserInput { email: email.into(), password: password.into(), role: role.into(), display_name: name.into() }
    }

    #[test]
    fn all_four_fields_are_required() {
        let err = create("a@example.com", "", "worker", "A").validate().unwrap_err();
        assert_eq!(err.to_string(), "validation error: Email, password, role, and display name are required");
    }

    #[test]
    fn role_must_be_known() {
        let err = create("a@example.com", "Passw0rd!", "manager", "A").validate().unwrap_err();
        assert!(err.to_string().contains("Role must be either admin or worker"));
    }

    #[test]
    fn email_is_normalized() {
        let user = create(" Ravi@Example.com ", "Passw0rd!", "admin", " Ravi ").validate().unwrap();
        assert_eq!(user.email, "ravi@example.com");
        assert_eq!(user.display_name, "Ravi");
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn update_ignores_server_managed_keys() {
        let input: UpdateUserInput = serde_json::from_str(
            r#"{"id":"abc","createdAt":{"seconds":1},"password":"x","displayName":"Neha","role":"admin"}"#,
        )
        .unwrap();
        let patch = input.validate().unwrap();
        assert_eq!(patch, ProfilePatch { email: None, role: Some(Role::Admin), display_name: Some("Neha".into()) });
    }

    #[test]
    fn update_rejects_unknown_keys() {
        assert!(serde_json::from_str::<UpdateUserInput>(r#"{"nickname":"x"}"#).is_err());
    }
}
