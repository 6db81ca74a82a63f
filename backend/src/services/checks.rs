//! Guards shared by the user-facing services.

use super::error::{ServiceError, ServiceResult};
use crate::db::repository::FullRepository;
use crate::models::{RoleType, User, UserId};

/// Fields that must be unique across all accounts.
#[derive(Debug, Clone, Copy)]
pub struct Identity<'a> {
    pub username: &'a str,
    pub ssn: &'a str,
    pub phone_number: &'a str,
    pub email: &'a str,
}

/// Reject an identity already taken by another account. `owner` is the
/// account being updated, whose own values do not count as duplicates.
pub async fn ensure_unique_identity<R: FullRepository + ?Sized>(
    repo: &R,
    identity: Identity<'_>,
    owner: Option<UserId>,
) -> ServiceResult<()> {
    let users = repo.list_users().await?;
    let others = || users.iter().filter(|u| owner.is_none() || u.id != owner);

    if others().any(|u| u.username == identity.username) {
        return Err(ServiceError::conflict(format!(
            "Error: User with username {} already registered",
            identity.username
        )));
    }
    if others().any(|u| u.ssn == identity.ssn) {
        return Err(ServiceError::conflict(format!(
            "Error: User with ssn {} already registered",
            identity.ssn
        )));
    }
    if others().any(|u| u.phone_number == identity.phone_number) {
        return Err(ServiceError::conflict(format!(
            "Error: User with phone number {} already registered",
            identity.phone_number
        )));
    }
    if others().any(|u| u.email.eq_ignore_ascii_case(identity.email)) {
        return Err(ServiceError::conflict(format!(
            "Error: User with email {} already registered",
            identity.email
        )));
    }
    Ok(())
}

pub fn require_role(user: &User, role: RoleType) -> ServiceResult<()> {
    if user.role != role {
        return Err(ServiceError::bad_request(format!(
            "User with id {} does not have the {} role",
            user.user_id(),
            role
        )));
    }
    Ok(())
}

pub fn require_advisor(user: &User) -> ServiceResult<()> {
    if user.role != RoleType::Teacher || !user.is_advisor {
        return Err(ServiceError::bad_request(format!(
            "User with id {} is not an advisor teacher",
            user.user_id()
        )));
    }
    Ok(())
}

/// Built-in accounts are never changed or removed through the API.
pub fn reject_built_in(user: &User) -> ServiceResult<()> {
    if user.built_in {
        return Err(ServiceError::forbidden(
            "You do not have any permission to do this operation",
        ));
    }
    Ok(())
}

pub fn require_text(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::bad_request(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn require_password(password: &str) -> ServiceResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServiceError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub fn require_email(email: &str) -> ServiceResult<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ServiceError::bad_request(format!(
            "Please enter a valid email: {}",
            email
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::UserRepository;

    fn user(username: &str, ssn: &str, phone: &str, email: &str) -> User {
        let mut user = User::new(RoleType::Dean, username);
        user.ssn = ssn.into();
        user.phone_number = phone.into();
        user.email = email.into();
        user
    }

    #[tokio::test]
    async fn test_duplicate_fields_conflict() {
        let repo = LocalRepository::new();
        repo.save_user(&user("dean", "111-11-1111", "555-111-1111", "d@school.io"))
            .await
            .unwrap();

        let identity = Identity {
            username: "other",
            ssn: "222-22-2222",
            phone_number: "555-111-1111",
            email: "o@school.io",
        };
        let err = ensure_unique_identity(&repo, identity, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(m) if m.contains("phone number")));
    }

    #[tokio::test]
    async fn test_owner_may_keep_own_values() {
        let repo = LocalRepository::new();
        let saved = repo
            .save_user(&user("dean", "111-11-1111", "555-111-1111", "d@school.io"))
            .await
            .unwrap();
        let identity = Identity {
            username: "dean",
            ssn: "111-11-1111",
            phone_number: "555-111-1111",
            email: "d@school.io",
        };
        assert!(ensure_unique_identity(&repo, identity, saved.id).await.is_ok());
        assert!(ensure_unique_identity(&repo, identity, None).await.is_err());
    }

    #[test]
    fn test_advisor_guard() {
        let mut teacher = User::new(RoleType::Teacher, "t");
        assert!(require_advisor(&teacher).is_err());
        teacher.is_advisor = true;
        assert!(require_advisor(&teacher).is_ok());
        let mut student = User::new(RoleType::Student, "s");
        student.is_advisor = true;
        assert!(require_advisor(&student).is_err());
    }

    #[test]
    fn test_field_validators() {
        assert!(require_password("short").is_err());
        assert!(require_password("long-enough").is_ok());
        assert!(require_email("a@b.io").is_ok());
        assert!(require_email("not-an-email").is_err());
        assert!(require_text("Name", "  ").is_err());
    }
}
