//! Administrative accounts: admins, deans and vice-deans.

use std::cmp::Ordering;

use chrono::NaiveDate;
use log::{info, warn};
use serde::Deserialize;

use super::checks::{
    ensure_unique_identity, reject_built_in, require_email, require_password, require_text,
    Identity,
};
use super::error::{ServiceError, ServiceResult};
use super::pagination::{paginate, Page, PageRequest, Sortable};
use super::password::hash_password;
use crate::config::AdminSettings;
use crate::db::repository::FullRepository;
use crate::models::{Gender, RoleType, User, UserId};

/// Username of the built-in administrator.
pub const BUILT_IN_ADMIN: &str = "Admin";

/// Profile fields every account carries, without the password.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRequest {
    pub username: String,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub birth_day: Option<NaiveDate>,
    #[serde(default)]
    pub birth_place: Option<String>,
    pub phone_number: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    pub ssn: String,
    pub email: String,
}

impl ProfileRequest {
    pub fn validate(&self) -> ServiceResult<()> {
        require_text("Username", &self.username)?;
        require_text("Name", &self.name)?;
        require_text("Surname", &self.surname)?;
        require_text("Phone number", &self.phone_number)?;
        require_text("SSN", &self.ssn)?;
        require_email(&self.email)
    }

    pub fn identity(&self) -> Identity<'_> {
        Identity {
            username: &self.username,
            ssn: &self.ssn,
            phone_number: &self.phone_number,
            email: &self.email,
        }
    }

    /// Copy the profile onto `user`, leaving role, password and flags alone.
    pub fn apply_to(&self, user: &mut User) {
        user.username = self.username.clone();
        user.name = self.name.clone();
        user.surname = self.surname.clone();
        user.birth_day = self.birth_day;
        user.birth_place = self.birth_place.clone();
        user.phone_number = self.phone_number.clone();
        user.gender = self.gender;
        user.ssn = self.ssn.clone();
        user.email = self.email.clone();
    }
}

/// Profile plus password, used whenever an account is created or reset.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRequest {
    #[serde(flatten)]
    pub profile: ProfileRequest,
    pub password: String,
}

impl UserRequest {
    pub fn validate(&self) -> ServiceResult<()> {
        self.profile.validate()?;
        require_password(&self.password)
    }
}

impl Sortable for User {
    const SORT_FIELDS: &'static [&'static str] =
        &["id", "username", "name", "surname", "email", "student_number"];

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "username" => self.username.cmp(&other.username),
            "name" => self.name.cmp(&other.name),
            "surname" => self.surname.cmp(&other.surname),
            "email" => self.email.cmp(&other.email),
            "student_number" => self.student_number.cmp(&other.student_number),
            _ => self.id.cmp(&other.id),
        }
    }
}

/// Parse the role segment of the user endpoints (`Admin`, `Dean`, ...).
pub fn parse_role(role: &str) -> ServiceResult<RoleType> {
    role.parse::<RoleType>()
        .map_err(|_| ServiceError::not_found(format!("Error: User role is not found: {}", role)))
}

/// Create an admin, dean or vice-dean.
pub async fn save_user<R: FullRepository + ?Sized>(
    repo: &R,
    role: &str,
    request: &UserRequest,
) -> ServiceResult<User> {
    let role = parse_role(role)?;
    if !matches!(role, RoleType::Admin | RoleType::Dean | RoleType::ViceDean) {
        return Err(ServiceError::not_found(format!(
            "Error: User role is not found: {}",
            role
        )));
    }
    request.validate()?;
    ensure_unique_identity(repo, request.profile.identity(), None).await?;

    let mut user = User::new(role, request.profile.username.clone());
    request.profile.apply_to(&mut user);
    user.password_hash = hash_password(&request.password);
    user.built_in = role == RoleType::Admin && user.username == BUILT_IN_ADMIN;

    let saved = repo.save_user(&user).await?;
    info!("Saved {} '{}' (id {})", saved.role, saved.username, saved.user_id());
    Ok(saved)
}

pub async fn page_users<R: FullRepository + ?Sized>(
    repo: &R,
    role: &str,
    page: &PageRequest,
) -> ServiceResult<Page<User>> {
    let role = parse_role(role)?;
    let users = repo.list_users_by_role(role).await?;
    paginate(users, page, "name")
}

pub async fn get_user<R: FullRepository + ?Sized>(repo: &R, id: UserId) -> ServiceResult<User> {
    Ok(repo.get_user(id).await?)
}

pub async fn find_by_username<R: FullRepository + ?Sized>(
    repo: &R,
    username: &str,
) -> ServiceResult<User> {
    repo.find_user_by_username(username)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("Error: User not found with username {}", username)))
}

/// Delete a user on behalf of `actor`. Built-in accounts are never deleted,
/// and non-admins may only delete roles below their own.
pub async fn delete_user<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    id: UserId,
) -> ServiceResult<()> {
    let target = repo.get_user(id).await?;
    reject_built_in(&target)?;
    if !actor.role.can_delete(target.role) {
        warn!(
            "{} '{}' tried to delete {} '{}'",
            actor.role, actor.username, target.role, target.username
        );
        return Err(ServiceError::forbidden(
            "You do not have any permission to do this operation",
        ));
    }

    repo.delete_user(id).await?;
    info!("Deleted {} '{}' (id {})", target.role, target.username, id);
    Ok(())
}

/// Admin update of an admin, dean or vice-dean. The role never changes.
pub async fn update_user<R: FullRepository + ?Sized>(
    repo: &R,
    id: UserId,
    request: &UserRequest,
) -> ServiceResult<User> {
    let _lock = repo.lock_subjects(&[id]).await;
    let mut user = repo.get_user(id).await?;
    reject_built_in(&user)?;
    request.validate()?;
    ensure_unique_identity(repo, request.profile.identity(), user.id).await?;

    request.profile.apply_to(&mut user);
    user.password_hash = hash_password(&request.password);
    Ok(repo.save_user(&user).await?)
}

/// A signed-in user edits their own profile.
pub async fn update_own_profile<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    request: &ProfileRequest,
) -> ServiceResult<User> {
    let _lock = repo.lock_subjects(&[actor.user_id()]).await;
    let mut user = repo.get_user(actor.user_id()).await?;
    reject_built_in(&user)?;
    request.validate()?;
    ensure_unique_identity(repo, request.identity(), user.id).await?;

    request.apply_to(&mut user);
    Ok(repo.save_user(&user).await?)
}

pub async fn search_users_by_name<R: FullRepository + ?Sized>(
    repo: &R,
    name: &str,
) -> ServiceResult<Vec<User>> {
    Ok(repo.search_users_by_name(name).await?)
}

/// Create the built-in administrator unless an admin already exists.
pub async fn seed_admin<R: FullRepository + ?Sized>(
    repo: &R,
    settings: &AdminSettings,
) -> ServiceResult<Option<User>> {
    if repo.count_users_by_role(RoleType::Admin).await? > 0 {
        return Ok(None);
    }

    let request = UserRequest {
        profile: ProfileRequest {
            username: BUILT_IN_ADMIN.to_string(),
            name: settings.name.clone(),
            surname: settings.surname.clone(),
            birth_day: None,
            birth_place: None,
            phone_number: settings.phone_number.clone(),
            gender: None,
            ssn: settings.ssn.clone(),
            email: settings.email.clone(),
        },
        password: settings.password.clone(),
    };
    let admin = save_user(repo, RoleType::Admin.name(), &request).await?;
    info!("Seeded built-in admin account");
    Ok(Some(admin))
}
