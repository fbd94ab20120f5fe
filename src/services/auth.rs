//! Authentication and account service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        activity::NewActivity,
        book::{Book, BookQuery},
        enums::{ActionType, MembershipType},
        fine::Fine,
        loan::LoanDetails,
        reservation::ReservationDetails,
        user::{Profile, RegisterUser, UpdateProfile, UpdateUser, User, UserClaims, UserQuery},
    },
    repository::Repository,
};

/// Successful login payload
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Member dashboard payload
#[derive(Debug, Serialize, ToSchema)]
pub struct Dashboard {
    pub active_loans: Vec<LoanDetails>,
    pub overdue_loans: Vec<LoanDetails>,
    /// Open reservations ordered by queue position
    pub reservations: Vec<ReservationDetails>,
    pub pending_fines: Vec<Fine>,
    pub total_fines: rust_decimal::Decimal,
    pub featured_books: Vec<Book>,
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_password(password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            membership_type: user.membership_type,
            is_librarian: user.is_librarian,
            is_staff: user.is_staff_member,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.config.jwt_expiration_hours as i64)).timestamp(),
        };
        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Register a new member account. Self-registration never grants staff
    /// or admin membership.
    pub async fn register(&self, data: &RegisterUser) -> AppResult<LoginResponse> {
        let membership = match data.membership_type {
            Some(MembershipType::Admin) | None => MembershipType::Public,
            Some(m) => m,
        };

        let hash = Self::hash_password(&data.password)?;
        let user = self
            .repository
            .users
            .create(
                &data.username,
                &data.email,
                &hash,
                data.first_name.as_deref(),
                data.last_name.as_deref(),
                membership,
                data.phone_number.as_deref(),
            )
            .await?;

        let token = self.issue_token(&user)?;
        Ok(LoginResponse { token, user })
    }

    /// Authenticate and issue a JWT
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !Self::verify_password(password, &user.password) {
            return Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }
        if !user.is_active {
            return Err(AppError::Authentication(
                "This account has been deactivated".to_string(),
            ));
        }

        let token = self.issue_token(&user)?;

        self.repository
            .activity
            .record(&NewActivity::new(
                Some(user.id),
                ActionType::Login,
                format!("{} logged in", user.username),
            ))
            .await?;

        Ok(LoginResponse { token, user })
    }

    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Member dashboard: current loans, reservation queue, outstanding
    /// fines and a shelf of featured books
    pub async fn dashboard(&self, user_id: i32) -> AppResult<Dashboard> {
        let featured_query = BookQuery {
            q: None,
            genre: None,
            featured: Some(true),
            page: Some(1),
            per_page: Some(5),
        };
        let (featured_books, _) = self.repository.books.list(&featured_query).await?;

        Ok(Dashboard {
            active_loans: self.repository.loans.active_for_user(user_id).await?,
            overdue_loans: self.repository.loans.overdue_for_user(user_id).await?,
            reservations: self.repository.reservations.open_for_user(user_id).await?,
            pending_fines: self.repository.fines.pending_for_user(user_id).await?,
            total_fines: self
                .repository
                .fines
                .pending_total_for_user(user_id)
                .await?,
            featured_books,
        })
    }

    pub async fn get_profile(&self, user_id: i32) -> AppResult<Profile> {
        self.repository.users.get_profile(user_id).await
    }

    pub async fn update_profile(&self, user_id: i32, data: &UpdateProfile) -> AppResult<Profile> {
        self.repository.users.update_profile(user_id, data).await
    }

    pub async fn list_users(&self, query: &UserQuery) -> AppResult<(Vec<User>, i64)> {
        self.repository.users.list(query).await
    }

    pub async fn update_user(&self, id: i32, data: &UpdateUser) -> AppResult<User> {
        self.repository.users.update(id, data).await
    }

    pub async fn deactivate_user(&self, id: i32) -> AppResult<()> {
        self.repository.users.deactivate(id).await
    }

    pub async fn list_staff(&self) -> AppResult<Vec<crate::models::user::StaffMember>> {
        self.repository.users.list_staff().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = AuthService::hash_password("correct horse").unwrap();
        assert!(AuthService::verify_password("correct horse", &hash));
        assert!(!AuthService::verify_password("battery staple", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!AuthService::verify_password("anything", "not-a-hash"));
    }
}
