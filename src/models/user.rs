//! User, profile and staff directory models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::MembershipType;
use crate::error::AppError;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub membership_type: MembershipType,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    /// Library card identifier, encoded in the member QR code
    pub barcode: uuid::Uuid,
    pub is_librarian: bool,
    pub is_staff_member: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(f), Some(l)) => format!("{} {}", f, l),
            (Some(f), None) => f.to_string(),
            (None, Some(l)) => l.to_string(),
            (None, None) => self.username.clone(),
        }
    }
}

/// Extended profile information
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profile {
    pub id: i32,
    pub user_id: i32,
    pub bio: Option<String>,
    pub department: Option<String>,
    pub student_id: Option<String>,
    pub staff_id: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
}

/// Staff directory entry with the linked user's display name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StaffMember {
    pub id: i32,
    pub user_id: i32,
    pub position: String,
    pub department: String,
    pub office_location: Option<String>,
    pub office_hours: Option<String>,
    pub specialization: Option<String>,
    pub qualifications: Option<String>,
    pub phone_extension: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    #[sqlx(default)]
    pub full_name: Option<String>,
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub membership_type: Option<MembershipType>,
    pub phone_number: Option<String>,
}

/// Admin update user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub membership_type: Option<MembershipType>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub is_librarian: Option<bool>,
    pub is_staff_member: Option<bool>,
    pub is_active: Option<bool>,
}

/// Update own profile request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfile {
    pub bio: Option<String>,
    pub department: Option<String>,
    pub student_id: Option<String>,
    pub staff_id: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
}

/// User list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UserQuery {
    /// Substring match on username, email or name
    pub q: Option<String>,
    pub membership_type: Option<MembershipType>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub membership_type: MembershipType,
    pub is_librarian: bool,
    pub is_staff: bool,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Require librarian privileges (librarians and admins)
    pub fn require_librarian(&self) -> Result<(), AppError> {
        if self.is_librarian || self.membership_type == MembershipType::Admin {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Librarian privileges required".to_string(),
            ))
        }
    }

    /// Require staff access (staff members, librarians and admins)
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff || self.is_librarian || self.membership_type == MembershipType::Admin {
            Ok(())
        } else {
            Err(AppError::Authorization("Staff access required".to_string()))
        }
    }

    pub fn is_admin(&self) -> bool {
        self.membership_type == MembershipType::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(membership: MembershipType, is_librarian: bool, is_staff: bool) -> UserClaims {
        UserClaims {
            sub: "alice".to_string(),
            user_id: 1,
            membership_type: membership,
            is_librarian,
            is_staff,
            exp: i64::MAX,
            iat: 0,
        }
    }

    #[test]
    fn librarian_flag_grants_librarian_access() {
        assert!(claims(MembershipType::Staff, true, false)
            .require_librarian()
            .is_ok());
        assert!(claims(MembershipType::Student, false, false)
            .require_librarian()
            .is_err());
    }

    #[test]
    fn admin_membership_grants_everything() {
        let c = claims(MembershipType::Admin, false, false);
        assert!(c.require_librarian().is_ok());
        assert!(c.require_staff().is_ok());
    }

    #[test]
    fn staff_access_does_not_imply_librarian() {
        let c = claims(MembershipType::Staff, false, true);
        assert!(c.require_staff().is_ok());
        assert!(c.require_librarian().is_err());
    }

    #[test]
    fn token_round_trip() {
        let c = claims(MembershipType::Faculty, false, false);
        let token = c.create_token("test-secret").unwrap();
        let parsed = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(parsed.user_id, c.user_id);
        assert_eq!(parsed.membership_type, MembershipType::Faculty);
        assert!(UserClaims::from_token(&token, "wrong-secret").is_err());
    }
}
