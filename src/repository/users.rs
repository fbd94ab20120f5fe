//! Users repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::MembershipType,
        user::{Profile, StaffMember, UpdateProfile, UpdateUser, User, UserQuery},
    },
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by username (for login)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Create a new user with an empty profile
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        membership_type: MembershipType,
        phone_number: Option<&str>,
    ) -> AppResult<User> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        if exists {
            return Err(AppError::Conflict(
                "A user with this username or email already exists".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password, first_name, last_name,
                               membership_type, phone_number, barcode)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .bind(membership_type)
        .bind(phone_number)
        .bind(Uuid::new_v4())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO profiles (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// List users with search and membership filter (admin)
    pub async fn list(&self, query: &UserQuery) -> AppResult<(Vec<User>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let pattern = query.q.as_ref().map(|q| format!("%{}%", q));

        let mut conditions = vec!["TRUE".to_string()];
        let mut idx = 1;
        if pattern.is_some() {
            conditions.push(format!(
                "(username ILIKE ${idx} OR email ILIKE ${idx} OR first_name ILIKE ${idx} OR last_name ILIKE ${idx})"
            ));
            idx += 1;
        }
        if query.membership_type.is_some() {
            conditions.push(format!("membership_type = ${}", idx));
        }
        let where_clause = conditions.join(" AND ");

        let count_q = format!("SELECT COUNT(*) FROM users WHERE {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(ref p) = pattern {
            count_builder = count_builder.bind(p);
        }
        if let Some(m) = query.membership_type {
            count_builder = count_builder.bind(m);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "SELECT * FROM users WHERE {} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, User>(&select_q);
        if let Some(ref p) = pattern {
            builder = builder.bind(p);
        }
        if let Some(m) = query.membership_type {
            builder = builder.bind(m);
        }
        let users = builder.fetch_all(&self.pool).await?;

        Ok((users, total))
    }

    /// Update a user (admin)
    pub async fn update(&self, id: i32, data: &UpdateUser) -> AppResult<User> {
        let current = self.get_by_id(id).await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                email = $2, first_name = $3, last_name = $4, membership_type = $5,
                phone_number = $6, address = $7, is_librarian = $8,
                is_staff_member = $9, is_active = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.email.as_deref().unwrap_or(&current.email))
        .bind(data.first_name.as_ref().or(current.first_name.as_ref()))
        .bind(data.last_name.as_ref().or(current.last_name.as_ref()))
        .bind(data.membership_type.unwrap_or(current.membership_type))
        .bind(data.phone_number.as_ref().or(current.phone_number.as_ref()))
        .bind(data.address.as_ref().or(current.address.as_ref()))
        .bind(data.is_librarian.unwrap_or(current.is_librarian))
        .bind(data.is_staff_member.unwrap_or(current.is_staff_member))
        .bind(data.is_active.unwrap_or(current.is_active))
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get profile for a user, creating an empty one if missing
    pub async fn get_profile(&self, user_id: i32) -> AppResult<Profile> {
        if let Some(profile) =
            sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?
        {
            return Ok(profile);
        }

        let profile = sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (user_id) VALUES ($1) RETURNING *",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }

    /// Update a user's own profile
    pub async fn update_profile(&self, user_id: i32, data: &UpdateProfile) -> AppResult<Profile> {
        let current = self.get_profile(user_id).await?;

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles SET
                bio = $2, department = $3, student_id = $4, staff_id = $5,
                emergency_contact = $6, emergency_phone = $7
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(data.bio.as_ref().or(current.bio.as_ref()))
        .bind(data.department.as_ref().or(current.department.as_ref()))
        .bind(data.student_id.as_ref().or(current.student_id.as_ref()))
        .bind(data.staff_id.as_ref().or(current.staff_id.as_ref()))
        .bind(
            data.emergency_contact
                .as_ref()
                .or(current.emergency_contact.as_ref()),
        )
        .bind(
            data.emergency_phone
                .as_ref()
                .or(current.emergency_phone.as_ref()),
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Active staff directory, ordered for display
    pub async fn list_staff(&self) -> AppResult<Vec<StaffMember>> {
        let staff = sqlx::query_as::<_, StaffMember>(
            r#"
            SELECT s.*, TRIM(CONCAT(u.first_name, ' ', u.last_name)) AS full_name
            FROM staff_members s
            JOIN users u ON u.id = s.user_id
            WHERE s.is_active
            ORDER BY s.display_order, u.last_name, u.first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(staff)
    }

    /// Deactivate a user (soft delete)
    pub async fn deactivate(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }
}
