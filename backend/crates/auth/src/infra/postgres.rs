//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::entity::{
    password_recovery_token::{NewPasswordRecoveryToken, PasswordRecoveryToken},
    role::Role,
    user::{NewUser, User},
};
use crate::domain::repository::{
    PageRequest, PasswordRecoveryTokenRepository, RoleRepository, TransactionManager,
    UserRepository,
};
use crate::domain::value_object::{
    email::Email,
    ids::{RecoveryTokenId, RoleId, UserId},
    role_name::RoleName,
    user_name::UserName,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// Users joined with their role; `$where` is appended verbatim.
macro_rules! select_user {
    ($where:literal) => {
        concat!(
            r#"
            SELECT
                u.id,
                u.username,
                u.email,
                u.password_hash,
                u.is_blocked,
                u.role_id,
                r.name AS role_name,
                u.created_at,
                u.updated_at
            FROM users u
            JOIN roles r ON r.id = u.role_id
            "#,
            $where
        )
    };
}

/// Recovery tokens joined with their user and role.
macro_rules! select_token {
    ($where:literal) => {
        concat!(
            r#"
            SELECT
                t.id AS token_id,
                t.token,
                t.created_at AS token_created_at,
                t.updated_at AS token_updated_at,
                u.id,
                u.username,
                u.email,
                u.password_hash,
                u.is_blocked,
                u.role_id,
                r.name AS role_name,
                u.created_at,
                u.updated_at
            FROM password_recovery_tokens t
            JOIN users u ON u.id = t.user_id
            JOIN roles r ON r.id = u.role_id
            "#,
            $where
        )
    };
}

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique violations on `users` become a `Conflict` naming the field.
fn map_user_write_error(e: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let message = match db.constraint() {
                Some("users_username_key") => "Username already taken",
                Some("users_email_key") => "Email already registered",
                _ => "User already exists",
            };
            return AuthError::Conflict(message.to_string());
        }
    }
    AuthError::Database(e)
}

// ============================================================================
// Transaction Manager
// ============================================================================

impl TransactionManager for PgAuthRepository {
    type Tx = Transaction<'static, Postgres>;

    async fn begin(&self) -> AuthResult<Self::Tx> {
        Ok(self.pool.begin().await?)
    }

    async fn commit(&self, tx: Self::Tx) -> AuthResult<()> {
        Ok(tx.commit().await?)
    }

    async fn rollback(&self, tx: Self::Tx) -> AuthResult<()> {
        Ok(tx.rollback().await?)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, tx: &mut Self::Tx, user: &NewUser) -> AuthResult<User> {
        let (id, created_at, updated_at) =
            sqlx::query_as::<_, (i64, DateTime<Utc>, DateTime<Utc>)>(
                r#"
                INSERT INTO users (username, email, password_hash, is_blocked, role_id)
                VALUES ($1, $2, $3, FALSE, $4)
                RETURNING id, created_at, updated_at
                "#,
            )
            .bind(user.username.as_str())
            .bind(user.email.as_str())
            .bind(user.password.as_phc_string())
            .bind(user.role.id().value())
            .fetch_one(&mut **tx)
            .await
            .map_err(map_user_write_error)?;

        Ok(User {
            id: UserId::new(id),
            username: user.username.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            is_blocked: false,
            role: user.role,
            created_at,
            updated_at,
        })
    }

    async fn save(&self, tx: &mut Self::Tx, user: &User) -> AuthResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE users SET
                username = $2,
                email = $3,
                password_hash = $4,
                is_blocked = $5,
                role_id = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(user.id.value())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password.as_phc_string())
        .bind(user.is_blocked)
        .bind(user.role.id().value())
        .bind(user.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(map_user_write_error)?
        .rows_affected();

        if updated == 0 {
            return Err(AuthError::NotFound("User"));
        }
        Ok(())
    }

    async fn get_by_email(&self, tx: &mut Self::Tx, email: &Email) -> AuthResult<User> {
        sqlx::query_as::<_, UserRow>(select_user!("WHERE u.email = $1"))
            .bind(email.as_str())
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(AuthError::NotFound("User"))?
            .into_user()
    }

    async fn get_by_username(&self, tx: &mut Self::Tx, username: &UserName) -> AuthResult<User> {
        sqlx::query_as::<_, UserRow>(select_user!("WHERE u.username = $1"))
            .bind(username.as_str())
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(AuthError::NotFound("User"))?
            .into_user()
    }

    async fn get_by_id(&self, tx: &mut Self::Tx, id: UserId) -> AuthResult<User> {
        sqlx::query_as::<_, UserRow>(select_user!("WHERE u.id = $1"))
            .bind(id.value())
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(AuthError::NotFound("User"))?
            .into_user()
    }

    async fn get_by_id_for_update(&self, tx: &mut Self::Tx, id: UserId) -> AuthResult<User> {
        sqlx::query_as::<_, UserRow>(select_user!("WHERE u.id = $1 FOR UPDATE OF u"))
            .bind(id.value())
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(AuthError::NotFound("User"))?
            .into_user()
    }

    async fn list_by_role(
        &self,
        tx: &mut Self::Tx,
        role: RoleName,
        page: PageRequest,
    ) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(select_user!(
            "WHERE r.name = $1 ORDER BY u.id LIMIT $2 OFFSET $3"
        ))
        .bind(role.code())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&mut **tx)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }
}

// ============================================================================
// Role Repository Implementation
// ============================================================================

impl RoleRepository for PgAuthRepository {
    async fn get_by_name(&self, tx: &mut Self::Tx, name: RoleName) -> AuthResult<Role> {
        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM roles WHERE name = $1")
            .bind(name.code())
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(AuthError::NotFound("Role"))?;

        Ok(Role::new(RoleId::new(id), name))
    }
}

// ============================================================================
// Password Recovery Token Repository Implementation
// ============================================================================

impl PasswordRecoveryTokenRepository for PgAuthRepository {
    async fn create(
        &self,
        tx: &mut Self::Tx,
        token: &NewPasswordRecoveryToken,
    ) -> AuthResult<PasswordRecoveryToken> {
        // DO NOTHING keeps the transaction usable for the caller's re-read.
        let inserted = sqlx::query_as::<_, (i64,)>(
            r#"
            INSERT INTO password_recovery_tokens (token, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&token.token)
        .bind(token.user_id.value())
        .fetch_optional(&mut **tx)
        .await?;

        let Some((id,)) = inserted else {
            return Err(AuthError::Conflict(
                "Recovery token already exists".to_string(),
            ));
        };

        sqlx::query_as::<_, TokenRow>(select_token!("WHERE t.id = $1"))
            .bind(id)
            .fetch_one(&mut **tx)
            .await?
            .into_token()
    }

    async fn save(&self, tx: &mut Self::Tx, token: &PasswordRecoveryToken) -> AuthResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE password_recovery_tokens SET
                token = $2,
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(token.id.value())
        .bind(&token.token)
        .bind(token.updated_at)
        .execute(&mut **tx)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AuthError::NotFound("Recovery token"));
        }
        Ok(())
    }

    async fn get_by_token(
        &self,
        tx: &mut Self::Tx,
        token: &str,
    ) -> AuthResult<Option<PasswordRecoveryToken>> {
        // Concurrent consumers of the same token queue here; the loser sees
        // the row gone once the winner commits.
        sqlx::query_as::<_, TokenRow>(select_token!("WHERE t.token = $1 FOR UPDATE OF t, u"))
            .bind(token)
            .fetch_optional(&mut **tx)
            .await?
            .map(TokenRow::into_token)
            .transpose()
    }

    async fn get_by_user_id(
        &self,
        tx: &mut Self::Tx,
        user_id: UserId,
    ) -> AuthResult<Option<PasswordRecoveryToken>> {
        sqlx::query_as::<_, TokenRow>(select_token!("WHERE t.user_id = $1"))
            .bind(user_id.value())
            .fetch_optional(&mut **tx)
            .await?
            .map(TokenRow::into_token)
            .transpose()
    }

    async fn delete(&self, tx: &mut Self::Tx, token: &PasswordRecoveryToken) -> AuthResult<()> {
        let deleted = sqlx::query("DELETE FROM password_recovery_tokens WHERE id = $1")
            .bind(token.id.value())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(AuthError::NotFound("Recovery token"));
        }
        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    is_blocked: bool,
    role_id: i64,
    role_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let username = UserName::new(self.username)
            .map_err(|e| AuthError::Internal(format!("Invalid username in database: {e}")))?;
        let email = Email::new(self.email)
            .map_err(|e| AuthError::Internal(format!("Invalid email in database: {e}")))?;
        let role_name = RoleName::from_code(&self.role_name).ok_or_else(|| {
            AuthError::Internal(format!("Unknown role in database: {}", self.role_name))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            username,
            email,
            password: UserPassword::from_phc_string(self.password_hash)?,
            is_blocked: self.is_blocked,
            role: Role::new(RoleId::new(self.role_id), role_name),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TokenRow {
    token_id: i64,
    token: String,
    token_created_at: DateTime<Utc>,
    token_updated_at: DateTime<Utc>,
    #[sqlx(flatten)]
    user: UserRow,
}

impl TokenRow {
    fn into_token(self) -> AuthResult<PasswordRecoveryToken> {
        Ok(PasswordRecoveryToken {
            id: RecoveryTokenId::new(self.token_id),
            token: self.token,
            user: self.user.into_user()?,
            created_at: self.token_created_at,
            updated_at: self.token_updated_at,
        })
    }
}
