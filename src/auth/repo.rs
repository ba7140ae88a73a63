use crate::auth::repo_types::{NewUser, User};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, first_name, last_name, name_with_initials, email, password_hash, \
     phone_number, gender, experience, skills, portfolio_url, linkedin_url, \
     profile_picture, created_at";

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by id.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Insert a new user. The unique index on email is the real guard
    /// against a concurrent registration slipping past the pre-check;
    /// callers map that violation with [`is_unique_violation`].
    pub async fn create(db: &PgPool, new: &NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (first_name, last_name, name_with_initials, email, \
                 password_hash, phone_number, gender, experience, skills, \
                 portfolio_url, linkedin_url, profile_picture) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.name_with_initials)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.phone_number)
        .bind(&new.gender)
        .bind(&new.experience)
        .bind(&new.skills)
        .bind(&new.portfolio_url)
        .bind(&new.linkedin_url)
        .bind(&new.profile_picture)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Write back the mutable profile columns of an already-merged record.
    pub async fn update_profile(db: &PgPool, user: &User) -> anyhow::Result<User> {
        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET first_name = $2, last_name = $3, name_with_initials = $4, \
                 phone_number = $5, gender = $6, experience = $7, skills = $8, \
                 portfolio_url = $9, linkedin_url = $10, profile_picture = $11 \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.name_with_initials)
        .bind(&user.phone_number)
        .bind(&user.gender)
        .bind(&user.experience)
        .bind(&user.skills)
        .bind(&user.portfolio_url)
        .bind(&user.linkedin_url)
        .bind(&user.profile_picture)
        .fetch_one(db)
        .await?;
        Ok(updated)
    }
}

/// True when an insert failed on the users.email unique index.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|d| d.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};

    #[derive(Debug)]
    struct StubDbError {
        unique: bool,
    }

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint \"users_email_key\"")
        }
    }

    impl std::error::Error for StubDbError {}

    impl DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"users_email_key\""
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::Other
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    fn db_error(unique: bool) -> anyhow::Error {
        anyhow::Error::from(sqlx::Error::Database(Box::new(StubDbError { unique })))
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        assert!(is_unique_violation(&db_error(true)));
    }

    #[test]
    fn other_failures_are_not_conflicts() {
        assert!(!is_unique_violation(&db_error(false)));
        assert!(!is_unique_violation(&anyhow::anyhow!("connection reset")));
    }
}
