use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database. Serialized camelCase on the wire;
/// the password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub name_with_initials: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub password_hash: String,
    pub phone_number: String,
    pub gender: String,
    pub experience: String,
    pub skills: String,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub profile_picture: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Column values for a registration insert.
#[derive(Debug)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub name_with_initials: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub gender: String,
    pub experience: String,
    pub skills: String,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub profile_picture: Option<String>,
}
