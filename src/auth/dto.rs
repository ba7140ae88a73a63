use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::User;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub user: User,
}

/// Acknowledgement for registration.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response returned after a profile update.
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: String,
    pub user: User,
}

/// A file pulled out of a multipart field.
#[derive(Debug)]
pub struct UploadedFile {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Target of a multipart field walk; both forms take text fields by wire
/// name and at most one `profilePicture` file.
pub trait MultipartFields: Default {
    /// Store a text field by its wire name. Returns false for unknown names.
    fn set_text(&mut self, name: &str, value: String) -> bool;
    fn set_file(&mut self, file: UploadedFile);
}

/// Text fields collected from the registration multipart form.
/// Everything is optional at parse time; presence is checked afterwards.
#[derive(Debug, Default)]
pub struct RegisterForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name_with_initials: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub experience: Option<String>,
    pub skills: Option<String>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub profile_picture: Option<UploadedFile>,
}

impl MultipartFields for RegisterForm {
    fn set_text(&mut self, name: &str, value: String) -> bool {
        match name {
            "firstName" => self.first_name = Some(value),
            "lastName" => self.last_name = Some(value),
            "nameWithInitials" => self.name_with_initials = Some(value),
            "email" => self.email = Some(value),
            "password" => self.password = Some(value),
            "confirmPassword" => self.confirm_password = Some(value),
            "phoneNumber" => self.phone_number = Some(value),
            "gender" => self.gender = Some(value),
            "experience" => self.experience = Some(value),
            "skills" => self.skills = Some(value),
            "portfolioURL" => self.portfolio_url = Some(value),
            "linkedinURL" => self.linkedin_url = Some(value),
            _ => return false,
        }
        true
    }

    fn set_file(&mut self, file: UploadedFile) {
        self.profile_picture = Some(file);
    }
}

impl RegisterForm {
    /// All fields the flow refuses to proceed without. An empty string is
    /// as absent as a missing field.
    pub fn has_required(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.name_with_initials,
            &self.email,
            &self.password,
            &self.confirm_password,
            &self.phone_number,
            &self.gender,
            &self.experience,
            &self.skills,
        ]
        .iter()
        .all(|f| f.as_deref().is_some_and(|s| !s.is_empty()))
    }
}

/// Text fields collected from the profile-update multipart form.
/// Every field is genuinely optional: absent means keep the current value.
#[derive(Debug, Default)]
pub struct UpdateForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name_with_initials: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub experience: Option<String>,
    pub skills: Option<String>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub profile_picture: Option<UploadedFile>,
}

impl MultipartFields for UpdateForm {
    fn set_text(&mut self, name: &str, value: String) -> bool {
        match name {
            "firstName" => self.first_name = Some(value),
            "lastName" => self.last_name = Some(value),
            "nameWithInitials" => self.name_with_initials = Some(value),
            "phoneNumber" => self.phone_number = Some(value),
            "gender" => self.gender = Some(value),
            "experience" => self.experience = Some(value),
            "skills" => self.skills = Some(value),
            "portfolioURL" => self.portfolio_url = Some(value),
            "linkedinURL" => self.linkedin_url = Some(value),
            _ => return false,
        }
        true
    }

    fn set_file(&mut self, file: UploadedFile) {
        self.profile_picture = Some(file);
    }
}

impl UpdateForm {
    /// Merge into an existing record: present fields overwrite, absent
    /// fields keep what is stored. The picture URL is handled by the
    /// caller since a new file needs an upload first.
    pub fn merge_into(self, mut user: User) -> User {
        if let Some(v) = self.first_name {
            user.first_name = v;
        }
        if let Some(v) = self.last_name {
            user.last_name = v;
        }
        if let Some(v) = self.name_with_initials {
            user.name_with_initials = v;
        }
        if let Some(v) = self.phone_number {
            user.phone_number = v;
        }
        if let Some(v) = self.gender {
            user.gender = v;
        }
        if let Some(v) = self.experience {
            user.experience = v;
        }
        if let Some(v) = self.skills {
            user.skills = v;
        }
        if let Some(v) = self.portfolio_url {
            user.portfolio_url = Some(v);
        }
        if let Some(v) = self.linkedin_url {
            user.linkedin_url = Some(v);
        }
        user
    }
}
