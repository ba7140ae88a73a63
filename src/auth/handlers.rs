use axum::{
    extract::{FromRef, Multipart, State},
    http::StatusCode,
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            LoginRequest, LoginResponse, MessageResponse, MultipartFields, RegisterForm,
            UpdateForm, UpdateResponse, UploadedFile,
        },
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo::is_unique_violation,
        repo_types::{NewUser, User},
    },
    error::ApiError,
    state::AppState,
    uploads::store_profile_picture,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn bad_multipart<E: std::fmt::Display>(e: E) -> ApiError {
    warn!(error = %e, "malformed multipart body");
    ApiError::Validation("Invalid form data".into())
}

async fn collect_form<F: MultipartFields>(mut mp: Multipart) -> Result<F, ApiError> {
    let mut form = F::default();
    while let Some(field) = mp.next_field().await.map_err(bad_multipart)? {
        let name = field.name().map(|s| s.to_string()).unwrap_or_default();
        if name == "profilePicture" {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".into());
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            form.set_file(UploadedFile {
                bytes,
                content_type,
            });
        } else {
            let value = field.text().await.map_err(bad_multipart)?;
            form.set_text(&name, value);
        }
    }
    Ok(form)
}

/// Credential decision for login. Unknown email and wrong password
/// deliberately share one generic outcome.
fn authenticate(candidate: Option<User>, email: &str, password: &str) -> Result<User, ApiError> {
    let user = match candidate {
        Some(u) => u,
        None => {
            warn!(email = %email, "login unknown email");
            return Err(ApiError::BadAuth("Invalid credentials".into()));
        }
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(ApiError::BadAuth("Invalid credentials".into()));
    }

    Ok(user)
}

#[instrument(skip(state, mp))]
pub async fn register(
    State(state): State<AppState>,
    mp: Multipart,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let form: RegisterForm = collect_form(mp).await?;

    if !form.has_required() {
        warn!("registration with missing fields");
        return Err(ApiError::Validation("All fields are required.".into()));
    }

    // Presence just checked
    let password = form.password.unwrap_or_default();
    let confirm_password = form.confirm_password.unwrap_or_default();
    let email = normalize_email(&form.email.unwrap_or_default());

    if password != confirm_password {
        warn!(email = %email, "password confirmation mismatch");
        return Err(ApiError::Validation("Passwords do not match".into()));
    }

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    // Advisory pre-check; the unique index is the real race guard
    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password(&password)?;

    let profile_picture = match form.profile_picture {
        Some(file) => Some(store_profile_picture(&state, file).await?),
        None => None,
    };

    let new = NewUser {
        first_name: form.first_name.unwrap_or_default(),
        last_name: form.last_name.unwrap_or_default(),
        name_with_initials: form.name_with_initials.unwrap_or_default(),
        email,
        password_hash,
        phone_number: form.phone_number.unwrap_or_default(),
        gender: form.gender.unwrap_or_default(),
        experience: form.experience.unwrap_or_default(),
        skills: form.skills.unwrap_or_default(),
        portfolio_url: form.portfolio_url,
        linkedin_url: form.linkedin_url,
        profile_picture,
    };

    let user = match User::create(&state.db, &new).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %new.email, "concurrent registration lost the race");
            return Err(ApiError::Conflict("User already exists".into()));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(ApiError::Internal(e));
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.email = normalize_email(&payload.email);

    let candidate = User::find_by_email(&state.db, &payload.email).await?;
    let user = authenticate(candidate, &payload.email, &payload.password)?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        user,
    }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "profile for vanished user");
            ApiError::NotFound("User not found".into())
        })?;
    Ok(Json(user))
}

#[instrument(skip(state, mp))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mp: Multipart,
) -> Result<Json<UpdateResponse>, ApiError> {
    let mut form: UpdateForm = collect_form(mp).await?;

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    // New file replaces the stored URL; no file keeps it
    let new_picture = match form.profile_picture.take() {
        Some(file) => Some(store_profile_picture(&state, file).await?),
        None => None,
    };

    let mut merged = form.merge_into(user);
    if let Some(url) = new_picture {
        merged.profile_picture = Some(url);
    }

    let updated = User::update_profile(&state.db, &merged).await?;

    info!(user_id = %updated.id, "profile updated");
    Ok(Json(UpdateResponse {
        message: "Profile updated successfully".into(),
        user: updated,
    }))
}
