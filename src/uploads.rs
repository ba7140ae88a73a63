use anyhow::Context;
use uuid::Uuid;

use crate::auth::dto::UploadedFile;
use crate::state::AppState;

/// Push a profile picture to the image host and return its public URL.
/// Failures propagate; the calling flow aborts rather than continuing
/// with a silently missing image.
pub async fn store_profile_picture(st: &AppState, file: UploadedFile) -> anyhow::Result<String> {
    let ext = ext_from_mime(&file.content_type).unwrap_or("bin");
    let key = format!("profiles/{}.{}", Uuid::new_v4(), ext);
    st.storage
        .upload(&key, file.bytes, &file.content_type)
        .await
        .with_context(|| format!("upload {}", key))
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
        assert_eq!(ext_from_mime("whatever/else"), None);
    }

    #[tokio::test]
    async fn store_returns_public_url_with_extension() {
        let state = AppState::fake();
        let url = store_profile_picture(
            &state,
            UploadedFile {
                bytes: Bytes::from_static(b"fake image"),
                content_type: "image/png".into(),
            },
        )
        .await
        .unwrap();
        assert!(url.starts_with("https://fake.local/profiles/"));
        assert!(url.ends_with(".png"));
    }
}
