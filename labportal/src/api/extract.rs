//! Extractors used by the handlers.
//!
//! The axum built-ins reject with plain-text bodies; the wrappers here convert rejections into
//! [`Error`] so every failure has the `{"error": ...}` shape.

use axum::{
    extract::{FromRequest, FromRequestParts, Multipart, Request, multipart::MultipartError},
    http::{StatusCode, header::CONTENT_TYPE},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::debug;

use crate::api::models::developers::{DeveloperUpdate, DeveloperUpdateCommand};
use crate::errors::{Error, Result};

/// `axum::Json` with rejections mapped to [`Error`]
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Path` with rejections mapped to [`Error`]
#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct PathParam<T>(pub T);

/// `axum::extract::Query` with rejections mapped to [`Error`]
#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct QueryParams<T>(pub T);

/// Multipart field carrying the profile picture
const PROFILE_IMAGE_FIELD: &str = "profileImage";

/// An uploaded image, before encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Developer update sent as `multipart/form-data`
#[derive(Debug, Clone, Default)]
pub struct DeveloperUpdateForm {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
    pub profile_image: Option<ImageUpload>,
}

impl From<DeveloperUpdateForm> for DeveloperUpdateCommand {
    fn from(form: DeveloperUpdateForm) -> Self {
        Self {
            name: form.name,
            last_name: form.last_name,
            email: form.email,
            role: form.role,
            password: form.password,
            profile_image: form.profile_image.as_ref().map(ImageUpload::to_data_url),
        }
    }
}

/// A developer update body, chosen by `Content-Type`.
#[derive(Debug, Clone)]
pub enum DeveloperUpdatePayload {
    Json(DeveloperUpdate),
    Multipart(DeveloperUpdateForm),
}

impl DeveloperUpdatePayload {
    pub fn into_command(self) -> DeveloperUpdateCommand {
        match self {
            DeveloperUpdatePayload::Json(update) => update.into(),
            DeveloperUpdatePayload::Multipart(form) => form.into(),
        }
    }
}

impl<S> FromRequest<S> for DeveloperUpdatePayload
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let JsonBody(update) = JsonBody::<DeveloperUpdate>::from_request(req, state).await?;
            Ok(DeveloperUpdatePayload::Json(update))
        } else if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await.map_err(|e| Error::bad_request(e.body_text()))?;
            Ok(DeveloperUpdatePayload::Multipart(read_update_form(multipart).await?))
        } else {
            Err(Error::bad_request("Expected an application/json or multipart/form-data body"))
        }
    }
}

fn multipart_error(err: MultipartError) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Error::PayloadTooLarge;
    }
    Error::bad_request(err.body_text())
}

/// The part's declared type, or a guess from its file name when the client sent none
fn image_mime(declared: Option<&str>, file_name: Option<&str>) -> Option<String> {
    let declared = declared.filter(|m| !m.is_empty() && *m != "application/octet-stream");
    let mime = match declared {
        Some(mime) => mime.to_ascii_lowercase(),
        None => mime_guess::from_path(file_name?).first()?.essence_str().to_string(),
    };
    mime.starts_with("image/").then_some(mime)
}

async fn read_update_form(mut multipart: Multipart) -> Result<DeveloperUpdateForm> {
    let mut form = DeveloperUpdateForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == PROFILE_IMAGE_FIELD {
            let declared = field.content_type().map(str::to_string);
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;
            // Browsers send an empty part when no file was picked
            if bytes.is_empty() {
                continue;
            }
            let mime = image_mime(declared.as_deref(), file_name.as_deref())
                .ok_or_else(|| Error::bad_request("Profile image must be an image"))?;
            debug!(mime = %mime, size = bytes.len(), "Received profile image");
            form.profile_image = Some(ImageUpload { mime, bytes: bytes.to_vec() });
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "name" => form.name = Some(value),
            "lastName" => form.last_name = Some(value),
            "email" => form.email = Some(value),
            "role" => form.role = Some(value),
            "password" => form.password = Some(value),
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_mime_prefers_declared_type() {
        assert_eq!(image_mime(Some("image/png"), Some("me.jpg")).as_deref(), Some("image/png"));
        assert_eq!(image_mime(Some("text/plain"), Some("me.png")), None);
    }

    #[test]
    fn test_image_mime_guesses_from_file_name() {
        assert_eq!(image_mime(None, Some("me.jpg")).as_deref(), Some("image/jpeg"));
        assert_eq!(image_mime(Some("application/octet-stream"), Some("me.gif")).as_deref(), Some("image/gif"));
        assert_eq!(image_mime(None, Some("notes.txt")), None);
        assert_eq!(image_mime(None, None), None);
    }

    #[test]
    fn test_data_url_encoding() {
        let upload = ImageUpload {
            mime: "image/png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        };
        assert_eq!(upload.to_data_url(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_form_merges_into_command() {
        let form = DeveloperUpdateForm {
            name: Some("Ann".to_string()),
            profile_image: Some(ImageUpload {
                mime: "image/gif".to_string(),
                bytes: b"GIF89a".to_vec(),
            }),
            ..Default::default()
        };

        let command = DeveloperUpdatePayload::Multipart(form).into_command();
        assert_eq!(command.name.as_deref(), Some("Ann"));
        assert_eq!(command.profile_image.as_deref(), Some("data:image/gif;base64,R0lGODlh"));
        assert!(command.email.is_none());
    }
}
