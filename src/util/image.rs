//! Serving stored image fields.
//!
//! Products, stores, categories, ads and news keep their picture either as a
//! `data:<mime>;base64,<payload>` URI or as a plain URL. Every `/{id}/image`
//! endpoint goes through [`resolve_image`].

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::util::error::HandlerError;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image not found")]
    Missing,
    #[error("Invalid image data")]
    InvalidData,
}

impl From<ImageError> for HandlerError {
    fn from(err: ImageError) -> Self {
        HandlerError::not_found(err.to_string())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ImageSource {
    Inline { content_type: String, bytes: Vec<u8> },
    Remote(String),
}

impl IntoResponse for ImageSource {
    fn into_response(self) -> Response {
        match self {
            ImageSource::Inline { content_type, bytes } => (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
                ],
                bytes,
            )
                .into_response(),
            ImageSource::Remote(url) => (StatusCode::FOUND, [(header::LOCATION, url)]).into_response(),
        }
    }
}

fn is_mime(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '-' || c == '+' || c == '/')
}

/// Interprets a stored image value
pub fn resolve_image(value: Option<&str>) -> Result<ImageSource, ImageError> {
    let value = value.map(str::trim).filter(|v| !v.is_empty()).ok_or(ImageError::Missing)?;

    if let Some(rest) = value.strip_prefix("data:") {
        if let Some((mime, payload)) = rest.split_once(";base64,") {
            if is_mime(mime) {
                let bytes = STANDARD.decode(payload.trim()).map_err(|_| ImageError::InvalidData)?;
                return Ok(ImageSource::Inline { content_type: mime.to_string(), bytes });
            }
        }
    }

    Ok(ImageSource::Remote(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_image() {
        assert_eq!(resolve_image(None), Err(ImageError::Missing));
        assert_eq!(resolve_image(Some("  ")), Err(ImageError::Missing));
    }

    #[test]
    fn test_data_uri_decodes() {
        let source = resolve_image(Some("data:image/png;base64,aGVsbG8=")).unwrap();
        assert_eq!(
            source,
            ImageSource::Inline { content_type: "image/png".into(), bytes: b"hello".to_vec() }
        );
    }

    #[test]
    fn test_svg_mime_with_plus() {
        let source = resolve_image(Some("data:image/svg+xml;base64,PHN2Zy8+")).unwrap();
        assert!(matches!(source, ImageSource::Inline { ref content_type, .. } if content_type == "image/svg+xml"));
    }

    #[test]
    fn test_bad_base64_is_invalid() {
        assert_eq!(resolve_image(Some("data:image/png;base64,@@@")), Err(ImageError::InvalidData));
    }

    #[test]
    fn test_urls_redirect() {
        assert_eq!(
            resolve_image(Some("https://res.cloudinary.com/demo/x.jpg")).unwrap(),
            ImageSource::Remote("https://res.cloudinary.com/demo/x.jpg".into())
        );
    }

    #[test]
    fn test_redirect_response() {
        let response = ImageSource::Remote("https://cdn.example.com/a.png".into()).into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://cdn.example.com/a.png");
    }
}
