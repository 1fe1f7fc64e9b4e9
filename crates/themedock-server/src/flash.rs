//! One-shot flash messages carried across a redirect in a cookie.

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub message: String,
    #[serde(rename = "alert-type")]
    pub alert_type: AlertType,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            alert_type: AlertType::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            alert_type: AlertType::Error,
        }
    }

    fn to_cookie(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(json) => Some(format!(
                "{FLASH_COOKIE}={}; Path=/; Max-Age=60; HttpOnly; SameSite=Lax",
                urlencoding::encode(&json)
            )),
            Err(e) => {
                tracing::error!("failed to encode flash message: {e}");
                None
            }
        }
    }
}

/// `303 See Other` to `location` carrying `flash`.
pub fn redirect_with_flash(location: &str, flash: Flash) -> Response {
    let mut response = (StatusCode::SEE_OTHER, [(header::LOCATION, location.to_string())])
        .into_response();
    if let Some(cookie) = flash.to_cookie() {
        if let Ok(value) = cookie.parse() {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    response
}

/// Value of cookie `name` from the request, URL-decoded.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .and_then(|(_, v)| urlencoding::decode(v).ok())
        .map(|v| v.into_owned())
}

/// Pending flash message of the request, if any.
pub fn take_flash(headers: &HeaderMap) -> Option<Flash> {
    let raw = cookie_value(headers, FLASH_COOKIE)?;
    serde_json::from_str(&raw).ok()
}

/// `Set-Cookie` value that expires the flash cookie.
pub fn clear_flash_cookie() -> String {
    format!("{FLASH_COOKIE}=; Path=/; Max-Age=0")
}
