use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};

const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

/// A one-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub category: FlashLevel,
    pub message: String,
}

fn read(jar: &CookieJar) -> Vec<FlashMessage> {
    jar.get(FLASH_COOKIE)
        .and_then(|c| urlencoding::decode(c.value()).ok())
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

/// Queue a message, keeping any that have not been displayed yet.
pub fn push(jar: CookieJar, category: FlashLevel, message: impl Into<String>) -> CookieJar {
    let mut messages = read(&jar);
    messages.push(FlashMessage { category, message: message.into() });
    let encoded = match serde_json::to_string(&messages) {
        Ok(json) => urlencoding::encode(&json).into_owned(),
        Err(_) => return jar,
    };
    let mut cookie = Cookie::new(FLASH_COOKIE, encoded);
    cookie.set_path("/");
    cookie.set_http_only(true);
    jar.add(cookie)
}

pub fn success(jar: CookieJar, message: impl Into<String>) -> CookieJar {
    push(jar, FlashLevel::Success, message)
}

pub fn error(jar: CookieJar, message: impl Into<String>) -> CookieJar {
    push(jar, FlashLevel::Error, message)
}

/// Drain queued messages; the returned jar clears the cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<FlashMessage>) {
    let messages = read(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, messages);
    }
    let mut removal = Cookie::from(FLASH_COOKIE);
    removal.set_path("/");
    (jar.remove(removal), messages)
}
