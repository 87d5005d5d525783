//! Client for the platform's identity service.
//!
//! The platform fronts every request with a trusted proxy that resolves
//! the session cookie and asserts the caller's identity via headers.
//! Anything without those headers is anonymous. Sign-in and sign-out
//! themselves happen on the platform's own pages; we only build the
//! URLs, carrying the current page in a `continue` parameter.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

pub const USER_ID_HEADER: &str = "x-platform-user-id";
pub const NICKNAME_HEADER: &str = "x-platform-user-nickname";
pub const ADMIN_HEADER: &str = "x-platform-user-admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub nickname: String,
    pub admin: bool,
}

/// The identity slice of a user that entities persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub nickname: String,
}

impl User {
    pub fn author(&self) -> Author {
        Author {
            id: self.id.clone(),
            nickname: self.nickname.clone(),
        }
    }
}

/// Extractor for the identity asserted by the platform proxy, if any.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };

        let user = header(USER_ID_HEADER).map(|id| User {
            nickname: header(NICKNAME_HEADER).unwrap_or_else(|| id.clone()),
            admin: header(ADMIN_HEADER).is_some_and(|value| value == "1"),
            id,
        });

        Ok(CurrentUser(user))
    }
}

#[derive(Debug, Clone)]
pub struct Identity {
    login_base: String,
    logout_base: String,
}

/// The sign-in/sign-out link every page shows in its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLink {
    pub url: String,
    pub label: &'static str,
}

impl Identity {
    pub fn new(login_base: String, logout_base: String) -> Self {
        Self {
            login_base,
            logout_base,
        }
    }

    pub fn login_url(&self, dest: &str) -> String {
        format!("{}?continue={}", self.login_base, encode_component(dest))
    }

    pub fn logout_url(&self, dest: &str) -> String {
        format!("{}?continue={}", self.logout_base, encode_component(dest))
    }

    pub fn session_link(&self, user: Option<&User>, dest: &str) -> SessionLink {
        match user {
            Some(_) => SessionLink {
                url: self.logout_url(dest),
                label: "Logout",
            },
            None => SessionLink {
                url: self.login_url(dest),
                label: "Login",
            },
        }
    }
}

/// Minimal percent-encoding for a query-string component.
pub fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(char::from(b));
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{b:02X}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity::new("/platform/login".to_string(), "/platform/logout".to_string())
    }

    fn user() -> User {
        User {
            id: "u1".to_string(),
            nickname: "ada".to_string(),
            admin: false,
        }
    }

    #[test]
    fn login_url_escapes_the_destination() {
        assert_eq!(
            identity().login_url("/Question_Home?tag=rust&page=2"),
            "/platform/login?continue=%2FQuestion_Home%3Ftag%3Drust%26page%3D2"
        );
    }

    #[test]
    fn session_link_flips_with_sign_in_state() {
        let identity = identity();

        let anon = identity.session_link(None, "/");
        assert_eq!(anon.label, "Login");
        assert!(anon.url.starts_with("/platform/login"));

        let signed_in = identity.session_link(Some(&user()), "/");
        assert_eq!(signed_in.label, "Logout");
        assert!(signed_in.url.starts_with("/platform/logout"));
    }
}
