use actix_web::cookie::{time::Duration, Cookie, SameSite};

use crate::entities::token::SessionToken;
use crate::settings::AppConfig;

/// Attributes of the auth cookie for this deployment.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookieSettings {
    /// Cookie carrying a freshly minted session token. Max-Age tracks the
    /// token expiry.
    pub fn session_cookie(&self, token: &SessionToken) -> Cookie<'static> {
        let max_age = (token.expires_at - token.issued_at).num_seconds().max(0);

        let mut builder = Cookie::build(self.name.clone(), token.value.clone())
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(Duration::seconds(max_age));

        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        builder.finish()
    }

    /// Empty, already expired cookie that makes the browser drop the session.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut builder = Cookie::build(self.name.clone(), "")
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site);

        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }

        let mut cookie = builder.finish();
        cookie.make_removal();
        cookie
    }
}

fn parse_same_site(value: &str) -> SameSite {
    match value.to_lowercase().as_str() {
        "strict" => SameSite::Strict,
        "none" => SameSite::None,
        _ => SameSite::Lax,
    }
}

impl From<&AppConfig> for CookieSettings {
    fn from(config: &AppConfig) -> Self {
        CookieSettings {
            name: config.cookie_name.clone(),
            domain: config.cookie_domain.clone().filter(|d| !d.trim().is_empty()),
            secure: config.cookie_secure(),
            same_site: parse_same_site(&config.cookie_same_site),
        }
    }
}
