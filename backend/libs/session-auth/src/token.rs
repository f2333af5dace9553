use actix_web::HttpRequest;

/// Cookie names written by the sign-in provider (plain and `__Secure-` prefixed).
pub const DEFAULT_SESSION_COOKIES: [&str; 2] = [
    "next-auth.session-token",
    "__Secure-next-auth.session-token",
];

/// Where to look for the session token on an incoming request
#[derive(Debug, Clone)]
pub struct TokenSource {
    cookie_names: Vec<String>,
}

impl Default for TokenSource {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_COOKIES.iter().map(|s| s.to_string()).collect())
    }
}

impl TokenSource {
    pub fn new(cookie_names: Vec<String>) -> Self {
        Self { cookie_names }
    }

    pub fn cookie_names(&self) -> &[String] {
        &self.cookie_names
    }

    /// Session cookie first, then `Authorization: Bearer`.
    pub fn extract(&self, req: &HttpRequest) -> Option<String> {
        for name in &self.cookie_names {
            if let Some(cookie) = req.cookie(name) {
                let value = cookie.value().trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }

        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    #[test]
    fn test_extracts_default_cookie() {
        let req = TestRequest::default()
            .cookie(Cookie::new("next-auth.session-token", "abc"))
            .to_http_request();

        assert_eq!(TokenSource::default().extract(&req), Some("abc".to_string()));
    }

    #[test]
    fn test_extracts_secure_cookie() {
        let req = TestRequest::default()
            .cookie(Cookie::new("__Secure-next-auth.session-token", "secure"))
            .to_http_request();

        assert_eq!(
            TokenSource::default().extract(&req),
            Some("secure".to_string())
        );
    }

    #[test]
    fn test_cookie_wins_over_bearer() {
        let req = TestRequest::default()
            .cookie(Cookie::new("next-auth.session-token", "from-cookie"))
            .insert_header(("Authorization", "Bearer from-header"))
            .to_http_request();

        assert_eq!(
            TokenSource::default().extract(&req),
            Some("from-cookie".to_string())
        );
    }

    #[test]
    fn test_falls_back_to_bearer() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer tok"))
            .to_http_request();

        assert_eq!(TokenSource::default().extract(&req), Some("tok".to_string()));
    }

    #[test]
    fn test_rejects_other_schemes_and_blank_tokens() {
        let basic = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_http_request();
        let blank = TestRequest::default()
            .insert_header(("Authorization", "Bearer   "))
            .to_http_request();

        assert_eq!(TokenSource::default().extract(&basic), None);
        assert_eq!(TokenSource::default().extract(&blank), None);
    }

    #[test]
    fn test_custom_cookie_names() {
        let source = TokenSource::new(vec!["sid".to_string()]);
        let req = TestRequest::default()
            .cookie(Cookie::new("next-auth.session-token", "ignored"))
            .cookie(Cookie::new("sid", "custom"))
            .to_http_request();

        assert_eq!(source.extract(&req), Some("custom".to_string()));
    }
}
