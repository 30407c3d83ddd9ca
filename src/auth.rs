use std::fmt;

/// Query parameter carrying Firebase ID tokens and legacy database secrets.
pub(crate) const AUTH_PARAM: &str = "auth";
/// Query parameter carrying Google OAuth2 access tokens.
pub(crate) const ACCESS_TOKEN_PARAM: &str = "access_token";

#[derive(Clone, Default, Eq, PartialEq)]
pub struct SecretString(String);

impl SecretString {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// How requests are authorized. The REST API takes credentials in the query
/// string rather than in a header.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Auth {
    /// `?auth=<token>`: a Firebase ID token or a legacy database secret.
    Token { token: SecretString },
    /// `?access_token=<token>`: a Google OAuth2 access token.
    AccessToken { token: SecretString },
}

impl Auth {
    #[must_use]
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token {
            token: SecretString::new(token),
        }
    }

    #[must_use]
    pub fn access_token(token: impl Into<String>) -> Self {
        Self::AccessToken {
            token: SecretString::new(token),
        }
    }

    pub(crate) fn secrets(&self) -> Vec<&str> {
        match self {
            Self::Token { token } | Self::AccessToken { token } => vec![token.expose()],
        }
    }

    fn param(&self) -> (&'static str, &SecretString) {
        match self {
            Self::Token { token } => (AUTH_PARAM, token),
            Self::AccessToken { token } => (ACCESS_TOKEN_PARAM, token),
        }
    }

    /// Append the credential to `query`, replacing any credential pair already
    /// present.
    pub(crate) fn apply(&self, query: &mut Vec<(String, String)>) {
        query.retain(|(key, _)| key != AUTH_PARAM && key != ACCESS_TOKEN_PARAM);
        let (name, token) = self.param();
        query.push((name.to_owned(), token.expose().to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_replaces_existing_credentials() {
        let mut query = vec![
            ("print".to_owned(), "pretty".to_owned()),
            ("auth".to_owned(), "stale".to_owned()),
        ];
        Auth::access_token("ya29.fresh").apply(&mut query);
        assert_eq!(
            query,
            vec![
                ("print".to_owned(), "pretty".to_owned()),
                ("access_token".to_owned(), "ya29.fresh".to_owned()),
            ]
        );
    }

    #[test]
    fn debug_output_hides_token() {
        let auth = Auth::token("s3cr3t");
        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("<redacted>"));
    }
}
