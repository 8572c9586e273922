use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::domain::Password;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("no session token found in login page")]
    MissingToken,
}

static INPUT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<input\b[^>]*>").expect("valid input pattern"));

/// Hidden form field carrying the token on HTML-only firmware.
static TOKEN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\sname\s*=\s*["']token["']"#).expect("valid name pattern")
});

static INPUT_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\svalue\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid value pattern")
});

#[derive(Debug, Deserialize)]
struct LoginJsonPage {
    #[serde(default)]
    session: Option<LoginJsonSession>,
}

#[derive(Debug, Deserialize)]
struct LoginJsonSession {
    #[serde(rename = "secToken", default)]
    sec_token: Option<String>,
}

/// Pull the session token out of a login page.
///
/// JSON firmware returns `{"session": {"secToken": "..."}}`; older firmware
/// embeds `<input type="hidden" name="token" value="...">` in HTML. Both are
/// tried, JSON first.
pub fn extract_token(body: &str) -> Result<String, TransportError> {
    if let Ok(page) = serde_json::from_str::<LoginJsonPage>(body) {
        if let Some(token) = page
            .session
            .and_then(|session| session.sec_token)
            .filter(|token| !token.is_empty())
        {
            return Ok(token);
        }
    }

    INPUT_TAG
        .find_iter(body)
        .map(|tag| tag.as_str())
        .find(|tag| TOKEN_NAME.is_match(tag))
        .and_then(|tag| INPUT_VALUE.captures(tag))
        .and_then(|captures| captures.get(1).or_else(|| captures.get(2)))
        .map(|token| token.as_str().to_owned())
        .filter(|token| !token.is_empty())
        .ok_or(TransportError::MissingToken)
}

pub fn encode_login_form(password: &Password, token: &str) -> Vec<(String, String)> {
    vec![
        (Password::FIELD.to_owned(), password.as_str().to_owned()),
        ("token".to_owned(), token.to_owned()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token_from_json_page() {
        let body = r#"{"session":{"secToken":"abc123","userRole":"Guest"},"general":{}}"#;
        assert_eq!(extract_token(body).unwrap(), "abc123");
    }

    #[test]
    fn extracts_token_from_html_form() {
        let body = r#"
        <form action="/Forms/config" method="post">
          <input type="hidden" name="token" value="f00d" />
          <input type="password" name="session.password" />
        </form>
        "#;
        assert_eq!(extract_token(body).unwrap(), "f00d");
    }

    #[test]
    fn html_token_in_any_attribute_order_or_quote_style() {
        let pages = [
            (r#"<input type="hidden" value="v1" name="token">"#, "v1"),
            (r#"<input type='hidden' name='token' value='v2'>"#, "v2"),
            (r#"<input name="token" type="hidden" value="v3">"#, "v3"),
            (r#"<INPUT TYPE="hidden" NAME = "token" VALUE = 'v4'/>"#, "v4"),
        ];
        for (body, token) in pages {
            assert_eq!(extract_token(body).unwrap(), token, "{body}");
        }
    }

    #[test]
    fn html_token_is_read_from_the_token_input_only() {
        let body = r#"
        <input type="text" name="user" value="admin">
        <input type="hidden" data-value="x" value="right" name="token">
        "#;
        assert_eq!(extract_token(body).unwrap(), "right");
    }

    #[test]
    fn missing_token_is_an_error() {
        assert!(matches!(
            extract_token(r#"{"session":{}}"#),
            Err(TransportError::MissingToken)
        ));
        assert!(matches!(
            extract_token(r#"{"session":{"secToken":""}}"#),
            Err(TransportError::MissingToken)
        ));
        assert!(matches!(
            extract_token("<html></html>"),
            Err(TransportError::MissingToken)
        ));
        assert!(matches!(
            extract_token(r#"<input name="tokens" value="nope">"#),
            Err(TransportError::MissingToken)
        ));
    }

    #[test]
    fn login_form_carries_password_and_token() {
        let password = Password::new("secret").unwrap();
        assert_eq!(
            encode_login_form(&password, "abc"),
            vec![
                ("session.password".to_owned(), "secret".to_owned()),
                ("token".to_owned(), "abc".to_owned()),
            ]
        );
    }
}
