use std::time::Duration;

use crate::adapters::{Dhis2Auth, Dhis2Client};
use crate::config::Dhis2Config;
use crate::error::{RegistryError, Result};

/// Pick the credentials from config; a token wins over basic auth.
pub fn auth_from_config(cfg: &Dhis2Config) -> Result<Dhis2Auth> {
    if let Some(token) = cfg.api_token.as_deref().filter(|t| !t.trim().is_empty()) {
        return Ok(Dhis2Auth::Token(token.trim().to_string()));
    }

    match (&cfg.username, &cfg.password) {
        (Some(username), Some(password)) => Ok(Dhis2Auth::Basic {
            username: username.clone(),
            password: password.clone(),
        }),
        (None, None) => Ok(Dhis2Auth::None),
        _ => Err(RegistryError::Validation(
            "dhis2.username and dhis2.password must be set together".to_string(),
        )),
    }
}

/// Create the DHIS2 client from `Dhis2Config`.
pub fn build_dhis2_client(cfg: &Dhis2Config) -> Result<Dhis2Client> {
    let auth = auth_from_config(cfg)?;
    Dhis2Client::new(&cfg.base_url, auth, Duration::from_millis(cfg.timeout_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Dhis2Config {
        Dhis2Config {
            base_url: "https://dhis2.example.org".to_string(),
            username: None,
            password: None,
            api_token: None,
            namespace: "trainingAttendants".to_string(),
            timeout_ms: 1000,
        }
    }

    #[test]
    fn token_takes_precedence() {
        let mut c = cfg();
        c.username = Some("admin".into());
        c.password = Some("district".into());
        c.api_token = Some(" d2pat_x ".into());
        assert!(matches!(auth_from_config(&c).unwrap(), Dhis2Auth::Token(t) if t == "d2pat_x"));
    }

    #[test]
    fn half_basic_auth_is_rejected() {
        let mut c = cfg();
        c.username = Some("admin".into());
        assert!(auth_from_config(&c).is_err());
        assert!(matches!(auth_from_config(&cfg()).unwrap(), Dhis2Auth::None));
    }

    #[test]
    fn builds_client_for_base_url() {
        let client = build_dhis2_client(&cfg()).unwrap();
        assert_eq!(client.base_url(), "https://dhis2.example.org");
    }
}
