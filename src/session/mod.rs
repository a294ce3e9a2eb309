//! Session management and the SSO login handshake
//!
//! The forum delegates login to an external Keycloak authority. The handshake
//! loads the forum's login entry point, follows the redirect chain to the SSO
//! form, submits credentials to the form action together with its hidden
//! fields, and follows the redirects back to the forum. Any failure along the
//! way degrades to an anonymous session; public content must remain readable
//! either way.

use crate::config::Config;
use crate::HarvestError;
use reqwest::{redirect::Policy, Client};
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// Path of the forum's login entry point, relative to the base URL
const LOGIN_PATH: &str = "/ucp.php?mode=login&redirect=index.php";

/// Markers proving an authenticated session on any forum page
const LOGOUT_MARKERS: &[&str] = &["Logout", "Odhlásit se"];

/// Authenticated (or anonymous-fallback) request context
///
/// Owns the cookie-bearing HTTP client; every outbound request of the run
/// goes through this context so the session cookies ride along. Created once
/// at startup, read-only afterwards.
#[derive(Debug, Clone)]
pub struct SessionContext {
    client: Client,

    /// Whether the login handshake completed and was verified
    pub authenticated: bool,
}

impl SessionContext {
    fn new(client: Client, authenticated: bool) -> Self {
        Self {
            client,
            authenticated,
        }
    }

    /// Wraps a client in an unauthenticated context, skipping the handshake
    pub fn anonymous(client: Client) -> Self {
        Self::new(client, false)
    }

    /// Issues a GET request through the session's client
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.client.get(url).send().await
    }
}

/// Builds the HTTP client used for the whole run
///
/// Redirects are followed automatically (the SSO handshake is a redirect
/// chain) and cookies are kept in the client's jar so the session survives
/// the hop back from the SSO authority.
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs the login handshake and returns the session context
///
/// The handshake never fails the run: every error path logs a warning and
/// falls back to an anonymous context. Only failure to construct the HTTP
/// client itself is fatal, since nothing can be fetched without it. Empty
/// credentials skip the handshake entirely.
pub async fn login(config: &Config) -> Result<SessionContext, HarvestError> {
    let client = build_http_client(&config.forum.user_agent)?;

    if config.credentials.username.is_empty() || config.credentials.password.is_empty() {
        tracing::info!("No credentials configured, scraping anonymously");
        return Ok(SessionContext::new(client, false));
    }

    tracing::info!(
        "Attempting to log in as {}",
        config.credentials.username
    );

    let login_url = format!("{}{}", config.forum.base_url, LOGIN_PATH);
    let response = match client.get(&login_url).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("Failed to load login page: {}", e);
            return Ok(SessionContext::new(client, false));
        }
    };

    // The redirect chain may have landed on the SSO authority; form actions
    // resolve against the final URL, not the one we asked for.
    let final_url = response.url().clone();
    let body = match response.text().await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("Failed to read login page: {}", e);
            return Ok(SessionContext::new(client, false));
        }
    };

    let form = match extract_sso_form(&body) {
        Some(f) => f,
        None => {
            tracing::warn!("SSO login form not found on {}", final_url);
            return Ok(SessionContext::new(client, false));
        }
    };

    let action_url = match final_url.join(&form.action) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!("Malformed SSO form action '{}': {}", form.action, e);
            return Ok(SessionContext::new(client, false));
        }
    };

    let mut params = form.hidden_fields;
    params.push(("username".to_string(), config.credentials.username.clone()));
    params.push(("password".to_string(), config.credentials.password.clone()));

    tracing::debug!("Submitting credentials to {}", action_url);
    if let Err(e) = client.post(action_url).form(&params).send().await {
        tracing::warn!("Failed to submit credentials: {}", e);
        return Ok(SessionContext::new(client, false));
    }

    let authenticated = verify_login(&client, &config.forum.base_url).await;
    if authenticated {
        tracing::info!("Login successful");
    } else {
        tracing::warn!("Login could not be verified, continuing anonymously");
    }

    Ok(SessionContext::new(client, authenticated))
}

/// The SSO form's action and hidden inputs, extracted from the login page
#[derive(Debug, Clone, PartialEq, Eq)]
struct SsoForm {
    action: String,
    hidden_fields: Vec<(String, String)>,
}

/// Locates the Keycloak login form and collects its hidden fields
fn extract_sso_form(html: &str) -> Option<SsoForm> {
    let document = Html::parse_document(html);

    let form_selector = Selector::parse("form#kc-form-login").ok()?;
    let hidden_selector = Selector::parse(r#"input[type="hidden"]"#).ok()?;

    let form = document.select(&form_selector).next()?;
    let action = form.value().attr("action")?.to_string();

    let hidden_fields = form
        .select(&hidden_selector)
        .filter_map(|input| {
            let name = input.value().attr("name")?;
            let value = input.value().attr("value").unwrap_or("");
            Some((name.to_string(), value.to_string()))
        })
        .collect();

    Some(SsoForm {
        action,
        hidden_fields,
    })
}

/// Probes the forum index for a logout marker to confirm the session
async fn verify_login(client: &Client, base_url: &str) -> bool {
    let probe_url = format!("{}/index.php", base_url);
    let body = match client.get(&probe_url).send().await {
        Ok(r) => match r.text().await {
            Ok(b) => b,
            Err(_) => return false,
        },
        Err(_) => return false,
    };

    LOGOUT_MARKERS.iter().any(|marker| body.contains(marker))
}
