//! Authenticated session with the student portal.
//!
//! The portal uses a classic form login: the login page carries a one-time
//! `logintoken` input that must be posted back together with the
//! credentials. The session cookie is kept in the client's cookie store.

use std::sync::LazyLock;

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::config::PortalConfig;
use crate::error::{SyncError, SyncResult};

static LOGIN_TOKEN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"input[name="logintoken"]"#).unwrap());
static LOGIN_ERRORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.loginerrors").unwrap());

/// Something that can produce the raw timetable page.
#[async_trait]
pub trait TimetableSource {
    async fn fetch_timetable(&self) -> SyncResult<String>;
}

pub struct PortalSession {
    client: reqwest::Client,
    timetable_url: String,
}

impl PortalSession {
    /// Log in with the configured credentials.
    pub async fn login(config: &PortalConfig) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        let login_page = get_text(&client, &config.login_url).await?;
        let token = login_token(&login_page)?;

        let form = [
            ("anchor", ""),
            ("logintoken", token.as_str()),
            ("username", config.username.as_str()),
            ("password", config.password.as_str()),
        ];

        let response = client
            .post(&config.login_url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?;
        let landing_page = response.text().await?;

        if let Some(errors) = login_errors(&landing_page) {
            return Err(SyncError::Auth(errors));
        }

        tracing::info!(username = %config.username, "Logged in to portal");

        Ok(PortalSession {
            client,
            timetable_url: config.timetable_url.clone(),
        })
    }

    pub async fn fetch(&self, url: &str) -> SyncResult<String> {
        get_text(&self.client, url).await
    }
}

#[async_trait]
impl TimetableSource for PortalSession {
    async fn fetch_timetable(&self) -> SyncResult<String> {
        self.fetch(&self.timetable_url).await
    }
}

async fn get_text(client: &reqwest::Client, url: &str) -> SyncResult<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

/// The hidden login token; the page must carry exactly one.
fn login_token(html: &str) -> SyncResult<String> {
    let document = Html::parse_document(html);
    let inputs: Vec<_> = document.select(&LOGIN_TOKEN).collect();

    let [input] = inputs.as_slice() else {
        return Err(SyncError::Auth(format!(
            "expected one login token on the login page, found {}",
            inputs.len()
        )));
    };

    input
        .value()
        .attr("value")
        .map(str::to_string)
        .ok_or_else(|| SyncError::Auth("login token has no value".into()))
}

/// Text of the login error blocks, if the portal rejected the login.
fn login_errors(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let errors: Vec<String> = document
        .select(&LOGIN_ERRORS)
        .map(|e| e.text().collect::<String>().trim().to_string())
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LOGIN_PAGE: &str = r#"<html><body><form>
        <input type="hidden" name="logintoken" value="tok123">
        <input name="username"><input name="password">
    </form></body></html>"#;

    fn portal_config(server: &MockServer) -> PortalConfig {
        PortalConfig {
            login_url: format!("{}/login/index.php", server.uri()),
            timetable_url: format!("{}/local/student_timetable/view.php", server.uri()),
            user_agent: "ttsync-test".to_string(),
            username: "student".to_string(),
            password: "secret".to_string(),
        }
    }

    async fn mount_login_page(server: &MockServer, body: &str) {
        Mock::given(method("GET"))
            .and(path("/login/index.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_login_posts_token_and_keeps_session_cookie() {
        let server = MockServer::start().await;
        mount_login_page(&server, LOGIN_PAGE).await;

        Mock::given(method("POST"))
            .and(path("/login/index.php"))
            .and(body_string_contains("logintoken=tok123"))
            .and(body_string_contains("username=student"))
            .and(body_string_contains("password=secret"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "MoodleSession=abc; Path=/")
                    .set_body_string("<html><body>Dashboard</body></html>"),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/local/student_timetable/view.php"))
            .and(header("cookie", "MoodleSession=abc"))
            .and(header("user-agent", "ttsync-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("timetable"))
            .expect(1)
            .mount(&server)
            .await;

        let session = PortalSession::login(&portal_config(&server)).await.unwrap();
        let page = session.fetch_timetable().await.unwrap();

        assert_eq!(page, "timetable");
    }

    #[tokio::test]
    async fn test_login_without_token_fails() {
        let server = MockServer::start().await;
        mount_login_page(&server, "<html><body>No form here</body></html>").await;

        let result = PortalSession::login(&portal_config(&server)).await;

        assert!(matches!(result, Err(SyncError::Auth(_))));
    }

    #[tokio::test]
    async fn test_rejected_login_reports_portal_errors() {
        let server = MockServer::start().await;
        mount_login_page(&server, LOGIN_PAGE).await;

        Mock::given(method("POST"))
            .and(path("/login/index.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><div class="loginerrors"> Invalid login, please try again </div></body></html>"#,
            ))
            .mount(&server)
            .await;

        let result = PortalSession::login(&portal_config(&server)).await;

        match result {
            Err(SyncError::Auth(msg)) => assert_eq!(msg, "Invalid login, please try again"),
            _ => panic!("expected an auth error"),
        }
    }

    #[tokio::test]
    async fn test_http_error_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = PortalSession::login(&portal_config(&server)).await;

        assert!(matches!(result, Err(SyncError::Transport(_))));
    }

    #[test]
    fn test_duplicate_login_tokens_are_rejected() {
        let html = format!("{}{}", LOGIN_PAGE, LOGIN_PAGE);
        assert!(matches!(login_token(&html), Err(SyncError::Auth(_))));
    }
}
