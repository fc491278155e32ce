//! Webhook-based invitation notifier

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;
use tracing::{info, warn};

use crate::config::NotifierConfig;
use crate::domain::notification::{NotificationDispatcher, TeamInvite};
use crate::domain::DomainError;

type HmacSha256 = Hmac<Sha256>;

/// Delivers invitation notifications as signed JSON POSTs to a configured
/// endpoint (the alerting system sitting in front of email).
///
/// One request per invite. A failed delivery is recorded in the returned
/// error; per the dispatcher contract the membership service logs and drops
/// it, so HTTP trouble never reaches the inviting caller.
#[derive(Debug)]
pub struct WebhookNotifier {
    client: Client,
    endpoint: String,
    secret: Option<String>,
    timeout: Duration,
}

impl WebhookNotifier {
    /// Create a notifier from configuration; `None` when no endpoint is set
    pub fn from_config(config: &NotifierConfig) -> Result<Option<Self>, DomainError> {
        let Some(ref endpoint) = config.endpoint else {
            return Ok(None);
        };

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(DomainError::validation(
                "Notifier endpoint must start with http:// or https://",
            ));
        }

        Ok(Some(Self {
            client: Client::new(),
            endpoint: endpoint.clone(),
            secret: config.secret.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }))
    }

    /// Generates HMAC-SHA256 signature for payload verification
    fn generate_signature(secret: &str, payload: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    async fn send_invite(&self, invite: &TeamInvite) -> Result<(), DomainError> {
        let payload = serde_json::json!({
            "event": "team_invitation",
            "team": invite.team_slug,
            "team_name": invite.team_name,
            "instigator": invite.instigator,
            "invitee": invite.invitee,
            "message": invite.message(),
            "sent_at": Utc::now(),
        });
        let payload = serde_json::to_string(&payload)
            .map_err(|e| DomainError::internal(format!("Failed to serialize payload: {}", e)))?;

        let mut request = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .header("Content-Type", "application/json")
            .header("X-Notification-Event", "team_invitation");

        if let Some(ref secret) = self.secret {
            let signature = Self::generate_signature(secret, &payload);
            request = request.header("X-Notification-Signature", format!("sha256={}", signature));
        }

        let response = request
            .body(payload)
            .send()
            .await
            .map_err(|e| DomainError::notification(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::notification(format!(
                "HTTP status {}",
                status.as_u16()
            )));
        }

        info!(
            invitee = %invite.invitee,
            team = %invite.team_slug,
            "Invitation notification delivered"
        );
        Ok(())
    }
}

#[async_trait]
impl NotificationDispatcher for WebhookNotifier {
    async fn dispatch(&self, invites: &[TeamInvite]) -> Result<(), DomainError> {
        let mut failures = 0;

        for invite in invites {
            if let Err(error) = self.send_invite(invite).await {
                warn!(
                    invitee = %invite.invitee,
                    team = %invite.team_slug,
                    error = %error,
                    "Invitation notification failed"
                );
                failures += 1;
            }
        }

        if failures > 0 {
            return Err(DomainError::notification(format!(
                "{} of {} invitation notifications failed",
                failures,
                invites.len()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::team::{Team, TeamSlug};
    use crate::domain::user::Username;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn invite() -> TeamInvite {
        let fury = Username::new("fury").unwrap();
        let team = Team::new(
            TeamSlug::new("avengers").unwrap(),
            "The Avengers",
            fury.clone(),
        )
        .unwrap();
        TeamInvite::new(&team, &fury, &Username::new("natasha").unwrap())
    }

    fn notifier(endpoint: String, secret: Option<&str>) -> WebhookNotifier {
        WebhookNotifier::from_config(&NotifierConfig {
            endpoint: Some(endpoint),
            secret: secret.map(String::from),
            timeout_secs: 5,
        })
        .unwrap()
        .unwrap()
    }

    #[test]
    fn test_from_config_without_endpoint() {
        let result = WebhookNotifier::from_config(&NotifierConfig::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_from_config_rejects_bad_endpoint() {
        let result = WebhookNotifier::from_config(&NotifierConfig {
            endpoint: Some("ftp://example.com".to_string()),
            secret: None,
            timeout_secs: 5,
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_dispatch_posts_one_request_per_invite() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notify"))
            .and(header("X-Notification-Event", "team_invitation"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let notifier = notifier(format!("{}/notify", server.uri()), None);
        let invites = vec![invite(), {
            let mut other = invite();
            other.invitee = Username::new("clint").unwrap();
            other
        }];

        notifier.dispatch(&invites).await.unwrap();
    }

    #[tokio::test]
    async fn test_dispatch_signs_when_secret_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header_exists("X-Notification-Signature"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = notifier(server.uri(), Some("s3cret"));
        notifier.dispatch(&[invite()]).await.unwrap();
    }

    #[tokio::test]
    async fn test_dispatch_reports_http_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = notifier(server.uri(), None);
        let result = notifier.dispatch(&[invite()]).await;
        assert!(matches!(result, Err(DomainError::Notification { .. })));
    }

    #[test]
    fn test_signature_is_deterministic() {
        let a = WebhookNotifier::generate_signature("key", "payload");
        let b = WebhookNotifier::generate_signature("key", "payload");
        assert_eq!(a, b);
        assert_ne!(a, WebhookNotifier::generate_signature("other", "payload"));
    }
}
