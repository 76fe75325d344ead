//! Challenge-platform API client.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use serde::de::DeserializeOwned;

use super::error::HtbError;
use super::rate_limit::QuotaGuard;
use super::types::{
    Machine, MachineCategory, MachineListEnvelope, MachineProfileEnvelope, Tag, TagListEnvelope,
    UnreleasedListEnvelope,
};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::http::reqwest_transport::ReqwestTransport;

/// User-Agent sent with every platform request. The platform rejects the
/// default HTTP client signature, so the value itself matters, not just its
/// presence.
const USER_AGENT: &str = "boxsync";

/// Challenge-platform API client.
///
/// Wraps an [`HttpTransport`] with bearer authentication and the
/// header-driven quota guard. All reads are sequential; the guard runs after
/// every response.
#[derive(Clone)]
pub struct HtbClient {
    transport: Arc<dyn HttpTransport>,
    host: String,
    token: String,
    quota: Option<QuotaGuard>,
}

impl HtbClient {
    /// Create a new client against `host` (e.g. "https://labs.hackthebox.com").
    pub fn new(host: &str, token: &str, quota: Option<QuotaGuard>) -> Result<Self, HtbError> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))
            .map_err(|e| HtbError::Http(e.to_string()))?;
        Ok(Self::new_with_transport(
            host,
            token,
            quota,
            Arc::new(transport),
        ))
    }

    pub fn new_with_transport(
        host: &str,
        token: &str,
        quota: Option<QuotaGuard>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            host: host.trim_end_matches('/').to_string(),
            token: token.to_string(),
            quota,
        }
    }

    /// Get the host URL.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Make an authenticated GET request and return the raw response.
    ///
    /// Runs the quota guard against the response headers before returning,
    /// so a caller never observes a response the guard has not paced.
    async fn get_raw(&self, path: &str) -> Result<HttpResponse, HtbError> {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{}", self.host, path),
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), USER_AGENT.to_string()),
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.token),
                ),
            ],
            body: Vec::new(),
        };

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| HtbError::Http(e.to_string()))?;

        if let Some(ref quota) = self.quota {
            quota.pace(&response.headers).await;
        }

        Ok(response)
    }

    /// Make an authenticated GET request and deserialize a 2xx body.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, HtbError> {
        let response = self.get_raw(path).await?;

        if !(200..300).contains(&response.status) {
            return Err(HtbError::Api {
                status: response.status,
                message: response.body_text(),
            });
        }

        serde_json::from_slice(&response.body).map_err(HtbError::Json)
    }

    /// List all machines in a lifecycle category, in platform order.
    pub async fn list_machines(&self, category: MachineCategory) -> Result<Vec<Machine>, HtbError> {
        let path = category.list_path();
        // The unreleased endpoint wraps its records differently.
        match category {
            MachineCategory::Unreleased => {
                let envelope: UnreleasedListEnvelope = self.get(path).await?;
                Ok(envelope.data)
            }
            MachineCategory::Active | MachineCategory::Retired => {
                let envelope: MachineListEnvelope = self.get(path).await?;
                Ok(envelope.info)
            }
        }
    }

    /// Fetch a single machine by ID via the profile endpoint.
    ///
    /// The profile view populates fewer optional fields than the list views;
    /// see [`Machine`] for which fields are reliable here.
    pub async fn get_machine(&self, id: u64) -> Result<Machine, HtbError> {
        let envelope: MachineProfileEnvelope =
            self.get(&format!("/api/v4/machine/profile/{id}")).await?;
        Ok(envelope.info)
    }

    /// Fetch the tags for a machine.
    ///
    /// The platform does not answer a clean 401 when the token lacks access
    /// to this endpoint; it serves an error page whose body contains the
    /// word "Unauthorized". That body check is the documented detection for
    /// this case, and the sentinel tag set is returned so the denial stays
    /// visible downstream instead of being dropped.
    pub async fn get_tags(&self, id: u64) -> Result<Vec<Tag>, HtbError> {
        let response = self.get_raw(&format!("/api/v4/machine/tags/{id}")).await?;

        let body = response.body_text();
        if body.contains(Tag::UNAUTHORIZED) {
            return Ok(Tag::unauthorized_set());
        }

        if !(200..300).contains(&response.status) {
            return Err(HtbError::Api {
                status: response.status,
                message: body,
            });
        }

        let envelope: TagListEnvelope = serde_json::from_slice(&response.body)?;
        Ok(envelope.info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;

    const HOST: &str = "https://htb.test";

    fn client(transport: &MockTransport) -> HtbClient {
        HtbClient::new_with_transport(HOST, "token-123", None, Arc::new(transport.clone()))
    }

    fn machine_json(id: u64, name: &str) -> String {
        format!(
            r#"{{"id": {id}, "name": "{name}", "os": "Linux",
                "release": "2023-07-08T17:00:00.000000Z",
                "difficultyText": "Easy", "difficulty": 35}}"#
        )
    }

    #[tokio::test]
    async fn list_machines_active_unwraps_info() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            format!("{HOST}/api/v4/machine/list"),
            &format!(r#"{{"info": [{}, {}]}}"#, machine_json(1, "Alpha"), machine_json(2, "Beta")),
        );

        let machines = client(&transport)
            .list_machines(MachineCategory::Active)
            .await
            .unwrap();
        assert_eq!(machines.len(), 2);
        assert_eq!(machines[0].name, "Alpha");
        assert_eq!(machines[1].name, "Beta");
    }

    #[tokio::test]
    async fn list_machines_unreleased_unwraps_data() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            format!("{HOST}/api/v4/machine/unreleased"),
            &format!(r#"{{"data": [{}]}}"#, machine_json(9, "Soon")),
        );

        let machines = client(&transport)
            .list_machines(MachineCategory::Unreleased)
            .await
            .unwrap();
        assert_eq!(machines.len(), 1);
        assert_eq!(machines[0].id, 9);
    }

    #[tokio::test]
    async fn list_machines_non_success_is_api_error() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{HOST}/api/v4/machine/list/retired"),
            HttpResponse {
                status: 502,
                headers: Vec::new(),
                body: b"bad gateway".to_vec(),
            },
        );

        let err = client(&transport)
            .list_machines(MachineCategory::Retired)
            .await
            .unwrap_err();
        match err {
            HtbError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_machine_unwraps_profile_envelope() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            format!("{HOST}/api/v4/machine/profile/551"),
            &format!(r#"{{"info": {}}}"#, machine_json(551, "Sau")),
        );

        let machine = client(&transport).get_machine(551).await.unwrap();
        assert_eq!(machine.id, 551);
        assert_eq!(machine.name, "Sau");
    }

    #[tokio::test]
    async fn get_tags_parses_tag_list() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            format!("{HOST}/api/v4/machine/tags/551"),
            r#"{"info": [{"name": "Web", "id": 5}, {"name": "Injection", "id": 9}]}"#,
        );

        let tags = client(&transport).get_tags(551).await.unwrap();
        assert_eq!(
            tags,
            vec![
                Tag { name: "Web".to_string() },
                Tag { name: "Injection".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn get_tags_substitutes_sentinel_on_auth_denial_body() {
        let transport = MockTransport::new();
        // The platform serves this with a 200 and an HTML-ish body; only the
        // substring identifies the denial.
        transport.push_json(
            HttpMethod::Get,
            format!("{HOST}/api/v4/machine/tags/551"),
            r#"{"message": "Unauthorized.", "info": []}"#,
        );

        let tags = client(&transport).get_tags(551).await.unwrap();
        assert_eq!(tags, Tag::unauthorized_set());
    }

    #[tokio::test]
    async fn requests_carry_auth_and_client_identity_headers() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            format!("{HOST}/api/v4/machine/profile/1"),
            &format!(r#"{{"info": {}}}"#, machine_json(1, "Alpha")),
        );

        client(&transport).get_machine(1).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let headers = &requests[0].headers;
        assert_eq!(
            crate::http::header_get(headers, "authorization"),
            Some("Bearer token-123")
        );
        assert_eq!(
            crate::http::header_get(headers, "user-agent"),
            Some("boxsync")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn quota_guard_paces_after_low_remaining_response() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{HOST}/api/v4/machine/profile/1"),
            HttpResponse {
                status: 200,
                headers: vec![("x-ratelimit-remaining".to_string(), "2".to_string())],
                body: format!(r#"{{"info": {}}}"#, machine_json(1, "Alpha")).into_bytes(),
            },
        );

        let client = HtbClient::new_with_transport(
            HOST,
            "token-123",
            Some(QuotaGuard::default()),
            Arc::new(transport),
        );

        let start = tokio::time::Instant::now();
        client.get_machine(1).await.unwrap();
        assert_eq!(start.elapsed(), super::super::rate_limit::QUOTA_PAUSE);
    }
}
