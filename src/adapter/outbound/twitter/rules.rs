//! Filtered stream rule management.

use async_trait::async_trait;
use reqwest::header::USER_AGENT as USER_AGENT_HEADER;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::debug;

use super::dto::{AddRules, DeleteRules, RuleIds, RulesResponse};
use super::settings::{TwitterSettings, USER_AGENT};
use crate::domain::Rule;
use crate::error::{Result, StreamError};
use crate::port::{InstalledRule, RuleStore};

pub struct TwitterRules {
    client: Client,
    settings: TwitterSettings,
}

impl TwitterRules {
    #[must_use]
    pub fn new(settings: TwitterSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.settings.bearer_token)
            .header(USER_AGENT_HEADER, USER_AGENT)
    }
}

/// Fail unless the response carries `expected`.
async fn expect_status(
    response: Response,
    expected: StatusCode,
    action: &'static str,
) -> Result<Response> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StreamError::Rules {
        action,
        status: status.as_u16(),
        body,
    }
    .into())
}

#[async_trait]
impl RuleStore for TwitterRules {
    async fn rules(&self) -> Result<Vec<InstalledRule>> {
        let response = self
            .authorized(self.client.get(&self.settings.rules_url))
            .send()
            .await?;
        let response = expect_status(response, StatusCode::OK, "get").await?;

        let rules: RulesResponse = response.json().await?;
        debug!(count = rules.data.len(), "Fetched stream rules");
        Ok(rules.data.into_iter().map(InstalledRule::from).collect())
    }

    async fn delete_rules(&self, ids: &[String]) -> Result<()> {
        let body = DeleteRules {
            delete: RuleIds { ids },
        };
        let response = self
            .authorized(self.client.post(&self.settings.rules_url))
            .json(&body)
            .send()
            .await?;
        expect_status(response, StatusCode::OK, "delete").await?;
        Ok(())
    }

    async fn add_rules(&self, rules: &[Rule]) -> Result<()> {
        let response = self
            .authorized(self.client.post(&self.settings.rules_url))
            .json(&AddRules { add: rules })
            .send()
            .await?;
        expect_status(response, StatusCode::CREATED, "add").await?;
        Ok(())
    }
}
