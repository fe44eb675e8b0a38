use crate::core::envelope::{build_envelope, redact_password};
use crate::core::fault::find_fault;
use crate::core::response::parse_response;
use crate::core::xml::Element;
use crate::domain::catalog::MAX_STATES;
use crate::domain::model::{LoadSearchApiRequest, MultipleLoadDetailReturn};
use crate::domain::ports::{ConfigProvider, LoadSearch};
use crate::utils::error::{ProxyError, Result};
use crate::utils::validation::{validate_list_len, validate_non_empty_string};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

/// Rejects requests the upstream would refuse before any call is made.
pub fn validate_request(request: &LoadSearchApiRequest) -> Result<()> {
    validate_non_empty_string("integrationId", &request.integration_id)?;
    validate_non_empty_string("userName", &request.user_name)?;
    validate_non_empty_string("password", &request.password)?;

    if let Some(criteria) = &request.criteria {
        validate_non_empty_string("originState", &criteria.origin_state)?;
        validate_list_len("originState", &criteria.origin_state, MAX_STATES)?;
        if let Some(destination) = &criteria.destination_state {
            validate_list_len("destinationState", destination, MAX_STATES)?;
        }
    }

    Ok(())
}

pub struct TruckStopService<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> TruckStopService<C> {
    pub fn new(config: C) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self { config, client })
    }

    async fn call(&self, request: &LoadSearchApiRequest) -> Result<MultipleLoadDetailReturn> {
        let envelope = build_envelope(request)?;
        tracing::debug!("=== SOAP REQUEST ===\n{}", redact_password(&envelope));

        let response = self
            .client
            .post(self.config.api_url())
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", self.config.soap_action())
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("=== SOAP RESPONSE === status: {}\n{}", status, body);

        if !status.is_success() {
            let fault = Element::parse(&body).ok().and_then(|root| find_fault(&root));
            let message = match fault {
                Some(fault) => fault.message(),
                None => format!("Error from TruckStop API: {}, {}", status, body),
            };
            tracing::warn!("TruckStop API returned HTTP {}: {}", status, message);
            return Ok(MultipleLoadDetailReturn::error(message));
        }

        Ok(parse_response(&body))
    }
}

#[async_trait]
impl<C: ConfigProvider> LoadSearch for TruckStopService<C> {
    async fn get_multiple_load_detail_results(
        &self,
        request: LoadSearchApiRequest,
    ) -> MultipleLoadDetailReturn {
        if let Err(e) = validate_request(&request) {
            tracing::info!("Rejected load search: {}", e);
            return MultipleLoadDetailReturn::error(e.to_string());
        }

        match self.call(&request).await {
            Ok(result) => {
                if result.has_error {
                    tracing::info!(
                        "Load search failed: {}",
                        result.error_message.as_deref().unwrap_or_default()
                    );
                } else {
                    tracing::info!("Load search returned {} loads", result.total_results);
                }
                result
            }
            Err(e) => {
                tracing::error!("Exception: {:?}", e);
                let detail = match &e {
                    ProxyError::HttpError(inner) => inner.to_string(),
                    other => other.to_string(),
                };
                MultipleLoadDetailReturn::error(format!(
                    "Error communicating with TruckStop API: {}",
                    detail
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::LoadSearchCriteria;

    fn request() -> LoadSearchApiRequest {
        LoadSearchApiRequest {
            integration_id: "1".to_string(),
            password: "p".to_string(),
            user_name: "u".to_string(),
            criteria: Some(LoadSearchCriteria {
                origin_state: "TX".to_string(),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_validate_request_accepts_complete_request() {
        assert!(validate_request(&request()).is_ok());

        let mut without_criteria = request();
        without_criteria.criteria = None;
        assert!(validate_request(&without_criteria).is_ok());
    }

    #[test]
    fn test_validate_request_requires_credentials_and_origin() {
        let mut missing_user = request();
        missing_user.user_name = " ".to_string();
        assert_eq!(
            validate_request(&missing_user).unwrap_err().to_string(),
            "Validation error: userName is required"
        );

        let mut missing_origin = request();
        missing_origin.criteria.as_mut().unwrap().origin_state.clear();
        assert!(validate_request(&missing_origin).is_err());
    }

    #[test]
    fn test_validate_request_limits_state_lists() {
        let states = crate::domain::catalog::US_STATES
            .iter()
            .take(16)
            .map(|(code, _)| *code)
            .collect::<Vec<_>>()
            .join(",");

        let mut too_many = request();
        too_many.criteria.as_mut().unwrap().destination_state = Some(states);
        assert!(validate_request(&too_many).is_err());
    }
}
