//! HTTP client for the proxy, used by the `load-search` binary.

use crate::domain::catalog::{
    is_known_equipment_type, is_known_region, Country, LOAD_TYPES, MAX_STATES, SORT_COLUMNS,
};
use crate::domain::model::{
    Credentials, ErrorBody, LoadSearchApiRequest, LoadSearchCriteria, MultipleLoadDetailReturn,
};
use crate::server::LOAD_SEARCH_PATH;
use crate::utils::error::{ProxyError, Result};
use crate::utils::validation::{validate_range, validate_url, Validate};
use chrono::NaiveDateTime;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_PROXY_URL: &str = "http://localhost:5244";

/// Criteria as a user builds them: state and equipment selections are lists.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchForm {
    pub origin_city: Option<String>,
    pub origin_states: Vec<String>,
    pub origin_country: Option<String>,
    pub origin_range: Option<i32>,
    pub destination_city: Option<String>,
    pub destination_states: Vec<String>,
    pub destination_country: Option<String>,
    pub destination_range: Option<i32>,
    pub equipment_types: Vec<String>,
    pub load_type: Option<String>,
    pub hours_old: Option<i32>,
    pub pickup_dates: Vec<NaiveDateTime>,
    pub page_number: Option<i32>,
    pub page_size: Option<i32>,
    pub sort_by: Option<String>,
    pub sort_descending: Option<bool>,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            origin_city: None,
            origin_states: Vec::new(),
            origin_country: Some("USA".to_string()),
            origin_range: None,
            destination_city: None,
            destination_states: Vec::new(),
            destination_country: Some("USA".to_string()),
            destination_range: None,
            equipment_types: vec!["ANY".to_string()],
            load_type: Some("All".to_string()),
            hours_old: Some(0),
            pickup_dates: Vec::new(),
            page_number: Some(1),
            page_size: Some(50),
            sort_by: Some("Age".to_string()),
            sort_descending: Some(false),
        }
    }
}

fn check_states(field: &str, states: &[String], country: Option<&str>) -> Result<()> {
    if states.len() > MAX_STATES {
        return Err(ProxyError::validation(format!(
            "{} accepts at most {} states (got {})",
            field,
            MAX_STATES,
            states.len()
        )));
    }
    let Some(country) = country.and_then(|c| c.parse::<Country>().ok()) else {
        return Ok(());
    };
    match states.iter().find(|s| !is_known_region(country, s)) {
        Some(unknown) => Err(ProxyError::validation(format!(
            "{} '{}' is not a state/province of {}",
            field, unknown, country
        ))),
        None => Ok(()),
    }
}

impl SearchForm {
    /// Wire criteria: state lists are comma-joined, codes upper-cased.
    pub fn to_criteria(&self) -> LoadSearchCriteria {
        let join = |states: &[String]| {
            states
                .iter()
                .map(|s| s.trim().to_ascii_uppercase())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(",")
        };
        let destination_state = join(&self.destination_states);

        LoadSearchCriteria {
            origin_state: join(&self.origin_states),
            origin_city: self.origin_city.clone(),
            origin_country: self.origin_country.clone(),
            origin_latitude: None,
            origin_longitude: None,
            origin_range: self.origin_range,
            destination_state: (!destination_state.is_empty()).then_some(destination_state),
            destination_city: self.destination_city.clone(),
            destination_country: self.destination_country.clone(),
            destination_range: self.destination_range,
            equipment_type: (!self.equipment_types.is_empty()).then(|| self.equipment_types.clone()),
            load_type: self.load_type.clone(),
            hours_old: self.hours_old,
            pickup_dates: (!self.pickup_dates.is_empty()).then(|| self.pickup_dates.clone()),
            page_number: self.page_number,
            page_size: self.page_size,
            sort_by: self.sort_by.clone(),
            sort_descending: self.sort_descending,
        }
    }

    /// One-line description shown above results.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(city) = &self.origin_city {
            parts.push(format!("From: {}, {}", city, self.origin_states.join(", ")));
        }
        if let Some(city) = &self.destination_city {
            parts.push(format!("To: {}, {}", city, self.destination_states.join(", ")));
        }
        if !self.equipment_types.is_empty() {
            parts.push(format!("Equipment: {}", self.equipment_types.join(", ")));
        }
        if parts.is_empty() {
            "No criteria set".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

impl Validate for SearchForm {
    fn validate(&self) -> Result<()> {
        if self.origin_states.iter().all(|s| s.trim().is_empty()) {
            return Err(ProxyError::validation("at least one origin state is required"));
        }
        check_states("origin state", &self.origin_states, self.origin_country.as_deref())?;
        check_states(
            "destination state",
            &self.destination_states,
            self.destination_country.as_deref(),
        )?;

        if let Some(unknown) = self
            .equipment_types
            .iter()
            .find(|code| !is_known_equipment_type(code))
        {
            return Err(ProxyError::validation(format!(
                "unknown equipment type '{}'",
                unknown
            )));
        }
        if let Some(load_type) = &self.load_type {
            if !LOAD_TYPES.contains(&load_type.as_str()) {
                return Err(ProxyError::validation(format!(
                    "load type must be one of {}",
                    LOAD_TYPES.join(", ")
                )));
            }
        }
        if let Some(sort_by) = &self.sort_by {
            if !SORT_COLUMNS.contains(&sort_by.as_str()) {
                return Err(ProxyError::validation(format!(
                    "sort column must be one of {}",
                    SORT_COLUMNS.join(", ")
                )));
            }
        }
        if let Some(page_size) = self.page_size {
            validate_range("page size", page_size, 1, 1000)?;
        }
        if let Some(page_number) = self.page_number {
            validate_range("page number", page_number, 1, i32::MAX)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ProxyClient {
    base_url: String,
    client: Client,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self> {
        validate_url("proxy_url", base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, LOAD_SEARCH_PATH)
    }

    pub async fn search_loads(
        &self,
        credentials: &Credentials,
        form: &SearchForm,
    ) -> Result<MultipleLoadDetailReturn> {
        let request = LoadSearchApiRequest::new(credentials, Some(form.to_criteria()));
        tracing::debug!("POST {} {:?}", self.endpoint(), request);

        let response = self.client.post(self.endpoint()).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|e| e.error)
                .unwrap_or_else(|| format!("API request failed: {}", status));
            return Err(ProxyError::ProxyStatusError {
                status: status.as_u16(),
                message,
            });
        }

        let result: MultipleLoadDetailReturn = response.json().await?;
        if result.has_error {
            return Err(ProxyError::UpstreamError {
                message: result
                    .error_message
                    .unwrap_or_else(|| "Unknown API error".to_string()),
            });
        }

        Ok(result)
    }
}

/// Runs `search` every `period` until `shutdown` resolves. A search still in
/// flight when `shutdown` fires is dropped.
pub async fn repeat_until<S, F, Fut>(period: Duration, shutdown: S, mut search: F)
where
    S: Future<Output = ()>,
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = &mut shutdown => return,
            _ = ticker.tick() => {}
        }
        tokio::select! {
            _ = &mut shutdown => return,
            _ = search() => {}
        }
    }
}
