use std::sync::Arc;

use tracing::warn;

use crate::config::SourcesConfig;
use crate::vacancy::{Vacancy, VacancyDraft};

use super::lookup::{optional, required, required_any};
use super::{
    execute, parse_items, FetchOutcome, HttpTransport, ItemError, RawPayload, SearchQuery,
    SourceError, SourceRequest, VacancySource,
};

const NAME: &str = "SuperJob";
const API_KEY_HEADER: &str = "X-Api-App-Id";

/// superjob.ru vacancy search, authenticated with an application key.
#[derive(Debug, Clone)]
pub struct SuperJobSource {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_key: Option<String>,
}

impl SuperJobSource {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn from_config(transport: Arc<dyn HttpTransport>, config: &SourcesConfig) -> Self {
        Self::new(
            transport,
            config.superjob_base_url.clone(),
            config.superjob_api_key.clone(),
        )
    }

    fn request(&self, query: &SearchQuery) -> SourceRequest {
        let request = SourceRequest::get(format!("{}vacancies", self.base_url))
            .param("keyword", Some(query.text.as_str()))
            .param("payment_from", query.min_salary)
            .param("count", query.limit);

        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key.clone()),
            None => {
                warn!(source = NAME, "SJ_API_KEY is not set; request will likely be refused");
                request
            }
        }
    }
}

impl VacancySource for SuperJobSource {
    fn name(&self) -> &'static str {
        NAME
    }

    fn fetch(&self, query: &SearchQuery) -> Result<FetchOutcome, SourceError> {
        execute(NAME, self.transport.as_ref(), &self.request(query))
    }

    fn parse(&self, payload: &RawPayload) -> Result<Vec<Vacancy>, SourceError> {
        parse_items(NAME, payload, "objects", draft_from_item)
    }
}

fn draft_from_item(item: &serde_json::Value) -> Result<VacancyDraft, ItemError> {
    Ok(VacancyDraft {
        title: required(item, "/profession")?,
        vacancy_url: required(item, "/link")?,
        salary_from: optional(item, "/payment_from"),
        salary_to: optional(item, "/payment_to"),
        employer: required(item, "/firm_name")?,
        city: required_any(item, &["/client/town/title", "/town/title"])?,
        requirements: required(item, "/vacancyRichText")?,
    })
}
