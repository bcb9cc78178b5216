use std::sync::Arc;

use crate::config::SourcesConfig;
use crate::vacancy::{Vacancy, VacancyDraft};

use super::lookup::{optional, required};
use super::{
    execute, parse_items, FetchOutcome, HttpTransport, ItemError, RawPayload, SearchQuery,
    SourceError, SourceRequest, VacancySource,
};

const NAME: &str = "HeadHunter";

/// hh.ru vacancy search. Needs no credential, only a descriptive
/// `User-Agent`.
#[derive(Debug, Clone)]
pub struct HeadHunterSource {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    user_agent: String,
}

impl HeadHunterSource {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            user_agent: user_agent.into(),
        }
    }

    pub fn from_config(transport: Arc<dyn HttpTransport>, config: &SourcesConfig) -> Self {
        Self::new(
            transport,
            config.headhunter_base_url.clone(),
            config.headhunter_user_agent.clone(),
        )
    }

    fn request(&self, query: &SearchQuery) -> SourceRequest {
        SourceRequest::get(format!("{}vacancies", self.base_url))
            .header("User-Agent", self.user_agent.clone())
            .param("text", Some(format!("name:{}", query.text)))
            .param("salary", query.min_salary)
            .param("per_page", query.limit)
    }
}

impl VacancySource for HeadHunterSource {
    fn name(&self) -> &'static str {
        NAME
    }

    fn fetch(&self, query: &SearchQuery) -> Result<FetchOutcome, SourceError> {
        execute(NAME, self.transport.as_ref(), &self.request(query))
    }

    fn parse(&self, payload: &RawPayload) -> Result<Vec<Vacancy>, SourceError> {
        parse_items(NAME, payload, "items", draft_from_item)
    }
}

fn draft_from_item(item: &serde_json::Value) -> Result<VacancyDraft, ItemError> {
    Ok(VacancyDraft {
        title: required(item, "/name")?,
        vacancy_url: required(item, "/alternate_url")?,
        salary_from: optional(item, "/salary/from"),
        salary_to: optional(item, "/salary/to"),
        employer: required(item, "/employer/name")?,
        city: required(item, "/area/name")?,
        requirements: required(item, "/snippet/requirement")?,
    })
}
