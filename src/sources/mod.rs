mod headhunter;
mod lookup;
mod superjob;
mod transport;

use std::fmt;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::vacancy::{ValidationError, Vacancy, VacancyDraft};

pub use headhunter::HeadHunterSource;
pub use superjob::SuperJobSource;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, SourceRequest, TransportError};

/// Free-text search with optional salary floor and page size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub min_salary: Option<u32>,
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            min_salary: None,
            limit: None,
        }
    }

    pub fn with_min_salary(mut self, min_salary: u32) -> Self {
        self.min_salary = Some(min_salary);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Decoded JSON body of one successful platform response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPayload(pub Value);

/// Classification of a non-success HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    BadRequest,
    Forbidden,
    NotFound,
    Unknown(u16),
}

impl StatusClass {
    pub fn classify(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            other => Self::Unknown(other),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::BadRequest => "bad request",
            Self::Forbidden => "access forbidden",
            Self::NotFound => "not found",
            Self::Unknown(_) => "unknown error",
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(status) => write!(f, "{} (status {})", self.label(), status),
            other => f.write_str(other.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Payload(RawPayload),
    Failed(StatusClass),
}

impl FetchOutcome {
    pub fn into_payload(self) -> Option<RawPayload> {
        match self {
            Self::Payload(payload) => Some(payload),
            Self::Failed(_) => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{source_name} request failed: {error}")]
    Transport {
        source_name: &'static str,
        #[source]
        error: TransportError,
    },
    #[error("{source_name} returned a body that is not valid JSON: {error}")]
    Decode {
        source_name: &'static str,
        #[source]
        error: serde_json::Error,
    },
    #[error("{source_name} payload has no '{key}' array")]
    MissingItems {
        source_name: &'static str,
        key: &'static str,
    },
}

/// Why a single payload item could not become a vacancy.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ItemError {
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A job platform that can be searched and whose payloads normalize into
/// [`Vacancy`] records.
pub trait VacancySource {
    fn name(&self) -> &'static str;

    /// Issues one bounded GET. Rejected statuses are reported through
    /// [`FetchOutcome::Failed`], never as an error.
    fn fetch(&self, query: &SearchQuery) -> Result<FetchOutcome, SourceError>;

    fn parse(&self, payload: &RawPayload) -> Result<Vec<Vacancy>, SourceError>;

    fn search(&self, query: &SearchQuery) -> Result<Vec<Vacancy>, SourceError> {
        match self.fetch(query)? {
            FetchOutcome::Payload(payload) => self.parse(&payload),
            FetchOutcome::Failed(_) => Ok(Vec::new()),
        }
    }
}

/// Searches each source in turn and concatenates the results in source order.
pub fn collect_vacancies(
    sources: &[&dyn VacancySource],
    query: &SearchQuery,
) -> Result<Vec<Vacancy>, SourceError> {
    let mut vacancies = Vec::new();
    for source in sources {
        let found = source.search(query)?;
        info!(source = source.name(), count = found.len(), "vacancies collected");
        vacancies.extend(found);
    }
    Ok(vacancies)
}

pub(crate) fn execute(
    source_name: &'static str,
    transport: &dyn HttpTransport,
    request: &SourceRequest,
) -> Result<FetchOutcome, SourceError> {
    debug!(source = source_name, url = %request.url, "requesting vacancies");
    let response = transport
        .get(request)
        .map_err(|error| SourceError::Transport { source_name, error })?;

    if !(200..300).contains(&response.status) {
        let class = StatusClass::classify(response.status);
        warn!(
            source = source_name,
            status = response.status,
            outcome = %class,
            "vacancy request rejected"
        );
        return Ok(FetchOutcome::Failed(class));
    }

    if response.body.iter().all(u8::is_ascii_whitespace) {
        let class = StatusClass::Unknown(response.status);
        warn!(
            source = source_name,
            status = response.status,
            outcome = %class,
            "vacancy response has no body"
        );
        return Ok(FetchOutcome::Failed(class));
    }

    let body = serde_json::from_slice(&response.body)
        .map_err(|error| SourceError::Decode { source_name, error })?;
    Ok(FetchOutcome::Payload(RawPayload(body)))
}

/// Maps every element of `payload[items_key]`. Items that fail are logged
/// and skipped; the rest keep their payload order.
pub(crate) fn parse_items<F>(
    source_name: &'static str,
    payload: &RawPayload,
    items_key: &'static str,
    map_item: F,
) -> Result<Vec<Vacancy>, SourceError>
where
    F: Fn(&Value) -> Result<VacancyDraft, ItemError>,
{
    let items = payload
        .0
        .get(items_key)
        .and_then(Value::as_array)
        .ok_or(SourceError::MissingItems {
            source_name,
            key: items_key,
        })?;

    let mut vacancies = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let parsed =
            map_item(item).and_then(|draft| Vacancy::try_from(draft).map_err(ItemError::from));
        match parsed {
            Ok(vacancy) => vacancies.push(vacancy),
            Err(reason) => warn!(
                source = source_name,
                index,
                %reason,
                "skipping malformed vacancy item"
            ),
        }
    }

    debug!(
        source = source_name,
        parsed = vacancies.len(),
        skipped = items.len() - vacancies.len(),
        "payload parsed"
    );
    Ok(vacancies)
}
