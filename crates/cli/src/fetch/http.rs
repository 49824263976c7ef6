//! Record service client: `GET <base_url><path>?<param>=<identifier>`.
//!
//! One request per identifier, no retries. Auth is not needed; the service
//! is expected on a trusted host.

use std::time::Duration;

use docparity_recon::{Record, RecordFetcher};
use url::Url;

use crate::exit_codes::EXIT_INVALID_CONFIG;
use crate::settings::FetchSettings;
use crate::CliError;

use super::common::{parse_record, FetchError, RawFetcher, USER_AGENT};

pub struct HttpFetcher {
    http: reqwest::blocking::Client,
    endpoint: Url,
    query_param: String,
}

impl HttpFetcher {
    pub fn new(endpoint: Url, query_param: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Network(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint,
            query_param: query_param.to_string(),
        })
    }

    /// Fetcher for `path` on the configured service.
    pub fn from_settings(settings: &FetchSettings, path: &str) -> Result<Self, CliError> {
        let endpoint = endpoint_url(&settings.base_url, path).map_err(|message| CliError {
            code: EXIT_INVALID_CONFIG,
            message,
            hint: None,
        })?;
        Ok(Self::new(
            endpoint,
            &settings.query_param,
            Duration::from_secs(settings.timeout_secs),
        )?)
    }

    pub fn url_for(&self, identifier: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(&self.query_param, identifier);
        url
    }
}

impl RawFetcher for HttpFetcher {
    fn fetch_raw(&self, identifier: &str) -> Result<String, FetchError> {
        let url = self.url_for(identifier);
        log::debug!("GET {url}");

        let resp = self
            .http
            .get(url.clone())
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.text().map_err(|e| FetchError::Body(e.to_string()))
    }
}

impl RecordFetcher for HttpFetcher {
    fn fetch(&self, identifier: &str) -> Record {
        match self.fetch_raw(identifier) {
            Ok(body) => parse_record(&body, identifier),
            Err(e) => {
                log::warn!("{identifier}: {e}, treating as empty");
                Record::new()
            }
        }
    }
}

/// Join a base URL and an endpoint path.
pub fn endpoint_url(base_url: &str, path: &str) -> Result<Url, String> {
    let base = Url::parse(base_url).map_err(|e| format!("invalid base URL '{base_url}': {e}"))?;
    base.join(path)
        .map_err(|e| format!("invalid endpoint path '{path}' for '{base_url}': {e}"))
}
