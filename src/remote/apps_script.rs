//! Apps Script web endpoint and public CSV export, over HTTP.
//!
//! Every GET carries a `t=<millis>` cache-buster since responses from the
//! script endpoint are cached by intermediaries outside our control.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::{Config, ListSource};
use crate::error::{HubError, Result};

use super::{CacheBuster, FormFields, ReadAction, RemoteStore, WriteAck, WriteAction};

/// HTTP-backed remote store
pub struct AppsScriptStore {
    client: Client,
    endpoint: Option<Url>,
    csv_url: Option<Url>,
    source: ListSource,
    buster: CacheBuster,
}

impl AppsScriptStore {
    /// Create a store from configuration
    ///
    /// The script endpoint may be left out when assets come from the CSV
    /// export; actions that need it fail when they are attempted.
    pub fn from_config(config: &Config) -> Result<Self> {
        let endpoint = config.endpoint().as_deref().map(Url::parse).transpose()?;

        let csv_url = config
            .remote
            .csv_url
            .as_deref()
            .map(Url::parse)
            .transpose()?;

        if config.remote.source == ListSource::Script && endpoint.is_none() {
            return Err(endpoint_missing());
        }
        if config.remote.source == ListSource::Csv && csv_url.is_none() {
            return Err(HubError::Config(
                "remote.source is 'csv' but remote.csv_url is not set".to_string(),
            ));
        }

        if config.remote.timeout == 0 {
            return Err(HubError::Config(
                "remote.timeout must be at least 1 second".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.remote.timeout))
            .connect_timeout(Duration::from_secs(config.remote.timeout.min(10)))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            csv_url,
            source: config.remote.source,
            buster: CacheBuster::new(),
        })
    }

    fn script_endpoint(&self) -> Result<&Url> {
        self.endpoint.as_ref().ok_or_else(endpoint_missing)
    }

    /// URL for a read, with the cache-buster appended
    pub fn read_url(&self, action: ReadAction) -> Result<Url> {
        let mut url = match (action, self.source, &self.csv_url) {
            (ReadAction::Assets, ListSource::Csv, Some(csv)) => csv.clone(),
            _ => {
                let mut url = self.script_endpoint()?.clone();
                let (key, value) = action.query_pair();
                url.query_pairs_mut().append_pair(key, value);
                url
            }
        };
        url.query_pairs_mut()
            .append_pair("t", &self.buster.next().to_string());
        Ok(url)
    }
}

fn endpoint_missing() -> HubError {
    HubError::Config(
        "remote endpoint not configured. Set DIGIHUB_ENDPOINT or run: \
         digihub config set remote.endpoint <url>"
            .to_string(),
    )
}

/// Form body of a write: the `action` field first, then the mutation's fields
pub fn form_body(action: WriteAction, fields: FormFields) -> Vec<(&'static str, String)> {
    let mut body = Vec::with_capacity(fields.len() + 1);
    body.push(("action", action.as_str().to_string()));
    body.extend(fields);
    body
}

impl RemoteStore for AppsScriptStore {
    async fn read(&self, action: ReadAction) -> Result<String> {
        let url = self.read_url(action)?;
        debug!(%action, "reading from remote store");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HubError::RemoteRejected {
                action: action.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    async fn write(&self, action: WriteAction, fields: FormFields) -> Result<WriteAck> {
        // Field names only: bodies may carry passwords
        let names: Vec<&str> = fields.iter().map(|(k, _)| *k).collect();
        debug!(%action, fields = ?names, "submitting write");

        let endpoint = self.script_endpoint()?.clone();
        let body = form_body(action, fields);

        let response = self
            .client
            .post(endpoint)
            .form(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HubError::RemoteRejected {
                action: action.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(WriteAck {
            action,
            status: status.as_u16(),
        })
    }
}
