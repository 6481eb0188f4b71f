//! HTTP delivery to the log endpoint.

use super::{Transport, TransportError};
use crate::report::ErrorRecord;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// POSTs each report as a JSON body to a fixed endpoint.
///
/// The response is ignored entirely - all that matters is that the request
/// was attempted. There is no retry; a failed delivery is logged locally by
/// the caller and dropped.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Build a transport for `endpoint` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// The endpoint reports are delivered to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, record: &ErrorRecord) -> Result<(), TransportError> {
        // Response status and body are deliberately not inspected.
        self.client
            .post(self.endpoint.as_str())
            .json(record)
            .send()
            .await?;
        Ok(())
    }
}
