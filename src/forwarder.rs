use std::time::{Duration, Instant};

use url::Url;

use crate::error::ForwardError;
use crate::metrics::SINK_LATENCY;
use crate::models::{Ack, OutboundMessage};

// Single-attempt delivery to the webhook sink
pub struct Forwarder {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl Forwarder {
    pub fn new(client: reqwest::Client, url: Url, timeout: Duration) -> Self {
        Self {
            client,
            url,
            timeout,
        }
    }

    /// Posts `message` once. Timeouts and transport failures are
    /// `SinkUnreachable`; non-2xx answers are `SinkRejected`. Never retries.
    pub async fn forward(&self, message: &OutboundMessage) -> Result<Ack, ForwardError> {
        let start_time = Instant::now();

        let result = self
            .client
            .post(self.url.clone())
            .json(message)
            .timeout(self.timeout)
            .send()
            .await;

        SINK_LATENCY.observe(start_time.elapsed().as_secs_f64());

        // the webhook URL carries its token, keep it out of errors and logs
        let res = result.map_err(|err| ForwardError::SinkUnreachable(err.without_url()))?;
        let status = res.status();
        if !status.is_success() {
            return Err(ForwardError::SinkRejected {
                status: status.as_u16(),
            });
        }
        Ok(Ack {
            status: status.as_u16(),
        })
    }
}
