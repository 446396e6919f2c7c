//! HTTP client for the remote-call front-end

use crate::types::patient::PatientData;
use crate::types::prediction::PredictionResponse;
use crate::ui::UiError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Client for `POST /predict` on a running prediction service
pub struct RemoteClient {
    client: Client,
    url: String,
    timeout: Duration,
}

impl RemoteClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one patient and parse the service's answer.
    pub async fn predict(&self, patient: &PatientData) -> Result<PredictionResponse, UiError> {
        let response = self
            .client
            .post(&self.url)
            .json(patient)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %self.url, error = %e, "Prediction request failed");
                if e.is_timeout() {
                    UiError::Timeout {
                        url: self.url.clone(),
                        timeout_ms: self.timeout.as_millis() as u64,
                    }
                } else if e.is_connect() {
                    UiError::Unreachable {
                        url: self.url.clone(),
                    }
                } else {
                    UiError::Prediction(e.to_string())
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("<response body unreadable: {e}>"),
            };
            warn!(url = %self.url, status = status.as_u16(), "Prediction service returned an error");
            return Err(UiError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let prediction: PredictionResponse = response
            .json()
            .await
            .map_err(|e| UiError::BadResponse(e.to_string()))?;
        if !(0.0..=1.0).contains(&prediction.risk_probability) {
            return Err(UiError::BadResponse(format!(
                "risk_probability {} outside [0, 1]",
                prediction.risk_probability
            )));
        }

        debug!(
            prediction = %prediction.prediction,
            risk_probability = prediction.risk_probability,
            "Remote prediction received"
        );
        Ok(prediction)
    }
}
