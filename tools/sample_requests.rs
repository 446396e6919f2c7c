//! Sample Request Generator
//!
//! Generates random patient payloads and posts them to a running prediction
//! API for smoke testing.
//!
//! Usage: `stroke-sample-requests [count] [high_risk_rate] [delay_ms]`

use rand::Rng;
use std::time::Duration;
use stroke_risk_service::{
    config::AppConfig,
    telemetry,
    types::{Feature, PatientData, RiskLabel},
    ui::remote::RemoteClient,
};
use tracing::{info, warn};

/// Patient generator for testing
struct PatientGenerator {
    rng: rand::rngs::ThreadRng,
}

impl PatientGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Younger patient with few, mild symptoms
    fn generate_low_risk(&mut self) -> PatientData {
        let mut patient = PatientData::new(self.rng.gen_range(18..45));
        for feature in Feature::indicators() {
            if self.rng.gen_bool(0.1) {
                patient = patient.with(feature, 1);
            }
        }
        patient
    }

    /// Older patient with cardiac symptoms and several conditions
    fn generate_high_risk(&mut self) -> PatientData {
        let mut patient = PatientData::new(self.rng.gen_range(60..=95))
            .with(Feature::ChestPain, 1)
            .with(Feature::IrregularHeartbeat, 1);
        for feature in Feature::indicators() {
            if self.rng.gen_bool(0.5) {
                patient = patient.with(feature, 1);
            }
        }
        patient
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    telemetry::init_tracing(&config.logging)?;

    info!("Starting Sample Request Generator");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let count: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(20);
    let high_risk_rate: f64 = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.3_f64)
        .clamp(0.0, 1.0);
    let delay_ms: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        api_url = %config.ui.api_url,
        count = count,
        high_risk_rate = high_risk_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    let client = RemoteClient::new(config.ui.api_url.clone(), config.ui.request_timeout())?;
    let mut generator = PatientGenerator::new();
    let mut rng = rand::thread_rng();

    let mut at_risk = 0;
    let mut not_at_risk = 0;
    let mut failed = 0;

    for i in 0..count {
        let patient = if rng.gen_bool(high_risk_rate) {
            generator.generate_high_risk()
        } else {
            generator.generate_low_risk()
        };

        match client.predict(&patient).await {
            Ok(response) => {
                match response.prediction {
                    RiskLabel::AtRisk => at_risk += 1,
                    RiskLabel::NotAtRisk => not_at_risk += 1,
                }
                info!(
                    request = i + 1,
                    age = patient.age,
                    symptoms = patient.symptom_count(),
                    prediction = %response.prediction,
                    risk_probability = format!("{:.3}", response.risk_probability),
                    "Prediction received"
                );
            }
            Err(e) => {
                failed += 1;
                warn!(request = i + 1, error = %e, "Prediction failed");
            }
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        "Completed! Sent {} requests ({} at risk, {} not at risk, {} failed)",
        count, at_risk, not_at_risk, failed
    );

    Ok(())
}
