//! Sample Profile Publisher
//!
//! Generates student profiles and publishes them as screening requests.
//!
//! Usage: sample-profiles [nats_url] [subject] [count] [stressed_rate] [delay_ms]

use rand::Rng;
use std::time::Duration;
use student_risk_screening::types::{RawProfile, ScreeningRequest};
use tracing::{info, warn};

/// Random profile generator
struct ProfileGenerator {
    rng: rand::rngs::ThreadRng,
}

impl ProfileGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Profile with moderate pressure and good satisfaction
    fn generate_balanced(&mut self) -> RawProfile {
        RawProfile::new(
            self.rng.gen_range(1..=3),
            self.rng.gen_range(2..=8),
            self.rng.gen_range(1..=3),
            self.rng.gen_range(3..=5),
            self.cgpa(3.0, 5.0),
            self.rng.gen_range(18..=35),
        )
    }

    /// Profile with high pressure, long hours and low satisfaction
    fn generate_stressed(&mut self) -> RawProfile {
        RawProfile::new(
            self.rng.gen_range(4..=5),
            self.rng.gen_range(10..=16),
            self.rng.gen_range(4..=5),
            self.rng.gen_range(1..=2),
            self.cgpa(0.5, 3.0),
            self.rng.gen_range(18..=26),
        )
    }

    /// CGPA rounded to two decimals, like the input form
    fn cgpa(&mut self, low: f64, high: f64) -> f64 {
        (self.rng.gen_range(low..=high) * 100.0).round() / 100.0
    }

    fn next(&mut self, stressed_rate: f64) -> (ScreeningRequest, bool) {
        let stressed = self.rng.gen_bool(stressed_rate);
        let profile = if stressed {
            self.generate_stressed()
        } else {
            self.generate_balanced()
        };
        (ScreeningRequest::new(profile), stressed)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_profiles=info".parse()?),
        )
        .init();

    info!("Starting Sample Profile Publisher");

    let args: Vec<String> = std::env::args().collect();
    let nats_url = args.get(1).map(|s| s.as_str()).unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("screening.requests");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(100);
    let stressed_rate: f64 = args
        .get(4)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.3_f64)
        .clamp(0.0, 1.0);
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        stressed_rate = stressed_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            return run_dry_mode(count, stressed_rate, delay_ms).await;
        }
    };

    let mut generator = ProfileGenerator::new();
    let mut balanced_count = 0;
    let mut stressed_count = 0;

    for i in 0..count {
        let (request, stressed) = generator.next(stressed_rate);
        if stressed {
            stressed_count += 1;
        } else {
            balanced_count += 1;
        }

        let payload = serde_json::to_vec(&request)?;
        client.publish(subject.to_string(), payload.into()).await?;

        if (i + 1) % 10 == 0 {
            info!(
                "Published {}/{} profiles ({} balanced, {} stressed)",
                i + 1,
                count,
                balanced_count,
                stressed_count
            );
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    client.flush().await?;

    info!(
        "Completed! Published {} profiles ({} balanced, {} stressed)",
        count, balanced_count, stressed_count
    );

    Ok(())
}

async fn run_dry_mode(count: u64, stressed_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = ProfileGenerator::new();

    for i in 0..count {
        let (request, _) = generator.next(stressed_rate);
        let json = serde_json::to_string_pretty(&request)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample profile {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
