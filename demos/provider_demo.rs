//! Position provider demonstration
//!
//! Drives a `Navigator` directly against the mock provider: scripted
//! answers, latency, simulated failures and recovery classification.

use deadreckon::hardware::RecoveryStrategy;
use deadreckon::{
    EstimateFormatter, GeoPoint, MockPositionProvider, MotionSample, NavError, Navigator,
    PositionProvider, ProviderError,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Dead Reckoning Navigator - Provider Demo ===\n");

    demo_scripted_provider().await?;
    demo_error_handling().await;
    demo_navigator_session().await?;

    println!("Provider demo completed successfully!");
    Ok(())
}

async fn demo_scripted_provider() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Scripted Provider ---");

    let provider = MockPositionProvider::with_fix(GeoPoint::new(51.5007, -0.1246))
        .with_latency(Duration::from_millis(25));
    provider.push_response(Ok(None));
    provider.push_response(Err(ProviderError::PermissionDenied));

    for i in 0..3 {
        match provider.last_known_fix().await {
            Ok(Some(point)) => println!("Request {}: fix {:?}", i + 1, point),
            Ok(None) => println!("Request {}: no fix cached", i + 1),
            Err(error) => println!("Request {}: {}", i + 1, error),
        }
    }
    println!("Provider served {} requests\n", provider.request_count());
    Ok(())
}

async fn demo_error_handling() {
    println!("--- Error Handling ---");

    let mut provider = MockPositionProvider::with_fix(GeoPoint::new(0.0, 0.0));
    provider.simulate_errors(true, 0.5); // 50% failure rate

    for _ in 0..4 {
        match provider.last_known_fix().await {
            Ok(fix) => println!("Fix: {:?}", fix),
            Err(error) => {
                let advice = match error.recovery_strategy() {
                    RecoveryStrategy::Retry => "retry later",
                    RecoveryStrategy::RequestPermission => "grant location permission",
                };
                println!("Error: {} ({})", error, advice);
            }
        }
    }
    println!();
}

async fn demo_navigator_session() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Navigator Session ---");

    let text = EstimateFormatter::new();
    let provider = MockPositionProvider::with_fix(GeoPoint::new(35.6586, 139.7454));
    let mut navigator = Navigator::new();

    if let Err(error) = navigator.arm() {
        println!("Arm before anchor: {}", error);
    }

    navigator.request_fix(&provider).await?;
    navigator.freeze_anchor();
    navigator.arm()?;
    println!("Anchor: {}", text.format_estimate(&navigator.current_estimate()));

    match navigator.request_fix(&provider).await {
        Err(NavError::FixRequestSuppressed) => println!("Fetch while armed: suppressed"),
        other => println!("Fetch while armed: {:?}", other),
    }

    for sample in [
        MotionSample::heading(45.0),
        MotionSample::acceleration(2.0),
        MotionSample::acceleration(2.0),
    ] {
        if let Some(point) = navigator.on_sample(sample)? {
            println!("{:?} -> {}", sample, text.format_point(&point));
        }
    }

    let evaluation = navigator.evaluate();
    println!("{}\n", text.format_evaluation(&evaluation));
    Ok(())
}
