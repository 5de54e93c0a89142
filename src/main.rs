use deadreckon::api::{CsvFormatter, NavigationEvent};
use deadreckon::{
    spawn_feed_pump, EstimateFormatter, GeoPoint, MockPositionProvider, MotionSample,
    NavigationService, NavigatorConfig, ScriptedMotionFeed,
};
use log::info;
use std::time::Duration;

const DEMO_FIX: GeoPoint = GeoPoint {
    latitude: 47.497_9,
    longitude: 19.040_2,
};

/// Walk north for a while, turn east, then slow down
fn demo_motion() -> Vec<MotionSample> {
    let mut samples = vec![MotionSample::heading(0.0)];
    samples.extend((0..5).map(|_| MotionSample::acceleration(1.2)));
    samples.push(MotionSample::heading(90.0));
    samples.extend((0..5).map(|_| MotionSample::acceleration(0.8)));
    samples.push(MotionSample::heading(135.0));
    samples.extend((0..3).map(|_| MotionSample::acceleration(0.3)));
    samples
}

fn load_config(args: &[String]) -> Result<NavigatorConfig, Box<dyn std::error::Error>> {
    match args.get(1).map(String::as_str) {
        None => Ok(NavigatorConfig::default()),
        Some("--print-config") => {
            println!("{}", serde_json::to_string_pretty(&NavigatorConfig::default())?);
            std::process::exit(0);
        }
        Some(path) => Ok(NavigatorConfig::from_file(path)?),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 2 {
        eprintln!(
            "Usage: {} [config.json | --print-config]",
            args.first().map_or("deadreckon", |s| s.as_str())
        );
        std::process::exit(1);
    }

    let config = load_config(&args)?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_filter()),
    )
    .init();
    info!("Configuration: {:?}", config);

    let text = EstimateFormatter::new();
    let provider = MockPositionProvider::with_fix(DEMO_FIX).with_latency(Duration::from_millis(20));

    let mut service = NavigationService::new(config, provider)?;
    service.register_callback(Box::new(|event: &NavigationEvent| {
        if event.is_error() {
            println!("! {}", event.message());
        } else if !matches!(event, NavigationEvent::EstimateAdvanced(_)) {
            println!("> {}", event.message());
        }
    }));
    let handle = service.spawn();

    // Dead reckoning needs an anchor first
    let _ = handle.enable_dead_reckoning().await;

    handle.fetch_fix().await?;
    handle.freeze_anchor().await?;
    handle.enable_dead_reckoning().await?;
    let _ = handle.fetch_fix().await;

    let mut updates = handle.subscribe();
    let trace = tokio::spawn(async move {
        let mut snapshots = Vec::new();
        while updates.changed().await.is_ok() {
            snapshots.push(*updates.borrow_and_update());
        }
        snapshots
    });

    let pump = spawn_feed_pump(
        handle.clone(),
        ScriptedMotionFeed::new(demo_motion()),
        Duration::from_millis(10),
    );
    let forwarded = pump.await?;
    info!("Forwarded {} motion samples", forwarded);

    let evaluation = handle.evaluate().await?;
    println!("{}", text.format_evaluation(&evaluation));
    println!("{}", text.format_snapshot(&handle.snapshot()));

    handle.disable_dead_reckoning().await?;
    let evaluation = handle.fetch_and_evaluate().await?;
    println!("{}", text.format_evaluation(&evaluation));

    drop(handle);
    println!("{}", CsvFormatter::new().format_trace(&trace.await?));

    Ok(())
}
