//! Output formatting demonstration
//!
//! Renders the same navigator state as status text, JSON and a CSV trace.

use deadreckon::api::CsvFormatter;
use deadreckon::{
    ArmState, Estimate, EstimateFormatter, Evaluation, GeoPoint, JsonFormatter,
    NavigationSnapshot,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Dead Reckoning Navigator - Formatting Demo ===\n");

    let fix = GeoPoint::new(47.4979, 19.0402);
    let moved = GeoPoint::new(47.498_08, 19.040_35);
    let snapshots = [
        NavigationSnapshot::default(),
        NavigationSnapshot {
            estimate: Estimate::Unavailable,
            ..Default::default()
        },
        NavigationSnapshot {
            anchor: Some(fix),
            estimate: Estimate::Position(fix),
            last_fix: Some(fix),
            ..Default::default()
        },
        NavigationSnapshot {
            arm_state: ArmState::Armed,
            anchor: Some(moved),
            estimate: Estimate::Position(moved),
            last_fix: Some(fix),
            cumulative_displacement: 20.0,
            heading_deg: 30.0,
            samples_applied: 6,
        },
    ];

    demonstrate_text(&snapshots);
    demonstrate_evaluation(fix, moved)?;
    demonstrate_json(&snapshots[3])?;
    demonstrate_csv(&snapshots);

    println!("Formatting demo completed successfully!");
    Ok(())
}

fn demonstrate_text(snapshots: &[NavigationSnapshot]) {
    println!("1. Status lines:");
    let formatter = EstimateFormatter::new();
    for snapshot in snapshots {
        println!("   {}", formatter.format_snapshot(snapshot));
    }

    let coarse = EstimateFormatter::new().with_precision(3);
    println!("   3 decimals: {}", coarse.format_estimate(&snapshots[3].estimate));
    println!();
}

fn demonstrate_evaluation(fix: GeoPoint, moved: GeoPoint) -> Result<(), serde_json::Error> {
    println!("2. Fix versus estimate:");
    let evaluation = Evaluation {
        fix: Some(fix),
        estimate: Estimate::Position(moved),
        separation_m: Some(20.0),
        arm_state: ArmState::Armed,
    };
    for line in EstimateFormatter::new().format_evaluation(&evaluation).lines() {
        println!("   {}", line);
    }
    println!("   {}", JsonFormatter::new().format_evaluation(&evaluation)?);
    println!();
    Ok(())
}

fn demonstrate_json(snapshot: &NavigationSnapshot) -> Result<(), serde_json::Error> {
    println!("3. Snapshot JSON:");
    println!("{}", JsonFormatter::pretty().format_snapshot(snapshot)?);
    println!();
    Ok(())
}

fn demonstrate_csv(snapshots: &[NavigationSnapshot]) {
    println!("4. CSV trace:");
    println!("{}", CsvFormatter::new().format_trace(snapshots));

    let rows_only = CsvFormatter {
        include_header: false,
    };
    println!("   (without header: {} rows)", rows_only.format_trace(snapshots).lines().count());
    println!();
}
