//! Estimate output formatting and serialization
//!
//! Text rendering for status lines, JSON for structured output and CSV for
//! trace logging. Nothing here touches navigator state.

use crate::api::types::{Evaluation, NavigationSnapshot};
use crate::core::{ArmState, Estimate, GeoPoint};

/// Marker shown in place of coordinates when the provider had no fix
pub const UNAVAILABLE_MARKER: &str = "err";

/// Text shown before the first estimate exists
pub const PENDING_MARKER: &str = "-";

/// Fixed-precision text rendering of points and estimates
#[derive(Debug, Clone)]
pub struct EstimateFormatter {
    /// Decimal places for latitude and longitude
    pub precision: usize,
}

impl Default for EstimateFormatter {
    fn default() -> Self {
        Self { precision: 6 }
    }
}

impl EstimateFormatter {
    /// Create a new estimate formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Set decimal places
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// `lat, lon`
    pub fn format_point(&self, point: &GeoPoint) -> String {
        format!(
            "{:.*}, {:.*}",
            self.precision, point.latitude, self.precision, point.longitude
        )
    }

    /// Point text, or the marker for a pending/unavailable estimate
    pub fn format_estimate(&self, estimate: &Estimate) -> String {
        match estimate {
            Estimate::Position(point) => self.format_point(point),
            Estimate::Unavailable => UNAVAILABLE_MARKER.to_string(),
            Estimate::Pending => PENDING_MARKER.to_string(),
        }
    }

    /// One-line status for a snapshot
    pub fn format_snapshot(&self, snapshot: &NavigationSnapshot) -> String {
        let mode = match snapshot.arm_state {
            ArmState::Armed => "DR",
            ArmState::Disarmed => "FIX",
        };
        let anchor = snapshot
            .anchor
            .map(|point| self.format_point(&point))
            .unwrap_or_else(|| PENDING_MARKER.to_string());

        format!(
            "[{}] estimate: {} | anchor: {} | distance: {:.2} | heading: {:.1}°",
            mode,
            self.format_estimate(&snapshot.estimate),
            anchor,
            snapshot.cumulative_displacement,
            snapshot.heading_deg
        )
    }

    /// Side-by-side fix and estimate, as the evaluate action shows them
    pub fn format_evaluation(&self, evaluation: &Evaluation) -> String {
        let fix = evaluation
            .fix
            .map(|point| self.format_point(&point))
            .unwrap_or_else(|| UNAVAILABLE_MARKER.to_string());

        let mut output = format!(
            "fix: {}\nestimate: {}",
            fix,
            self.format_estimate(&evaluation.estimate)
        );
        if let Some(separation) = evaluation.separation_m {
            output.push_str(&format!("\nseparation: {:.1} m", separation));
        }
        output
    }
}

/// JSON formatter for structured output
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Pretty print JSON
    pub pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pretty-printing JSON formatter
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Format a snapshot as JSON
    pub fn format_snapshot(
        &self,
        snapshot: &NavigationSnapshot,
    ) -> Result<String, serde_json::Error> {
        self.render(snapshot)
    }

    /// Format an evaluation as JSON
    pub fn format_evaluation(&self, evaluation: &Evaluation) -> Result<String, serde_json::Error> {
        self.render(evaluation)
    }

    fn render<T: serde::Serialize>(&self, value: &T) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}

/// CSV formatter for trace logging
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Include header row
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self {
            include_header: true,
        }
    }
}

impl CsvFormatter {
    /// Create a new CSV formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Get CSV header
    pub fn header(&self) -> String {
        "samples,armed,latitude,longitude,displacement,heading_deg".to_string()
    }

    /// Format a snapshot as one CSV row; empty coordinates without a point
    pub fn format_snapshot(&self, snapshot: &NavigationSnapshot) -> String {
        let (latitude, longitude) = match snapshot.estimate.point() {
            Some(point) => (
                format!("{:.7}", point.latitude),
                format!("{:.7}", point.longitude),
            ),
            None => (String::new(), String::new()),
        };

        format!(
            "{},{},{},{},{:.3},{:.1}",
            snapshot.samples_applied,
            snapshot.arm_state.is_armed(),
            latitude,
            longitude,
            snapshot.cumulative_displacement,
            snapshot.heading_deg
        )
    }

    /// Format a sequence of snapshots, one row each, header first when enabled
    pub fn format_trace(&self, snapshots: &[NavigationSnapshot]) -> String {
        let mut rows = Vec::with_capacity(snapshots.len() + 1);
        if self.include_header {
            rows.push(self.header());
        }
        rows.extend(snapshots.iter().map(|snapshot| self.format_snapshot(snapshot)));
        rows.join("\n")
    }
}
