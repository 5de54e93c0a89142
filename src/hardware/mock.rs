//! Mock collaborators for testing and development

use crate::core::{GeoPoint, MotionSample};
use crate::hardware::{MotionFeed, PositionProvider, ProviderError, ProviderResult};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Mock position provider with scripted answers
pub struct MockPositionProvider {
    responses: Mutex<VecDeque<ProviderResult<Option<GeoPoint>>>>,
    fallback: ProviderResult<Option<GeoPoint>>,
    latency: Option<Duration>,
    simulate_errors: bool,
    error_probability: f32,
    requests: AtomicU32,
}

impl MockPositionProvider {
    /// Provider that never has a fix
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: Ok(None),
            latency: None,
            simulate_errors: false,
            error_probability: 0.0,
            requests: AtomicU32::new(0),
        }
    }

    /// Provider that always answers with `point`
    pub fn with_fix(point: GeoPoint) -> Self {
        let mut provider = Self::new();
        provider.fallback = Ok(Some(point));
        provider
    }

    /// Provider that always fails with `error`
    pub fn failing(error: ProviderError) -> Self {
        let mut provider = Self::new();
        provider.fallback = Err(error);
        provider
    }

    /// Queue a one-shot answer, served before the fallback
    pub fn push_response(&self, response: ProviderResult<Option<GeoPoint>>) {
        self.responses.lock().push_back(response);
    }

    /// Delay every answer
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Enable error simulation with given probability (0.0 to 1.0)
    pub fn simulate_errors(&mut self, enable: bool, probability: f32) {
        self.simulate_errors = enable;
        self.error_probability = probability.clamp(0.0, 1.0);
    }

    /// Number of fix requests received so far
    pub fn request_count(&self) -> u32 {
        self.requests.load(Ordering::SeqCst)
    }

    fn should_simulate_error(&self) -> bool {
        if !self.simulate_errors {
            return false;
        }

        use rand::Rng;
        let mut rng = rand::thread_rng();
        rng.gen::<f32>() < self.error_probability
    }

    fn next_response(&self) -> ProviderResult<Option<GeoPoint>> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        if self.should_simulate_error() {
            return Err(ProviderError::Internal {
                details: "Simulated provider failure".to_string(),
            });
        }

        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for MockPositionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionProvider for MockPositionProvider {
    fn last_known_fix(&self) -> impl Future<Output = ProviderResult<Option<GeoPoint>>> + Send {
        let response = self.next_response();
        let latency = self.latency;
        async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            response
        }
    }
}

/// Motion feed replaying a fixed list of samples
#[derive(Debug, Default)]
pub struct ScriptedMotionFeed {
    samples: VecDeque<MotionSample>,
}

impl ScriptedMotionFeed {
    pub fn new<I: IntoIterator<Item = MotionSample>>(samples: I) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    pub fn push(&mut self, sample: MotionSample) {
        self.samples.push_back(sample);
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl MotionFeed for ScriptedMotionFeed {
    fn next_sample(&mut self) -> Option<MotionSample> {
        self.samples.pop_front()
    }

    fn is_exhausted(&self) -> bool {
        self.samples.is_empty()
    }
}
