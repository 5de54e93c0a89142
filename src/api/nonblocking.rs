//! Non-blocking navigation service
//!
//! A single tokio task owns the `Navigator`. Commands and motion samples reach
//! it through one bounded queue, so every mutation is serialized and samples
//! apply in arrival order. Provider calls run in their own tasks and post
//! their outcome back to the owner, which re-checks the mode before applying.
//! Readers get immutable snapshots through a watch channel.

use crate::api::callback::{CallbackHandle, EventCallback, EventDispatcher, NavigationEvent};
use crate::api::types::{
    Command, CommandResponse, Evaluation, NavError, NavResult, NavigationSnapshot,
};
use crate::core::{GeoPoint, MotionSample};
use crate::hardware::{MotionFeed, PositionProvider, ProviderError, ProviderResult};
use crate::processing::Navigator;
use crate::utils::config::NavigatorConfig;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

type CommandReply = oneshot::Sender<NavResult<CommandResponse>>;
type SampleReply = oneshot::Sender<NavResult<Option<GeoPoint>>>;

/// Work item for the owning task
#[derive(Debug)]
enum Request {
    Command {
        command: Command,
        reply: CommandReply,
    },
    Sample {
        sample: MotionSample,
        reply: Option<SampleReply>,
    },
}

/// Provider answer travelling back to the owning task
struct FixCompletion {
    outcome: ProviderResult<Option<GeoPoint>>,
    reply: CommandReply,
}

/// Navigation service under construction
pub struct NavigationService<P> {
    config: NavigatorConfig,
    navigator: Navigator,
    provider: Arc<P>,
    dispatcher: EventDispatcher,
}

impl<P: PositionProvider + 'static> NavigationService<P> {
    /// Create a service; the configuration is validated first
    pub fn new(config: NavigatorConfig, provider: P) -> NavResult<Self> {
        config.validate()?;
        Ok(Self {
            navigator: Navigator::from_config(&config),
            config,
            provider: Arc::new(provider),
            dispatcher: EventDispatcher::new(),
        })
    }

    /// Register a status callback before the service starts
    pub fn register_callback(&mut self, callback: EventCallback) -> CallbackHandle {
        self.dispatcher.register(callback)
    }

    /// Start the owning task on the current tokio runtime
    pub fn spawn(self) -> NavigationHandle {
        let (request_tx, request_rx) = mpsc::channel(self.config.command_queue_depth);
        let (snapshot_tx, snapshot_rx) = watch::channel(self.navigator.snapshot());

        let task = ServiceTask {
            fix_timeout: Duration::from_millis(self.config.fix_timeout_ms),
            navigator: self.navigator,
            provider: self.provider,
            dispatcher: self.dispatcher,
            snapshots: snapshot_tx,
        };
        tokio::spawn(task.run(request_rx));
        info!(
            "Navigation service started (queue depth {}, fix timeout {}ms)",
            self.config.command_queue_depth, self.config.fix_timeout_ms
        );

        NavigationHandle {
            requests: request_tx,
            snapshots: snapshot_rx,
        }
    }
}

/// State owned by the service task
struct ServiceTask<P> {
    navigator: Navigator,
    provider: Arc<P>,
    dispatcher: EventDispatcher,
    snapshots: watch::Sender<NavigationSnapshot>,
    fix_timeout: Duration,
}

impl<P: PositionProvider + 'static> ServiceTask<P> {
    async fn run(mut self, mut requests: mpsc::Receiver<Request>) {
        let (completion_tx, mut completions) = mpsc::unbounded_channel::<FixCompletion>();

        loop {
            tokio::select! {
                Some(completion) = completions.recv() => self.finish_fix(completion),
                request = requests.recv() => match request {
                    Some(Request::Command { command, reply }) => {
                        self.handle_command(command, reply, &completion_tx)
                    }
                    Some(Request::Sample { sample, reply }) => self.handle_sample(sample, reply),
                    None => break,
                },
            }
        }

        info!("Navigation service stopped");
    }

    fn handle_command(
        &mut self,
        command: Command,
        reply: CommandReply,
        completions: &mpsc::UnboundedSender<FixCompletion>,
    ) {
        debug!("Command {:?}", command);
        let result = match command {
            Command::FetchFix => {
                if let Err(error) = self.navigator.begin_fix_request() {
                    self.dispatcher.dispatch(&NavigationEvent::FixRequestSuppressed);
                    Err(error)
                } else {
                    self.start_fetch(reply, completions.clone());
                    return;
                }
            }
            Command::FreezeAnchor => {
                let frozen = self.navigator.freeze_anchor();
                let event = match frozen {
                    Some(point) => NavigationEvent::AnchorFrozen(point),
                    None => NavigationEvent::AnchorFreezeSkipped,
                };
                self.dispatcher.dispatch(&event);
                Ok(CommandResponse::AnchorFrozen(frozen))
            }
            Command::EnableDeadReckoning => match self.navigator.arm() {
                Ok(_) => {
                    self.dispatcher.dispatch(&NavigationEvent::DeadReckoningEnabled);
                    Ok(CommandResponse::Armed)
                }
                Err(error) => {
                    let reason = match &error {
                        NavError::CannotArm { reason } => reason.clone(),
                        other => other.to_string(),
                    };
                    self.dispatcher.dispatch(&NavigationEvent::ArmRejected { reason });
                    Err(error)
                }
            },
            Command::DisableDeadReckoning => {
                self.navigator.disarm();
                self.dispatcher.dispatch(&NavigationEvent::DeadReckoningDisabled);
                Ok(CommandResponse::Disarmed)
            }
            Command::Evaluate => Ok(CommandResponse::Evaluation(self.navigator.evaluate())),
        };

        self.publish();
        let _ = reply.send(result);
    }

    fn start_fetch(&self, reply: CommandReply, completions: mpsc::UnboundedSender<FixCompletion>) {
        let provider = Arc::clone(&self.provider);
        let timeout = self.fix_timeout;

        tokio::spawn(async move {
            let outcome = match tokio::time::timeout(timeout, provider.last_known_fix()).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ProviderError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                }),
            };
            if completions.send(FixCompletion { outcome, reply }).is_err() {
                debug!("Fix completed after service shutdown");
            }
        });
    }

    fn finish_fix(&mut self, completion: FixCompletion) {
        let result = self.navigator.complete_fix_request(completion.outcome);
        self.dispatcher
            .dispatch(&NavigationEvent::from_fix_result(&result));

        self.publish();
        let _ = completion.reply.send(result.map(CommandResponse::FixAcquired));
    }

    fn handle_sample(&mut self, sample: MotionSample, reply: Option<SampleReply>) {
        let result = self.navigator.on_sample(sample);
        match &result {
            Ok(Some(point)) => {
                self.dispatcher
                    .dispatch(&NavigationEvent::EstimateAdvanced(*point));
            }
            Ok(None) => {}
            Err(error) => warn!("Sample {:?} rejected: {}", sample, error),
        }

        self.publish();
        if let Some(reply) = reply {
            let _ = reply.send(result);
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.navigator.snapshot());
    }
}

/// Cloneable command surface for the presentation layer
///
/// The service stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct NavigationHandle {
    requests: mpsc::Sender<Request>,
    snapshots: watch::Receiver<NavigationSnapshot>,
}

impl NavigationHandle {
    /// Run a command and wait for its outcome
    pub async fn execute(&self, command: Command) -> NavResult<CommandResponse> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request::Command { command, reply })
            .await
            .map_err(|_| NavError::ServiceStopped)?;
        response.await.map_err(|_| NavError::ServiceStopped)?
    }

    /// Fetch the provider's last known fix into the live estimate
    pub async fn fetch_fix(&self) -> NavResult<GeoPoint> {
        match self.execute(Command::FetchFix).await? {
            CommandResponse::FixAcquired(point) => Ok(point),
            other => Err(unexpected(other)),
        }
    }

    /// Save the live estimate as the dead-reckoning anchor
    pub async fn freeze_anchor(&self) -> NavResult<Option<GeoPoint>> {
        match self.execute(Command::FreezeAnchor).await? {
            CommandResponse::AnchorFrozen(anchor) => Ok(anchor),
            other => Err(unexpected(other)),
        }
    }

    pub async fn enable_dead_reckoning(&self) -> NavResult<()> {
        self.execute(Command::EnableDeadReckoning).await.map(|_| ())
    }

    pub async fn disable_dead_reckoning(&self) -> NavResult<()> {
        self.execute(Command::DisableDeadReckoning).await.map(|_| ())
    }

    pub async fn evaluate(&self) -> NavResult<Evaluation> {
        match self.execute(Command::Evaluate).await? {
            CommandResponse::Evaluation(evaluation) => Ok(evaluation),
            other => Err(unexpected(other)),
        }
    }

    /// Try a fresh fix, then compare it with the live estimate
    ///
    /// A failed or suppressed fetch is not an error here: the comparison
    /// falls back to the last fix on record, and the failure still reaches
    /// registered callbacks.
    pub async fn fetch_and_evaluate(&self) -> NavResult<Evaluation> {
        match self.fetch_fix().await {
            Err(NavError::ServiceStopped) => return Err(NavError::ServiceStopped),
            Err(error) => debug!("Evaluating without a fresh fix: {}", error),
            Ok(_) => {}
        }
        self.evaluate().await
    }

    /// Queue a motion sample without waiting for it to be applied
    pub async fn submit_sample(&self, sample: MotionSample) -> NavResult<()> {
        self.requests
            .send(Request::Sample {
                sample,
                reply: None,
            })
            .await
            .map_err(|_| NavError::ServiceStopped)
    }

    /// Apply a motion sample and wait for the resulting estimate
    pub async fn apply_sample(&self, sample: MotionSample) -> NavResult<Option<GeoPoint>> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request::Sample {
                sample,
                reply: Some(reply),
            })
            .await
            .map_err(|_| NavError::ServiceStopped)?;
        response.await.map_err(|_| NavError::ServiceStopped)?
    }

    /// Latest published state
    pub fn snapshot(&self) -> NavigationSnapshot {
        *self.snapshots.borrow()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<NavigationSnapshot> {
        self.snapshots.clone()
    }
}

fn unexpected(response: CommandResponse) -> NavError {
    NavError::Internal {
        details: format!("unexpected response {:?}", response),
    }
}

/// Forward samples from `feed` into the service every `period`
///
/// A zero period polls the feed as fast as the runtime allows, yielding
/// between polls. Stops when the feed is exhausted or the service is gone;
/// returns the number of samples forwarded.
pub fn spawn_feed_pump<F>(
    handle: NavigationHandle,
    mut feed: F,
    period: Duration,
) -> JoinHandle<usize>
where
    F: MotionFeed + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = (!period.is_zero()).then(|| tokio::time::interval(period));
        let mut forwarded = 0;

        loop {
            match ticker.as_mut() {
                Some(ticker) => {
                    ticker.tick().await;
                }
                None => tokio::task::yield_now().await,
            }
            while let Some(sample) = feed.next_sample() {
                if handle.submit_sample(sample).await.is_err() {
                    warn!("Feed pump stopped: service gone");
                    return forwarded;
                }
                forwarded += 1;
            }
            if feed.is_exhausted() {
                debug!("Feed exhausted after {} samples", forwarded);
                return forwarded;
            }
        }
    })
}
