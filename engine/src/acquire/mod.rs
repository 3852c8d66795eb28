//! Best-effort position acquisition.
//!
//! [`PositionAcquirer::acquire`] races a continuous sensor subscription
//! against a deadline and keeps the most precise sample seen. If the
//! deadline passes without any sample, a single-shot request is issued as a
//! last resort. Every call settles exactly once and releases the
//! subscription and the timer on every exit path.

#[macro_use]
pub mod macros;
pub mod scripted;
pub mod sensor;

pub use scripted::{ScriptedEvent, ScriptedSensor, SensorCall, SensorScript};
pub use sensor::{LocationSensor, SensorEvent, SensorFault, Subscription};

use crate::config::Config;
use crate::geodesy::{Coordinate, PositionSample};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

/// Timeout of the single-shot request issued when sampling produced nothing.
pub const FALLBACK_TIMEOUT: Duration = Duration::from_secs(10);

/// How often the sampling countdown is published.
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Why an acquisition produced no coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AcquisitionError {
    /// No location capability on this platform.
    Unsupported,

    /// The user or OS refused location access.
    PermissionDenied,

    /// The deadline passed and the single-shot fallback failed too.
    TimeoutNoFix,

    /// Any other sensor failure.
    SensorError,
}

impl AcquisitionError {
    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            AcquisitionError::Unsupported => "unsupported",
            AcquisitionError::PermissionDenied => "permission-denied",
            AcquisitionError::TimeoutNoFix => "timeout-no-fix",
            AcquisitionError::SensorError => "sensor-error",
        }
    }
}

impl Display for AcquisitionError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            AcquisitionError::Unsupported => write!(f, "Geolocation not supported."),
            AcquisitionError::PermissionDenied => write!(f, "Location permission denied."),
            AcquisitionError::TimeoutNoFix => write!(f, "No position fix before the deadline."),
            AcquisitionError::SensorError => write!(f, "Location sensor error."),
        }
    }
}

impl std::error::Error for AcquisitionError {}

impl From<SensorFault> for AcquisitionError {
    fn from(fault: SensorFault) -> Self {
        match fault {
            SensorFault::PermissionDenied => AcquisitionError::PermissionDenied,
            _ => AcquisitionError::SensorError,
        }
    }
}

/// Outcome of a single [`PositionAcquirer::acquire`] call.
pub type AcquisitionResult = Result<Coordinate, AcquisitionError>;

/// What to do with the requested accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyPolicy {
    /// Sample until the deadline and take the best fix seen, even if it is
    /// worse than requested. A miss is only logged.
    #[default]
    Advisory,

    /// Stop sampling as soon as a fix meets the requested accuracy.
    AcceptWhenMet,
}

/// Observable state of the acquirer, published on a watch channel.
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionState {
    /// No acquisition has run yet.
    Idle,

    /// Sampling is in progress.
    Sampling {
        /// Time since sampling started.
        elapsed: Duration,

        /// Time left before the deadline.
        remaining: Duration,

        /// Accuracy of the best sample so far, if any.
        best_accuracy: Option<f64>,
    },

    /// Sampling produced nothing and the single-shot request is in flight.
    Fallback {
        /// Time the request is given before it fails.
        timeout: Duration,
    },

    /// The last acquisition produced a coordinate.
    Resolved(Coordinate),

    /// The last acquisition failed.
    Failed(AcquisitionError),
}

impl AcquisitionState {
    /// True while a sampling countdown is running.
    pub fn is_sampling(&self) -> bool {
        matches!(self, AcquisitionState::Sampling { .. })
    }

    /// True while an acquisition is running, sampling or in the fallback.
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            AcquisitionState::Sampling { .. } | AcquisitionState::Fallback { .. }
        )
    }
}

/// Produces a single best coordinate from a [`LocationSensor`].
///
/// Callers are expected to run one acquisition at a time per acquirer.
#[derive(Debug)]
pub struct PositionAcquirer<S: LocationSensor> {
    sensor: S,
    state: watch::Sender<AcquisitionState>,
    fallback_timeout: Duration,
    progress_interval: Duration,
    policy: AccuracyPolicy,
}

impl<S: LocationSensor> PositionAcquirer<S> {
    /// Acquirer with the default fallback timeout, progress interval and
    /// the advisory accuracy policy.
    pub fn new(sensor: S) -> Self {
        let (state, _) = watch::channel(AcquisitionState::Idle);

        PositionAcquirer {
            sensor,
            state,
            fallback_timeout: FALLBACK_TIMEOUT,
            progress_interval: PROGRESS_INTERVAL,
            policy: AccuracyPolicy::default(),
        }
    }

    /// Acquirer using the timings and policy from a [`Config`].
    pub fn from_config(sensor: S, config: &Config) -> Self {
        Self::new(sensor)
            .with_fallback_timeout(Duration::from_millis(config.fallback_timeout_ms))
            .with_progress_interval(Duration::from_millis(config.progress_interval_ms))
            .with_policy(config.accuracy_policy)
    }

    pub fn with_fallback_timeout(mut self, timeout: Duration) -> Self {
        self.fallback_timeout = timeout;
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        // tokio intervals panic on a zero period
        self.progress_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_policy(mut self, policy: AccuracyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The underlying sensor.
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Current state.
    pub fn state(&self) -> AcquisitionState {
        self.state.borrow().clone()
    }

    /// Receiver for state changes, including the sampling countdown.
    pub fn watch(&self) -> watch::Receiver<AcquisitionState> {
        self.state.subscribe()
    }

    /// Obtain the best coordinate available within `timeout`.
    ///
    /// `desired_accuracy_meters` is interpreted through the configured
    /// [`AccuracyPolicy`].
    pub async fn acquire(
        &self,
        timeout: Duration,
        desired_accuracy_meters: f64,
    ) -> AcquisitionResult {
        acquire_info!(
            "(acquire) Start, timeout {:?}, desired accuracy {} m, policy {:?}.",
            timeout,
            desired_accuracy_meters,
            self.policy
        );

        let result = self.sample(timeout, desired_accuracy_meters).await;

        match &result {
            Ok(coordinate) => {
                acquire_info!("(acquire) Resolved: {}.", coordinate);
                self.state.send_replace(AcquisitionState::Resolved(*coordinate));
            }
            Err(e) => {
                acquire_warn!("(acquire) Failed [{}]: {}", e.reason(), e);
                self.state.send_replace(AcquisitionState::Failed(*e));
            }
        }

        result
    }

    async fn sample(&self, timeout: Duration, desired_accuracy_meters: f64) -> AcquisitionResult {
        if !self.sensor.is_supported() {
            return Err(AcquisitionError::Unsupported);
        }

        // Replaces whatever the previous call left behind.
        self.state.send_replace(AcquisitionState::Sampling {
            elapsed: Duration::ZERO,
            remaining: timeout,
            best_accuracy: None,
        });

        let mut subscription = match self.sensor.subscribe() {
            Ok(subscription) => subscription,
            Err(fault) if fault.is_permanent() => {
                acquire_error!("(sample) Could not subscribe: {}", fault);
                return Err(fault.into());
            }
            Err(fault) => {
                acquire_warn!(
                    "(sample) Could not subscribe: {}, trying a single fix.",
                    fault
                );
                return self.fallback().await;
            }
        };

        let started = Instant::now();
        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        let mut progress = tokio::time::interval(self.progress_interval);
        progress.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut best: Option<PositionSample> = None;

        loop {
            tokio::select! {
                // The deadline wins ties, so an update racing it is dropped.
                biased;

                _ = &mut deadline => {
                    acquire_debug!("(sample) Deadline reached.");
                    break;
                }

                event = subscription.next() => match event {
                    Some(SensorEvent::Update(coordinate)) => {
                        let sample = PositionSample::new(coordinate);
                        acquire_debug!("(sample) Update: {}.", coordinate);

                        if best.as_ref().map_or(true, |held| sample.is_better_than(held)) {
                            best = Some(sample);
                        }

                        if self.policy == AccuracyPolicy::AcceptWhenMet
                            && coordinate.meets_accuracy(desired_accuracy_meters)
                        {
                            acquire_debug!("(sample) Desired accuracy met, stopping early.");
                            break;
                        }
                    }
                    Some(SensorEvent::Fault(fault)) if fault.is_permanent() => {
                        subscription.unsubscribe();
                        acquire_error!("(sample) Permanent sensor fault: {}", fault);
                        return Err(fault.into());
                    }
                    Some(SensorEvent::Fault(fault)) => {
                        acquire_warn!("(sample) Transient sensor fault: {}", fault);
                    }
                    None => {
                        acquire_info!("(sample) Sensor closed the subscription early.");
                        break;
                    }
                },

                _ = progress.tick() => {
                    let elapsed = started.elapsed();
                    self.state.send_replace(AcquisitionState::Sampling {
                        elapsed,
                        remaining: timeout.saturating_sub(elapsed),
                        best_accuracy: best.as_ref().and_then(|held| held.coordinate.accuracy),
                    });
                }
            }
        }

        subscription.unsubscribe();

        match best {
            Some(sample) => {
                if !sample.coordinate.meets_accuracy(desired_accuracy_meters) {
                    acquire_info!(
                        "(sample) Best fix {:?} m misses the desired {} m, accepting it anyway.",
                        sample.coordinate.accuracy,
                        desired_accuracy_meters
                    );
                }
                acquire_debug!(
                    "(sample) Keeping fix captured at {}.",
                    sample.captured_at.to_rfc3339()
                );
                Ok(sample.coordinate)
            }
            None => self.fallback().await,
        }
    }

    async fn fallback(&self) -> AcquisitionResult {
        self.state.send_replace(AcquisitionState::Fallback {
            timeout: self.fallback_timeout,
        });
        acquire_info!(
            "(fallback) No samples, requesting a single fix ({:?}).",
            self.fallback_timeout
        );

        match tokio::time::timeout(
            self.fallback_timeout,
            self.sensor.request_once(self.fallback_timeout),
        )
        .await
        {
            Ok(Ok(coordinate)) => Ok(coordinate),
            Ok(Err(fault)) => {
                acquire_warn!("(fallback) Single fix failed: {}", fault);
                Err(AcquisitionError::TimeoutNoFix)
            }
            Err(_) => {
                acquire_warn!("(fallback) Single fix timed out.");
                Err(AcquisitionError::TimeoutNoFix)
            }
        }
    }
}
