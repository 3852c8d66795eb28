//! Interface to the push-based location sensor.
//!
//! A real sensor (platform geolocation, a GNSS receiver, a phone bridge)
//! implements [`LocationSensor`]. The acquirer never talks to hardware
//! directly; it only subscribes, reads [`SensorEvent`]s from the returned
//! [`Subscription`] and, as a last resort, asks for a single fix.

use crate::geodesy::Coordinate;
use async_trait::async_trait;
use futures::stream::{BoxStream, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::time::Duration;

/// Failures reported by the sensor itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorFault {
    /// The user or the OS refused access to location.
    PermissionDenied,

    /// The sensor can't determine a position at all.
    PositionUnavailable,

    /// A single read timed out. The sensor may still deliver later.
    Timeout,

    /// Anything else the platform reports.
    Other(String),
}

impl SensorFault {
    /// Permanent faults end an acquisition without waiting for the
    /// deadline.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            SensorFault::PermissionDenied | SensorFault::PositionUnavailable
        )
    }
}

impl Display for SensorFault {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            SensorFault::PermissionDenied => write!(f, "Permission denied."),
            SensorFault::PositionUnavailable => write!(f, "Position unavailable."),
            SensorFault::Timeout => write!(f, "Sensor read timed out."),
            SensorFault::Other(msg) => write!(f, "Sensor error: {}", msg),
        }
    }
}

impl std::error::Error for SensorFault {}

/// One push from a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorEvent {
    /// A new position fix.
    Update(Coordinate),

    /// The sensor reported a problem.
    Fault(SensorFault),
}

/// A live stream of sensor events.
///
/// The unsubscribe action runs exactly once: on [`Subscription::unsubscribe`]
/// or, failing that, when the subscription is dropped. Once unsubscribed,
/// [`Subscription::next`] yields nothing, even if the producer had already
/// queued more events.
pub struct Subscription {
    events: BoxStream<'static, SensorEvent>,
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap a stream of events and the action that stops it.
    pub fn new<S, F>(events: S, unsubscribe: F) -> Self
    where
        S: Stream<Item = SensorEvent> + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        Subscription {
            events: events.boxed(),
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Next event, or `None` once the stream closed or was unsubscribed.
    pub async fn next(&mut self) -> Option<SensorEvent> {
        if !self.is_active() {
            return None;
        }

        self.events.next().await
    }

    /// Stop the subscription. Further calls do nothing.
    pub fn unsubscribe(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }

    /// False once unsubscribed.
    pub fn is_active(&self) -> bool {
        self.unsubscribe.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Trait for a push-based location sensor.
#[async_trait]
pub trait LocationSensor: Send + Sync {
    /// False when the platform has no location capability at all.
    fn is_supported(&self) -> bool {
        true
    }

    /// Start continuous position updates.
    fn subscribe(&self) -> Result<Subscription, SensorFault>;

    /// Ask for a single fix, giving up after `timeout`.
    async fn request_once(&self, timeout: Duration) -> Result<Coordinate, SensorFault>;
}
