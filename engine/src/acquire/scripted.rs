//! A [`LocationSensor`] that replays a scripted timeline.
//!
//! Used to drive the acquirer from recorded or hand-written sessions (the
//! `acquire` CLI subcommand reads one from JSON) and in tests. Every call
//! made against the sensor is written to a journal so callers can check
//! ordering, e.g. that the subscription was released before the single-shot
//! fallback was issued.

use super::sensor::{LocationSensor, SensorEvent, SensorFault, Subscription};
use crate::geodesy::Coordinate;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// An event delivered `after_ms` milliseconds after subscribing (or after
/// the single-shot request was issued).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    /// Offset from the start of the subscription.
    pub after_ms: u64,

    /// What the sensor pushes at that point.
    pub event: SensorEvent,
}

/// Full description of a scripted sensor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorScript {
    /// Whether the platform reports a location capability.
    pub supported: bool,

    /// If set, `subscribe` fails immediately with this fault.
    pub subscribe_fault: Option<SensorFault>,

    /// Subscription timeline.
    pub events: Vec<ScriptedEvent>,

    /// Close the stream after the last event instead of staying silent.
    pub close_after_events: bool,

    /// Outcome of the single-shot request. `None` never answers.
    pub once: Option<ScriptedEvent>,
}

impl Default for SensorScript {
    fn default() -> Self {
        SensorScript {
            supported: true,
            subscribe_fault: None,
            events: vec![],
            close_after_events: false,
            once: None,
        }
    }
}

/// Calls recorded by [`ScriptedSensor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorCall {
    Subscribe,
    Unsubscribe,
    RequestOnce,
}

/// Replays a [`SensorScript`] on the tokio clock.
///
/// `subscribe` spawns the producer task, so it must be called from within
/// a tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSensor {
    script: SensorScript,
    journal: Arc<Mutex<Vec<SensorCall>>>,
}

fn record(journal: &Mutex<Vec<SensorCall>>, call: SensorCall) {
    match journal.lock() {
        Ok(mut calls) => calls.push(call),
        Err(poisoned) => poisoned.into_inner().push(call),
    }
}

impl ScriptedSensor {
    /// A supported sensor with an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sensor replaying the given script.
    pub fn from_script(script: SensorScript) -> Self {
        ScriptedSensor {
            script,
            journal: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Report no location capability.
    pub fn unsupported(mut self) -> Self {
        self.script.supported = false;
        self
    }

    /// Push a position update `after_ms` into the subscription.
    pub fn with_update(mut self, after_ms: u64, coordinate: Coordinate) -> Self {
        self.script.events.push(ScriptedEvent {
            after_ms,
            event: SensorEvent::Update(coordinate),
        });
        self
    }

    /// Push a fault `after_ms` into the subscription.
    pub fn with_fault(mut self, after_ms: u64, fault: SensorFault) -> Self {
        self.script.events.push(ScriptedEvent {
            after_ms,
            event: SensorEvent::Fault(fault),
        });
        self
    }

    /// Refuse to subscribe at all.
    pub fn failing_subscribe(mut self, fault: SensorFault) -> Self {
        self.script.subscribe_fault = Some(fault);
        self
    }

    /// Close the subscription stream after the last scripted event.
    pub fn closing(mut self) -> Self {
        self.script.close_after_events = true;
        self
    }

    /// Answer the single-shot request with a fix after `after_ms`.
    pub fn with_once_fix(mut self, after_ms: u64, coordinate: Coordinate) -> Self {
        self.script.once = Some(ScriptedEvent {
            after_ms,
            event: SensorEvent::Update(coordinate),
        });
        self
    }

    /// Answer the single-shot request with a fault after `after_ms`.
    pub fn with_once_fault(mut self, after_ms: u64, fault: SensorFault) -> Self {
        self.script.once = Some(ScriptedEvent {
            after_ms,
            event: SensorEvent::Fault(fault),
        });
        self
    }

    /// Snapshot of every call made so far, in order.
    pub fn journal(&self) -> Vec<SensorCall> {
        match self.journal.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl LocationSensor for ScriptedSensor {
    fn is_supported(&self) -> bool {
        self.script.supported
    }

    fn subscribe(&self) -> Result<Subscription, SensorFault> {
        record(&self.journal, SensorCall::Subscribe);

        if let Some(fault) = &self.script.subscribe_fault {
            return Err(fault.clone());
        }

        let mut timeline = self.script.events.clone();
        timeline.sort_by_key(|scripted| scripted.after_ms);
        let close_after_events = self.script.close_after_events;

        let token = CancellationToken::new();
        let producer_token = token.clone();
        let (tx, rx) = mpsc::unbounded_channel::<SensorEvent>();

        tokio::spawn(async move {
            let mut elapsed_ms = 0;
            for scripted in timeline {
                let wait = Duration::from_millis(scripted.after_ms.saturating_sub(elapsed_ms));
                tokio::select! {
                    biased;
                    _ = producer_token.cancelled() => return,
                    _ = tokio::time::sleep(wait) => {}
                }

                elapsed_ms = scripted.after_ms;
                if tx.send(scripted.event).is_err() {
                    return;
                }
            }

            if !close_after_events {
                producer_token.cancelled().await;
            }
            drop(tx);
        });

        let events = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        });

        let journal = self.journal.clone();
        Ok(Subscription::new(events, move || {
            token.cancel();
            record(&journal, SensorCall::Unsubscribe);
        }))
    }

    async fn request_once(&self, timeout: Duration) -> Result<Coordinate, SensorFault> {
        record(&self.journal, SensorCall::RequestOnce);

        let Some(scripted) = self.script.once.clone() else {
            tokio::time::sleep(timeout).await;
            return Err(SensorFault::Timeout);
        };

        let wait = Duration::from_millis(scripted.after_ms);
        if wait > timeout {
            tokio::time::sleep(timeout).await;
            return Err(SensorFault::Timeout);
        }

        tokio::time::sleep(wait).await;
        match scripted.event {
            SensorEvent::Update(coordinate) => Ok(coordinate),
            SensorEvent::Fault(fault) => Err(fault),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_replays_timeline_in_order() {
        let first = Coordinate::new(1.0, 1.0).with_accuracy(30.0);
        let second = Coordinate::new(2.0, 2.0).with_accuracy(10.0);
        let sensor = ScriptedSensor::new()
            .with_update(200, second)
            .with_update(100, first)
            .closing();

        let mut subscription = sensor.subscribe().unwrap();
        assert_eq!(subscription.next().await, Some(SensorEvent::Update(first)));
        assert_eq!(subscription.next().await, Some(SensorEvent::Update(second)));
        assert_eq!(subscription.next().await, None);

        drop(subscription);
        assert_eq!(
            sensor.journal(),
            vec![SensorCall::Subscribe, SensorCall::Unsubscribe]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_once_times_out() {
        let sensor = ScriptedSensor::new().with_once_fix(5_000, Coordinate::new(1.0, 1.0));
        let result = sensor.request_once(Duration::from_millis(1_000)).await;

        assert_eq!(result, Err(SensorFault::Timeout));
        assert_eq!(sensor.journal(), vec![SensorCall::RequestOnce]);
    }

    #[test]
    fn test_script_from_json() {
        let json = r#"{
            "events": [
                { "after_ms": 500, "event": { "update": { "latitude": 43.6, "longitude": -116.2, "accuracy": 12.0 } } },
                { "after_ms": 900, "event": { "fault": "timeout" } }
            ],
            "once": { "after_ms": 100, "event": { "fault": "permission_denied" } }
        }"#;

        let script: SensorScript = serde_json::from_str(json).unwrap();
        assert!(script.supported);
        assert_eq!(script.events.len(), 2);
        assert_eq!(
            script.events[0].event,
            SensorEvent::Update(Coordinate::new(43.6, -116.2).with_accuracy(12.0))
        );
        assert_eq!(
            script.once.map(|once| once.event),
            Some(SensorEvent::Fault(SensorFault::PermissionDenied))
        );
    }
}
