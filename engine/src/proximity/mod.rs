//! Attach finished reports to a position and pull them back up when the
//! user returns to the same spot.

#[macro_use]
pub mod macros;

use crate::compose::FieldReport;
use crate::geodesy::{self, Coordinate};
use async_trait::async_trait;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use tokio::sync::Mutex;

/// Reports further away than this are not offered for retrieval.
pub const DEFAULT_RETRIEVE_RADIUS_METERS: f64 = 50.0;

/// A report saved at a fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedReport {
    pub latitude: f64,
    pub longitude: f64,
    pub location_text: String,
    pub comments_text: String,
}

impl AttachedReport {
    pub fn new(position: &Coordinate, report: &FieldReport) -> Self {
        AttachedReport {
            latitude: position.latitude,
            longitude: position.longitude,
            location_text: report.location_text.clone(),
            comments_text: report.comments_text.clone(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn report(&self) -> FieldReport {
        FieldReport {
            location_text: self.location_text.clone(),
            comments_text: self.comments_text.clone(),
        }
    }
}

/// Errors raised by a [`ReportStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached.
    Unavailable(String),

    /// The store refused the report.
    Rejected(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            StoreError::Unavailable(reason) => write!(f, "Report store unavailable: {}", reason),
            StoreError::Rejected(reason) => write!(f, "Report rejected: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {}

/// Persistence for attached reports.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Save a report.
    async fn attach(&self, report: AttachedReport) -> Result<(), StoreError>;

    /// Every saved report, oldest first.
    async fn all(&self) -> Result<Vec<AttachedReport>, StoreError>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    reports: Mutex<Vec<AttachedReport>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn attach(&self, report: AttachedReport) -> Result<(), StoreError> {
        self.reports.lock().await.push(report);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<AttachedReport>, StoreError> {
        Ok(self.reports.lock().await.clone())
    }
}

/// Save `report` at `position`.
pub async fn attach<T: ReportStore + ?Sized>(
    store: &T,
    position: &Coordinate,
    report: &FieldReport,
) -> Result<(), StoreError> {
    proximity_info!("(attach) Attaching report at {}.", position);

    store
        .attach(AttachedReport::new(position, report))
        .await
        .map_err(|e| {
            proximity_error!("(attach) {}", e);
            e
        })
}

/// The report closest to `position`, if it lies strictly within
/// `radius_meters`. Ties keep the report saved first.
pub fn nearest_within<'a>(
    position: &Coordinate,
    reports: &'a [AttachedReport],
    radius_meters: f64,
) -> Option<(&'a AttachedReport, f64)> {
    reports
        .iter()
        .map(|report| {
            (
                report,
                geodesy::distance_meters(position, &report.coordinate()),
            )
        })
        .min_by_key(|(_, distance)| OrderedFloat(*distance))
        .filter(|(_, distance)| *distance < radius_meters)
}

/// Load the report saved closest to `position` within `radius_meters`.
pub async fn retrieve_nearest<T: ReportStore + ?Sized>(
    store: &T,
    position: &Coordinate,
    radius_meters: f64,
) -> Result<Option<AttachedReport>, StoreError> {
    let reports = store.all().await?;

    match nearest_within(position, &reports, radius_meters) {
        Some((report, distance)) => {
            proximity_info!(
                "(retrieve_nearest) Found report {:.1} m from {}.",
                distance,
                position
            );
            Ok(Some(report.clone()))
        }
        None => {
            proximity_debug!(
                "(retrieve_nearest) No report within {} m of {} ({} saved).",
                radius_meters,
                position,
                reports.len()
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(location_text: &str) -> FieldReport {
        FieldReport {
            location_text: location_text.to_string(),
            comments_text: String::from("Drift observed"),
        }
    }

    #[tokio::test]
    async fn test_retrieve_within_radius() {
        crate::get_log_handle().await;
        ut_info!("(test_retrieve_within_radius) Start.");

        let store = MemoryReportStore::new();
        let saved_at = Coordinate::new(43.6150, -116.2023);
        attach(&store, &saved_at, &report("~50 feet S of Utility pole 79557B"))
            .await
            .unwrap();

        // ~33 m north
        let nearby = Coordinate::new(43.6153, -116.2023);
        let found = retrieve_nearest(&store, &nearby, DEFAULT_RETRIEVE_RADIUS_METERS)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.report(), report("~50 feet S of Utility pole 79557B"));
        assert_eq!(found.coordinate(), saved_at);

        ut_info!("(test_retrieve_within_radius) Success.");
    }

    #[tokio::test]
    async fn test_retrieve_beyond_radius() {
        let store = MemoryReportStore::new();
        attach(&store, &Coordinate::new(43.6150, -116.2023), &report("far"))
            .await
            .unwrap();

        // ~111 m north
        let away = Coordinate::new(43.6160, -116.2023);
        let found = retrieve_nearest(&store, &away, DEFAULT_RETRIEVE_RADIUS_METERS)
            .await
            .unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_retrieve_from_empty_store() {
        let store = MemoryReportStore::new();
        let found = retrieve_nearest(&store, &Coordinate::new(0.0, 0.0), 50.0)
            .await
            .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_nearest_within_picks_closest() {
        let position = Coordinate::new(43.6150, -116.2023);
        let reports = vec![
            AttachedReport::new(&Coordinate::new(43.6153, -116.2023), &report("33 m")),
            AttachedReport::new(&Coordinate::new(43.6151, -116.2023), &report("11 m")),
            AttachedReport::new(&Coordinate::new(43.6151, -116.2023), &report("11 m again")),
        ];

        let (nearest, distance) = nearest_within(&position, &reports, 50.0).unwrap();
        assert_eq!(nearest.location_text, "11 m");
        assert!(distance < 12.0);

        assert!(nearest_within(&position, &reports, 10.0).is_none());
    }

    #[test]
    fn test_radius_is_exclusive() {
        let position = Coordinate::new(0.0, 0.0);
        let reports = vec![AttachedReport::new(&position, &report("here"))];

        assert!(nearest_within(&position, &reports, 0.0).is_none());
        assert!(nearest_within(&position, &reports, 0.1).is_some());
    }
}
