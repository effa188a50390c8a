use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::ProviderError;
use crate::analysis::domain::{Coordinate, ElevationSource, ElevationSummary};
use crate::config::ElevationConfig;

/// Single-point elevation lookup, in meters.
#[async_trait]
pub trait ElevationService: Send + Sync {
    async fn lookup(&self, coordinate: Coordinate) -> Result<f64, ProviderError>;
}

/// Open-Elevation compatible `/api/v1/lookup` client.
#[derive(Debug, Clone)]
pub struct OpenElevationClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<LookupResult>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    elevation: f64,
}

impl OpenElevationClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ElevationService for OpenElevationClient {
    async fn lookup(&self, coordinate: Coordinate) -> Result<f64, ProviderError> {
        let url = format!("{}/api/v1/lookup", self.base_url.trim_end_matches('/'));
        let locations = format!("{},{}", coordinate.latitude, coordinate.longitude);

        let body: LookupResponse = self
            .client
            .get(&url)
            .query(&[("locations", locations.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        body.results
            .first()
            .map(|result| result.elevation)
            .ok_or(ProviderError::NoData)
    }
}

/// Elevation summary plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationSurvey {
    pub summary: ElevationSummary,
    pub source: ElevationSource,
}

/// Samples an N×N grid around a coordinate and summarizes whatever succeeds.
///
/// Falls back to a single lookup at the center, then to a synthetic default
/// reading, so a summary is always produced.
#[derive(Clone)]
pub struct ElevationSampler {
    service: Arc<dyn ElevationService>,
    grid_size: usize,
    grid_offset_degrees: f64,
    default_elevation_m: f64,
    call_timeout: Duration,
}

impl ElevationSampler {
    pub fn new(
        service: Arc<dyn ElevationService>,
        config: &ElevationConfig,
        call_timeout: Duration,
    ) -> Self {
        let fallback = ElevationConfig::default();
        let default_elevation_m = if config.default_elevation_m.is_finite() {
            config.default_elevation_m
        } else {
            warn!(
                configured = config.default_elevation_m,
                "non-finite default elevation, using built-in default"
            );
            fallback.default_elevation_m
        };
        let grid_offset_degrees =
            if config.grid_offset_degrees.is_finite() && config.grid_offset_degrees > 0.0 {
                config.grid_offset_degrees
            } else {
                fallback.grid_offset_degrees
            };

        Self {
            service,
            grid_size: config.grid_size.max(1),
            grid_offset_degrees,
            default_elevation_m,
            call_timeout,
        }
    }

    /// Grid points, row-major, centered on `center`.
    pub fn grid_points(&self, center: Coordinate) -> Vec<Coordinate> {
        let half = (self.grid_size / 2) as f64;
        let mut points = Vec::with_capacity(self.grid_size * self.grid_size);
        for i in 0..self.grid_size {
            for j in 0..self.grid_size {
                points.push(center.offset(
                    (i as f64 - half) * self.grid_offset_degrees,
                    (j as f64 - half) * self.grid_offset_degrees,
                ));
            }
        }
        points
    }

    pub async fn sample(&self, center: Coordinate) -> ElevationSummary {
        self.survey(center).await.summary
    }

    pub async fn survey(&self, center: Coordinate) -> ElevationSurvey {
        let points = self.grid_points(center);
        let requested = points.len();

        let lookups = points.into_iter().map(|point| self.lookup(point));
        let readings: Vec<f64> = join_all(lookups).await.into_iter().flatten().collect();

        if let Some(summary) = ElevationSummary::from_samples(readings) {
            let collected = summary.samples.len();
            debug!(collected, requested, "elevation grid sampled");
            return ElevationSurvey {
                summary,
                source: ElevationSource::Grid {
                    collected,
                    requested,
                },
            };
        }

        warn!(requested, "every grid lookup failed, trying single point");
        if let Some(reading) = self.lookup(center).await {
            if let Some(summary) = ElevationSummary::from_samples(vec![reading]) {
                return ElevationSurvey {
                    summary,
                    source: ElevationSource::SinglePoint,
                };
            }
        }

        warn!(
            default_m = self.default_elevation_m,
            "elevation unavailable, substituting synthetic reading"
        );
        ElevationSurvey {
            summary: ElevationSummary::single(self.default_elevation_m),
            source: ElevationSource::Synthetic,
        }
    }

    async fn lookup(&self, point: Coordinate) -> Option<f64> {
        match timeout(self.call_timeout, self.service.lookup(point)).await {
            Ok(Ok(elevation)) => Some(elevation),
            Ok(Err(err)) => {
                debug!(
                    lat = point.latitude,
                    lng = point.longitude,
                    error = %err,
                    "elevation lookup failed"
                );
                None
            }
            Err(_) => {
                debug!(
                    lat = point.latitude,
                    lng = point.longitude,
                    "elevation lookup timed out"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Fails every lookup except those at the configured center.
    struct CenterOnly {
        center: Coordinate,
        elevation: f64,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl ElevationService for CenterOnly {
        async fn lookup(&self, coordinate: Coordinate) -> Result<f64, ProviderError> {
            let mut calls = self.calls.lock().expect("calls mutex");
            *calls += 1;
            if *calls > 1 && coordinate == self.center {
                Ok(self.elevation)
            } else {
                Err(ProviderError::Status(503))
            }
        }
    }

    struct Sloped;

    #[async_trait]
    impl ElevationService for Sloped {
        async fn lookup(&self, coordinate: Coordinate) -> Result<f64, ProviderError> {
            if coordinate.longitude > -111.8905 {
                return Err(ProviderError::Timeout);
            }
            Ok(1300.0 + (coordinate.latitude - 40.7608) * 1000.0)
        }
    }

    struct Down;

    #[async_trait]
    impl ElevationService for Down {
        async fn lookup(&self, _coordinate: Coordinate) -> Result<f64, ProviderError> {
            Err(ProviderError::Transport("connection refused".to_string()))
        }
    }

    fn sampler(service: Arc<dyn ElevationService>) -> ElevationSampler {
        ElevationSampler::new(
            service,
            &ElevationConfig::default(),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn grid_is_centered_and_square() {
        let center = Coordinate::new(40.7608, -111.8910);
        let points = sampler(Arc::new(Down)).grid_points(center);
        assert_eq!(points.len(), 25);
        assert_eq!(points[12], center);
        assert!((points[0].latitude - (center.latitude - 0.002)).abs() < 1e-12);
        assert!((points[24].longitude - (center.longitude + 0.002)).abs() < 1e-12);
    }

    #[tokio::test]
    async fn failed_grid_points_are_dropped() {
        let center = Coordinate::new(40.7608, -111.8910);
        let survey = sampler(Arc::new(Sloped)).survey(center).await;

        // The two eastern-most columns fail.
        assert_eq!(
            survey.source,
            ElevationSource::Grid {
                collected: 15,
                requested: 25
            }
        );
        assert_eq!(survey.summary.samples.len(), 15);
        assert!((survey.summary.range_meters() - 4.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn falls_back_to_single_point() {
        let center = Coordinate::new(40.7608, -111.8910);
        let service = CenterOnly {
            center,
            elevation: 1287.5,
            calls: Mutex::new(0),
        };
        let config = ElevationConfig {
            grid_size: 1,
            ..ElevationConfig::default()
        };
        let sampler = ElevationSampler::new(Arc::new(service), &config, Duration::from_secs(1));

        let survey = sampler.survey(center).await;
        assert_eq!(survey.source, ElevationSource::SinglePoint);
        assert_eq!(survey.summary.samples, vec![1287.5]);
    }

    #[tokio::test]
    async fn synthesizes_default_when_service_is_down() {
        let summary = sampler(Arc::new(Down))
            .sample(Coordinate::new(40.0, -111.0))
            .await;
        assert_eq!(summary, ElevationSummary::single(1300.0));
    }

    #[tokio::test]
    async fn synthetic_reading_stays_finite_with_unusable_settings() {
        let config = ElevationConfig {
            default_elevation_m: f64::NAN,
            grid_offset_degrees: f64::INFINITY,
            ..ElevationConfig::default()
        };
        let center = Coordinate::new(40.7608, -111.8910);
        let sampler = ElevationSampler::new(Arc::new(Down), &config, Duration::from_secs(1));

        let points = sampler.grid_points(center);
        assert!(points
            .iter()
            .all(|p| p.latitude.is_finite() && p.longitude.is_finite()));

        let survey = sampler.survey(center).await;
        assert_eq!(survey.source, ElevationSource::Synthetic);
        let summary = survey.summary;
        assert!(summary.min <= summary.avg && summary.avg <= summary.max);
        assert_eq!(summary.range_meters(), 0.0);
    }
}
