use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use super::parcel::ParcelGis;
use super::{ProviderError, SiteDataProvider};
use crate::analysis::domain::{Coordinate, ImageOverlay, SatelliteImage};
use crate::config::ImageryConfig;

/// What to draw on top of the static map.
#[derive(Debug, Clone, PartialEq)]
pub enum MapOverlay {
    Polygon(Vec<Coordinate>),
    Marker(Coordinate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticMapRequest {
    pub center: Coordinate,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
    pub overlay: MapOverlay,
}

/// Raw image returned by a static imagery service.
#[derive(Debug, Clone, PartialEq)]
pub struct MapImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[async_trait]
pub trait StaticMapService: Send + Sync {
    async fn render(&self, request: &StaticMapRequest) -> Result<MapImage, ProviderError>;
}

/// Google Static Maps client in satellite mode.
#[derive(Debug, Clone)]
pub struct GoogleStaticMapService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleStaticMapService {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    pub(crate) fn query_params(request: &StaticMapRequest, key: &str) -> Vec<(String, String)> {
        let mut params = vec![
            (
                "center".to_string(),
                format!(
                    "{},{}",
                    request.center.latitude, request.center.longitude
                ),
            ),
            ("zoom".to_string(), request.zoom.to_string()),
            (
                "size".to_string(),
                format!("{}x{}", request.width, request.height),
            ),
            ("maptype".to_string(), "satellite".to_string()),
        ];

        match &request.overlay {
            MapOverlay::Polygon(points) => {
                // Close the ring on the first vertex.
                let vertices: Vec<String> = points
                    .iter()
                    .chain(points.first())
                    .map(|point| format!("{:.6},{:.6}", point.latitude, point.longitude))
                    .collect();
                let path = format!(
                    "color:0xff0000ff|weight:3|fillcolor:0xff000033|{}",
                    vertices.join("|")
                );
                params.push(("path".to_string(), path));
            }
            MapOverlay::Marker(point) => {
                params.push((
                    "markers".to_string(),
                    format!("color:red|{:.6},{:.6}", point.latitude, point.longitude),
                ));
            }
        }

        params.push(("key".to_string(), key.to_string()));
        params
    }
}

#[async_trait]
impl StaticMapService for GoogleStaticMapService {
    async fn render(&self, request: &StaticMapRequest) -> Result<MapImage, ProviderError> {
        let key = self.api_key.as_deref().ok_or(ProviderError::NotConfigured)?;
        let params = Self::query_params(request, key);

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(mime::IMAGE_PNG.as_ref())
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(ProviderError::Decode(format!(
                "expected an image, got {content_type}"
            )));
        }

        let bytes = response.bytes().await?.to_vec();
        if bytes.is_empty() {
            return Err(ProviderError::NoData);
        }

        Ok(MapImage {
            bytes,
            content_type,
        })
    }
}

/// Reduce a boundary with more than `threshold` vertices by keeping every
/// k-th vertex so at most `target` remain. Lossy: it does not preserve the
/// outline's shape or perimeter.
///
/// Douglas–Peucker would keep the outline faithful if that ever matters.
pub fn decimate_boundary(points: &[Coordinate], threshold: usize, target: usize) -> Vec<Coordinate> {
    if points.len() <= threshold {
        return points.to_vec();
    }

    let target = target.max(1);
    let stride = points.len().div_ceil(target);
    points.iter().step_by(stride).copied().collect()
}

/// Satellite imagery with the parcel outline drawn when one is known.
#[derive(Clone)]
pub struct StaticMapImagery {
    parcels: Arc<dyn ParcelGis>,
    maps: Arc<dyn StaticMapService>,
    zoom: u8,
    width: u32,
    height: u32,
    max_boundary_points: usize,
    decimated_boundary_points: usize,
}

impl StaticMapImagery {
    pub fn new(
        parcels: Arc<dyn ParcelGis>,
        maps: Arc<dyn StaticMapService>,
        config: &ImageryConfig,
    ) -> Self {
        Self {
            parcels,
            maps,
            zoom: config.zoom,
            width: config.width,
            height: config.height,
            max_boundary_points: config.max_boundary_points,
            decimated_boundary_points: config.decimated_boundary_points,
        }
    }

    /// Best effort: any failure or a degenerate outline yields a marker.
    async fn overlay_for(&self, center: Coordinate) -> MapOverlay {
        let boundary = match self.parcels.parcel_at(center).await {
            Ok(Some(record)) => record.boundary,
            Ok(None) => Vec::new(),
            Err(err) => {
                debug!(error = %err, "parcel boundary unavailable for imagery");
                Vec::new()
            }
        };

        if boundary.len() < 3 {
            return MapOverlay::Marker(center);
        }

        MapOverlay::Polygon(decimate_boundary(
            &boundary,
            self.max_boundary_points,
            self.decimated_boundary_points,
        ))
    }
}

#[async_trait]
impl SiteDataProvider for StaticMapImagery {
    type Output = SatelliteImage;

    fn name(&self) -> &'static str {
        "satellite_imagery"
    }

    async fn fetch(&self, coordinate: Coordinate) -> Result<SatelliteImage, ProviderError> {
        let overlay = self.overlay_for(coordinate).await;
        let image_overlay = match &overlay {
            MapOverlay::Polygon(points) => ImageOverlay::ParcelBoundary {
                vertices: points.len(),
            },
            MapOverlay::Marker(_) => ImageOverlay::CenterMarker,
        };

        let request = StaticMapRequest {
            center: coordinate,
            zoom: self.zoom,
            width: self.width,
            height: self.height,
            overlay,
        };
        let image = self.maps.render(&request).await?;

        Ok(SatelliteImage {
            bytes: image.bytes,
            content_type: image.content_type,
            overlay: image_overlay,
        })
    }
}
