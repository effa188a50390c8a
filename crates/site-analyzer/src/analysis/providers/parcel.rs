use std::sync::Arc;

use async_trait::async_trait;

use super::arcgis::ArcGisFeatureClient;
use super::{ProviderError, SiteDataProvider};
use crate::analysis::domain::{Coordinate, ParcelInfo};

/// Parcel attributes and outline as returned by a GIS service.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelRecord {
    pub parcel_id: String,
    pub acreage: Option<f64>,
    pub zoning: Option<String>,
    pub boundary: Vec<Coordinate>,
}

/// Looks up the parcel containing a point. `Ok(None)` means no parcel there.
#[async_trait]
pub trait ParcelGis: Send + Sync {
    async fn parcel_at(&self, coordinate: Coordinate) -> Result<Option<ParcelRecord>, ProviderError>;
}

const PARCEL_ID_FIELDS: &[&str] = &["PARCEL_ID", "PARCELID", "APN", "PIN"];
const ACREAGE_FIELDS: &[&str] = &["PARCEL_ACRES", "ACRES", "GIS_ACRES"];
const ZONING_FIELDS: &[&str] = &["ZONING", "ZONE_CODE", "ZONE"];

/// Parcel layer published as an ArcGIS feature service.
#[derive(Debug, Clone)]
pub struct ArcGisParcelService {
    layer: Option<ArcGisFeatureClient>,
}

impl ArcGisParcelService {
    pub fn new(layer: Option<ArcGisFeatureClient>) -> Self {
        Self { layer }
    }
}

#[async_trait]
impl ParcelGis for ArcGisParcelService {
    async fn parcel_at(&self, coordinate: Coordinate) -> Result<Option<ParcelRecord>, ProviderError> {
        let layer = self.layer.as_ref().ok_or(ProviderError::NotConfigured)?;
        let Some(feature) = layer.feature_at(coordinate, true).await? else {
            return Ok(None);
        };

        Ok(Some(ParcelRecord {
            parcel_id: feature
                .text(PARCEL_ID_FIELDS)
                .unwrap_or_else(|| "unnumbered".to_string()),
            acreage: feature.number(ACREAGE_FIELDS),
            zoning: feature.text(ZONING_FIELDS),
            boundary: feature.outer_ring(),
        }))
    }
}

/// Optional parcel provider backed by any [`ParcelGis`].
#[derive(Clone)]
pub struct ParcelProvider {
    gis: Arc<dyn ParcelGis>,
}

impl ParcelProvider {
    pub fn new(gis: Arc<dyn ParcelGis>) -> Self {
        Self { gis }
    }
}

#[async_trait]
impl SiteDataProvider for ParcelProvider {
    type Output = ParcelInfo;

    fn name(&self) -> &'static str {
        "parcel"
    }

    async fn fetch(&self, coordinate: Coordinate) -> Result<ParcelInfo, ProviderError> {
        let record = self
            .gis
            .parcel_at(coordinate)
            .await?
            .ok_or(ProviderError::NoData)?;

        Ok(ParcelInfo {
            parcel_id: record.parcel_id,
            acreage: record.acreage,
            zoning: record.zoning,
            boundary: record.boundary,
        })
    }
}
