//! Per-asset detector registry.
//!
//! Each asset owns its own residual window so one machine's vibration
//! history cannot skew another machine's z-score. Detectors live in a
//! concurrent map and are locked individually; scoring one asset never waits
//! on another asset's update.

use std::sync::Arc;

use adaptiv_types::AssetId;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::config::{DetectorConfig, IsolationMode, RegistryConfig};
use crate::detector::{AnomalyDetector, Detection};
use crate::stats::ResidualStatistics;

type SharedDetector = Arc<Mutex<AnomalyDetector>>;

/// Registry of anomaly detectors keyed by asset.
pub struct DetectorRegistry {
    /// Configuration cloned into every new detector.
    config: DetectorConfig,

    isolation: IsolationMode,

    /// Per-asset detectors.
    detectors: DashMap<AssetId, SharedDetector>,

    /// Detector used for every asset in [`IsolationMode::Shared`].
    shared: SharedDetector,
}

impl DetectorRegistry {
    /// Create an empty registry.
    pub fn new(config: DetectorConfig, registry: RegistryConfig) -> Self {
        info!(
            isolation = ?registry.isolation,
            window_size = config.window_size,
            "Creating detector registry"
        );
        Self {
            shared: Arc::new(Mutex::new(AnomalyDetector::new(config.clone()))),
            detectors: DashMap::new(),
            isolation: registry.isolation,
            config,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn isolation(&self) -> IsolationMode {
        self.isolation
    }

    fn detector_for(&self, asset_id: &AssetId) -> SharedDetector {
        match self.isolation {
            IsolationMode::Shared => Arc::clone(&self.shared),
            IsolationMode::PerAsset => {
                if let Some(existing) = self.detectors.get(asset_id) {
                    return Arc::clone(existing.value());
                }
                let entry = self.detectors.entry(asset_id.clone()).or_insert_with(|| {
                    debug!(asset_id = %asset_id, "Creating detector for asset");
                    Arc::new(Mutex::new(AnomalyDetector::new(self.config.clone())))
                });
                Arc::clone(entry.value())
            }
        }
    }

    /// Score a measurement for an asset.
    pub fn detect(&self, asset_id: &AssetId, vib_rms: f64, omega: f64, load: f64) -> f64 {
        self.detect_detailed(asset_id, vib_rms, omega, load).score
    }

    /// Score a measurement for an asset and return the intermediate values.
    pub fn detect_detailed(
        &self,
        asset_id: &AssetId,
        vib_rms: f64,
        omega: f64,
        load: f64,
    ) -> Detection {
        // The map guard is released before the detector lock is taken.
        let detector = self.detector_for(asset_id);
        let mut detector = detector.lock();
        detector.detect_detailed(vib_rms, omega, load)
    }

    /// Residual statistics for an asset, if it has been seen.
    pub fn statistics(&self, asset_id: &AssetId) -> Option<ResidualStatistics> {
        match self.isolation {
            IsolationMode::Shared => Some(self.shared.lock().statistics()),
            IsolationMode::PerAsset => {
                let detector = self.detectors.get(asset_id).map(|d| Arc::clone(d.value()))?;
                let stats = detector.lock().statistics();
                Some(stats)
            }
        }
    }

    /// Clear an asset's history. Returns false when the asset is unknown.
    pub fn reset(&self, asset_id: &AssetId) -> bool {
        match self.isolation {
            IsolationMode::Shared => {
                self.shared.lock().reset();
                true
            }
            IsolationMode::PerAsset => {
                let Some(detector) = self.detectors.get(asset_id).map(|d| Arc::clone(d.value()))
                else {
                    return false;
                };
                detector.lock().reset();
                info!(asset_id = %asset_id, "Reset detector history");
                true
            }
        }
    }

    /// Clear every asset's history.
    pub fn reset_all(&self) {
        self.shared.lock().reset();
        for entry in self.detectors.iter() {
            entry.value().lock().reset();
        }
    }

    /// Drop an asset's detector entirely.
    pub fn remove(&self, asset_id: &AssetId) -> bool {
        self.detectors.remove(asset_id).is_some()
    }

    /// Assets with a dedicated detector.
    pub fn assets(&self) -> Vec<AssetId> {
        let mut assets: Vec<AssetId> = self.detectors.iter().map(|e| e.key().clone()).collect();
        assets.sort();
        assets
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new(DetectorConfig::default(), RegistryConfig::default())
    }
}
