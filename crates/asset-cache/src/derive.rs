//! Local cache of transformed derivatives

use crate::capability::{Optimizer, Transformer};
use crate::materialize;
use crate::transform::TransformSpec;
use crate::types::{Asset, Stats};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

/// Produces derivatives next to their original, one file per distinct spec.
///
/// Transform and optimize failures are logged and never returned: the
/// derivative path is handed back regardless, and a missing file surfaces
/// when the caller opens it. Derivatives are never invalidated.
#[derive(Clone)]
pub struct TransformCache {
    transformer: Arc<dyn Transformer>,
    optimizer: Arc<dyn Optimizer>,
    stats: Arc<Stats>,
}

impl TransformCache {
    pub fn new(
        transformer: Arc<dyn Transformer>,
        optimizer: Arc<dyn Optimizer>,
        stats: Arc<Stats>,
    ) -> Self {
        Self {
            transformer,
            optimizer,
            stats,
        }
    }

    pub async fn derive(&self, original: &Asset, spec: &TransformSpec) -> Asset {
        let path = spec.derived_path(&original.path);
        let derived = Asset {
            key: original.key.clone(),
            path: path.clone(),
            mime_type: original.mime_type.clone(),
            extension: original.extension.clone(),
            ..Default::default()
        };

        if matches!(fs::try_exists(&path).await, Ok(true)) {
            self.stats.derivative(true);
            debug!(path = ?path, "Derivative cache hit");
            return derived;
        }
        self.stats.derivative(false);

        // runs to completion even when the caller is dropped
        let cache = self.clone();
        let source = original.path.clone();
        let spec = spec.clone();
        let dest = path.clone();
        let task = tokio::spawn(async move { cache.produce(&source, &spec, &dest).await });
        if let Err(e) = task.await {
            warn!(path = ?path, error = %e, "Transform task failed");
        }

        derived
    }

    async fn produce(&self, source: &Path, spec: &TransformSpec, path: &Path) {
        let operations = spec.operations();
        if operations.is_empty() {
            warn!(spec = %spec, "No known operation in transform spec");
            return;
        }

        // each operation reads the original and overwrites the same output
        let temp = materialize::temp_sibling(path);
        let mut produced = false;
        for operation in operations {
            info!(source = ?source, operation = %operation, dimensions = %spec.dimensions(), "Transforming");
            match self
                .transformer
                .transform(source, operation, spec.dimensions(), &temp)
                .await
            {
                Ok(()) => produced = true,
                Err(e) => {
                    warn!(source = ?source, operation = %operation, error = %e, "Transform failed")
                }
            }
        }

        if !produced || !matches!(fs::try_exists(&temp).await, Ok(true)) {
            materialize::discard(&temp).await;
            return;
        }

        if let Err(e) = self.optimizer.optimize(&temp).await {
            warn!(path = ?path, error = %e, "Optimize failed");
        }

        if let Err(e) = materialize::commit(&temp, path).await {
            warn!(path = ?path, error = %e, "Failed to store derivative");
        }
    }
}
