//! Fire-and-forget image generation jobs.

use std::sync::Arc;

use campaign_core::CreativeEngine;
use campaign_store::ProjectStore;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Handles of image jobs spawned by `trigger_all_images`.
///
/// Each job writes its result back through [`ProjectStore::update_ad`], so
/// jobs finishing together on the same project never overwrite each other.
#[derive(Clone, Default)]
pub struct ImageJobs {
    handles: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl ImageJobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn one job for an ad whose loading flag is already set.
    pub async fn spawn(
        &self,
        store: ProjectStore,
        engine: Arc<dyn CreativeEngine>,
        project_id: String,
        ad_id: String,
        visual_prompt: String,
    ) {
        let handle = tokio::spawn(async move {
            let image = match engine.generate_image(&visual_prompt).await {
                Ok(image) => image,
                Err(e) => {
                    warn!("Image generation failed for ad {}: {}", ad_id, e);
                    None
                }
            };
            let generated = image.is_some();

            let updated = store
                .update_ad(&project_id, &ad_id, |ad| {
                    ad.is_loading_image = false;
                    if image.is_some() {
                        ad.image_url = image;
                    }
                })
                .await;
            match updated {
                Ok(_) if generated => info!("Image ready for ad {} in project {}", ad_id, project_id),
                Ok(_) => debug!("No image produced for ad {}", ad_id),
                Err(e) => warn!("Could not record image for ad {}: {}", ad_id, e),
            }
        });

        let mut handles = self.handles.lock().await;
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Number of jobs that have not finished yet.
    pub async fn pending(&self) -> usize {
        let handles = self.handles.lock().await;
        handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// Wait for every spawned job to finish.
    pub async fn wait_all(&self) {
        let handles: Vec<_> = std::mem::take(&mut *self.handles.lock().await);
        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Image job panicked: {}", e);
            }
        }
    }
}
