use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::gateway::{HttpGateway, SubmissionError, SubmissionGateway};
use crate::core::media::{PreviewProvider, TempPreviewStore};
use crate::core::requests::{RequestRecord, DEVELOPER_REQUEST_FORM};
use crate::core::wizard::{FormSchema, WizardController};

use super::events::AppEvent;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to create HTTP client: {0}")]
    Gateway(#[from] SubmissionError),

    #[error("Failed to create preview directory: {0}")]
    Previews(#[from] std::io::Error),
}

/// Centralized handle to the backend and shared resources.
///
/// Created once at startup and passed by reference to views that need it.
pub struct Services {
    pub gateway: Arc<dyn SubmissionGateway>,
    pub previews: Arc<dyn PreviewProvider>,
    pub success_delay: Duration,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Initialize services from config.
    ///
    /// Failures here are fatal; the TUI cannot submit anything without them.
    pub fn init(
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Result<Self, ServiceError> {
        let gateway = HttpGateway::from_config(&config.api)?;
        log::info!("HTTP gateway initialized for {}", gateway.base_url());

        let previews = TempPreviewStore::new()?;
        log::info!("Media previews stored in {}", previews.dir().display());

        Ok(Self::new(
            Arc::new(gateway),
            Arc::new(previews),
            config.wizard.success_delay(),
            event_tx,
        ))
    }

    pub fn new(
        gateway: Arc<dyn SubmissionGateway>,
        previews: Arc<dyn PreviewProvider>,
        success_delay: Duration,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            gateway,
            previews,
            success_delay,
            event_tx,
        }
    }

    /// Build a creation wizard whose completion is reported as
    /// [`AppEvent::Submitted`] tagged with `wizard_id`.
    pub fn create_wizard(&self, schema: &'static FormSchema, wizard_id: u64) -> WizardController {
        let controller = WizardController::new(schema, Arc::clone(&self.gateway))
            .with_media(Arc::clone(&self.previews));
        self.finish_wizard(controller, wizard_id)
    }

    /// Build an edit wizard prefilled from `record`.
    pub fn edit_wizard(&self, record: &RequestRecord, wizard_id: u64) -> WizardController {
        let controller =
            WizardController::for_edit(&DEVELOPER_REQUEST_FORM, Arc::clone(&self.gateway), record);
        self.finish_wizard(controller, wizard_id)
    }

    fn finish_wizard(&self, controller: WizardController, wizard_id: u64) -> WizardController {
        let tx = self.event_tx.clone();
        controller
            .with_success_delay(self.success_delay)
            .on_complete(move |record| {
                let _ = tx.send(AppEvent::Submitted {
                    wizard_id,
                    record: record.clone(),
                });
            })
    }

    /// Run the profile-completeness check in the background. The result
    /// arrives as [`AppEvent::ProfileChecked`].
    pub fn spawn_profile_check(&self, wizard_id: u64) {
        let gateway = Arc::clone(&self.gateway);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = gateway.check_profile().await;
            if let Err(ref e) = result {
                log::warn!("Profile check failed: {e}");
            }
            let _ = tx.send(AppEvent::ProfileChecked { wizard_id, result });
        });
    }
}
