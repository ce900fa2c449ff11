//! Composition root.

use std::sync::Arc;

use anyhow::{Context, Result};
use pptee_core::capability::CapabilityRepository;
use pptee_core::config::PpteeConfig;
use pptee_core::conversation::ConversationRepository;
use pptee_core::kv::KeyValueStore;
use pptee_core::session::SessionRepository;
use pptee_core::settings::SettingsRepository;
use pptee_core::workflow::{FailureInjector, RandomFailure};
use pptee_execution::{WorkflowEvent, WorkflowExecutor};
use pptee_infrastructure::{
    ConfigService, FileKeyValueStore, KvCapabilityRepository, KvConversationRepository,
    KvSessionRepository, KvSettingsRepository, PpteePaths,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    CapabilityUseCase, DashboardService, HistoryService, InferenceUseCase, SecurityService,
    SessionUseCase, SettingsService, SetupUseCase,
};

/// Every service of the platform, wired over one key-value store and one
/// workflow executor.
#[derive(Clone)]
pub struct AppContext {
    pub config: PpteeConfig,
    pub executor: Arc<WorkflowExecutor>,
    pub session: SessionUseCase,
    pub capability: CapabilityUseCase,
    pub setup: SetupUseCase,
    pub inference: InferenceUseCase,
    pub history: HistoryService,
    pub settings: SettingsService,
    pub dashboard: DashboardService,
    pub security: SecurityService,
}

impl AppContext {
    /// Builds the file-backed context rooted at `paths`.
    ///
    /// Loads (or creates) `config.toml`, opens the key-value store, and uses
    /// random failure injection at the configured rates.
    pub async fn bootstrap(
        paths: &PpteePaths,
        config_override: Option<PpteeConfig>,
        event_sender: Option<UnboundedSender<WorkflowEvent>>,
    ) -> Result<Self> {
        paths
            .ensure_dirs()
            .with_context(|| format!("Failed to create {}", paths.root().display()))?;

        let config = match config_override {
            Some(config) => config,
            None => ConfigService::new(paths.config_file())
                .get_config()
                .context("Failed to load configuration")?,
        };
        tracing::info!("[Bootstrap] Using root {}", paths.root().display());

        let store = FileKeyValueStore::open(paths.storage_file())
            .await
            .context("Failed to open local storage")?;
        tracing::info!(
            "[Bootstrap] Local storage ready at {}",
            paths.storage_file().display()
        );

        let injector = Arc::new(RandomFailure::new(
            config.simulation.capability_failure_rate,
            config.simulation.inference_failure_rate,
        ));
        Ok(Self::assemble(Arc::new(store), config, injector, event_sender))
    }

    /// Wires every service over `store`.
    pub fn assemble(
        store: Arc<dyn KeyValueStore>,
        config: PpteeConfig,
        injector: Arc<dyn FailureInjector>,
        event_sender: Option<UnboundedSender<WorkflowEvent>>,
    ) -> Self {
        let session_repository: Arc<dyn SessionRepository> =
            Arc::new(KvSessionRepository::new(store.clone()));
        let capability_repository: Arc<dyn CapabilityRepository> =
            Arc::new(KvCapabilityRepository::new(store.clone()));
        let conversation_repository: Arc<dyn ConversationRepository> =
            Arc::new(KvConversationRepository::new(store.clone()));
        let settings_repository: Arc<dyn SettingsRepository> =
            Arc::new(KvSettingsRepository::new(store));

        let mut executor =
            WorkflowExecutor::new(injector).with_time_scale(config.simulation.time_scale);
        executor.set_event_sender(event_sender);
        let executor = Arc::new(executor);

        let session = SessionUseCase::new(
            session_repository.clone(),
            capability_repository.clone(),
            config.simulation.login_delay(),
        );

        Self {
            capability: CapabilityUseCase::new(
                session.clone(),
                capability_repository.clone(),
                executor.clone(),
            ),
            setup: SetupUseCase::new(
                session.clone(),
                capability_repository.clone(),
                executor.clone(),
            ),
            inference: InferenceUseCase::new(
                session.clone(),
                conversation_repository.clone(),
                executor.clone(),
                config.simulation.response_delay(),
            ),
            history: HistoryService::new(
                session_repository.clone(),
                conversation_repository.clone(),
            ),
            settings: SettingsService::new(session_repository.clone(), settings_repository),
            dashboard: DashboardService::new(
                session_repository.clone(),
                conversation_repository,
            ),
            security: SecurityService::new(session_repository, capability_repository),
            session,
            executor,
            config,
        }
    }
}
