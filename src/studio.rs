//! 组合根：把生成器、本地存储与请求服务装配在一起。
//!
//! Composition root tying the generator, the local store and the request service
//! together. The CLI is a thin layer over [`NameStudio`].

use crate::api::ApiService;
use crate::client::{GenerationStats, NameGenerator, NameGeneratorBuilder};
use crate::clock::{system_clock, Clock};
use crate::config::AppConfig;
use crate::export::{export_names, ExportFormat};
use crate::storage::{FileStore, KeyValueStore, LocalStore};
use crate::transport::HttpTransport;
use crate::types::{Analytics, GeneratedNameSet, HistoryItem, NameCategory, Settings};
use crate::{Error, ErrorContext, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub const EMPTY_DESCRIPTION: &str = "Please enter a description";

pub struct NameStudio {
    generator: NameGenerator,
    store: LocalStore,
    api: ApiService,
}

impl NameStudio {
    pub fn new(generator: NameGenerator, store: LocalStore, api: ApiService) -> Self {
        Self {
            generator,
            store,
            api,
        }
    }

    /// Wire everything from configuration, persisting under the configured data directory.
    pub fn open(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let backend: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::open(config.storage.resolved_data_dir())?);
        Self::with_backend(config, backend, system_clock(), None)
    }

    /// Wire everything over an explicit store backend and clock. `api_key`, when given,
    /// bypasses the credential lookup.
    pub fn with_backend(
        config: &AppConfig,
        backend: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        api_key: Option<String>,
    ) -> Result<Self> {
        let transport = HttpTransport::new(config.generator.proxy_url.as_deref())?;
        let mut builder = NameGeneratorBuilder::new()
            .config(config.generator.clone())
            .transport(transport.clone());
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        let generator = builder.build()?;
        let store =
            LocalStore::with_max_history(backend.clone(), clock.clone(), config.storage.max_history)?;
        let api = ApiService::new(transport, backend, clock, &config.api);
        Ok(Self::new(generator, store, api))
    }

    pub fn generator(&self) -> &NameGenerator {
        &self.generator
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn api(&self) -> &ApiService {
        &self.api
    }

    pub async fn generate(&self, settings: &Settings) -> Result<GeneratedNameSet> {
        self.generate_with_stats(settings).await.map(|(set, _)| set)
    }

    /// Generate names and record them: one API call counted, one history item prepended.
    pub async fn generate_with_stats(
        &self,
        settings: &Settings,
    ) -> Result<(GeneratedNameSet, GenerationStats)> {
        let description = settings.description();
        if description.is_empty() && settings.category == NameCategory::Custom {
            return Err(Error::configuration_with_context(
                EMPTY_DESCRIPTION,
                ErrorContext::new().with_field_path("settings.customPrompt"),
            ));
        }

        self.store.record_api_call()?;
        let (names, stats) = self.generator.generate_with_stats(settings).await?;

        let prompt = if description.is_empty() {
            settings.category.as_str().to_string()
        } else {
            description.to_string()
        };
        self.store
            .add_history(prompt, names.clone(), settings.category)?;

        let set = GeneratedNameSet::new(names);
        if set.is_short_of(settings.num_names) {
            info!(
                requested = settings.num_names,
                generated = set.len(),
                "fewer names generated than requested"
            );
        }
        Ok((set, stats))
    }

    /// Stored settings, or the defaults when none were saved yet.
    pub fn settings(&self) -> Result<Settings> {
        Ok(self.store.get_settings()?.unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.store.set_settings(settings)
    }

    pub fn toggle_favorite(&self, name: &str) -> Result<bool> {
        self.store.toggle_favorite(name)
    }

    pub fn favorites(&self) -> Result<Vec<String>> {
        self.store.get_favorites()
    }

    pub fn clear_favorites(&self) -> Result<()> {
        self.store.clear_favorites()
    }

    pub fn history(&self) -> Result<Vec<HistoryItem>> {
        self.store.get_history()
    }

    pub fn clear_history(&self) -> Result<()> {
        self.store.clear_history()
    }

    pub fn analytics(&self) -> Result<Analytics> {
        self.store.get_analytics()
    }

    /// Write `names` to `path` and count the export.
    pub fn export_to_file(
        &self,
        names: &[String],
        format: ExportFormat,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        let contents = export_names(names, format)?;
        std::fs::write(path, contents)?;
        self.store.record_export()?;
        info!(path = %path.display(), names = names.len(), "names exported");
        Ok(())
    }
}
