//! Provider selection and service construction.
//!
//! This is the only place in the workspace that names concrete provider
//! types. Everything downstream receives `Arc<dyn Trait>`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use capability::{Notifier, RecordStore, UserDirectory};
use rest::{HttpSettings, RestUserDirectory, WebhookNotifier};
use services::{NotificationService, OnboardingService, RecordService, UserService};
use storage::FileRecordStore;
use substitutes::{FakeUserDirectory, InMemoryRecordStore, RecordingNotifier};

use crate::config::{
    http_url, NotifierConfig, NotifierProvider, RecordsConfig, RecordsProvider, SeamConfig,
    UsersConfig, UsersProvider,
};

/// One provider per capability, chosen by configuration.
#[derive(Clone)]
pub struct Providers {
    /// `[users]`: REST service or seeded in-memory directory.
    pub users: Arc<dyn UserDirectory>,
    /// `[records]`: JSON files under `root` or an in-memory map.
    pub records: Arc<dyn RecordStore>,
    /// `[notifier]`: webhook or recording notifier.
    pub notifier: Arc<dyn Notifier>,
}

impl Providers {
    /// Builds the providers named in `config`.
    pub async fn from_config(config: &SeamConfig) -> anyhow::Result<Self> {
        Ok(Self {
            users: user_directory(&config.users)?,
            records: record_store(&config.records).await?,
            notifier: notifier(&config.notifier)?,
        })
    }

    /// Builds the services on top of these providers.
    pub fn into_services(self) -> Services {
        let users = UserService::new(self.users);
        let records = RecordService::new(self.records);
        let notifications = NotificationService::new(self.notifier);
        let onboarding =
            OnboardingService::new(users.clone(), records.clone(), notifications.clone());
        Services {
            users,
            records,
            notifications,
            onboarding,
        }
    }
}

/// The consumer services the sub-commands call.
#[derive(Clone)]
pub struct Services {
    /// Backs `seam user`.
    pub users: UserService,
    /// Backs `seam record`.
    pub records: RecordService,
    /// Backs `seam notify`.
    pub notifications: NotificationService,
    /// Backs `seam onboard`; shares the providers of the other three.
    pub onboarding: OnboardingService,
}

fn user_directory(config: &UsersConfig) -> anyhow::Result<Arc<dyn UserDirectory>> {
    match config.provider {
        UsersProvider::Rest => {
            let url = http_url("users.base_url", &config.base_url)?;
            let settings = HttpSettings::new(url, Duration::from_millis(config.timeout_ms));
            let directory =
                RestUserDirectory::new(settings).context("cannot create REST user directory")?;
            tracing::debug!(base_url = %config.base_url, "using REST user directory");
            Ok(Arc::new(directory))
        }
        UsersProvider::Memory => {
            let directory = FakeUserDirectory::new();
            for user in &config.seed {
                directory.add_user(user.clone());
            }
            tracing::debug!(seeded = config.seed.len(), "using in-memory user directory");
            Ok(Arc::new(directory))
        }
    }
}

async fn record_store(config: &RecordsConfig) -> anyhow::Result<Arc<dyn RecordStore>> {
    match config.provider {
        RecordsProvider::File => {
            let store = FileRecordStore::open(&config.root).await?;
            tracing::debug!(root = %config.root.display(), "using file record store");
            Ok(Arc::new(store))
        }
        RecordsProvider::Memory => {
            tracing::debug!("using in-memory record store");
            Ok(Arc::new(InMemoryRecordStore::new()))
        }
    }
}

fn notifier(config: &NotifierConfig) -> anyhow::Result<Arc<dyn Notifier>> {
    match config.provider {
        NotifierProvider::Webhook => {
            let url = http_url("notifier.url", &config.url)?;
            let settings = HttpSettings::new(url, Duration::from_millis(config.timeout_ms));
            let notifier =
                WebhookNotifier::new(settings).context("cannot create webhook notifier")?;
            tracing::debug!(url = %config.url, "using webhook notifier");
            Ok(Arc::new(notifier))
        }
        NotifierProvider::Memory => {
            tracing::debug!("using recording notifier; messages are not delivered");
            Ok(Arc::new(RecordingNotifier::new()))
        }
    }
}
