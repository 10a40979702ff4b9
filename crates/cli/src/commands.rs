//! Sub-commands and their execution against [`Services`].

use anyhow::{anyhow, Context};
use capability::{AlertSeverity, Notification, Recipient, RecordKey, UserId};
use clap::Subcommand;
use serde_json::{json, Value};
use services::OnboardingOutcome;

use crate::wiring::Services;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look a user up and print their name.
    User {
        /// User id.
        id: String,
    },
    /// Work with stored records.
    Record {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Send a notification.
    Notify {
        /// Where to send it.
        recipient: String,
        #[command(subcommand)]
        kind: NotifyKind,
    },
    /// Look a user up, record them, and send a welcome message.
    Onboard {
        /// User id.
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum RecordAction {
    /// Store a JSON document under a key.
    Put { key: String, json: String },
    /// Print the record stored under a key.
    Get { key: String },
    /// Remove the record stored under a key.
    Delete { key: String },
    /// List every stored key.
    List,
}

#[derive(Debug, Subcommand)]
pub enum NotifyKind {
    /// An operational alert.
    Alert {
        /// info, warning, or critical.
        severity: AlertSeverity,
        text: String,
    },
    /// A welcome greeting.
    Welcome { name: String },
}

/// Runs `command` and returns the JSON document to print.
pub async fn execute(command: Command, services: &Services) -> anyhow::Result<Value> {
    match command {
        Command::User { id } => {
            let id = user_id(&id)?;
            let name = services.users.get_user_name(&id).await?;
            Ok(json!({ "id": id, "found": name.is_some(), "name": name }))
        }
        Command::Record { action } => execute_record(action, services).await,
        Command::Notify { recipient, kind } => {
            let recipient =
                Recipient::new(recipient).ok_or_else(|| anyhow!("recipient must not be empty"))?;
            let notification = match kind {
                NotifyKind::Alert { severity, text } => Notification::Alert { severity, text },
                NotifyKind::Welcome { name } => Notification::Welcome { name },
            };
            let delivery = services
                .notifications
                .notify(recipient.clone(), &notification)
                .await?;
            Ok(json!({ "recipient": recipient, "delivery": delivery }))
        }
        Command::Onboard { id } => {
            let id = user_id(&id)?;
            match services.onboarding.onboard(&id).await? {
                OnboardingOutcome::Onboarded { record, delivery } => Ok(json!({
                    "id": id,
                    "onboarded": true,
                    "record": record.key,
                    "delivery": delivery,
                })),
                OnboardingOutcome::UnknownUser => Ok(json!({ "id": id, "onboarded": false })),
            }
        }
    }
}

async fn execute_record(action: RecordAction, services: &Services) -> anyhow::Result<Value> {
    match action {
        RecordAction::Put { key, json: text } => {
            let payload: Value =
                serde_json::from_str(&text).context("record payload is not valid JSON")?;
            let record = services.records.save(record_key(&key)?, payload).await?;
            Ok(serde_json::to_value(record)?)
        }
        RecordAction::Get { key } => {
            let key = record_key(&key)?;
            match services.records.load(&key).await? {
                Some(record) => Ok(serde_json::to_value(record)?),
                None => Ok(json!({ "key": key, "found": false })),
            }
        }
        RecordAction::Delete { key } => {
            let key = record_key(&key)?;
            let removed = services.records.remove(&key).await?;
            Ok(json!({ "key": key, "removed": removed }))
        }
        RecordAction::List => Ok(json!({ "keys": services.records.keys().await? })),
    }
}

fn user_id(value: &str) -> anyhow::Result<UserId> {
    UserId::new(value).ok_or_else(|| anyhow!("user id must not be empty"))
}

fn record_key(value: &str) -> anyhow::Result<RecordKey> {
    RecordKey::new(value).ok_or_else(|| {
        anyhow!("'{value}' is not a valid record key (letters, digits, '_', '-', '.'; not starting with '.')")
    })
}
