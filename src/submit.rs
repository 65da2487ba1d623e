//! Writes against the remote store.
//!
//! Every write is validated locally first; nothing reaches the network until
//! the required fields are present. Writes are confirmable: a non-success
//! status comes back as [`HubError::RemoteRejected`]. When a write is paired
//! with a [`Synchronizer`], the list is changed optimistically, rolled back if
//! the write fails, and reconciled with a delayed refresh if it succeeds.

use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{HubError, Result};
use crate::remote::{FormFields, RemoteStore, WriteAck, WriteAction};
use crate::sync::{Record, RefreshOutcome, Synchronizer};
use crate::types::{Asset, AssetDraft, AssetType, Idea, IdeaDraft};

/// A single write to the remote store
#[derive(Debug)]
pub enum Mutation {
    CreateAsset(AssetDraft),
    UpdateAsset { id: String, draft: AssetDraft },
    DeleteAsset { id: String },
    SaveOrder(Vec<AssetType>),
    CreateIdea(IdeaDraft),
    DeleteIdea { id: String, password: SecretString },
    /// Append-only access-log event
    Log { user: String, act: String },
}

impl Mutation {
    pub fn action(&self) -> WriteAction {
        match self {
            Mutation::CreateAsset(_) => WriteAction::Create,
            Mutation::UpdateAsset { .. } => WriteAction::Update,
            Mutation::DeleteAsset { .. } => WriteAction::Delete,
            Mutation::SaveOrder(_) => WriteAction::SaveOrder,
            Mutation::CreateIdea(_) => WriteAction::CreateIdea,
            Mutation::DeleteIdea { .. } => WriteAction::DeleteIdea,
            Mutation::Log { .. } => WriteAction::Log,
        }
    }

    /// Id of the record this mutation removes, if any
    pub fn deleted_id(&self) -> Option<&str> {
        match self {
            Mutation::DeleteAsset { id } | Mutation::DeleteIdea { id, .. } => Some(id.as_str()),
            _ => None,
        }
    }

    /// Required-field checks. Runs before any network call.
    pub fn validate(&self) -> Result<()> {
        match self {
            Mutation::CreateAsset(draft) => validate_asset(draft),
            Mutation::UpdateAsset { id, draft } => {
                require_id(id)?;
                validate_asset(draft)
            }
            Mutation::DeleteAsset { id } => require_id(id),
            Mutation::SaveOrder(order) => {
                if order.is_empty() {
                    return Err(HubError::Validation(
                        "category order cannot be empty".to_string(),
                    ));
                }
                Ok(())
            }
            Mutation::CreateIdea(draft) => {
                if draft.nickname.trim().is_empty()
                    || draft.password.expose_secret().is_empty()
                    || draft.content.trim().is_empty()
                {
                    return Err(HubError::Validation(
                        "nickname, password and content are all required".to_string(),
                    ));
                }
                Ok(())
            }
            Mutation::DeleteIdea { id, password } => {
                require_id(id)?;
                if password.expose_secret().is_empty() {
                    return Err(HubError::Validation(
                        "a password is required to delete an idea".to_string(),
                    ));
                }
                Ok(())
            }
            Mutation::Log { user, .. } => {
                if user.trim().is_empty() {
                    return Err(HubError::Validation(
                        "access log events need a user".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Form body, without the `action` field. Passwords are exposed only here.
    pub fn to_form(&self) -> FormFields {
        match self {
            Mutation::CreateAsset(draft) => asset_form(draft),
            Mutation::UpdateAsset { id, draft } => {
                let mut fields = vec![("id", id.trim().to_string())];
                fields.extend(asset_form(draft));
                fields
            }
            Mutation::DeleteAsset { id } => vec![("id", id.trim().to_string())],
            Mutation::SaveOrder(order) => vec![("order", crate::order::join_order(order))],
            Mutation::CreateIdea(draft) => vec![
                ("nickname", draft.nickname.trim().to_string()),
                ("password", draft.password.expose_secret().to_string()),
                ("content", draft.content.trim().to_string()),
            ],
            Mutation::DeleteIdea { id, password } => vec![
                ("id", id.trim().to_string()),
                ("password", password.expose_secret().to_string()),
            ],
            Mutation::Log { user, act } => vec![
                ("user", user.trim().to_string()),
                ("act", act.to_string()),
            ],
        }
    }
}

fn require_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(HubError::Validation("an id is required".to_string()));
    }
    Ok(())
}

fn validate_asset(draft: &AssetDraft) -> Result<()> {
    if draft.title.trim().is_empty() || draft.url.trim().is_empty() {
        return Err(HubError::Validation("title and url are required".to_string()));
    }
    Url::parse(draft.url.trim())
        .map_err(|e| HubError::Validation(format!("url '{}' is not valid: {e}", draft.url)))?;
    Ok(())
}

fn asset_form(draft: &AssetDraft) -> FormFields {
    vec![
        ("title", draft.title.trim().to_string()),
        ("description", draft.description.trim().to_string()),
        ("type", draft.asset_type.as_str().to_string()),
        ("url", draft.url.trim().to_string()),
    ]
}

/// Records whose local list a mutation can change ahead of confirmation
pub trait Optimistic: Record {
    fn apply(mutation: &Mutation, items: &mut Vec<Self>);
}

/// Ids the store assigns are creation timestamps in milliseconds
fn pending_id() -> String {
    Timestamp::now().as_millisecond().to_string()
}

impl Optimistic for Asset {
    fn apply(mutation: &Mutation, items: &mut Vec<Self>) {
        match mutation {
            Mutation::CreateAsset(draft) => items.push(Asset {
                id: pending_id(),
                title: draft.title.trim().to_string(),
                description: draft.description.trim().to_string(),
                asset_type: Some(draft.asset_type),
                url: draft.url.trim().to_string(),
            }),
            Mutation::UpdateAsset { id, draft } => {
                if let Some(asset) = items.iter_mut().find(|a| a.id == id.trim()) {
                    asset.title = draft.title.trim().to_string();
                    asset.description = draft.description.trim().to_string();
                    asset.asset_type = Some(draft.asset_type);
                    asset.url = draft.url.trim().to_string();
                }
            }
            Mutation::DeleteAsset { id } => items.retain(|a| a.id != id.trim()),
            _ => {}
        }
    }
}

impl Optimistic for Idea {
    fn apply(mutation: &Mutation, items: &mut Vec<Self>) {
        // Deletes are left alone: only the store can check the password, so
        // the row stays until the reconciling refresh says otherwise
        if let Mutation::CreateIdea(draft) = mutation {
            items.push(Idea {
                id: pending_id(),
                nickname: draft.nickname.trim().to_string(),
                content: draft.content.trim().to_string(),
                date: Timestamp::now().strftime("%Y-%m-%d").to_string(),
            });
        }
    }
}

/// Outcome of a write followed by a reconciling refresh
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub ack: WriteAck,
    pub refresh: RefreshOutcome,
    /// A deleted record was still listed after a successful refresh
    pub lingering: bool,
}

pub struct Submitter<S: RemoteStore> {
    store: Arc<S>,
    refresh_delay: Duration,
}

impl<S: RemoteStore> Submitter<S> {
    pub fn new(store: Arc<S>, refresh_delay: Duration) -> Self {
        Self {
            store,
            refresh_delay,
        }
    }

    /// Validate and send one write
    pub async fn submit(&self, mutation: &Mutation) -> Result<WriteAck> {
        mutation.validate()?;

        let action = mutation.action();
        let ack = self.store.write(action, mutation.to_form()).await?;
        info!(%action, status = ack.status, "write accepted");
        Ok(ack)
    }

    /// Send a write with an optimistic local change, then reconcile.
    ///
    /// A failed write restores the list as it was before the change. A
    /// successful one waits out the propagation delay and refreshes.
    pub async fn submit_and_sync<T: Optimistic>(
        &self,
        mutation: &Mutation,
        sync: &Synchronizer<T, S>,
    ) -> Result<Submitted> {
        mutation.validate()?;

        let previous = sync.apply_optimistic(|items| T::apply(mutation, items));
        let ack = match self.submit(mutation).await {
            Ok(ack) => ack,
            Err(e) => {
                warn!(action = %mutation.action(), "write failed, rolling back: {e}");
                sync.restore(previous);
                return Err(e);
            }
        };

        debug!(delay_ms = self.refresh_delay.as_millis() as u64, "scheduling reconciling refresh");
        let refresh = sync.refresh_after(self.refresh_delay).await;

        let lingering = refresh.is_updated()
            && mutation
                .deleted_id()
                .is_some_and(|id| sync.contains(id.trim()));

        Ok(Submitted {
            ack,
            refresh,
            lingering,
        })
    }
}
