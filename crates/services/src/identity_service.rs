use std::sync::Arc;

use tracing::{debug, warn};

use exam_core::model::UserId;
use storage::KeyValueStore;
use storage::keys;
use storage::repository::{load_json, save_json};

/// Owns the durable anonymous learner id.
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn KeyValueStore>,
}

impl IdentityService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Return the stored learner id, creating and persisting one on first use.
    ///
    /// Never fails: an unreadable or corrupt entry is replaced by a fresh id,
    /// and a failed write still returns the generated id for this run.
    pub async fn get_or_create_user_id(&self) -> UserId {
        match load_json::<String>(self.store.as_ref(), keys::USER_ID).await {
            Ok(Some(raw)) => match raw.parse::<UserId>() {
                Ok(id) => return id,
                Err(err) => warn!(%err, "stored user id is blank; generating a new one"),
            },
            Ok(None) => debug!("no stored user id; generating one"),
            Err(err) => warn!(%err, "could not read stored user id; generating a new one"),
        }

        let id = UserId::generate();
        if let Err(err) = save_json(self.store.as_ref(), keys::USER_ID, id.as_str()).await {
            warn!(%err, "failed to persist generated user id");
        }
        id
    }
}
