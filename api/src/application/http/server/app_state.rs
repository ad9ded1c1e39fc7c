use std::{
    collections::HashSet,
    sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError},
};

use ecosaur_core::{
    application::EcosaurConversation,
    domain::conversation::{Action, ConversationSnapshot, Dispatch, RejectReason, TurnContent},
};
use tokio::sync::{Mutex, OwnedMutexGuard, watch};
use uuid::Uuid;

use crate::{application::http::server::api_entities::api_error::ApiError, args::Args};

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    conversation: Arc<Mutex<EcosaurConversation>>,
    snapshots: watch::Receiver<ConversationSnapshot>,
    used_recipe_offers: Arc<StdMutex<HashSet<Uuid>>>,
}

impl AppState {
    pub fn new(args: Arc<Args>, conversation: EcosaurConversation) -> Self {
        let snapshots = conversation.subscribe();

        Self {
            args,
            conversation: Arc::new(Mutex::new(conversation)),
            snapshots,
            used_recipe_offers: Arc::new(StdMutex::new(HashSet::new())),
        }
    }

    /// Latest published state. Never waits on an in-flight action.
    pub fn snapshot(&self) -> ConversationSnapshot {
        let snapshot = self.snapshots.borrow().clone();
        without_spent_offers(snapshot, &self.used_offers())
    }

    /// Marks a recipe offer as used. Returns false when it already was.
    pub fn claim_recipe_offer(&self, offer_turn_id: Uuid) -> bool {
        self.used_offers().insert(offer_turn_id)
    }

    pub fn release_recipe_offer(&self, offer_turn_id: &Uuid) {
        self.used_offers().remove(offer_turn_id);
    }

    pub fn forget_recipe_offers(&self) {
        self.used_offers().clear();
    }

    fn used_offers(&self) -> MutexGuard<'_, HashSet<Uuid>> {
        self.used_recipe_offers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one action against the conversation.
    ///
    /// A second request arriving while another holds the conversation is
    /// answered with a conflict instead of queueing behind it. The action
    /// runs on its own task so a dropped client connection cannot cancel it
    /// halfway through a backend call.
    pub async fn dispatch<F, Fut>(&self, action: F) -> Result<ConversationSnapshot, ApiError>
    where
        F: FnOnce(OwnedMutexGuard<EcosaurConversation>) -> Fut + Send + 'static,
        Fut: Future<Output = Dispatch> + Send + 'static,
    {
        let guard = self
            .conversation
            .clone()
            .try_lock_owned()
            .map_err(|_| ApiError::from(RejectReason::Busy))?;

        let dispatch = tokio::spawn(action(guard))
            .await
            .map_err(|e| ApiError::InternalServerError(format!("conversation task failed: {e}")))?;

        match dispatch {
            Dispatch::Accepted => Ok(self.snapshot()),
            Dispatch::Rejected(reason) => {
                tracing::debug!("action rejected: {}", reason);
                Err(ApiError::from(reason))
            }
        }
    }
}

/// Recipe offers are one-shot, so once every offer in the conversation has
/// been used the snapshot stops advertising the recipe action.
fn without_spent_offers(
    mut snapshot: ConversationSnapshot,
    used: &HashSet<Uuid>,
) -> ConversationSnapshot {
    let has_open_offer = snapshot.turns.iter().any(|turn| {
        matches!(turn.content, TurnContent::RecipeOffer { .. }) && !used.contains(&turn.id)
    });
    if !has_open_offer {
        snapshot
            .available_actions
            .retain(|action| *action != Action::RequestRecipe);
    }

    snapshot
}
