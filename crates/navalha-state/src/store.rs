// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store trait and the in-memory implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use navalha_core::types::{
    ConversationContext, ConversationState, ConversationStep, TenantId, UserRole,
};

/// Partial update applied to a conversation state.
///
/// Step, role, and linkage fields replace the stored value when set;
/// `context` is shallow-merged into the stored scratchpad.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub current_step: Option<ConversationStep>,
    pub user_role: Option<UserRole>,
    pub linked_barber_id: Option<String>,
    pub linked_client_id: Option<String>,
    pub context: Option<ConversationContext>,
}

/// Keyed access to conversation states.
///
/// Operations on a missing key return `None` rather than an error; callers
/// treat that as "start over". `reset` returns the state to `idle` with an
/// empty scratchpad but keeps the cached role and record linkages, so the
/// next conversation skips re-resolution.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Serializes all handling for one (tenant, sender) key. The guard must
    /// be held across every read and write belonging to one inbound message.
    async fn lock(&self, tenant: &TenantId, sender: &str) -> OwnedMutexGuard<()>;

    /// Returns the existing state, or creates one at `idle` with an empty
    /// scratchpad and unknown role.
    async fn get_or_create(&self, tenant: &TenantId, sender: &str) -> ConversationState;

    /// Returns the existing state, if any.
    async fn get(&self, tenant: &TenantId, sender: &str) -> Option<ConversationState>;

    /// Applies a partial update. Returns the updated state, or `None` when
    /// no state exists for the key.
    async fn update(
        &self,
        tenant: &TenantId,
        sender: &str,
        update: StateUpdate,
    ) -> Option<ConversationState>;

    /// Convenience wrapper over [`ConversationStore::update`] replacing only
    /// the step.
    async fn set_step(
        &self,
        tenant: &TenantId,
        sender: &str,
        step: ConversationStep,
    ) -> Option<ConversationState> {
        self.update(
            tenant,
            sender,
            StateUpdate {
                current_step: Some(step),
                ..Default::default()
            },
        )
        .await
    }

    /// Convenience wrapper shallow-merging scratchpad fields.
    async fn update_context(
        &self,
        tenant: &TenantId,
        sender: &str,
        context: ConversationContext,
    ) -> Option<ConversationState> {
        self.update(
            tenant,
            sender,
            StateUpdate {
                context: Some(context),
                ..Default::default()
            },
        )
        .await
    }

    /// Returns the state to `idle` and clears the scratchpad entirely,
    /// preserving role and linkage caches.
    async fn reset(&self, tenant: &TenantId, sender: &str) -> Option<ConversationState>;
}

/// In-memory store backed by a concurrent map.
///
/// One entry per (tenant, sender). The per-key lock map grows with the key
/// space; entries are never evicted, matching the state map itself.
#[derive(Default)]
pub struct MemoryStateStore {
    states: DashMap<String, ConversationState>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(tenant: &TenantId, sender: &str) -> String {
        format!("{tenant}:{sender}")
    }
}

#[async_trait]
impl ConversationStore for MemoryStateStore {
    async fn lock(&self, tenant: &TenantId, sender: &str) -> OwnedMutexGuard<()> {
        let key = Self::key(tenant, sender);
        let mutex = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    async fn get_or_create(&self, tenant: &TenantId, sender: &str) -> ConversationState {
        let key = Self::key(tenant, sender);
        if let Some(existing) = self.states.get(&key) {
            return existing.clone();
        }

        let now = Utc::now();
        let state = ConversationState {
            id: format!("conv_{}", uuid::Uuid::new_v4()),
            tenant_id: tenant.clone(),
            sender_address: sender.to_string(),
            current_step: ConversationStep::Idle,
            context: ConversationContext::default(),
            user_role: UserRole::Unknown,
            linked_barber_id: None,
            linked_client_id: None,
            created_at: now,
            updated_at: now,
        };
        self.states.insert(key, state.clone());
        tracing::debug!(tenant = %tenant, sender, "created conversation state");
        state
    }

    async fn get(&self, tenant: &TenantId, sender: &str) -> Option<ConversationState> {
        self.states
            .get(&Self::key(tenant, sender))
            .map(|s| s.clone())
    }

    async fn update(
        &self,
        tenant: &TenantId,
        sender: &str,
        update: StateUpdate,
    ) -> Option<ConversationState> {
        let key = Self::key(tenant, sender);
        let mut entry = self.states.get_mut(&key)?;

        if let Some(step) = update.current_step {
            entry.current_step = step;
        }
        if let Some(role) = update.user_role {
            entry.user_role = role;
        }
        if let Some(barber_id) = update.linked_barber_id {
            entry.linked_barber_id = Some(barber_id);
        }
        if let Some(client_id) = update.linked_client_id {
            entry.linked_client_id = Some(client_id);
        }
        if let Some(context) = update.context {
            entry.context.merge(context);
        }
        entry.updated_at = Utc::now();

        Some(entry.clone())
    }

    async fn reset(&self, tenant: &TenantId, sender: &str) -> Option<ConversationState> {
        let key = Self::key(tenant, sender);
        let mut entry = self.states.get_mut(&key)?;

        entry.current_step = ConversationStep::Idle;
        entry.context = ConversationContext::default();
        entry.updated_at = Utc::now();

        Some(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use navalha_core::types::BarberChoice;

    fn tenant() -> TenantId {
        TenantId::from("shop-1")
    }

    #[tokio::test]
    async fn get_or_create_is_stable_before_reset() {
        let store = MemoryStateStore::new();
        let first = store.get_or_create(&tenant(), "5511999990000").await;
        let second = store.get_or_create(&tenant(), "5511999990000").await;
        assert_eq!(first.id, second.id);
        assert_eq!(second.current_step, ConversationStep::Idle);

        // Reset keeps the same entry too; only step/context change.
        store.reset(&tenant(), "5511999990000").await.unwrap();
        let third = store.get_or_create(&tenant(), "5511999990000").await;
        assert_eq!(first.id, third.id);
    }

    #[tokio::test]
    async fn same_sender_under_two_tenants_gets_two_states() {
        let store = MemoryStateStore::new();
        let a = store.get_or_create(&TenantId::from("shop-a"), "551100").await;
        let b = store.get_or_create(&TenantId::from("shop-b"), "551100").await;
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn update_merges_context_shallowly() {
        let store = MemoryStateStore::new();
        store.get_or_create(&tenant(), "551100").await;

        store
            .update_context(
                &tenant(),
                "551100",
                ConversationContext {
                    service_id: Some("service-1".into()),
                    service_name: Some("Corte".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = store
            .update_context(
                &tenant(),
                "551100",
                ConversationContext {
                    date: NaiveDate::from_ymd_opt(2026, 3, 14),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.context.service_id.as_deref(), Some("service-1"));
        assert_eq!(updated.context.service_name.as_deref(), Some("Corte"));
        assert!(updated.context.date.is_some());
    }

    #[tokio::test]
    async fn update_on_missing_key_returns_none() {
        let store = MemoryStateStore::new();
        let result = store
            .set_step(&tenant(), "nobody", ConversationStep::MainMenu)
            .await;
        assert!(result.is_none());
        assert!(store.reset(&tenant(), "nobody").await.is_none());
    }

    #[tokio::test]
    async fn reset_clears_context_and_keeps_role_links() {
        let store = MemoryStateStore::new();
        store.get_or_create(&tenant(), "551100").await;
        store
            .update(
                &tenant(),
                "551100",
                StateUpdate {
                    current_step: Some(ConversationStep::ConfirmAppointment),
                    user_role: Some(UserRole::Staff),
                    linked_barber_id: Some("barber-1".into()),
                    context: Some(ConversationContext {
                        service_id: Some("service-1".into()),
                        barber: Some(BarberChoice::Any),
                        date: NaiveDate::from_ymd_opt(2026, 3, 14),
                        time: NaiveTime::from_hms_opt(10, 0, 0),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let reset = store.reset(&tenant(), "551100").await.unwrap();
        assert_eq!(reset.current_step, ConversationStep::Idle);
        assert_eq!(reset.context, ConversationContext::default());
        assert_eq!(reset.user_role, UserRole::Staff);
        assert_eq!(reset.linked_barber_id.as_deref(), Some("barber-1"));
    }

    #[tokio::test]
    async fn per_key_lock_serializes_interleaved_updates() {
        let store = Arc::new(MemoryStateStore::new());
        let t = tenant();
        store.get_or_create(&t, "551100").await;

        let mut handles = Vec::new();
        for i in 0..8u32 {
            let store = store.clone();
            let t = t.clone();
            handles.push(tokio::spawn(async move {
                let _guard = store.lock(&t, "551100").await;
                // Read-modify-write that would corrupt under interleaving:
                // every task appends a distinct slot to the cached list.
                let state = store.get_or_create(&t, "551100").await;
                let mut times = state.context.available_times.unwrap_or_default();
                times.push(NaiveTime::from_hms_opt(9 + i, 0, 0).unwrap());
                tokio::task::yield_now().await;
                store
                    .update_context(
                        &t,
                        "551100",
                        ConversationContext {
                            available_times: Some(times),
                            ..Default::default()
                        },
                    )
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let state = store.get(&t, "551100").await.unwrap();
        assert_eq!(state.context.available_times.unwrap().len(), 8);
    }
}
