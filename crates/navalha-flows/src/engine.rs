// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Top-level flow router.
//!
//! One [`FlowEngine`] per deployed bot. `handle_message` takes the per-key
//! state lock, resolves the sender's role on first contact, and dispatches
//! on the conversation's current step. Collaborator errors surface here as
//! an apology message plus a state reset; outbound send failures are logged
//! and dropped so a flaky channel never wedges a conversation.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, error, warn};

use navalha_core::error::NavalhaError;
use navalha_core::traits::{
    AppointmentRepository, Availability, BarberDirectory, ClientRegistry, MessageSender,
    Reporting, ServiceCatalog,
};
use navalha_core::types::{
    Button, ConversationState, ConversationStep, InboundMessage, ListSection, TenantId, UserRole,
};
use navalha_state::store::{ConversationStore, StateUpdate};

/// The backend collaborators the flows call into.
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn ServiceCatalog>,
    pub barbers: Arc<dyn BarberDirectory>,
    pub availability: Arc<dyn Availability>,
    pub appointments: Arc<dyn AppointmentRepository>,
    pub clients: Arc<dyn ClientRegistry>,
    pub reporting: Arc<dyn Reporting>,
}

/// Deployment-level knobs for the conversation flows.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Shop display name, used as the greeting header.
    pub shop_name: String,
    /// How many days of dates the scheduling flow offers.
    pub days_ahead: u32,
    /// Sender addresses granted the manager role.
    pub manager_numbers: Vec<String>,
    /// Sender addresses granted the owner role.
    pub owner_numbers: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            shop_name: "Barbearia Pro".to_string(),
            days_ahead: 7,
            manager_numbers: Vec::new(),
            owner_numbers: Vec::new(),
        }
    }
}

/// Conversation engine for one tenant.
pub struct FlowEngine {
    pub(crate) tenant: TenantId,
    pub(crate) store: Arc<dyn ConversationStore>,
    pub(crate) sender: Arc<dyn MessageSender>,
    pub(crate) collab: Collaborators,
    pub(crate) settings: EngineSettings,
    /// Fixed clock for deterministic tests.
    fixed_today: Option<NaiveDate>,
}

impl FlowEngine {
    pub fn new(
        tenant: TenantId,
        store: Arc<dyn ConversationStore>,
        sender: Arc<dyn MessageSender>,
        collab: Collaborators,
        settings: EngineSettings,
    ) -> Self {
        Self {
            tenant,
            store,
            sender,
            collab,
            settings,
            fixed_today: None,
        }
    }

    /// Pins "today" for tests.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Handles one inbound message end to end.
    ///
    /// All state reads and writes for the message happen under the store's
    /// per-(tenant, sender) lock, so two messages from the same sender are
    /// never interleaved.
    pub async fn handle_message(&self, message: &InboundMessage, sender_name: Option<&str>) {
        let from = message.from.as_str();
        let _guard = self.store.lock(&self.tenant, from).await;

        let mut state = self.store.get_or_create(&self.tenant, from).await;

        if state.user_role == UserRole::Unknown {
            let resolution = self.resolve_role(from).await;
            state.user_role = resolution.role;
            if resolution.linked_barber_id.is_some() {
                state.linked_barber_id = resolution.linked_barber_id.clone();
            }
            if resolution.cache {
                self.store
                    .update(
                        &self.tenant,
                        from,
                        StateUpdate {
                            user_role: Some(resolution.role),
                            linked_barber_id: resolution.linked_barber_id,
                            ..Default::default()
                        },
                    )
                    .await;
            }
        }

        let content = message.content().to_string();
        let display_name = sender_name.unwrap_or("Cliente");
        debug!(
            tenant = %self.tenant,
            from,
            step = %state.current_step,
            role = %state.user_role,
            content,
            "handling inbound message"
        );

        let result = match state.current_step {
            ConversationStep::Idle => self.send_greeting(from, display_name).await,
            ConversationStep::MainMenu => {
                self.handle_main_menu(from, &content, &state, display_name)
                    .await
            }
            ConversationStep::ConfirmAppointment if !state.context.is_booking_complete() => {
                // A confirmation step with an incomplete scratchpad means the
                // state drifted; start the conversation over rather than
                // confirming garbage.
                warn!(tenant = %self.tenant, from, "incomplete context at confirmation, resetting");
                self.store.reset(&self.tenant, from).await;
                self.send_greeting(from, display_name).await
            }
            ConversationStep::SelectService
            | ConversationStep::SelectBarber
            | ConversationStep::SelectDate
            | ConversationStep::SelectTime
            | ConversationStep::ConfirmAppointment => {
                self.handle_scheduling(from, &content, &state, display_name)
                    .await
            }
            ConversationStep::ReportsMenu | ConversationStep::AwaitingReportQuery => {
                self.handle_reports(from, &content, &state).await
            }
        };

        if let Err(err) = result {
            error!(
                tenant = %self.tenant,
                from,
                step = %state.current_step,
                error = %err,
                "flow handler failed"
            );
            self.text(
                from,
                "Desculpe, ocorreu um erro. Por favor, tente novamente.",
            )
            .await;
            self.store.reset(&self.tenant, from).await;
        }
    }

    async fn resolve_role(&self, sender: &str) -> RoleResolution {
        if self.settings.owner_numbers.iter().any(|n| n == sender) {
            return RoleResolution::cached(UserRole::Owner, None);
        }
        if self.settings.manager_numbers.iter().any(|n| n == sender) {
            return RoleResolution::cached(UserRole::Manager, None);
        }

        match self.collab.barbers.find_by_phone(&self.tenant, sender).await {
            Ok(Some(barber)) => RoleResolution::cached(UserRole::Staff, Some(barber.id)),
            Ok(None) => RoleResolution::cached(UserRole::Client, None),
            Err(err) => {
                // Treat the sender as a client for this message only; the
                // next message retries resolution.
                warn!(tenant = %self.tenant, sender, error = %err, "role resolution failed");
                RoleResolution {
                    role: UserRole::Client,
                    linked_barber_id: None,
                    cache: false,
                }
            }
        }
    }

    /// Greets the sender and moves the conversation to the main menu.
    pub(crate) async fn send_greeting(
        &self,
        to: &str,
        display_name: &str,
    ) -> Result<(), NavalhaError> {
        self.store
            .set_step(&self.tenant, to, ConversationStep::MainMenu)
            .await;
        self.buttons(
            to,
            &format!(
                "Ola {display_name}! Bem-vindo a nossa barbearia.\n\nComo posso ajudar voce hoje?"
            ),
            &[
                Button::new("schedule", "Agendar horario"),
                Button::new("my_appointments", "Meus agendamentos"),
                Button::new("reports", "Relatorios"),
            ],
            Some(&self.settings.shop_name),
        )
        .await;
        Ok(())
    }

    async fn handle_main_menu(
        &self,
        to: &str,
        content: &str,
        state: &ConversationState,
        display_name: &str,
    ) -> Result<(), NavalhaError> {
        let normalized = content.to_lowercase();
        let normalized = normalized.trim();

        if normalized == "schedule" || normalized.contains("agendar") {
            self.store
                .set_step(&self.tenant, to, ConversationStep::SelectService)
                .await;
            return self.show_service_list(to).await;
        }

        if normalized == "my_appointments" || normalized.contains("meus agendamentos") {
            self.text(
                to,
                "Funcionalidade de consulta de agendamentos em desenvolvimento.",
            )
            .await;
            self.store
                .set_step(&self.tenant, to, ConversationStep::Idle)
                .await;
            return Ok(());
        }

        if normalized == "reports" || normalized.contains("relatorio") {
            if state.user_role.can_view_reports() {
                self.store
                    .set_step(&self.tenant, to, ConversationStep::ReportsMenu)
                    .await;
                return self.show_reports_menu(to).await;
            }
            // Denied senders stay at the menu so the next tap still works.
            self.text(
                to,
                "Desculpe, voce nao tem permissao para acessar os relatorios.",
            )
            .await;
            return Ok(());
        }

        self.text(
            to,
            "Desculpe, nao entendi. Por favor, escolha uma das opcoes abaixo:",
        )
        .await;
        self.send_greeting(to, display_name).await
    }

    // Infallible send helpers. Delivery failures are logged and dropped so
    // conversation state never depends on the channel being up.

    pub(crate) async fn text(&self, to: &str, body: &str) {
        if let Err(err) = self.sender.send_text(to, body).await {
            warn!(tenant = %self.tenant, to, error = %err, "outbound text failed");
        }
    }

    pub(crate) async fn buttons(
        &self,
        to: &str,
        body: &str,
        buttons: &[Button],
        header: Option<&str>,
    ) {
        if let Err(err) = self.sender.send_buttons(to, body, buttons, header, None).await {
            warn!(tenant = %self.tenant, to, error = %err, "outbound buttons failed");
        }
    }

    pub(crate) async fn list(
        &self,
        to: &str,
        body: &str,
        button_label: &str,
        sections: &[ListSection],
        header: Option<&str>,
    ) {
        if let Err(err) = self
            .sender
            .send_list(to, body, button_label, sections, header)
            .await
        {
            warn!(tenant = %self.tenant, to, error = %err, "outbound list failed");
        }
    }
}

struct RoleResolution {
    role: UserRole,
    linked_barber_id: Option<String>,
    /// Whether the resolution is trustworthy enough to persist.
    cache: bool,
}

impl RoleResolution {
    fn cached(role: UserRole, linked_barber_id: Option<String>) -> Self {
        Self {
            role,
            linked_barber_id,
            cache: true,
        }
    }
}
