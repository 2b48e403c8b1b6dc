// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation and channel types shared across the Navalha workspace.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a tenant (one barbershop).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        TenantId(s.to_string())
    }
}

/// A single node in the conversation state machine.
///
/// `current_step` on [`ConversationState`] is always one of these; the flow
/// router dispatches on it and guards anomalous combinations (for example a
/// confirmation step with an incomplete scratchpad).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConversationStep {
    Idle,
    MainMenu,
    SelectService,
    SelectBarber,
    SelectDate,
    SelectTime,
    ConfirmAppointment,
    ReportsMenu,
    AwaitingReportQuery,
}

/// Role of the person behind a sender address, resolved lazily and cached
/// on the conversation state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize, Default,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Unknown,
    Client,
    Staff,
    Manager,
    Owner,
}

impl UserRole {
    /// Whether this role may open the reports flow at all.
    pub fn can_view_reports(self) -> bool {
        matches!(self, UserRole::Staff | UserRole::Manager | UserRole::Owner)
    }

    /// Whether this role may query other barbers' numbers.
    pub fn is_admin(self) -> bool {
        matches!(self, UserRole::Manager | UserRole::Owner)
    }
}

/// The barber selection recorded during scheduling: a specific barber, or an
/// explicit "any barber" marker. The marker is deliberately not `None` so the
/// confirmation guard can tell "any" apart from "not chosen yet".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum BarberChoice {
    Any,
    Barber(String),
}

impl BarberChoice {
    /// The concrete barber id, if one was chosen.
    pub fn barber_id(&self) -> Option<&str> {
        match self {
            BarberChoice::Any => None,
            BarberChoice::Barber(id) => Some(id),
        }
    }
}

/// Flow-scoped scratchpad attached to a conversation.
///
/// Fields are additive across a flow: merging a patch never clears sibling
/// fields, and only a full reset empties the scratchpad.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub service_id: Option<String>,
    pub service_name: Option<String>,
    pub barber: Option<BarberChoice>,
    pub barber_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub available_times: Option<Vec<NaiveTime>>,
}

impl ConversationContext {
    /// Shallow merge: every `Some` field in `patch` replaces the current
    /// value, every `None` field leaves it untouched.
    pub fn merge(&mut self, patch: ConversationContext) {
        if let Some(v) = patch.service_id {
            self.service_id = Some(v);
        }
        if let Some(v) = patch.service_name {
            self.service_name = Some(v);
        }
        if let Some(v) = patch.barber {
            self.barber = Some(v);
        }
        if let Some(v) = patch.barber_name {
            self.barber_name = Some(v);
        }
        if let Some(v) = patch.date {
            self.date = Some(v);
        }
        if let Some(v) = patch.time {
            self.time = Some(v);
        }
        if let Some(v) = patch.available_times {
            self.available_times = Some(v);
        }
    }

    /// Whether the scratchpad holds everything the confirmation step needs:
    /// a service, a barber choice (specific or explicit "any"), a date, and
    /// a time.
    pub fn is_booking_complete(&self) -> bool {
        self.service_id.is_some()
            && self.barber.is_some()
            && self.date.is_some()
            && self.time.is_some()
    }
}

/// Durable per-(tenant, sender) conversation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    /// Opaque identifier assigned at creation.
    pub id: String,
    pub tenant_id: TenantId,
    /// Phone number (or equivalent channel identity) of the counterpart.
    pub sender_address: String,
    pub current_step: ConversationStep,
    pub context: ConversationContext,
    pub user_role: UserRole,
    /// Weak reference to the barber record behind this sender, if resolved.
    pub linked_barber_id: Option<String>,
    /// Weak reference to the client record behind this sender, if resolved.
    pub linked_client_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Kind of inbound message after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundKind {
    Text,
    ButtonReply,
    ListReply,
    /// Legacy template button payload.
    Button,
    Unsupported,
}

/// A normalized inbound message, independent of the platform payload shape.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Platform message id.
    pub id: String,
    /// Sender address (phone number).
    pub from: String,
    pub kind: InboundKind,
    /// Free-text body, for text messages.
    pub text: Option<String>,
    /// Selected button or list row id, for interactive replies.
    pub reply_id: Option<String>,
}

impl InboundMessage {
    /// The single content string the flows match on: the interactive reply
    /// id when present, otherwise the text body.
    pub fn content(&self) -> &str {
        self.reply_id
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or("")
    }
}

/// A reply button in an outbound interactive message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub id: String,
    pub title: String,
}

impl Button {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A row inside an outbound list section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
}

/// A titled section of list rows in an outbound list message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSection {
    pub title: String,
    pub rows: Vec<ListRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_round_trips_through_strings() {
        use std::str::FromStr;

        let steps = [
            ConversationStep::Idle,
            ConversationStep::MainMenu,
            ConversationStep::SelectService,
            ConversationStep::SelectBarber,
            ConversationStep::SelectDate,
            ConversationStep::SelectTime,
            ConversationStep::ConfirmAppointment,
            ConversationStep::ReportsMenu,
            ConversationStep::AwaitingReportQuery,
        ];

        for step in steps {
            let s = step.to_string();
            assert_eq!(ConversationStep::from_str(&s).unwrap(), step);
        }
        assert_eq!(ConversationStep::SelectService.to_string(), "select_service");
    }

    #[test]
    fn context_merge_is_additive() {
        let mut ctx = ConversationContext {
            service_id: Some("service-1".into()),
            service_name: Some("Corte".into()),
            ..Default::default()
        };

        ctx.merge(ConversationContext {
            date: Some(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()),
            ..Default::default()
        });

        assert_eq!(ctx.service_id.as_deref(), Some("service-1"));
        assert_eq!(ctx.service_name.as_deref(), Some("Corte"));
        assert!(ctx.date.is_some());
    }

    #[test]
    fn booking_completeness_requires_explicit_barber_choice() {
        let mut ctx = ConversationContext {
            service_id: Some("service-1".into()),
            date: Some(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()),
            time: Some(NaiveTime::from_hms_opt(9, 30, 0).unwrap()),
            ..Default::default()
        };
        assert!(!ctx.is_booking_complete());

        ctx.barber = Some(BarberChoice::Any);
        assert!(ctx.is_booking_complete());
    }

    #[test]
    fn report_permissions_by_role() {
        assert!(!UserRole::Unknown.can_view_reports());
        assert!(!UserRole::Client.can_view_reports());
        assert!(UserRole::Staff.can_view_reports());
        assert!(UserRole::Manager.can_view_reports());
        assert!(UserRole::Owner.can_view_reports());

        assert!(!UserRole::Staff.is_admin());
        assert!(UserRole::Owner.is_admin());
    }

    #[test]
    fn inbound_content_prefers_reply_id() {
        let msg = InboundMessage {
            id: "wamid.1".into(),
            from: "5511999990000".into(),
            kind: InboundKind::ButtonReply,
            text: Some("Agendar horario".into()),
            reply_id: Some("schedule".into()),
        };
        assert_eq!(msg.content(), "schedule");
    }
}
