// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reports flow: menu shortcuts plus free-text queries.
//!
//! Menu selections and query answers both land the conversation back at the
//! reports menu, so a barber can chain questions without re-entering the
//! flow. Report access was already checked at the main menu; this module
//! only distinguishes staff (own numbers) from admins (anyone's numbers).

use std::fmt::Write as _;

use navalha_core::error::NavalhaError;
use navalha_core::types::{Button, ConversationState, ConversationStep};
use navalha_state::store::{ConversationStore, StateUpdate};

use crate::engine::FlowEngine;
use crate::query::{self, ReportQuery};

const QUERY_PROMPT: &str = "Voce pode me perguntar coisas como:\n\n\
- \"Quanto faturei hoje\"\n\
- \"Minha comissao da semana\"\n\
- \"Quanto o Joao faturou\"\n\
- \"O que vendeu ontem\"\n\
- \"Faturamento do mes\"\n\n\
Digite sua pergunta:";

const QUERY_HELP: &str = "Desculpe, nao entendi sua pergunta.\n\n\
Voce pode perguntar coisas como:\n\
- \"Quanto faturei hoje\"\n\
- \"Minha comissao da semana\"\n\
- \"O que vendeu ontem\"";

const NO_BARBER_RECORD: &str = "Nao foi possivel identificar seu cadastro de barbeiro.";

impl FlowEngine {
    pub(crate) async fn handle_reports(
        &self,
        to: &str,
        content: &str,
        state: &ConversationState,
    ) -> Result<(), NavalhaError> {
        match state.current_step {
            ConversationStep::AwaitingReportQuery => {
                self.handle_report_query(to, content, state).await
            }
            _ => self.handle_reports_menu(to, content, state).await,
        }
    }

    async fn handle_reports_menu(
        &self,
        to: &str,
        content: &str,
        state: &ConversationState,
    ) -> Result<(), NavalhaError> {
        match content {
            "start" | "" => self.show_reports_menu(to).await,
            "report_today" => self.send_today_report(to, state).await,
            "report_my_commission" => self.send_my_commission(to, state).await,
            "report_query" => {
                self.store
                    .set_step(&self.tenant, to, ConversationStep::AwaitingReportQuery)
                    .await;
                self.text(to, QUERY_PROMPT).await;
                Ok(())
            }
            "report_back" => {
                self.store
                    .set_step(&self.tenant, to, ConversationStep::Idle)
                    .await;
                self.text(to, "Ok! Se precisar de mais alguma coisa, e so chamar.")
                    .await;
                Ok(())
            }
            // Anything else is tried as a natural-language query.
            _ => self.handle_report_query(to, content, state).await,
        }
    }

    pub(crate) async fn show_reports_menu(&self, to: &str) -> Result<(), NavalhaError> {
        self.buttons(
            to,
            "*Menu de Relatorios*\n\nEscolha uma opcao:",
            &[
                Button::new("report_today", "Faturamento Hoje"),
                Button::new("report_my_commission", "Minha Comissao"),
                Button::new("report_query", "Fazer Pergunta"),
            ],
            Some("Relatorios"),
        )
        .await;
        Ok(())
    }

    async fn send_today_report(
        &self,
        to: &str,
        state: &ConversationState,
    ) -> Result<(), NavalhaError> {
        let today = self.today();
        // Staff see their own numbers; admins see the whole shop.
        let barber_id = if state.user_role.is_admin() {
            None
        } else {
            state.linked_barber_id.as_deref()
        };

        let report = self
            .collab
            .reporting
            .daily_report(&self.tenant, today, barber_id)
            .await?;

        let mut message = format!("*Relatorio de {}*\n\n", today.format("%d/%m/%Y"));
        if barber_id.is_some() {
            message.push_str("Seus resultados de hoje:\n\n");
        }
        let _ = writeln!(
            message,
            "Total Faturado: R$ {:.2}\nAtendimentos: {}",
            report.total_revenue, report.completed_appointments
        );
        if report.cancelled_appointments > 0 {
            let _ = writeln!(message, "Cancelamentos: {}", report.cancelled_appointments);
        }
        if !report.services_breakdown.is_empty() {
            message.push_str("\n*Servicos:*\n");
            for service in &report.services_breakdown {
                let _ = writeln!(
                    message,
                    "- {}: {}x (R$ {:.2})",
                    service.service_name, service.count, service.revenue
                );
            }
        }

        self.text(to, &message).await;
        self.store
            .set_step(&self.tenant, to, ConversationStep::ReportsMenu)
            .await;
        self.show_reports_menu(to).await
    }

    async fn send_my_commission(
        &self,
        to: &str,
        state: &ConversationState,
    ) -> Result<(), NavalhaError> {
        let Some(barber_id) = self.require_barber(to, state).await? else {
            self.text(to, NO_BARBER_RECORD).await;
            self.store
                .set_step(&self.tenant, to, ConversationStep::ReportsMenu)
                .await;
            return self.show_reports_menu(to).await;
        };

        let commission = self
            .collab
            .reporting
            .weekly_commission(&self.tenant, &barber_id)
            .await?;

        let message = format!(
            "*Sua Comissao da Semana*\n\n\
             Faturamento Total: R$ {:.2}\n\
             Sua Comissao: R$ {:.2}\n\
             Atendimentos: {}",
            commission.total_revenue, commission.commission, commission.appointments
        );

        self.text(to, &message).await;
        self.store
            .set_step(&self.tenant, to, ConversationStep::ReportsMenu)
            .await;
        self.show_reports_menu(to).await
    }

    async fn handle_report_query(
        &self,
        to: &str,
        content: &str,
        state: &ConversationState,
    ) -> Result<(), NavalhaError> {
        // The roster only feeds the admin-only named-barber rule.
        let roster = if state.user_role.is_admin() {
            self.collab.barbers.active_barbers(&self.tenant).await?
        } else {
            Vec::new()
        };

        let parsed = query::parse_query(content, state.user_role, &roster, self.today());

        match parsed {
            Some(ReportQuery::SelfRevenue(range)) => {
                let Some(barber_id) = self.require_barber(to, state).await? else {
                    self.text(to, NO_BARBER_RECORD).await;
                    return Ok(());
                };
                let report = self
                    .collab
                    .reporting
                    .barber_revenue(&self.tenant, &barber_id, range.start, range.end)
                    .await?;
                let message = format!(
                    "*Seu faturamento de {}:*\n\n\
                     Total: R$ {:.2}\n\
                     Comissao: R$ {:.2}\n\
                     Atendimentos: {}",
                    range.label, report.total_revenue, report.commission, report.total_appointments
                );
                self.text(to, &message).await;
                self.store
                    .set_step(&self.tenant, to, ConversationStep::ReportsMenu)
                    .await;
                Ok(())
            }
            Some(ReportQuery::SelfCommission) => self.send_my_commission(to, state).await,
            Some(ReportQuery::BarberRevenue(barber, range)) => {
                let report = self
                    .collab
                    .reporting
                    .barber_revenue(&self.tenant, &barber.id, range.start, range.end)
                    .await?;
                let message = format!(
                    "*Faturamento de {} ({}):*\n\n\
                     Total: R$ {:.2}\n\
                     Comissao: R$ {:.2}\n\
                     Atendimentos: {}",
                    barber.full_name(),
                    range.label,
                    report.total_revenue,
                    report.commission,
                    report.total_appointments
                );
                self.text(to, &message).await;
                self.store
                    .set_step(&self.tenant, to, ConversationStep::ReportsMenu)
                    .await;
                Ok(())
            }
            Some(ReportQuery::ShopSales(range)) => {
                let report = self
                    .collab
                    .reporting
                    .daily_report(&self.tenant, range.start, None)
                    .await?;
                let mut message = format!("*Vendas de {}:*\n\n", range.label);
                let _ = writeln!(
                    message,
                    "Total Faturado: R$ {:.2}\nAtendimentos: {}",
                    report.total_revenue, report.completed_appointments
                );
                if !report.services_breakdown.is_empty() {
                    message.push_str("\n*Servicos mais vendidos:*\n");
                    for service in report.services_breakdown.iter().take(5) {
                        let _ =
                            writeln!(message, "- {}: {}x", service.service_name, service.count);
                    }
                }
                self.text(to, &message).await;
                self.store
                    .set_step(&self.tenant, to, ConversationStep::ReportsMenu)
                    .await;
                Ok(())
            }
            None => {
                self.text(to, QUERY_HELP).await;
                self.store
                    .set_step(&self.tenant, to, ConversationStep::ReportsMenu)
                    .await;
                Ok(())
            }
        }
    }

    /// The barber record behind the sender, resolving and caching it on
    /// first use.
    async fn require_barber(
        &self,
        to: &str,
        state: &ConversationState,
    ) -> Result<Option<String>, NavalhaError> {
        if let Some(id) = &state.linked_barber_id {
            return Ok(Some(id.clone()));
        }

        let Some(barber) = self.collab.barbers.find_by_phone(&self.tenant, to).await? else {
            return Ok(None);
        };
        self.store
            .update(
                &self.tenant,
                to,
                StateUpdate {
                    linked_barber_id: Some(barber.id.clone()),
                    ..Default::default()
                },
            )
            .await;
        Ok(Some(barber.id))
    }
}
