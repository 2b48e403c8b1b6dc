// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduling flow: service, barber, date, time, confirmation.
//!
//! Every handler first tries to interpret the content as the selection the
//! current step expects; anything else re-shows the step's options. Choices
//! travel as prefixed ids (`service_`, `barber_`, `date_`, `time_`) so list
//! replies and typed ids behave identically.

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use tracing::error;

use navalha_core::domain::NewAppointment;
use navalha_core::error::NavalhaError;
use navalha_core::types::{
    BarberChoice, Button, ConversationContext, ConversationState, ConversationStep, ListRow,
    ListSection,
};
use navalha_state::store::{ConversationStore, StateUpdate};

use crate::engine::FlowEngine;

const WEEKDAYS: [&str; 7] = [
    "Domingo", "Segunda", "Terca", "Quarta", "Quinta", "Sexta", "Sabado",
];

impl FlowEngine {
    pub(crate) async fn handle_scheduling(
        &self,
        to: &str,
        content: &str,
        state: &ConversationState,
        display_name: &str,
    ) -> Result<(), NavalhaError> {
        match state.current_step {
            ConversationStep::SelectService => self.handle_service_selection(to, content).await,
            ConversationStep::SelectBarber => {
                self.handle_barber_selection(to, content, state).await
            }
            ConversationStep::SelectDate => self.handle_date_selection(to, content, state).await,
            ConversationStep::SelectTime => self.handle_time_selection(to, content, state).await,
            ConversationStep::ConfirmAppointment => {
                self.handle_confirmation(to, content, state, display_name).await
            }
            _ => self.show_service_list(to).await,
        }
    }

    async fn handle_service_selection(&self, to: &str, content: &str) -> Result<(), NavalhaError> {
        if content == "start" || content.is_empty() {
            return self.show_service_list(to).await;
        }

        if let Some(service_id) = content.strip_prefix("service_") {
            let services = self.collab.catalog.active_services(&self.tenant).await?;
            if let Some(service) = services.iter().find(|s| s.id == service_id) {
                self.store
                    .update_context(
                        &self.tenant,
                        to,
                        ConversationContext {
                            service_id: Some(service.id.clone()),
                            service_name: Some(service.name.clone()),
                            ..Default::default()
                        },
                    )
                    .await;
                self.store
                    .set_step(&self.tenant, to, ConversationStep::SelectBarber)
                    .await;
                return self.show_barber_list(to, &service.name).await;
            }
        }

        self.text(to, "Servico nao encontrado. Por favor, escolha da lista:")
            .await;
        self.show_service_list(to).await
    }

    pub(crate) async fn show_service_list(&self, to: &str) -> Result<(), NavalhaError> {
        let services = self.collab.catalog.active_services(&self.tenant).await?;

        if services.is_empty() {
            self.text(to, "Desculpe, nao ha servicos disponiveis no momento.")
                .await;
            self.store
                .set_step(&self.tenant, to, ConversationStep::Idle)
                .await;
            return Ok(());
        }

        let rows = services
            .iter()
            .map(|service| ListRow {
                id: format!("service_{}", service.id),
                title: service.name.clone(),
                description: Some(format!(
                    "R$ {:.2} - {}min",
                    service.price, service.duration_minutes
                )),
            })
            .collect();
        let sections = [ListSection {
            title: "Servicos Disponiveis".to_string(),
            rows,
        }];

        self.list(
            to,
            "Qual servico voce deseja agendar?",
            "Ver Servicos",
            &sections,
            Some("Escolha um Servico"),
        )
        .await;
        Ok(())
    }

    async fn handle_barber_selection(
        &self,
        to: &str,
        content: &str,
        state: &ConversationState,
    ) -> Result<(), NavalhaError> {
        if content == "barber_any" {
            self.store
                .update_context(
                    &self.tenant,
                    to,
                    ConversationContext {
                        barber: Some(BarberChoice::Any),
                        barber_name: Some("Qualquer Barbeiro".to_string()),
                        ..Default::default()
                    },
                )
                .await;
            self.store
                .set_step(&self.tenant, to, ConversationStep::SelectDate)
                .await;
            self.show_date_options(to).await;
            return Ok(());
        }

        if let Some(barber_id) = content.strip_prefix("barber_") {
            let barbers = self.collab.barbers.active_barbers(&self.tenant).await?;
            if let Some(barber) = barbers.iter().find(|b| b.id == barber_id) {
                self.store
                    .update_context(
                        &self.tenant,
                        to,
                        ConversationContext {
                            barber: Some(BarberChoice::Barber(barber.id.clone())),
                            barber_name: Some(barber.full_name()),
                            ..Default::default()
                        },
                    )
                    .await;
                self.store
                    .set_step(&self.tenant, to, ConversationStep::SelectDate)
                    .await;
                self.show_date_options(to).await;
                return Ok(());
            }
        }

        let service_name = state.context.service_name.as_deref().unwrap_or("");
        self.show_barber_list(to, service_name).await
    }

    async fn show_barber_list(&self, to: &str, service_name: &str) -> Result<(), NavalhaError> {
        let barbers = self.collab.barbers.active_barbers(&self.tenant).await?;

        if barbers.is_empty() {
            self.text(to, "Desculpe, nao ha barbeiros disponiveis no momento.")
                .await;
            self.store
                .set_step(&self.tenant, to, ConversationStep::Idle)
                .await;
            return Ok(());
        }

        // "Any barber" leads the list, so at most 9 named barbers fit.
        let mut rows = vec![ListRow {
            id: "barber_any".to_string(),
            title: "Qualquer Barbeiro".to_string(),
            description: Some("Primeiro disponivel".to_string()),
        }];
        rows.extend(barbers.iter().take(9).map(|barber| ListRow {
            id: format!("barber_{}", barber.id),
            title: barber.full_name(),
            description: Some(
                barber
                    .bio
                    .clone()
                    .unwrap_or_else(|| "Barbeiro profissional".to_string()),
            ),
        }));
        let sections = [ListSection {
            title: "Barbeiros".to_string(),
            rows,
        }];

        self.list(
            to,
            &format!("Otimo! Voce escolheu: {service_name}\n\nAgora escolha um barbeiro:"),
            "Ver Barbeiros",
            &sections,
            Some("Escolha um Barbeiro"),
        )
        .await;
        Ok(())
    }

    async fn show_date_options(&self, to: &str) {
        let today = self.today();
        let rows: Vec<ListRow> = (0..u64::from(self.settings.days_ahead))
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .enumerate()
            .map(|(i, date)| {
                let display = format!("{}/{}", date.day(), date.month());
                let weekday = WEEKDAYS[date.weekday().num_days_from_sunday() as usize];
                ListRow {
                    id: format!("date_{}", date.format("%Y-%m-%d")),
                    title: if i == 0 {
                        format!("Hoje ({display})")
                    } else {
                        format!("{weekday} ({display})")
                    },
                    description: Some("Verificar horarios disponiveis".to_string()),
                }
            })
            .collect();
        let sections = [ListSection {
            title: "Proximos Dias".to_string(),
            rows,
        }];

        self.list(
            to,
            "Qual data voce prefere?",
            "Ver Datas",
            &sections,
            Some("Escolha uma Data"),
        )
        .await;
    }

    async fn handle_date_selection(
        &self,
        to: &str,
        content: &str,
        state: &ConversationState,
    ) -> Result<(), NavalhaError> {
        let parsed = content
            .strip_prefix("date_")
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());

        let Some(date) = parsed else {
            self.show_date_options(to).await;
            return Ok(());
        };

        self.store
            .update_context(
                &self.tenant,
                to,
                ConversationContext {
                    date: Some(date),
                    ..Default::default()
                },
            )
            .await;
        self.store
            .set_step(&self.tenant, to, ConversationStep::SelectTime)
            .await;
        self.show_time_slots(to, state, date).await
    }

    async fn show_time_slots(
        &self,
        to: &str,
        state: &ConversationState,
        date: NaiveDate,
    ) -> Result<(), NavalhaError> {
        let barber_id = state
            .context
            .barber
            .as_ref()
            .and_then(BarberChoice::barber_id);
        let slots = self
            .collab
            .availability
            .available_slots(
                &self.tenant,
                date,
                barber_id,
                state.context.service_id.as_deref(),
            )
            .await?;

        if slots.is_empty() {
            self.text(
                to,
                "Desculpe, nao ha horarios disponiveis nesta data. Por favor, escolha outra data.",
            )
            .await;
            self.store
                .set_step(&self.tenant, to, ConversationStep::SelectDate)
                .await;
            self.show_date_options(to).await;
            return Ok(());
        }

        self.store
            .update_context(
                &self.tenant,
                to,
                ConversationContext {
                    available_times: Some(slots.clone()),
                    ..Default::default()
                },
            )
            .await;

        let display_date = date.format("%d/%m/%Y").to_string();
        let rows = slots
            .iter()
            .map(|slot| ListRow {
                id: format!("time_{}", slot.format("%H:%M")),
                title: slot.format("%H:%M").to_string(),
                description: Some(format!("Horario disponivel em {display_date}")),
            })
            .collect();
        let sections = [ListSection {
            title: "Horarios Disponiveis".to_string(),
            rows,
        }];

        self.list(
            to,
            &format!("Horarios disponiveis para {display_date}:"),
            "Ver Horarios",
            &sections,
            Some("Escolha um Horario"),
        )
        .await;
        Ok(())
    }

    async fn handle_time_selection(
        &self,
        to: &str,
        content: &str,
        state: &ConversationState,
    ) -> Result<(), NavalhaError> {
        let parsed = content
            .strip_prefix("time_")
            .and_then(|raw| NaiveTime::parse_from_str(raw, "%H:%M").ok());

        if let Some(time) = parsed {
            self.store
                .update_context(
                    &self.tenant,
                    to,
                    ConversationContext {
                        time: Some(time),
                        ..Default::default()
                    },
                )
                .await;
            self.store
                .set_step(&self.tenant, to, ConversationStep::ConfirmAppointment)
                .await;
            let mut context = state.context.clone();
            context.time = Some(time);
            self.show_confirmation(to, &context).await;
            return Ok(());
        }

        if let Some(date) = state.context.date {
            return self.show_time_slots(to, state, date).await;
        }
        Ok(())
    }

    async fn show_confirmation(&self, to: &str, context: &ConversationContext) {
        let service = context.service_name.as_deref().unwrap_or("-");
        let barber = context.barber_name.as_deref().unwrap_or("-");
        let date = context
            .date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string());
        let time = context
            .time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        let summary = format!(
            "*Confirme seu Agendamento:*\n\n\
             Servico: {service}\n\
             Barbeiro: {barber}\n\
             Data: {date}\n\
             Horario: {time}\n\n\
             Deseja confirmar este agendamento?"
        );

        self.buttons(
            to,
            &summary,
            &[
                Button::new("confirm_yes", "Confirmar"),
                Button::new("confirm_no", "Cancelar"),
            ],
            Some("Confirmacao"),
        )
        .await;
    }

    async fn handle_confirmation(
        &self,
        to: &str,
        content: &str,
        state: &ConversationState,
        display_name: &str,
    ) -> Result<(), NavalhaError> {
        match content {
            "confirm_yes" => {
                match self.create_booking(to, state, display_name).await {
                    Ok(()) => {
                        let date = state
                            .context
                            .date
                            .map(|d| d.format("%d/%m/%Y").to_string())
                            .unwrap_or_default();
                        let time = state
                            .context
                            .time
                            .map(|t| t.format("%H:%M").to_string())
                            .unwrap_or_default();
                        self.text(
                            to,
                            &format!(
                                "*Agendamento Confirmado!*\n\n\
                                 Servico: {}\n\
                                 Barbeiro: {}\n\
                                 Data: {date}\n\
                                 Horario: {time}\n\n\
                                 Aguardamos voce! Caso precise cancelar ou remarcar, \
                                 entre em contato conosco.",
                                state.context.service_name.as_deref().unwrap_or("-"),
                                state.context.barber_name.as_deref().unwrap_or("-"),
                            ),
                        )
                        .await;
                    }
                    Err(err) => {
                        error!(tenant = %self.tenant, to, error = %err, "appointment creation failed");
                        self.text(
                            to,
                            "Desculpe, ocorreu um erro ao criar o agendamento. \
                             Por favor, tente novamente.",
                        )
                        .await;
                    }
                }
                self.store.reset(&self.tenant, to).await;
                Ok(())
            }
            "confirm_no" => {
                self.text(
                    to,
                    "Agendamento cancelado. Se precisar de algo mais, e so me chamar!",
                )
                .await;
                self.store.reset(&self.tenant, to).await;
                Ok(())
            }
            _ => {
                if state.context.time.is_some() {
                    self.show_confirmation(to, &state.context).await;
                }
                Ok(())
            }
        }
    }

    async fn create_booking(
        &self,
        to: &str,
        state: &ConversationState,
        display_name: &str,
    ) -> Result<(), NavalhaError> {
        let (Some(service_id), Some(barber), Some(date), Some(time)) = (
            state.context.service_id.as_deref(),
            state.context.barber.as_ref(),
            state.context.date,
            state.context.time,
        ) else {
            return Err(NavalhaError::State {
                message: "confirmation reached with incomplete context".to_string(),
            });
        };

        let client = match self.collab.clients.find_by_phone(&self.tenant, to).await? {
            Some(client) => client,
            None => {
                self.collab
                    .clients
                    .create(&self.tenant, to, display_name)
                    .await?
            }
        };
        self.store
            .update(
                &self.tenant,
                to,
                StateUpdate {
                    linked_client_id: Some(client.id.clone()),
                    ..Default::default()
                },
            )
            .await;

        self.collab
            .appointments
            .create(NewAppointment {
                tenant_id: self.tenant.clone(),
                barber_id: barber.barber_id().map(str::to_string),
                client_id: client.id,
                service_id: service_id.to_string(),
                date,
                time,
                notes: None,
            })
            .await?;
        Ok(())
    }
}
