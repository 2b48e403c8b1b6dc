// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-tenant in-memory barbershop backend.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use tokio::sync::RwLock;

use navalha_core::domain::{
    Appointment, AppointmentStatus, Barber, BarberReport, Client, CommissionSummary, DailyReport,
    NewAppointment, Service, ServiceSales,
};
use navalha_core::error::NavalhaError;
use navalha_core::traits::{
    AppointmentRepository, BarberDirectory, ClientRegistry, Reporting, ServiceCatalog,
};
use navalha_core::types::TenantId;

/// In-memory backend for one tenant.
///
/// Lookups for any other tenant come back empty, mirroring a tenant-scoped
/// backend API.
pub struct InMemoryBarbershop {
    tenant_id: TenantId,
    services: RwLock<Vec<Service>>,
    barbers: RwLock<Vec<Barber>>,
    clients: RwLock<Vec<Client>>,
    appointments: RwLock<Vec<Appointment>>,
    /// Fixed "today" for deterministic report windows in tests.
    fixed_today: Option<NaiveDate>,
}

impl InMemoryBarbershop {
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            services: RwLock::new(Vec::new()),
            barbers: RwLock::new(Vec::new()),
            clients: RwLock::new(Vec::new()),
            appointments: RwLock::new(Vec::new()),
            fixed_today: None,
        }
    }

    /// Pins the date used for rolling report windows.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    /// Seeds the demo catalog and roster.
    pub fn seeded(tenant_id: TenantId) -> Self {
        let shop = Self::new(tenant_id);
        {
            let mut services = shop.services.try_write().expect("fresh lock");
            services.extend([
                Service {
                    id: "service-1".into(),
                    name: "Corte Masculino".into(),
                    price: 45.0,
                    duration_minutes: 30,
                },
                Service {
                    id: "service-2".into(),
                    name: "Barba".into(),
                    price: 30.0,
                    duration_minutes: 20,
                },
                Service {
                    id: "service-3".into(),
                    name: "Corte + Barba".into(),
                    price: 65.0,
                    duration_minutes: 45,
                },
            ]);

            let mut barbers = shop.barbers.try_write().expect("fresh lock");
            barbers.extend([
                Barber {
                    id: "barber-1".into(),
                    first_name: "Carlos".into(),
                    last_name: "Silva".into(),
                    phone: Some("11999999999".into()),
                    bio: Some("Especialista em cortes modernos".into()),
                    commission_rate: 50.0,
                },
                Barber {
                    id: "barber-2".into(),
                    first_name: "Joao".into(),
                    last_name: "Santos".into(),
                    phone: Some("11988888888".into()),
                    bio: Some("Especialista em barbas".into()),
                    commission_rate: 50.0,
                },
            ]);
        }
        shop
    }

    /// Inserts an appointment directly, for fixtures.
    pub async fn insert_appointment(&self, appointment: Appointment) {
        self.appointments.write().await.push(appointment);
    }

    pub async fn appointments(&self) -> Vec<Appointment> {
        self.appointments.read().await.clone()
    }

    fn owns(&self, tenant: &TenantId) -> bool {
        &self.tenant_id == tenant
    }

    fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(|| Utc::now().date_naive())
    }

    async fn commission_rate(&self, barber_id: &str) -> f64 {
        self.barbers
            .read()
            .await
            .iter()
            .find(|b| b.id == barber_id)
            .map(|b| b.commission_rate)
            .unwrap_or(50.0)
    }
}

#[async_trait]
impl ServiceCatalog for InMemoryBarbershop {
    async fn active_services(&self, tenant: &TenantId) -> Result<Vec<Service>, NavalhaError> {
        if !self.owns(tenant) {
            return Ok(Vec::new());
        }
        Ok(self.services.read().await.clone())
    }
}

#[async_trait]
impl BarberDirectory for InMemoryBarbershop {
    async fn active_barbers(&self, tenant: &TenantId) -> Result<Vec<Barber>, NavalhaError> {
        if !self.owns(tenant) {
            return Ok(Vec::new());
        }
        Ok(self.barbers.read().await.clone())
    }

    async fn find_by_phone(
        &self,
        tenant: &TenantId,
        phone: &str,
    ) -> Result<Option<Barber>, NavalhaError> {
        if !self.owns(tenant) {
            return Ok(None);
        }
        Ok(self
            .barbers
            .read()
            .await
            .iter()
            .find(|b| b.phone.as_deref() == Some(phone))
            .cloned())
    }

    async fn find_by_name_fragment(
        &self,
        tenant: &TenantId,
        fragment: &str,
    ) -> Result<Option<Barber>, NavalhaError> {
        if !self.owns(tenant) {
            return Ok(None);
        }
        let fragment = fragment.to_lowercase();
        Ok(self
            .barbers
            .read()
            .await
            .iter()
            .find(|b| b.full_name().to_lowercase().contains(&fragment))
            .cloned())
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryBarbershop {
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment, NavalhaError> {
        if !self.owns(&appointment.tenant_id) {
            return Err(NavalhaError::collaborator(format!(
                "unknown tenant {}",
                appointment.tenant_id
            )));
        }

        let service = self
            .services
            .read()
            .await
            .iter()
            .find(|s| s.id == appointment.service_id)
            .cloned()
            .ok_or_else(|| {
                NavalhaError::collaborator(format!(
                    "unknown service {}",
                    appointment.service_id
                ))
            })?;

        // "Any barber" gets the first active one.
        let barber_id = match appointment.barber_id {
            Some(id) => id,
            None => self
                .barbers
                .read()
                .await
                .first()
                .map(|b| b.id.clone())
                .ok_or_else(|| NavalhaError::collaborator("no active barbers"))?,
        };

        let created = Appointment {
            id: format!("apt-{}", uuid::Uuid::new_v4()),
            tenant_id: appointment.tenant_id,
            barber_id,
            client_id: appointment.client_id,
            service_id: appointment.service_id,
            date: appointment.date,
            time: appointment.time,
            status: AppointmentStatus::Confirmed,
            total_price: service.price,
        };
        self.appointments.write().await.push(created.clone());
        Ok(created)
    }

    async fn booked_times(
        &self,
        tenant: &TenantId,
        date: NaiveDate,
        barber_id: Option<&str>,
    ) -> Result<Vec<NaiveTime>, NavalhaError> {
        if !self.owns(tenant) {
            return Ok(Vec::new());
        }
        let mut times: Vec<NaiveTime> = self
            .appointments
            .read()
            .await
            .iter()
            .filter(|a| {
                a.date == date
                    && a.status != AppointmentStatus::Cancelled
                    && barber_id.is_none_or(|id| a.barber_id == id)
            })
            .map(|a| a.time)
            .collect();
        times.sort();
        Ok(times)
    }
}

#[async_trait]
impl ClientRegistry for InMemoryBarbershop {
    async fn find_by_phone(
        &self,
        tenant: &TenantId,
        phone: &str,
    ) -> Result<Option<Client>, NavalhaError> {
        if !self.owns(tenant) {
            return Ok(None);
        }
        Ok(self
            .clients
            .read()
            .await
            .iter()
            .find(|c| c.phone == phone)
            .cloned())
    }

    async fn create(
        &self,
        tenant: &TenantId,
        phone: &str,
        name: &str,
    ) -> Result<Client, NavalhaError> {
        if !self.owns(tenant) {
            return Err(NavalhaError::collaborator(format!("unknown tenant {tenant}")));
        }
        let client = Client {
            id: format!("client-{}", uuid::Uuid::new_v4()),
            name: name.to_string(),
            phone: phone.to_string(),
        };
        self.clients.write().await.push(client.clone());
        Ok(client)
    }
}

#[async_trait]
impl Reporting for InMemoryBarbershop {
    async fn daily_report(
        &self,
        tenant: &TenantId,
        date: NaiveDate,
        barber_id: Option<&str>,
    ) -> Result<DailyReport, NavalhaError> {
        if !self.owns(tenant) {
            return Ok(DailyReport {
                date,
                total_revenue: 0.0,
                total_appointments: 0,
                completed_appointments: 0,
                cancelled_appointments: 0,
                services_breakdown: Vec::new(),
            });
        }

        let appointments = self.appointments.read().await;
        let services = self.services.read().await;
        let day: Vec<&Appointment> = appointments
            .iter()
            .filter(|a| a.date == date && barber_id.is_none_or(|id| a.barber_id == id))
            .collect();

        let completed: Vec<&&Appointment> = day
            .iter()
            .filter(|a| a.status == AppointmentStatus::Completed)
            .collect();
        let cancelled = day
            .iter()
            .filter(|a| a.status == AppointmentStatus::Cancelled)
            .count() as u32;
        let total_revenue = completed.iter().map(|a| a.total_price).sum();

        let mut breakdown: Vec<ServiceSales> = Vec::new();
        for appointment in &completed {
            let name = services
                .iter()
                .find(|s| s.id == appointment.service_id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| appointment.service_id.clone());
            match breakdown.iter_mut().find(|s| s.service_name == name) {
                Some(sales) => {
                    sales.count += 1;
                    sales.revenue += appointment.total_price;
                }
                None => breakdown.push(ServiceSales {
                    service_name: name,
                    count: 1,
                    revenue: appointment.total_price,
                }),
            }
        }
        breakdown.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(DailyReport {
            date,
            total_revenue,
            total_appointments: day.len() as u32,
            completed_appointments: completed.len() as u32,
            cancelled_appointments: cancelled,
            services_breakdown: breakdown,
        })
    }

    async fn weekly_commission(
        &self,
        tenant: &TenantId,
        barber_id: &str,
    ) -> Result<CommissionSummary, NavalhaError> {
        let today = self.today();
        let week_ago = today - chrono::Days::new(7);

        if !self.owns(tenant) {
            return Ok(CommissionSummary {
                total_revenue: 0.0,
                commission: 0.0,
                appointments: 0,
            });
        }

        let appointments = self.appointments.read().await;
        let mine: Vec<&Appointment> = appointments
            .iter()
            .filter(|a| {
                a.barber_id == barber_id
                    && a.status == AppointmentStatus::Completed
                    && a.date >= week_ago
                    && a.date <= today
            })
            .collect();

        let total_revenue: f64 = mine.iter().map(|a| a.total_price).sum();
        let rate = self.commission_rate(barber_id).await;

        Ok(CommissionSummary {
            total_revenue,
            commission: total_revenue * rate / 100.0,
            appointments: mine.len() as u32,
        })
    }

    async fn barber_revenue(
        &self,
        tenant: &TenantId,
        barber_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarberReport, NavalhaError> {
        let barber = self
            .barbers
            .read()
            .await
            .iter()
            .find(|b| self.owns(tenant) && b.id == barber_id)
            .cloned();

        let Some(barber) = barber else {
            return Ok(BarberReport {
                barber_id: barber_id.to_string(),
                barber_name: "Desconhecido".to_string(),
                total_revenue: 0.0,
                commission: 0.0,
                total_appointments: 0,
            });
        };

        let appointments = self.appointments.read().await;
        let mine: Vec<&Appointment> = appointments
            .iter()
            .filter(|a| {
                a.barber_id == barber_id
                    && a.status == AppointmentStatus::Completed
                    && a.date >= start
                    && a.date <= end
            })
            .collect();

        let total_revenue: f64 = mine.iter().map(|a| a.total_price).sum();

        Ok(BarberReport {
            barber_id: barber.id.clone(),
            barber_name: barber.full_name(),
            total_revenue,
            commission: total_revenue * barber.commission_rate / 100.0,
            total_appointments: mine.len() as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> TenantId {
        TenantId::from("default-barbershop")
    }

    fn completed(barber: &str, service: &str, date: NaiveDate, price: f64) -> Appointment {
        Appointment {
            id: format!("apt-{barber}-{date}-{price}"),
            tenant_id: tenant(),
            barber_id: barber.into(),
            client_id: "client-1".into(),
            service_id: service.into(),
            date,
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            status: AppointmentStatus::Completed,
            total_price: price,
        }
    }

    #[tokio::test]
    async fn seeded_catalog_matches_demo_data() {
        let shop = InMemoryBarbershop::seeded(tenant());
        let services = shop.active_services(&tenant()).await.unwrap();
        assert_eq!(services.len(), 3);
        assert_eq!(services[0].name, "Corte Masculino");

        let barbers = shop.active_barbers(&tenant()).await.unwrap();
        assert_eq!(barbers.len(), 2);
        assert_eq!(barbers[1].full_name(), "Joao Santos");

        // Other tenants see nothing.
        let other = TenantId::from("someone-else");
        assert!(shop.active_services(&other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_appointment_assigns_any_barber_and_prices_from_catalog() {
        let shop = InMemoryBarbershop::seeded(tenant());
        let created = AppointmentRepository::create(
            &shop,
            NewAppointment {
                tenant_id: tenant(),
                barber_id: None,
                client_id: "client-1".into(),
                service_id: "service-3".into(),
                date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
                time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                notes: None,
            })
            .await
            .unwrap();

        assert_eq!(created.barber_id, "barber-1");
        assert_eq!(created.total_price, 65.0);
        assert_eq!(created.status, AppointmentStatus::Confirmed);
    }

    #[tokio::test]
    async fn booked_times_skip_cancelled_and_filter_barber() {
        let shop = InMemoryBarbershop::seeded(tenant());
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        let mut cancelled = completed("barber-1", "service-1", date, 45.0);
        cancelled.status = AppointmentStatus::Cancelled;
        cancelled.time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        shop.insert_appointment(cancelled).await;
        shop.insert_appointment(completed("barber-1", "service-1", date, 45.0))
            .await;
        let mut other_barber = completed("barber-2", "service-2", date, 30.0);
        other_barber.time = NaiveTime::from_hms_opt(11, 0, 0).unwrap();
        shop.insert_appointment(other_barber).await;

        let times = shop
            .booked_times(&tenant(), date, Some("barber-1"))
            .await
            .unwrap();
        assert_eq!(times, vec![NaiveTime::from_hms_opt(10, 0, 0).unwrap()]);

        let all = shop.booked_times(&tenant(), date, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn daily_report_aggregates_breakdown() {
        let shop = InMemoryBarbershop::seeded(tenant());
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        shop.insert_appointment(completed("barber-1", "service-1", date, 45.0))
            .await;
        let mut second = completed("barber-1", "service-1", date, 45.0);
        second.time = NaiveTime::from_hms_opt(11, 0, 0).unwrap();
        shop.insert_appointment(second).await;
        let mut beard = completed("barber-2", "service-2", date, 30.0);
        beard.time = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        shop.insert_appointment(beard).await;

        let report = shop.daily_report(&tenant(), date, None).await.unwrap();
        assert_eq!(report.total_revenue, 120.0);
        assert_eq!(report.completed_appointments, 3);
        assert_eq!(report.services_breakdown[0].service_name, "Corte Masculino");
        assert_eq!(report.services_breakdown[0].count, 2);

        let just_carlos = shop
            .daily_report(&tenant(), date, Some("barber-1"))
            .await
            .unwrap();
        assert_eq!(just_carlos.total_revenue, 90.0);
    }

    #[tokio::test]
    async fn weekly_commission_applies_rate_over_rolling_window() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let shop = InMemoryBarbershop::seeded(tenant()).with_today(today);

        shop.insert_appointment(completed("barber-1", "service-1", today, 45.0))
            .await;
        shop.insert_appointment(completed(
            "barber-1",
            "service-1",
            today - chrono::Days::new(3),
            45.0,
        ))
        .await;
        // Outside the window.
        shop.insert_appointment(completed(
            "barber-1",
            "service-1",
            today - chrono::Days::new(10),
            45.0,
        ))
        .await;

        let summary = shop.weekly_commission(&tenant(), "barber-1").await.unwrap();
        assert_eq!(summary.appointments, 2);
        assert_eq!(summary.total_revenue, 90.0);
        assert_eq!(summary.commission, 45.0);
    }

    #[tokio::test]
    async fn barber_revenue_for_unknown_barber_is_zeroed() {
        let shop = InMemoryBarbershop::seeded(tenant());
        let report = shop
            .barber_revenue(
                &tenant(),
                "barber-99",
                NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(report.barber_name, "Desconhecido");
        assert_eq!(report.total_revenue, 0.0);
    }

    #[tokio::test]
    async fn name_fragment_lookup_is_case_insensitive() {
        let shop = InMemoryBarbershop::seeded(tenant());
        let joao = shop
            .find_by_name_fragment(&tenant(), "joao")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(joao.id, "barber-2");
        assert!(shop
            .find_by_name_fragment(&tenant(), "zeca")
            .await
            .unwrap()
            .is_none());
    }
}
