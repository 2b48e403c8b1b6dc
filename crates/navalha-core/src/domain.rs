// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain models exchanged with the external collaborators.
//!
//! These mirror the barbershop backend's records but carry only the fields
//! the conversational engine actually reads.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::types::TenantId;

/// An active service offered by a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub duration_minutes: u32,
}

/// A barber working for a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barber {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Sender address linking this barber to a messaging identity.
    pub phone: Option<String>,
    pub bio: Option<String>,
    /// Commission percentage (0-100) of revenue kept by the barber.
    pub commission_rate: f64,
}

impl Barber {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A client (customer) record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: String,
}

/// Request to create a new appointment.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub tenant_id: TenantId,
    /// `None` means "any barber": the repository assigns one.
    pub barber_id: Option<String>,
    pub client_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub notes: Option<String>,
}

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Confirmed,
    Completed,
    Cancelled,
}

/// A created appointment as returned by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub tenant_id: TenantId,
    pub barber_id: String,
    pub client_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub total_price: f64,
}

/// Sales of one service within a daily report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSales {
    pub service_name: String,
    pub count: u32,
    pub revenue: f64,
}

/// Revenue report for one day, tenant-wide or filtered to one barber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub total_revenue: f64,
    pub total_appointments: u32,
    pub completed_appointments: u32,
    pub cancelled_appointments: u32,
    pub services_breakdown: Vec<ServiceSales>,
}

/// Rolling seven-day commission summary for one barber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionSummary {
    pub total_revenue: f64,
    pub commission: f64,
    pub appointments: u32,
}

/// Arbitrary-range revenue report for one barber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarberReport {
    pub barber_id: String,
    pub barber_name: String,
    pub total_revenue: f64,
    pub commission: f64,
    pub total_appointments: u32,
}
