// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic report-query parsing.
//!
//! An ordered table of keyword predicates over the lowercased message, each
//! producing a date range and a target. Matching is first-match-wins over
//! the table order below; ambiguous phrasing can match an earlier rule than
//! intended, which is an inherent property of the heuristic and part of the
//! contract the tests pin down.
//!
//! Rule order:
//! 1. Self revenue ("faturei", "meu faturamento", "minha receita")
//! 2. Self commission ("comissao")
//! 3. Named-barber revenue (admin only: "quanto" + a known barber's name)
//! 4. Shop-wide sales ("vendeu", "vendas")

use chrono::{Datelike, NaiveDate};

use navalha_core::domain::Barber;
use navalha_core::types::UserRole;

/// Patterns that ask about the sender's own revenue.
const SELF_REVENUE_PATTERNS: &[&str] = &["faturei", "meu faturamento", "minha receita"];

/// Patterns that ask about the sender's own commission.
const COMMISSION_PATTERNS: &[&str] = &["comissao", "comissão"];

/// Patterns that ask what the shop sold.
const SHOP_SALES_PATTERNS: &[&str] = &["vendeu", "vendas"];

/// An inclusive date range with a human label for the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: &'static str,
}

impl DateRange {
    fn single(date: NaiveDate, label: &'static str) -> Self {
        Self {
            start: date,
            end: date,
            label,
        }
    }
}

/// A parsed report request.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportQuery {
    /// The sender's own revenue over a range.
    SelfRevenue(DateRange),
    /// The sender's own weekly commission.
    SelfCommission,
    /// A named barber's revenue over a range (admin only).
    BarberRevenue(Barber, DateRange),
    /// Tenant-wide sales for a single day.
    ShopSales(DateRange),
}

/// Resolves the date range mentioned in the text, defaulting to today.
///
/// "ontem" wins over "semana"/"mes" because a single-day mention is the more
/// specific request.
pub fn date_range_for(text: &str, today: NaiveDate) -> DateRange {
    if text.contains("ontem") {
        DateRange::single(today - chrono::Days::new(1), "ontem")
    } else if text.contains("semana") {
        DateRange {
            start: today - chrono::Days::new(7),
            end: today,
            label: "esta semana",
        }
    } else if text.contains("mes") || text.contains("mês") {
        DateRange {
            start: today.with_day(1).unwrap_or(today),
            end: today,
            label: "este mes",
        }
    } else {
        DateRange::single(today, "hoje")
    }
}

/// Parses a free-text report query against the ordered rule table.
///
/// `barbers` is the tenant's roster, used only by the named-barber rule;
/// non-admin callers may pass an empty slice. Returns `None` when no rule
/// matches.
pub fn parse_query(
    text: &str,
    role: UserRole,
    barbers: &[Barber],
    today: NaiveDate,
) -> Option<ReportQuery> {
    let normalized = text.to_lowercase();
    let normalized = normalized.trim();

    // Rule 1: self revenue.
    if SELF_REVENUE_PATTERNS.iter().any(|p| normalized.contains(p)) {
        return Some(ReportQuery::SelfRevenue(date_range_for(normalized, today)));
    }

    // Rule 2: self commission.
    if COMMISSION_PATTERNS.iter().any(|p| normalized.contains(p)) {
        return Some(ReportQuery::SelfCommission);
    }

    // Rule 3: named-barber revenue, admins only.
    if role.is_admin() && normalized.contains("quanto") {
        let target = barbers.iter().find(|b| {
            normalized.contains(&b.first_name.to_lowercase())
                || normalized.contains(&b.full_name().to_lowercase())
        });
        if let Some(barber) = target {
            return Some(ReportQuery::BarberRevenue(
                barber.clone(),
                date_range_for(normalized, today),
            ));
        }
    }

    // Rule 4: shop-wide sales, today or yesterday only.
    if SHOP_SALES_PATTERNS.iter().any(|p| normalized.contains(p)) {
        let range = if normalized.contains("ontem") {
            DateRange::single(today - chrono::Days::new(1), "ontem")
        } else {
            DateRange::single(today, "hoje")
        };
        return Some(ReportQuery::ShopSales(range));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn roster() -> Vec<Barber> {
        vec![
            Barber {
                id: "barber-1".into(),
                first_name: "Carlos".into(),
                last_name: "Silva".into(),
                phone: None,
                bio: None,
                commission_rate: 50.0,
            },
            Barber {
                id: "barber-2".into(),
                first_name: "Joao".into(),
                last_name: "Santos".into(),
                phone: None,
                bio: None,
                commission_rate: 50.0,
            },
        ]
    }

    #[test]
    fn faturei_yesterday_resolves_self_revenue() {
        let parsed = parse_query("Quanto faturei ontem", UserRole::Staff, &[], today());
        let ReportQuery::SelfRevenue(range) = parsed.unwrap() else {
            panic!("expected self revenue");
        };
        assert_eq!(range.start, today() - chrono::Days::new(1));
        assert_eq!(range.end, range.start);
        assert_eq!(range.label, "ontem");
    }

    #[test]
    fn range_keywords_map_to_week_and_month() {
        let week = date_range_for("faturamento da semana", today());
        assert_eq!(week.start, today() - chrono::Days::new(7));
        assert_eq!(week.end, today());

        let month = date_range_for("faturamento do mes", today());
        assert_eq!(month.start.day(), 1);
        assert_eq!(month.start.month(), today().month());
        assert_eq!(month.end, today());

        let plain = date_range_for("faturamento", today());
        assert_eq!(plain.label, "hoje");
    }

    #[test]
    fn comissao_resolves_self_commission() {
        assert_eq!(
            parse_query("minha comissao da semana", UserRole::Staff, &[], today()),
            Some(ReportQuery::SelfCommission)
        );
    }

    #[test]
    fn admin_can_name_a_barber_by_first_name() {
        let parsed = parse_query("Quanto o Joao faturou?", UserRole::Owner, &roster(), today());
        let ReportQuery::BarberRevenue(barber, range) = parsed.unwrap() else {
            panic!("expected barber revenue");
        };
        assert_eq!(barber.id, "barber-2");
        assert_eq!(range.label, "hoje");
    }

    #[test]
    fn staff_cannot_query_other_barbers() {
        // Rule 3 is admin-gated; without a sales keyword nothing matches.
        assert_eq!(
            parse_query("Quanto o Joao faturou?", UserRole::Staff, &roster(), today()),
            None
        );
    }

    #[test]
    fn vendeu_resolves_shop_sales_with_yesterday() {
        let parsed = parse_query("o que vendeu ontem", UserRole::Owner, &roster(), today());
        let ReportQuery::ShopSales(range) = parsed.unwrap() else {
            panic!("expected shop sales");
        };
        assert_eq!(range.label, "ontem");
    }

    #[test]
    fn first_match_wins_over_later_rules() {
        // "faturei" appears before the named-barber rule, so even an owner
        // naming a barber gets the self-revenue reading.
        let parsed = parse_query(
            "quanto faturei com o Carlos ontem",
            UserRole::Owner,
            &roster(),
            today(),
        );
        assert!(matches!(parsed, Some(ReportQuery::SelfRevenue(_))));

        // "comissao" beats the sales rule.
        let parsed = parse_query("comissao das vendas", UserRole::Staff, &[], today());
        assert_eq!(parsed, Some(ReportQuery::SelfCommission));
    }

    #[test]
    fn unmatched_text_returns_none() {
        assert_eq!(
            parse_query("bom dia, tudo bem?", UserRole::Owner, &roster(), today()),
            None
        );
    }
}
