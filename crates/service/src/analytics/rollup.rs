use chrono::{Datelike, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

use models::errors::ModelError;
use models::{bike, sale, BikeStatus};

pub const MONTH_LABELS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// Calendar window in UTC. `month0` is zero-based (January = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub year: i32,
    pub month0: Option<u32>,
}

impl ReportWindow {
    pub fn year(year: i32) -> Self { Self { year, month0: None } }

    /// Parse raw query values. Absent or blank year means the current UTC year.
    pub fn parse(year: Option<&str>, month: Option<&str>) -> Result<Self, ModelError> {
        let year = match year.map(str::trim).filter(|s| !s.is_empty()) {
            None => Utc::now().year(),
            Some(raw) => raw.parse::<i32>().map_err(|_| ModelError::Validation("year must be an integer".into()))?,
        };
        let month0 = match month.map(str::trim).filter(|s| !s.is_empty()) {
            None => None,
            Some(raw) => match raw.parse::<u32>() {
                Ok(m) if m < 12 => Some(m),
                _ => return Err(ModelError::Validation("month must be an integer between 0 and 11".into())),
            },
        };
        Ok(Self { year, month0 })
    }

    pub fn contains(&self, at: &DateTimeWithTimeZone) -> bool {
        let utc = at.with_timezone(&Utc);
        utc.year() == self.year && self.month0.map_or(true, |m| utc.month0() == m)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub total_profit: f64,
    pub total_expenses: f64,
    pub total_revenue: f64,
    pub total_bikes_sold: u64,
    pub total_bikes_available: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    pub month: &'static str,
    pub sales: f64,
    pub purchases: f64,
    pub profit: f64,
}

/// Sales are windowed by sale date, expenses by bike intake date.
/// The available count is all-time and ignores the window.
pub fn kpi_summary(bikes: &[bike::Model], sales: &[sale::Model], window: ReportWindow) -> KpiSummary {
    let mut kpi = KpiSummary::default();
    for s in sales.iter().filter(|s| window.contains(&s.sale_date)) {
        kpi.total_revenue += s.sale_price;
        kpi.total_profit += s.profit;
        kpi.total_bikes_sold += 1;
    }
    for b in bikes {
        if window.contains(&b.created_at) {
            kpi.total_expenses += b.purchase_price;
        }
        if b.status == BikeStatus::Available {
            kpi.total_bikes_available += 1;
        }
    }
    kpi
}

/// Twelve buckets for `year`. Sales land in their sale month, purchases in
/// the bike's intake month; the two timelines are independent.
pub fn monthly_rollup(bikes: &[bike::Model], sales: &[sale::Model], year: i32) -> Vec<MonthlyBucket> {
    let mut buckets: Vec<MonthlyBucket> = MONTH_LABELS
        .iter()
        .map(|&month| MonthlyBucket { month, sales: 0.0, purchases: 0.0, profit: 0.0 })
        .collect();

    for s in sales {
        let at = s.sale_date.with_timezone(&Utc);
        if at.year() == year {
            let b = &mut buckets[at.month0() as usize];
            b.sales += s.sale_price;
            b.profit += s.profit;
        }
    }
    for bike in bikes {
        let at = bike.created_at.with_timezone(&Utc);
        if at.year() == year {
            buckets[at.month0() as usize].purchases += bike.purchase_price;
        }
    }
    buckets
}
