use std::sync::Arc;

use tracing::debug;

use super::rollup::{kpi_summary, monthly_rollup, KpiSummary, MonthlyBucket, ReportWindow};
use crate::errors::ServiceError;
use crate::repo::{BikeRepository, SaleRepository};

pub struct AnalyticsService {
    bikes: Arc<dyn BikeRepository>,
    sales: Arc<dyn SaleRepository>,
}

impl AnalyticsService {
    pub fn new(bikes: Arc<dyn BikeRepository>, sales: Arc<dyn SaleRepository>) -> Self {
        Self { bikes, sales }
    }

    pub async fn kpi(&self, year: Option<&str>, month: Option<&str>) -> Result<KpiSummary, ServiceError> {
        let window = ReportWindow::parse(year, month)?;
        let (bikes, sales) = tokio::try_join!(self.bikes.list(None), self.sales.list())?;
        debug!(year = window.year, month = ?window.month0, bikes = bikes.len(), sales = sales.len(), "kpi_inputs");
        Ok(kpi_summary(&bikes, &sales, window))
    }

    pub async fn monthly(&self, year: Option<&str>) -> Result<Vec<MonthlyBucket>, ServiceError> {
        let window = ReportWindow::parse(year, None)?;
        let (bikes, sales) = tokio::try_join!(self.bikes.list(None), self.sales.list())?;
        Ok(monthly_rollup(&bikes, &sales, window.year))
    }
}
