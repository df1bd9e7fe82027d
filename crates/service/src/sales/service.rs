use std::sync::Arc;

use tracing::{info, instrument, warn};

use models::sale;

use super::domain::{MarkSoldInput, ResetSummary, SaleOutcome};
use crate::errors::{parse_id, ServiceError};
use crate::repo::SaleRepository;

pub struct SalesService {
    sales: Arc<dyn SaleRepository>,
}

impl SalesService {
    pub fn new(sales: Arc<dyn SaleRepository>) -> Self { Self { sales } }

    /// Record a sale for an available bike. The bike flips to `sold` in the same unit of work.
    #[instrument(skip(self, input), fields(sold_by = %sold_by))]
    pub async fn mark_sold(&self, bike_id: &str, sold_by: &str, input: MarkSoldInput) -> Result<sale::Model, ServiceError> {
        let bike_id = parse_id(bike_id, "Bike")?;
        let new_sale = input.validate()?;
        match self.sales.record_sale(bike_id, sold_by, new_sale).await? {
            SaleOutcome::Recorded(sale) => {
                info!(sale_id = %sale.id, bike_id = %bike_id, profit = sale.profit, "bike_sold");
                Ok(sale)
            }
            SaleOutcome::BikeNotFound => Err(ServiceError::not_found("Bike")),
            SaleOutcome::AlreadySold => {
                warn!(bike_id = %bike_id, "sale_rejected_already_sold");
                Err(ServiceError::Conflict("Bike is already sold".into()))
            }
        }
    }

    pub async fn list(&self) -> Result<Vec<sale::Model>, ServiceError> {
        self.sales.list().await
    }

    pub async fn get(&self, id: &str) -> Result<sale::Model, ServiceError> {
        let id = parse_id(id, "Sale")?;
        self.sales.get(id).await?.ok_or_else(|| ServiceError::not_found("Sale"))
    }

    pub async fn by_bike(&self, bike_id: &str) -> Result<sale::Model, ServiceError> {
        let not_found = || ServiceError::NotFound("Sale not found for this bike".into());
        let bike_id = parse_id(bike_id, "Bike").map_err(|_| not_found())?;
        self.sales.find_by_bike(bike_id).await?.ok_or_else(not_found)
    }

    /// Wipe the sales ledger and make every sold bike available again.
    #[instrument(skip(self))]
    pub async fn reset_all(&self) -> Result<ResetSummary, ServiceError> {
        let summary = self.sales.reset_all().await?;
        warn!(sales_deleted = summary.sales_deleted, bikes_reset = summary.bikes_reset, "sales_reset");
        Ok(summary)
    }
}
