//! Price data access port trait.

use crate::domain::error::AlgoBlocksError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait PriceDataPort {
    /// Fetch daily bars, optionally restricted to an inclusive date range.
    fn fetch_prices(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, AlgoBlocksError>;
}
