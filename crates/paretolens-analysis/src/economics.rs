use serde::{Deserialize, Serialize};

use crate::error::DivisionError;

/// Campaign-wide sums the unit-economics ratios are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CampaignTotals {
    pub ad_spend: f64,
    pub revenue: f64,
    pub payouts: f64,
    pub installs: u64,
    /// Distinct users who generated revenue.
    pub revenue_users: u64,
    /// Distinct users who received a payout.
    pub payout_users: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitEconomics {
    pub user_acquisition_cost: f64,
    pub average_revenue_per_user: f64,
    pub average_payout_per_user: f64,
    pub return_on_ad_spend: f64,
    pub profit_margin: f64,
}

#[expect(clippy::cast_precision_loss)]
impl CampaignTotals {
    /// Ad spend per install.
    pub fn user_acquisition_cost(&self) -> Result<f64, DivisionError> {
        ratio("user acquisition cost", self.ad_spend, self.installs as f64)
    }

    /// Revenue per revenue-generating user.
    pub fn average_revenue_per_user(&self) -> Result<f64, DivisionError> {
        ratio(
            "average revenue per user",
            self.revenue,
            self.revenue_users as f64,
        )
    }

    /// Payouts per paid user.
    pub fn average_payout_per_user(&self) -> Result<f64, DivisionError> {
        ratio(
            "average payout per user",
            self.payouts,
            self.payout_users as f64,
        )
    }

    /// Revenue per unit of ad spend.
    pub fn return_on_ad_spend(&self) -> Result<f64, DivisionError> {
        ratio("return on ad spend", self.revenue, self.ad_spend)
    }

    /// Share of revenue left after ad spend and payouts.
    pub fn profit_margin(&self) -> Result<f64, DivisionError> {
        ratio(
            "profit margin",
            self.revenue - self.ad_spend - self.payouts,
            self.revenue,
        )
    }

    /// All ratios at once.
    ///
    /// # Errors
    ///
    /// Returns the [`DivisionError`] of the first ratio whose denominator is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use paretolens_analysis::economics::CampaignTotals;
    ///
    /// let totals = CampaignTotals {
    ///     ad_spend: 500.0,
    ///     revenue: 2000.0,
    ///     payouts: 900.0,
    ///     installs: 250,
    ///     revenue_users: 100,
    ///     payout_users: 30,
    /// };
    /// let economics = totals.unit_economics().unwrap();
    /// assert_eq!(economics.user_acquisition_cost, 2.0);
    /// assert_eq!(economics.return_on_ad_spend, 4.0);
    /// assert_eq!(economics.profit_margin, 0.3);
    /// ```
    pub fn unit_economics(&self) -> Result<UnitEconomics, DivisionError> {
        Ok(UnitEconomics {
            user_acquisition_cost: self.user_acquisition_cost()?,
            average_revenue_per_user: self.average_revenue_per_user()?,
            average_payout_per_user: self.average_payout_per_user()?,
            return_on_ad_spend: self.return_on_ad_spend()?,
            profit_margin: self.profit_margin()?,
        })
    }
}

fn ratio(quantity: &'static str, numerator: f64, denominator: f64) -> Result<f64, DivisionError> {
    if denominator == 0.0 {
        return Err(DivisionError::new(quantity));
    }
    Ok(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals() -> CampaignTotals {
        CampaignTotals {
            ad_spend: 1000.0,
            revenue: 1500.0,
            payouts: 200.0,
            installs: 400,
            revenue_users: 60,
            payout_users: 8,
        }
    }

    #[test]
    fn test_ratios() {
        let economics = totals().unit_economics().unwrap();
        assert_eq!(economics.user_acquisition_cost, 2.5);
        assert_eq!(economics.average_revenue_per_user, 25.0);
        assert_eq!(economics.average_payout_per_user, 25.0);
        assert_eq!(economics.return_on_ad_spend, 1.5);
        assert!((economics.profit_margin - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_zero_installs() {
        let totals = CampaignTotals {
            installs: 0,
            ..totals()
        };
        let err = totals.user_acquisition_cost().unwrap_err();
        assert_eq!(err.quantity, "user acquisition cost");
        assert_eq!(totals.unit_economics(), Err(err));
        // Other ratios stay available
        assert_eq!(totals.return_on_ad_spend(), Ok(1.5));
    }

    #[test]
    fn test_zero_revenue_margin() {
        let totals = CampaignTotals {
            revenue: 0.0,
            ..totals()
        };
        assert_eq!(
            totals.profit_margin(),
            Err(DivisionError::new("profit margin"))
        );
    }

    #[test]
    fn test_negative_margin() {
        let totals = CampaignTotals {
            revenue: 1000.0,
            ad_spend: 1000.0,
            payouts: 500.0,
            ..totals()
        };
        assert_eq!(totals.profit_margin(), Ok(-0.5));
    }
}
