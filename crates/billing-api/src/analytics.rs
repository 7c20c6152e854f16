//! Revenue analytics (admin only).

use billing_core::{AnalyticsSnapshot, DailyRevenue};
use reqwest::Method;

use crate::client::BillingClient;
use crate::error::ApiResult;
use crate::responses::{AnalyticsResponse, SummaryResponse};

impl BillingClient {
    /// Invoice count, amount collected and amount outstanding.
    pub async fn analytics(&self) -> ApiResult<AnalyticsSnapshot> {
        self.require_admin("view analytics")?;
        let request = self.authed(Method::GET, &["analytics"])?;
        let response: AnalyticsResponse = self.send_json(request).await?;
        Ok(response.analytics)
    }

    /// Payments collected per day over the last 30 days.
    pub async fn revenue_summary(&self) -> ApiResult<Vec<DailyRevenue>> {
        self.require_admin("view analytics")?;
        let request = self.authed(Method::GET, &["analytics", "summary"])?;
        let response: SummaryResponse = self.send_json(request).await?;
        Ok(response.analytics.last_30_days_payments)
    }
}
