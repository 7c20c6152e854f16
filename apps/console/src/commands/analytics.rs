//! # Analytics Command

use anyhow::Result;

use crate::context::Console;
use crate::render;

/// The overview and the 30-day series are independent requests.
pub async fn show(console: Console) -> Result<()> {
    let (snapshot, series) = tokio::try_join!(
        console.client.analytics(),
        console.client.revenue_summary()
    )?;

    println!("{}", render::analytics_table(&snapshot));

    if series.is_empty() {
        println!("No payments in the last 30 days");
    } else {
        println!("\nLast 30 days");
        println!("{}", render::revenue_table(&series));
    }
    Ok(())
}
