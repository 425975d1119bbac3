use super::ui;
use crate::core::{QuoteSource, RateSnapshot};
use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Color};

fn source_cell(source: QuoteSource) -> Cell {
    let color = match source {
        QuoteSource::Cache => Color::DarkGrey,
        QuoteSource::Api => Color::Green,
        QuoteSource::ApiFailedServingCache => Color::Red,
    };
    Cell::new(source.label()).fg(color)
}

impl RateSnapshot {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Field"), ui::header_cell("Value")]);

        table.add_row(vec![Cell::new("Merchant"), Cell::new(&self.merchant)]);
        table.add_row(vec![
            Cell::new("Access token"),
            Cell::new(ui::mask_secret(&self.api_access_token)),
        ]);
        table.add_row(vec![Cell::new("Currency"), Cell::new(&self.base_currency)]);
        table.add_row(vec![
            Cell::new("Rate per gram"),
            Cell::new(format!("{:.2} {}", self.quote, self.base_currency))
                .set_alignment(CellAlignment::Right),
        ]);
        table.add_row(vec![
            Cell::new("Last refreshed"),
            Cell::new(self.refreshed_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ]);
        table.add_row(vec![Cell::new("Source"), source_cell(self.source)]);

        let mut output = format!(
            "{}\n{}",
            ui::style_text("Gold Rate", ui::StyleType::Title),
            table
        );
        if let Some(warning) = &self.warning {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(&format!("Warning: {warning}"), ui::StyleType::Error)
            ));
        }
        output
    }
}

/// Prints a snapshot as a table, or as JSON when `json` is set.
pub fn print_snapshot(snapshot: &RateSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
    } else {
        println!("{}", snapshot.display_as_table());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn snapshot(source: QuoteSource, warning: Option<&str>) -> RateSnapshot {
        RateSnapshot {
            merchant: "goldapi".to_string(),
            api_access_token: "secret-token-9876".to_string(),
            base_currency: "INR".to_string(),
            quote: dec!(87.21),
            refreshed_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
            source,
            warning: warning.map(str::to_string),
        }
    }

    #[test]
    fn test_table_masks_token() {
        let output = snapshot(QuoteSource::Cache, None).display_as_table();
        assert!(output.contains("87.21 INR"));
        assert!(output.contains("9876"));
        assert!(!output.contains("secret-token"));
        assert!(output.contains("Database"));
        assert!(output.contains("2025-03-01 09:30:00 UTC"));
        assert!(!output.contains("Warning"));
    }

    #[test]
    fn test_table_shows_degraded_warning() {
        let output = snapshot(
            QuoteSource::ApiFailedServingCache,
            Some("Quote fetch failed for goldapi: timeout"),
        )
        .display_as_table();
        assert!(output.contains("Degraded"));
        assert!(output.contains("Warning: Quote fetch failed for goldapi: timeout"));
    }
}
