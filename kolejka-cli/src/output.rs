//! Table rendering for aggregated queue records.
//!
//! Plain fixed-width columns on stdout; logging goes to stderr and the
//! log file, so these tables stay pipeable.

use kolejka::api::QueueRecord;
use kolejka::geo::{format_distance, Coordinate};
use kolejka::phone::format_phone;
use kolejka::region::Voivodeship;

/// Prints one region table under `heading`, distances measured from
/// `from`.
pub fn print_region_table(heading: &str, records: &[QueueRecord], from: Coordinate) {
    println!("{heading}");
    if records.is_empty() {
        println!("  (no matching queues)");
        println!();
        return;
    }

    println!(
        "  {:<38} {:<16} {:>10} {:>7} {:>9} {:>9}  {}",
        "PROVIDER", "LOCALITY", "FIRST DATE", "QUEUE", "AVG WAIT", "DISTANCE", "PHONE"
    );
    for record in sorted_for_display(records) {
        let attributes = &record.attributes;
        let provider = clip(attributes.provider.as_deref().unwrap_or("-"), 38);
        let locality = clip(attributes.locality.as_deref().unwrap_or("-"), 16);
        let date = record
            .first_available()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let queue = record
            .awaiting()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        let wait = record
            .average_wait_days()
            .map(|d| format!("{d} d"))
            .unwrap_or_else(|| "-".to_string());
        let distance = record
            .distance_from(from)
            .map(format_distance)
            .unwrap_or_else(|| "-".to_string());
        let phone = attributes
            .phone
            .as_deref()
            .and_then(format_phone)
            .unwrap_or_else(|| "-".to_string());

        println!(
            "  {:<38} {:<16} {:>10} {:>7} {:>9} {:>9}  {}",
            provider, locality, date, queue, wait, distance, phone
        );
    }
    println!();
}

/// Prints the discovered home and near regions.
pub fn print_region_summary(home: Voivodeship, near: &[Voivodeship]) {
    println!("Home region: {} ({})", home.display_name(), home.code());
    if near.is_empty() {
        println!("Near regions: none discovered");
    } else {
        let names: Vec<String> = near
            .iter()
            .map(|r| format!("{} ({})", r.display_name(), r.code()))
            .collect();
        println!("Near regions: {}", names.join(", "));
    }
    println!();
}

/// Prints the benefit-name lookup result.
pub fn print_benefit_names(fragment: &str, names: &[String]) {
    if names.is_empty() {
        println!("No benefit names match '{fragment}'.");
        return;
    }
    println!("{} benefit name(s) matching '{fragment}':", names.len());
    for name in names {
        println!("  {name}");
    }
}

/// Prints the sixteen-entry voivodeship code table.
pub fn print_region_codes() {
    println!("{:<6} {}", "CODE", "VOIVODESHIP");
    for region in Voivodeship::all() {
        println!("{:<6} {}", region.code(), region.display_name());
    }
}

/// Sorts rows by first available date; undated entries go last.
fn sorted_for_display(records: &[QueueRecord]) -> Vec<&QueueRecord> {
    let mut rows: Vec<&QueueRecord> = records.iter().collect();
    rows.sort_by_key(|r| (r.first_available().is_none(), r.first_available()));
    rows
}

/// Truncates to `width` characters, ellipsis on overflow.
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
        clipped.push('…');
        clipped
    }
}
