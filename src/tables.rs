use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{ApplianceCalculations, LiveRecommendation, Warning},
    quantity::cost::Cost,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

/// Cheapest start times, from the cheapest one.
#[must_use]
pub fn build_cost_table(calculations: &ApplianceCalculations, limit: usize) -> Table {
    let by_price = calculations.cost_map.by_price();
    let median_cost = by_price.get(by_price.len() / 2).map_or(Cost::ZERO, |(_, cost)| *cost);

    let mut table = new_table();
    table.set_header(vec!["Rank", "Date", "Start", "Cost", "Extra"]);
    for (rank, (start_time, cost)) in by_price.iter().enumerate().take(limit) {
        table.add_row(vec![
            Cell::new(rank + 1).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
            Cell::new(start_time.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(start_time.format("%H:%M:%S")),
            Cell::new(cost).set_alignment(CellAlignment::Right).fg(if *cost <= median_cost {
                Color::Green
            } else {
                Color::Red
            }),
            Cell::new(*cost - calculations.lowest_price).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[must_use]
pub fn build_summary_table(calculations: &ApplianceCalculations) -> Table {
    let mut table = new_table();
    table.set_header(vec!["", "Time", "Cost"]);
    table.add_row(vec![
        Cell::new("Lowest"),
        Cell::new(calculations.lowest_price_time.format("%b %d %H:%M:%S")),
        Cell::new(calculations.lowest_price).set_alignment(CellAlignment::Right).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Highest"),
        Cell::new(calculations.highest_price_time.format("%b %d %H:%M:%S")),
        Cell::new(calculations.highest_price).set_alignment(CellAlignment::Right).fg(Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Difference"),
        Cell::new(""),
        Cell::new(calculations.price_difference).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Latest start"),
        Cell::new(calculations.latest_start_time.format("%b %d %H:%M:%S")),
        Cell::new(""),
    ]);
    for warning in &calculations.warnings {
        let Warning::ResolutionMismatch { resolution_seconds, repeat } = warning;
        table.add_row(vec![
            Cell::new("Warning").fg(Color::DarkYellow),
            Cell::new(format!("{resolution_seconds}s does not divide an hour, {repeat} per hour")),
            Cell::new(""),
        ]);
    }
    table
}

#[must_use]
pub fn build_recommendation_table(recommendation: &LiveRecommendation) -> Table {
    let mut table = new_table();
    table.set_header(vec!["", "Time", "Cost", "Difference"]);
    table.add_row(vec![
        Cell::new("Now"),
        Cell::new(recommendation.current_time.format("%H:%M")),
        Cell::new(recommendation.current_price).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Next"),
        Cell::new(recommendation.next_low_price_time.format("%H:%M")),
        Cell::new(recommendation.next_low_price).set_alignment(CellAlignment::Right),
        Cell::new(recommendation.diff_now_and_next_low).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new(format!("Delay {}h", recommendation.delay_hours)),
        Cell::new(recommendation.delay_hours_time().format("%H:%M")),
        Cell::new(recommendation.delay_hours_price).set_alignment(CellAlignment::Right).fg(
            if recommendation.delay_hours_price < recommendation.current_price {
                Color::Green
            } else {
                Color::Reset
            },
        ),
        Cell::new(recommendation.diff_now_and_delay).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Cheapest"),
        Cell::new(recommendation.cheapest_start_time.format("%b %d %H:%M")),
        Cell::new(recommendation.cheapest_start_price)
            .set_alignment(CellAlignment::Right)
            .fg(Color::Green),
        Cell::new((recommendation.current_price - recommendation.cheapest_start_price).abs())
            .set_alignment(CellAlignment::Right),
    ]);
    table
}
