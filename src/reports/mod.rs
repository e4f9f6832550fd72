use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use tileforge::optimizer::{ChainOutcome, SearchReport};
use tileforge::puzzle::Board;
use tileforge::scorer::ScoreDetails;
use tileforge::snapshot::orientation_code;

/// Board as `piece/orientation` per cell, 1-based ids like the snapshot files.
pub fn print_board_grid(name: &str, board: &Board) {
    println!("\nBoard: {}", name);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    for row in board.cells.chunks(board.size) {
        let cells: Vec<Cell> = row
            .iter()
            .map(|c| {
                Cell::new(format!("{}/{}", c.piece as usize + 1, orientation_code(c.rotation)))
                    .set_alignment(CellAlignment::Center)
            })
            .collect();
        table.add_row(cells);
    }
    println!("{}", table);
}

pub fn print_score_report(d: &ScoreDetails) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new("Max"),
        Cell::new("Done"),
        Cell::new("Matched").fg(Color::Green),
        Cell::new("Broken").fg(Color::Red),
        Cell::new("Border"),
        Cell::new("Border Edges"),
    ]);
    table.add_row(vec![
        Cell::new(d.total)
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(d.max),
        Cell::new(format!("{:.1}%", d.completion() * 100.0)),
        Cell::new(d.matched_edges),
        Cell::new(d.mismatched_edges),
        Cell::new(d.border_credits),
        Cell::new(d.boundary_edges_placed),
    ]);
    for i in 0..7 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("\n{}", table);
}

pub fn print_chain_table(report: &SearchReport) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Seed").add_attribute(Attribute::Bold),
        Cell::new("Best").fg(Color::Cyan),
        Cell::new("Steps"),
        Cell::new("Steps/s"),
        Cell::new("Reheats"),
        Cell::new("Time (s)"),
        Cell::new("Outcome"),
    ]);

    for c in &report.chains {
        let secs = c.elapsed.as_secs_f64();
        let rate = if secs > 0.0 { c.steps as f64 / secs } else { 0.0 };
        let outcome = Cell::new(c.outcome.to_string());
        let outcome = if c.outcome == ChainOutcome::Solved {
            outcome.fg(Color::Green)
        } else {
            outcome
        };
        table.add_row(vec![
            Cell::new(c.seed),
            Cell::new(format!("{}/{}", c.best_score, report.max_score)),
            Cell::new(c.steps),
            Cell::new(format!("{:.0}", rate)),
            Cell::new(c.reheats),
            Cell::new(format!("{:.1}", secs)),
            outcome,
        ]);
    }
    println!("\n{}", table);
}
