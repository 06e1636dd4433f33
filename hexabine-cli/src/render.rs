//! Text rendering of the offset hex board

use hexabine_core::Snapshot;

/// Width of one cell in characters
const CELL_WIDTH: usize = 6;

/// Draw a snapshot, shifting odd rows half a cell to the right
pub fn board(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for (row, cells) in snapshot.cells.iter().enumerate() {
        if row % 2 == 1 {
            out.push_str(&" ".repeat(CELL_WIDTH / 2));
        }
        for value in cells {
            let label = match value {
                Some(v) => v.to_string(),
                None => ".".to_string(),
            };
            out.push_str(&format!("{label:^width$}", width = CELL_WIDTH));
        }
        // Keep lines free of trailing blanks
        let trimmed = out.trim_end_matches(' ').len();
        out.truncate(trimmed);
        out.push('\n');
    }
    out.push_str(&format!("Score: {}\n", snapshot.score));
    out
}
