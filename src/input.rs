//! Command parsing for interactive play: explicit swaps and vim-style directions.

use balloon_crush::Pos;

/// Command from one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Swap(Pos, Pos),
    Hint,
    Show,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
commands:
  swap C R C R     swap two adjacent cells (column, row)
  C R DIR          swap with a neighbour; DIR is left/right/up/down or h/l/k/j
  hint | ?         suggest a move
  show | s         print the board
  help             this text
  quit | q         leave";

/// Map an input line to a command. Supports both explicit coordinates and
/// cell + direction (arrows spelled out, or hjkl).
pub fn line_to_command(line: &str) -> Command {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["q" | "quit" | "exit"] => Command::Quit,
        ["?" | "hint"] => Command::Hint,
        ["s" | "show"] => Command::Show,
        ["help" | "h"] => Command::Help,
        ["swap", c1, r1, c2, r2] => match (cell(c1, r1), cell(c2, r2)) {
            (Some(a), Some(b)) => Command::Swap(a, b),
            _ => Command::Unknown(line.trim().to_string()),
        },
        [c, r, dir] => cell(c, r)
            .and_then(|a| step(a, dir).map(|b| Command::Swap(a, b)))
            .unwrap_or_else(|| Command::Unknown(line.trim().to_string())),
        _ => Command::Unknown(line.trim().to_string()),
    }
}

fn cell(col: &str, row: &str) -> Option<Pos> {
    Some(Pos::new(col.parse().ok()?, row.parse().ok()?))
}

fn step(from: Pos, dir: &str) -> Option<Pos> {
    match dir {
        "left" | "h" => Some(Pos::new(from.col.checked_sub(1)?, from.row)),
        "right" | "l" => Some(Pos::new(from.col + 1, from.row)),
        "up" | "k" => Some(Pos::new(from.col, from.row.checked_sub(1)?)),
        "down" | "j" => Some(Pos::new(from.col, from.row + 1)),
        _ => None,
    }
}
