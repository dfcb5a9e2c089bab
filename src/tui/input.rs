//! Cursor movement for keyboard navigation of the card grid.

use crossterm::event::KeyCode;

/// Cards per row.
pub const GRID_COLUMNS: usize = 4;

/// Moves the cursor with the arrow keys, staying inside a grid of `card_count` cards.
///
/// Moves that would leave the grid keep the cursor where it is.
pub fn move_cursor(cursor: usize, key: KeyCode, card_count: usize) -> usize {
    let column = cursor % GRID_COLUMNS;
    let target = match key {
        KeyCode::Left if column > 0 => cursor - 1,
        KeyCode::Right if column + 1 < GRID_COLUMNS => cursor + 1,
        KeyCode::Up if cursor >= GRID_COLUMNS => cursor - GRID_COLUMNS,
        KeyCode::Down => cursor + GRID_COLUMNS,
        _ => cursor,
    };

    if target < card_count { target } else { cursor }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_within_row() {
        assert_eq!(move_cursor(0, KeyCode::Right, 16), 1);
        assert_eq!(move_cursor(1, KeyCode::Left, 16), 0);
    }

    #[test]
    fn test_moves_between_rows() {
        assert_eq!(move_cursor(1, KeyCode::Down, 16), 5);
        assert_eq!(move_cursor(5, KeyCode::Up, 16), 1);
    }

    #[test]
    fn test_stops_at_edges() {
        assert_eq!(move_cursor(0, KeyCode::Left, 16), 0);
        assert_eq!(move_cursor(3, KeyCode::Right, 16), 3);
        assert_eq!(move_cursor(2, KeyCode::Up, 16), 2);
        assert_eq!(move_cursor(13, KeyCode::Down, 16), 13);
    }

    #[test]
    fn test_partial_last_row() {
        // Six cards: second row holds ids 4 and 5 only.
        assert_eq!(move_cursor(2, KeyCode::Down, 6), 2);
        assert_eq!(move_cursor(1, KeyCode::Down, 6), 5);
        assert_eq!(move_cursor(5, KeyCode::Right, 6), 5);
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(move_cursor(6, KeyCode::Enter, 16), 6);
    }
}
