//! Reading boards from the plain text format: the dimension `n`, then
//! `n*n` whitespace-separated tiles in row-major order.

use std::fs;
use std::path::Path;

use crate::error::PuzzleError;

pub fn parse_grid(text: &str) -> Result<Vec<Vec<u32>>, PuzzleError> {
    let mut tokens = text.split_whitespace().enumerate();

    let mut next_number = |what: &'static str| -> Result<u32, PuzzleError> {
        let (position, token) = tokens.next().ok_or(PuzzleError::UnexpectedEof(what))?;
        token.parse::<u32>().map_err(|_| PuzzleError::InvalidToken {
            token: token.to_string(),
            position,
        })
    };

    let size = next_number("missing board dimension")? as usize;
    if size == 0 {
        return Err(PuzzleError::EmptyGrid);
    }

    let mut grid = Vec::new();
    for _ in 0..size {
        let mut row = Vec::new();
        for _ in 0..size {
            row.push(next_number("missing tiles")?);
        }
        grid.push(row);
    }

    if let Some((_, extra)) = tokens.next() {
        return Err(PuzzleError::TrailingInput(extra.to_string()));
    }

    Ok(grid)
}

pub fn read_grid(path: impl AsRef<Path>) -> Result<Vec<Vec<u32>>, PuzzleError> {
    let text = fs::read_to_string(path)?;
    parse_grid(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_row_major_grid() {
        let grid = parse_grid("3\n 0  1  3\n 4  2  5\n 7  8  6\n").unwrap();
        assert_eq!(grid, vec![vec![0, 1, 3], vec![4, 2, 5], vec![7, 8, 6]]);
    }

    #[test]
    fn tolerates_arbitrary_whitespace() {
        let grid = parse_grid("2 1\t2\n\n3 0").unwrap();
        assert_eq!(grid, vec![vec![1, 2], vec![3, 0]]);
    }

    #[test]
    fn reports_missing_tiles() {
        assert!(matches!(
            parse_grid("3\n1 2 3\n4 5"),
            Err(PuzzleError::UnexpectedEof(_))
        ));
        assert!(matches!(parse_grid("   "), Err(PuzzleError::UnexpectedEof(_))));
    }

    #[test]
    fn reports_bad_tokens() {
        match parse_grid("2\n1 x\n3 0") {
            Err(PuzzleError::InvalidToken { token, position }) => {
                assert_eq!(token, "x");
                assert_eq!(position, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            parse_grid("2\n1 -2\n3 0"),
            Err(PuzzleError::InvalidToken { .. })
        ));
    }

    #[test]
    fn rejects_trailing_tokens() {
        assert!(matches!(
            parse_grid("2\n1 2\n3 0\n9"),
            Err(PuzzleError::TrailingInput(t)) if t == "9"
        ));
    }

    #[test]
    fn zero_dimension_is_empty() {
        assert!(matches!(parse_grid("0"), Err(PuzzleError::EmptyGrid)));
    }

    #[test]
    fn read_grid_surfaces_io_errors() {
        assert!(matches!(
            read_grid("/nonexistent/puzzle.txt"),
            Err(PuzzleError::Io(_))
        ));
    }
}
