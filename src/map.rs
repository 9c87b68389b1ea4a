//! Text loaders for map (`.map`) and moving obstacle (`.dyn`) files.
//!
//! A map file starts with `start_row start_col goal_row goal_col`, followed by
//! one line of whitespace-separated integers per grid row. An obstacle file
//! holds one obstacle per line: `id row col n r1 c1 ... rk ck`, where `n` is
//! the number of waypoint coordinates (twice the number of waypoints).

use crate::environment::{Environment, MovingObstacle};
use crate::error::{LoadError, Result};
use crate::grid::{Grid, Position};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ParsedMap {
    pub grid: Grid,
    pub start: Position,
    pub goal: Position,
}

fn parse_error(path: &Path, line: usize, reason: impl Into<String>) -> LoadError {
    LoadError::Parse {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

fn parse_ints(path: &Path, line_no: usize, line: &str) -> Result<Vec<i64>> {
    line.split_whitespace()
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| parse_error(path, line_no, format!("'{}' is not an integer", token)))
        })
        .collect()
}

fn to_coord(path: &Path, line: usize, value: i64) -> Result<i32> {
    i32::try_from(value).map_err(|_| parse_error(path, line, format!("coordinate {} out of range", value)))
}

/// Parses map text; `path` is only used in error messages.
pub fn parse_map(text: &str, path: &Path) -> Result<ParsedMap> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

    let (pos_line, header) = lines
        .next()
        .ok_or_else(|| parse_error(path, 1, "empty map; expected 'sr sc gr gc' then grid rows"))?;
    let header = parse_ints(path, pos_line, header)?;
    if header.len() != 4 {
        return Err(parse_error(
            path,
            pos_line,
            format!("position line must hold 4 integers, found {}", header.len()),
        ));
    }
    let start = Position::new(to_coord(path, pos_line, header[0])?, to_coord(path, pos_line, header[1])?);
    let goal = Position::new(to_coord(path, pos_line, header[2])?, to_coord(path, pos_line, header[3])?);

    let mut rows = Vec::new();
    for (line_no, line) in lines {
        let row = parse_ints(path, line_no, line)?;
        if !row.is_empty() {
            rows.push(row);
        }
    }
    if rows.is_empty() {
        return Err(parse_error(path, pos_line, "no grid rows after the position line"));
    }

    let grid = Grid::from_rows(rows).map_err(|source| LoadError::Environment {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ParsedMap { grid, start, goal })
}

fn parse_obstacle_line(parts: &[&str]) -> std::result::Result<MovingObstacle, String> {
    let int = |i: usize| -> std::result::Result<i32, String> {
        let token = parts.get(i).ok_or_else(|| format!("missing value at field {}", i + 1))?;
        token.parse::<i32>().map_err(|_| format!("'{}' is not an integer", token))
    };

    let id = parts[0];
    let position = Position::new(int(1)?, int(2)?);
    let count = int(3)?;
    if count < 0 || count % 2 != 0 {
        return Err(format!("waypoint count {} must be even and non-negative", count));
    }
    let waypoints = (0..count as usize / 2)
        .map(|k| Ok(Position::new(int(4 + 2 * k)?, int(5 + 2 * k)?)))
        .collect::<std::result::Result<Vec<_>, String>>()?;
    Ok(MovingObstacle::new(id, position, waypoints))
}

/// Parses obstacle text, skipping malformed lines with a warning.
/// A repeated identifier replaces the earlier definition.
pub fn parse_obstacles(text: &str, path: &Path) -> Vec<MovingObstacle> {
    let mut obstacles: Vec<MovingObstacle> = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        if parts.len() < 4 {
            warn!("{}:{}: skipping invalid line '{}'", path.display(), line_no, line.trim());
            continue;
        }
        match parse_obstacle_line(&parts) {
            Ok(obstacle) => {
                if let Some(existing) = obstacles.iter_mut().find(|o| o.id == obstacle.id) {
                    warn!("{}:{}: obstacle '{}' redefined", path.display(), line_no, obstacle.id);
                    *existing = obstacle;
                } else {
                    obstacles.push(obstacle);
                }
            }
            Err(reason) => {
                warn!("{}:{}: skipping obstacle '{}': {}", path.display(), line_no, parts[0], reason);
            }
        }
    }
    obstacles
}

/// Reads an obstacle file; an unreadable file yields no obstacles.
pub fn load_obstacles(path: &Path) -> Vec<MovingObstacle> {
    match fs::read_to_string(path) {
        Ok(text) => parse_obstacles(&text, path),
        Err(e) => {
            warn!("failed to read obstacle file {}: {}; using no dynamics", path.display(), e);
            Vec::new()
        }
    }
}

/// Loads a map and, optionally, its moving obstacles into an [`Environment`].
pub fn load_environment(map_path: &Path, obstacle_path: Option<&Path>) -> Result<Environment> {
    if !map_path.exists() {
        return Err(LoadError::NotFound(map_path.to_path_buf()));
    }
    let text = fs::read_to_string(map_path).map_err(|source| LoadError::Io {
        path: map_path.to_path_buf(),
        source,
    })?;
    let ParsedMap { grid, start, goal } = parse_map(&text, map_path)?;

    let obstacles: Vec<_> = obstacle_path
        .map(load_obstacles)
        .unwrap_or_default()
        .into_iter()
        .filter(|o| {
            let inside = o.waypoints.iter().all(|w| grid.contains(*w));
            if !inside {
                warn!("skipping obstacle '{}': waypoint outside the grid", o.id);
            }
            inside
        })
        .collect();

    info!(
        "loaded {} ({}x{}) with {} moving obstacles",
        map_path.display(),
        grid.rows(),
        grid.cols(),
        obstacles.len()
    );
    Environment::new(grid, start, goal, obstacles).map_err(|source| LoadError::Environment {
        path: map_path.to_path_buf(),
        source,
    })
}

/// Map and optional obstacle file for a named map inside `dir`.
pub fn map_files(dir: &Path, name: &str) -> (PathBuf, Option<PathBuf>) {
    let map = dir.join(format!("{}.map", name));
    let dynamics = dir.join(format!("{}.dyn", name));
    (map, dynamics.exists().then_some(dynamics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnvironmentError;
    use crate::grid::Cost;

    fn here() -> &'static Path {
        Path::new("test.map")
    }

    #[test]
    fn parses_positions_and_normalises_costs() {
        let map = parse_map("0 0 1 2\n0 1 -1\n\n2 0 3\n", here()).unwrap();
        assert_eq!(map.start, Position::new(0, 0));
        assert_eq!(map.goal, Position::new(1, 2));
        assert_eq!(map.grid.rows(), 2);
        assert_eq!(map.grid.cost(Position::new(0, 0)), Cost::Finite(1));
        assert_eq!(map.grid.cost(Position::new(0, 2)), Cost::Infinite);
        assert_eq!(map.grid.cost(Position::new(1, 1)), Cost::Finite(1));
    }

    #[test]
    fn rejects_short_position_line() {
        let err = parse_map("0 0 1\n1 1\n", here()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 1, .. }));
    }

    #[test]
    fn rejects_non_integer_tokens() {
        let err = parse_map("0 0 1 1\n1 x\n1 1\n", here()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 2, .. }));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = parse_map("0 0 1 1\n1 1 1\n1 1\n", here()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Environment {
                source: EnvironmentError::RaggedGrid { row: 1, .. },
                ..
            }
        ));
    }

    #[test]
    fn rejects_map_without_grid() {
        assert!(parse_map("0 0 1 1\n", here()).is_err());
        assert!(parse_map("", here()).is_err());
    }

    #[test]
    fn obstacle_lines_are_parsed_and_bad_ones_skipped() {
        let text = "truck1 5 6 4 5 6 5 7\n\
                    short 1 2\n\
                    odd 1 1 3 1 1 2\n\
                    truncated 0 0 4 1 1\n\
                    parked 2 2 0\n";
        let obstacles = parse_obstacles(text, Path::new("test.dyn"));
        assert_eq!(obstacles.len(), 2);
        assert_eq!(obstacles[0].id, "truck1");
        assert_eq!(obstacles[0].waypoints, vec![Position::new(5, 6), Position::new(5, 7)]);
        assert_eq!(obstacles[1].id, "parked");
        assert!(obstacles[1].waypoints.is_empty());
    }

    #[test]
    fn repeated_obstacle_id_replaces_earlier_entry() {
        let obstacles = parse_obstacles("a 0 0 2 0 0\na 1 1 2 1 1\n", Path::new("test.dyn"));
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].waypoints, vec![Position::new(1, 1)]);
    }

    #[test]
    fn missing_map_is_reported() {
        let err = load_environment(Path::new("does/not/exist.map"), None).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }
}
