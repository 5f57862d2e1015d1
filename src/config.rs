//! Explicit map configuration, resolved once by the caller and handed to
//! [CellGrid::from_config](crate::CellGrid::from_config).
//!
//! Besides building a [GridConfig] in code, two text formats are accepted. The line format names
//! the size, the marks and every wall:
//!
//! ```text
//! # comment
//! size 5 4
//! start 0 3
//! end 4 0
//! wall 2 0
//! wall 2 1
//! ```
//!
//! The ASCII format draws the map with `.` for empty cells, `#` for walls and `S`/`E` for the
//! marks, one row per line.
use crate::cell_grid::check_dimensions;
use crate::error::{GridError, MapParseError};
use crate::DEFAULT_GRID_SIZE;
use grid_util::point::Point;
use log::warn;
use rand::Rng;
use std::str::FromStr;

/// Where the walls of a map come from.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum MapSource {
    /// A wall cross through the middle of the grid with one random gap per arm.
    #[default]
    Auto,
    /// An explicit list of wall positions, typically read from a map file.
    FromWalls(Vec<Point>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridConfig {
    pub source: MapSource,
    pub width: usize,
    pub height: usize,
    /// Random position in the lower left quadrant if [None].
    pub start: Option<Point>,
    /// Random position in the upper right quadrant if [None].
    pub end: Option<Point>,
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        GridConfig::auto(DEFAULT_GRID_SIZE, DEFAULT_GRID_SIZE)
    }
}

impl GridConfig {
    pub fn auto(width: usize, height: usize) -> GridConfig {
        GridConfig {
            source: MapSource::Auto,
            width,
            height,
            start: None,
            end: None,
        }
    }

    pub fn from_walls(
        width: usize,
        height: usize,
        walls: Vec<Point>,
        start: Point,
        end: Point,
    ) -> GridConfig {
        GridConfig {
            source: MapSource::FromWalls(walls),
            width,
            height,
            start: Some(start),
            end: Some(end),
        }
    }

    /// Parses the ASCII format. All rows must have the same width and the map must contain
    /// exactly one `S` and one `E`.
    pub fn from_ascii(text: &str) -> Result<GridConfig, MapParseError> {
        let mut walls = Vec::new();
        let mut start = None;
        let mut end = None;
        let mut width = None;
        let mut height = 0;
        let rows = text.lines().map(str::trim).enumerate();
        for (line_ix, row) in rows.filter(|(_, row)| !row.is_empty()) {
            let line = line_ix + 1;
            let y = height as i32;
            let row_width = row.chars().count();
            match width {
                None => width = Some(row_width),
                Some(w) if w != row_width => {
                    return Err(MapParseError::new(
                        line,
                        format!("row has {row_width} cells, expected {w}"),
                    ))
                }
                Some(_) => {}
            }
            for (x, c) in row.chars().enumerate() {
                let pos = Point::new(x as i32, y);
                match c {
                    '.' => {}
                    '#' => walls.push(pos),
                    'S' => set_once(&mut start, pos, line, "start")?,
                    'E' => set_once(&mut end, pos, line, "end")?,
                    other => {
                        return Err(MapParseError::new(
                            line,
                            format!("unexpected character '{other}'"),
                        ))
                    }
                }
            }
            height += 1;
        }
        let width = width.ok_or_else(|| MapParseError::new(0, "map is empty"))?;
        let start = start.ok_or_else(|| MapParseError::new(0, "missing start 'S'"))?;
        let end = end.ok_or_else(|| MapParseError::new(0, "missing end 'E'"))?;
        Ok(GridConfig::from_walls(width, height, walls, start, end))
    }

    /// Checks the configuration and resolves the start and end positions, drawing the missing
    /// ones from `rng`.
    pub(crate) fn endpoints<R: Rng>(&self, rng: &mut R) -> Result<(Point, Point), GridError> {
        let (w, h) = check_dimensions(self.width, self.height)?;
        let needs_quadrants =
            self.source == MapSource::Auto || self.start.is_none() || self.end.is_none();
        if needs_quadrants && (w < 3 || h < 3) {
            return Err(GridError::InvalidConfig {
                reason: format!(
                    "a generated map needs at least 3x3 cells, got {}x{}",
                    self.width, self.height
                ),
            });
        }
        let start = self.start.unwrap_or_else(|| {
            Point::new(rng.gen_range(0..w / 2), rng.gen_range(h / 2 + 1..h))
        });
        let end = self.end.unwrap_or_else(|| {
            Point::new(rng.gen_range(w / 2 + 1..w), rng.gen_range(0..h / 2))
        });
        Ok((start, end))
    }
}

fn set_once(
    slot: &mut Option<Point>,
    pos: Point,
    line: usize,
    name: &str,
) -> Result<(), MapParseError> {
    if slot.is_some() {
        return Err(MapParseError::new(line, format!("duplicate {name}")));
    }
    *slot = Some(pos);
    Ok(())
}

fn parse_point<'a>(
    mut args: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<(i64, i64), MapParseError> {
    let mut coordinate = || -> Result<i64, MapParseError> {
        let arg = args
            .next()
            .ok_or_else(|| MapParseError::new(line, "expected two coordinates"))?;
        arg.parse::<i64>()
            .map_err(|_| MapParseError::new(line, format!("'{arg}' is not an integer")))
    };
    let x = coordinate()?;
    let y = coordinate()?;
    if args.next().is_some() {
        return Err(MapParseError::new(line, "expected two coordinates"));
    }
    Ok((x, y))
}

fn to_point((x, y): (i64, i64), line: usize) -> Result<Point, MapParseError> {
    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) => Ok(Point::new(x, y)),
        _ => Err(MapParseError::new(line, "coordinate does not fit the grid")),
    }
}

impl FromStr for GridConfig {
    type Err = MapParseError;

    /// Parses the line format. Walls outside of the declared size are skipped.
    fn from_str(text: &str) -> Result<GridConfig, MapParseError> {
        let mut size = None;
        let mut start = None;
        let mut end = None;
        let mut walls = Vec::new();
        for (line_ix, raw) in text.lines().enumerate() {
            let line = line_ix + 1;
            let content = raw.split('#').next().unwrap_or("").trim();
            let mut words = content.split_whitespace();
            let Some(keyword) = words.next() else {
                continue;
            };
            match keyword {
                "size" => {
                    let (w, h) = parse_point(words, line)?;
                    if w <= 0 || h <= 0 {
                        return Err(MapParseError::new(line, "size must be positive"));
                    }
                    let (Ok(w), Ok(h)) = (usize::try_from(w), usize::try_from(h)) else {
                        return Err(MapParseError::new(line, "size does not fit the grid"));
                    };
                    check_dimensions(w, h)
                        .map_err(|err| MapParseError::new(line, err.to_string()))?;
                    size = Some((w, h));
                }
                "start" => {
                    let pos = to_point(parse_point(words, line)?, line)?;
                    set_once(&mut start, pos, line, "start")?;
                }
                "end" => {
                    let pos = to_point(parse_point(words, line)?, line)?;
                    set_once(&mut end, pos, line, "end")?;
                }
                "wall" => walls.push((to_point(parse_point(words, line)?, line)?, line)),
                other => {
                    return Err(MapParseError::new(
                        line,
                        format!("unknown keyword '{other}'"),
                    ))
                }
            }
        }
        let (width, height) = size.ok_or_else(|| MapParseError::new(0, "missing size"))?;
        let start = start.ok_or_else(|| MapParseError::new(0, "missing start"))?;
        let end = end.ok_or_else(|| MapParseError::new(0, "missing end"))?;
        let walls = walls
            .into_iter()
            .filter(|(p, line)| {
                let inside = p.x >= 0
                    && p.y >= 0
                    && (p.x as usize) < width
                    && (p.y as usize) < height;
                if !inside {
                    warn!("Skipping wall ({}, {}) on line {} outside of the map", p.x, p.y, line);
                }
                inside
            })
            .map(|(p, _)| p)
            .collect();
        Ok(GridConfig::from_walls(width, height, walls, start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parse_line_format() {
        let text = "
            # a small map
            size 5 4
            start 0 3
            end 4 0   # top right
            wall 2 0
            wall 2 1
            wall 9 9
        ";
        let config: GridConfig = text.parse().unwrap();
        assert_eq!((config.width, config.height), (5, 4));
        assert_eq!(config.start, Some(Point::new(0, 3)));
        assert_eq!(config.end, Some(Point::new(4, 0)));
        assert_eq!(
            config.source,
            MapSource::FromWalls(vec![Point::new(2, 0), Point::new(2, 1)])
        );
    }

    #[test]
    fn parse_errors_carry_line_numbers() {
        let err = "size 3 3\nstart 0 x\nend 2 2".parse::<GridConfig>().unwrap_err();
        assert_eq!(err.line, 2);
        let err = "size 3 3\nend 2 2".parse::<GridConfig>().unwrap_err();
        assert_eq!(err.line, 0);
        let err = "size 3 3\nportal 1 1".parse::<GridConfig>().unwrap_err();
        assert_eq!(err.line, 2);
        let err = "size 3 3\nstart 0 0\nstart 1 1".parse::<GridConfig>().unwrap_err();
        assert_eq!(err.line, 3);
        assert!("size 0 3\nstart 0 0\nend 0 1".parse::<GridConfig>().is_err());
        assert!("size 3 3 3".parse::<GridConfig>().is_err());
    }

    #[test]
    fn oversized_maps_are_rejected() {
        for text in [
            "size 9223372036854775807 2\nstart 0 0\nend 0 1",
            "size 4294967299 1\nstart 0 0\nend 2 0",
            "size 65536 65536\nstart 0 0\nend 0 1",
        ] {
            let err = text.parse::<GridConfig>().unwrap_err();
            assert_eq!(err.line, 1);
        }
        let mut rng = StdRng::seed_from_u64(0);
        let (start, end) = (Point::new(0, 0), Point::new(2, 0));
        let config = GridConfig::from_walls(4_294_967_299, 1, Vec::new(), start, end);
        assert!(matches!(
            crate::CellGrid::from_config(&config, &mut rng),
            Err(GridError::InvalidConfig { .. })
        ));
        assert!(GridConfig::auto(usize::MAX, 15).endpoints(&mut rng).is_err());
    }

    #[test]
    fn parse_ascii() {
        let config = GridConfig::from_ascii(
            "
            S.#.
            ..#E
            ",
        )
        .unwrap();
        assert_eq!((config.width, config.height), (4, 2));
        assert_eq!(config.start, Some(Point::new(0, 0)));
        assert_eq!(config.end, Some(Point::new(3, 1)));
        assert_eq!(
            config.source,
            MapSource::FromWalls(vec![Point::new(2, 0), Point::new(2, 1)])
        );
        assert!(GridConfig::from_ascii("S.\n.").is_err());
        assert!(GridConfig::from_ascii("S..").is_err());
        assert!(GridConfig::from_ascii("SSE").is_err());
        assert!(GridConfig::from_ascii("S?E").is_err());
    }

    #[test]
    fn random_endpoints_land_in_opposite_quadrants() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = GridConfig::auto(15, 15);
        for _ in 0..100 {
            let (start, end) = config.endpoints(&mut rng).unwrap();
            assert!(start.x < 7 && start.y > 7);
            assert!(end.x > 7 && end.y < 7);
        }
        assert!(GridConfig::auto(2, 9).endpoints(&mut rng).is_err());
    }
}
