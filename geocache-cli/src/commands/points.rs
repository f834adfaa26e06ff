//! Plain-text points file used as a query backing store.
//!
//! One point per line as `id,lat,lon[,label]`. Blank lines and lines
//! starting with `#` are skipped. Whitespace around fields is ignored.

use std::fs;
use std::path::Path;

use geocache::coord::{BoundingBox, LatLon};
use geocache::spatial::{FetchError, Fetcher};

use super::tile::validate_position;
use crate::error::CliError;

/// A labelled point of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub id: u64,
    pub position: LatLon,
    pub label: Option<String>,
}

/// In-memory backing store answering fetches by linear scan.
#[derive(Debug, Default)]
pub struct PointStore {
    points: Vec<Point>,
}

impl PointStore {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Read and parse a points file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = fs::read_to_string(path).map_err(|error| CliError::DataRead {
            path: path.to_path_buf(),
            error,
        })?;

        let points = parse_points(&content).map_err(|(line, reason)| CliError::DataParse {
            path: path.to_path_buf(),
            line,
            reason,
        })?;

        let store = Self::new(points);
        tracing::info!(path = %path.display(), points = store.len(), "Loaded points");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

impl Fetcher<Point> for PointStore {
    fn fetch(&self, bbox: &BoundingBox) -> Result<Vec<Point>, FetchError> {
        let found: Vec<Point> = self
            .points
            .iter()
            .filter(|p| bbox.contains(p.position))
            .cloned()
            .collect();
        tracing::debug!(%bbox, found = found.len(), "Backing store scan");
        Ok(found)
    }
}

/// Parse points file content.
///
/// On failure returns the 1-based line number and the reason.
pub fn parse_points(content: &str) -> Result<Vec<Point>, (usize, String)> {
    let mut points = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let point = parse_line(line).map_err(|reason| (idx + 1, reason))?;
        points.push(point);
    }

    Ok(points)
}

fn parse_line(line: &str) -> Result<Point, String> {
    let mut fields = line.splitn(4, ',').map(str::trim);

    let id = fields
        .next()
        .unwrap_or_default()
        .parse::<u64>()
        .map_err(|e| format!("invalid id: {}", e))?;
    let lat = parse_coord(fields.next(), "latitude")?;
    let lon = parse_coord(fields.next(), "longitude")?;
    validate_position(lat, lon).map_err(|e| e.to_string())?;

    let label = fields
        .next()
        .filter(|label| !label.is_empty())
        .map(str::to_string);

    Ok(Point {
        id,
        position: LatLon::new(lat, lon),
        label,
    })
}

fn parse_coord(field: Option<&str>, name: &str) -> Result<f64, String> {
    let field = field.ok_or_else(|| format!("missing {}", name))?;
    field
        .parse::<f64>()
        .map_err(|e| format!("invalid {} '{}': {}", name, field, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_points() {
        let content = "\
# id,lat,lon,label
1, 52.5200, 13.4050, Berlin

2,48.8566,2.3522
3,51.5074,-0.1278,London, UK
";
        let points = parse_points(content).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].label.as_deref(), Some("Berlin"));
        assert_eq!(points[1].label, None);
        assert_eq!(points[1].position, LatLon::new(48.8566, 2.3522));
        assert_eq!(points[2].label.as_deref(), Some("London, UK"));
    }

    #[test]
    fn test_parse_reports_line_number() {
        let content = "1,0,0\n# comment\n2,abc,0\n";
        let (line, reason) = parse_points(content).unwrap_err();

        assert_eq!(line, 3);
        assert!(reason.contains("latitude"));
    }

    #[test]
    fn test_parse_rejects_missing_longitude() {
        let (line, reason) = parse_points("7,1.0").unwrap_err();
        assert_eq!(line, 1);
        assert_eq!(reason, "missing longitude");
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(parse_points("1,91.0,0").is_err());
        assert!(parse_points("1,0,181").is_err());
    }

    #[test]
    fn test_store_fetch_filters_by_bbox() {
        let store = PointStore::new(parse_points("1,0.5,0.5\n2,5.0,5.0\n").unwrap());

        let found = store.fetch(&BoundingBox::new(0.0, 0.0, 1.0, 1.0)).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
        assert_eq!(store.len(), 2);
    }
}
