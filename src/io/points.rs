//! Plain-text point files: one point per line.
//!
//! Coordinates are separated by whitespace or by punctuation such as `,`
//! `;` `:` `|`. Parsing a line stops at the first token that is not a
//! number, and a line with no leading numbers is skipped, so header and
//! comment lines fall out naturally.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::cloud::PointCloud;
use crate::error::{CloudError, Result};

fn is_separator(c: char) -> bool {
    c.is_whitespace() || (c.is_ascii_punctuation() && !matches!(c, '.' | '-' | '+'))
}

/// Leading numeric tokens of a line
pub(crate) fn parse_line(line: &str) -> Vec<f64> {
    line.split(is_separator)
        .filter(|t| !t.is_empty())
        .map_while(|t| t.parse::<f64>().ok())
        .collect()
}

/// Load a point cloud from a file
pub fn load_points(path: impl AsRef<Path>) -> Result<PointCloud> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CloudError::io(path, e))?;
    let cloud = parse_points(BufReader::new(file), path)?;
    debug!(path = ?path, points = cloud.len(), "loaded point file");
    Ok(cloud)
}

/// Read a point cloud from any buffered reader
pub fn read_points<R: BufRead>(reader: R) -> Result<PointCloud> {
    parse_points(reader, Path::new("<reader>"))
}

fn parse_points<R: BufRead>(reader: R, path: &Path) -> Result<PointCloud> {
    let mut cloud = PointCloud::new();

    // Non-UTF-8 lines decode lossily and are skipped as non-numeric
    for (line_num, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes.map_err(|e| CloudError::io(path, e))?;
        let line = String::from_utf8_lossy(&bytes);
        if line.trim().is_empty() {
            continue;
        }

        let point = parse_line(&line);
        if point.is_empty() {
            warn!("Skipping non-numeric line {} in {:?}", line_num + 1, path);
            continue;
        }

        if let Err(err) = cloud.add_point(&point) {
            warn!("Line {} in {:?}: {}", line_num + 1, path, err);
            return Err(err);
        }
    }

    Ok(cloud)
}
