//! CSV export: an `x0,x1,...,x{d-1}` header, then one row per point.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::cloud::PointCloud;
use crate::error::{CloudError, Result};

/// Write `cloud` as CSV to a file
pub fn export_csv(cloud: &PointCloud, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| CloudError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_rows(cloud, &mut writer).map_err(|e| match e {
        WriteError::Cloud(err) => err,
        WriteError::Io(err) => CloudError::io(path, err),
    })?;
    writer.flush().map_err(|e| CloudError::io(path, e))?;
    debug!(path = ?path, points = cloud.len(), "exported csv");
    Ok(())
}

/// Write `cloud` as CSV to any writer
pub fn write_csv<W: Write>(cloud: &PointCloud, writer: &mut W) -> Result<()> {
    write_rows(cloud, writer).map_err(|e| match e {
        WriteError::Cloud(err) => err,
        WriteError::Io(err) => CloudError::io("<writer>", err),
    })
}

enum WriteError {
    Cloud(CloudError),
    Io(std::io::Error),
}

impl From<std::io::Error> for WriteError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

fn write_rows<W: Write>(cloud: &PointCloud, writer: &mut W) -> std::result::Result<(), WriteError> {
    let dim = cloud.dimension().map_err(WriteError::Cloud)?;

    let header: Vec<String> = (0..dim).map(|k| format!("x{k}")).collect();
    writeln!(writer, "{}", header.join(","))?;

    for point in cloud.iter() {
        let row: Vec<String> = point.iter().map(|v| v.to_string()).collect();
        writeln!(writer, "{}", row.join(","))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_points;
    use std::io::Cursor;

    #[test]
    fn test_csv_layout() {
        let cloud =
            PointCloud::from_rows(vec![vec![0.0, 0.5, -1.0], vec![2.25, 3.0, 1e-7]]).unwrap();
        let mut out = Vec::new();
        write_csv(&cloud, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "x0,x1,x2");
        assert_eq!(lines[1], "0,0.5,-1");
        assert_eq!(lines.len(), 3);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_round_trip_through_reader() {
        let cloud = PointCloud::from_rows(vec![
            vec![0.1, 0.2],
            vec![1.0 / 3.0, -7.25],
            vec![1e10, 2.5e-8],
        ])
        .unwrap();
        let mut out = Vec::new();
        write_csv(&cloud, &mut out).unwrap();

        let back = read_points(Cursor::new(out)).unwrap();
        assert_eq!(back.points(), cloud.points());
    }

    #[test]
    fn test_empty_cloud_has_no_dimension() {
        let mut out = Vec::new();
        assert!(matches!(
            write_csv(&PointCloud::new(), &mut out),
            Err(CloudError::EmptyInput(_))
        ));
    }
}
