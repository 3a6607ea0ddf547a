//! Plain-text point sequences: one point per line, three whitespace
//! separated floats, no header. Line order is playback order.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use glam::Vec3;

use crate::{Result, TrackError};

pub fn write_points<W: Write>(mut writer: W, points: &[Vec3]) -> Result<()> {
    for p in points {
        writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parses a point sequence. Blank lines are skipped; anything else must be
/// exactly three floats.
pub fn read_points<R: BufRead>(reader: R) -> Result<Vec<Vec3>> {
    let mut points = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = number + 1;
        if line.trim().is_empty() {
            continue;
        }

        let mut coords = [0.0f32; 3];
        let mut fields = line.split_whitespace();
        for (axis, slot) in coords.iter_mut().enumerate() {
            let field = fields.next().ok_or_else(|| TrackError::Parse {
                line: line_no,
                message: format!("expected 3 values, found {axis}"),
            })?;
            *slot = field.parse().map_err(|err| TrackError::Parse {
                line: line_no,
                message: format!("`{field}`: {err}"),
            })?;
        }
        if let Some(extra) = fields.next() {
            return Err(TrackError::Parse {
                line: line_no,
                message: format!("unexpected trailing value `{extra}`"),
            });
        }
        points.push(Vec3::from_array(coords));
    }
    Ok(points)
}

pub fn save_points(path: impl AsRef<Path>, points: &[Vec3]) -> Result<()> {
    let path = path.as_ref();
    write_points(BufWriter::new(File::create(path)?), points)?;
    tracing::debug!(?path, points = points.len(), "saved point sequence");
    Ok(())
}

pub fn load_points(path: impl AsRef<Path>) -> Result<Vec<Vec3>> {
    let path = path.as_ref();
    let points = read_points(BufReader::new(File::open(path)?))?;
    tracing::debug!(?path, points = points.len(), "loaded point sequence");
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_line_per_point() {
        let mut out = Vec::new();
        write_points(&mut out, &[Vec3::new(1.0, 2.5, -3.0), Vec3::ZERO]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1 2.5 -3\n0 0 0\n");
    }

    #[test]
    fn reads_whitespace_separated_values() {
        let text = "0.5 1 2\n\n  -1\t0.25   3e2 \n";
        let points = read_points(text.as_bytes()).unwrap();
        assert_eq!(
            points,
            vec![Vec3::new(0.5, 1.0, 2.0), Vec3::new(-1.0, 0.25, 300.0)]
        );
    }

    #[test]
    fn written_points_read_back_exactly() {
        let points = vec![Vec3::new(0.1, 1.0 / 3.0, 7.25), Vec3::new(-2.0, 1e-7, 4.5)];
        let mut out = Vec::new();
        write_points(&mut out, &points).unwrap();
        assert_eq!(read_points(out.as_slice()).unwrap(), points);
    }

    #[test]
    fn short_line_reports_its_number() {
        let err = read_points("1 2 3\n4 5\n".as_bytes()).unwrap_err();
        match err {
            TrackError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("found 2"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn garbage_and_trailing_values_are_rejected() {
        assert!(matches!(
            read_points("1 x 3\n".as_bytes()),
            Err(TrackError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            read_points("1 2 3 4\n".as_bytes()),
            Err(TrackError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_points("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, TrackError::Io(_)));
    }
}
