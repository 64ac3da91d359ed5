//! Hand-rolled OBJ subset parser: `v`/`vn`/`f` lines into a [`Mesh`].
//!
//! Only the subset this crate's pipeline needs is handled: positions,
//! normals, and faces with slash-separated `v/vt/vn` triples (texture
//! coordinates are parsed and discarded). Everything else is ignored.

use std::fs;
use std::path::Path;

use log::{info, warn};
use thiserror::Error;

use crate::color::Color;
use crate::math::Vec3;
use crate::mesh::Mesh;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} declared no vertex positions")]
    NoVertices { path: String },
    #[error("{path} has a zero-radius bounding sphere and cannot be rescaled")]
    ZeroRadius { path: String },
}

struct FaceCorner {
    position: u32,
    normal: Option<u32>,
}

/// Loads `path` as an OBJ file, returning a unit-bounding-radius mesh
/// with a single default vertex color. See module docs for the
/// supported subset.
pub fn load(path: impl AsRef<Path>) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let path_display = path.display().to_string();

    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path_display.clone(),
        source,
    })?;

    let mut positions = Vec::new();
    let mut file_normals = Vec::new();
    let mut faces: Vec<Vec<FaceCorner>> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("v") => match parse_vec3(fields) {
                Some(v) => positions.push(v),
                None => warn!("{}:{}: malformed `v` line, skipped", path_display, line_no + 1),
            },
            Some("vn") => match parse_vec3(fields) {
                Some(v) => file_normals.push(v),
                None => warn!("{}:{}: malformed `vn` line, skipped", path_display, line_no + 1),
            },
            Some("f") => match parse_face(fields) {
                Some(corners) => {
                    if corners.len() > 4 {
                        warn!(
                            "{}:{}: face has {} vertices, fan-triangulating as convex",
                            path_display,
                            line_no + 1,
                            corners.len()
                        );
                    }
                    faces.push(corners);
                }
                None => warn!("{}:{}: malformed `f` line, skipped", path_display, line_no + 1),
            },
            _ => {}
        }
    }

    if positions.is_empty() {
        return Err(LoadError::NoVertices {
            path: path_display,
        });
    }

    let synthesize_normals = file_normals.is_empty();
    let mut accumulated_normals = vec![Vec3::ZERO; positions.len()];
    let normals_len = if synthesize_normals {
        positions.len()
    } else {
        file_normals.len()
    };

    let mut position_index = Vec::new();
    let mut normal_index = Vec::new();

    for corners in &faces {
        let valid: Vec<&FaceCorner> = corners
            .iter()
            .filter(|c| (c.position as usize) < positions.len())
            .collect();
        if valid.len() < 3 {
            continue;
        }

        if synthesize_normals {
            let p0 = positions[valid[0].position as usize];
            let p1 = positions[valid[1].position as usize];
            let p2 = positions[valid[2].position as usize];
            let face_normal = (p1 - p0).cross(p2 - p0);
            for corner in &valid {
                accumulated_normals[corner.position as usize] =
                    accumulated_normals[corner.position as usize] + face_normal;
            }
        }

        for i in 1..valid.len() - 1 {
            for corner in [valid[0], &valid[i], &valid[i + 1]] {
                position_index.push(corner.position);
                let normal = corner
                    .normal
                    .filter(|&n| (n as usize) < normals_len)
                    .unwrap_or(corner.position);
                normal_index.push(normal);
            }
        }
    }

    let normals = if synthesize_normals {
        accumulated_normals
            .into_iter()
            .map(|n| if n.length() > 0.0 { n.normalize() } else { Vec3::UP })
            .collect()
    } else {
        file_normals
    };

    let centroid = positions.iter().fold(Vec3::ZERO, |acc, &p| acc + p) / positions.len() as f32;
    let radius = positions
        .iter()
        .map(|&p| p.distance(centroid))
        .fold(0.0f32, f32::max);

    if radius <= 0.0 {
        return Err(LoadError::ZeroRadius {
            path: path_display,
        });
    }

    let positions: Vec<Vec3> = positions.iter().map(|&p| p / radius).collect();
    let colors = vec![Color::DEFAULT; positions.len()];

    info!(
        "loaded {}: {} positions, {} normals, {} triangles",
        path_display,
        positions.len(),
        normals.len(),
        position_index.len() / 3
    );

    Ok(Mesh::new(positions, normals, colors, position_index, normal_index))
}

fn parse_vec3<'a>(mut fields: impl Iterator<Item = &'a str>) -> Option<Vec3> {
    let x: f32 = fields.next()?.parse().ok()?;
    let y: f32 = fields.next()?.parse().ok()?;
    let z: f32 = fields.next()?.parse().ok()?;
    Some(Vec3::new(x, y, z))
}

fn parse_face<'a>(fields: impl Iterator<Item = &'a str>) -> Option<Vec<FaceCorner>> {
    let mut corners = Vec::new();
    for token in fields {
        let mut parts = token.split('/');
        let position: i64 = parts.next()?.parse().ok()?;
        let _texcoord = parts.next();
        // The third slash field, if present and non-empty, is the
        // normal index; absent or empty means "default to position".
        let normal = match parts.next() {
            Some("") | None => None,
            Some(vn) => Some(vn.parse::<i64>().ok()? - 1),
        };
        corners.push(FaceCorner {
            position: (position - 1) as u32,
            normal: normal.map(|n| n as u32),
        });
    }
    if corners.len() < 3 {
        None
    } else {
        Some(corners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn write_temp(contents: &str) -> std::path::PathBuf {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let id = COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = std::env::temp_dir();
        path.push(format!("rasterkit-test-{}-{}.obj", std::process::id(), id));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn triangle_file_round_trips_to_one_triangle() {
        let path = write_temp("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mesh = load(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        fs::remove_file(path).ok();
    }

    #[test]
    fn quad_face_splits_into_two_triangles() {
        let path = write_temp("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n");
        let mesh = load(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        fs::remove_file(path).ok();
    }

    #[test]
    fn absent_normal_index_defaults_to_position_index() {
        let path = write_temp("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nvn 0 0 1\nvn 0 0 1\nf 1 2 3\n");
        let mesh = load(&path).unwrap();
        assert_eq!(mesh.normal_index(), mesh.position_index());
        fs::remove_file(path).ok();
    }

    #[test]
    fn out_of_range_normal_index_falls_back_to_position_index_instead_of_panicking() {
        let path = write_temp("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nvn 0 0 1\nvn 0 0 1\nf 1/1/99 2 3\n");
        let mesh = load(&path).unwrap();
        assert_eq!(mesh.normal_index()[0], mesh.position_index()[0]);
        for &i in mesh.normal_index() {
            assert!((i as usize) < mesh.normals().len());
        }
        fs::remove_file(path).ok();
    }

    #[test]
    fn missing_normals_are_synthesized_as_unit_length() {
        let path = write_temp("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mesh = load(&path).unwrap();
        for &n in mesh.normals() {
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-5);
        }
        fs::remove_file(path).ok();
    }

    #[test]
    fn malformed_vertex_line_is_skipped_not_fatal() {
        let path = write_temp("v 0 0 0\nv oops\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mesh = load(&path).unwrap();
        assert_eq!(mesh.positions().len(), 3);
        fs::remove_file(path).ok();
    }

    #[test]
    fn empty_file_yields_load_error() {
        let path = write_temp("");
        assert!(load(&path).is_err());
        fs::remove_file(path).ok();
    }

    #[test]
    fn positions_are_rescaled_to_unit_bounding_radius() {
        let path = write_temp("v 0 0 0\nv 2 0 0\nv 0 2 0\nf 1 2 3\n");
        let mesh = load(&path).unwrap();
        let (centroid, radius) = mesh.bounding_sphere();
        assert_relative_eq!(radius, 1.0, epsilon = 1e-4);
        let _ = centroid;
    }
}
