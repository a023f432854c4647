/// Wireframe model file parser
///
/// The format is a vertex count, one `x y z` line per vertex, a face count,
/// then one `k i0 i1 ... i(k-1)` line per face. Blank lines are ignored.
use log::debug;
use nom::{
    character::complete::{digit1, satisfy, space0},
    combinator::{map_res, not},
    multi::length_count,
    number::complete::double,
    sequence::{preceded, terminated, tuple},
    IResult,
};
use std::path::Path;
use thiserror::Error;

use crate::vector::Vec3;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("unexpected end of file, expected {expected}")]
    UnexpectedEof { expected: String },
    #[error("face {face} references vertex {index}, but the model has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),
}

/// A closed polygon given as a cycle of vertex indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub indices: Vec<usize>,
}

impl Face {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    /// Edges `(i0, i1), (i1, i2), ..., (ik-1, i0)`; always one per index
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let k = self.indices.len();
        (0..k).map(move |i| (self.indices[i], self.indices[(i + 1) % k]))
    }
}

/// Vertices plus faces referencing them by position
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WireframeModel {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl WireframeModel {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Result<Self, ModelError> {
        let model = Self { vertices, faces };
        model.validate()?;
        Ok(model)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let model = Self::parse(&text)?;
        debug!(
            "loaded {} with {} vertices and {} faces",
            path.as_ref().display(),
            model.vertices.len(),
            model.faces.len()
        );
        Ok(model)
    }

    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let mut lines = ContentLines::new(text);

        let vertex_count = lines.parse_next("vertex count", count_line)?;
        let mut vertices = Vec::new();
        for i in 0..vertex_count {
            let (x, y, z) = lines.parse_next(&format!("vertex {i}"), vertex_line)?;
            vertices.push(Vec3::new(x, y, z));
        }

        let face_count = lines.parse_next("face count", count_line)?;
        let mut faces = Vec::new();
        for i in 0..face_count {
            let indices = lines.parse_next(&format!("face {i}"), face_line)?;
            faces.push(Face::new(indices));
        }

        Self::new(vertices, faces)
    }

    fn validate(&self) -> Result<(), ModelError> {
        let vertex_count = self.vertices.len();
        for (face, f) in self.faces.iter().enumerate() {
            if let Some(&index) = f.indices.iter().find(|&&i| i >= vertex_count) {
                return Err(ModelError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Axis-aligned cube centered on the origin, with its six square faces
    pub fn cube(size: f64) -> Self {
        let half = size / 2.0;
        let vertices = vec![
            Vec3::new(-half, -half, -half),
            Vec3::new(half, -half, -half),
            Vec3::new(half, half, -half),
            Vec3::new(-half, half, -half),
            Vec3::new(-half, -half, half),
            Vec3::new(half, -half, half),
            Vec3::new(half, half, half),
            Vec3::new(-half, half, half),
        ];
        let faces = [
            [0, 1, 2, 3], // back
            [4, 5, 6, 7], // front
            [0, 1, 5, 4], // bottom
            [3, 2, 6, 7], // top
            [1, 2, 6, 5], // right
            [0, 3, 7, 4], // left
        ]
        .into_iter()
        .map(|f| Face::new(f.to_vec()))
        .collect();

        Self { vertices, faces }
    }

    /// Total number of edges drawn across all faces
    pub fn edge_count(&self) -> usize {
        self.faces.iter().map(|f| f.indices.len()).sum()
    }
}

/// Non-blank lines, remembering their 1-based line numbers
struct ContentLines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> ContentLines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
        }
    }

    fn parse_next<T>(
        &mut self,
        expected: &str,
        parser: fn(&str) -> IResult<&str, T>,
    ) -> Result<T, ModelError> {
        let (index, line) = self
            .inner
            .by_ref()
            .find(|(_, l)| !l.trim().is_empty())
            .ok_or_else(|| ModelError::UnexpectedEof {
                expected: expected.to_string(),
            })?;
        match parser(line) {
            Ok((_, value)) => Ok(value),
            Err(_) => Err(ModelError::Parse {
                line: index + 1,
                message: format!("expected {expected}, found {:?}", line.trim()),
            }),
        }
    }
}

/// Succeeds only at a token boundary (whitespace or end of input)
fn token_end(input: &str) -> IResult<&str, ()> {
    not(satisfy(|c| !c.is_whitespace()))(input)
}

fn real(input: &str) -> IResult<&str, f64> {
    preceded(space0, terminated(double, token_end))(input)
}

fn index(input: &str) -> IResult<&str, usize> {
    preceded(
        space0,
        terminated(map_res(digit1, |s: &str| s.parse::<usize>()), token_end),
    )(input)
}

fn count_line(input: &str) -> IResult<&str, usize> {
    index(input)
}

fn vertex_line(input: &str) -> IResult<&str, (f64, f64, f64)> {
    tuple((real, real, real))(input)
}

fn face_line(input: &str) -> IResult<&str, Vec<usize>> {
    length_count(index, index)(input)
}
