/// Viewpoint and plane configuration file
///
/// Each line is `KEY x y z` with `KEY` one of `C`, `P1`, `P2`, `P3`.
/// Unknown keys, blank lines and `#` comments are ignored; a later line for
/// the same key overrides an earlier one.
use log::{info, warn};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1},
    character::complete::{satisfy, space0, space1},
    combinator::{eof, map, not, value},
    number::complete::double,
    sequence::{preceded, terminated, tuple},
    IResult,
};
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;

use crate::projection::{ProjectionError, ProjectionSystem};
use crate::vector::Vec3;

/// File name looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "config.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Viewpoint,
    P1,
    P2,
    P3,
}

impl ConfigKey {
    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::Viewpoint => "C",
            ConfigKey::P1 => "P1",
            ConfigKey::P2 => "P2",
            ConfigKey::P3 => "P3",
        }
    }
}

/// Viewpoint `c` and the three points of the target plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    pub c: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
    pub p3: Vec3,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            c: Vec3::new(0.0, 0.0, 5.0),
            p1: Vec3::new(-1.0, -1.0, 0.0),
            p2: Vec3::new(1.0, -1.0, 0.0),
            p3: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

impl ProjectionConfig {
    /// Parse config text, starting from the defaults for any key not given
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for (index, line) in text.lines().enumerate() {
            let content = line.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }
            match config_line(content) {
                Ok((_, Some((key, v)))) => config.set(key, v),
                Ok((_, None)) => {}
                Err(_) => {
                    return Err(ConfigError::Parse {
                        line: index + 1,
                        message: format!("expected `KEY x y z`, found {content:?}"),
                    })
                }
            }
        }
        Ok(config)
    }

    /// Read `path`. A missing file is not an error and yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::parse(&text)?;
                info!("loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("{} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`ProjectionConfig::load`], but any error is logged and replaced by the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("error loading config: {e}; using defaults");
            Self::default()
        })
    }

    pub fn set(&mut self, key: ConfigKey, v: Vec3) {
        match key {
            ConfigKey::Viewpoint => self.c = v,
            ConfigKey::P1 => self.p1 = v,
            ConfigKey::P2 => self.p2 = v,
            ConfigKey::P3 => self.p3 = v,
        }
    }

    /// Same configuration with the viewpoint moved by `delta`
    pub fn moved_by(&self, delta: Vec3) -> Self {
        Self {
            c: self.c + delta,
            ..*self
        }
    }

    /// Build the projection system this configuration describes
    pub fn system(&self) -> Result<ProjectionSystem, ProjectionError> {
        ProjectionSystem::new(self.c, self.p1, self.p2, self.p3)
    }

    /// Render in the same `KEY x y z` format [`ProjectionConfig::parse`] reads
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (key, v) in [
            (ConfigKey::Viewpoint, self.c),
            (ConfigKey::P1, self.p1),
            (ConfigKey::P2, self.p2),
            (ConfigKey::P3, self.p3),
        ] {
            writeln!(out, "{} {} {} {}", key.name(), v.x, v.y, v.z).ok();
        }
        out
    }
}

fn key(input: &str) -> IResult<&str, Option<ConfigKey>> {
    alt((
        map(
            terminated(
                alt((
                    value(ConfigKey::P1, tag("P1")),
                    value(ConfigKey::P2, tag("P2")),
                    value(ConfigKey::P3, tag("P3")),
                    value(ConfigKey::Viewpoint, tag("C")),
                )),
                not(satisfy(|c| !c.is_whitespace())),
            ),
            Some,
        ),
        value(None, take_till1(|c: char| c.is_whitespace())),
    ))(input)
}

fn coordinate(input: &str) -> IResult<&str, f64> {
    preceded(space1, double)(input)
}

fn config_line(input: &str) -> IResult<&str, Option<(ConfigKey, Vec3)>> {
    let (rest, key) = key(input)?;
    let Some(key) = key else {
        return Ok(("", None));
    };
    let (rest, (x, y, z)) = terminated(
        tuple((coordinate, coordinate, coordinate)),
        preceded(space0, eof),
    )(rest)?;
    Ok((rest, Some((key, Vec3::new(x, y, z)))))
}
