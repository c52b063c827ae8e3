// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owner-supplied point records and their validation.

use core::fmt;

use hashbrown::HashSet;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use stipple_geometry::Dot;

/// Stable identity of a point: an integer or a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    /// Integer identity.
    Int(i64),
    /// String identity.
    Str(String),
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

impl From<i64> for PointId {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for PointId {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for PointId {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// A point as supplied by the owner, before validation.
///
/// Coordinates are optional so that malformed records deserialize and can be
/// reported individually instead of failing a whole batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointInput {
    /// Identity, unique within a batch.
    pub id: PointId,
    /// Data x.
    #[serde(default)]
    pub x: Option<f64>,
    /// Data y.
    #[serde(default)]
    pub y: Option<f64>,
    /// Radius in data units. Falls back to the scene's default radius.
    #[serde(default)]
    pub radius: Option<f64>,
    /// Fill color, passed through to renderers untouched.
    #[serde(default)]
    pub color: Option<String>,
}

impl PointInput {
    /// A record at `(x, y)` with default radius and no color.
    pub fn new(id: impl Into<PointId>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x: Some(x),
            y: Some(y),
            radius: None,
            color: None,
        }
    }

    /// Sets the radius.
    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Sets the color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Which coordinate a validation error is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// The x coordinate.
    X,
    /// The y coordinate.
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
        })
    }
}

/// Why a point record was dropped.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A required coordinate is absent.
    #[error("point {id} has no {axis} coordinate")]
    MissingCoordinate {
        /// Offending record.
        id: PointId,
        /// Missing coordinate.
        axis: Axis,
    },
    /// A coordinate is NaN or infinite.
    #[error("point {id} has a non-finite {axis} coordinate ({value})")]
    NonFiniteCoordinate {
        /// Offending record.
        id: PointId,
        /// Bad coordinate.
        axis: Axis,
        /// Supplied value.
        value: f64,
    },
    /// The radius is negative or not finite.
    #[error("point {id} has an invalid radius ({radius})")]
    InvalidRadius {
        /// Offending record.
        id: PointId,
        /// Supplied radius.
        radius: f64,
    },
    /// The id was already used earlier in the batch.
    #[error("point {id} repeats an earlier id")]
    DuplicateId {
        /// Repeated id.
        id: PointId,
    },
}

/// A validated point.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenePoint {
    /// Identity.
    pub id: PointId,
    /// Data position as supplied (before decollision).
    pub data: Point,
    /// Radius in data units.
    pub radius: f64,
    /// Fill color, if supplied.
    pub color: Option<String>,
}

impl Dot for ScenePoint {
    type Id = PointId;

    fn id(&self) -> &PointId {
        &self.id
    }

    fn center(&self) -> Point {
        self.data
    }
}

/// Validates a batch, keeping input order.
///
/// Every rejected record is logged at `warn` and reported; the rest of the
/// batch is unaffected. The first occurrence of a repeated id wins.
pub fn validate_points<I>(inputs: I, default_radius: f64) -> (Vec<ScenePoint>, Vec<ValidationError>)
where
    I: IntoIterator<Item = PointInput>,
{
    let mut seen = HashSet::new();
    let mut points = Vec::new();
    let mut errors = Vec::new();
    for input in inputs {
        match validate_one(input, default_radius, &mut seen) {
            Ok(point) => points.push(point),
            Err(error) => {
                tracing::warn!(%error, "point dropped");
                errors.push(error);
            }
        }
    }
    (points, errors)
}

fn validate_one(
    input: PointInput,
    default_radius: f64,
    seen: &mut HashSet<PointId>,
) -> Result<ScenePoint, ValidationError> {
    let PointInput {
        id,
        x,
        y,
        radius,
        color,
    } = input;
    let x = coordinate(&id, Axis::X, x)?;
    let y = coordinate(&id, Axis::Y, y)?;
    let radius = radius.unwrap_or(default_radius);
    if !(radius.is_finite() && radius >= 0.0) {
        return Err(ValidationError::InvalidRadius { id, radius });
    }
    if !seen.insert(id.clone()) {
        return Err(ValidationError::DuplicateId { id });
    }
    Ok(ScenePoint {
        id,
        data: Point::new(x, y),
        radius,
        color,
    })
}

fn coordinate(id: &PointId, axis: Axis, value: Option<f64>) -> Result<f64, ValidationError> {
    match value {
        None => Err(ValidationError::MissingCoordinate {
            id: id.clone(),
            axis,
        }),
        Some(v) if !v.is_finite() => Err(ValidationError::NonFiniteCoordinate {
            id: id.clone(),
            axis,
            value: v,
        }),
        Some(v) => Ok(v),
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::{Axis, PointId, PointInput, ValidationError, validate_points};

    #[test]
    fn valid_points_pass_in_order() {
        let (points, errors) = validate_points(
            [
                PointInput::new(2_i64, 1.0, 2.0).with_radius(4.0),
                PointInput::new("a", -1.0, 0.5).with_color("#f00"),
            ],
            3.0,
        );
        assert!(errors.is_empty());
        assert_eq!(points[0].id, PointId::Int(2));
        assert_eq!(points[0].radius, 4.0);
        assert_eq!(points[1].data, Point::new(-1.0, 0.5));
        assert_eq!(points[1].radius, 3.0);
        assert_eq!(points[1].color.as_deref(), Some("#f00"));
    }

    #[test]
    fn bad_records_are_dropped_individually() {
        let mut missing = PointInput::new(1_i64, 0.0, 0.0);
        missing.y = None;
        let (points, errors) = validate_points(
            [
                missing,
                PointInput::new(2_i64, f64::NAN, 0.0),
                PointInput::new(3_i64, 0.0, 0.0).with_radius(-1.0),
                PointInput::new(4_i64, 0.0, 0.0),
                PointInput::new(4_i64, 9.0, 9.0),
            ],
            3.0,
        );
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].data, Point::ZERO);
        assert_eq!(
            errors[0],
            ValidationError::MissingCoordinate {
                id: PointId::Int(1),
                axis: Axis::Y
            }
        );
        assert!(matches!(errors[1], ValidationError::NonFiniteCoordinate { axis: Axis::X, .. }));
        assert!(matches!(errors[2], ValidationError::InvalidRadius { .. }));
        assert_eq!(errors[3], ValidationError::DuplicateId { id: PointId::Int(4) });
    }

    #[test]
    fn error_messages_name_the_point() {
        let error = ValidationError::MissingCoordinate {
            id: PointId::from("north"),
            axis: Axis::X,
        };
        assert_eq!(error.to_string(), "point north has no x coordinate");
    }

    proptest::proptest! {
        #[test]
        fn every_record_is_kept_or_reported(
            records in proptest::collection::vec(
                (
                    0_i64..16,
                    proptest::option::of(-1.0e3..1.0e3_f64),
                    proptest::option::of(-1.0e3..1.0e3_f64),
                ),
                0..48,
            )
        ) {
            let inputs = records.iter().map(|&(id, x, y)| PointInput {
                id: PointId::Int(id),
                x,
                y,
                radius: None,
                color: None,
            });
            let (points, errors) = validate_points(inputs, 2.0);
            proptest::prop_assert_eq!(points.len() + errors.len(), records.len());
            let mut ids: Vec<_> = points.iter().map(|p| p.id.clone()).collect();
            ids.sort();
            ids.dedup();
            proptest::prop_assert_eq!(ids.len(), points.len());
            proptest::prop_assert!(points.iter().all(|p| p.data.is_finite()));
        }
    }
}
