//! Evaluation of field profiles along a coordinate axis.

use crate::{
    error::FieldError,
    field::{ffl, FieldComponent, FieldEvaluator, FieldResult},
    geometry::{Dim3, Point3},
    io::Verbosity,
    math::linspace,
};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// A set of evenly spaced observation points along one axis.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Sweep {
    /// Axis along which the coordinate is varied.
    pub axis: Dim3,
    /// First coordinate along the axis [m].
    pub start: ffl,
    /// Last coordinate along the axis [m].
    pub stop: ffl,
    /// Number of points, including both ends.
    pub n_points: usize,
    /// Point supplying the coordinates along the other two axes.
    pub fixed_point: Point3,
}

impl Sweep {
    /// Creates a new sweep.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::InvalidParameter` if an end coordinate is not finite
    /// or there are no points.
    pub fn new(
        axis: Dim3,
        start: ffl,
        stop: ffl,
        n_points: usize,
        fixed_point: Point3,
    ) -> Result<Self, FieldError> {
        for (name, value) in [("start", start), ("stop", stop)] {
            if !value.is_finite() {
                return Err(FieldError::InvalidParameter {
                    name,
                    value,
                    reason: "sweep end coordinate must be finite",
                });
            }
        }
        if n_points == 0 {
            return Err(FieldError::InvalidParameter {
                name: "n_points",
                value: 0.0,
                reason: "sweep must contain at least one point",
            });
        }
        Ok(Sweep {
            axis,
            start,
            stop,
            n_points,
            fixed_point,
        })
    }

    /// Returns the coordinates along the sweep axis.
    pub fn coordinates(&self) -> Vec<ffl> {
        linspace(self.start, self.stop, self.n_points)
    }

    /// Returns the observation points of the sweep.
    pub fn points(&self) -> Vec<Point3> {
        self.coordinates()
            .into_iter()
            .map(|coord| self.fixed_point.with_coord(self.axis, coord))
            .collect()
    }
}

/// A field quantity evaluated at one point of a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SweepSample {
    /// Coordinate along the sweep axis [m].
    pub coordinate: ffl,
    pub result: FieldResult,
}

/// Evaluates the component at every point of the sweep, one point at a time.
///
/// Stops at the first point where evaluation fails.
pub fn evaluate_sweep(
    evaluator: &FieldEvaluator,
    component: FieldComponent,
    sweep: &Sweep,
) -> Result<Vec<SweepSample>, FieldError> {
    sweep
        .points()
        .iter()
        .map(|point| evaluate_sample(evaluator, component, sweep.axis, point))
        .collect()
}

/// Evaluates the component at every point of the sweep in parallel.
///
/// The samples are returned in the same order as the sweep points.
pub fn evaluate_sweep_parallel(
    evaluator: &FieldEvaluator,
    component: FieldComponent,
    sweep: &Sweep,
    verbosity: &Verbosity,
) -> Result<Vec<SweepSample>, FieldError> {
    let points = sweep.points();
    let n_points = points.len();
    points
        .par_iter()
        .progress_with(verbosity.create_progress_bar(n_points))
        .map(|point| evaluate_sample(evaluator, component, sweep.axis, point))
        .collect()
}

fn evaluate_sample(
    evaluator: &FieldEvaluator,
    component: FieldComponent,
    axis: Dim3,
    point: &Point3,
) -> Result<SweepSample, FieldError> {
    Ok(SweepSample {
        coordinate: point[axis],
        result: evaluator.evaluate_at(component, point)?,
    })
}
