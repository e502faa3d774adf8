//! Geometric utility objects.

use crate::{error::FieldError, field::ffl};
use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Denotes the x-, y- or z-dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Dim3 {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Dim3 {
    /// Creates an array for iterating over the x-, y- and z-dimensions.
    pub fn slice() -> [Self; 3] {
        [Self::X, Self::Y, Self::Z]
    }

    /// Returns the number of the dimension.
    pub fn num(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dim3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::X => "x",
                Self::Y => "y",
                Self::Z => "z",
            }
        )
    }
}

impl FromStr for Dim3 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            other => Err(format!("unknown dimension {}", other)),
        }
    }
}

use Dim3::{X, Y, Z};

/// A lab-frame observation point [m].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Point3([ffl; 3]);

impl Point3 {
    /// Creates a new point, verifying that all coordinates are finite.
    pub fn new(x: ffl, y: ffl, z: ffl) -> Result<Self, FieldError> {
        let point = Point3([x, y, z]);
        for dim in Dim3::slice() {
            if !point[dim].is_finite() {
                return Err(FieldError::InvalidParameter {
                    name: match dim {
                        X => "x",
                        Y => "y",
                        Z => "z",
                    },
                    value: point[dim],
                    reason: "coordinate must be finite",
                });
            }
        }
        Ok(point)
    }

    /// Creates a point at the origin.
    pub fn origin() -> Self {
        Point3([0.0; 3])
    }

    pub fn x(&self) -> ffl {
        self.0[0]
    }

    pub fn y(&self) -> ffl {
        self.0[1]
    }

    pub fn z(&self) -> ffl {
        self.0[2]
    }

    /// Returns a copy of the point with the coordinate along `dim` replaced.
    pub fn with_coord(&self, dim: Dim3, coord: ffl) -> Self {
        let mut point = *self;
        point[dim] = coord;
        point
    }
}

impl Index<Dim3> for Point3 {
    type Output = ffl;

    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim as usize]
    }
}

impl IndexMut<Dim3> for Point3 {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim as usize]
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:e}, {:e}, {:e})", self.x(), self.y(), self.z())
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn non_finite_coordinates_are_rejected() {
        assert!(Point3::new(0.0, ffl::INFINITY, 0.0).is_err());
        assert!(Point3::new(ffl::NAN, 0.0, 0.0).is_err());
        assert!(Point3::new(-1e3, 0.0, 1e-9).is_ok());
    }

    #[test]
    fn coordinate_replacement_works() {
        let point = Point3::new(1.0, 2.0, 3.0).unwrap();
        let moved = point.with_coord(Y, -5.0);
        assert_eq!(moved[X], 1.0);
        assert_eq!(moved[Y], -5.0);
        assert_eq!(moved[Z], 3.0);
    }

    #[test]
    fn dimensions_parse_from_strings() {
        assert_eq!("X".parse::<Dim3>().unwrap(), X);
        assert_eq!(" z ".parse::<Dim3>().unwrap(), Z);
        assert!("w".parse::<Dim3>().is_err());
    }
}
