pub mod consts;
pub mod error;

pub mod point;
pub mod ray;
pub mod boundary;

pub mod portal;
pub mod cone;
pub mod registry;
pub mod world;

pub mod color;
pub mod pattern;
pub mod canvas;
pub mod sink;

pub mod scene;

use crate::consts::FEQ_EPSILON;

pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
