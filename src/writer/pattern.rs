//! Shading patterns (PatternType 2) for PDF generation.
//!
//! Only axial (ShadingType 2) shadings in DeviceRGB with a single
//! exponential-interpolation function are supported.
//!
//! # Example
//!
//! ```
//! use pdf_compose::writer::{to_dictionary_syntax, AxialShadingPattern};
//!
//! let pattern = AxialShadingPattern::new()
//!     .coords(0.0, 0.0, 100.0, 0.0)
//!     .colors([1.0, 1.0, 1.0], [0.0, 0.0, 0.0])
//!     .build();
//! assert!(to_dictionary_syntax(&pattern).unwrap().starts_with("<</Type /Pattern"));
//! ```

use crate::object::Object;

/// Builder for an axial shading pattern.
///
/// The default is a red-to-blue gradient from (300, 300) to (500, 500),
/// extended at both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct AxialShadingPattern {
    /// Axis start and end `[x0 y0 x1 y1]`
    coords: [f64; 4],
    /// Function domain `[t0 t1]`
    domain: [f64; 2],
    /// Colour at t0
    c0: [f64; 3],
    /// Colour at t1
    c1: [f64; 3],
    /// Interpolation exponent
    exponent: f64,
    /// Extend before start / after end
    extend: [bool; 2],
}

impl Default for AxialShadingPattern {
    fn default() -> Self {
        Self {
            coords: [300.0, 300.0, 500.0, 500.0],
            domain: [0.0, 1.0],
            c0: [1.0, 0.0, 0.0],
            c1: [0.0, 0.0, 1.0],
            exponent: 1.0,
            extend: [true, true],
        }
    }
}

impl AxialShadingPattern {
    /// Create a builder with the default gradient.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shading axis.
    pub fn coords(mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        self.coords = [x0, y0, x1, y1];
        self
    }

    /// Set the function domain.
    pub fn domain(mut self, t0: f64, t1: f64) -> Self {
        self.domain = [t0, t1];
        self
    }

    /// Set the start and end colours (RGB, 0.0 to 1.0).
    pub fn colors(mut self, c0: [f64; 3], c1: [f64; 3]) -> Self {
        self.c0 = c0;
        self.c1 = c1;
        self
    }

    /// Set the interpolation exponent.
    pub fn exponent(mut self, n: f64) -> Self {
        self.exponent = n;
        self
    }

    /// Set whether the shading extends past its start and end.
    pub fn extend(mut self, start: bool, end: bool) -> Self {
        self.extend = [start, end];
        self
    }

    /// Build the pattern dictionary.
    pub fn build(&self) -> Object {
        let function = Object::dict([
            ("FunctionType", Object::Integer(2)),
            ("Domain", Object::reals(&self.domain)),
            ("C0", Object::reals(&self.c0)),
            ("C1", Object::reals(&self.c1)),
            ("N", Object::Real(self.exponent)),
        ]);
        let shading = Object::dict([
            ("ShadingType", Object::Integer(2)),
            ("ColorSpace", Object::name("DeviceRGB")),
            ("Coords", Object::reals(&self.coords)),
            ("Function", function),
            (
                "Extend",
                Object::Array(self.extend.iter().map(|&b| Object::Boolean(b)).collect()),
            ),
        ]);
        Object::dict([
            ("Type", Object::name("Pattern")),
            ("PatternType", Object::Integer(2)),
            ("Shading", shading),
        ])
    }
}

/// Resource name of a pattern.
pub fn pattern_name(id: u32) -> String {
    format!("P{}", id)
}
