//! # Spice Elements
//!
//! SPICE netlist line synthesis for behavioral, independent and dependent
//! circuit elements.
//!
//! This library provides:
//! - Behavioral voltage and current sources (`B` elements) whose output is an
//!   arbitrary expression
//! - Behavioral resistors, capacitors and inductors
//! - Independent `V`/`I` sources with DC, AC, distortion and transient
//!   waveform stimuli (`PULSE`, `SIN`, `EXP`, `PWL`, `SFFM`, `AM`,
//!   `TRNOISE`, `TRRANDOM`)
//! - Linear dependent sources (`E`, `F`, `G`, `H`) and their `POLY` form
//! - Canonical formatting of magnitudes with metric suffixes
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`elements`] - Netlist elements and the shared nodal element base
//! - [`units`] - Magnitude parsing and formatting (`4.7k`, `1Meg`, `25mil`)
//! - [`error`] - Error type for element construction
//!
//! ## Usage
//!
//! ```
//! use spice_elements::{BehavioralSource, Element, SourceParams};
//!
//! let b = BehavioralSource::new("B1", 0, 1, "i", "cos(v(1))+sin(v(2))").unwrap();
//! assert_eq!(b.render(), "B1 N000 N001 i= cos(v(1))+sin(v(2))");
//!
//! let params = SourceParams::new().tc1("2e-3").dtemp(5);
//! let b = BehavioralSource::with_params("B2", "out", 0, "V", "V(in)*2", params).unwrap();
//! assert_eq!(b.render(), "B2 out N000 v= V(in)*2 tc1=2m dtemp=5");
//! ```
//!
//! Independent sources take their stimulus from a builder:
//!
//! ```
//! use spice_elements::{Element, IndependentSource, Sin, StimulusParams};
//!
//! let params = StimulusParams::new().dc("1m").waveform(Sin::new(0, 1, "1Meg")).ac(1);
//! let v = IndependentSource::voltage("VIN", 13, 2, params).unwrap();
//! assert_eq!(v.render(), "VIN N013 N002 DC 1m SIN(0 1 1Meg 0 0 0) AC 1");
//! ```
//!
//! ### Native CLI
//!
//! ```bash
//! spice-line source B1 0 1 --type i --expr "cos(v(1))+sin(v(2))" --tc1 5m
//! ```
//!
//! Validation happens when an element is built; rendering a built element
//! cannot fail and always produces the same line.

pub mod elements;
pub mod error;
pub mod units;

// Re-export main types for convenience
pub use elements::{
    Am, BehavioralCapacitor, BehavioralInductor, BehavioralResistor, BehavioralSource,
    CurrentControlledCurrentSource, CurrentControlledVoltageSource, DependentKind, Distortion,
    Element, Exp, HasNodes, HasValue, IndependentSource, NodalElement, Node, Polarity,
    PolynomialSource, Pulse, Pwl, RandomDistribution, Sffm, Sin, SourceParams, StimulusParams,
    TempCoefficients, TrNoise, TrRandom, VoltageControlledCurrentSource,
    VoltageControlledVoltageSource, Waveform,
};
pub use error::{NetlistError, Result};
pub use units::{format_value, parse_value, Value};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmBehavioralSource;
