//! Behavioral sources (B elements) for arbitrary mathematical expressions.
//!
//! A behavioral source drives either the voltage across or the current
//! through its terminals with an expression the simulator evaluates:
//!
//! ```text
//! B1 N000 N001 i= cos(v(1))+sin(v(2))
//! Bcl N002 N000 v= V(1) < {Vlow} ? {Vlow} : V(1) > {Vhigh} ? {Vhigh} : V(1)
//! Bt out N000 v= V(in)*2 tc1=2m dtemp=5
//! ```
//!
//! The expression is opaque here: it is trimmed and emitted verbatim.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};

use super::{delegate_to_base, present_params, Element, NodalElement, Node};
use crate::error::{NetlistError, Result};
use crate::units::Value;

/// What the expression of a behavioral source defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Expression defines the voltage across the terminals
    Voltage,
    /// Expression defines the current through the terminals
    Current,
}

impl Polarity {
    /// The lower-case keyword letter used in the netlist.
    pub fn letter(&self) -> char {
        match self {
            Polarity::Voltage => 'v',
            Polarity::Current => 'i',
        }
    }
}

impl FromStr for Polarity {
    type Err = NetlistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "v" => Ok(Polarity::Voltage),
            "i" => Ok(Polarity::Current),
            _ => Err(NetlistError::invalid_polarity(s)),
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Optional temperature parameters of a behavioral source.
///
/// A value of numeric zero or a blank string is treated the same as `None`:
/// the parameter is left out of the netlist line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceParams {
    /// First-order temperature coefficient
    pub tc1: Option<Value>,
    /// Second-order temperature coefficient
    pub tc2: Option<Value>,
    /// Instance temperature
    pub temp: Option<Value>,
    /// Temperature offset from the circuit temperature
    pub dtemp: Option<Value>,
}

impl SourceParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first-order temperature coefficient.
    pub fn tc1(mut self, value: impl Into<Value>) -> Self {
        self.tc1 = Some(value.into());
        self
    }

    /// Set the second-order temperature coefficient.
    pub fn tc2(mut self, value: impl Into<Value>) -> Self {
        self.tc2 = Some(value.into());
        self
    }

    /// Set the instance temperature.
    pub fn temp(mut self, value: impl Into<Value>) -> Self {
        self.temp = Some(value.into());
        self
    }

    /// Set the temperature offset.
    pub fn dtemp(mut self, value: impl Into<Value>) -> Self {
        self.dtemp = Some(value.into());
        self
    }
}

/// Normalize an optional parameter, dropping unset values.
fn normalize_param(value: Option<Value>) -> Result<Option<String>> {
    value
        .filter(|v| !v.is_unset())
        .map(|v| v.normalize())
        .transpose()
}

/// A behavioral voltage or current source.
#[derive(Debug, Clone, PartialEq)]
pub struct BehavioralSource {
    base: NodalElement,
    polarity: Polarity,
    expression: String,
    tc1: Option<String>,
    tc2: Option<String>,
    temp: Option<String>,
    dtemp: Option<String>,
}

impl BehavioralSource {
    /// Create a new behavioral source without temperature parameters.
    ///
    /// `expr_type` is `"v"` for a voltage source or `"i"` for a current
    /// source, in either case.
    pub fn new(
        name: impl Into<String>,
        node_pos: impl Into<Node>,
        node_neg: impl Into<Node>,
        expr_type: &str,
        expr: &str,
    ) -> Result<Self> {
        Self::with_params(name, node_pos, node_neg, expr_type, expr, SourceParams::default())
    }

    /// Create a new behavioral source with temperature parameters.
    ///
    /// # Errors
    /// - [`NetlistError::InvalidPolarity`] if `expr_type` is not `v` or `i`.
    ///   This is checked before anything else is built.
    /// - A value error if a supplied parameter is not a valid magnitude.
    pub fn with_params(
        name: impl Into<String>,
        node_pos: impl Into<Node>,
        node_neg: impl Into<Node>,
        expr_type: &str,
        expr: &str,
        params: SourceParams,
    ) -> Result<Self> {
        let polarity: Polarity = expr_type.parse()?;
        Self::build(name, node_pos, node_neg, polarity, expr, params)
    }

    /// Create a new behavioral source from an already-typed polarity.
    pub fn from_polarity(
        name: impl Into<String>,
        node_pos: impl Into<Node>,
        node_neg: impl Into<Node>,
        polarity: Polarity,
        expr: &str,
        params: SourceParams,
    ) -> Result<Self> {
        Self::build(name, node_pos, node_neg, polarity, expr, params)
    }

    fn build(
        name: impl Into<String>,
        node_pos: impl Into<Node>,
        node_neg: impl Into<Node>,
        polarity: Polarity,
        expr: &str,
        params: SourceParams,
    ) -> Result<Self> {
        let expression = expr.trim().to_string();
        let clause = format!("{}= {}", polarity.letter(), expression);
        let nodes: [Node; 2] = [node_pos.into(), node_neg.into()];
        let base = NodalElement::new(name, nodes, clause);

        if expression.is_empty() {
            warn!("behavioral source '{}' has an empty expression", base.name());
        }

        let source = Self {
            tc1: normalize_param(params.tc1)?,
            tc2: normalize_param(params.tc2)?,
            temp: normalize_param(params.temp)?,
            dtemp: normalize_param(params.dtemp)?,
            base,
            polarity,
            expression,
        };

        debug!("built behavioral source: {}", source.render());
        Ok(source)
    }

    /// Whether the expression defines a voltage or a current.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// The trimmed expression.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Normalized first-order temperature coefficient, if present.
    pub fn tc1(&self) -> Option<&str> {
        self.tc1.as_deref()
    }

    /// Normalized second-order temperature coefficient, if present.
    pub fn tc2(&self) -> Option<&str> {
        self.tc2.as_deref()
    }

    /// Normalized instance temperature, if present.
    pub fn temp(&self) -> Option<&str> {
        self.temp.as_deref()
    }

    /// Normalized temperature offset, if present.
    pub fn dtemp(&self) -> Option<&str> {
        self.dtemp.as_deref()
    }
}

impl Element for BehavioralSource {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn render(&self) -> String {
        self.base.render_with(present_params([
            ("tc1", self.tc1()),
            ("tc2", self.tc2()),
            ("temp", self.temp()),
            ("dtemp", self.dtemp()),
        ]))
    }
}

delegate_to_base!(BehavioralSource);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{HasNodes, HasValue};

    fn source(expr_type: &str) -> Result<BehavioralSource> {
        BehavioralSource::new("B1", 0, 1, expr_type, "V(1)*2")
    }

    #[test]
    fn test_polarity_is_case_insensitive() {
        for (expr_type, prefix) in [("v", "v= "), ("V", "v= "), ("i", "i= "), ("I", "i= ")] {
            let b = source(expr_type).unwrap();
            assert!(b.value().starts_with(prefix), "{} -> {}", expr_type, b.value());
        }
        assert_eq!(source("V").unwrap().polarity(), Polarity::Voltage);
        assert_eq!(source("i").unwrap().polarity(), Polarity::Current);
    }

    #[test]
    fn test_invalid_polarity_rejected() {
        for expr_type in ["", "x", "vi", "q", " v", "voltage"] {
            assert_eq!(
                source(expr_type),
                Err(NetlistError::invalid_polarity(expr_type)),
            );
        }
    }

    #[test]
    fn test_polarity_checked_before_values() {
        let params = SourceParams::new().tc1("not-a-number");
        let err = BehavioralSource::with_params("B1", 0, 1, "z", "1", params).unwrap_err();
        assert!(matches!(err, NetlistError::InvalidPolarity { .. }));
    }

    #[test]
    fn test_current_source_line() {
        let b = BehavioralSource::new("B1", 0, 1, "i", "cos(v(1))+sin(v(2))").unwrap();
        assert_eq!(b.render(), "B1 N000 N001 i= cos(v(1))+sin(v(2))");
    }

    #[test]
    fn test_ternary_expression_verbatim() {
        let expr = "V(1) < {Vlow} ? {Vlow} : V(1) > {Vhigh} ? {Vhigh} : V(1)";
        let b = BehavioralSource::new("Bcl", 2, 0, "v", expr).unwrap();
        assert_eq!(b.render(), format!("Bcl N002 N000 v= {}", expr));
        assert!(!b.render().contains("tc1="));
    }

    #[test]
    fn test_expression_trimmed_outer_only() {
        let b = BehavioralSource::new("B2", "a", "b", "v", "   V(a) *  2  ").unwrap();
        assert_eq!(b.expression(), "V(a) *  2");
        assert_eq!(b.render(), "B2 a b v= V(a) *  2");
    }

    #[test]
    fn test_empty_expression_still_renders() {
        let b = BehavioralSource::new("B3", 1, 0, "v", "   ").unwrap();
        assert_eq!(b.render(), "B3 N001 N000 v= ");
    }

    #[test]
    fn test_render_is_idempotent() {
        let params = SourceParams::new().tc1("2m").temp(27);
        let b = BehavioralSource::with_params("B1", 1, 2, "v", "V(3)", params).unwrap();
        let first = b.render();
        assert_eq!(first, b.render());
        assert_eq!(first, b.to_string());
    }

    #[test]
    fn test_unset_coefficients_omitted() {
        let cases = [
            SourceParams::new().tc1(0),
            SourceParams::new().tc1(0.0),
            SourceParams::new().tc1(""),
            SourceParams::new(),
        ];
        for params in cases {
            let b = BehavioralSource::with_params("B1", 1, 0, "v", "1", params).unwrap();
            assert_eq!(b.tc1(), None);
            assert_eq!(b.render(), "B1 N001 N000 v= 1");
        }
    }

    #[test]
    fn test_blank_coefficient_rejected() {
        let params = SourceParams::new().tc1("   ");
        let err = BehavioralSource::with_params("B1", 1, 0, "v", "1", params).unwrap_err();
        assert!(matches!(err, NetlistError::InvalidValue { .. }));
    }

    #[test]
    fn test_overflowing_coefficient_rejected() {
        for params in [
            SourceParams::new().tc1("1e400"),
            SourceParams::new().temp("1e300T"),
            SourceParams::new().dtemp(f64::INFINITY),
        ] {
            let err = BehavioralSource::with_params("B1", 1, 0, "v", "1", params).unwrap_err();
            assert!(matches!(err, NetlistError::InvalidValue { .. }));
        }
    }

    #[test]
    fn test_present_coefficient_single_token() {
        let b = BehavioralSource::with_params("B1", 1, 0, "v", "1", SourceParams::new().tc1(5))
            .unwrap();
        assert_eq!(b.render(), "B1 N001 N000 v= 1 tc1=5");

        let b = BehavioralSource::with_params("B1", 1, 0, "v", "1", SourceParams::new().tc1("5m"))
            .unwrap();
        assert_eq!(b.render(), "B1 N001 N000 v= 1 tc1=5m");
        assert_eq!(b.render().matches("tc1=").count(), 1);
    }

    #[test]
    fn test_coefficient_order_fixed() {
        let params = SourceParams::new().dtemp(5).tc1("2e-3");
        let b = BehavioralSource::with_params("Bt", "out", 0, "V", "V(in)*2", params).unwrap();
        assert_eq!(b.render(), "Bt out N000 v= V(in)*2 tc1=2m dtemp=5");

        let params = SourceParams::new()
            .dtemp("1")
            .temp(35)
            .tc2("1.4u")
            .tc1(-0.004);
        let b = BehavioralSource::with_params("Ball", 1, 2, "i", "I(V1)", params).unwrap();
        assert_eq!(
            b.render(),
            "Ball N001 N002 i= I(V1) tc1=-4m tc2=1.4u temp=35 dtemp=1"
        );
    }

    #[test]
    fn test_invalid_coefficient_rejected() {
        let params = SourceParams::new().temp("hot");
        let err = BehavioralSource::with_params("B1", 1, 0, "v", "1", params).unwrap_err();
        assert!(matches!(err, NetlistError::InvalidValue { .. }));
    }

    #[test]
    fn test_capabilities_expose_base() {
        let b = BehavioralSource::new("B9", "in", 3, "i", "V(in)/1k").unwrap();
        assert_eq!(b.name(), "B9");
        assert_eq!(b.nodes(), ["in", "N003"]);
        assert_eq!(b.value(), "i= V(in)/1k");
    }

    #[test]
    fn test_from_polarity() {
        let b = BehavioralSource::from_polarity(
            "B4",
            1,
            0,
            Polarity::Current,
            "V(1)/1k",
            SourceParams::default(),
        )
        .unwrap();
        assert_eq!(b.render(), "B4 N001 N000 i= V(1)/1k");
        assert_eq!(b.polarity(), Polarity::Current);

        let typed = BehavioralSource::from_polarity(
            "B5",
            2,
            0,
            Polarity::Voltage,
            " V(2) ",
            SourceParams::new().tc1("2m"),
        )
        .unwrap();
        let parsed =
            BehavioralSource::with_params("B5", 2, 0, "V", " V(2) ", SourceParams::new().tc1("2m"))
                .unwrap();
        assert_eq!(typed, parsed);
    }

    #[test]
    fn test_source_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BehavioralSource>();
    }
}
