//! Linear dependent sources (E, F, G and H elements).
//!
//! ```text
//! E1 N002 N003 N014 N001 2
//! F1 N013 N005 VSENS 5 m=2
//! G2 N001 N000 N003 N002 500u m=2
//! HX N005 N017 VZ 500
//! ESUM N001 N000 POLY(2) N003 N000 N004 N000 0 1 1
//! ```
//!
//! Voltage-controlled sources take a pair of control nodes. Current-controlled
//! sources sense the current through a named voltage source instead.

use std::fmt;
use std::str::FromStr;

use log::debug;

use super::{delegate_to_base, normalize_opt, present_params, Element, NodalElement, Node};
use crate::error::{NetlistError, Result};
use crate::units::Value;

/// The four linear dependent source types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependentKind {
    /// `E`: voltage-controlled voltage source
    Vcvs,
    /// `F`: current-controlled current source
    Cccs,
    /// `G`: voltage-controlled current source
    Vccs,
    /// `H`: current-controlled voltage source
    Ccvs,
}

impl DependentKind {
    /// The element letter.
    pub fn letter(&self) -> char {
        match self {
            DependentKind::Vcvs => 'E',
            DependentKind::Cccs => 'F',
            DependentKind::Vccs => 'G',
            DependentKind::Ccvs => 'H',
        }
    }

    /// Whether the source is controlled by node voltages.
    pub fn is_voltage_controlled(&self) -> bool {
        matches!(self, DependentKind::Vcvs | DependentKind::Vccs)
    }
}

impl FromStr for DependentKind {
    type Err = NetlistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "E" => Ok(DependentKind::Vcvs),
            "F" => Ok(DependentKind::Cccs),
            "G" => Ok(DependentKind::Vccs),
            "H" => Ok(DependentKind::Ccvs),
            _ => Err(NetlistError::invalid_kind(s, "'E', 'F', 'G', 'H'")),
        }
    }
}

impl fmt::Display for DependentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Render the optional `m=` multiplier.
fn multiplier_param(m: Option<&str>) -> impl Iterator<Item = String> + '_ {
    present_params([("m", m)])
}

/// Voltage-controlled voltage source (`E`).
#[derive(Debug, Clone, PartialEq)]
pub struct VoltageControlledVoltageSource {
    base: NodalElement,
}

impl VoltageControlledVoltageSource {
    /// Create a VCVS with the given voltage gain.
    pub fn new(
        name: impl Into<String>,
        out_pos: impl Into<Node>,
        out_neg: impl Into<Node>,
        ctrl_pos: impl Into<Node>,
        ctrl_neg: impl Into<Node>,
        gain: impl Into<Value>,
    ) -> Result<Self> {
        let nodes: [Node; 4] = [out_pos.into(), out_neg.into(), ctrl_pos.into(), ctrl_neg.into()];
        let base = NodalElement::new(name, nodes, gain.into().normalize()?);
        debug!("built VCVS: {}", base);
        Ok(Self { base })
    }
}

impl Element for VoltageControlledVoltageSource {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn render(&self) -> String {
        self.base.render()
    }
}

/// Voltage-controlled current source (`G`).
#[derive(Debug, Clone, PartialEq)]
pub struct VoltageControlledCurrentSource {
    base: NodalElement,
    multiplier: Option<String>,
}

impl VoltageControlledCurrentSource {
    /// Create a VCCS with the given transconductance, in siemens.
    pub fn new(
        name: impl Into<String>,
        out_pos: impl Into<Node>,
        out_neg: impl Into<Node>,
        ctrl_pos: impl Into<Node>,
        ctrl_neg: impl Into<Node>,
        transconductance: impl Into<Value>,
    ) -> Result<Self> {
        Self::build(name, out_pos, out_neg, ctrl_pos, ctrl_neg, transconductance, None)
    }

    /// Create a VCCS with an output multiplier.
    pub fn with_multiplier(
        name: impl Into<String>,
        out_pos: impl Into<Node>,
        out_neg: impl Into<Node>,
        ctrl_pos: impl Into<Node>,
        ctrl_neg: impl Into<Node>,
        transconductance: impl Into<Value>,
        m: impl Into<Value>,
    ) -> Result<Self> {
        let m = m.into();
        Self::build(name, out_pos, out_neg, ctrl_pos, ctrl_neg, transconductance, Some(&m))
    }

    fn build(
        name: impl Into<String>,
        out_pos: impl Into<Node>,
        out_neg: impl Into<Node>,
        ctrl_pos: impl Into<Node>,
        ctrl_neg: impl Into<Node>,
        transconductance: impl Into<Value>,
        m: Option<&Value>,
    ) -> Result<Self> {
        let nodes: [Node; 4] = [out_pos.into(), out_neg.into(), ctrl_pos.into(), ctrl_neg.into()];
        let source = Self {
            base: NodalElement::new(name, nodes, transconductance.into().normalize()?),
            multiplier: normalize_opt(m)?,
        };
        debug!("built VCCS: {}", source.render());
        Ok(source)
    }

    /// Normalized output multiplier, if present.
    pub fn multiplier(&self) -> Option<&str> {
        self.multiplier.as_deref()
    }
}

impl Element for VoltageControlledCurrentSource {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn render(&self) -> String {
        self.base.render_with(multiplier_param(self.multiplier()))
    }
}

/// Current-controlled current source (`F`).
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentControlledCurrentSource {
    base: NodalElement,
    multiplier: Option<String>,
}

impl CurrentControlledCurrentSource {
    /// Create a CCCS whose output is `gain` times the current through the
    /// voltage source `vname`.
    pub fn new(
        name: impl Into<String>,
        out_pos: impl Into<Node>,
        out_neg: impl Into<Node>,
        vname: impl Into<String>,
        gain: impl Into<Value>,
    ) -> Result<Self> {
        Self::build(name, out_pos, out_neg, vname, gain, None)
    }

    /// Create a CCCS with an output multiplier.
    pub fn with_multiplier(
        name: impl Into<String>,
        out_pos: impl Into<Node>,
        out_neg: impl Into<Node>,
        vname: impl Into<String>,
        gain: impl Into<Value>,
        m: impl Into<Value>,
    ) -> Result<Self> {
        let m = m.into();
        Self::build(name, out_pos, out_neg, vname, gain, Some(&m))
    }

    fn build(
        name: impl Into<String>,
        out_pos: impl Into<Node>,
        out_neg: impl Into<Node>,
        vname: impl Into<String>,
        gain: impl Into<Value>,
        m: Option<&Value>,
    ) -> Result<Self> {
        let nodes: [Node; 3] = [out_pos.into(), out_neg.into(), Node::Named(vname.into())];
        let source = Self {
            base: NodalElement::new(name, nodes, gain.into().normalize()?),
            multiplier: normalize_opt(m)?,
        };
        debug!("built CCCS: {}", source.render());
        Ok(source)
    }

    /// Normalized output multiplier, if present.
    pub fn multiplier(&self) -> Option<&str> {
        self.multiplier.as_deref()
    }
}

impl Element for CurrentControlledCurrentSource {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn render(&self) -> String {
        self.base.render_with(multiplier_param(self.multiplier()))
    }
}

/// Current-controlled voltage source (`H`).
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentControlledVoltageSource {
    base: NodalElement,
}

impl CurrentControlledVoltageSource {
    /// Create a CCVS with the given transresistance, in ohms.
    pub fn new(
        name: impl Into<String>,
        out_pos: impl Into<Node>,
        out_neg: impl Into<Node>,
        vname: impl Into<String>,
        transresistance: impl Into<Value>,
    ) -> Result<Self> {
        let nodes: [Node; 3] = [out_pos.into(), out_neg.into(), Node::Named(vname.into())];
        let base = NodalElement::new(name, nodes, transresistance.into().normalize()?);
        debug!("built CCVS: {}", base);
        Ok(Self { base })
    }
}

impl Element for CurrentControlledVoltageSource {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn render(&self) -> String {
        self.base.render()
    }
}

/// A dependent source whose output is a polynomial of its controls.
///
/// Voltage-controlled kinds (`E`, `G`) take control node pairs; the
/// polynomial dimension is the number of pairs. Current-controlled kinds
/// (`F`, `H`) take one voltage source name per dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialSource {
    base: NodalElement,
    kind: DependentKind,
    dimension: usize,
}

impl PolynomialSource {
    /// Create a polynomial dependent source.
    ///
    /// # Errors
    /// - [`NetlistError::InvalidControls`] if there are no controls, or a
    ///   voltage-controlled kind is given an odd number of control nodes.
    /// - A value error if a coefficient is not a valid magnitude.
    pub fn new<C, K, V>(
        name: impl Into<String>,
        kind: DependentKind,
        out_pos: impl Into<Node>,
        out_neg: impl Into<Node>,
        controls: C,
        coefficients: K,
    ) -> Result<Self>
    where
        C: IntoIterator,
        C::Item: Into<Node>,
        K: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let controls: Vec<Node> = controls.into_iter().map(Into::into).collect();
        if controls.is_empty() {
            return Err(NetlistError::invalid_controls(
                kind.to_string(),
                "at least one control is required",
            ));
        }

        let dimension = if kind.is_voltage_controlled() {
            if controls.len() % 2 != 0 {
                return Err(NetlistError::invalid_controls(
                    kind.to_string(),
                    format!("expected node pairs, got {} nodes", controls.len()),
                ));
            }
            controls.len() / 2
        } else {
            controls.len()
        };

        let coefficients = coefficients
            .into_iter()
            .map(|c| c.into().normalize())
            .collect::<Result<Vec<_>>>()?;

        let mut value = format!("POLY({})", dimension);
        for c in &coefficients {
            value.push(' ');
            value.push_str(c);
        }

        let outputs: [Node; 2] = [out_pos.into(), out_neg.into()];
        let source = Self {
            base: NodalElement::new(name, outputs.into_iter().chain(controls), value),
            kind,
            dimension,
        };
        debug!("built polynomial source: {}", source.render());
        Ok(source)
    }

    pub fn kind(&self) -> DependentKind {
        self.kind
    }

    /// Number of controlling quantities.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl Element for PolynomialSource {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn render(&self) -> String {
        self.base.render()
    }
}

delegate_to_base!(
    VoltageControlledVoltageSource,
    VoltageControlledCurrentSource,
    CurrentControlledCurrentSource,
    CurrentControlledVoltageSource,
    PolynomialSource
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{HasNodes, HasValue};

    #[test]
    fn test_vccs() {
        let g = VoltageControlledCurrentSource::new("G1", 2, 0, 5, 0, "0.1").unwrap();
        assert_eq!(g.render(), "G1 N002 N000 N005 N000 100m");

        let g = VoltageControlledCurrentSource::with_multiplier("G2", 1, 0, 3, 2, "0.5m", 2)
            .unwrap();
        assert_eq!(g.render(), "G2 N001 N000 N003 N002 500u m=2");
        assert_eq!(g.multiplier(), Some("2"));
    }

    #[test]
    fn test_vcvs() {
        let e = VoltageControlledVoltageSource::new("E1", 2, 3, 14, 1, 2.0).unwrap();
        assert_eq!(e.render(), "E1 N002 N003 N014 N001 2");
        assert_eq!(e.nodes().len(), 4);
    }

    #[test]
    fn test_cccs() {
        let f = CurrentControlledCurrentSource::with_multiplier("F1", 13, 5, "VSENS", 5, 2)
            .unwrap();
        assert_eq!(f.render(), "F1 N013 N005 VSENS 5 m=2");

        let f = CurrentControlledCurrentSource::new("F2", "out", 0, "VSENS", 10).unwrap();
        assert_eq!(f.render(), "F2 out N000 VSENS 10");
        assert_eq!(f.multiplier(), None);
    }

    #[test]
    fn test_ccvs() {
        let h = CurrentControlledVoltageSource::new("HX", 5, 17, "VZ", "0.5K").unwrap();
        assert_eq!(h.render(), "HX N005 N017 VZ 500");
        assert_eq!(h.value(), "500");
    }

    #[test]
    fn test_multiplier_zero_kept() {
        let g = VoltageControlledCurrentSource::with_multiplier("G3", 1, 0, 2, 0, 1, 0).unwrap();
        assert_eq!(g.render(), "G3 N001 N000 N002 N000 1 m=0");
    }

    #[test]
    fn test_invalid_gain_rejected() {
        let err = VoltageControlledVoltageSource::new("E1", 1, 0, 2, 0, "lots").unwrap_err();
        assert!(matches!(err, NetlistError::InvalidValue { .. }));

        let err = CurrentControlledCurrentSource::with_multiplier("F1", 1, 0, "V1", 1, "1e400")
            .unwrap_err();
        assert!(matches!(err, NetlistError::InvalidValue { .. }));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("e".parse::<DependentKind>().unwrap(), DependentKind::Vcvs);
        assert_eq!("H".parse::<DependentKind>().unwrap(), DependentKind::Ccvs);
        assert_eq!(
            "B".parse::<DependentKind>(),
            Err(NetlistError::invalid_kind("B", "'E', 'F', 'G', 'H'"))
        );
        assert_eq!(DependentKind::Vccs.to_string(), "G");
    }

    #[test]
    fn test_polynomial_voltage_controlled() {
        let e = PolynomialSource::new(
            "ESUM",
            DependentKind::Vcvs,
            1,
            0,
            [Node::from(3), Node::from(0), Node::from(4), Node::from(0)],
            [0, 1, 1],
        )
        .unwrap();
        assert_eq!(e.render(), "ESUM N001 N000 POLY(2) N003 N000 N004 N000 0 1 1");
        assert_eq!(e.dimension(), 2);
        assert_eq!(e.kind(), DependentKind::Vcvs);
    }

    #[test]
    fn test_polynomial_current_controlled() {
        let f = PolynomialSource::new(
            "F1",
            DependentKind::Cccs,
            12,
            10,
            ["VB", "VC", "VE"],
            ["1m", "1.3", "0.2"],
        )
        .unwrap();
        assert_eq!(f.render(), "F1 N012 N010 POLY(3) VB VC VE 1m 1.3 200m");
        assert_eq!(f.dimension(), 3);
    }

    #[test]
    fn test_polynomial_controls_checked() {
        let err = PolynomialSource::new("G1", DependentKind::Vccs, 1, 0, [2, 3, 4], [0, 1])
            .unwrap_err();
        assert!(matches!(err, NetlistError::InvalidControls { .. }));

        let empty: [u32; 0] = [];
        let err = PolynomialSource::new("H1", DependentKind::Ccvs, 1, 0, empty, [1]).unwrap_err();
        assert!(matches!(err, NetlistError::InvalidControls { .. }));
    }
}
