//! Behavioral passive elements: expression-valued R, C and L.
//!
//! ```text
//! R1 rr N000 r = 'V(rr) < {Vt} ? {R0} : {2*R0}' tc1=2m tc2=3.3u
//! C2 a b q = '1u*(4*atan(V(a,b)/4)*2+V(a,b))/3'
//! L1 l2 lll L = 'i(Vm) < {It} ? {Ll} : {Lh}' tc1=-4m tc2=60u
//! ```

use std::fmt;
use std::str::FromStr;

use log::debug;

use super::{delegate_to_base, normalize_opt, present_params, Element, NodalElement, Node};
use crate::error::{NetlistError, Result};
use crate::units::Value;

/// Build the `<letter> = '<expr>'` value clause of a behavioral passive.
///
/// An expression that already carries the `<letter> =` prefix is re-quoted
/// if needed; one that starts with a quote is used as-is.
fn quoted_clause(letter: &str, expr: &str) -> String {
    let expr = expr.trim();
    let prefix = format!("{} =", letter);

    if let Some(rest) = expr.strip_prefix(&prefix) {
        let rest = rest.trim();
        if rest.starts_with('\'') || rest.starts_with('"') {
            format!("{} {}", prefix, rest)
        } else {
            format!("{} '{}'", prefix, rest)
        }
    } else if expr.starts_with('\'') || expr.starts_with('"') {
        expr.to_string()
    } else {
        format!("{} '{}'", prefix, expr)
    }
}

/// Optional temperature coefficients of a behavioral passive.
///
/// Unlike [`SourceParams`](super::SourceParams), a supplied zero is kept and
/// rendered as `0`; only `None` omits the coefficient.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TempCoefficients {
    /// First-order temperature coefficient
    pub tc1: Option<Value>,
    /// Second-order temperature coefficient
    pub tc2: Option<Value>,
}

impl TempCoefficients {
    /// Create an empty coefficient set.
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
}

/// Normalized coefficients, as stored on an element.
#[derive(Debug, Clone, Default, PartialEq)]
struct Coefficients {
    tc1: Option<String>,
    tc2: Option<String>,
}

impl Coefficients {
    fn normalize(coefficients: TempCoefficients) -> Result<Self> {
        Ok(Self {
            tc1: normalize_opt(coefficients.tc1.as_ref())?,
            tc2: normalize_opt(coefficients.tc2.as_ref())?,
        })
    }

    fn params(&self) -> [(&'static str, Option<&str>); 2] {
        [("tc1", self.tc1.as_deref()), ("tc2", self.tc2.as_deref())]
    }
}

/// A resistor whose resistance is an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BehavioralResistor {
    base: NodalElement,
    coefficients: Coefficients,
    noisy: Option<bool>,
}

impl BehavioralResistor {
    /// Create a new behavioral resistor.
    ///
    /// The expression may be given bare (`5k * rp1`), with its prefix
    /// (`r = 5k * rp1`), or already quoted.
    pub fn new(
        name: impl Into<String>,
        node1: impl Into<Node>,
        node2: impl Into<Node>,
        expr: &str,
        coefficients: TempCoefficients,
    ) -> Result<Self> {
        let nodes: [Node; 2] = [node1.into(), node2.into()];
        let base = NodalElement::new(name, nodes, quoted_clause("r", expr));
        let resistor = Self {
            coefficients: Coefficients::normalize(coefficients)?,
            base,
            noisy: None,
        };
        debug!("built behavioral resistor: {}", resistor.render());
        Ok(resistor)
    }

    /// Enable or disable noise generation for this resistor.
    pub fn noisy(mut self, noisy: bool) -> Self {
        self.noisy = Some(noisy);
        self
    }

    /// Whether noise generation was set explicitly.
    pub fn is_noisy(&self) -> Option<bool> {
        self.noisy
    }
}

impl Element for BehavioralResistor {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn render(&self) -> String {
        let noisy = self.noisy.map(|n| if n { "1" } else { "0" });
        let params = self.coefficients.params();
        self.base
            .render_with(present_params(params.into_iter().chain([("noisy", noisy)])))
    }
}

/// What the expression of a behavioral capacitor defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapacitorKind {
    /// Expression gives the capacitance
    Capacitance,
    /// Expression gives the stored charge
    Charge,
}

impl CapacitorKind {
    /// The keyword letter used in the netlist.
    pub fn letter(&self) -> &'static str {
        match self {
            CapacitorKind::Capacitance => "c",
            CapacitorKind::Charge => "q",
        }
    }

    /// Detect an explicit `c =` or `q =` prefix on an expression.
    fn from_prefix(expr: &str) -> Option<Self> {
        let expr = expr.trim_start();
        [CapacitorKind::Capacitance, CapacitorKind::Charge]
            .into_iter()
            .find(|kind| expr.starts_with(&format!("{} =", kind.letter())))
    }
}

impl FromStr for CapacitorKind {
    type Err = NetlistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "c" => Ok(CapacitorKind::Capacitance),
            "q" => Ok(CapacitorKind::Charge),
            _ => Err(NetlistError::invalid_kind(s, "'c', 'q'")),
        }
    }
}

impl fmt::Display for CapacitorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// A capacitor whose capacitance or charge is an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BehavioralCapacitor {
    base: NodalElement,
    kind: CapacitorKind,
    coefficients: Coefficients,
}

impl BehavioralCapacitor {
    /// Create a new behavioral capacitor.
    ///
    /// `kind` is `"c"` for a capacitance expression or `"q"` for a charge
    /// expression. An explicit `c =` / `q =` prefix in `expr` takes
    /// precedence over `kind`.
    pub fn new(
        name: impl Into<String>,
        node1: impl Into<Node>,
        node2: impl Into<Node>,
        expr: &str,
        kind: &str,
        coefficients: TempCoefficients,
    ) -> Result<Self> {
        let requested: CapacitorKind = kind.parse()?;
        let kind = CapacitorKind::from_prefix(expr).unwrap_or(requested);

        let clause = quoted_clause(kind.letter(), expr);
        let nodes: [Node; 2] = [node1.into(), node2.into()];
        let base = NodalElement::new(name, nodes, clause);
        let capacitor = Self {
            coefficients: Coefficients::normalize(coefficients)?,
            base,
            kind,
        };
        debug!("built behavioral capacitor: {}", capacitor.render());
        Ok(capacitor)
    }

    /// Whether the expression gives capacitance or charge.
    pub fn kind(&self) -> CapacitorKind {
        self.kind
    }
}

impl Element for BehavioralCapacitor {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn render(&self) -> String {
        self.base
            .render_with(present_params(self.coefficients.params()))
    }
}

/// An inductor whose inductance is an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BehavioralInductor {
    base: NodalElement,
    coefficients: Coefficients,
}

impl BehavioralInductor {
    /// Create a new behavioral inductor.
    pub fn new(
        name: impl Into<String>,
        node1: impl Into<Node>,
        node2: impl Into<Node>,
        expr: &str,
        coefficients: TempCoefficients,
    ) -> Result<Self> {
        let nodes: [Node; 2] = [node1.into(), node2.into()];
        let base = NodalElement::new(name, nodes, quoted_clause("L", expr));
        let inductor = Self {
            coefficients: Coefficients::normalize(coefficients)?,
            base,
        };
        debug!("built behavioral inductor: {}", inductor.render());
        Ok(inductor)
    }
}

impl Element for BehavioralInductor {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn render(&self) -> String {
        self.base
            .render_with(present_params(self.coefficients.params()))
    }
}

delegate_to_base!(BehavioralResistor, BehavioralCapacitor, BehavioralInductor);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::HasValue;

    #[test]
    fn test_quoted_clause() {
        assert_eq!(quoted_clause("r", "5k * rp1"), "r = '5k * rp1'");
        assert_eq!(quoted_clause("r", " r = 5k * rp1 "), "r = '5k * rp1'");
        assert_eq!(quoted_clause("r", "r = '5k'"), "r = '5k'");
        assert_eq!(quoted_clause("r", "r ='5k'"), "r = '5k'");
        assert_eq!(quoted_clause("r", "'{5k + 50*TEMPER}'"), "'{5k + 50*TEMPER}'");
    }

    #[test]
    fn test_behavioral_resistor_line() {
        let coefficients = TempCoefficients::new().tc1("2e-3").tc2("3.3e-6");
        let r = BehavioralResistor::new(
            "R1",
            "rr",
            0,
            "V(rr) < {Vt} ? {R0} : {2*R0}",
            coefficients,
        )
        .unwrap();
        assert_eq!(
            r.render(),
            "R1 rr N000 r = 'V(rr) < {Vt} ? {R0} : {2*R0}' tc1=2m tc2=3.3u"
        );
    }

    #[test]
    fn test_behavioral_resistor_noisy() {
        let r = BehavioralResistor::new("R3", "no1", "no2", "5k * rp1", TempCoefficients::new())
            .unwrap()
            .noisy(true);
        assert_eq!(r.is_noisy(), Some(true));
        assert_eq!(r.render(), "R3 no1 no2 r = '5k * rp1' noisy=1");

        let r = BehavioralResistor::new("R4", 1, 2, "1k", TempCoefficients::new().tc1(1))
            .unwrap()
            .noisy(false);
        assert_eq!(r.render(), "R4 N001 N002 r = '1k' tc1=1 noisy=0");
    }

    #[test]
    fn test_explicit_zero_coefficient_kept() {
        let r = BehavioralResistor::new("R5", 1, 0, "1k", TempCoefficients::new().tc1(0)).unwrap();
        assert_eq!(r.render(), "R5 N001 N000 r = '1k' tc1=0");
    }

    #[test]
    fn test_behavioral_capacitor_kinds() {
        let c = BehavioralCapacitor::new(
            "C1",
            "cc",
            0,
            "V(cc) < {Vt} ? {Cl} : {Ch}",
            "c",
            TempCoefficients::new().tc1("-1e-3").tc2("1.3e-5"),
        )
        .unwrap();
        assert_eq!(c.kind(), CapacitorKind::Capacitance);
        assert_eq!(
            c.render(),
            "C1 cc N000 c = 'V(cc) < {Vt} ? {Cl} : {Ch}' tc1=-1m tc2=13u"
        );

        let c = BehavioralCapacitor::new(
            "C2",
            "a",
            "b",
            "1u*(4*atan(V(a,b)/4)*2+V(a,b))/3",
            "Q",
            TempCoefficients::new(),
        )
        .unwrap();
        assert_eq!(c.render(), "C2 a b q = '1u*(4*atan(V(a,b)/4)*2+V(a,b))/3'");
    }

    #[test]
    fn test_capacitor_prefix_overrides_kind() {
        let c = BehavioralCapacitor::new("C3", 1, 2, "q = 1n*V(1)", "c", TempCoefficients::new())
            .unwrap();
        assert_eq!(c.kind(), CapacitorKind::Charge);
        assert_eq!(c.value(), "q = '1n*V(1)'");
    }

    #[test]
    fn test_capacitor_invalid_kind() {
        let err = BehavioralCapacitor::new("C4", 1, 2, "1n", "x", TempCoefficients::new())
            .unwrap_err();
        assert_eq!(err, NetlistError::invalid_kind("x", "'c', 'q'"));
    }

    #[test]
    fn test_behavioral_inductor_line() {
        let l = BehavioralInductor::new(
            "L1",
            "l2",
            "lll",
            "i(Vm) < {It} ? {Ll} : {Lh}",
            TempCoefficients::new().tc1("-4e-3").tc2("6e-5"),
        )
        .unwrap();
        assert_eq!(
            l.render(),
            "L1 l2 lll L = 'i(Vm) < {It} ? {Ll} : {Lh}' tc1=-4m tc2=60u"
        );
        assert_eq!(l.to_string(), l.render());
    }

    #[test]
    fn test_invalid_coefficient_rejected() {
        let err = BehavioralInductor::new("L2", 1, 2, "1u", TempCoefficients::new().tc2(""))
            .unwrap_err();
        assert!(matches!(err, NetlistError::InvalidValue { .. }));
    }
}
