//! Netlist elements.
//!
//! This module provides the elements that can be rendered into SPICE
//! netlist lines:
//! - Behavioral sources: `B` elements driven by an arbitrary expression
//! - Behavioral passives: expression-valued R, C and L
//! - Independent sources: `V` and `I` elements with DC, AC, distortion and
//!   transient [`Waveform`] stimuli
//! - Linear dependent sources: `E`, `F`, `G` and `H` elements, plus their
//!   polynomial (`POLY`) form
//!
//! Every element is built around a [`NodalElement`], which owns the element
//! name, its formatted terminal nodes and the opaque value field. Element
//! kinds compose a `NodalElement` and expose it through the [`HasNodes`] and
//! [`HasValue`] capabilities instead of extending it.

mod behavioral;
mod dependent;
mod independent;
mod node;
mod passive;
mod waveform;

pub use behavioral::{BehavioralSource, Polarity, SourceParams};
pub use dependent::{
    CurrentControlledCurrentSource, CurrentControlledVoltageSource, DependentKind,
    PolynomialSource, VoltageControlledCurrentSource, VoltageControlledVoltageSource,
};
pub use independent::{Distortion, IndependentSource, StimulusParams};
pub use node::Node;
pub use passive::{
    BehavioralCapacitor, BehavioralInductor, BehavioralResistor, CapacitorKind, TempCoefficients,
};
pub use waveform::{Am, Exp, Pulse, Pwl, RandomDistribution, Sffm, Sin, TrNoise, TrRandom, Waveform};

use std::fmt;

use crate::error::Result;
use crate::units::Value;

/// Elements with an ordered list of terminal nodes.
pub trait HasNodes {
    /// Canonical netlist names of the terminals, in declaration order.
    fn nodes(&self) -> &[String];
}

/// Elements with an opaque value field following their nodes.
pub trait HasValue {
    /// The value field exactly as it appears in the netlist line.
    fn value(&self) -> &str;
}

/// Anything that renders to a single netlist line.
pub trait Element {
    /// Element name (e.g. `B1`, `R3`).
    fn name(&self) -> &str;

    /// Render the netlist line, without a trailing newline.
    fn render(&self) -> String;
}

/// The shared base of all two-or-more terminal elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodalElement {
    name: String,
    nodes: Vec<String>,
    value: String,
}

impl NodalElement {
    /// Create a new nodal element.
    ///
    /// Nodes are converted to their canonical netlist names immediately.
    pub fn new<I, N>(name: impl Into<String>, nodes: I, value: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Self {
            name: name.into(),
            nodes: nodes
                .into_iter()
                .map(|n| n.into().netlist_name())
                .collect(),
            value: value.into(),
        }
    }

    /// Render the base tokens followed by `params`, space separated.
    ///
    /// An empty value contributes no token.
    pub(crate) fn render_with<I>(&self, params: I) -> String
    where
        I: IntoIterator<Item = String>,
    {
        let value = Some(self.value.as_str()).filter(|v| !v.is_empty());
        let mut line = self.name.clone();
        for token in self.nodes.iter().map(String::as_str).chain(value) {
            line.push(' ');
            line.push_str(token);
        }
        for param in params {
            line.push(' ');
            line.push_str(&param);
        }
        line
    }
}

impl HasNodes for NodalElement {
    fn nodes(&self) -> &[String] {
        &self.nodes
    }
}

impl HasValue for NodalElement {
    fn value(&self) -> &str {
        &self.value
    }
}

impl Element for NodalElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self) -> String {
        self.render_with(std::iter::empty())
    }
}

impl fmt::Display for NodalElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Format `key=value` for each present parameter, keeping their order.
pub(crate) fn present_params<'a, I>(params: I) -> impl Iterator<Item = String> + 'a
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    I::IntoIter: 'a,
{
    params
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| format!("{}={}", key, v)))
}

/// Implements the capability traits and `Display` for an element that
/// composes a `NodalElement` in its `base` field.
macro_rules! delegate_to_base {
    ($($t:ty),*) => {
        $(
            impl $crate::elements::HasNodes for $t {
                fn nodes(&self) -> &[String] {
                    $crate::elements::HasNodes::nodes(&self.base)
                }
            }

            impl $crate::elements::HasValue for $t {
                fn value(&self) -> &str {
                    $crate::elements::HasValue::value(&self.base)
                }
            }

            impl std::fmt::Display for $t {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(&$crate::elements::Element::render(self))
                }
            }
        )*
    };
}

pub(crate) use delegate_to_base;

/// Normalize an optional magnitude, keeping `None` absent.
pub(crate) fn normalize_opt(value: Option<&Value>) -> Result<Option<String>> {
    value.map(Value::normalize).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodal_element_line() {
        let r = NodalElement::new("R1", [1, 2], "47K");
        assert_eq!(r.render(), "R1 N001 N002 47K");
        assert_eq!(r.to_string(), "R1 N001 N002 47K");
    }

    #[test]
    fn test_nodal_element_mixed_nodes() {
        let r = NodalElement::new("R2", vec![Node::from("N002"), Node::from("gnd")], "10K");
        assert_eq!(r.nodes(), ["N002", "gnd"]);
        assert_eq!(r.value(), "10K");
        assert_eq!(r.name(), "R2");
        assert_eq!(r.render(), "R2 N002 gnd 10K");
    }

    #[test]
    fn test_nodal_element_any_node_count() {
        let e = NodalElement::new("E1", [2, 3, 14, 1], "2");
        assert_eq!(e.render(), "E1 N002 N003 N014 N001 2");
    }

    #[test]
    fn test_nodal_element_empty_value() {
        let v = NodalElement::new("V1", [1, 0], "");
        assert_eq!(v.render(), "V1 N001 N000");
        assert_eq!(v.render_with(["AC".to_string()]), "V1 N001 N000 AC");
    }

    #[test]
    fn test_present_params_skip_absent() {
        let tc1 = Some("2m".to_string());
        let params: Vec<String> =
            present_params([("tc1", tc1.as_deref()), ("tc2", None), ("temp", Some("27"))]).collect();
        assert_eq!(params, vec!["tc1=2m", "temp=27"]);
    }
}
