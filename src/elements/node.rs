//! Terminal node references.

use std::fmt;

/// A reference to a circuit node, as supplied by the caller.
///
/// Numeric nodes render as `N` followed by a zero-padded index
/// (`N000`, `N012`); symbolic nodes render verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// Numbered node
    Index(u64),
    /// Named node (e.g. `in`, `out`, `gnd`)
    Named(String),
}

impl Node {
    /// Canonical name of this node in a netlist.
    pub fn netlist_name(&self) -> String {
        match self {
            Node::Index(n) => format!("N{:03}", n),
            Node::Named(name) => {
                let name = name.trim();
                if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
                    // Leading zeros are dropped before padding, so "007" and "7" agree
                    let digits = name.trim_start_matches('0');
                    let digits = if digits.is_empty() { "0" } else { digits };
                    format!("N{:0>3}", digits)
                } else {
                    name.to_string()
                }
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.netlist_name())
    }
}

macro_rules! node_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Node {
                fn from(n: $t) -> Self {
                    Node::Index(n as u64)
                }
            }
        )*
    };
}

node_from_unsigned!(u8, u16, u32, u64, usize);

impl From<i32> for Node {
    fn from(n: i32) -> Self {
        if n >= 0 {
            Node::Index(n as u64)
        } else {
            Node::Named(n.to_string())
        }
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        if n >= 0 {
            Node::Index(n as u64)
        } else {
            Node::Named(n.to_string())
        }
    }
}

impl From<&str> for Node {
    fn from(name: &str) -> Self {
        Node::Named(name.to_string())
    }
}

impl From<String> for Node {
    fn from(name: String) -> Self {
        Node::Named(name)
    }
}

impl From<&String> for Node {
    fn from(name: &String) -> Self {
        Node::Named(name.clone())
    }
}
