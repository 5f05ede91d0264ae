//! WASM bindings for Spice Elements.
//!
//! This module provides JavaScript-friendly bindings for building netlist
//! lines in a browser-based schematic editor.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmBehavioralSource } from 'spice_elements';
//!
//! await init();
//!
//! const b1 = new WasmBehavioralSource('B1', '0', '1', 'i', 'cos(v(1))+sin(v(2))');
//! b1.render(); // "B1 N000 N001 i= cos(v(1))+sin(v(2))"
//!
//! const b2 = WasmBehavioralSource.with_coefficients(
//!   'B2', 'out', '0', 'v', 'V(in)*2', '2m', undefined, undefined, '5');
//! b2.render(); // "B2 out N000 v= V(in)*2 tc1=2m dtemp=5"
//! ```

use wasm_bindgen::prelude::*;

use crate::elements::{BehavioralSource, Element, SourceParams};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// WASM-compatible behavioral source.
///
/// Nodes are passed as strings; digit-only strings are treated as numbered
/// nodes (`"1"` renders as `N001`).
#[wasm_bindgen]
pub struct WasmBehavioralSource {
    source: BehavioralSource,
}

#[wasm_bindgen]
impl WasmBehavioralSource {
    /// Create a new behavioral source without temperature parameters.
    ///
    /// # Arguments
    /// * `name` - Element name (e.g. `B1`)
    /// * `node_pos` - Positive terminal node
    /// * `node_neg` - Negative terminal node
    /// * `expr_type` - `"v"` for voltage or `"i"` for current
    /// * `expr` - Expression defining the source output
    #[wasm_bindgen(constructor)]
    pub fn new(
        name: &str,
        node_pos: &str,
        node_neg: &str,
        expr_type: &str,
        expr: &str,
    ) -> Result<WasmBehavioralSource, JsValue> {
        Self::with_coefficients(name, node_pos, node_neg, expr_type, expr, None, None, None, None)
    }

    /// Create a new behavioral source with temperature parameters.
    ///
    /// Each parameter may be `undefined` or an empty string to omit it.
    #[wasm_bindgen]
    #[allow(clippy::too_many_arguments)]
    pub fn with_coefficients(
        name: &str,
        node_pos: &str,
        node_neg: &str,
        expr_type: &str,
        expr: &str,
        tc1: Option<String>,
        tc2: Option<String>,
        temp: Option<String>,
        dtemp: Option<String>,
    ) -> Result<WasmBehavioralSource, JsValue> {
        let params = SourceParams {
            tc1: tc1.map(Into::into),
            tc2: tc2.map(Into::into),
            temp: temp.map(Into::into),
            dtemp: dtemp.map(Into::into),
        };
        let source =
            BehavioralSource::with_params(name, node_pos, node_neg, expr_type, expr, params)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(WasmBehavioralSource { source })
    }

    /// Render the netlist line.
    #[wasm_bindgen]
    pub fn render(&self) -> String {
        self.source.render()
    }

    /// The lower-case polarity letter (`"v"` or `"i"`).
    #[wasm_bindgen(getter)]
    pub fn polarity(&self) -> String {
        self.source.polarity().to_string()
    }

    /// The trimmed expression.
    #[wasm_bindgen(getter)]
    pub fn expression(&self) -> String {
        self.source.expression().to_string()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
