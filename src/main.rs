//! spice-line - SPICE netlist line generator
//!
//! Builds a single behavioral element from its arguments and prints the
//! netlist line.
//!
//! # Usage
//!
//! ```bash
//! spice-line source B1 0 1 --type i --expr "cos(v(1))+sin(v(2))"
//! spice-line resistor R1 rr 0 "V(rr) < {Vt} ? {R0} : {2*R0}" --tc1 2e-3
//! spice-line capacitor C2 a b "1u*atan(V(a,b))" --kind q
//! spice-line independent VIN 1 0 --dc 5 --ac 1 --ac-phase 45
//! spice-line dependent G1 2 0 5 0 --kind g --value 0.1 -m 2
//! ```

use clap::{Parser, Subcommand};
use spice_elements::{
    error::Result, BehavioralCapacitor, BehavioralInductor, BehavioralResistor,
    BehavioralSource, CurrentControlledCurrentSource, CurrentControlledVoltageSource,
    DependentKind, Element, IndependentSource, NetlistError, SourceParams, StimulusParams,
    TempCoefficients, VoltageControlledCurrentSource, VoltageControlledVoltageSource,
};

/// SPICE netlist line generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    element: ElementArgs,
}

/// Temperature coefficients shared by every element.
#[derive(clap::Args, Debug)]
struct CoefficientArgs {
    /// First-order temperature coefficient
    #[arg(long)]
    tc1: Option<String>,

    /// Second-order temperature coefficient
    #[arg(long)]
    tc2: Option<String>,
}

impl CoefficientArgs {
    fn into_coefficients(self) -> TempCoefficients {
        TempCoefficients {
            tc1: self.tc1.map(Into::into),
            tc2: self.tc2.map(Into::into),
        }
    }
}

#[derive(Subcommand, Debug)]
enum ElementArgs {
    /// Behavioral voltage or current source (B element)
    Source {
        /// Element name (e.g. B1)
        name: String,
        /// Positive terminal node
        node_pos: String,
        /// Negative terminal node
        node_neg: String,
        /// Source type: 'v' for voltage, 'i' for current
        #[arg(short = 't', long = "type")]
        expr_type: String,
        /// Expression defining the source output
        #[arg(short, long)]
        expr: String,
        #[command(flatten)]
        coefficients: CoefficientArgs,
        /// Instance temperature
        #[arg(long)]
        temp: Option<String>,
        /// Temperature offset
        #[arg(long)]
        dtemp: Option<String>,
    },

    /// Behavioral resistor
    Resistor {
        name: String,
        node1: String,
        node2: String,
        /// Resistance expression
        expr: String,
        #[command(flatten)]
        coefficients: CoefficientArgs,
        /// Enable (true) or disable (false) noise generation
        #[arg(long)]
        noisy: Option<bool>,
    },

    /// Behavioral capacitor
    Capacitor {
        name: String,
        node1: String,
        node2: String,
        /// Capacitance or charge expression
        expr: String,
        /// Expression kind: 'c' for capacitance, 'q' for charge
        #[arg(short, long, default_value = "c")]
        kind: String,
        #[command(flatten)]
        coefficients: CoefficientArgs,
    },

    /// Behavioral inductor
    Inductor {
        name: String,
        node1: String,
        node2: String,
        /// Inductance expression
        expr: String,
        #[command(flatten)]
        coefficients: CoefficientArgs,
    },

    /// Independent voltage or current source (V or I element)
    Independent {
        /// Element name; must begin with V or I
        name: String,
        node_pos: String,
        node_neg: String,
        /// DC value
        #[arg(long)]
        dc: Option<String>,
        /// AC magnitude
        #[arg(long)]
        ac: Option<String>,
        /// AC phase in degrees
        #[arg(long)]
        ac_phase: Option<String>,
    },

    /// Linear dependent source (E, F, G or H element)
    Dependent {
        name: String,
        out_pos: String,
        out_neg: String,
        /// Control nodes (E, G) or the sensing voltage source name (F, H)
        #[arg(required = true, num_args = 1..=2)]
        controls: Vec<String>,
        /// Source kind: e, f, g or h
        #[arg(short, long)]
        kind: String,
        /// Gain, transconductance or transresistance
        #[arg(short, long)]
        value: String,
        /// Output multiplier (F and G only)
        #[arg(short)]
        m: Option<String>,
    },
}

fn independent_line(
    name: String,
    node_pos: String,
    node_neg: String,
    params: StimulusParams,
) -> Result<String> {
    let source = if name.to_ascii_uppercase().starts_with('I') {
        IndependentSource::current(name, node_pos, node_neg, params)?
    } else {
        IndependentSource::voltage(name, node_pos, node_neg, params)?
    };
    Ok(source.render())
}

fn dependent_line(
    name: String,
    out_pos: String,
    out_neg: String,
    controls: Vec<String>,
    kind: DependentKind,
    value: String,
    m: Option<String>,
) -> Result<String> {
    let expected = if kind.is_voltage_controlled() { 2 } else { 1 };
    if controls.len() != expected {
        return Err(NetlistError::invalid_controls(
            kind.to_string(),
            format!("expected {} control(s), got {}", expected, controls.len()),
        ));
    }
    let mut controls = controls.into_iter();
    let first = controls.next().unwrap_or_default();
    let second = controls.next().unwrap_or_default();

    let line = match (kind, m) {
        (DependentKind::Vcvs, _) => {
            VoltageControlledVoltageSource::new(name, out_pos, out_neg, first, second, value)?
                .render()
        }
        (DependentKind::Vccs, None) => {
            VoltageControlledCurrentSource::new(name, out_pos, out_neg, first, second, value)?
                .render()
        }
        (DependentKind::Vccs, Some(m)) => VoltageControlledCurrentSource::with_multiplier(
            name, out_pos, out_neg, first, second, value, m,
        )?
        .render(),
        (DependentKind::Cccs, None) => {
            CurrentControlledCurrentSource::new(name, out_pos, out_neg, first, value)?.render()
        }
        (DependentKind::Cccs, Some(m)) => {
            CurrentControlledCurrentSource::with_multiplier(name, out_pos, out_neg, first, value, m)?
                .render()
        }
        (DependentKind::Ccvs, _) => {
            CurrentControlledVoltageSource::new(name, out_pos, out_neg, first, value)?.render()
        }
    };
    Ok(line)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let line = match args.element {
        ElementArgs::Source {
            name,
            node_pos,
            node_neg,
            expr_type,
            expr,
            coefficients,
            temp,
            dtemp,
        } => {
            let params = SourceParams {
                tc1: coefficients.tc1.map(Into::into),
                tc2: coefficients.tc2.map(Into::into),
                temp: temp.map(Into::into),
                dtemp: dtemp.map(Into::into),
            };
            BehavioralSource::with_params(name, node_pos, node_neg, &expr_type, &expr, params)?
                .render()
        }

        ElementArgs::Resistor {
            name,
            node1,
            node2,
            expr,
            coefficients,
            noisy,
        } => {
            let resistor = BehavioralResistor::new(
                name,
                node1,
                node2,
                &expr,
                coefficients.into_coefficients(),
            )?;
            match noisy {
                Some(noisy) => resistor.noisy(noisy).render(),
                None => resistor.render(),
            }
        }

        ElementArgs::Capacitor {
            name,
            node1,
            node2,
            expr,
            kind,
            coefficients,
        } => BehavioralCapacitor::new(
            name,
            node1,
            node2,
            &expr,
            &kind,
            coefficients.into_coefficients(),
        )?
        .render(),

        ElementArgs::Inductor {
            name,
            node1,
            node2,
            expr,
            coefficients,
        } => BehavioralInductor::new(name, node1, node2, &expr, coefficients.into_coefficients())?
            .render(),

        ElementArgs::Independent {
            name,
            node_pos,
            node_neg,
            dc,
            ac,
            ac_phase,
        } => {
            let params = StimulusParams {
                dc: dc.map(Into::into),
                ac_magnitude: ac.map(Into::into),
                ac_phase: ac_phase.map(Into::into),
                ..StimulusParams::default()
            };
            independent_line(name, node_pos, node_neg, params)?
        }

        ElementArgs::Dependent {
            name,
            out_pos,
            out_neg,
            controls,
            kind,
            value,
            m,
        } => dependent_line(name, out_pos, out_neg, controls, kind.parse()?, value, m)?,
    };

    println!("{}", line);

    Ok(())
}
