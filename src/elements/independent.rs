//! Independent voltage and current sources (V and I elements).
//!
//! ```text
//! VCC N010 N000 DC 6
//! VIN N013 N002 DC 1m SIN(0 1 1Meg 0 0 0) AC 1
//! ISRC N023 N021 SFFM(0 1 10K 5 1K 0 0 0) AC 333m 45
//! VMOD N002 N000 DISTOF2 10m 0
//! ```

use log::{debug, warn};

use super::{delegate_to_base, normalize_opt, Element, NodalElement, Node, Polarity, Waveform};
use crate::error::{NetlistError, Result};
use crate::units::Value;

/// Distortion analysis input of an independent source.
#[derive(Debug, Clone, PartialEq)]
pub enum Distortion {
    /// Enabled with the simulator's default magnitude and phase
    Enabled,
    /// Enabled with a magnitude and an optional phase in degrees
    Level { magnitude: Value, phase: Option<Value> },
}

impl Distortion {
    /// Distortion input with the given magnitude and zero phase.
    pub fn level(magnitude: impl Into<Value>) -> Self {
        Distortion::Level {
            magnitude: magnitude.into(),
            phase: None,
        }
    }

    /// Distortion input with the given magnitude and phase.
    pub fn with_phase(magnitude: impl Into<Value>, phase: impl Into<Value>) -> Self {
        Distortion::Level {
            magnitude: magnitude.into(),
            phase: Some(phase.into()),
        }
    }

    fn normalize(&self, tag: &str) -> Result<String> {
        match self {
            Distortion::Enabled => Ok(tag.to_string()),
            Distortion::Level { magnitude, phase } => {
                let phase = normalize_opt(phase.as_ref())?.unwrap_or_else(|| "0".to_string());
                Ok(format!("{} {} {}", tag, magnitude.normalize()?, phase))
            }
        }
    }
}

/// Stimulus of an independent source.
///
/// Every field is optional and rendered only when present; a supplied zero
/// is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StimulusParams {
    /// DC and transient flat value
    pub dc: Option<Value>,
    /// Transient waveform function
    pub waveform: Option<Waveform>,
    /// AC analysis magnitude
    pub ac_magnitude: Option<Value>,
    /// AC analysis phase in degrees, used only with a magnitude
    pub ac_phase: Option<Value>,
    /// First distortion input
    pub distof1: Option<Distortion>,
    /// Second distortion input
    pub distof2: Option<Distortion>,
}

impl StimulusParams {
    /// Create an empty stimulus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the DC value.
    pub fn dc(mut self, value: impl Into<Value>) -> Self {
        self.dc = Some(value.into());
        self
    }

    /// Set the transient waveform.
    pub fn waveform(mut self, waveform: impl Into<Waveform>) -> Self {
        self.waveform = Some(waveform.into());
        self
    }

    /// Set the AC magnitude.
    pub fn ac(mut self, magnitude: impl Into<Value>) -> Self {
        self.ac_magnitude = Some(magnitude.into());
        self
    }

    /// Set the AC magnitude and phase.
    pub fn ac_with_phase(mut self, magnitude: impl Into<Value>, phase: impl Into<Value>) -> Self {
        self.ac_magnitude = Some(magnitude.into());
        self.ac_phase = Some(phase.into());
        self
    }

    /// Set the first distortion input.
    pub fn distof1(mut self, distortion: Distortion) -> Self {
        self.distof1 = Some(distortion);
        self
    }

    /// Set the second distortion input.
    pub fn distof2(mut self, distortion: Distortion) -> Self {
        self.distof2 = Some(distortion);
        self
    }
}

/// An independent voltage or current source.
#[derive(Debug, Clone, PartialEq)]
pub struct IndependentSource {
    base: NodalElement,
    dc: Option<String>,
    waveform: Option<String>,
    ac_magnitude: Option<String>,
    ac_phase: Option<String>,
}

impl IndependentSource {
    /// Create an independent source without checking its name.
    ///
    /// Stimulus tokens are emitted in the order `DC`, waveform, `AC`,
    /// `DISTOF1`, `DISTOF2`.
    pub fn new(
        name: impl Into<String>,
        node_pos: impl Into<Node>,
        node_neg: impl Into<Node>,
        params: StimulusParams,
    ) -> Result<Self> {
        let name = name.into();
        let dc = normalize_opt(params.dc.as_ref())?;
        let waveform = params.waveform.as_ref().map(Waveform::normalize).transpose()?;
        let ac_magnitude = normalize_opt(params.ac_magnitude.as_ref())?;
        let ac_phase = match &ac_magnitude {
            Some(_) => normalize_opt(params.ac_phase.as_ref())?,
            None => {
                if params.ac_phase.is_some() {
                    warn!("source '{}' has an AC phase but no AC magnitude", name);
                }
                None
            }
        };

        let mut tokens = Vec::new();
        if let Some(dc) = &dc {
            tokens.push(format!("DC {}", dc));
        }
        tokens.extend(waveform.clone());
        if let Some(mag) = &ac_magnitude {
            tokens.push(format!("AC {}", mag));
            tokens.extend(ac_phase.clone());
        }
        if let Some(d) = &params.distof1 {
            tokens.push(d.normalize("DISTOF1")?);
        }
        if let Some(d) = &params.distof2 {
            tokens.push(d.normalize("DISTOF2")?);
        }

        let nodes: [Node; 2] = [node_pos.into(), node_neg.into()];
        let source = Self {
            base: NodalElement::new(name, nodes, tokens.join(" ")),
            dc,
            waveform,
            ac_magnitude,
            ac_phase,
        };
        debug!("built independent source: {}", source.render());
        Ok(source)
    }

    /// Create an independent voltage source; the name must begin with `V`.
    pub fn voltage(
        name: impl Into<String>,
        node_pos: impl Into<Node>,
        node_neg: impl Into<Node>,
        params: StimulusParams,
    ) -> Result<Self> {
        let name = checked_name(name.into(), 'V')?;
        Self::new(name, node_pos, node_neg, params)
    }

    /// Create an independent current source; the name must begin with `I`.
    pub fn current(
        name: impl Into<String>,
        node_pos: impl Into<Node>,
        node_neg: impl Into<Node>,
        params: StimulusParams,
    ) -> Result<Self> {
        let name = checked_name(name.into(), 'I')?;
        Self::new(name, node_pos, node_neg, params)
    }

    /// Whether this is a voltage or current source, judged by its name.
    pub fn polarity(&self) -> Option<Polarity> {
        match self.base.name().chars().next()?.to_ascii_uppercase() {
            'V' => Some(Polarity::Voltage),
            'I' => Some(Polarity::Current),
            _ => None,
        }
    }

    pub fn dc(&self) -> Option<&str> {
        self.dc.as_deref()
    }

    /// The rendered transient waveform, if any.
    pub fn waveform(&self) -> Option<&str> {
        self.waveform.as_deref()
    }

    pub fn ac_magnitude(&self) -> Option<&str> {
        self.ac_magnitude.as_deref()
    }

    pub fn ac_phase(&self) -> Option<&str> {
        self.ac_phase.as_deref()
    }
}

fn checked_name(name: String, letter: char) -> Result<String> {
    match name.chars().next() {
        Some(c) if c.eq_ignore_ascii_case(&letter) => Ok(name),
        _ => Err(NetlistError::invalid_name(name, letter)),
    }
}

impl Element for IndependentSource {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn render(&self) -> String {
        self.base.render_with(std::iter::empty())
    }
}

delegate_to_base!(IndependentSource);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{HasValue, Pulse, Pwl, Sffm, Sin, TrNoise};

    #[test]
    fn test_dc_source() {
        let v = IndependentSource::new("VCC", 10, 0, StimulusParams::new().dc(6)).unwrap();
        assert_eq!(v.render(), "VCC N010 N000 DC 6");
        assert_eq!(v.dc(), Some("6"));
    }

    #[test]
    fn test_dc_zero_kept() {
        let v = IndependentSource::new("V0", 1, 0, StimulusParams::new().dc(0)).unwrap();
        assert_eq!(v.render(), "V0 N001 N000 DC 0");
    }

    #[test]
    fn test_dc_waveform_and_ac() {
        let params = StimulusParams::new()
            .dc(0.001)
            .ac(1)
            .waveform(Sin::new(0, 1, "1MEG"));
        let v = IndependentSource::new("VIN", 13, 2, params).unwrap();
        assert_eq!(v.render(), "VIN N013 N002 DC 1m SIN(0 1 1Meg 0 0 0) AC 1");
        assert_eq!(v.waveform(), Some("SIN(0 1 1Meg 0 0 0)"));
    }

    #[test]
    fn test_waveform_without_dc() {
        let params = StimulusParams::new()
            .ac_with_phase(0.333, 45.0)
            .waveform(Sffm::new(0, 1, "10K", 5, "1K"));
        let i = IndependentSource::new("ISRC", 23, 21, params).unwrap();
        assert_eq!(
            i.render(),
            "ISRC N023 N021 SFFM(0 1 10K 5 1K 0 0 0) AC 333m 45"
        );
        assert_eq!(i.ac_phase(), Some("45"));
    }

    #[test]
    fn test_distortion_inputs() {
        let params = StimulusParams::new().distof2(Distortion::level(0.01));
        let v = IndependentSource::new("VMOD", 2, 0, params).unwrap();
        assert_eq!(v.render(), "VMOD N002 N000 DISTOF2 10m 0");

        let params = StimulusParams::new()
            .distof1(Distortion::Enabled)
            .distof2(Distortion::with_phase("1m", 90));
        let v = IndependentSource::new("VMOD", 2, 0, params).unwrap();
        assert_eq!(v.render(), "VMOD N002 N000 DISTOF1 DISTOF2 1m 90");
    }

    #[test]
    fn test_ac_phase_needs_magnitude() {
        let params = StimulusParams {
            ac_phase: Some(Value::from(45)),
            ..StimulusParams::new().dc(1)
        };
        let v = IndependentSource::new("V1", 1, 0, params).unwrap();
        assert_eq!(v.render(), "V1 N001 N000 DC 1");
        assert_eq!(v.ac_phase(), None);
    }

    #[test]
    fn test_empty_stimulus() {
        let v = IndependentSource::new("V1", 1, 0, StimulusParams::new()).unwrap();
        assert_eq!(v.render(), "V1 N001 N000");
        assert_eq!(v.value(), "");
    }

    #[test]
    fn test_voltage_and_current_constructors() {
        let params = StimulusParams::new().dc("5").ac("1").waveform(Sin::new(0, 1, "1k"));
        let v = IndependentSource::voltage("VIN", 1, 0, params).unwrap();
        assert_eq!(v.render(), "VIN N001 N000 DC 5 SIN(0 1 1K 0 0 0) AC 1");
        assert_eq!(v.polarity(), Some(Polarity::Voltage));

        let params = StimulusParams::new().ac("1").distof2(Distortion::level(0.001));
        let i = IndependentSource::current("iin", "n1", "n2", params).unwrap();
        assert_eq!(i.render(), "iin n1 n2 AC 1 DISTOF2 1m 0");
        assert_eq!(i.polarity(), Some(Polarity::Current));
    }

    #[test]
    fn test_name_letter_enforced() {
        let err = IndependentSource::voltage("IIN", 1, 0, StimulusParams::new()).unwrap_err();
        assert_eq!(err, NetlistError::invalid_name("IIN", 'V'));

        let err = IndependentSource::current("", 1, 0, StimulusParams::new()).unwrap_err();
        assert_eq!(err, NetlistError::invalid_name("", 'I'));

        let x = IndependentSource::new("X1", 1, 0, StimulusParams::new()).unwrap();
        assert_eq!(x.polarity(), None);
    }

    #[test]
    fn test_waveform_sources() {
        let pulse = Pulse::new(-1, 1)
            .delay("2n")
            .rise("2n")
            .fall("2n")
            .width("50n")
            .period("100n")
            .count(5);
        let v = IndependentSource::voltage("VIN", 3, 0, StimulusParams::new().waveform(pulse))
            .unwrap();
        assert_eq!(v.render(), "VIN N003 N000 PULSE(-1 1 2n 2n 2n 50n 100n 5)");

        let pwl = Pwl::new([("0", "-7"), ("10n", "-7"), ("11n", "-3")]).repeat("10n");
        let v = IndependentSource::voltage("VCLOCK", 7, 5, StimulusParams::new().waveform(pwl))
            .unwrap();
        assert_eq!(v.render(), "VCLOCK N007 N005 PWL(0 -7 10n -7 11n -3) r=10n");

        let noise = TrNoise::new()
            .white("1m", "1u")
            .flicker(1.0, "0.1m")
            .telegraph("15m", "22u", "50u");
        let v = IndependentSource::voltage(
            "VNOISE",
            1,
            0,
            StimulusParams::new().dc(0).waveform(noise),
        )
        .unwrap();
        assert_eq!(
            v.render(),
            "VNOISE N001 N000 DC 0 TRNOISE(1m 1u 1 100u 15m 22u 50u)"
        );
    }

    #[test]
    fn test_invalid_stimulus_rejected() {
        let err = IndependentSource::new("V1", 1, 0, StimulusParams::new().dc("1e400"))
            .unwrap_err();
        assert!(matches!(err, NetlistError::InvalidValue { .. }));

        let params = StimulusParams::new().waveform(Sin::new(0, 1, "1kHz"));
        let err = IndependentSource::new("V1", 1, 0, params).unwrap_err();
        assert!(matches!(err, NetlistError::UnknownSuffix { .. }));
    }
}
