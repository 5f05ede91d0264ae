//! Transient stimulus functions for independent sources.
//!
//! Each function renders as its ngspice keyword followed by a parenthesized,
//! space separated argument list:
//!
//! ```text
//! PULSE(-1 1 2n 2n 2n 50n 100n 5)
//! SIN(0 1 100Meg 1n 10G 0)
//! PWL(0 -7 10n -7 11n -3) r=10n td=15n
//! ```
//!
//! Magnitudes are kept as supplied until the waveform is attached to a
//! source, where they go through the usual normalization.

use crate::error::Result;
use crate::units::Value;

/// Normalize `required` arguments followed by trailing `optional` ones.
///
/// Arguments are positional, so an unset optional argument that precedes a
/// set one is emitted as `0`, which ngspice reads as "use the default".
fn positional(required: &[&Value], optional: &[Option<&Value>]) -> Result<Vec<String>> {
    let mut args = required
        .iter()
        .map(|v| v.normalize())
        .collect::<Result<Vec<_>>>()?;

    let used = optional.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
    for value in &optional[..used] {
        args.push(match value {
            Some(v) => v.normalize()?,
            None => "0".to_string(),
        });
    }
    Ok(args)
}

fn call(keyword: &str, args: &[String]) -> String {
    format!("{}({})", keyword, args.join(" "))
}

fn zero() -> Value {
    Value::Number(0.0)
}

/// `PULSE(V1 V2 TD TR TF PW PER NP)`
#[derive(Debug, Clone, PartialEq)]
pub struct Pulse {
    v1: Value,
    v2: Value,
    td: Value,
    tr: Option<Value>,
    tf: Option<Value>,
    pw: Option<Value>,
    per: Option<Value>,
    np: Option<u32>,
}

impl Pulse {
    /// Pulse between an initial and a pulsed value, starting immediately.
    pub fn new(v1: impl Into<Value>, v2: impl Into<Value>) -> Self {
        Self {
            v1: v1.into(),
            v2: v2.into(),
            td: zero(),
            tr: None,
            tf: None,
            pw: None,
            per: None,
            np: None,
        }
    }

    /// Delay before the first pulse.
    pub fn delay(mut self, td: impl Into<Value>) -> Self {
        self.td = td.into();
        self
    }

    /// Rise time.
    pub fn rise(mut self, tr: impl Into<Value>) -> Self {
        self.tr = Some(tr.into());
        self
    }

    /// Fall time.
    pub fn fall(mut self, tf: impl Into<Value>) -> Self {
        self.tf = Some(tf.into());
        self
    }

    /// Pulse width.
    pub fn width(mut self, pw: impl Into<Value>) -> Self {
        self.pw = Some(pw.into());
        self
    }

    /// Repetition period.
    pub fn period(mut self, per: impl Into<Value>) -> Self {
        self.per = Some(per.into());
        self
    }

    /// Number of pulses; `0` means unlimited.
    pub fn count(mut self, np: u32) -> Self {
        self.np = Some(np).filter(|&n| n > 0);
        self
    }

    fn normalize(&self) -> Result<String> {
        let mut args = positional(
            &[&self.v1, &self.v2, &self.td],
            &[
                self.tr.as_ref(),
                self.tf.as_ref(),
                self.pw.as_ref(),
                self.per.as_ref(),
            ],
        )?;
        // The pulse count is a plain integer, never a scaled magnitude
        if let Some(np) = self.np {
            args.resize(7, "0".to_string());
            args.push(np.to_string());
        }
        Ok(call("PULSE", &args))
    }
}

/// `SIN(VO VA FREQ TD THETA PHASE)`
#[derive(Debug, Clone, PartialEq)]
pub struct Sin {
    vo: Value,
    va: Value,
    freq: Value,
    td: Value,
    theta: Value,
    phase: Value,
}

impl Sin {
    /// Undamped sine with the given offset, amplitude and frequency.
    pub fn new(vo: impl Into<Value>, va: impl Into<Value>, freq: impl Into<Value>) -> Self {
        Self {
            vo: vo.into(),
            va: va.into(),
            freq: freq.into(),
            td: zero(),
            theta: zero(),
            phase: zero(),
        }
    }

    pub fn delay(mut self, td: impl Into<Value>) -> Self {
        self.td = td.into();
        self
    }

    /// Damping factor, in 1/s.
    pub fn damping(mut self, theta: impl Into<Value>) -> Self {
        self.theta = theta.into();
        self
    }

    /// Phase, in degrees.
    pub fn phase(mut self, phase: impl Into<Value>) -> Self {
        self.phase = phase.into();
        self
    }

    fn normalize(&self) -> Result<String> {
        let args = positional(
            &[
                &self.vo,
                &self.va,
                &self.freq,
                &self.td,
                &self.theta,
                &self.phase,
            ],
            &[],
        )?;
        Ok(call("SIN", &args))
    }
}

/// `EXP(V1 V2 TD1 TAU1 TD2 TAU2)`
#[derive(Debug, Clone, PartialEq)]
pub struct Exp {
    v1: Value,
    v2: Value,
    td1: Value,
    tau1: Option<Value>,
    td2: Option<Value>,
    tau2: Option<Value>,
}

impl Exp {
    /// Exponential transition between an initial and a pulsed value.
    pub fn new(v1: impl Into<Value>, v2: impl Into<Value>) -> Self {
        Self {
            v1: v1.into(),
            v2: v2.into(),
            td1: zero(),
            tau1: None,
            td2: None,
            tau2: None,
        }
    }

    /// Rise delay time.
    pub fn rise_delay(mut self, td1: impl Into<Value>) -> Self {
        self.td1 = td1.into();
        self
    }

    /// Rise time constant.
    pub fn rise_tau(mut self, tau1: impl Into<Value>) -> Self {
        self.tau1 = Some(tau1.into());
        self
    }

    /// Fall delay time.
    pub fn fall_delay(mut self, td2: impl Into<Value>) -> Self {
        self.td2 = Some(td2.into());
        self
    }

    /// Fall time constant.
    pub fn fall_tau(mut self, tau2: impl Into<Value>) -> Self {
        self.tau2 = Some(tau2.into());
        self
    }

    fn normalize(&self) -> Result<String> {
        let args = positional(
            &[&self.v1, &self.v2, &self.td1],
            &[self.tau1.as_ref(), self.td2.as_ref(), self.tau2.as_ref()],
        )?;
        Ok(call("EXP", &args))
    }
}

/// `PWL(T1 V1 T2 V2 ...) r=R td=TD`
#[derive(Debug, Clone, PartialEq)]
pub struct Pwl {
    points: Vec<(Value, Value)>,
    repeat: Option<Value>,
    td: Option<Value>,
}

impl Pwl {
    /// Piecewise linear waveform through `(time, value)` corners.
    pub fn new<I, T, V>(points: I) -> Self
    where
        I: IntoIterator<Item = (T, V)>,
        T: Into<Value>,
        V: Into<Value>,
    {
        Self {
            points: points
                .into_iter()
                .map(|(t, v)| (t.into(), v.into()))
                .collect(),
            repeat: None,
            td: None,
        }
    }

    /// Time point the waveform repeats from.
    pub fn repeat(mut self, r: impl Into<Value>) -> Self {
        self.repeat = Some(r.into());
        self
    }

    pub fn delay(mut self, td: impl Into<Value>) -> Self {
        self.td = Some(td.into());
        self
    }

    fn normalize(&self) -> Result<String> {
        let mut args = Vec::with_capacity(self.points.len() * 2);
        for (t, v) in &self.points {
            args.push(t.normalize()?);
            args.push(v.normalize()?);
        }

        let mut text = call("PWL", &args);
        if let Some(r) = &self.repeat {
            text.push_str(&format!(" r={}", r.normalize()?));
        }
        if let Some(td) = &self.td {
            text.push_str(&format!(" td={}", td.normalize()?));
        }
        Ok(text)
    }
}

/// `SFFM(VO VA FC MDI FS TD PHASEC PHASES)`
#[derive(Debug, Clone, PartialEq)]
pub struct Sffm {
    vo: Value,
    va: Value,
    fc: Value,
    mdi: Value,
    fs: Value,
    td: Value,
    phasec: Value,
    phases: Value,
}

impl Sffm {
    /// Single-frequency FM: offset, amplitude, carrier frequency,
    /// modulation index and signal frequency.
    pub fn new(
        vo: impl Into<Value>,
        va: impl Into<Value>,
        fc: impl Into<Value>,
        mdi: impl Into<Value>,
        fs: impl Into<Value>,
    ) -> Self {
        Self {
            vo: vo.into(),
            va: va.into(),
            fc: fc.into(),
            mdi: mdi.into(),
            fs: fs.into(),
            td: zero(),
            phasec: zero(),
            phases: zero(),
        }
    }

    pub fn delay(mut self, td: impl Into<Value>) -> Self {
        self.td = td.into();
        self
    }

    /// Carrier and signal phases, in degrees.
    pub fn phases(mut self, carrier: impl Into<Value>, signal: impl Into<Value>) -> Self {
        self.phasec = carrier.into();
        self.phases = signal.into();
        self
    }

    fn normalize(&self) -> Result<String> {
        let args = positional(
            &[
                &self.vo,
                &self.va,
                &self.fc,
                &self.mdi,
                &self.fs,
                &self.td,
                &self.phasec,
                &self.phases,
            ],
            &[],
        )?;
        Ok(call("SFFM", &args))
    }
}

/// `AM(VO VMO VMA FM FC TD PHASEM PHASEC)`
#[derive(Debug, Clone, PartialEq)]
pub struct Am {
    vo: Value,
    vmo: Value,
    vma: Value,
    fm: Value,
    fc: Value,
    td: Value,
    phasem: Value,
    phasec: Value,
}

impl Am {
    /// Amplitude modulation with unit modulation amplitude.
    pub fn new(
        vo: impl Into<Value>,
        vmo: impl Into<Value>,
        fm: impl Into<Value>,
        fc: impl Into<Value>,
    ) -> Self {
        Self {
            vo: vo.into(),
            vmo: vmo.into(),
            vma: Value::Number(1.0),
            fm: fm.into(),
            fc: fc.into(),
            td: zero(),
            phasem: zero(),
            phasec: zero(),
        }
    }

    /// Modulation signal amplitude.
    pub fn modulation_amplitude(mut self, vma: impl Into<Value>) -> Self {
        self.vma = vma.into();
        self
    }

    pub fn delay(mut self, td: impl Into<Value>) -> Self {
        self.td = td.into();
        self
    }

    /// Modulation and carrier phases, in degrees.
    pub fn phases(mut self, modulation: impl Into<Value>, carrier: impl Into<Value>) -> Self {
        self.phasem = modulation.into();
        self.phasec = carrier.into();
        self
    }

    fn normalize(&self) -> Result<String> {
        let args = positional(
            &[
                &self.vo,
                &self.vmo,
                &self.vma,
                &self.fm,
                &self.fc,
                &self.td,
                &self.phasem,
                &self.phasec,
            ],
            &[],
        )?;
        Ok(call("AM", &args))
    }
}

/// `TRNOISE(NA NT NALPHA NAMP RTSAM RTSCAPT RTSEMT)`
///
/// Every term defaults to zero, which switches that noise component off.
#[derive(Debug, Clone, PartialEq)]
pub struct TrNoise {
    na: Value,
    nt: Value,
    nalpha: Value,
    namp: Value,
    rtsam: Value,
    rtscapt: Value,
    rtsemt: Value,
}

impl Default for TrNoise {
    fn default() -> Self {
        Self {
            na: zero(),
            nt: zero(),
            nalpha: zero(),
            namp: zero(),
            rtsam: zero(),
            rtscapt: zero(),
            rtsemt: zero(),
        }
    }
}

impl TrNoise {
    /// Noise source with every component off.
    pub fn new() -> Self {
        Self::default()
    }

    /// White noise RMS amplitude and sample time step.
    pub fn white(mut self, na: impl Into<Value>, nt: impl Into<Value>) -> Self {
        self.na = na.into();
        self.nt = nt.into();
        self
    }

    /// 1/f noise exponent and RMS amplitude.
    pub fn flicker(mut self, nalpha: impl Into<Value>, namp: impl Into<Value>) -> Self {
        self.nalpha = nalpha.into();
        self.namp = namp.into();
        self
    }

    /// Random telegraph noise amplitude, capture time and emission time.
    pub fn telegraph(
        mut self,
        rtsam: impl Into<Value>,
        rtscapt: impl Into<Value>,
        rtsemt: impl Into<Value>,
    ) -> Self {
        self.rtsam = rtsam.into();
        self.rtscapt = rtscapt.into();
        self.rtsemt = rtsemt.into();
        self
    }

    fn normalize(&self) -> Result<String> {
        let args = positional(
            &[
                &self.na,
                &self.nt,
                &self.nalpha,
                &self.namp,
                &self.rtsam,
                &self.rtscapt,
                &self.rtsemt,
            ],
            &[],
        )?;
        Ok(call("TRNOISE", &args))
    }
}

/// Distribution of a [`TrRandom`] source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RandomDistribution {
    /// PARAM1 is the range, PARAM2 the offset
    Uniform,
    /// PARAM1 is the standard deviation, PARAM2 the mean
    Gaussian,
    /// PARAM1 is the mean, PARAM2 the offset
    Exponential,
    /// PARAM1 is lambda, PARAM2 the offset
    Poisson,
}

impl RandomDistribution {
    /// Numeric type code used by ngspice.
    pub fn code(&self) -> u8 {
        match self {
            RandomDistribution::Uniform => 1,
            RandomDistribution::Gaussian => 2,
            RandomDistribution::Exponential => 3,
            RandomDistribution::Poisson => 4,
        }
    }
}

/// `TRRANDOM(TYPE TS TD PARAM1 PARAM2)`
#[derive(Debug, Clone, PartialEq)]
pub struct TrRandom {
    distribution: RandomDistribution,
    ts: Value,
    td: Option<Value>,
    param1: Option<Value>,
    param2: Option<Value>,
}

impl TrRandom {
    /// Random value drawn from `distribution`, held for `ts` seconds.
    pub fn new(distribution: RandomDistribution, ts: impl Into<Value>) -> Self {
        Self {
            distribution,
            ts: ts.into(),
            td: None,
            param1: None,
            param2: None,
        }
    }

    pub fn delay(mut self, td: impl Into<Value>) -> Self {
        self.td = Some(td.into());
        self
    }

    /// Distribution parameters; their meaning depends on the distribution.
    pub fn params(mut self, param1: impl Into<Value>, param2: impl Into<Value>) -> Self {
        self.param1 = Some(param1.into());
        self.param2 = Some(param2.into());
        self
    }

    fn normalize(&self) -> Result<String> {
        let mut args = vec![self.distribution.code().to_string()];
        args.extend(positional(
            &[&self.ts],
            &[self.td.as_ref(), self.param1.as_ref(), self.param2.as_ref()],
        )?);
        Ok(call("TRRANDOM", &args))
    }
}

/// A transient stimulus for an independent source.
#[derive(Debug, Clone, PartialEq)]
pub enum Waveform {
    Pulse(Pulse),
    Sin(Sin),
    Exp(Exp),
    Pwl(Pwl),
    Sffm(Sffm),
    Am(Am),
    TrNoise(TrNoise),
    TrRandom(TrRandom),
}

impl Waveform {
    /// The ngspice function keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Waveform::Pulse(_) => "PULSE",
            Waveform::Sin(_) => "SIN",
            Waveform::Exp(_) => "EXP",
            Waveform::Pwl(_) => "PWL",
            Waveform::Sffm(_) => "SFFM",
            Waveform::Am(_) => "AM",
            Waveform::TrNoise(_) => "TRNOISE",
            Waveform::TrRandom(_) => "TRRANDOM",
        }
    }

    /// Render the waveform with every magnitude normalized.
    pub fn normalize(&self) -> Result<String> {
        match self {
            Waveform::Pulse(w) => w.normalize(),
            Waveform::Sin(w) => w.normalize(),
            Waveform::Exp(w) => w.normalize(),
            Waveform::Pwl(w) => w.normalize(),
            Waveform::Sffm(w) => w.normalize(),
            Waveform::Am(w) => w.normalize(),
            Waveform::TrNoise(w) => w.normalize(),
            Waveform::TrRandom(w) => w.normalize(),
        }
    }
}

macro_rules! waveform_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Waveform {
                fn from(w: $variant) -> Self {
                    Waveform::$variant(w)
                }
            }
        )*
    };
}

waveform_from!(Pulse, Sin, Exp, Pwl, Sffm, Am, TrNoise, TrRandom);
