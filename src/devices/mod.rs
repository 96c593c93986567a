//! Device models for logic simulation.
//!
//! This module provides the catalog of device kinds:
//! - Gates: AND, OR, NAND, NOR (1 to 16 inputs), XOR (2 inputs)
//! - Storage: DTYPE edge-triggered flip-flop
//! - Sources: SWITCH, CLOCK, SIGGEN
//!
//! Each kind fixes its port set and the configuration property it accepts.
//! [`Devices`] owns every instantiated device and is the only place where
//! devices are created or reset.

mod dtype;
mod gates;
mod sources;

pub use dtype::FlipFlop;
pub use gates::evaluate as evaluate_gate;
pub use sources::{Clock, Siggen, Switch, Waveform};

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::circuit::{DeviceId, Port, Signal, SignalRef, MAX_GATE_INPUTS};
use crate::dsl::Keyword;
use crate::error::DeviceError;
use crate::names::Names;

/// The closed set of device kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    And,
    Or,
    Nand,
    Nor,
    Xor,
    DType,
    Switch,
    Clock,
    Siggen,
}

impl DeviceKind {
    /// Gates whose input count is configurable.
    pub fn has_variable_inputs(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Nand | Self::Nor)
    }

    /// Whether devices of this kind advance on their own every cycle.
    pub fn is_timed_source(self) -> bool {
        matches!(self, Self::Clock | Self::Siggen)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Nand => "NAND",
            Self::Nor => "NOR",
            Self::Xor => "XOR",
            Self::DType => "DTYPE",
            Self::Switch => "SWITCH",
            Self::Clock => "CLOCK",
            Self::Siggen => "SIGGEN",
        };
        f.write_str(s)
    }
}

impl TryFrom<Keyword> for DeviceKind {
    type Error = DeviceError;

    fn try_from(keyword: Keyword) -> Result<Self, DeviceError> {
        match keyword {
            Keyword::And => Ok(Self::And),
            Keyword::Or => Ok(Self::Or),
            Keyword::Nand => Ok(Self::Nand),
            Keyword::Nor => Ok(Self::Nor),
            Keyword::Xor => Ok(Self::Xor),
            Keyword::DType => Ok(Self::DType),
            Keyword::Switch => Ok(Self::Switch),
            Keyword::Clock => Ok(Self::Clock),
            Keyword::Siggen => Ok(Self::Siggen),
            _ => Err(DeviceError::BadDevice),
        }
    }
}

/// The configuration value given in a device declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    /// `number_of_inputs`, `initial_state` or `cycle`
    Number(u64),
    /// `waveform`
    Waveform(String),
}

/// Kind-specific internal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceState {
    /// Combinational gates keep no state between cycles.
    Gate,
    Switch(Switch),
    Clock(Clock),
    Siggen(Siggen),
    DType(FlipFlop),
}

/// An instantiated device.
#[derive(Debug, Clone)]
pub struct Device {
    pub id: DeviceId,
    pub kind: DeviceKind,
    /// Every input port, with the output driving it once connected
    pub inputs: BTreeMap<Port, Option<SignalRef>>,
    /// Every output port with its current level; `None` is the unnamed output
    pub outputs: BTreeMap<Option<Port>, Signal>,
    pub state: DeviceState,
}

impl Device {
    /// Level of the single unnamed output, or `Q` for a flip-flop.
    pub fn primary_output(&self) -> Signal {
        self.outputs
            .values()
            .next()
            .copied()
            .unwrap_or(Signal::Low)
    }

    /// Set every output from the memory bit of a flip-flop.
    fn drive_dtype_outputs(&mut self, memory: Signal) {
        self.outputs.insert(Some(Port::Q), memory);
        self.outputs.insert(Some(Port::QBar), !memory);
    }

    fn set_output(&mut self, level: Signal) {
        self.outputs.insert(None, level);
    }
}

/// Registry of every device in the circuit.
#[derive(Debug, Clone)]
pub struct Devices {
    devices: Vec<Device>,
    index: HashMap<DeviceId, usize>,
    rng: StdRng,
}

impl Devices {
    /// Create an empty registry seeded from system entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an empty registry whose clock phases and flip-flop memories
    /// are drawn from a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Replace the random source used by later cold starts.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            devices: Vec::new(),
            index: HashMap::new(),
            rng,
        }
    }

    /// Validate `property` against `kind` and create the device.
    pub fn make_device(
        &mut self,
        id: DeviceId,
        kind: DeviceKind,
        property: Option<Property>,
    ) -> Result<(), DeviceError> {
        if self.index.contains_key(&id) {
            return Err(DeviceError::DevicePresent);
        }

        let device = match kind {
            DeviceKind::And | DeviceKind::Or | DeviceKind::Nand | DeviceKind::Nor => {
                let count = match property {
                    Some(Property::Number(n)) if (1..=MAX_GATE_INPUTS as u64).contains(&n) => n as u8,
                    Some(_) => return Err(DeviceError::InvalidQualifier),
                    None => return Err(DeviceError::NoQualifier),
                };
                Self::gate(id, kind, count)
            }

            DeviceKind::Xor => {
                if property.is_some() {
                    return Err(DeviceError::QualifierPresent);
                }
                Self::gate(id, kind, 2)
            }

            DeviceKind::Switch => {
                let level = match property {
                    Some(Property::Number(0)) => Signal::Low,
                    Some(Property::Number(1)) => Signal::High,
                    Some(_) => return Err(DeviceError::InvalidQualifier),
                    None => return Err(DeviceError::NoQualifier),
                };
                Device {
                    id,
                    kind,
                    inputs: BTreeMap::new(),
                    outputs: BTreeMap::from([(None, level)]),
                    state: DeviceState::Switch(Switch::new(level)),
                }
            }

            DeviceKind::Clock => {
                let half_period = match property {
                    Some(Property::Number(n)) if n > 0 => n,
                    Some(_) => return Err(DeviceError::InvalidQualifier),
                    None => return Err(DeviceError::NoQualifier),
                };
                let counter = self.rng.gen_range(0..half_period);
                let level = Signal::from_bool(self.rng.gen());
                Device {
                    id,
                    kind,
                    inputs: BTreeMap::new(),
                    outputs: BTreeMap::from([(None, level)]),
                    state: DeviceState::Clock(Clock::new(half_period, counter)),
                }
            }

            DeviceKind::Siggen => {
                let waveform = match property {
                    Some(Property::Waveform(text)) => {
                        Waveform::compile(&text).ok_or(DeviceError::InvalidQualifier)?
                    }
                    Some(_) => return Err(DeviceError::InvalidQualifier),
                    None => return Err(DeviceError::NoQualifier),
                };
                Device {
                    id,
                    kind,
                    inputs: BTreeMap::new(),
                    outputs: BTreeMap::from([(None, waveform.start)]),
                    state: DeviceState::Siggen(Siggen::new(waveform)),
                }
            }

            DeviceKind::DType => {
                if property.is_some() {
                    return Err(DeviceError::QualifierPresent);
                }
                let memory = Signal::from_bool(self.rng.gen());
                Device {
                    id,
                    kind,
                    inputs: [Port::Data, Port::Clk, Port::Set, Port::Clear]
                        .into_iter()
                        .map(|port| (port, None))
                        .collect(),
                    outputs: BTreeMap::from([
                        (Some(Port::Q), Signal::Low),
                        (Some(Port::QBar), Signal::Low),
                    ]),
                    state: DeviceState::DType(FlipFlop::new(memory)),
                }
            }
        };

        debug!(device = %id, %kind, "device created");
        self.index.insert(id, self.devices.len());
        self.devices.push(device);
        Ok(())
    }

    fn gate(id: DeviceId, kind: DeviceKind, inputs: u8) -> Device {
        Device {
            id,
            kind,
            inputs: (1..=inputs).map(|n| (Port::Input(n), None)).collect(),
            outputs: BTreeMap::from([(None, Signal::Low)]),
            state: DeviceState::Gate,
        }
    }

    /// Look up a device by id.
    pub fn get_device(&self, id: DeviceId) -> Option<&Device> {
        self.index.get(&id).map(|&i| &self.devices[i])
    }

    pub fn get_device_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        self.index.get(&id).map(|&i| &mut self.devices[i])
    }

    /// Ids of all devices of `kind` (or all devices), in declaration order.
    pub fn find_devices(&self, kind: Option<DeviceKind>) -> Vec<DeviceId> {
        self.devices
            .iter()
            .filter(|d| kind.map_or(true, |k| d.kind == k))
            .map(|d| d.id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub(crate) fn as_slice(&self) -> &[Device] {
        &self.devices
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Device] {
        &mut self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Change a switch level. Returns `false` if `id` is not a switch.
    pub fn set_switch(&mut self, id: DeviceId, level: Signal) -> bool {
        match self.get_device_mut(id) {
            Some(device) => match &mut device.state {
                DeviceState::Switch(switch) => {
                    switch.level = level;
                    device.set_output(level);
                    true
                }
                _ => false,
            },
            None => false,
        }
    }

    /// Put every stateful device into a fresh, valid starting condition.
    ///
    /// Clock phases and flip-flop memories are redrawn; signal generators
    /// rewind; gate outputs drop to LOW. Switch levels and wiring are kept.
    pub fn cold_startup(&mut self) {
        let rng = &mut self.rng;
        for device in &mut self.devices {
            match &mut device.state {
                DeviceState::Gate => {
                    for level in device.outputs.values_mut() {
                        *level = Signal::Low;
                    }
                }
                DeviceState::Switch(_) => {}
                DeviceState::Clock(clock) => {
                    clock.counter = rng.gen_range(0..clock.half_period);
                    let level = Signal::from_bool(rng.gen());
                    device.set_output(level);
                }
                DeviceState::Siggen(siggen) => {
                    siggen.reset();
                    let level = siggen.waveform.start;
                    device.set_output(level);
                }
                DeviceState::DType(flip_flop) => {
                    let memory = Signal::from_bool(rng.gen());
                    *flip_flop = FlipFlop::new(memory);
                    device.drive_dtype_outputs(memory);
                }
            }
        }
        debug!(devices = self.devices.len(), "cold startup");
    }

    /// Qualified signal name for a device port, e.g. `"D1.QBAR"` or `"G1"`.
    pub fn get_signal_name(&self, names: &Names, id: DeviceId, port: Option<Port>) -> Option<String> {
        self.get_device(id)?;
        Some(SignalRef::new(id, port).qualified_name(names))
    }

    /// Resolve a qualified signal name to a device and port.
    ///
    /// Does not intern anything: unknown device names resolve to `None`.
    pub fn get_signal_ids(&self, names: &Names, signal_name: &str) -> Option<SignalRef> {
        let (device, port) = match signal_name.split_once('.') {
            Some((device, port)) => (device, Some(Port::from_name(port)?)),
            None => (signal_name, None),
        };
        let id = names.query(device)?;
        self.get_device(id)?;
        Some(SignalRef::new(id, port))
    }
}

impl Default for Devices {
    fn default() -> Self {
        Self::new()
    }
}
