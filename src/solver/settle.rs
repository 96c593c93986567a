//! One simulation cycle: source advance, settling, and commit.

use tracing::{trace, warn};

use crate::circuit::{Port, Signal};
use crate::devices::{evaluate_gate, Device, DeviceState, Devices};
use crate::error::NetworkError;

/// Advance `devices` by one cycle.
///
/// 1. Every flip-flop samples its DATA input from the previous cycle's state.
/// 2. Clocks and signal generators advance once.
/// 3. Gates and flip-flops are re-evaluated in passes until a pass changes
///    nothing, or `max_passes` passes have run.
/// 4. Flip-flops commit their new memory and CLK level.
///
/// On failure `devices` is restored to its state before the call.
pub fn execute_cycle(devices: &mut Devices, max_passes: usize) -> Result<usize, NetworkError> {
    let snapshot = devices.clone();
    match run_cycle(devices, max_passes) {
        Ok(passes) => Ok(passes),
        Err(err) => {
            warn!(%err, "cycle failed, restoring state");
            *devices = snapshot;
            Err(err)
        }
    }
}

fn run_cycle(devices: &mut Devices, max_passes: usize) -> Result<usize, NetworkError> {
    sample_data(devices)?;
    tick_sources(devices);
    let passes = settle(devices, max_passes)?;
    commit_flip_flops(devices)?;
    trace!(passes, "cycle settled");
    Ok(passes)
}

/// Level seen at `port` of `device` through its connection.
fn input_level(devices: &Devices, device: &Device, port: Port) -> Result<Signal, NetworkError> {
    let source = device
        .inputs
        .get(&port)
        .copied()
        .flatten()
        .ok_or(NetworkError::UnconnectedInputs)?;
    devices
        .get_device(source.device)
        .and_then(|d| d.outputs.get(&source.port))
        .copied()
        .ok_or(NetworkError::UnconnectedInputs)
}

fn sample_data(devices: &mut Devices) -> Result<(), NetworkError> {
    let mut samples = Vec::new();
    for (index, device) in devices.as_slice().iter().enumerate() {
        if let DeviceState::DType(_) = device.state {
            samples.push((index, input_level(devices, device, Port::Data)?));
        }
    }
    let slice = devices.as_mut_slice();
    for (index, level) in samples {
        if let DeviceState::DType(flip_flop) = &mut slice[index].state {
            flip_flop.data_sample = level;
        }
    }
    Ok(())
}

fn tick_sources(devices: &mut Devices) {
    for device in devices.as_mut_slice() {
        let current = device.primary_output();
        let level = match &mut device.state {
            DeviceState::Clock(clock) => clock.tick(current),
            DeviceState::Siggen(siggen) => siggen.tick(),
            _ => continue,
        };
        device.outputs.insert(None, level);
    }
}

/// New output levels of a device given the current network state.
///
/// Sources keep their outputs during settling and yield `None`.
fn evaluate(devices: &Devices, device: &Device) -> Result<Option<Vec<(Option<Port>, Signal)>>, NetworkError> {
    match &device.state {
        DeviceState::Gate => {
            let inputs = device
                .inputs
                .keys()
                .map(|&port| input_level(devices, device, port))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(evaluate_gate(device.kind, inputs).map(|level| vec![(None, level)]))
        }
        DeviceState::DType(flip_flop) => {
            let clk = input_level(devices, device, Port::Clk)?;
            let set = input_level(devices, device, Port::Set)?;
            let clear = input_level(devices, device, Port::Clear)?;
            let memory = flip_flop.next_memory(clk, set, clear);
            Ok(Some(vec![(Some(Port::Q), memory), (Some(Port::QBar), !memory)]))
        }
        DeviceState::Switch(_) | DeviceState::Clock(_) | DeviceState::Siggen(_) => Ok(None),
    }
}

fn settle(devices: &mut Devices, max_passes: usize) -> Result<usize, NetworkError> {
    for pass in 1..=max_passes {
        let mut changed = false;
        for index in 0..devices.len() {
            let Some(outputs) = evaluate(devices, &devices.as_slice()[index])? else {
                continue;
            };
            let device = &mut devices.as_mut_slice()[index];
            for (port, level) in outputs {
                if device.outputs.insert(port, level) != Some(level) {
                    changed = true;
                }
            }
        }
        if !changed {
            return Ok(pass);
        }
    }
    Err(NetworkError::Oscillating { passes: max_passes })
}

fn commit_flip_flops(devices: &mut Devices) -> Result<(), NetworkError> {
    let mut commits = Vec::new();
    for (index, device) in devices.as_slice().iter().enumerate() {
        if let DeviceState::DType(_) = device.state {
            let clk = input_level(devices, device, Port::Clk)?;
            let memory = device.outputs.get(&Some(Port::Q)).copied().unwrap_or(Signal::Low);
            commits.push((index, memory, clk));
        }
    }
    let slice = devices.as_mut_slice();
    for (index, memory, clk) in commits {
        if let DeviceState::DType(flip_flop) = &mut slice[index].state {
            flip_flop.commit(memory, clk);
        }
    }
    Ok(())
}
