//! Connection graph between device ports.

use tracing::debug;

use super::types::{Port, Signal, SignalRef};
use crate::devices::{Device, Devices};
use crate::error::NetworkError;
use crate::solver;

/// All devices of a circuit together with their wiring.
///
/// Each input port records the single output driving it; outputs fan out
/// freely and are not tracked on the driving side.
#[derive(Debug, Clone, Default)]
pub struct Network {
    devices: Devices,
}

impl Network {
    /// Create a network over an existing device registry.
    pub fn new(devices: Devices) -> Self {
        Self { devices }
    }

    pub fn devices(&self) -> &Devices {
        &self.devices
    }

    pub fn devices_mut(&mut self) -> &mut Devices {
        &mut self.devices
    }

    /// Connect an output port to an input port.
    ///
    /// The two endpoints may be given in either order. On failure nothing
    /// is changed.
    pub fn make_connection(
        &mut self,
        first: SignalRef,
        second: SignalRef,
    ) -> Result<(), NetworkError> {
        let first_device = self
            .devices
            .get_device(first.device)
            .ok_or(NetworkError::DeviceAbsent)?;
        let second_device = self
            .devices
            .get_device(second.device)
            .ok_or(NetworkError::DeviceAbsent)?;

        let (input, input_port, output) = if let Some(port) = input_port_of(first_device, first) {
            if first_device.inputs[&port].is_some() {
                return Err(NetworkError::InputConnected);
            }
            if input_port_of(second_device, second).is_some() {
                return Err(NetworkError::InputToInput);
            }
            if !is_output_of(second_device, second) {
                return Err(NetworkError::PortAbsent);
            }
            (first, port, second)
        } else if is_output_of(first_device, first) {
            if is_output_of(second_device, second) {
                return Err(NetworkError::OutputToOutput);
            }
            let port = input_port_of(second_device, second).ok_or(NetworkError::PortAbsent)?;
            if second_device.inputs[&port].is_some() {
                return Err(NetworkError::InputConnected);
            }
            (second, port, first)
        } else {
            return Err(NetworkError::PortAbsent);
        };

        if let Some(device) = self.devices.get_device_mut(input.device) {
            device.inputs.insert(input_port, Some(output));
        }
        debug!(to = %input.device, port = %input_port, from = %output.device, "connected");
        Ok(())
    }

    /// The output driving `input`, if it is connected.
    pub fn get_connected_output(&self, input: SignalRef) -> Option<SignalRef> {
        let port = input.port?;
        *self.devices.get_device(input.device)?.inputs.get(&port)?
    }

    /// Current level of an output port.
    pub fn get_output_signal(&self, output: SignalRef) -> Option<Signal> {
        self.devices
            .get_device(output.device)?
            .outputs
            .get(&output.port)
            .copied()
    }

    /// Current level seen at an input port, through its connection.
    pub fn get_input_signal(&self, input: SignalRef) -> Option<Signal> {
        self.get_output_signal(self.get_connected_output(input)?)
    }

    /// Advance the whole circuit by one cycle.
    ///
    /// Settling is bounded by one pass per device. Returns the number of
    /// passes used; on failure the circuit is left as it was before the call.
    pub fn execute_network(&mut self) -> Result<usize, NetworkError> {
        let limit = self.devices.len().max(1);
        self.execute_network_with_limit(limit)
    }

    /// Advance one cycle with an explicit settling pass limit.
    pub fn execute_network_with_limit(&mut self, max_passes: usize) -> Result<usize, NetworkError> {
        solver::execute_cycle(&mut self.devices, max_passes)
    }
}

fn input_port_of(device: &Device, signal: SignalRef) -> Option<Port> {
    signal.port.filter(|port| device.inputs.contains_key(port))
}

fn is_output_of(device: &Device, signal: SignalRef) -> bool {
    device.outputs.contains_key(&signal.port)
}
