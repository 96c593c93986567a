//! Network validation.

use super::{Network, SignalRef};

/// Every input port with no connection, in device declaration order.
pub fn unconnected_inputs(network: &Network) -> Vec<SignalRef> {
    network
        .devices()
        .iter()
        .flat_map(|device| {
            device
                .inputs
                .iter()
                .filter(|(_, source)| source.is_none())
                .map(move |(&port, _)| SignalRef::new(device.id, Some(port)))
        })
        .collect()
}

/// Check that the network is ready for simulation.
///
/// True iff every declared input of every device is connected.
pub fn check_network(network: &Network) -> bool {
    network
        .devices()
        .iter()
        .all(|device| device.inputs.values().all(Option::is_some))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Port;
    use crate::devices::{DeviceKind, Devices, Property};
    use crate::names::Names;

    #[test]
    fn test_check_network() {
        let mut names = Names::new();
        let [sw, g] = [names.lookup_one("Sw"), names.lookup_one("G")];
        let mut devices = Devices::with_seed(0);
        devices.make_device(sw, DeviceKind::Switch, Some(Property::Number(1))).unwrap();
        devices.make_device(g, DeviceKind::Nand, Some(Property::Number(2))).unwrap();
        let mut network = Network::new(devices);

        assert!(!check_network(&network));
        assert_eq!(unconnected_inputs(&network).len(), 2);

        let output = SignalRef::new(sw, None);
        network.make_connection(SignalRef::new(g, Some(Port::Input(1))), output).unwrap();
        assert!(!check_network(&network));
        assert_eq!(
            unconnected_inputs(&network),
            vec![SignalRef::new(g, Some(Port::Input(2)))]
        );

        network.make_connection(SignalRef::new(g, Some(Port::Input(2))), output).unwrap();
        assert!(check_network(&network));
        assert!(unconnected_inputs(&network).is_empty());
    }

    #[test]
    fn test_empty_network_is_complete() {
        assert!(check_network(&Network::default()));
    }
}
