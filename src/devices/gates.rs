//! Combinational gate rules.

use crate::circuit::Signal;

use super::DeviceKind;

/// Evaluate a gate of the given kind over its sampled input levels.
///
/// Returns `None` for kinds that are not combinational gates.
pub fn evaluate<I>(kind: DeviceKind, inputs: I) -> Option<Signal>
where
    I: IntoIterator<Item = Signal>,
{
    let mut inputs = inputs.into_iter();
    let level = match kind {
        DeviceKind::And => inputs.all(Signal::is_high),
        DeviceKind::Nand => !inputs.all(Signal::is_high),
        DeviceKind::Or => inputs.any(Signal::is_high),
        DeviceKind::Nor => !inputs.any(Signal::is_high),
        DeviceKind::Xor => inputs.filter(|s| s.is_high()).count() % 2 == 1,
        DeviceKind::DType | DeviceKind::Switch | DeviceKind::Clock | DeviceKind::Siggen => {
            return None
        }
    };
    Some(Signal::from_bool(level))
}
