use super::battery::EnergyStorage;
use crate::core::units::Energy;
use tracing::debug;

/// A character's internal bionic power pool.
///
/// The maximum is set by whoever owns the installed bionics; the reservoir only keeps its
/// own charge inside `[0, max]`. Energy held by docked batteries is passed in to
/// [`PowerReservoir::mod_power_level`] so that charging and draining can spill over into
/// them.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PowerReservoir {
    current: Energy,
    max: Energy,
}

impl PowerReservoir {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn power_level(&self) -> Energy {
        self.current
    }

    pub fn max_power_level(&self) -> Energy {
        self.max
    }

    /// Free room in the reservoir itself.
    pub fn headroom(&self) -> Energy {
        self.max.saturating_sub(self.current).max(Energy::ZERO)
    }

    /// Sets the capacity, clamping the current charge to it.
    pub fn set_max_power_level(&mut self, max: Energy) {
        self.max = max.max(Energy::ZERO);
        self.current = self.current.clamp_to_capacity(self.max);
    }

    pub fn set_power_level(&mut self, target: Energy) {
        self.current = target.clamp_to_capacity(self.max);
    }

    /// Adds `delta` to the combined pool formed by this reservoir and `devices`.
    ///
    /// Charging fills the reservoir before any device; draining empties the devices, in
    /// order, before the reservoir. Devices only hold whole multiples of their storage unit,
    /// so a sub-unit remainder is settled against the reservoir where it has the room (or
    /// charge) to absorb it. Whatever no store can take is discarded.
    pub fn mod_power_level(&mut self, delta: Energy, devices: &mut [&mut dyn EnergyStorage]) {
        if delta.is_negative() {
            self.drain(-delta, devices);
        } else if delta.is_positive() {
            self.charge(delta, devices);
        }
    }

    fn charge(&mut self, amount: Energy, devices: &mut [&mut dyn EnergyStorage]) {
        let to_reservoir = amount.min(self.headroom());
        self.current += to_reservoir;
        let mut remaining = amount - to_reservoir;

        for device in devices.iter_mut() {
            if remaining.is_zero() {
                break;
            }
            let unit = device.storage_unit();
            let whole = remaining.truncate_to(unit);
            let headroom = device.headroom();
            let mut stored = whole.min(headroom).truncate_to(unit);
            remaining -= stored;

            // The remainder is now less than one unit. Round it up into the device, with the
            // reservoir covering the difference.
            let fraction = remaining;
            if stored == whole
                && fraction.is_positive()
                && headroom - stored >= unit
                && self.current >= unit - fraction
            {
                stored += unit;
                self.current -= unit - fraction;
                remaining = Energy::ZERO;
            }

            debug!(%stored, %remaining, "charging docked device");
            let current = device.current_energy();
            device.set_current_energy(current + stored);
        }

        if remaining.is_positive() {
            debug!(discarded = %remaining, "combined power storage is full");
        }
    }

    fn drain(&mut self, amount: Energy, devices: &mut [&mut dyn EnergyStorage]) {
        let mut remaining = amount;

        for device in devices.iter_mut() {
            if remaining.is_zero() {
                break;
            }
            let unit = device.storage_unit();
            let whole = remaining.truncate_to(unit);
            let available = device.current_energy();
            let mut taken = whole.min(available).truncate_to(unit);
            remaining -= taken;

            // Take one more unit from the device and refund the excess to the reservoir. When
            // the reservoir can neither take the refund nor pay the fraction itself, the device
            // still pays and whatever refund does not fit is lost.
            let fraction = remaining;
            if taken == whole && fraction.is_positive() && available - taken >= unit {
                let refund = unit - fraction;
                if self.headroom() >= refund || self.current < fraction {
                    let kept = refund.min(self.headroom());
                    taken += unit;
                    self.current += kept;
                    remaining = Energy::ZERO;
                    if kept < refund {
                        let discarded = refund - kept;
                        debug!(%discarded, "reservoir has no room for the refund");
                    }
                }
            }

            debug!(%taken, %remaining, "draining docked device");
            device.set_current_energy(available - taken);
        }

        debug!(%remaining, "draining bionic power");
        self.current = self.current.saturating_sub(remaining).max(Energy::ZERO);
    }
}
