use crate::core::item::ItemTemplate;
use crate::core::units::Energy;
use std::fmt::Debug;

/// Something with a fixed energy capacity and a mutable charge, such as a battery cell
/// docked in a compartment.
pub trait EnergyStorage: Debug {
    /// Maximum energy this storage can hold.
    fn declared_capacity(&self) -> Energy;

    fn current_energy(&self) -> Energy;

    /// Sets the stored energy, clamped to `[0, declared_capacity]`.
    fn set_current_energy(&mut self, energy: Energy);

    /// Smallest amount this storage can hold; charge is always a whole multiple of it.
    fn storage_unit(&self) -> Energy {
        Energy::from_kilojoule(1)
    }

    /// Energy that can still be stored before the storage is full.
    fn headroom(&self) -> Energy {
        self.declared_capacity()
            .saturating_sub(self.current_energy())
            .max(Energy::ZERO)
    }
}

/// Whether instances of `template` can store energy, i.e. the template declares a nonzero
/// energy capacity. Independent of whatever else the template can do.
pub fn acts_as_battery(template: &ItemTemplate) -> bool {
    template
        .energy_capacity
        .is_some_and(|capacity| capacity.is_positive())
}
