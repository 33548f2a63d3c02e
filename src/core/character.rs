use crate::core::bionics::{BionicDefinition, InstalledBionics};
use crate::core::energy_supply::battery::EnergyStorage;
use crate::core::energy_supply::reservoir::PowerReservoir;
use crate::core::energy_supply::ups;
use crate::core::item::{Item, PocketError};
use crate::core::units::Energy;
use std::sync::Arc;
use tracing::{debug, warn};

/// A character's bionic power, together with the items that can feed it.
#[derive(Clone, Debug, Default)]
pub struct Character {
    reservoir: PowerReservoir,
    bionics: InstalledBionics,
    worn: Vec<Item>,
    inventory: Vec<Item>,
}

impl Character {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn bionics(&self) -> &InstalledBionics {
        &self.bionics
    }

    pub fn worn(&self) -> &[Item] {
        &self.worn
    }

    pub fn inventory(&self) -> &[Item] {
        &self.inventory
    }

    pub fn add_bionic(&mut self, definition: Arc<BionicDefinition>) {
        debug!(bionic = %definition.id, "installing bionic");
        self.bionics.install(definition);
        self.recalculate_max_power_level();
    }

    /// Uninstalls a bionic. A battery docked in a compartment it granted goes back to the
    /// inventory with its charge. Returns whether the bionic was installed.
    pub fn remove_bionic(&mut self, id: &str) -> bool {
        let Some(removed) = self.bionics.remove(id) else {
            warn!(bionic = id, "bionic is not installed");
            return false;
        };
        if let Some(battery) = removed
            .into_compartment()
            .and_then(|mut compartment| compartment.remove_contents())
        {
            debug!(battery = battery.id(), "returning docked battery to inventory");
            self.inventory.push(battery);
        }
        self.recalculate_max_power_level();

        true
    }

    /// Uninstalls every bionic and empties the reservoir.
    pub fn clear_bionics(&mut self) {
        for bionic in self.bionics.clear() {
            if let Some(battery) = bionic
                .into_compartment()
                .and_then(|mut compartment| compartment.remove_contents())
            {
                self.inventory.push(battery);
            }
        }
        self.set_power_level(Energy::ZERO);
        self.set_max_power_level(Energy::ZERO);
    }

    fn recalculate_max_power_level(&mut self) {
        self.set_max_power_level(self.bionics.total_capacity());
    }

    pub fn set_max_power_level(&mut self, max: Energy) {
        self.reservoir.set_max_power_level(max);
    }

    /// Charge in the bionic reservoir alone.
    pub fn get_power_level(&self) -> Energy {
        self.reservoir.power_level()
    }

    pub fn get_max_power_level(&self) -> Energy {
        self.reservoir.max_power_level()
    }

    /// Charge in the reservoir plus every docked battery.
    pub fn get_whole_power_level(&self) -> Energy {
        self.get_power_level()
            + self
                .bionics
                .docked_devices()
                .map(|device| device.current_energy())
                .sum::<Energy>()
    }

    /// Capacity of the reservoir plus every docked battery.
    pub fn get_whole_max_power_level(&self) -> Energy {
        self.get_max_power_level()
            + self
                .bionics
                .docked_devices()
                .map(|device| device.declared_capacity())
                .sum::<Energy>()
    }

    /// Sets the reservoir's charge, leaving docked batteries alone.
    pub fn set_power_level(&mut self, energy: Energy) {
        self.reservoir.set_power_level(energy);
    }

    /// Charges or drains the reservoir and docked batteries together.
    pub fn mod_power_level(&mut self, delta: Energy) {
        let mut devices = self
            .bionics
            .docked_devices_mut()
            .map(|device| device as &mut dyn EnergyStorage)
            .collect::<Vec<_>>();
        self.reservoir.mod_power_level(delta, &mut devices);
    }

    pub fn has_power(&self) -> bool {
        self.get_power_level().is_positive()
    }

    pub fn has_max_power(&self) -> bool {
        self.get_max_power_level().is_positive()
    }

    /// Adds an item to the inventory, returning it in place.
    pub fn i_add(&mut self, item: Item) -> &mut Item {
        self.inventory.push(item);
        let last = self.inventory.len() - 1;
        &mut self.inventory[last]
    }

    pub fn wear_item(&mut self, item: Item) -> &mut Item {
        self.worn.push(item);
        let last = self.worn.len() - 1;
        &mut self.worn[last]
    }

    /// First inventory item with this template.
    pub fn inventory_item_mut(&mut self, template_id: &str) -> Option<&mut Item> {
        self.inventory.iter_mut().find(|item| item.id() == template_id)
    }

    /// Docks the first inventory item of template `item` into the container of template
    /// `container`, searched for among bionic compartments, worn items and the inventory
    /// in that order. Nothing changes when the item does not fit.
    pub fn reload(&mut self, container: &str, item: &str) -> Result<(), PocketError> {
        let result = self.try_reload(container, item);
        if let Err(e) = &result {
            warn!(container, item, "could not reload: {e}");
        }

        result
    }

    fn try_reload(&mut self, container: &str, item: &str) -> Result<(), PocketError> {
        let container_index = self.inventory_container_index(container);
        let item_index = (0..self.inventory.len())
            .find(|&index| {
                self.inventory[index].id() == item && Some(index) != container_index
            })
            .ok_or_else(|| PocketError::NotFound(item.to_owned()))?;

        self.container(container)
            .ok_or_else(|| PocketError::NotFound(container.to_owned()))?
            .can_contain(&self.inventory[item_index])?;

        let loaded = self.inventory.remove(item_index);
        debug!(container, item, energy = %loaded.energy_remaining(), "reloading");
        self.container_mut(container)
            .ok_or_else(|| PocketError::NotFound(container.to_owned()))?
            .put_in(loaded)
    }

    /// Index of the container in the inventory, unless a compartment or worn item matches first.
    fn inventory_container_index(&self, template_id: &str) -> Option<usize> {
        let elsewhere = self
            .bionics
            .compartments()
            .chain(self.worn.iter())
            .any(|item| item.id() == template_id);
        if elsewhere {
            return None;
        }

        self.inventory
            .iter()
            .position(|item| item.id() == template_id)
    }

    /// Takes whatever is docked in the container back into the inventory.
    pub fn unload(&mut self, container: &str) -> Result<(), PocketError> {
        let unloaded = self
            .container_mut(container)
            .ok_or_else(|| PocketError::NotFound(container.to_owned()))?
            .remove_contents();
        match unloaded {
            Some(item) => {
                debug!(container, item = item.id(), "unloading");
                self.inventory.push(item);
            }
            None => warn!(container, "nothing to unload"),
        }

        Ok(())
    }

    fn container(&self, template_id: &str) -> Option<&Item> {
        self.bionics
            .compartments()
            .chain(self.worn.iter())
            .chain(self.inventory.iter())
            .find(|item| item.id() == template_id)
    }

    fn container_mut(&mut self, template_id: &str) -> Option<&mut Item> {
        if let Some(compartment) = self.bionics.compartment_mut(template_id) {
            return Some(compartment);
        }
        self.worn
            .iter_mut()
            .chain(self.inventory.iter_mut())
            .find(|item| item.id() == template_id)
    }

    /// Energy available to UPS-powered equipment from carried and worn UPS units.
    pub fn available_ups(&self) -> Energy {
        ups::available_ups(self.worn.iter().chain(self.inventory.iter()))
    }
}
