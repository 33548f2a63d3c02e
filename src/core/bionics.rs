use crate::core::item::{Item, ItemTemplate};
use crate::core::units::Energy;
use crate::input::BionicInput;
use anyhow::anyhow;
use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub struct BionicDefinition {
    pub id: String,
    pub name: String,
    /// Bionic power storage added while installed
    pub capacity: Energy,
    /// Template of the integrated compartment granted while installed
    pub compartment: Option<Arc<ItemTemplate>>,
}

impl BionicDefinition {
    pub fn from_input(
        id: &str,
        input: &BionicInput,
        items: &IndexMap<String, Arc<ItemTemplate>>,
    ) -> anyhow::Result<Self> {
        let compartment = input
            .compartment
            .as_ref()
            .map(|template_id| {
                items.get(template_id).cloned().ok_or_else(|| {
                    anyhow!("Bionic '{id}' grants unknown compartment item '{template_id}'")
                })
            })
            .transpose()?;

        Ok(Self {
            id: id.to_owned(),
            name: input.name.clone(),
            capacity: input.capacity.unwrap_or_default().max(Energy::ZERO),
            compartment,
        })
    }
}

#[derive(Clone, Debug)]
pub struct InstalledBionic {
    definition: Arc<BionicDefinition>,
    compartment: Option<Item>,
}

impl InstalledBionic {
    fn new(definition: Arc<BionicDefinition>) -> Self {
        let compartment = definition.compartment.clone().map(Item::new);

        Self {
            definition,
            compartment,
        }
    }

    pub fn definition(&self) -> &BionicDefinition {
        &self.definition
    }

    pub fn compartment(&self) -> Option<&Item> {
        self.compartment.as_ref()
    }

    pub fn into_compartment(self) -> Option<Item> {
        self.compartment
    }
}

/// The bionics a character has installed, in installation order.
#[derive(Clone, Debug, Default)]
pub struct InstalledBionics(Vec<InstalledBionic>);

impl InstalledBionics {
    pub fn install(&mut self, definition: Arc<BionicDefinition>) {
        self.0.push(InstalledBionic::new(definition));
    }

    /// Removes the most recently installed bionic with this id.
    pub fn remove(&mut self, id: &str) -> Option<InstalledBionic> {
        let index = self.0.iter().rposition(|bionic| bionic.definition.id == id)?;

        Some(self.0.remove(index))
    }

    pub fn clear(&mut self) -> Vec<InstalledBionic> {
        std::mem::take(&mut self.0)
    }

    pub fn is_installed(&self, id: &str) -> bool {
        self.0.iter().any(|bionic| bionic.definition.id == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstalledBionic> {
        self.0.iter()
    }

    /// Sum of the power storage every installed bionic provides.
    pub fn total_capacity(&self) -> Energy {
        self.0.iter().map(|bionic| bionic.definition.capacity).sum()
    }

    pub fn compartments(&self) -> impl Iterator<Item = &Item> {
        self.0.iter().filter_map(|bionic| bionic.compartment.as_ref())
    }

    pub fn compartment_mut(&mut self, template_id: &str) -> Option<&mut Item> {
        self.0
            .iter_mut()
            .filter_map(|bionic| bionic.compartment.as_mut())
            .find(|compartment| compartment.id() == template_id)
    }

    /// Batteries docked in integrated compartments.
    pub fn docked_devices(&self) -> impl Iterator<Item = &Item> {
        self.compartments().filter_map(Item::contents)
    }

    pub fn docked_devices_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.0
            .iter_mut()
            .filter_map(|bionic| bionic.compartment.as_mut())
            .filter_map(Item::contents_mut)
    }
}
