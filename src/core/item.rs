use crate::core::bionics::BionicDefinition;
use crate::core::energy_supply::battery::EnergyStorage;
use crate::core::units::Energy;
use crate::input::{BatteryClass, CatalogInput, ItemCategory, ItemTemplateInput};
use indexmap::IndexMap;
use std::sync::Arc;
use thiserror::Error;

/// Everything an item of a given kind can do, as a bundle of optional capabilities.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemTemplate {
    pub id: String,
    pub name: String,
    pub category: ItemCategory,
    pub energy_capacity: Option<Energy>,
    pub battery_class: Option<BatteryClass>,
    /// Battery classes accepted by the item's magazine well, if it has one
    pub magazine_well: Option<Vec<BatteryClass>>,
    pub ups: bool,
}

impl ItemTemplate {
    pub fn from_input(id: &str, input: &ItemTemplateInput) -> Self {
        let ItemTemplateInput {
            name,
            category,
            energy_capacity,
            battery_class,
            magazine_well,
            ups,
        } = input;

        Self {
            id: id.to_owned(),
            name: name.clone(),
            category: category.clone(),
            energy_capacity: *energy_capacity,
            battery_class: *battery_class,
            magazine_well: magazine_well.as_ref().map(|well| well.accepts.clone()),
            ups: *ups,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum PocketError {
    #[error("{0} has no magazine well")]
    NoMagazineWell(String),
    #[error("{0} already holds something")]
    Occupied(String),
    #[error("{item} does not fit in {container}")]
    Incompatible { container: String, item: String },
    #[error("no {0} to use")]
    NotFound(String),
}

/// A single item, holding its own charge and whatever is docked in its magazine well.
#[derive(Clone, Debug)]
pub struct Item {
    template: Arc<ItemTemplate>,
    energy: Energy,
    contents: Option<Box<Item>>,
}

impl Item {
    /// A new, empty item.
    pub fn new(template: Arc<ItemTemplate>) -> Self {
        Self {
            template,
            energy: Energy::ZERO,
            contents: None,
        }
    }

    pub fn template(&self) -> &ItemTemplate {
        &self.template
    }

    pub fn id(&self) -> &str {
        &self.template.id
    }

    pub fn contents(&self) -> Option<&Item> {
        self.contents.as_deref()
    }

    pub fn contents_mut(&mut self) -> Option<&mut Item> {
        self.contents.as_deref_mut()
    }

    /// Energy held by the item and anything docked in it.
    pub fn energy_remaining(&self) -> Energy {
        self.energy
            + self
                .contents()
                .map(Item::energy_remaining)
                .unwrap_or_default()
    }

    pub fn mod_energy(&mut self, delta: Energy) {
        self.set_current_energy(self.energy + delta);
    }

    /// Checks whether `item` could be docked in this item's magazine well.
    pub fn can_contain(&self, item: &Item) -> Result<(), PocketError> {
        let Some(accepts) = &self.template.magazine_well else {
            return Err(PocketError::NoMagazineWell(self.id().to_owned()));
        };
        if self.contents.is_some() {
            return Err(PocketError::Occupied(self.id().to_owned()));
        }
        match item.template.battery_class {
            Some(class) if accepts.contains(&class) => Ok(()),
            _ => Err(PocketError::Incompatible {
                container: self.id().to_owned(),
                item: item.id().to_owned(),
            }),
        }
    }

    /// Docks `item` in the magazine well. Nothing changes if it does not fit.
    pub fn put_in(&mut self, item: Item) -> Result<(), PocketError> {
        self.can_contain(&item)?;
        self.contents = Some(Box::new(item));

        Ok(())
    }

    pub fn remove_contents(&mut self) -> Option<Item> {
        self.contents.take().map(|item| *item)
    }
}

/// Item charge is kept in whole kilojoules.
impl EnergyStorage for Item {
    fn declared_capacity(&self) -> Energy {
        self.template.energy_capacity.unwrap_or_default()
    }

    fn current_energy(&self) -> Energy {
        self.energy
    }

    fn set_current_energy(&mut self, energy: Energy) {
        self.energy = energy
            .truncate_to(self.storage_unit())
            .clamp_to_capacity(self.declared_capacity());
    }
}

#[derive(Debug, Error)]
#[error("Unknown {kind} '{id}'")]
pub struct UnknownTemplateError {
    kind: &'static str,
    id: String,
}

/// Item templates and bionic definitions by id.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    items: IndexMap<String, Arc<ItemTemplate>>,
    bionics: IndexMap<String, Arc<BionicDefinition>>,
}

const DEFAULT_CATALOG: &str = include_str!("../data/default_catalog.json");

impl Catalog {
    pub fn from_input(input: &CatalogInput) -> anyhow::Result<Self> {
        let items = input
            .items
            .iter()
            .map(|(id, template)| (id.clone(), Arc::new(ItemTemplate::from_input(id, template))))
            .collect::<IndexMap<_, _>>();

        let bionics = input
            .bionics
            .iter()
            .map(|(id, bionic)| {
                Ok((
                    id.clone(),
                    Arc::new(BionicDefinition::from_input(id, bionic, &items)?),
                ))
            })
            .collect::<anyhow::Result<IndexMap<_, _>>>()?;

        Ok(Self { items, bionics })
    }

    /// The catalog of stock batteries, tools and power bionics.
    pub fn default_catalog() -> anyhow::Result<Self> {
        let input: CatalogInput = serde_json::from_str(DEFAULT_CATALOG)?;

        Self::from_input(&input)
    }

    pub fn template(&self, id: &str) -> Result<&Arc<ItemTemplate>, UnknownTemplateError> {
        self.items.get(id).ok_or_else(|| UnknownTemplateError {
            kind: "item",
            id: id.to_owned(),
        })
    }

    pub fn bionic(&self, id: &str) -> Result<&Arc<BionicDefinition>, UnknownTemplateError> {
        self.bionics.get(id).ok_or_else(|| UnknownTemplateError {
            kind: "bionic",
            id: id.to_owned(),
        })
    }

    /// A new, empty item of the given template.
    pub fn create_item(&self, id: &str) -> Result<Item, UnknownTemplateError> {
        Ok(Item::new(self.template(id)?.clone()))
    }
}
