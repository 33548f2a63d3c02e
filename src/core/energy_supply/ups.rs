use crate::core::item::Item;
use crate::core::units::Energy;

/// Energy available to UPS-powered equipment from `items`.
///
/// UPS units simply pass through whatever their docked batteries hold, so this is the sum
/// of their remaining energy.
pub fn available_ups<'a>(items: impl IntoIterator<Item = &'a Item>) -> Energy {
    items
        .into_iter()
        .filter(|item| item.template().ups)
        .map(Item::energy_remaining)
        .sum()
}
