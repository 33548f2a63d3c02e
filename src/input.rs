use crate::core::units::Energy;
use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use std::io::{BufReader, Read};

pub fn ingest_for_processing(json: impl Read) -> Result<Input, anyhow::Error> {
    let reader = BufReader::new(json);

    Ok(serde_json::from_reader(reader)?)
}

#[derive(Debug, Default, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct Input {
    /// Item templates and bionics to use. The built-in catalog is used when absent.
    pub catalog: Option<CatalogInput>,
    #[serde(default)]
    pub sky: SkyInput,
    #[serde(default)]
    pub scenario: Vec<ScenarioStep>,
    pub solar_report: Option<SolarReport>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct CatalogInput {
    #[serde(default)]
    pub items: IndexMap<String, ItemTemplateInput>,
    #[serde(default)]
    pub bionics: IndexMap<String, BionicInput>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct ItemTemplateInput {
    pub name: String,
    #[cfg_attr(feature = "schemars", schemars(with = "String"))]
    pub category: ItemCategory,
    /// Energy the item can hold itself, if any
    pub energy_capacity: Option<Energy>,
    /// Size class, for items that can be docked in a magazine well
    pub battery_class: Option<BatteryClass>,
    pub magazine_well: Option<MagazineWellInput>,
    /// Whether the item supplies power to UPS-compatible equipment
    #[serde(default)]
    pub ups: bool,
}

/// Broad kind of item. Categories this crate has no special handling for are kept verbatim.
#[derive(Clone, Debug, Deserialize_enum_str, Eq, Hash, PartialEq, Serialize_enum_str)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Tool,
    ToolArmor,
    Battery,
    Armor,
    Container,
    Generic,
    #[serde(other)]
    Other(String),
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize, strum::Display)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BatteryClass {
    Light,
    Medium,
    Heavy,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct MagazineWellInput {
    pub accepts: Vec<BatteryClass>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct BionicInput {
    pub name: String,
    /// Bionic power storage this module adds
    pub capacity: Option<Energy>,
    /// Template of the integrated compartment this module grants
    pub compartment: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct SkyInput {
    /// Degrees north of the equator
    #[serde(default = "default_latitude", deserialize_with = "deserialize_latitude")]
    pub latitude: f64,
}

impl Default for SkyInput {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
        }
    }
}

fn default_latitude() -> f64 {
    crate::core::sky::solar::DEFAULT_LATITUDE
}

fn deserialize_latitude<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let latitude: f64 = Deserialize::deserialize(deserializer)?;
    if !(-90. ..=90.).contains(&latitude) {
        return Err(de::Error::custom(format!(
            "latitude {latitude} is outside the range -90 to 90 degrees"
        )));
    }

    Ok(latitude)
}

/// One action applied to the character, in order.
///
/// Items are referred to by template id. Containers are looked up among bionic
/// compartments first, then worn items, then the inventory.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(tag = "action", deny_unknown_fields, rename_all = "snake_case")]
pub enum ScenarioStep {
    InstallBionic { bionic: String },
    RemoveBionic { bionic: String },
    SetPowerLevel { energy: Energy },
    ModPowerLevel { energy: Energy },
    AddItem { item: String },
    /// Adds energy directly to the first inventory item with this template
    ChargeItem { item: String, energy: Energy },
    WearItem { item: String },
    Reload { container: String, item: String },
    Unload { container: String },
}

impl ScenarioStep {
    pub fn action_name(&self) -> &'static str {
        match self {
            ScenarioStep::InstallBionic { .. } => "install_bionic",
            ScenarioStep::RemoveBionic { .. } => "remove_bionic",
            ScenarioStep::SetPowerLevel { .. } => "set_power_level",
            ScenarioStep::ModPowerLevel { .. } => "mod_power_level",
            ScenarioStep::AddItem { .. } => "add_item",
            ScenarioStep::ChargeItem { .. } => "charge_item",
            ScenarioStep::WearItem { .. } => "wear_item",
            ScenarioStep::Reload { .. } => "reload",
            ScenarioStep::Unload { .. } => "unload",
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct SolarReport {
    /// Zero-based day since turn zero
    pub day: i64,
    #[serde(default = "default_step_minutes")]
    pub step_minutes: i64,
}

fn default_step_minutes() -> i64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_ingest_minimal_input() {
        let input = ingest_for_processing("{}".as_bytes()).unwrap();
        assert!(input.catalog.is_none());
        assert_eq!(input.sky.latitude, 42.);
        assert!(input.scenario.is_empty());
        assert!(input.solar_report.is_none());
    }

    #[rstest]
    fn should_ingest_scenario_steps() {
        let json = r#"{
            "sky": { "latitude": 51.5 },
            "scenario": [
                { "action": "install_bionic", "bionic": "bio_power_storage" },
                { "action": "mod_power_level", "energy": "-10500 J" },
                { "action": "reload", "container": "UPS_off", "item": "heavy_battery_cell" }
            ],
            "solar_report": { "day": 3 }
        }"#;
        let input = ingest_for_processing(json.as_bytes()).unwrap();

        assert_eq!(input.sky.latitude, 51.5);
        assert_eq!(
            input.scenario,
            vec![
                ScenarioStep::InstallBionic {
                    bionic: "bio_power_storage".into()
                },
                ScenarioStep::ModPowerLevel {
                    energy: Energy::from_joule(-10_500)
                },
                ScenarioStep::Reload {
                    container: "UPS_off".into(),
                    item: "heavy_battery_cell".into()
                },
            ]
        );
        assert_eq!(
            input.solar_report,
            Some(SolarReport {
                day: 3,
                step_minutes: 60
            })
        );
    }

    #[rstest]
    fn should_ingest_catalog() {
        let json = r#"{
            "catalog": {
                "items": {
                    "flashlight": { "name": "flashlight", "category": "tool", "energy_capacity": "5 kJ" },
                    "charm": { "name": "lucky charm", "category": "trinket" }
                },
                "bionics": {
                    "bio_power_storage": { "name": "Power Storage", "capacity": "100 kJ" }
                }
            }
        }"#;
        let catalog = ingest_for_processing(json.as_bytes())
            .unwrap()
            .catalog
            .unwrap();

        let flashlight = &catalog.items["flashlight"];
        assert_eq!(flashlight.category, ItemCategory::Tool);
        assert_eq!(flashlight.energy_capacity, Some(Energy::from_kilojoule(5)));
        assert!(!flashlight.ups);
        assert_eq!(
            catalog.items["charm"].category,
            ItemCategory::Other("trinket".into())
        );
        assert_eq!(
            catalog.bionics["bio_power_storage"].capacity,
            Some(Energy::from_kilojoule(100))
        );
    }

    #[rstest]
    #[case(r#"{ "sky": { "latitude": 91 } }"#)]
    #[case(r#"{ "scenario": [{ "action": "teleport" }] }"#)]
    #[case(r#"{ "scenario": [{ "action": "set_power_level", "energy": "50" }] }"#)]
    #[case(r#"{ "unexpected": true }"#)]
    fn should_reject_invalid_input(#[case] json: &str) {
        assert!(ingest_for_processing(json.as_bytes()).is_err());
    }
}
