pub mod calendar;
pub mod core;
pub mod errors;
pub mod input;
pub mod output;

use crate::calendar::{TimeDuration, TimePoint};
use crate::core::character::Character;
use crate::core::item::Catalog;
use crate::core::sky::{get_moon_phase, solar_declination, solar_hour_angle, MoonPhase, Sky};
use crate::core::units::{Energy, HOURS_PER_DAY, MINUTES_PER_HOUR, SECONDS_PER_DAY};
use crate::errors::{CalculationError, OutputError, SurvivalEnergyError};
use crate::input::{ingest_for_processing, Input, ScenarioStep, SolarReport};
use crate::output::Output;
use anyhow::{anyhow, bail};
use csv::WriterBuilder;
use std::io::Read;
use tracing::{debug, info, warn};

const MINUTES_PER_DAY: i64 = MINUTES_PER_HOUR * HOURS_PER_DAY;
// leaves room for the report's end of day and its last step
const MAX_REPORT_DAY: i64 = i64::MAX / SECONDS_PER_DAY - 2;

/// Power levels after one scenario step.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerRow {
    pub step: usize,
    pub action: &'static str,
    pub power_level: Energy,
    pub whole_power_level: Energy,
    pub whole_max_power_level: Energy,
    pub available_ups: Energy,
}

/// The state of the sky at one moment.
#[derive(Clone, Debug, PartialEq)]
pub struct SunRow {
    pub time: TimePoint,
    pub hour_angle: f64,
    pub declination: f64,
    pub altitude: f64,
    pub is_night: bool,
    pub is_dawn: bool,
    pub is_day: bool,
    pub is_dusk: bool,
    pub sunlight: f64,
    pub moon_phase: MoonPhase,
}

#[derive(Debug, Default)]
pub struct ScenarioResults {
    pub power: Vec<PowerRow>,
    pub sun: Vec<SunRow>,
    pub character: Character,
}

/// Runs the scenario described by the JSON `input`, writing `power` and (when requested)
/// `sun` reports to `output`.
pub fn run_scenario(
    input: impl Read,
    output: impl Output,
) -> Result<ScenarioResults, SurvivalEnergyError> {
    let input = ingest_for_processing(input)?;
    let catalog = catalog_from_input(&input)?;
    validate_scenario(&input, &catalog)?;

    info!(steps = input.scenario.len(), "running scenario");
    let mut character = Character::new();
    let power = input
        .scenario
        .iter()
        .enumerate()
        .map(|(index, step)| {
            apply_step(&mut character, &catalog, step).map_err(CalculationError::new)?;
            Ok(power_row(index, step, &character))
        })
        .collect::<Result<Vec<_>, CalculationError>>()?;

    let sky = Sky::from_input(&input.sky);
    let sun = input
        .solar_report
        .map(|report| solar_report(&sky, report))
        .unwrap_or_default();

    if !output.is_noop() {
        write_power_report(&output, &power).map_err(SurvivalEnergyError::ErrorInOutput)?;
        if input.solar_report.is_some() {
            write_sun_report(&output, &sun).map_err(SurvivalEnergyError::ErrorInOutput)?;
        }
    }
    info!(
        power_level = %character.get_whole_power_level(),
        "scenario complete"
    );

    Ok(ScenarioResults {
        power,
        sun,
        character,
    })
}

fn catalog_from_input(input: &Input) -> anyhow::Result<Catalog> {
    match &input.catalog {
        Some(catalog) => Catalog::from_input(catalog),
        None => Catalog::default_catalog(),
    }
}

/// Checks every catalog reference up front so a scenario never stops halfway.
fn validate_scenario(input: &Input, catalog: &Catalog) -> anyhow::Result<()> {
    for (index, step) in input.scenario.iter().enumerate() {
        let result = match step {
            ScenarioStep::InstallBionic { bionic } | ScenarioStep::RemoveBionic { bionic } => {
                catalog.bionic(bionic).map(|_| ())
            }
            ScenarioStep::AddItem { item }
            | ScenarioStep::ChargeItem { item, .. }
            | ScenarioStep::WearItem { item } => catalog.template(item).map(|_| ()),
            ScenarioStep::Reload { container, item } => catalog
                .template(container)
                .and_then(|_| catalog.template(item))
                .map(|_| ()),
            ScenarioStep::Unload { container } => catalog.template(container).map(|_| ()),
            ScenarioStep::SetPowerLevel { .. } | ScenarioStep::ModPowerLevel { .. } => Ok(()),
        };
        result.map_err(|e| anyhow!("Scenario step {index} ({}): {e}", step.action_name()))?;
    }

    if let Some(report) = input.solar_report {
        if !(1..=MINUTES_PER_DAY).contains(&report.step_minutes) {
            bail!(
                "Solar report step must be between 1 and {MINUTES_PER_DAY} minutes, got {}",
                report.step_minutes
            );
        }
        if !(-MAX_REPORT_DAY..=MAX_REPORT_DAY).contains(&report.day) {
            bail!(
                "Solar report day must be within {MAX_REPORT_DAY} days of turn zero, got {}",
                report.day
            );
        }
    }

    Ok(())
}

fn apply_step(
    character: &mut Character,
    catalog: &Catalog,
    step: &ScenarioStep,
) -> anyhow::Result<()> {
    match step {
        ScenarioStep::InstallBionic { bionic } => {
            character.add_bionic(catalog.bionic(bionic)?.clone());
        }
        ScenarioStep::RemoveBionic { bionic } => {
            character.remove_bionic(bionic);
        }
        ScenarioStep::SetPowerLevel { energy } => character.set_power_level(*energy),
        ScenarioStep::ModPowerLevel { energy } => character.mod_power_level(*energy),
        ScenarioStep::AddItem { item } => {
            character.i_add(catalog.create_item(item)?);
        }
        ScenarioStep::ChargeItem { item, energy } => match character.inventory_item_mut(item) {
            Some(target) => target.mod_energy(*energy),
            None => warn!(%item, "no item in inventory to charge"),
        },
        ScenarioStep::WearItem { item } => {
            character.wear_item(catalog.create_item(item)?);
        }
        ScenarioStep::Reload { container, item } => {
            if let Err(e) = character.reload(container, item) {
                debug!(%e, "reload step left the character unchanged");
            }
        }
        ScenarioStep::Unload { container } => {
            if let Err(e) = character.unload(container) {
                debug!(%e, "unload step left the character unchanged");
            }
        }
    }

    Ok(())
}

fn power_row(index: usize, step: &ScenarioStep, character: &Character) -> PowerRow {
    PowerRow {
        step: index,
        action: step.action_name(),
        power_level: character.get_power_level(),
        whole_power_level: character.get_whole_power_level(),
        whole_max_power_level: character.get_whole_max_power_level(),
        available_ups: character.available_ups(),
    }
}

fn solar_report(sky: &Sky, report: SolarReport) -> Vec<SunRow> {
    let start = TimePoint::TURN_ZERO + TimeDuration::from_days(report.day);
    let end = start + TimeDuration::from_days(1);
    let step = TimeDuration::from_minutes(report.step_minutes);

    std::iter::successors(Some(start), |&time| Some(time + step))
        .take_while(|&time| time < end)
        .map(|time| SunRow {
            time,
            hour_angle: solar_hour_angle(time),
            declination: solar_declination(time),
            altitude: sky.solar_altitude(time),
            is_night: sky.is_night(time),
            is_dawn: sky.is_dawn(time),
            is_day: sky.is_day(time),
            is_dusk: sky.is_dusk(time),
            sunlight: sky.sunlight(time),
            moon_phase: get_moon_phase(time),
        })
        .collect()
}

fn write_power_report(output: &impl Output, rows: &[PowerRow]) -> Result<(), OutputError> {
    let writer = output
        .writer_for_location_key("power")
        .map_err(OutputError::new)?;
    let mut writer = WriterBuilder::new().from_writer(writer);

    let mut write = || -> anyhow::Result<()> {
        writer.write_record([
            "step",
            "action",
            "power level [J]",
            "whole power level [J]",
            "whole max power level [J]",
            "available UPS [J]",
        ])?;
        for row in rows {
            writer.write_record([
                row.step.to_string(),
                row.action.to_string(),
                row.power_level.as_joule_f64().to_string(),
                row.whole_power_level.as_joule_f64().to_string(),
                row.whole_max_power_level.as_joule_f64().to_string(),
                row.available_ups.as_joule_f64().to_string(),
            ])?;
        }
        writer.flush()?;

        Ok(())
    };

    write().map_err(OutputError::new)
}

fn write_sun_report(output: &impl Output, rows: &[SunRow]) -> Result<(), OutputError> {
    let writer = output
        .writer_for_location_key("sun")
        .map_err(OutputError::new)?;
    let mut writer = WriterBuilder::new().from_writer(writer);

    let mut write = || -> anyhow::Result<()> {
        writer.write_record([
            "time",
            "hour angle [deg]",
            "declination [deg]",
            "altitude [deg]",
            "night",
            "dawn",
            "day",
            "dusk",
            "sunlight",
            "moon phase",
        ])?;
        for row in rows {
            writer.write_record([
                row.time.to_string(),
                format!("{:.2}", row.hour_angle),
                format!("{:.2}", row.declination),
                format!("{:.2}", row.altitude),
                row.is_night.to_string(),
                row.is_dawn.to_string(),
                row.is_day.to_string(),
                row.is_dusk.to_string(),
                format!("{:.4}", row.sunlight),
                row.moon_phase.to_string(),
            ])?;
        }
        writer.flush()?;

        Ok(())
    };

    write().map_err(OutputError::new)
}
