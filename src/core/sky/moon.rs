use crate::calendar::{TimeDuration, TimePoint};
use crate::core::units::SECONDS_PER_DAY;
use serde::Serialize;
use strum::{EnumCount, EnumIter, IntoEnumIterator};

/// Length of a real synodic month, in days.
const SYNODIC_MONTH_DAYS: f64 = 29.530588853;
/// Length of the real season the lunar cycle is scaled against.
const REAL_SEASON_DAYS: f64 = 91.;

/// Light level under a new moon.
const MOONLIGHT_FLOOR: f64 = 1.;
/// Additional light for each phase step towards full moon.
const MOONLIGHT_PER_PHASE: f64 = 2.25;

#[derive(Clone, Copy, Debug, EnumCount, EnumIter, Eq, Hash, PartialEq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    #[strum(to_string = "new moon")]
    New,
    #[strum(to_string = "waxing crescent")]
    WaxingCrescent,
    #[strum(to_string = "half moon (waxing)")]
    HalfMoonWaxing,
    #[strum(to_string = "waxing gibbous")]
    WaxingGibbous,
    #[strum(to_string = "full moon")]
    Full,
    #[strum(to_string = "waning gibbous")]
    WaningGibbous,
    #[strum(to_string = "half moon (waning)")]
    HalfMoonWaning,
    #[strum(to_string = "waning crescent")]
    WaningCrescent,
}

impl MoonPhase {
    /// Number of phase steps between this phase and the new moon, from 0 (new) to 4 (full).
    pub fn steps_from_new(&self) -> usize {
        let index = *self as usize;
        index.min(Self::COUNT - index)
    }

    /// Light level from the moon alone in this phase.
    pub fn moonlight(&self) -> f64 {
        MOONLIGHT_FLOOR + MOONLIGHT_PER_PHASE * self.steps_from_new() as f64
    }
}

/// Duration of a single one of the eight phases.
///
/// The synodic month is scaled by the game's season length so shorter seasons still see
/// roughly three full lunar cycles each.
pub fn phase_length() -> f64 {
    let season_scale = TimeDuration::season_length().as_days_f64() / REAL_SEASON_DAYS;

    SYNODIC_MONTH_DAYS * SECONDS_PER_DAY as f64 * season_scale / MoonPhase::COUNT as f64
}

/// Duration of a complete lunar cycle, from new moon to new moon.
pub fn lunar_period() -> f64 {
    phase_length() * MoonPhase::COUNT as f64
}

/// The phase of the moon at `t`. Turn zero is a new moon, and phases change at noon.
pub fn get_moon_phase(t: TimePoint) -> MoonPhase {
    let half_day = TimeDuration::from_days(1) / 2;
    let since_new_moon = (t.since_turn_zero() + half_day).as_seconds() as f64;
    let index = (since_new_moon / phase_length()).round() as i64;

    MoonPhase::iter()
        .nth(index.rem_euclid(MoonPhase::COUNT as i64) as usize)
        .unwrap_or(MoonPhase::New)
}

/// Light level from the moon alone at `t`, between 1 (new) and 10 (full).
pub fn moonlight(t: TimePoint) -> f64 {
    get_moon_phase(t).moonlight()
}
