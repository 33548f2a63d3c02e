use crate::core::units::{SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use strum::{EnumIter, IntoEnumIterator};

pub const DAYS_PER_SEASON: i64 = 91;
pub const SEASONS_PER_YEAR: i64 = 4;
pub const DAYS_PER_YEAR: i64 = DAYS_PER_SEASON * SEASONS_PER_YEAR;

/// A span of game time, in whole seconds (one second is one turn).
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct TimeDuration(i64);

impl TimeDuration {
    pub const ZERO: TimeDuration = TimeDuration(0);

    pub const fn from_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    pub const fn from_minutes(minutes: i64) -> Self {
        Self(minutes * SECONDS_PER_MINUTE)
    }

    pub const fn from_hours(hours: i64) -> Self {
        Self(hours * SECONDS_PER_HOUR)
    }

    pub const fn from_days(days: i64) -> Self {
        Self(days * SECONDS_PER_DAY)
    }

    pub const fn as_seconds(&self) -> i64 {
        self.0
    }

    pub fn as_hours_f64(&self) -> f64 {
        self.0 as f64 / SECONDS_PER_HOUR as f64
    }

    pub fn as_days_f64(&self) -> f64 {
        self.0 as f64 / SECONDS_PER_DAY as f64
    }

    pub fn season_length() -> Self {
        Self::from_days(DAYS_PER_SEASON)
    }

    pub fn year_length() -> Self {
        Self::from_days(DAYS_PER_YEAR)
    }
}

impl Add for TimeDuration {
    type Output = TimeDuration;

    fn add(self, rhs: Self) -> Self::Output {
        TimeDuration(self.0 + rhs.0)
    }
}

impl Sub for TimeDuration {
    type Output = TimeDuration;

    fn sub(self, rhs: Self) -> Self::Output {
        TimeDuration(self.0 - rhs.0)
    }
}

impl Mul<i64> for TimeDuration {
    type Output = TimeDuration;

    fn mul(self, rhs: i64) -> Self::Output {
        TimeDuration(self.0 * rhs)
    }
}

impl Mul<TimeDuration> for i64 {
    type Output = TimeDuration;

    fn mul(self, rhs: TimeDuration) -> Self::Output {
        rhs * self
    }
}

impl Div<i64> for TimeDuration {
    type Output = TimeDuration;

    fn div(self, rhs: i64) -> Self::Output {
        TimeDuration(self.0 / rhs)
    }
}

/// Ratio of two durations.
impl Div for TimeDuration {
    type Output = f64;

    fn div(self, rhs: Self) -> Self::Output {
        self.0 as f64 / rhs.0 as f64
    }
}

/// A point on the game calendar, counted in seconds from [`TimePoint::TURN_ZERO`]
/// (midnight of the first day of spring in year one).
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct TimePoint(i64);

impl TimePoint {
    pub const TURN_ZERO: TimePoint = TimePoint(0);

    pub const fn from_turn(turn: i64) -> Self {
        Self(turn)
    }

    pub const fn turn(&self) -> i64 {
        self.0
    }

    pub fn since_turn_zero(&self) -> TimeDuration {
        *self - Self::TURN_ZERO
    }

    pub fn time_past_midnight(&self) -> TimeDuration {
        TimeDuration(self.0.rem_euclid(SECONDS_PER_DAY))
    }

    pub fn midnight(&self) -> TimePoint {
        *self - self.time_past_midnight()
    }

    pub fn time_past_new_year(&self) -> TimeDuration {
        TimeDuration(self.0.rem_euclid(TimeDuration::year_length().as_seconds()))
    }

    /// Zero-based year count (year one is 0).
    pub fn year(&self) -> i64 {
        self.0.div_euclid(TimeDuration::year_length().as_seconds())
    }

    /// Zero-based day within the year.
    pub fn day_of_year(&self) -> i64 {
        self.time_past_new_year().as_seconds() / SECONDS_PER_DAY
    }

    /// Zero-based day within the season.
    pub fn day_of_season(&self) -> i64 {
        self.day_of_year() % DAYS_PER_SEASON
    }

    pub fn season(&self) -> Season {
        Season::from_index((self.day_of_year() / DAYS_PER_SEASON) as usize)
    }
}

impl Add<TimeDuration> for TimePoint {
    type Output = TimePoint;

    fn add(self, rhs: TimeDuration) -> Self::Output {
        TimePoint(self.0 + rhs.0)
    }
}

impl AddAssign<TimeDuration> for TimePoint {
    fn add_assign(&mut self, rhs: TimeDuration) {
        self.0 += rhs.0;
    }
}

impl Sub<TimeDuration> for TimePoint {
    type Output = TimePoint;

    fn sub(self, rhs: TimeDuration) -> Self::Output {
        TimePoint(self.0 - rhs.0)
    }
}

impl SubAssign<TimeDuration> for TimePoint {
    fn sub_assign(&mut self, rhs: TimeDuration) {
        self.0 -= rhs.0;
    }
}

impl Sub for TimePoint {
    type Output = TimeDuration;

    fn sub(self, rhs: Self) -> Self::Output {
        TimeDuration(self.0 - rhs.0)
    }
}

/// Renders as e.g. `Year 1, Spring, day 1 7:29:58 AM`.
impl Display for TimePoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let seconds_of_day = self.time_past_midnight().as_seconds();
        let hour = seconds_of_day / SECONDS_PER_HOUR;
        let minute = seconds_of_day % SECONDS_PER_HOUR / SECONDS_PER_MINUTE;
        let second = seconds_of_day % SECONDS_PER_MINUTE;
        let (clock_hour, meridiem) = match hour {
            0 => (12, "AM"),
            1..=11 => (hour, "AM"),
            12 => (12, "PM"),
            _ => (hour - 12, "PM"),
        };

        write!(
            f,
            "Year {}, {}, day {} {}:{:02}:{:02} {}",
            self.year() + 1,
            self.season(),
            self.day_of_season() + 1,
            clock_hour,
            minute,
            second,
            meridiem
        )
    }
}

#[derive(Clone, Copy, Debug, Deserialize, EnumIter, Eq, Hash, PartialEq, Serialize, strum::Display)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    fn from_index(index: usize) -> Self {
        Season::iter()
            .nth(index % SEASONS_PER_YEAR as usize)
            .unwrap_or(Season::Spring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_build_durations_from_units() {
        assert_eq!(TimeDuration::from_minutes(17).as_seconds(), 1_020);
        assert_eq!(TimeDuration::from_hours(3).as_seconds(), 10_800);
        assert_eq!(TimeDuration::from_days(364), TimeDuration::year_length());
        assert_eq!(2 * TimeDuration::from_days(364), TimeDuration::from_days(728));
        assert_eq!(TimeDuration::season_length() / 6, TimeDuration::from_seconds(1_310_400));
        assert_eq!(TimeDuration::from_minutes(15) / TimeDuration::from_hours(1), 0.25);
    }

    #[rstest]
    fn should_split_time_into_calendar_parts() {
        let t = TimePoint::TURN_ZERO + TimeDuration::from_days(260) + TimeDuration::from_hours(19);
        assert_eq!(t.day_of_year(), 260);
        assert_eq!(t.day_of_season(), 260 - 2 * 91);
        assert_eq!(t.season(), Season::Autumn);
        assert_eq!(t.time_past_midnight(), TimeDuration::from_hours(19));
        assert_eq!(t.midnight(), TimePoint::TURN_ZERO + TimeDuration::from_days(260));

        let year_three = t + 2 * TimeDuration::year_length();
        assert_eq!(year_three.year(), 2);
        assert_eq!(year_three.day_of_year(), 260);
        assert_eq!(year_three.time_past_new_year(), t.time_past_new_year());
    }

    #[rstest]
    #[case(TimePoint::TURN_ZERO, "Year 1, Spring, day 1 12:00:00 AM")]
    #[case(TimePoint::from_turn(26_998), "Year 1, Spring, day 1 7:29:58 AM")]
    #[case(TimePoint::from_turn(59_401), "Year 1, Spring, day 1 4:30:01 PM")]
    #[case(TimePoint::from_turn(43_200), "Year 1, Spring, day 1 12:00:00 PM")]
    #[case(
        TimePoint::TURN_ZERO + TimeDuration::from_days(364 + 91 + 4) + TimeDuration::from_minutes(61),
        "Year 2, Summer, day 5 1:01:00 AM"
    )]
    fn should_display_time_points(#[case] time: TimePoint, #[case] expected: &str) {
        assert_eq!(time.to_string(), expected);
    }

    #[rstest]
    fn should_handle_times_before_turn_zero() {
        let t = TimePoint::TURN_ZERO - TimeDuration::from_hours(1);
        assert_eq!(t.time_past_midnight(), TimeDuration::from_hours(23));
        assert_eq!(t.season(), Season::Winter);
        assert_eq!(t.year(), -1);
    }
}
