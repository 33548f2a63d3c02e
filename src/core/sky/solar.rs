use crate::calendar::{TimeDuration, TimePoint};
use crate::core::solvers::bisect;
use crate::core::units::{HOURS_PER_DAY, SECONDS_PER_DAY, SECONDS_PER_HOUR};
use crate::input::SkyInput;
use tracing::{debug, warn};

/// Latitude of the reference location (New England), in degrees north.
pub const DEFAULT_LATITUDE: f64 = 42.0;

/// Altitude at which the sun is considered to rise and set, in degrees.
pub const SUNRISE_ANGLE: f64 = 0.0;
/// Dawn begins and dusk ends at astronomical twilight.
pub const TWILIGHT_LOWER_ANGLE: f64 = -18.0;
/// Dawn ends and dusk begins just after the sun clears the horizon.
pub const TWILIGHT_UPPER_ANGLE: f64 = 1.0;
/// Below this altitude it is night.
pub const NIGHT_ANGLE: f64 = -12.0;

const AXIAL_TILT: f64 = 23.44;
const ASTRONOMICAL_DAYS_PER_YEAR: i64 = 365;
// # days from the December solstice to January 1st
const DAYS_FROM_SOLSTICE_TO_NEW_YEAR: i64 = 10;
const DEGREES_PER_HOUR: f64 = 360. / HOURS_PER_DAY as f64;
const NOON_SECONDS: f64 = (SECONDS_PER_DAY / 2) as f64;
const SOLVER_TOLERANCE_SECONDS: f64 = 1e-7;

/// Hour angle of the sun, in degrees, in the range (-180, 180].
///
/// Local mean solar time is used throughout, so the sun crosses the meridian at
/// exactly 12:00 every day.
pub fn solar_hour_angle(t: TimePoint) -> f64 {
    hour_angle_for_seconds_past_midnight(t.time_past_midnight().as_seconds() as f64)
}

fn hour_angle_for_seconds_past_midnight(seconds: f64) -> f64 {
    let solar_time = seconds / SECONDS_PER_HOUR as f64;
    let mut solar_angle = DEGREES_PER_HOUR * (solar_time - 12.);

    if solar_angle > 180.0 {
        solar_angle -= 360.0;
    } else if solar_angle <= -180.0 {
        solar_angle += 360.0;
    }

    solar_angle
}

/// Day of the astronomical (365 day) year that a game time falls on, zero-based.
///
/// The game year is 364 days long, so the game year is stretched slightly to cover a
/// whole astronomical year.
fn astronomical_day_of_year(t: TimePoint) -> i64 {
    t.time_past_new_year().as_seconds() * ASTRONOMICAL_DAYS_PER_YEAR
        / TimeDuration::year_length().as_seconds()
}

fn earth_orbit_deviation(astronomical_day: i64) -> f64 {
    let current_day = astronomical_day + 1; // use 1-indexed day for this

    (360.0 / ASTRONOMICAL_DAYS_PER_YEAR as f64)
        * (current_day + DAYS_FROM_SOLSTICE_TO_NEW_YEAR) as f64
}

/// Declination of the sun, in degrees. Negative in the northern winter.
pub fn solar_declination(t: TimePoint) -> f64 {
    let earth_orbit_deviation = earth_orbit_deviation(astronomical_day_of_year(t)).to_radians();

    -AXIAL_TILT * earth_orbit_deviation.cos()
}

/// Altitude of the sun above the horizon, in degrees, for an observer at `latitude`.
fn altitude(latitude: f64, solar_declination: f64, solar_hour_angle: f64) -> f64 {
    // all three params provided as degrees, but we need to shadow each as radians for trig calcs
    let latitude = latitude.to_radians();
    let solar_declination = solar_declination.to_radians();
    let solar_hour_angle = solar_hour_angle.to_radians();

    (solar_declination.sin() * latitude.sin()
        + solar_declination.cos() * latitude.cos() * solar_hour_angle.cos())
    .clamp(-1., 1.)
    .asin()
    .to_degrees()
}

/// The observer the solar model is evaluated for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sky {
    /// latitude of the observer, in degrees north
    pub latitude: f64,
}

impl Default for Sky {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
        }
    }
}

impl Sky {
    pub fn new(latitude: f64) -> Self {
        Self { latitude }
    }

    pub fn from_input(input: &SkyInput) -> Self {
        Self::new(input.latitude)
    }

    pub fn solar_altitude(&self, t: TimePoint) -> f64 {
        altitude(self.latitude, solar_declination(t), solar_hour_angle(t))
    }

    /// Altitude at a fractional number of seconds past `midnight`, used by the root finder.
    fn altitude_past_midnight(&self, midnight: TimePoint, seconds: f64) -> f64 {
        let whole_seconds = TimeDuration::from_seconds(seconds.floor() as i64);
        altitude(
            self.latitude,
            solar_declination(midnight + whole_seconds),
            hour_angle_for_seconds_past_midnight(seconds),
        )
    }

    /// Finds when, on the day of `p`, the sun passes `angle` degrees of altitude: while
    /// rising when `evening` is false, while setting when it is true. The result is
    /// truncated to the whole second.
    ///
    /// If the sun never reaches the angle in that half of the day the nearest end of the
    /// half-day is returned: the start when the sun is above the angle throughout, the
    /// end when it stays below.
    pub fn sun_at_angle(&self, angle: f64, p: TimePoint, evening: bool) -> TimePoint {
        let midnight = p.midnight();
        let (start, end) = if evening {
            (NOON_SECONDS, SECONDS_PER_DAY as f64)
        } else {
            (0., NOON_SECONDS)
        };
        let offset = |seconds: f64| self.altitude_past_midnight(midnight, seconds) - angle;
        let (offset_start, offset_end) = (offset(start), offset(end));

        let seconds = if offset_start * offset_end > 0. {
            warn!(
                angle,
                latitude = self.latitude,
                evening,
                "sun does not cross this altitude in the half-day"
            );
            let above_throughout = if evening {
                offset_end > 0.
            } else {
                offset_start > 0.
            };
            match (evening, above_throughout) {
                (false, true) => start,
                (false, false) => end,
                (true, true) => end - 1.,
                (true, false) => start,
            }
        } else {
            match bisect(offset, start, end, SOLVER_TOLERANCE_SECONDS) {
                Ok(root) => root,
                Err(e) => {
                    warn!(angle, evening, "{e}; falling back to solar noon");
                    NOON_SECONDS
                }
            }
        };
        debug!(angle, evening, seconds, "sun at angle");

        midnight + TimeDuration::from_seconds(seconds.floor() as i64)
    }

    pub fn sunrise(&self, p: TimePoint) -> TimePoint {
        self.sun_at_angle(SUNRISE_ANGLE, p, false)
    }

    pub fn sunset(&self, p: TimePoint) -> TimePoint {
        self.sun_at_angle(SUNRISE_ANGLE, p, true)
    }

    /// Night runs from the evening crossing of -12 degrees to the morning one, inclusive.
    pub fn is_night(&self, p: TimePoint) -> bool {
        p <= self.sun_at_angle(NIGHT_ANGLE, p, false) || p >= self.sun_at_angle(NIGHT_ANGLE, p, true)
    }

    /// Dawn runs from -18 to +1 degrees while the sun rises, inclusive.
    pub fn is_dawn(&self, p: TimePoint) -> bool {
        self.sun_at_angle(TWILIGHT_LOWER_ANGLE, p, false) <= p
            && p <= self.sun_at_angle(TWILIGHT_UPPER_ANGLE, p, false)
    }

    /// Day runs from sunrise to sunset, inclusive.
    pub fn is_day(&self, p: TimePoint) -> bool {
        self.sunrise(p) <= p && p <= self.sunset(p)
    }

    /// Dusk runs from +1 to -18 degrees while the sun sets, inclusive.
    pub fn is_dusk(&self, p: TimePoint) -> bool {
        self.sun_at_angle(TWILIGHT_UPPER_ANGLE, p, true) <= p
            && p <= self.sun_at_angle(TWILIGHT_LOWER_ANGLE, p, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn days(n: i64) -> TimeDuration {
        TimeDuration::from_days(n)
    }

    fn hours(n: i64) -> TimeDuration {
        TimeDuration::from_hours(n)
    }

    fn minutes(n: i64) -> TimeDuration {
        TimeDuration::from_minutes(n)
    }

    fn seconds(n: i64) -> TimeDuration {
        TimeDuration::from_seconds(n)
    }

    #[fixture]
    fn sky() -> Sky {
        Sky::default()
    }

    #[fixture]
    fn midnight() -> TimePoint {
        TimePoint::TURN_ZERO
    }

    fn january_date() -> TimePoint {
        TimePoint::TURN_ZERO + hours(12)
    }

    fn september_date() -> TimePoint {
        TimePoint::TURN_ZERO + days(260) + hours(19)
    }

    fn september_date_2() -> TimePoint {
        TimePoint::TURN_ZERO + days(260) + hours(3) + minutes(17)
    }

    fn june_date() -> TimePoint {
        TimePoint::TURN_ZERO + days(160) + hours(23)
    }

    fn june_date_year3() -> TimePoint {
        june_date() + 2 * days(364)
    }

    #[rstest]
    #[case(january_date(), 0.)]
    #[case(september_date(), 105.)]
    #[case(september_date_2(), -130.75)]
    #[case(june_date(), 165.)]
    #[case(june_date_year3(), 165.)]
    fn test_solar_hour_angle(#[case] t: TimePoint, #[case] expected: f64) {
        assert_abs_diff_eq!(solar_hour_angle(t), expected, epsilon = 0.01);
    }

    #[rstest]
    fn test_solar_hour_angle_range() {
        assert_eq!(solar_hour_angle(TimePoint::TURN_ZERO), 180.);
        assert_abs_diff_eq!(
            solar_hour_angle(TimePoint::TURN_ZERO + hours(23) + minutes(59)),
            179.75,
            epsilon = 1e-9
        );
    }

    #[rstest]
    #[case(january_date(), -23.02)]
    #[case(september_date(), 0.70)]
    #[case(september_date_2(), 1.10)]
    #[case(june_date(), 23.05)]
    #[case(june_date_year3(), 23.05)]
    fn test_solar_declination(#[case] t: TimePoint, #[case] expected: f64) {
        assert_abs_diff_eq!(solar_declination(t), expected, epsilon = 0.01);
    }

    #[rstest]
    #[case(january_date(), 24.97)]
    #[case(september_date(), -10.60)]
    #[case(september_date_2(), -28.16)]
    #[case(june_date(), -23.47)]
    #[case(june_date_year3(), -23.47)]
    fn test_solar_altitude(sky: Sky, #[case] t: TimePoint, #[case] expected: f64) {
        assert_abs_diff_eq!(sky.solar_altitude(t), expected, epsilon = 0.01);
    }

    #[rstest]
    fn test_sunrise_and_sunset_times(sky: Sky, midnight: TimePoint) {
        assert_eq!(
            sky.sunrise(midnight).to_string(),
            "Year 1, Spring, day 1 7:29:58 AM"
        );
        assert_eq!(
            sky.sunset(midnight).to_string(),
            "Year 1, Spring, day 1 4:30:01 PM"
        );
    }

    #[rstest]
    fn test_sun_at_angle_only_depends_on_the_day(sky: Sky, midnight: TimePoint) {
        let sunrise = sky.sunrise(midnight);
        assert_eq!(sky.sunrise(midnight + hours(17)), sunrise);
        assert_eq!(sky.sunrise(sunrise), sunrise);

        let next_sunrise = sky.sunrise(midnight + days(1));
        assert!(next_sunrise > sunrise + hours(23));
        assert!(next_sunrise < sunrise + hours(25));
    }

    #[rstest]
    fn test_sun_at_angle_returns_half_day_bounds_when_never_crossed(midnight: TimePoint) {
        // Polar night: the sun never rises in midwinter at 80 degrees north
        let polar = Sky::new(80.);
        assert_eq!(polar.sunrise(midnight), midnight + hours(12));
        assert_eq!(polar.sunset(midnight), midnight + hours(12));
        assert!(!polar.is_day(midnight + hours(11)));
    }

    #[rstest]
    fn test_night(sky: Sky, midnight: TimePoint) {
        let dawn_start = sky.sun_at_angle(TWILIGHT_LOWER_ANGLE, midnight, false);

        assert!(sky.is_night(midnight));
        assert!(!sky.is_day(midnight));
        assert!(!sky.is_dawn(midnight));
        assert!(!sky.is_dusk(midnight));

        assert!(sky.is_night(midnight + seconds(1)));
        assert!(sky.is_night(midnight + hours(2)));
        assert!(sky.is_night(midnight + hours(3)));
        assert!(sky.is_night(midnight + hours(4)));

        // At -18 degrees it is both dawn and night
        assert!(sky.is_night(dawn_start));
        assert!(sky.is_dawn(dawn_start));
    }

    #[rstest]
    fn test_dawn(sky: Sky, midnight: TimePoint) {
        let sunrise = sky.sunrise(midnight);

        assert!(!sky.is_night(sunrise));
        assert!(sky.is_dawn(sunrise - seconds(1)));
        assert!(sky.is_dawn(sunrise - minutes(30)));
        // Dawn stops at 1 degree
        assert!(!sky.is_dawn(sunrise + minutes(7)));
    }

    #[rstest]
    fn test_day(sky: Sky, midnight: TimePoint) {
        let sunrise = sky.sunrise(midnight);
        let sunset = sky.sunset(midnight);
        let noon = midnight + hours(12);

        assert!(sky.is_day(sunrise + seconds(2)));
        for t in [
            sunrise + hours(2),
            sunrise + hours(3),
            sunrise + hours(4),
            noon - hours(3),
            noon - hours(2),
            noon - hours(1),
            noon,
            noon + hours(1),
            noon + hours(2),
            noon + hours(3),
            sunset - hours(2),
            sunset - hours(1),
            sunset - seconds(1),
        ] {
            assert!(sky.is_day(t), "expected day at {t}");
        }
        assert!(!sky.is_dawn(noon));
        assert!(!sky.is_dusk(noon));
        assert!(!sky.is_night(noon));
    }

    #[rstest]
    fn test_dusk(sky: Sky, midnight: TimePoint) {
        let sunset = sky.sunset(midnight);

        // Sun setting down is both "day" and "dusk"
        assert!(sky.is_day(sunset));
        assert!(sky.is_dusk(sunset));

        assert!(!sky.is_day(sunset + seconds(1)));
        assert!(sky.is_dusk(sunset + seconds(1)));
        assert!(sky.is_dusk(sunset + minutes(30)));
        assert!(sky.is_dusk(sunset + hours(1) - seconds(1)));
    }

    #[rstest]
    fn test_night_again(sky: Sky, midnight: TimePoint) {
        let dusk_end = sky.sun_at_angle(TWILIGHT_LOWER_ANGLE, midnight, true);

        assert!(sky.is_dusk(dusk_end));
        assert!(sky.is_night(dusk_end));
        assert!(sky.is_night(dusk_end + hours(2)));
        assert!(sky.is_night(dusk_end + hours(3)));
        assert!(sky.is_night(dusk_end + hours(4)));
    }

    #[rstest]
    fn test_crossing_times_bracket_the_angle(sky: Sky) {
        let midsummer = TimePoint::TURN_ZERO + days(170);
        for angle in [TWILIGHT_LOWER_ANGLE, NIGHT_ANGLE, SUNRISE_ANGLE, TWILIGHT_UPPER_ANGLE] {
            let rising = sky.sun_at_angle(angle, midsummer, false);
            assert!(sky.solar_altitude(rising) <= angle);
            assert!(sky.solar_altitude(rising + seconds(1)) >= angle);

            let setting = sky.sun_at_angle(angle, midsummer, true);
            assert!(sky.solar_altitude(setting) >= angle);
            assert!(sky.solar_altitude(setting + seconds(1)) <= angle);
        }
    }
}
