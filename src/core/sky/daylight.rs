use super::moon::moonlight;
use super::solar::Sky;
use crate::calendar::{Season, TimeDuration, TimePoint, DAYS_PER_SEASON};

const DEFAULT_DAYLIGHT_LEVEL: f64 = 100.;
/// How far the daytime ceiling moves from the equinox value at the solstices.
const SEASONAL_DEVIATION: f64 = 0.25;

/// Daytime light level at the equinox.
pub fn default_daylight_level() -> f64 {
    DEFAULT_DAYLIGHT_LEVEL
}

/// Daytime light level for the day `p` falls on.
///
/// Brightest at the start of summer and darkest at the start of winter, varying linearly
/// day by day in between.
pub fn current_daylight_level(p: TimePoint) -> f64 {
    let fraction = p.day_of_season() as f64 / DAYS_PER_SEASON as f64;
    let modifier = match p.season() {
        Season::Spring => 1. + SEASONAL_DEVIATION * fraction,
        Season::Summer => 1. + SEASONAL_DEVIATION * (1. - fraction),
        Season::Autumn => 1. - SEASONAL_DEVIATION * fraction,
        Season::Winter => 1. - SEASONAL_DEVIATION * (1. - fraction),
    };

    default_daylight_level() * modifier
}

impl Sky {
    /// Combined light level from the sun and the moon at `p`.
    ///
    /// Light ramps linearly from moonlight to full daylight over the hour after sunrise, and
    /// back again over the hour after sunset.
    pub fn sunlight(&self, p: TimePoint) -> f64 {
        let twilight = TimeDuration::from_hours(1);
        let sunrise = self.sunrise(p);
        let sunset = self.sunset(p);
        let moonlight = moonlight(p);

        if p < sunrise || p > sunset + twilight {
            return moonlight;
        }

        let daylight = current_daylight_level(p);
        if p < sunrise + twilight {
            let percent = (p - sunrise) / twilight;
            moonlight * (1. - percent) + daylight * percent
        } else if p > sunset {
            let percent = (p - sunset) / twilight;
            daylight * (1. - percent) + moonlight * percent
        } else {
            daylight
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::*;

    const TOLERANCE: f64 = 1e-4;

    #[fixture]
    fn sky() -> Sky {
        Sky::default()
    }

    fn seconds(n: i64) -> TimeDuration {
        TimeDuration::from_seconds(n)
    }

    fn minutes(n: i64) -> TimeDuration {
        TimeDuration::from_minutes(n)
    }

    fn hours(n: i64) -> TimeDuration {
        TimeDuration::from_hours(n)
    }

    #[rstest]
    fn test_default_daylight_level() {
        assert_eq!(default_daylight_level(), 100.);
        assert_eq!(current_daylight_level(TimePoint::TURN_ZERO), 100.);
    }

    #[rstest]
    fn test_sunlight_through_the_day(sky: Sky) {
        let midnight = TimePoint::TURN_ZERO;
        let sunrise = sky.sunrise(midnight);
        let sunset = sky.sunset(midnight);

        for (t, expected) in [
            (midnight, 1.0),
            (sunrise, 1.0),
            (sunrise + seconds(1), 1.0275),
            (sunrise + minutes(1), 2.65),
            (sunrise + minutes(15), 25.75),
            (sunrise + minutes(30), 50.50),
            (sunrise + minutes(45), 75.25),
            (sunrise + hours(1) - seconds(1), 99.9725),
            (sunrise + hours(1), 100.0),
            (sunrise + hours(2), 100.0),
            (sunrise + hours(3), 100.0),
            (midnight + hours(12), 100.0),
            (midnight + hours(13), 100.0),
            (midnight + hours(14), 100.0),
            (sunset, 100.0),
            (sunset + seconds(1), 99.9725),
            (sunset + minutes(15), 75.25),
            (sunset + minutes(30), 50.50),
            (sunset + minutes(45), 25.75),
            (sunset + hours(1) - seconds(1), 1.0275),
            (sunset + hours(1), 1.0),
            (sunset + hours(2), 1.0),
            (sunset + hours(3), 1.0),
        ] {
            assert_abs_diff_eq!(sky.sunlight(t), expected, epsilon = TOLERANCE);
        }
    }

    #[rstest]
    fn test_sunlight_is_monotonic_through_the_dawn_ramp(sky: Sky) {
        let sunrise = sky.sunrise(TimePoint::TURN_ZERO);
        let levels = (0..=60)
            .map(|m| sky.sunlight(sunrise + minutes(m)))
            .collect::<Vec<_>>();

        assert!(levels.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[rstest]
    fn test_sunlight_at_night_is_moonlight(sky: Sky) {
        let new_moon = TimePoint::TURN_ZERO;
        let full_moon = new_moon + TimeDuration::season_length() / 6;

        assert_abs_diff_eq!(sky.sunlight(new_moon), 1.0, epsilon = TOLERANCE);
        assert_abs_diff_eq!(sky.sunlight(full_moon), 10.0, epsilon = TOLERANCE);
    }

    #[rstest]
    #[case(0, 100.)]
    #[case(91, 125.)]
    #[case(91 + 45, 112.63736)]
    #[case(182, 100.)]
    #[case(273, 75.)]
    #[case(363, 99.72527)]
    fn test_seasonal_daylight_level(#[case] day: i64, #[case] expected: f64) {
        let noon = TimePoint::TURN_ZERO + TimeDuration::from_days(day) + hours(12);
        assert_abs_diff_eq!(current_daylight_level(noon), expected, epsilon = TOLERANCE);
    }
}
