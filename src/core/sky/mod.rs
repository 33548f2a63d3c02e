pub mod daylight;
pub mod moon;
pub mod solar;

pub use daylight::{current_daylight_level, default_daylight_level};
pub use moon::{get_moon_phase, MoonPhase};
pub use solar::{solar_declination, solar_hour_angle, Sky};
