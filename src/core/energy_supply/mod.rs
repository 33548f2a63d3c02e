pub mod battery;
pub mod reservoir;
pub mod ups;
