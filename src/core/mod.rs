pub mod bionics;
pub mod character;
pub mod energy_supply;
pub mod item;
pub mod sky;
pub(crate) mod solvers;
pub mod units;
