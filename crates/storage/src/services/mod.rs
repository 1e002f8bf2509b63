pub mod composer;
pub mod progression;
pub mod runner;
