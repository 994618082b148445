pub mod config;
pub mod round;
pub mod sequencer;
pub mod timer;
