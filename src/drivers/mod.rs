//! Actuator and input drivers plus ADC initialisation.

pub mod button;
pub mod hw_init;
pub mod led;
pub mod motor;
