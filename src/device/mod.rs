//! Device capability model
//!
//! Channels, hardware variants, and the enumerated option domains
//! shared by legality resolution, configuration building and persistence.

pub mod module_set;
pub mod options;

pub use module_set::{
    AccelerometerModel, AmbientLightModel, BarometerModel, Channel, GyroscopeModel,
    HumidityModel, MagnetometerModel, Module, ModuleSet, ThermistorSource,
};
pub use options::{
    AccelerometerRate, AccelerometerScale, AmbientLightGain, AmbientLightRate,
    BarometerOversampling, BarometerStandby, FusionMode, FusionOutput, GyroscopeRange,
    GyroscopeRate, HumidityOversampling, MagnetometerRate, OptionCase, PollingPeriod, RawValue,
};
