//! Recording parameters
//!
//! This module covers the path from a device group to the commands each
//! device receives:
//! - `legal`: which options the whole group can honour
//! - `user`: the user's abstract selection and its guarded transitions
//! - `builder`: per-device configuration for a selection

pub mod builder;
pub mod legal;
pub mod user;

pub use builder::{
    build, build_group, fusion_mode_for, AccelerometerConfig, AmbientLightConfig,
    BarometerConfig, BarometerOutput, DeviceConfiguration, FusionConfig, GyroscopeConfig,
    HumidityConfig, MagnetometerConfig, ThermometerConfig,
};
pub use legal::{resolve, LegalOptions};
pub use user::{
    AccelerometerChoice, AmbientLightChoice, BarometerChoice, FusionChoice, GyroscopeChoice,
    HumidityChoice, MagnetometerChoice, Stream, TemperatureChoice, UserParameters,
};
