//! Per-device configuration building
//!
//! Turns the abstract `UserParameters` into the concrete configuration one
//! device should be sent. A stream the user enabled stays `None` when the
//! device cannot record it.

use crate::device::{
    AccelerometerModel, AccelerometerRate, AccelerometerScale, AmbientLightGain,
    AmbientLightRate, BarometerModel, BarometerOversampling, BarometerStandby, FusionMode,
    FusionOutput, GyroscopeModel, GyroscopeRange, GyroscopeRate, HumidityOversampling,
    MagnetometerRate, ModuleSet, OptionCase, PollingPeriod,
};
use serde::{Deserialize, Serialize};

use super::user::{Stream, UserParameters};

/// Fusion algorithm per magnetometer presence.
///
/// Every fusion output goes through this one table.
const FUSION_MODES: [(bool, FusionMode); 2] = [(true, FusionMode::Ndof), (false, FusionMode::ImuPlus)];

/// Fusion algorithm a device runs, derived from its inventory
pub fn fusion_mode_for(modules: &ModuleSet) -> FusionMode {
    let has_magnetometer = modules.magnetometer().is_some();
    FUSION_MODES
        .iter()
        .find(|(with_magnetometer, _)| *with_magnetometer == has_magnetometer)
        .map(|(_, mode)| *mode)
        .unwrap_or(FusionMode::ImuPlus)
}

// =============================================================================
// Configuration Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccelerometerConfig {
    pub model: AccelerometerModel,
    #[serde(with = "raw_case")]
    pub rate: AccelerometerRate,
    #[serde(with = "raw_case")]
    pub scale: AccelerometerScale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GyroscopeConfig {
    pub model: GyroscopeModel,
    #[serde(with = "raw_case")]
    pub rate: GyroscopeRate,
    #[serde(with = "raw_case")]
    pub range: GyroscopeRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagnetometerConfig {
    #[serde(with = "raw_case")]
    pub rate: MagnetometerRate,
}

/// How barometer readings are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarometerOutput {
    Altitude,
    Pressure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarometerConfig {
    pub model: BarometerModel,
    pub output: BarometerOutput,
    #[serde(with = "raw_case")]
    pub standby: BarometerStandby,
    #[serde(with = "raw_case")]
    pub oversampling: BarometerOversampling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumidityConfig {
    #[serde(with = "raw_case")]
    pub period: PollingPeriod,
    #[serde(with = "raw_case")]
    pub oversampling: HumidityOversampling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbientLightConfig {
    #[serde(with = "raw_case")]
    pub rate: AmbientLightRate,
    #[serde(with = "raw_case")]
    pub gain: AmbientLightGain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermometerConfig {
    /// Position of the onboard thermistor in the device's source list
    pub source_index: usize,
    #[serde(with = "raw_case")]
    pub period: PollingPeriod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionConfig {
    #[serde(with = "raw_case")]
    pub mode: FusionMode,
    #[serde(with = "raw_case")]
    pub output: FusionOutput,
}

/// Concrete configuration for one device
///
/// `None` means the stream is off or the device cannot record it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfiguration {
    pub accelerometer: Option<AccelerometerConfig>,
    pub gyroscope: Option<GyroscopeConfig>,
    pub magnetometer: Option<MagnetometerConfig>,
    pub barometer: Option<BarometerConfig>,
    pub humidity: Option<HumidityConfig>,
    pub ambient_light: Option<AmbientLightConfig>,
    pub thermometer: Option<ThermometerConfig>,
    pub fusion: Option<FusionConfig>,
}

impl DeviceConfiguration {
    /// Nothing will be recorded
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Serde adapter writing option enums as their raw value
mod raw_case {
    use crate::device::OptionCase;
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: OptionCase,
        T::Raw: Serialize,
        S: Serializer,
    {
        value.raw().serialize(serializer)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: OptionCase,
        T::Raw: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let raw = T::Raw::deserialize(deserializer)?;
        T::from_raw(raw).ok_or_else(|| D::Error::custom("unsupported option value"))
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Build the configuration for one device
pub fn build(params: &UserParameters, modules: &ModuleSet) -> DeviceConfiguration {
    let mut config = DeviceConfiguration::default();

    if params.is_enabled(Stream::Accelerometer) {
        config.accelerometer = modules.accelerometer().map(|model| AccelerometerConfig {
            model,
            rate: params.accelerometer.rate.nearest_in(model.supported_rates()),
            scale: params.accelerometer.scale.nearest_in(model.supported_scales()),
        });
    }

    if params.is_enabled(Stream::Gyroscope) {
        config.gyroscope = modules.gyroscope().map(|model| GyroscopeConfig {
            model,
            rate: params.gyroscope.rate.nearest_in(model.supported_rates()),
            range: params.gyroscope.range.nearest_in(model.supported_ranges()),
        });
    }

    if params.is_enabled(Stream::Magnetometer) {
        config.magnetometer = modules.magnetometer().map(|_| MagnetometerConfig {
            rate: params.magnetometer.rate,
        });
    }

    let barometer_output = if params.is_enabled(Stream::Altitude) {
        Some(BarometerOutput::Altitude)
    } else if params.is_enabled(Stream::Pressure) {
        Some(BarometerOutput::Pressure)
    } else {
        None
    };
    if let Some(output) = barometer_output {
        config.barometer = modules.barometer().map(|model| BarometerConfig {
            model,
            output,
            standby: params.barometer.standby.nearest_in(model.supported_standby()),
            oversampling: params.barometer.oversampling,
        });
    }

    if params.is_enabled(Stream::Humidity) {
        config.humidity = modules.humidity().map(|model| HumidityConfig {
            period: params.humidity.period.nearest_in(&model.supported_periods()),
            oversampling: params.humidity.oversampling,
        });
    }

    if params.is_enabled(Stream::AmbientLight) {
        config.ambient_light = modules.ambient_light().map(|_| AmbientLightConfig {
            rate: params.ambient_light.rate,
            gain: params.ambient_light.gain,
        });
    }

    if params.is_enabled(Stream::Temperature) {
        config.thermometer = modules.onboard_thermistor_index().map(|source_index| ThermometerConfig {
            source_index,
            period: params.temperature.period,
        });
    }

    if params.is_enabled(Stream::SensorFusion) && modules.has_sensor_fusion() {
        config.fusion = Some(FusionConfig {
            mode: fusion_mode_for(modules),
            output: params.fusion.output,
        });
    }

    config
}

/// Build one configuration per device, in group order
pub fn build_group(params: &UserParameters, group: &[ModuleSet]) -> Vec<DeviceConfiguration> {
    group.iter().map(|modules| build(params, modules)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{MagnetometerModel, Module, ThermistorSource};

    fn imu(accelerometer: AccelerometerModel) -> ModuleSet {
        ModuleSet::new()
            .with(Module::Accelerometer(accelerometer))
            .with(Module::Gyroscope(GyroscopeModel::Bmi160))
            .with(Module::SensorFusion)
    }

    #[test]
    fn test_disabled_streams_are_empty() {
        let config = build(&UserParameters::new(), &imu(AccelerometerModel::Bmi160));
        assert!(config.is_empty());
    }

    #[test]
    fn test_enabled_stream_missing_on_device_stays_empty() {
        let params = UserParameters::new()
            .with(Stream::Accelerometer)
            .with(Stream::Magnetometer);
        let config = build(&params, &imu(AccelerometerModel::Bmi160));
        assert!(config.accelerometer.is_some());
        assert!(config.magnetometer.is_none());
    }

    #[test]
    fn test_accelerometer_rate_snaps_to_model() {
        let mut params = UserParameters::new().with(Stream::Accelerometer);
        params.accelerometer.rate = AccelerometerRate::Hz1600;
        params.accelerometer.scale = AccelerometerScale::G16;

        let config = build(&params, &imu(AccelerometerModel::Mma8452q));
        let accelerometer = config.accelerometer.unwrap();
        assert_eq!(accelerometer.model, AccelerometerModel::Mma8452q);
        assert_eq!(accelerometer.rate, AccelerometerRate::Hz800);
        assert_eq!(accelerometer.scale, AccelerometerScale::G8);
    }

    #[test]
    fn test_fusion_mode_follows_magnetometer_presence() {
        let without_mag = imu(AccelerometerModel::Bmi160);
        let with_mag = without_mag
            .clone()
            .with(Module::Magnetometer(MagnetometerModel::Bmm150));

        for output in FusionOutput::all() {
            let mut params = UserParameters::new().with(Stream::SensorFusion);
            params.fusion.output = output;

            let fusion = build(&params, &with_mag).fusion.unwrap();
            assert_eq!(fusion.mode, FusionMode::Ndof);
            assert_eq!(fusion.output, output);

            let fusion = build(&params, &without_mag).fusion.unwrap();
            assert_eq!(fusion.mode, FusionMode::ImuPlus);
            assert_eq!(fusion.output, output);
        }
    }

    #[test]
    fn test_fusion_requires_fusion_module() {
        let params = UserParameters::new().with(Stream::SensorFusion);
        let modules = ModuleSet::new().with(Module::Accelerometer(AccelerometerModel::Bmi160));
        assert!(build(&params, &modules).fusion.is_none());
    }

    #[test]
    fn test_thermometer_uses_onboard_source_index() {
        let params = UserParameters::new().with(Stream::Temperature);

        let modules = ModuleSet::new().with(Module::Thermometer(vec![
            ThermistorSource::NrfDie,
            ThermistorSource::External,
            ThermistorSource::Onboard,
        ]));
        assert_eq!(build(&params, &modules).thermometer.unwrap().source_index, 2);

        let modules = ModuleSet::new().with(Module::Thermometer(vec![ThermistorSource::NrfDie]));
        assert!(build(&params, &modules).thermometer.is_none());
    }

    #[test]
    fn test_barometer_output_and_standby() {
        let mut params = UserParameters::new().with(Stream::Pressure);
        params.barometer.standby = BarometerStandby::Ms4000;

        let modules = ModuleSet::new().with(Module::Barometer(BarometerModel::Bme280));
        let barometer = build(&params, &modules).barometer.unwrap();
        assert_eq!(barometer.output, BarometerOutput::Pressure);
        assert_eq!(barometer.standby, BarometerStandby::Ms1000);

        params.enable(Stream::Altitude);
        let barometer = build(&params, &modules).barometer.unwrap();
        assert_eq!(barometer.output, BarometerOutput::Altitude);
    }

    #[test]
    fn test_build_group_keeps_order() {
        let params = UserParameters::new().with(Stream::Accelerometer);
        let group = [imu(AccelerometerModel::Bmi160), imu(AccelerometerModel::Bma255)];
        let configs = build_group(&params, &group);
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].accelerometer.unwrap().model, AccelerometerModel::Bmi160);
        assert_eq!(configs[1].accelerometer.unwrap().model, AccelerometerModel::Bma255);
    }

    #[test]
    fn test_configuration_serializes_raw_values() {
        let mut params = UserParameters::new().with(Stream::Accelerometer);
        params.accelerometer.rate = AccelerometerRate::Hz12_5;
        let config = build(&params, &imu(AccelerometerModel::Bmi160));

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["accelerometer"]["rate"], 12.5);
        assert_eq!(json["accelerometer"]["model"], "bmi160");

        let back: DeviceConfiguration = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
