//! Persisted shapes of `UserParameters`
//!
//! Option enums are stored as raw values and mapped back through the
//! shared option tables. A raw value that no longer exists falls back to
//! the option's default. Enable flags are replayed through the guarded
//! transitions so stored data can never produce an exclusive pair.

use crate::device::{
    AccelerometerRate, AccelerometerScale, AmbientLightGain, AmbientLightRate,
    BarometerOversampling, BarometerStandby, FusionOutput, GyroscopeRange, GyroscopeRate,
    HumidityOversampling, MagnetometerRate, OptionCase, PollingPeriod,
};
use crate::parameters::{Stream, UserParameters};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current parameter shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserParametersDto {
    pub accelerometer: bool,
    pub gyroscope: bool,
    pub magnetometer: bool,
    pub sensor_fusion: bool,
    pub altitude: bool,
    pub pressure: bool,
    pub humidity: bool,
    pub ambient_light: bool,
    pub temperature: bool,

    pub accelerometer_rate: f64,
    pub accelerometer_scale: u8,
    pub gyroscope_rate: f64,
    pub gyroscope_range: u16,
    pub magnetometer_rate: f64,
    pub barometer_standby: f64,
    pub barometer_oversampling: u8,
    pub humidity_period: u32,
    pub humidity_oversampling: u8,
    pub ambient_light_rate: u16,
    pub ambient_light_gain: u8,
    pub temperature_period: u32,
    pub fusion_output: u8,
}

impl Default for UserParametersDto {
    fn default() -> Self {
        Self::from(&UserParameters::default())
    }
}

impl From<&UserParameters> for UserParametersDto {
    fn from(params: &UserParameters) -> Self {
        Self {
            accelerometer: params.is_enabled(Stream::Accelerometer),
            gyroscope: params.is_enabled(Stream::Gyroscope),
            magnetometer: params.is_enabled(Stream::Magnetometer),
            sensor_fusion: params.is_enabled(Stream::SensorFusion),
            altitude: params.is_enabled(Stream::Altitude),
            pressure: params.is_enabled(Stream::Pressure),
            humidity: params.is_enabled(Stream::Humidity),
            ambient_light: params.is_enabled(Stream::AmbientLight),
            temperature: params.is_enabled(Stream::Temperature),

            accelerometer_rate: params.accelerometer.rate.raw(),
            accelerometer_scale: params.accelerometer.scale.raw(),
            gyroscope_rate: params.gyroscope.rate.raw(),
            gyroscope_range: params.gyroscope.range.raw(),
            magnetometer_rate: params.magnetometer.rate.raw(),
            barometer_standby: params.barometer.standby.raw(),
            barometer_oversampling: params.barometer.oversampling.raw(),
            humidity_period: params.humidity.period.raw(),
            humidity_oversampling: params.humidity.oversampling.raw(),
            ambient_light_rate: params.ambient_light.rate.raw(),
            ambient_light_gain: params.ambient_light.gain.raw(),
            temperature_period: params.temperature.period.raw(),
            fusion_output: params.fusion.output.raw(),
        }
    }
}

impl From<&UserParametersDto> for UserParameters {
    fn from(dto: &UserParametersDto) -> Self {
        let mut params = UserParameters::new();
        let flags = [
            (Stream::Accelerometer, dto.accelerometer),
            (Stream::Gyroscope, dto.gyroscope),
            (Stream::Magnetometer, dto.magnetometer),
            (Stream::SensorFusion, dto.sensor_fusion),
            (Stream::Altitude, dto.altitude),
            (Stream::Pressure, dto.pressure),
            (Stream::Humidity, dto.humidity),
            (Stream::AmbientLight, dto.ambient_light),
            (Stream::Temperature, dto.temperature),
        ];
        for (stream, enabled) in flags {
            if enabled {
                params.enable(stream);
            }
        }

        params.accelerometer.rate = AccelerometerRate::from_raw_or_default(dto.accelerometer_rate);
        params.accelerometer.scale = AccelerometerScale::from_raw_or_default(dto.accelerometer_scale);
        params.gyroscope.rate = GyroscopeRate::from_raw_or_default(dto.gyroscope_rate);
        params.gyroscope.range = GyroscopeRange::from_raw_or_default(dto.gyroscope_range);
        params.magnetometer.rate = MagnetometerRate::from_raw_or_default(dto.magnetometer_rate);
        params.barometer.standby = BarometerStandby::from_raw_or_default(dto.barometer_standby);
        params.barometer.oversampling =
            BarometerOversampling::from_raw_or_default(dto.barometer_oversampling);
        params.humidity.period = PollingPeriod::from_raw_or_default(dto.humidity_period);
        params.humidity.oversampling =
            HumidityOversampling::from_raw_or_default(dto.humidity_oversampling);
        params.ambient_light.rate = AmbientLightRate::from_raw_or_default(dto.ambient_light_rate);
        params.ambient_light.gain = AmbientLightGain::from_raw_or_default(dto.ambient_light_gain);
        params.temperature.period = PollingPeriod::from_raw_or_default(dto.temperature_period);
        params.fusion.output = FusionOutput::from_raw_or_default(dto.fusion_output);
        params
    }
}

/// Legacy parameter shape: enabled stream names plus one rate per stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyParametersDto {
    pub streams: Vec<String>,
    pub rates: BTreeMap<String, f64>,
}

impl From<&LegacyParametersDto> for UserParameters {
    fn from(dto: &LegacyParametersDto) -> Self {
        let mut params = UserParameters::new();
        for key in &dto.streams {
            match Stream::from_key(key) {
                Some(stream) => params.enable(stream),
                None => tracing::debug!("Ignoring unknown legacy stream '{}'", key),
            }
        }

        let rate = |stream: Stream| dto.rates.get(stream.key()).copied();
        if let Some(raw) = rate(Stream::Accelerometer) {
            params.accelerometer.rate = AccelerometerRate::from_raw_or_default(raw);
        }
        if let Some(raw) = rate(Stream::Gyroscope) {
            params.gyroscope.rate = GyroscopeRate::from_raw_or_default(raw);
        }
        if let Some(raw) = rate(Stream::Magnetometer) {
            params.magnetometer.rate = MagnetometerRate::from_raw_or_default(raw);
        }
        if let Some(raw) = rate(Stream::AmbientLight) {
            params.ambient_light.rate = integral_case(raw);
        }
        if let Some(raw) = rate(Stream::Humidity) {
            params.humidity.period = integral_case(raw);
        }
        if let Some(raw) = rate(Stream::Temperature) {
            params.temperature.period = integral_case(raw);
        }
        params
    }
}

/// Map a legacy float onto an option with an integer raw value. Negative,
/// fractional or out-of-range values fall back to the default.
fn integral_case<T>(raw: f64) -> T
where
    T: OptionCase,
    T::Raw: TryFrom<u64>,
{
    let integral = (raw.is_finite() && raw >= 0.0 && raw.fract() == 0.0)
        .then(|| T::Raw::try_from(raw as u64).ok())
        .flatten();
    match integral {
        Some(raw) => T::from_raw_or_default(raw),
        None => {
            tracing::debug!("Ignoring non-integral legacy value {}", raw);
            T::default()
        }
    }
}
