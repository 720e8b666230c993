//! User parameter selection
//!
//! `UserParameters` holds the abstract recording choice a user makes for a
//! group of devices. The enable flags are private and only change through
//! guarded transitions, so mutually exclusive streams can never be on at
//! the same time.

use crate::device::{
    AccelerometerRate, AccelerometerScale, AmbientLightGain, AmbientLightRate,
    BarometerOversampling, BarometerStandby, Channel, FusionOutput, GyroscopeRange,
    GyroscopeRate, HumidityOversampling, MagnetometerRate, OptionCase, PollingPeriod,
};
use std::collections::BTreeSet;

use super::legal::LegalOptions;

/// A user-facing recording toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stream {
    Accelerometer,
    Gyroscope,
    Magnetometer,
    SensorFusion,
    Altitude,
    Pressure,
    Humidity,
    AmbientLight,
    Temperature,
}

impl Stream {
    pub const ALL: [Stream; 9] = [
        Stream::Accelerometer,
        Stream::Gyroscope,
        Stream::Magnetometer,
        Stream::SensorFusion,
        Stream::Altitude,
        Stream::Pressure,
        Stream::Humidity,
        Stream::AmbientLight,
        Stream::Temperature,
    ];

    /// Device channel that records this stream
    pub fn channel(self) -> Channel {
        match self {
            Stream::Accelerometer => Channel::Accelerometer,
            Stream::Gyroscope => Channel::Gyroscope,
            Stream::Magnetometer => Channel::Magnetometer,
            Stream::SensorFusion => Channel::SensorFusion,
            Stream::Altitude | Stream::Pressure => Channel::Barometer,
            Stream::Humidity => Channel::Humidity,
            Stream::AmbientLight => Channel::AmbientLight,
            Stream::Temperature => Channel::Thermometer,
        }
    }

    /// Streams switched off when this one is switched on
    pub fn excludes(self) -> &'static [Stream] {
        match self {
            Stream::Accelerometer | Stream::Gyroscope | Stream::Magnetometer => {
                &[Stream::SensorFusion]
            }
            Stream::SensorFusion => &[Stream::Accelerometer, Stream::Gyroscope, Stream::Magnetometer],
            Stream::Altitude => &[Stream::Pressure],
            Stream::Pressure => &[Stream::Altitude],
            Stream::Humidity | Stream::AmbientLight | Stream::Temperature => &[],
        }
    }

    /// Stable persisted name
    pub fn key(self) -> &'static str {
        match self {
            Stream::Accelerometer => "accelerometer",
            Stream::Gyroscope => "gyroscope",
            Stream::Magnetometer => "magnetometer",
            Stream::SensorFusion => "sensorFusion",
            Stream::Altitude => "altitude",
            Stream::Pressure => "pressure",
            Stream::Humidity => "humidity",
            Stream::AmbientLight => "ambientLight",
            Stream::Temperature => "temperature",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Stream::ALL.into_iter().find(|stream| stream.key() == key)
    }
}

// =============================================================================
// Per-Channel Choices
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccelerometerChoice {
    pub rate: AccelerometerRate,
    pub scale: AccelerometerScale,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GyroscopeChoice {
    pub rate: GyroscopeRate,
    pub range: GyroscopeRange,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MagnetometerChoice {
    pub rate: MagnetometerRate,
}

/// Shared by the altitude and pressure streams
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BarometerChoice {
    pub standby: BarometerStandby,
    pub oversampling: BarometerOversampling,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HumidityChoice {
    pub period: PollingPeriod,
    pub oversampling: HumidityOversampling,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmbientLightChoice {
    pub rate: AmbientLightRate,
    pub gain: AmbientLightGain,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemperatureChoice {
    pub period: PollingPeriod,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FusionChoice {
    pub output: FusionOutput,
}

// =============================================================================
// User Parameters
// =============================================================================

/// Abstract recording selection for a device group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserParameters {
    enabled: BTreeSet<Stream>,
    pub accelerometer: AccelerometerChoice,
    pub gyroscope: GyroscopeChoice,
    pub magnetometer: MagnetometerChoice,
    pub barometer: BarometerChoice,
    pub humidity: HumidityChoice,
    pub ambient_light: AmbientLightChoice,
    pub temperature: TemperatureChoice,
    pub fusion: FusionChoice,
}

impl UserParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self, stream: Stream) -> bool {
        self.enabled.contains(&stream)
    }

    /// Enabled streams in declaration order
    pub fn enabled_streams(&self) -> impl Iterator<Item = Stream> + '_ {
        self.enabled.iter().copied()
    }

    pub fn has_enabled_streams(&self) -> bool {
        !self.enabled.is_empty()
    }

    /// Switch a stream on, switching off everything it excludes
    pub fn enable(&mut self, stream: Stream) {
        for excluded in stream.excludes() {
            self.enabled.remove(excluded);
        }
        self.enabled.insert(stream);
        self.check_exclusivity();
    }

    /// Switch a stream off. Never affects other streams.
    pub fn disable(&mut self, stream: Stream) {
        self.enabled.remove(&stream);
    }

    pub fn set_enabled(&mut self, stream: Stream, enabled: bool) {
        if enabled {
            self.enable(stream);
        } else {
            self.disable(stream);
        }
    }

    pub fn toggle(&mut self, stream: Stream) {
        let enabled = self.is_enabled(stream);
        self.set_enabled(stream, !enabled);
    }

    /// Builder-style `enable`
    pub fn with(mut self, stream: Stream) -> Self {
        self.enable(stream);
        self
    }

    /// Restrict the selection to what `legal` allows.
    ///
    /// Streams the group cannot record are switched off and every choice
    /// is moved to the nearest legal value.
    pub fn conform_to(&mut self, legal: &LegalOptions) {
        for stream in Stream::ALL {
            if self.is_enabled(stream) && !legal.is_available(stream) {
                tracing::debug!("Disabling {:?}: not available for the selected devices", stream);
                self.disable(stream);
            }
        }

        self.accelerometer.rate = self.accelerometer.rate.nearest_in(&legal.accelerometer_rates);
        self.accelerometer.scale = self.accelerometer.scale.nearest_in(&legal.accelerometer_scales);
        self.gyroscope.rate = self.gyroscope.rate.nearest_in(&legal.gyroscope_rates);
        self.gyroscope.range = self.gyroscope.range.nearest_in(&legal.gyroscope_ranges);
        self.magnetometer.rate = self.magnetometer.rate.nearest_in(&legal.magnetometer_rates);
        self.barometer.standby = self.barometer.standby.nearest_in(&legal.barometer_standby);
        self.barometer.oversampling =
            self.barometer.oversampling.nearest_in(&legal.barometer_oversampling);
        self.humidity.period = self.humidity.period.nearest_in(&legal.humidity_periods);
        self.humidity.oversampling =
            self.humidity.oversampling.nearest_in(&legal.humidity_oversampling);
        self.ambient_light.rate = self.ambient_light.rate.nearest_in(&legal.ambient_light_rates);
        self.ambient_light.gain = self.ambient_light.gain.nearest_in(&legal.ambient_light_gains);
        self.temperature.period = self.temperature.period.nearest_in(&legal.temperature_periods);
        self.fusion.output = self.fusion.output.nearest_in(&legal.fusion_outputs);
    }

    /// Exclusive streams being on together is a logic error in this module,
    /// since only the guarded transitions above can change the flags.
    fn check_exclusivity(&self) {
        debug_assert!(
            Stream::ALL.iter().all(|stream| !self.is_enabled(*stream)
                || stream.excludes().iter().all(|other| !self.is_enabled(*other))),
            "mutually exclusive streams enabled together: {:?}",
            self.enabled
        );
    }
}
