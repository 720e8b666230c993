//! Legality resolution
//!
//! Computes which recording options every device in a group can honour at
//! the same time. A channel is only legal when every device reports it, and
//! each option list is the intersection of what every variant in the group
//! supports. Adding a device can therefore only shrink the result.
//!
//! Nothing here fails: an empty group or an incompatible group both resolve
//! to empty option lists that the UI renders as unavailable.

use crate::device::{
    AccelerometerRate, AccelerometerScale, AmbientLightGain, AmbientLightRate,
    BarometerOversampling, BarometerStandby, FusionOutput, GyroscopeRange, GyroscopeRate,
    HumidityOversampling, MagnetometerRate, ModuleSet, OptionCase, PollingPeriod,
};
use std::collections::BTreeSet;

use super::user::{Stream, UserParameters};

/// Options simultaneously valid for every device in a group
///
/// An empty list means the channel is unavailable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegalOptions {
    pub accelerometer_rates: Vec<AccelerometerRate>,
    pub accelerometer_scales: Vec<AccelerometerScale>,
    pub gyroscope_rates: Vec<GyroscopeRate>,
    pub gyroscope_ranges: Vec<GyroscopeRange>,
    pub magnetometer_rates: Vec<MagnetometerRate>,
    pub barometer_standby: Vec<BarometerStandby>,
    pub barometer_oversampling: Vec<BarometerOversampling>,
    pub humidity_periods: Vec<PollingPeriod>,
    pub humidity_oversampling: Vec<HumidityOversampling>,
    pub ambient_light_rates: Vec<AmbientLightRate>,
    pub ambient_light_gains: Vec<AmbientLightGain>,
    pub temperature_periods: Vec<PollingPeriod>,
    pub fusion_outputs: Vec<FusionOutput>,
    /// The group mixes accelerometer parts, so delivered rates may differ
    /// slightly between devices even at the same nominal setting.
    pub mixed_accelerometer_rates: bool,
}

impl LegalOptions {
    /// Nothing is available
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_available(&self, stream: Stream) -> bool {
        match stream {
            Stream::Accelerometer => !self.accelerometer_rates.is_empty(),
            Stream::Gyroscope => !self.gyroscope_rates.is_empty(),
            Stream::Magnetometer => !self.magnetometer_rates.is_empty(),
            Stream::SensorFusion => !self.fusion_outputs.is_empty(),
            Stream::Altitude | Stream::Pressure => !self.barometer_standby.is_empty(),
            Stream::Humidity => !self.humidity_periods.is_empty(),
            Stream::AmbientLight => !self.ambient_light_rates.is_empty(),
            Stream::Temperature => !self.temperature_periods.is_empty(),
        }
    }

    pub fn available_streams(&self) -> Vec<Stream> {
        Stream::ALL
            .into_iter()
            .filter(|stream| self.is_available(*stream))
            .collect()
    }

    /// Whether every enabled stream in `params` is available and every
    /// choice it makes for those streams is in the legal lists.
    pub fn permits(&self, params: &UserParameters) -> bool {
        params.enabled_streams().all(|stream| {
            self.is_available(stream)
                && match stream {
                    Stream::Accelerometer => {
                        self.accelerometer_rates.contains(&params.accelerometer.rate)
                            && self.accelerometer_scales.contains(&params.accelerometer.scale)
                    }
                    Stream::Gyroscope => {
                        self.gyroscope_rates.contains(&params.gyroscope.rate)
                            && self.gyroscope_ranges.contains(&params.gyroscope.range)
                    }
                    Stream::Magnetometer => self.magnetometer_rates.contains(&params.magnetometer.rate),
                    Stream::SensorFusion => self.fusion_outputs.contains(&params.fusion.output),
                    Stream::Altitude | Stream::Pressure => {
                        self.barometer_standby.contains(&params.barometer.standby)
                            && self.barometer_oversampling.contains(&params.barometer.oversampling)
                    }
                    Stream::Humidity => {
                        self.humidity_periods.contains(&params.humidity.period)
                            && self.humidity_oversampling.contains(&params.humidity.oversampling)
                    }
                    Stream::AmbientLight => {
                        self.ambient_light_rates.contains(&params.ambient_light.rate)
                            && self.ambient_light_gains.contains(&params.ambient_light.gain)
                    }
                    Stream::Temperature => self.temperature_periods.contains(&params.temperature.period),
                }
        })
    }
}

/// Narrow a full domain by what each device supports.
///
/// `supported` returns `None` when the device lacks the channel, which
/// empties the result for the whole group.
fn narrow<T, F>(group: &[ModuleSet], supported: F) -> Vec<T>
where
    T: OptionCase,
    F: Fn(&ModuleSet) -> Option<Vec<T>>,
{
    if group.is_empty() {
        return Vec::new();
    }
    let mut legal = T::all();
    for modules in group {
        match supported(modules) {
            Some(options) => legal.retain(|option| options.contains(option)),
            None => return Vec::new(),
        }
        if legal.is_empty() {
            break;
        }
    }
    legal
}

/// Resolve legal options for a device group
pub fn resolve(group: &[ModuleSet]) -> LegalOptions {
    if group.is_empty() {
        return LegalOptions::none();
    }

    let accelerometer_rates = narrow(group, |m| m.accelerometer().map(|a| a.supported_rates().to_vec()));
    let accelerometer_models: BTreeSet<_> = group.iter().filter_map(|m| m.accelerometer()).collect();
    let mixed_accelerometer_rates =
        !accelerometer_rates.is_empty() && accelerometer_models.len() > 1;

    let legal = LegalOptions {
        accelerometer_rates,
        accelerometer_scales: narrow(group, |m| {
            m.accelerometer().map(|a| a.supported_scales().to_vec())
        }),
        gyroscope_rates: narrow(group, |m| m.gyroscope().map(|g| g.supported_rates().to_vec())),
        gyroscope_ranges: narrow(group, |m| m.gyroscope().map(|g| g.supported_ranges().to_vec())),
        magnetometer_rates: narrow(group, |m| m.magnetometer().map(|_| MagnetometerRate::all())),
        barometer_standby: narrow(group, |m| m.barometer().map(|b| b.supported_standby().to_vec())),
        barometer_oversampling: narrow(group, |m| {
            m.barometer().map(|_| BarometerOversampling::all())
        }),
        humidity_periods: narrow(group, |m| m.humidity().map(|h| h.supported_periods())),
        humidity_oversampling: narrow(group, |m| m.humidity().map(|_| HumidityOversampling::all())),
        ambient_light_rates: narrow(group, |m| m.ambient_light().map(|_| AmbientLightRate::all())),
        ambient_light_gains: narrow(group, |m| m.ambient_light().map(|_| AmbientLightGain::all())),
        // The channel key alone is not enough: every device must expose the
        // onboard thermistor specifically.
        temperature_periods: narrow(group, |m| {
            m.onboard_thermistor_index().map(|_| PollingPeriod::all())
        }),
        fusion_outputs: narrow(group, |m| m.has_sensor_fusion().then(FusionOutput::all)),
        mixed_accelerometer_rates,
    };

    tracing::debug!(
        "Resolved legal options for {} device(s): {:?}",
        group.len(),
        legal.available_streams()
    );

    legal
}
