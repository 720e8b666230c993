//! Device module inventory
//!
//! A `ModuleSet` is what a connected device reports about itself: which
//! channels it has and which silicon implements each of them. It is owned
//! by the device registry outside this crate and only read here.

use super::options::{
    AccelerometerRate, AccelerometerScale, BarometerStandby, GyroscopeRange, GyroscopeRate,
    OptionCase, PollingPeriod,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sensor capability category reported by a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    Accelerometer,
    Gyroscope,
    Magnetometer,
    Barometer,
    Humidity,
    AmbientLight,
    Thermometer,
    SensorFusion,
}

impl Channel {
    pub const ALL: [Channel; 8] = [
        Channel::Accelerometer,
        Channel::Gyroscope,
        Channel::Magnetometer,
        Channel::Barometer,
        Channel::Humidity,
        Channel::AmbientLight,
        Channel::Thermometer,
        Channel::SensorFusion,
    ];
}

// =============================================================================
// Hardware Variants
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccelerometerModel {
    Bmi160,
    Bmi270,
    Bma255,
    Mma8452q,
}

impl AccelerometerModel {
    /// Output data rates this part can run at
    pub fn supported_rates(self) -> &'static [AccelerometerRate] {
        use AccelerometerRate::*;
        match self {
            AccelerometerModel::Bmi160 | AccelerometerModel::Bmi270 => {
                &[Hz12_5, Hz25, Hz50, Hz100, Hz200, Hz400, Hz800, Hz1600]
            }
            AccelerometerModel::Bma255 => &[Hz25, Hz50, Hz100, Hz200, Hz400, Hz800],
            AccelerometerModel::Mma8452q => {
                &[Hz1_5625, Hz6_25, Hz12_5, Hz50, Hz100, Hz200, Hz400, Hz800]
            }
        }
    }

    /// Full-scale ranges this part supports
    pub fn supported_scales(self) -> &'static [AccelerometerScale] {
        use AccelerometerScale::*;
        match self {
            AccelerometerModel::Mma8452q => &[G2, G4, G8],
            _ => &[G2, G4, G8, G16],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GyroscopeModel {
    Bmi160,
    Bmi270,
}

impl GyroscopeModel {
    pub fn supported_rates(self) -> &'static [GyroscopeRate] {
        use GyroscopeRate::*;
        match self {
            GyroscopeModel::Bmi160 => &[Hz25, Hz50, Hz100, Hz200, Hz400, Hz800, Hz1600, Hz3200],
            GyroscopeModel::Bmi270 => &[Hz25, Hz50, Hz100, Hz200, Hz400, Hz800, Hz1600],
        }
    }

    pub fn supported_ranges(self) -> &'static [GyroscopeRange] {
        use GyroscopeRange::*;
        &[Dps125, Dps250, Dps500, Dps1000, Dps2000]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MagnetometerModel {
    Bmm150,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BarometerModel {
    Bmp280,
    Bme280,
}

impl BarometerModel {
    /// Standby times the part accepts
    ///
    /// The BME280 replaces the two longest BMP280 standby settings with
    /// 10 ms and 20 ms, so mixed groups only share the common middle.
    pub fn supported_standby(self) -> &'static [BarometerStandby] {
        use BarometerStandby::*;
        match self {
            BarometerModel::Bmp280 => &[Ms0_5, Ms62_5, Ms125, Ms250, Ms500, Ms1000, Ms2000, Ms4000],
            BarometerModel::Bme280 => &[Ms0_5, Ms10, Ms20, Ms62_5, Ms125, Ms250, Ms500, Ms1000],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HumidityModel {
    Bme280,
}

impl HumidityModel {
    /// Polling periods the part can keep up with
    pub fn supported_periods(self) -> Vec<PollingPeriod> {
        match self {
            HumidityModel::Bme280 => PollingPeriod::all()
                .into_iter()
                .filter(|period| *period >= PollingPeriod::S1)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AmbientLightModel {
    Ltr329,
}

/// A temperature source a device exposes through its thermometer channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThermistorSource {
    NrfDie,
    Onboard,
    External,
    Bmp280,
}

// =============================================================================
// Module Set
// =============================================================================

/// One reported module and the variant implementing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Module {
    Accelerometer(AccelerometerModel),
    Gyroscope(GyroscopeModel),
    Magnetometer(MagnetometerModel),
    Barometer(BarometerModel),
    Humidity(HumidityModel),
    AmbientLight(AmbientLightModel),
    /// Temperature sources in the order the device reports them
    Thermometer(Vec<ThermistorSource>),
    SensorFusion,
}

impl Module {
    pub fn channel(&self) -> Channel {
        match self {
            Module::Accelerometer(_) => Channel::Accelerometer,
            Module::Gyroscope(_) => Channel::Gyroscope,
            Module::Magnetometer(_) => Channel::Magnetometer,
            Module::Barometer(_) => Channel::Barometer,
            Module::Humidity(_) => Channel::Humidity,
            Module::AmbientLight(_) => Channel::AmbientLight,
            Module::Thermometer(_) => Channel::Thermometer,
            Module::SensorFusion => Channel::SensorFusion,
        }
    }
}

/// Channel inventory of a single device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSet {
    modules: BTreeMap<Channel, Module>,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module, replacing any previous module on the same channel
    pub fn insert(&mut self, module: Module) {
        self.modules.insert(module.channel(), module);
    }

    pub fn with(mut self, module: Module) -> Self {
        self.insert(module);
        self
    }

    pub fn get(&self, channel: Channel) -> Option<&Module> {
        self.modules.get(&channel)
    }

    pub fn contains(&self, channel: Channel) -> bool {
        self.modules.contains_key(&channel)
    }

    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.modules.keys().copied()
    }

    pub fn accelerometer(&self) -> Option<AccelerometerModel> {
        match self.get(Channel::Accelerometer) {
            Some(Module::Accelerometer(model)) => Some(*model),
            _ => None,
        }
    }

    pub fn gyroscope(&self) -> Option<GyroscopeModel> {
        match self.get(Channel::Gyroscope) {
            Some(Module::Gyroscope(model)) => Some(*model),
            _ => None,
        }
    }

    pub fn magnetometer(&self) -> Option<MagnetometerModel> {
        match self.get(Channel::Magnetometer) {
            Some(Module::Magnetometer(model)) => Some(*model),
            _ => None,
        }
    }

    pub fn barometer(&self) -> Option<BarometerModel> {
        match self.get(Channel::Barometer) {
            Some(Module::Barometer(model)) => Some(*model),
            _ => None,
        }
    }

    pub fn humidity(&self) -> Option<HumidityModel> {
        match self.get(Channel::Humidity) {
            Some(Module::Humidity(model)) => Some(*model),
            _ => None,
        }
    }

    pub fn ambient_light(&self) -> Option<AmbientLightModel> {
        match self.get(Channel::AmbientLight) {
            Some(Module::AmbientLight(model)) => Some(*model),
            _ => None,
        }
    }

    pub fn thermometer_sources(&self) -> Option<&[ThermistorSource]> {
        match self.get(Channel::Thermometer) {
            Some(Module::Thermometer(sources)) => Some(sources),
            _ => None,
        }
    }

    /// Index of the onboard thermistor within the reported source list
    pub fn onboard_thermistor_index(&self) -> Option<usize> {
        self.thermometer_sources()?
            .iter()
            .position(|source| *source == ThermistorSource::Onboard)
    }

    pub fn has_sensor_fusion(&self) -> bool {
        self.contains(Channel::SensorFusion)
    }
}

impl FromIterator<Module> for ModuleSet {
    fn from_iter<I: IntoIterator<Item = Module>>(iter: I) -> Self {
        let mut set = ModuleSet::new();
        for module in iter {
            set.insert(module);
        }
        set
    }
}
