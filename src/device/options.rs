//! Enumerated option domains
//!
//! Every recording option with a fixed domain (rates, scales, gains,
//! outputs) is declared once here together with its persisted raw value.
//! The same table drives both directions of the mapping, so the domain
//! enum and the stored representation cannot drift apart.

/// Raw representation of an enumerated option as persisted on disk.
pub trait RawValue: Copy {
    /// Whether two raw values denote the same canonical value.
    fn same(&self, other: &Self) -> bool;

    /// Numeric view used to measure distance between options.
    fn as_f64(&self) -> f64;
}

impl RawValue for f64 {
    fn same(&self, other: &Self) -> bool {
        (self - other).abs() <= 1e-6 * self.abs().max(other.abs()).max(1.0)
    }

    fn as_f64(&self) -> f64 {
        *self
    }
}

macro_rules! impl_raw_int {
    ($($t:ty),+) => {
        $(
            impl RawValue for $t {
                fn same(&self, other: &Self) -> bool {
                    self == other
                }

                fn as_f64(&self) -> f64 {
                    *self as f64
                }
            }
        )+
    };
}

impl_raw_int!(u8, u16, u32);

/// An enumerated option backed by a bidirectional raw-value table.
pub trait OptionCase: Copy + PartialEq + Default + 'static {
    type Raw: RawValue + 'static;

    /// Every case with its raw value, in ascending order.
    const TABLE: &'static [(Self, Self::Raw)];

    /// The persisted raw value of this case.
    fn raw(self) -> Self::Raw {
        Self::TABLE
            .iter()
            .find(|(case, _)| *case == self)
            .map(|(_, raw)| *raw)
            .unwrap_or_else(|| Self::TABLE[0].1)
    }

    /// Look up the case for a raw value, if the current domain still has one.
    fn from_raw(raw: Self::Raw) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(_, candidate)| candidate.same(&raw))
            .map(|(case, _)| *case)
    }

    /// Look up the case for a raw value, falling back to the default case
    /// when the stored value no longer exists in the domain.
    fn from_raw_or_default(raw: Self::Raw) -> Self {
        Self::from_raw(raw).unwrap_or_else(|| {
            tracing::debug!(
                "Unknown {} raw value {}, using default",
                std::any::type_name::<Self>(),
                raw.as_f64()
            );
            Self::default()
        })
    }

    /// The full domain in ascending order.
    fn all() -> Vec<Self> {
        Self::TABLE.iter().map(|(case, _)| *case).collect()
    }

    /// The option in `candidates` closest to this one by numeric value.
    ///
    /// Returns `self` when it is already a candidate or when there are
    /// no candidates at all.
    fn nearest_in(self, candidates: &[Self]) -> Self {
        if candidates.is_empty() || candidates.contains(&self) {
            return self;
        }
        let target = self.raw().as_f64();
        let mut best = candidates[0];
        for candidate in candidates {
            let distance = (candidate.raw().as_f64() - target).abs();
            if distance < (best.raw().as_f64() - target).abs() {
                best = *candidate;
            }
        }
        best
    }
}

macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident : $raw:ty, default $default:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl OptionCase for $name {
            type Raw = $raw;
            const TABLE: &'static [(Self, $raw)] = &[$(($name::$variant, $value)),+];
        }
    };
}

// =============================================================================
// Motion
// =============================================================================

option_enum! {
    /// Accelerometer output data rate in Hz
    AccelerometerRate: f64, default Hz100 {
        Hz1_5625 = 1.5625,
        Hz6_25 = 6.25,
        Hz12_5 = 12.5,
        Hz25 = 25.0,
        Hz50 = 50.0,
        Hz100 = 100.0,
        Hz200 = 200.0,
        Hz400 = 400.0,
        Hz800 = 800.0,
        Hz1600 = 1600.0,
    }
}

option_enum! {
    /// Accelerometer full-scale range in g
    AccelerometerScale: u8, default G4 {
        G2 = 2,
        G4 = 4,
        G8 = 8,
        G16 = 16,
    }
}

option_enum! {
    /// Gyroscope output data rate in Hz
    GyroscopeRate: f64, default Hz100 {
        Hz25 = 25.0,
        Hz50 = 50.0,
        Hz100 = 100.0,
        Hz200 = 200.0,
        Hz400 = 400.0,
        Hz800 = 800.0,
        Hz1600 = 1600.0,
        Hz3200 = 3200.0,
    }
}

option_enum! {
    /// Gyroscope full-scale range in degrees per second
    GyroscopeRange: u16, default Dps2000 {
        Dps125 = 125,
        Dps250 = 250,
        Dps500 = 500,
        Dps1000 = 1000,
        Dps2000 = 2000,
    }
}

option_enum! {
    /// Magnetometer output data rate in Hz
    MagnetometerRate: f64, default Hz10 {
        Hz10 = 10.0,
        Hz15 = 15.0,
        Hz20 = 20.0,
        Hz25 = 25.0,
    }
}

// =============================================================================
// Environment
// =============================================================================

option_enum! {
    /// Barometer standby time between measurements in milliseconds
    BarometerStandby: f64, default Ms500 {
        Ms0_5 = 0.5,
        Ms10 = 10.0,
        Ms20 = 20.0,
        Ms62_5 = 62.5,
        Ms125 = 125.0,
        Ms250 = 250.0,
        Ms500 = 500.0,
        Ms1000 = 1000.0,
        Ms2000 = 2000.0,
        Ms4000 = 4000.0,
    }
}

option_enum! {
    /// Barometer pressure oversampling
    BarometerOversampling: u8, default Standard {
        UltraLowPower = 1,
        LowPower = 2,
        Standard = 4,
        High = 8,
        UltraHigh = 16,
    }
}

option_enum! {
    /// Humidity oversampling factor
    HumidityOversampling: u8, default X1 {
        X1 = 1,
        X2 = 2,
        X4 = 4,
        X8 = 8,
        X16 = 16,
    }
}

option_enum! {
    /// Polling period in milliseconds for channels read on a timer
    PollingPeriod: u32, default S1 {
        Ms100 = 100,
        Ms500 = 500,
        S1 = 1_000,
        S2 = 2_000,
        S5 = 5_000,
        S10 = 10_000,
        S30 = 30_000,
        S60 = 60_000,
    }
}

option_enum! {
    /// Ambient light measurement rate in milliseconds
    AmbientLightRate: u16, default Ms500 {
        Ms50 = 50,
        Ms100 = 100,
        Ms200 = 200,
        Ms500 = 500,
        Ms1000 = 1000,
        Ms2000 = 2000,
    }
}

option_enum! {
    /// Ambient light sensor gain
    AmbientLightGain: u8, default X1 {
        X1 = 1,
        X2 = 2,
        X4 = 4,
        X8 = 8,
        X48 = 48,
        X96 = 96,
    }
}

// =============================================================================
// Sensor Fusion
// =============================================================================

option_enum! {
    /// Sensor fusion output selected by the user
    FusionOutput: u8, default EulerAngles {
        EulerAngles = 0,
        Gravity = 1,
        LinearAcceleration = 2,
        Quaternion = 3,
    }
}

option_enum! {
    /// Internal fusion algorithm variant
    FusionMode: u8, default Ndof {
        /// Nine degrees of freedom (accelerometer, gyroscope, magnetometer)
        Ndof = 1,
        /// Accelerometer and gyroscope only
        ImuPlus = 2,
        Compass = 3,
        M4g = 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_table_round_trips<T: OptionCase + std::fmt::Debug>() {
        for (case, raw) in T::TABLE {
            assert_eq!(case.raw().as_f64(), raw.as_f64());
            assert_eq!(T::from_raw(*raw), Some(*case));
        }
        assert_eq!(T::from_raw(T::default().raw()), Some(T::default()));
    }

    #[test]
    fn test_every_case_round_trips() {
        assert_table_round_trips::<AccelerometerRate>();
        assert_table_round_trips::<AccelerometerScale>();
        assert_table_round_trips::<GyroscopeRate>();
        assert_table_round_trips::<GyroscopeRange>();
        assert_table_round_trips::<MagnetometerRate>();
        assert_table_round_trips::<BarometerStandby>();
        assert_table_round_trips::<BarometerOversampling>();
        assert_table_round_trips::<HumidityOversampling>();
        assert_table_round_trips::<PollingPeriod>();
        assert_table_round_trips::<AmbientLightRate>();
        assert_table_round_trips::<AmbientLightGain>();
        assert_table_round_trips::<FusionOutput>();
        assert_table_round_trips::<FusionMode>();
    }

    #[test]
    fn test_tables_are_ascending() {
        let rates: Vec<f64> = AccelerometerRate::TABLE.iter().map(|(_, r)| *r).collect();
        assert!(rates.windows(2).all(|w| w[0] < w[1]));
        let mut sorted = AccelerometerRate::all();
        sorted.sort();
        assert_eq!(sorted, AccelerometerRate::all());
    }

    #[test]
    fn test_float_raw_matches_canonical_value() {
        assert_eq!(AccelerometerRate::from_raw(12.500000001), Some(AccelerometerRate::Hz12_5));
        assert_eq!(BarometerStandby::from_raw(62.5), Some(BarometerStandby::Ms62_5));
    }

    #[test]
    fn test_unknown_raw_falls_back_to_default() {
        assert_eq!(AccelerometerRate::from_raw(3.0), None);
        assert_eq!(AccelerometerRate::from_raw_or_default(3.0), AccelerometerRate::Hz100);
        assert_eq!(GyroscopeRange::from_raw_or_default(42), GyroscopeRange::Dps2000);
    }

    #[test]
    fn test_nearest_in() {
        let candidates = [AccelerometerRate::Hz25, AccelerometerRate::Hz200];
        // 100 is 75 from 25 and 100 from 200
        assert_eq!(AccelerometerRate::Hz100.nearest_in(&candidates), AccelerometerRate::Hz25);
        assert_eq!(AccelerometerRate::Hz400.nearest_in(&candidates), AccelerometerRate::Hz200);
        assert_eq!(AccelerometerRate::Hz1600.nearest_in(&candidates), AccelerometerRate::Hz200);
        assert_eq!(AccelerometerRate::Hz50.nearest_in(&candidates), AccelerometerRate::Hz25);
        assert_eq!(AccelerometerRate::Hz25.nearest_in(&candidates), AccelerometerRate::Hz25);
        assert_eq!(AccelerometerRate::Hz25.nearest_in(&[]), AccelerometerRate::Hz25);
    }
}
