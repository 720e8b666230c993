//! Sensor presets
//!
//! Named, reusable parameter selections.

use super::repository::{Entry, Repository};
use crate::parameters::{LegalOptions, UserParameters};
use crate::persistence::{
    from_payload, to_payload, Codec, LegacyParametersDto, Persisted, UserParametersDto,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named parameter selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub id: Uuid,
    pub name: String,
    pub parameters: UserParameters,
}

impl Preset {
    /// Create a preset with a fresh id
    pub fn new(name: impl Into<String>, parameters: UserParameters) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            parameters,
        }
    }

    /// Same preset under a new name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Same preset with replaced parameters
    pub fn with_parameters(&self, parameters: UserParameters) -> Self {
        Self {
            parameters,
            ..self.clone()
        }
    }
}

impl Entry for Preset {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub type PresetRepository = Repository<Preset>;

impl Repository<Preset> {
    /// Presets whose every enabled stream and choice is legal, sorted by
    /// name, then id
    pub fn query(&self, legal: &LegalOptions) -> Vec<Preset> {
        self.select(|preset| legal.permits(&preset.parameters))
    }
}

// =============================================================================
// Persisted Shapes
// =============================================================================

const CURRENT_VERSION: u32 = 2;

#[derive(Serialize, Deserialize)]
struct PresetDto {
    id: Uuid,
    name: String,
    #[serde(default)]
    parameters: UserParametersDto,
}

/// Version 1 kept parameters flattened into the preset
#[derive(Serialize, Deserialize)]
struct PresetDtoV1 {
    id: Uuid,
    name: String,
    #[serde(flatten)]
    parameters: LegacyParametersDto,
}

fn encode_presets(presets: &Vec<Preset>) -> Result<Vec<u8>, crate::persistence::CodecError> {
    let dtos: Vec<PresetDto> = presets
        .iter()
        .map(|preset| PresetDto {
            id: preset.id,
            name: preset.name.clone(),
            parameters: UserParametersDto::from(&preset.parameters),
        })
        .collect();
    to_payload(&dtos)
}

impl Persisted for Vec<Preset> {
    fn codec() -> Codec<Self> {
        Codec::new(CURRENT_VERSION, encode_presets)
            .register(1, |bytes| {
                let dtos: Vec<PresetDtoV1> = from_payload(bytes)?;
                Ok(dtos
                    .into_iter()
                    .map(|dto| Preset {
                        id: dto.id,
                        name: dto.name,
                        parameters: UserParameters::from(&dto.parameters),
                    })
                    .collect())
            })
            .register(CURRENT_VERSION, |bytes| {
                let dtos: Vec<PresetDto> = from_payload(bytes)?;
                Ok(dtos
                    .into_iter()
                    .map(|dto| Preset {
                        id: dto.id,
                        name: dto.name,
                        parameters: UserParameters::from(&dto.parameters),
                    })
                    .collect())
            })
    }
}
