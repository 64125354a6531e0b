// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Capabilities and tunables for a command-context state.

use serde::{Deserialize, Serialize};

use super::error::SettingsError;

/// How many descriptors the hardware lets a root signature address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResourceBindingTier {
    /// Descriptor tables must be fully populated up to the root signature's declared size.
    Tier1,
    /// Tables only need to cover what the shader references.
    Tier2,
    /// Like tier 2, with unbounded UAV and CBV tables.
    #[default]
    Tier3,
}

/// What the device supports and how aggressively state is re-sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingCapabilities {
    /// Variable-rate shading tier 1 is available.
    pub supports_shading_rate: bool,
    /// Variable-rate shading tier 2 (screen-space image) is available.
    pub supports_shading_rate_image: bool,
    /// Re-copy and rebind every descriptor table on every pass, dirty or not.
    pub force_binding: bool,
    /// The device's resource binding tier.
    pub resource_binding_tier: ResourceBindingTier,
}

/// Settings a command-context state is created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextStateSettings {
    /// Device capabilities.
    pub capabilities: BindingCapabilities,
    /// Initial size of the shader-visible CBV/SRV/UAV heap.
    pub resource_heap_capacity: u32,
    /// Initial size of the shader-visible sampler heap.
    pub sampler_heap_capacity: u32,
}

impl Default for ContextStateSettings {
    fn default() -> Self {
        Self {
            capabilities: BindingCapabilities::default(),
            resource_heap_capacity: 4096,
            sampler_heap_capacity: 2048,
        }
    }
}

impl ContextStateSettings {
    /// Parses and validates settings from a RON document. Missing fields keep their defaults.
    pub fn from_ron_str(source: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            ron::from_str(source).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serializes the settings as pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, SettingsError> {
        let pretty_config = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty_config)
            .map_err(|e| SettingsError::Serialize(e.to_string()))
    }

    /// Checks that both heaps can hold at least one descriptor.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.resource_heap_capacity == 0 {
            return Err(SettingsError::Invalid(
                "resource_heap_capacity must be non-zero".to_string(),
            ));
        }
        if self.sampler_heap_capacity == 0 {
            return Err(SettingsError::Invalid(
                "sampler_heap_capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
