//! Climate-change allowance for design flows
//!
//! Culverts on forest roads are expected to outlive today's hydrology. The
//! allowance is applied as a multiplier on the required waterway area, chosen
//! from a fixed set of planning horizons (or supplied directly, as long as it
//! never drops below 1.0).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Planning horizon the crossing is designed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlanningHorizon {
    /// Present to 2030
    #[default]
    #[serde(rename = "present_2030")]
    Present2030,
    /// Mid-century (2050)
    #[serde(rename = "mid_2050")]
    Mid2050,
    /// 2080 and beyond, coastal watersheds
    #[serde(rename = "late_2080_coastal")]
    Late2080Coastal,
    /// 2080 and beyond, interior watersheds
    #[serde(rename = "late_2080_interior")]
    Late2080Interior,
}

impl PlanningHorizon {
    /// All horizons in display order
    pub const ALL: [PlanningHorizon; 4] = [
        PlanningHorizon::Present2030,
        PlanningHorizon::Mid2050,
        PlanningHorizon::Late2080Coastal,
        PlanningHorizon::Late2080Interior,
    ];

    /// Stable key used by the form layer
    pub fn key(self) -> &'static str {
        match self {
            PlanningHorizon::Present2030 => "present_2030",
            PlanningHorizon::Mid2050 => "mid_2050",
            PlanningHorizon::Late2080Coastal => "late_2080_coastal",
            PlanningHorizon::Late2080Interior => "late_2080_interior",
        }
    }

    /// Look a horizon up by its [`key`](Self::key)
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|horizon| horizon.key() == key)
    }

    /// The preset for this horizon
    pub fn preset(self) -> ClimatePreset {
        match self {
            PlanningHorizon::Present2030 => ClimatePreset {
                label: "Present - 2030",
                factor: 1.10,
                description: "Near-term design life; modest increase in peak flows",
            },
            PlanningHorizon::Mid2050 => ClimatePreset {
                label: "2050",
                factor: 1.20,
                description: "Typical permanent crossing design life",
            },
            PlanningHorizon::Late2080Coastal => ClimatePreset {
                label: "2080+ (coastal)",
                factor: 1.30,
                description: "Long-lived structures in rain-dominated coastal watersheds",
            },
            PlanningHorizon::Late2080Interior => ClimatePreset {
                label: "2080+ (interior)",
                factor: 1.25,
                description: "Long-lived structures in snowmelt-dominated interior watersheds",
            },
        }
    }
}

/// Display data for one planning horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClimatePreset {
    pub label: &'static str,
    pub factor: f64,
    pub description: &'static str,
}

/// All climate presets keyed by planning horizon, for populating the form.
pub fn climate_factor_presets() -> FxHashMap<PlanningHorizon, ClimatePreset> {
    PlanningHorizon::ALL
        .into_iter()
        .map(|horizon| (horizon, horizon.preset()))
        .collect()
}

/// Climate allowance applied to the California Method area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateFactorConfig {
    pub planning_horizon: PlanningHorizon,
    /// Area multiplier, never below 1.0
    pub area_multiplier: f64,
}

impl ClimateFactorConfig {
    /// Use the preset multiplier for a horizon
    pub fn from_preset(planning_horizon: PlanningHorizon) -> Self {
        Self {
            planning_horizon,
            area_multiplier: planning_horizon.preset().factor,
        }
    }

    /// Use a site-specific multiplier
    ///
    /// # Errors
    /// Returns [`ValidationError`] if `area_multiplier` is not finite or is below 1.0.
    pub fn with_multiplier(
        planning_horizon: PlanningHorizon,
        area_multiplier: f64,
    ) -> Result<Self, ValidationError> {
        let config = Self {
            planning_horizon,
            area_multiplier,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the multiplier invariant.
    ///
    /// Deserialized configs bypass the constructors, so the calculator calls
    /// this before using one.
    ///
    /// # Errors
    /// Returns [`ValidationError`] if the multiplier is not finite or is below 1.0.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.area_multiplier.is_finite() {
            return Err(ValidationError::non_finite(
                "climate multiplier",
                self.area_multiplier,
            ));
        }
        if self.area_multiplier < 1.0 {
            return Err(ValidationError::out_of_range(
                "climate multiplier",
                "must be at least 1.0",
                self.area_multiplier,
            ));
        }
        Ok(())
    }
}
