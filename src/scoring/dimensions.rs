//! Rubric dimensions and dimension groups

use serde::{Deserialize, Serialize};

/// One of the nine fixed rubric axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    SemanticConsistency,
    FactualConsistency,
    SpatialTemporalConsistency,
    Expressiveness,
    ArtisticQuality,
    Authenticity,
    BasicProperties,
    DynamicsInteractivity,
    PhysicalReliability,
}

/// All nine dimensions in rubric order.
pub const ALL_DIMENSIONS: [Dimension; 9] = [
    Dimension::SemanticConsistency,
    Dimension::FactualConsistency,
    Dimension::SpatialTemporalConsistency,
    Dimension::Expressiveness,
    Dimension::ArtisticQuality,
    Dimension::Authenticity,
    Dimension::BasicProperties,
    Dimension::DynamicsInteractivity,
    Dimension::PhysicalReliability,
];

impl Dimension {
    /// Human-readable label as it appears in evaluator replies.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::SemanticConsistency => "Semantic Consistency",
            Dimension::FactualConsistency => "Factual Consistency",
            Dimension::SpatialTemporalConsistency => "Spatial-Temporal Consistency",
            Dimension::Expressiveness => "Expressiveness",
            Dimension::ArtisticQuality => "Artistic Quality",
            Dimension::Authenticity => "Authenticity",
            Dimension::BasicProperties => "Basic Properties",
            Dimension::DynamicsInteractivity => "Dynamics and Interactivity",
            Dimension::PhysicalReliability => "Physical Reliability",
        }
    }

    /// Snake-case key used in persisted records.
    pub fn key(&self) -> &'static str {
        match self {
            Dimension::SemanticConsistency => "semantic_consistency",
            Dimension::FactualConsistency => "factual_consistency",
            Dimension::SpatialTemporalConsistency => "spatial_temporal_consistency",
            Dimension::Expressiveness => "expressiveness",
            Dimension::ArtisticQuality => "artistic_quality",
            Dimension::Authenticity => "authenticity",
            Dimension::BasicProperties => "basic_properties",
            Dimension::DynamicsInteractivity => "dynamics_interactivity",
            Dimension::PhysicalReliability => "physical_reliability",
        }
    }

    /// Look up a dimension from its snake-case key.
    pub fn from_key(key: &str) -> Option<Self> {
        ALL_DIMENSIONS.iter().copied().find(|d| d.key() == key)
    }

    /// The group this dimension belongs to.
    pub fn group(&self) -> DimensionGroup {
        match self {
            Dimension::SemanticConsistency
            | Dimension::FactualConsistency
            | Dimension::SpatialTemporalConsistency => DimensionGroup::Consistency,
            Dimension::Expressiveness
            | Dimension::ArtisticQuality
            | Dimension::Authenticity => DimensionGroup::Aesthetic,
            Dimension::BasicProperties
            | Dimension::DynamicsInteractivity
            | Dimension::PhysicalReliability => DimensionGroup::Physicality,
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// One of the three dimension clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionGroup {
    Consistency,
    Aesthetic,
    Physicality,
}

impl DimensionGroup {
    pub fn all() -> [DimensionGroup; 3] {
        [
            DimensionGroup::Consistency,
            DimensionGroup::Aesthetic,
            DimensionGroup::Physicality,
        ]
    }

    /// The three dimensions in this group, in rubric order.
    pub fn dimensions(&self) -> [Dimension; 3] {
        match self {
            DimensionGroup::Consistency => [
                Dimension::SemanticConsistency,
                Dimension::FactualConsistency,
                Dimension::SpatialTemporalConsistency,
            ],
            DimensionGroup::Aesthetic => [
                Dimension::Expressiveness,
                Dimension::ArtisticQuality,
                Dimension::Authenticity,
            ],
            DimensionGroup::Physicality => [
                Dimension::BasicProperties,
                Dimension::DynamicsInteractivity,
                Dimension::PhysicalReliability,
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionGroup::Consistency => "consistency",
            DimensionGroup::Aesthetic => "aesthetic",
            DimensionGroup::Physicality => "physicality",
        }
    }
}

impl std::fmt::Display for DimensionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
