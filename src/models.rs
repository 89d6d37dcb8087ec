use serde::{Deserialize, Serialize};

/// Waste category predicted for a scanned item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WasteCategory {
    #[serde(alias = "R")]
    Recyclable,
    #[serde(alias = "O")]
    Organic,
}

impl WasteCategory {
    pub fn other(self) -> Self {
        match self {
            WasteCategory::Recyclable => WasteCategory::Organic,
            WasteCategory::Organic => WasteCategory::Recyclable,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WasteCategory::Recyclable => "Recyclable",
            WasteCategory::Organic => "Organic",
        }
    }

    /// Which bin the item goes into, for display to end users
    pub fn bin_description(self) -> &'static str {
        match self {
            WasteCategory::Recyclable => "Recyclable (Blue Bin)",
            WasteCategory::Organic => "Organic/General (Green/Black Bin)",
        }
    }
}

impl std::fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat gradient-orientation histogram feature vector
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor(Vec<f32>);

impl Descriptor {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub category: WasteCategory,
    /// Probability of `category`, in [0, 1]
    pub confidence: f32,
}

impl ClassificationResult {
    /// True when the confidence falls below `threshold` and a person should
    /// confirm the category.
    pub fn needs_review(&self, threshold: f32) -> bool {
        self.confidence < threshold
    }
}
