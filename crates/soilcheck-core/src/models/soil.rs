use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SoilcheckError};

/// Upper bound of the relative nutrient scale (N, P, K)
pub const NUTRIENT_MAX: f64 = 100.0;

/// Upper bound of the pH scale
pub const PH_MAX: f64 = 14.0;

/// Soil texture taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SoilCategory {
    /// Nothing selected yet
    #[default]
    Unselected,
    Loamy,
    Clay,
    Sandy,
    Silt,
    Peaty,
    Chalky,
    Saline,
}

impl SoilCategory {
    /// All selectable categories (excludes `Unselected`)
    pub const ALL: [SoilCategory; 7] = [
        SoilCategory::Loamy,
        SoilCategory::Clay,
        SoilCategory::Sandy,
        SoilCategory::Silt,
        SoilCategory::Peaty,
        SoilCategory::Chalky,
        SoilCategory::Saline,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SoilCategory::Unselected => "",
            SoilCategory::Loamy => "Loamy",
            SoilCategory::Clay => "Clay",
            SoilCategory::Sandy => "Sandy",
            SoilCategory::Silt => "Silt",
            SoilCategory::Peaty => "Peaty",
            SoilCategory::Chalky => "Chalky",
            SoilCategory::Saline => "Saline",
        }
    }

    /// Regional name used by farmers
    pub fn local_name(&self) -> &'static str {
        match self {
            SoilCategory::Unselected => "",
            SoilCategory::Loamy => "Maira",
            SoilCategory::Clay => "Chikni",
            SoilCategory::Sandy => "Retli",
            SoilCategory::Silt => "Bhal",
            SoilCategory::Peaty => "Organic",
            SoilCategory::Chalky => "Choona",
            SoilCategory::Saline => "Kallar",
        }
    }

    pub fn is_selected(&self) -> bool {
        !matches!(self, SoilCategory::Unselected)
    }
}

impl fmt::Display for SoilCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoilCategory::Unselected => write!(f, "(not selected)"),
            other => write!(f, "{} ({})", other.name(), other.local_name()),
        }
    }
}

impl FromStr for SoilCategory {
    type Err = SoilcheckError;

    fn from_str(s: &str) -> Result<Self> {
        parse_soil_category(s)
    }
}

/// Parse a soil category from either its English or local name
pub fn parse_soil_category(s: &str) -> Result<SoilCategory> {
    let needle = s.trim().to_lowercase();
    SoilCategory::ALL
        .into_iter()
        .find(|c| c.name().to_lowercase() == needle || c.local_name().to_lowercase() == needle)
        .ok_or_else(|| SoilcheckError::UnknownVariant {
            kind: "soil category",
            value: s.to_string(),
        })
}

/// Qualitative moisture reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Moisture {
    Dry,
    #[default]
    Moist,
    Wet,
}

impl Moisture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Moisture::Dry => "Dry",
            Moisture::Moist => "Moist",
            Moisture::Wet => "Wet",
        }
    }
}

impl fmt::Display for Moisture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Moisture {
    type Err = SoilcheckError;

    fn from_str(s: &str) -> Result<Self> {
        parse_moisture(s)
    }
}

/// Parse a moisture label (case-insensitive)
pub fn parse_moisture(s: &str) -> Result<Moisture> {
    match s.trim().to_lowercase().as_str() {
        "dry" => Ok(Moisture::Dry),
        "moist" => Ok(Moisture::Moist),
        "wet" => Ok(Moisture::Wet),
        _ => Err(SoilcheckError::UnknownVariant {
            kind: "moisture level",
            value: s.to_string(),
        }),
    }
}

/// Crops with canonical labels. Custom crop labels are still allowed on a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropType {
    Wheat,
    Rice,
    Cotton,
    Sugarcane,
    Maize,
    Potato,
    Mango,
    Citrus,
    Mustard,
    Sunflower,
    Tomato,
    Onion,
    Garlic,
    Peas,
    Chillies,
    Tobacco,
    Sorghum,
    Millet,
    Barley,
    Gram,
    MungBean,
    Guava,
    Dates,
    Apple,
    Grapes,
}

impl CropType {
    pub const ALL: [CropType; 25] = [
        CropType::Wheat,
        CropType::Rice,
        CropType::Cotton,
        CropType::Sugarcane,
        CropType::Maize,
        CropType::Potato,
        CropType::Mango,
        CropType::Citrus,
        CropType::Mustard,
        CropType::Sunflower,
        CropType::Tomato,
        CropType::Onion,
        CropType::Garlic,
        CropType::Peas,
        CropType::Chillies,
        CropType::Tobacco,
        CropType::Sorghum,
        CropType::Millet,
        CropType::Barley,
        CropType::Gram,
        CropType::MungBean,
        CropType::Guava,
        CropType::Dates,
        CropType::Apple,
        CropType::Grapes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CropType::Wheat => "Wheat",
            CropType::Rice => "Rice",
            CropType::Cotton => "Cotton",
            CropType::Sugarcane => "Sugarcane",
            CropType::Maize => "Maize",
            CropType::Potato => "Potato",
            CropType::Mango => "Mango",
            CropType::Citrus => "Citrus",
            CropType::Mustard => "Mustard",
            CropType::Sunflower => "Sunflower",
            CropType::Tomato => "Tomato",
            CropType::Onion => "Onion",
            CropType::Garlic => "Garlic",
            CropType::Peas => "Peas",
            CropType::Chillies => "Chillies",
            CropType::Tobacco => "Tobacco",
            CropType::Sorghum => "Sorghum",
            CropType::Millet => "Millet",
            CropType::Barley => "Barley",
            CropType::Gram => "Gram",
            CropType::MungBean => "Mung Bean",
            CropType::Guava => "Guava",
            CropType::Dates => "Dates",
            CropType::Apple => "Apple",
            CropType::Grapes => "Grapes",
        }
    }

    pub fn local_name(&self) -> &'static str {
        match self {
            CropType::Wheat => "Gandum",
            CropType::Rice => "Chawal",
            CropType::Cotton => "Kapas",
            CropType::Sugarcane => "Ganna",
            CropType::Maize => "Makai",
            CropType::Potato => "Aloo",
            CropType::Mango => "Aam",
            CropType::Citrus => "Kino",
            CropType::Mustard => "Sarson",
            CropType::Sunflower => "Suraj Mukhi",
            CropType::Tomato => "Tamatar",
            CropType::Onion => "Pyaz",
            CropType::Garlic => "Lehsan",
            CropType::Peas => "Matar",
            CropType::Chillies => "Mirch",
            CropType::Tobacco => "Tambaku",
            CropType::Sorghum => "Jowar",
            CropType::Millet => "Bajra",
            CropType::Barley => "Jau",
            CropType::Gram => "Chana",
            CropType::MungBean => "Moong",
            CropType::Guava => "Amrood",
            CropType::Dates => "Khajoor",
            CropType::Apple => "Saib",
            CropType::Grapes => "Angoor",
        }
    }

    /// Look up a known crop by English or local name (case-insensitive)
    pub fn lookup(label: &str) -> Option<CropType> {
        let needle = label.trim().to_lowercase();
        CropType::ALL
            .into_iter()
            .find(|c| c.name().to_lowercase() == needle || c.local_name().to_lowercase() == needle)
    }
}

/// The soil sample draft being edited before submission.
///
/// Every field always carries a value; see [`SoilInput::default`] for the
/// starting values and [`SoilInput::apply`] for how edits are coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilInput {
    pub soil_category: SoilCategory,

    /// Crop name; empty when nothing is selected
    pub crop_label: String,

    /// Relative sufficiency, 0-100
    pub nitrogen: f64,

    /// Relative sufficiency, 0-100
    pub phosphorus: f64,

    /// Relative sufficiency, 0-100
    pub potassium: f64,

    /// 0-14
    pub ph_level: f64,

    pub moisture: Moisture,
}

impl Default for SoilInput {
    fn default() -> Self {
        Self {
            soil_category: SoilCategory::Unselected,
            crop_label: String::new(),
            nitrogen: 0.0,
            phosphorus: 0.0,
            potassium: 0.0,
            ph_level: 7.0,
            moisture: Moisture::Moist,
        }
    }
}

impl SoilInput {
    /// Merge a partial edit into this draft.
    ///
    /// Numbers are clamped into their semantic range and non-finite numbers
    /// are dropped. Crop labels are trimmed, and a label naming a known crop
    /// is replaced by that crop's canonical name.
    pub fn apply(&mut self, patch: DraftPatch) {
        if let Some(category) = patch.soil_category {
            self.soil_category = category;
        }

        if let Some(label) = patch.crop_label {
            self.crop_label = canonical_crop_label(&label);
        }

        if let Some(n) = patch.nitrogen {
            self.nitrogen = coerce(self.nitrogen, n, NUTRIENT_MAX);
        }

        if let Some(p) = patch.phosphorus {
            self.phosphorus = coerce(self.phosphorus, p, NUTRIENT_MAX);
        }

        if let Some(k) = patch.potassium {
            self.potassium = coerce(self.potassium, k, NUTRIENT_MAX);
        }

        if let Some(ph) = patch.ph_level {
            self.ph_level = coerce(self.ph_level, ph, PH_MAX);
        }

        if let Some(moisture) = patch.moisture {
            self.moisture = moisture;
        }
    }

    /// Whether a crop has been chosen
    pub fn has_crop(&self) -> bool {
        !self.crop_label.trim().is_empty()
    }
}

/// A partial edit of [`SoilInput`]; absent fields leave the draft unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DraftPatch {
    pub soil_category: Option<SoilCategory>,
    pub crop_label: Option<String>,
    pub nitrogen: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub ph_level: Option<f64>,
    pub moisture: Option<Moisture>,
}

impl DraftPatch {
    pub fn soil_category(mut self, category: SoilCategory) -> Self {
        self.soil_category = Some(category);
        self
    }

    pub fn crop_label(mut self, label: impl Into<String>) -> Self {
        self.crop_label = Some(label.into());
        self
    }

    pub fn nitrogen(mut self, value: f64) -> Self {
        self.nitrogen = Some(value);
        self
    }

    pub fn phosphorus(mut self, value: f64) -> Self {
        self.phosphorus = Some(value);
        self
    }

    pub fn potassium(mut self, value: f64) -> Self {
        self.potassium = Some(value);
        self
    }

    pub fn ph_level(mut self, value: f64) -> Self {
        self.ph_level = Some(value);
        self
    }

    pub fn moisture(mut self, moisture: Moisture) -> Self {
        self.moisture = Some(moisture);
        self
    }
}

fn coerce(current: f64, proposed: f64, max: f64) -> f64 {
    if proposed.is_finite() {
        proposed.clamp(0.0, max)
    } else {
        current
    }
}

fn canonical_crop_label(label: &str) -> String {
    match CropType::lookup(label) {
        Some(crop) => crop.name().to_string(),
        None => label.trim().to_string(),
    }
}
