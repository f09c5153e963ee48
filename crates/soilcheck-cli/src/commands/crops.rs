//! Crops command implementation

use crate::output::OutputWriter;
use crate::output_types::{CatalogEntry, CropsOutput};
use anyhow::Result;
use soilcheck_core::models::{CropType, SoilCategory};

pub fn execute(output: &OutputWriter) -> Result<()> {
    let catalog = CropsOutput {
        crops: CropType::ALL
            .iter()
            .map(|c| CatalogEntry { name: c.name(), local_name: c.local_name() })
            .collect(),
        soil_categories: SoilCategory::ALL
            .iter()
            .map(|s| CatalogEntry { name: s.name(), local_name: s.local_name() })
            .collect(),
    };

    if output.is_json() {
        return output.result(catalog);
    }

    output.section("Soil Categories");
    output.table(catalog.soil_categories);

    output.section("Crops");
    output.table(catalog.crops);

    output.info("Any other crop name is accepted as typed");
    Ok(())
}
