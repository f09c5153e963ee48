//! Config command implementation

use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, ConfigOutput};
use anyhow::Result;
use soilcheck_core::config::LayeredConfig;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let values = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| {
            (key, ConfigEntry { value, source: format!("{:?}", source) })
        })
        .collect();
    let inspection = ConfigOutput { values };

    if output.is_json() {
        return output.result(inspection);
    }

    output.section("Configuration");
    for (key, entry) in &inspection.values {
        let value = if entry.value.is_empty() { "(none)" } else { entry.value.as_str() };
        output.kv(key, format!("{} [{}]", value, entry.source));
    }
    Ok(())
}
