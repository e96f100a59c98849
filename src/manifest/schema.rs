use anyhow::anyhow;
use jsonschema::JSONSchema;
use log::info;
use serde_json::Value;

/// included manifest schema
static MANIFEST_SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/manifest.json"));

pub fn load_schema() -> anyhow::Result<JSONSchema> {
    info!("Compiling manifest schema");
    let schema: Value = serde_json::from_str(MANIFEST_SCHEMA)?;
    // the compile error borrows the schema, so render it before returning
    JSONSchema::compile(&schema).map_err(|err| anyhow!("Invalid manifest schema: {err}"))
}
