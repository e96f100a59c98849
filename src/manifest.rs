//! Launch manifests: which problems to submit, from which template, under which job name

/// Manifest contents are deserialised into a set of structs defined here
pub mod problem;

/// Read a manifest from disk and validate it against the schema
pub mod read;

/// Compile the embedded manifest JSON schema
pub mod schema;
