use std::{fmt, fs, io};
use std::path::{Path, PathBuf};

use jsonschema::JSONSchema;
use log::{info, warn};
use serde_json::Value;

use crate::manifest::problem::LaunchManifest;

#[derive(Debug)]
pub enum ManifestError {
    ManifestReadError(io::Error),
    JSONDecodeError(serde_json::Error),
    JSONValidationError(Vec<String>),
    DeserialisationError(serde_json::Error),
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ManifestError::ManifestReadError(err) => write!(f, "can't read manifest: {err}"),
            ManifestError::JSONDecodeError(err) => write!(f, "manifest is not valid JSON: {err}"),
            ManifestError::JSONValidationError(errors) => {
                write!(f, "manifest fails validation: {}", errors.join("; "))
            }
            ManifestError::DeserialisationError(err) => write!(f, "can't deserialise manifest: {err}"),
        }
    }
}

impl std::error::Error for ManifestError {}

pub struct ManifestFile {
    pub path: PathBuf,
    pub compiled_schema: JSONSchema,
}

impl ManifestFile {
    pub fn read(&self) -> Result<LaunchManifest, ManifestError> {
        let json: Value = self.parse_untyped_json()?;

        match self.validate(&json) {
            Ok(_) => {
                info!("Manifest is valid");
                self.parse_json(json)
            }
            Err(err) => {
                warn!("Manifest fails validation");
                Err(err)
            }
        }
    }

    fn validate(&self, json: &Value) -> Result<(), ManifestError> {
        info!("Validating manifest against JSON schema");
        self.compiled_schema.validate(json).map_err(|errors| {
            let messages: Vec<String> = errors.map(|err| err.to_string()).collect();
            ManifestError::JSONValidationError(messages)
        })
    }

    fn read_file(&self) -> Result<String, ManifestError> {
        let path: &Path = self.path.as_path();
        info!("Reading manifest at {}", path.display());
        fs::read_to_string(path).map_err(|err| {
            warn!("Can't read manifest at path {}: {}", path.display(), err);
            ManifestError::ManifestReadError(err)
        })
    }

    fn parse_json(&self, value: Value) -> Result<LaunchManifest, ManifestError> {
        serde_json::from_value::<LaunchManifest>(value).map_err(ManifestError::DeserialisationError)
    }

    fn parse_untyped_json(&self) -> Result<Value, ManifestError> {
        let json_string = self.read_file()?;
        serde_json::from_str::<Value>(&json_string).map_err(ManifestError::JSONDecodeError)
    }
}
