//! Resolution of contract blueprints from compilation artifacts
//!
//! Both Hardhat (`artifacts/<path>/<Name>.sol/<Name>.json`, bytecode as a hex
//! string) and Foundry (`out/<Name>.sol/<Name>.json`, bytecode under `object`)
//! layouts are understood.

use std::{fs, path::PathBuf};

use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt},
    json_abi::JsonAbi,
    primitives::{hex, Bytes, U256},
};
use serde::Deserialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::{
    constants::{ARTIFACT_EXTENSION, UNLINKED_LIBRARY_MARKER},
    errors::ScriptError,
    types::DeploymentRequest,
};

/// A source of compiled contract blueprints, looked up by contract name
pub trait BlueprintResolver {
    /// Resolve the blueprint with the given contract name
    fn resolve(&self, name: &str) -> Result<Blueprint, ScriptError>;
}

/// A compiled contract template from which instances are created
#[derive(Clone, Debug)]
pub struct Blueprint {
    /// The contract name
    pub name: String,
    /// The contract ABI
    pub abi: JsonAbi,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

impl Blueprint {
    /// Build the init code deploying this blueprint for the given request,
    /// i.e. the creation bytecode followed by the ABI-encoded
    /// `(name, symbol, decimals)` constructor arguments
    pub fn deploy_code(&self, request: &DeploymentRequest) -> Result<Bytes, ScriptError> {
        let constructor = self.abi.constructor().ok_or_else(|| {
            ScriptError::CalldataConstruction(format!(
                "{} has no constructor taking (name, symbol, decimals)",
                self.name
            ))
        })?;

        let args = [
            DynSolValue::String(request.name.clone()),
            DynSolValue::String(request.symbol.clone()),
            DynSolValue::Uint(U256::from(request.decimals), 8),
        ];
        let encoded_args = constructor
            .abi_encode_input(&args)
            .map_err(|e| ScriptError::CalldataConstruction(format!("{}: {e}", self.name)))?;

        let mut code = self.bytecode.to_vec();
        code.extend_from_slice(&encoded_args);
        Ok(code.into())
    }
}

impl BlueprintResolver for Blueprint {
    fn resolve(&self, name: &str) -> Result<Blueprint, ScriptError> {
        if self.name == name {
            Ok(self.clone())
        } else {
            Err(ScriptError::BlueprintNotFound(format!("{name} (resolved {})", self.name)))
        }
    }
}

/// A directory of compilation artifacts produced by the contract build
#[derive(Clone, Debug)]
pub struct ArtifactsDir {
    /// The root of the artifacts tree
    root: PathBuf,
}

impl ArtifactsDir {
    /// Create a resolver rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find the single artifact file for the given contract name
    fn find_artifact(&self, name: &str) -> Result<PathBuf, ScriptError> {
        if !self.root.is_dir() {
            return Err(ScriptError::BlueprintNotFound(format!(
                "{name} ({} is not a directory)",
                self.root.display()
            )));
        }

        let file_name = format!("{name}.{ARTIFACT_EXTENSION}");
        let mut candidates = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
            if entry.file_type().is_file() && entry.file_name() == file_name.as_str() {
                candidates.push(entry.into_path());
            }
        }

        match candidates.len() {
            0 => Err(ScriptError::BlueprintNotFound(format!(
                "{name} under {}",
                self.root.display()
            ))),
            1 => Ok(candidates.remove(0)),
            _ => {
                let paths: Vec<String> =
                    candidates.iter().map(|p| p.display().to_string()).collect();
                Err(ScriptError::ArtifactParsing(format!(
                    "multiple artifacts for {name}: {}",
                    paths.join(", ")
                )))
            }
        }
    }
}

impl BlueprintResolver for ArtifactsDir {
    fn resolve(&self, name: &str) -> Result<Blueprint, ScriptError> {
        let path = self.find_artifact(name)?;
        debug!(artifact = %path.display(), "found artifact for {name}");

        let contents = fs::read_to_string(&path)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", path.display())))?;
        parse_artifact(name, &contents)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", path.display())))
    }
}

// -----------
// | Parsing |
// -----------

/// The subset of an artifact file needed to deploy the contract
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactFile {
    /// The contract name, only emitted by Hardhat
    contract_name: Option<String>,
    /// The contract ABI
    abi: JsonAbi,
    /// The creation bytecode
    bytecode: ArtifactBytecode,
}

/// The creation bytecode as emitted by the different toolchains
#[derive(Deserialize)]
#[serde(untagged)]
enum ArtifactBytecode {
    /// Hardhat emits the bytecode as a bare hex string
    Hex(String),
    /// Foundry nests the bytecode under `object`
    Object {
        /// The hex encoded bytecode
        object: String,
    },
}

impl ArtifactBytecode {
    /// The hex encoded bytecode
    fn as_hex(&self) -> &str {
        match self {
            ArtifactBytecode::Hex(hex) => hex,
            ArtifactBytecode::Object { object } => object,
        }
    }
}

/// Parse the contents of an artifact file into a blueprint
fn parse_artifact(name: &str, contents: &str) -> Result<Blueprint, String> {
    let artifact: ArtifactFile = serde_json::from_str(contents).map_err(|e| e.to_string())?;

    if let Some(contract_name) = &artifact.contract_name {
        if contract_name != name {
            return Err(format!("artifact is for {contract_name}, expected {name}"));
        }
    }

    let bytecode_hex = artifact.bytecode.as_hex();
    if bytecode_hex.contains(UNLINKED_LIBRARY_MARKER) {
        return Err(format!("{name} references unlinked libraries"));
    }

    let bytecode = hex::decode(bytecode_hex).map_err(|e| format!("invalid bytecode: {e}"))?;
    if bytecode.is_empty() {
        return Err(format!("{name} has no bytecode, it may be abstract or an interface"));
    }

    Ok(Blueprint {
        name: name.to_string(),
        abi: artifact.abi,
        bytecode: bytecode.into(),
    })
}
