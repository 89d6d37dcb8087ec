//! On-disk classifier bundle.
//!
//! An artifact is a zstd-compressed tar archive holding `manifest.json`
//! (format version, model id, creation time, provenance and the extractor
//! configuration the model was trained with) and `svm.json` (the model).

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tar::{Archive, Builder, Header};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;
use zstd::stream::{read::Decoder as ZstdDecoder, write::Encoder as ZstdEncoder};

use crate::classifier::svm::SvmModel;
use crate::config::HogConfig;
use crate::error::ModelLoadError;

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

const MANIFEST_ENTRY: &str = "manifest.json";
const MODEL_ENTRY: &str = "svm.json";

/// Whether the model was fitted to real data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Trained,
    /// Placeholder weights; predictions carry no meaning
    Untrained,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub format_version: u32,
    pub model_id: Uuid,
    /// RFC 3339
    pub created_at: String,
    pub provenance: Provenance,
    pub extractor: HogConfig,
}

impl Manifest {
    pub fn created_at(&self) -> anyhow::Result<OffsetDateTime> {
        Ok(OffsetDateTime::parse(&self.created_at, &Rfc3339)?)
    }
}

#[derive(Deserialize)]
struct ManifestHeader {
    format_version: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierArtifact {
    pub manifest: Manifest,
    pub model: SvmModel,
}

impl ClassifierArtifact {
    /// Bundle a model with the extractor configuration it was trained with
    pub fn new(
        extractor: HogConfig,
        model: SvmModel,
        provenance: Provenance,
    ) -> Result<Self, ModelLoadError> {
        check_compatible(&extractor, &model)?;
        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| ModelLoadError::Invalid(format!("cannot timestamp artifact: {}", e)))?;
        Ok(Self {
            manifest: Manifest {
                format_version: ARTIFACT_FORMAT_VERSION,
                model_id: Uuid::new_v4(),
                created_at,
                provenance,
                extractor,
            },
            model,
        })
    }

    /// Write the artifact as a tar.zst archive
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let manifest = serde_json::to_vec_pretty(&self.manifest)?;
        let model = serde_json::to_vec(&self.model)?;

        let out = File::create(path)
            .with_context(|| format!("Failed to create classifier artifact {:?}", path))?;

        let encoder = ZstdEncoder::new(out, 3)
            .with_context(|| format!("Failed to create zstd encoder for {:?}", path))?;

        let mut tar = Builder::new(encoder);
        for (name, bytes) in [(MANIFEST_ENTRY, &manifest), (MODEL_ENTRY, &model)] {
            let mut header = Header::new_gnu();
            header.set_size(bytes.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            tar.append_data(&mut header, name, bytes.as_slice())
                .with_context(|| format!("Failed to add {} to {:?}", name, path))?;
        }

        let encoder = tar
            .into_inner()
            .with_context(|| format!("Failed to finalize tar for {:?}", path))?;

        encoder
            .finish()
            .with_context(|| format!("Failed to finalize zstd stream for {:?}", path))?;

        Ok(())
    }

    /// Read and verify an artifact written by [`ClassifierArtifact::save`]
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let corrupt = |what: &str, e: &dyn std::fmt::Display| {
            ModelLoadError::Corrupt(format!("{:?}: {}: {}", path, what, e))
        };

        let f = File::open(path).map_err(|source| ModelLoadError::Missing {
            path: path.to_path_buf(),
            source,
        })?;

        let decoder = ZstdDecoder::new(f).map_err(|e| corrupt("invalid zstd stream", &e))?;
        let mut archive = Archive::new(decoder);

        let mut manifest_bytes = None;
        let mut model_bytes = None;

        let entries = archive
            .entries()
            .map_err(|e| corrupt("unreadable archive", &e))?;
        for entry in entries {
            let mut entry = entry.map_err(|e| corrupt("unreadable archive entry", &e))?;
            let name = entry
                .path()
                .map_err(|e| corrupt("bad entry name", &e))?
                .to_string_lossy()
                .into_owned();

            let slot = match name.as_str() {
                MANIFEST_ENTRY => &mut manifest_bytes,
                MODEL_ENTRY => &mut model_bytes,
                _ => continue,
            };
            let mut bytes = Vec::new();
            entry
                .read_to_end(&mut bytes)
                .map_err(|e| corrupt(&format!("failed to read {}", name), &e))?;
            *slot = Some(bytes);
        }

        let manifest_bytes = manifest_bytes
            .ok_or_else(|| corrupt("missing entry", &MANIFEST_ENTRY))?;
        let model_bytes = model_bytes.ok_or_else(|| corrupt("missing entry", &MODEL_ENTRY))?;

        let header: ManifestHeader = serde_json::from_slice(&manifest_bytes)
            .map_err(|e| corrupt("invalid manifest", &e))?;
        if header.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelLoadError::Incompatible(format!(
                "{:?}: artifact format version {} is not supported (expected {})",
                path, header.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }

        let manifest: Manifest = serde_json::from_slice(&manifest_bytes)
            .map_err(|e| corrupt("invalid manifest", &e))?;
        let model: SvmModel =
            serde_json::from_slice(&model_bytes).map_err(|e| corrupt("invalid model", &e))?;

        model.validate()?;
        check_compatible(&manifest.extractor, &model)?;

        Ok(Self { manifest, model })
    }
}

/// The model must accept exactly the descriptors the extractor produces
pub fn check_compatible(extractor: &HogConfig, model: &SvmModel) -> Result<(), ModelLoadError> {
    extractor
        .validate()
        .map_err(|e| ModelLoadError::Incompatible(e.to_string()))?;

    let expected = extractor.descriptor_len();
    if model.dimension() != expected {
        return Err(ModelLoadError::Incompatible(format!(
            "model takes {} features but the extractor configuration produces {}",
            model.dimension(),
            expected
        )));
    }
    Ok(())
}
