use std::{collections::HashMap, fs::File, io::Read, path::Path};

use breed_core::{LabelSpace, ModelLoadError};

/// Header metadata key holding the JSON-encoded class names.
pub const LABELS_KEY: &str = "class_names";

/// safetensors refuses headers larger than this, so anything bigger is not a checkpoint.
const MAX_HEADER_LEN: u64 = 100_000_000;

#[derive(serde::Deserialize)]
struct Header {
	#[serde(rename = "__metadata__", default)]
	metadata: Option<HashMap<String, String>>,
}

/// Read the label space stored in a safetensors checkpoint's header, without touching the tensor data.
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable, the header is malformed, or the labels are absent or invalid.
pub fn read_labels(path: &Path) -> Result<LabelSpace, ModelLoadError> {
	if !path.exists() {
		return Err(ModelLoadError::NotFound(path.to_path_buf()));
	}

	let mut file = File::open(path)?;

	let mut len = [0; 8];
	file.read_exact(&mut len).map_err(|_| {
		ModelLoadError::Corrupt("file is too short for a safetensors header".to_string())
	})?;

	let len = u64::from_le_bytes(len);
	if len > MAX_HEADER_LEN {
		return Err(ModelLoadError::Corrupt(format!("header length {len} is too large")));
	}

	let len = usize::try_from(len)
		.map_err(|_| ModelLoadError::Corrupt(format!("header length {len} is too large")))?;
	let mut header = vec![0; len];
	file.read_exact(&mut header)
		.map_err(|_| ModelLoadError::Corrupt("header is truncated".to_string()))?;

	let header: Header = serde_json::from_slice(&header)
		.map_err(|e| ModelLoadError::Corrupt(format!("header is not valid JSON: {e}")))?;

	let names = header
		.metadata
		.and_then(|mut metadata| metadata.remove(LABELS_KEY))
		.ok_or(ModelLoadError::MissingLabels(LABELS_KEY))?;

	let names: Vec<String> = serde_json::from_str(&names).map_err(|e| {
		ModelLoadError::Corrupt(format!("`{LABELS_KEY}` is not a JSON array of strings: {e}"))
	})?;

	Ok(LabelSpace::new(names)?)
}
