use std::collections::HashMap;

/// Number of ranked entries every prediction carries.
pub const TOP_K: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelSpaceError {
	#[error("label space has {0} classes, at least {TOP_K} are required")]
	TooFew(usize),

	#[error("class name at index {0} is blank")]
	Blank(usize),

	#[error("class name {name:?} appears at both index {first} and {second}")]
	Duplicate {
		name: String,
		first: usize,
		second: usize,
	},
}

/// Ordered class names, where `names[i]` labels output index `i` of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSpace {
	names: Vec<String>,
}

impl LabelSpace {
	/// Validate and bind a sequence of class names.
	///
	/// # Errors
	///
	/// Returns an error if there are fewer than [`TOP_K`] names, or if any name is blank or repeated.
	pub fn new(names: Vec<String>) -> Result<Self, LabelSpaceError> {
		if names.len() < TOP_K {
			return Err(LabelSpaceError::TooFew(names.len()));
		}

		let mut seen = HashMap::with_capacity(names.len());
		for (index, name) in names.iter().enumerate() {
			if name.trim().is_empty() {
				return Err(LabelSpaceError::Blank(index));
			}

			if let Some(first) = seen.insert(name.as_str(), index) {
				return Err(LabelSpaceError::Duplicate {
					name: name.clone(),
					first,
					second: index,
				});
			}
		}

		Ok(Self { names })
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.names.len()
	}

	/// Always `false`, construction rejects empty label spaces.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	#[must_use]
	pub fn get(&self, index: usize) -> Option<&str> {
		self.names.get(index).map(String::as_str)
	}

	#[must_use]
	pub fn names(&self) -> &[String] {
		&self.names
	}
}
