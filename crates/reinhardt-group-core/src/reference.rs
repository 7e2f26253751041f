//! Reference field selection
//!
//! A relation stores its target in one of two physical reference fields:
//! `entity_id` (integer column) for entity types whose id key is an integer
//! field, `entity_id_str` (255 character ASCII column) for everything else.
//! The string column must fit the id key of any string-keyed entity type.

use crate::entity_type::EntityTypeRepository;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Column length of the string target id
pub const STRING_TARGET_ID_LENGTH: u32 = 255;

/// The two reference field shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceField {
	/// `entity_id`, integer target ids
	Numeric,
	/// `entity_id_str`, string target ids
	String,
}

impl ReferenceField {
	/// Field name of the numeric reference
	pub const NUMERIC_NAME: &'static str = "entity_id";
	/// Field name of the string reference
	pub const STRING_NAME: &'static str = "entity_id_str";

	/// Canonical field name
	pub fn name(&self) -> &'static str {
		match self {
			Self::Numeric => Self::NUMERIC_NAME,
			Self::String => Self::STRING_NAME,
		}
	}

	/// Property path used when flagging violations on this field
	pub fn violation_path(&self) -> String {
		format!("{}.0", self.name())
	}
}

impl fmt::Display for ReferenceField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Physical column type of the target id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
	/// Unsigned integer column
	Integer { unsigned: bool },
	/// ASCII varchar column
	VarcharAscii { length: u32 },
}

/// Schema of the `target_id` column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
	/// Column name
	pub name: String,
	/// Column type
	pub column_type: ColumnType,
	/// Whether NULL is rejected
	pub not_null: bool,
}

/// Reference field definition attached to a relation bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFieldDefinition {
	/// Which of the two shapes this is
	pub kind: ReferenceField,
	/// Label shown to users
	pub label: String,
	/// Description shown to users
	pub description: String,
	/// Entity type the field points at, once known
	pub target_type: Option<String>,
	/// Relations always need a target
	pub required: bool,
	/// Extra field settings supplied by the enabler
	pub settings: IndexMap<String, serde_json::Value>,
	/// Storage column
	pub column: ColumnSchema,
}

impl ReferenceFieldDefinition {
	/// Field name
	pub fn name(&self) -> &'static str {
		self.kind.name()
	}

	/// Overrides the label
	#[must_use]
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	/// Overrides the description
	#[must_use]
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	/// Sets the target entity type
	#[must_use]
	pub fn with_target_type(mut self, target_type: impl Into<String>) -> Self {
		self.target_type = Some(target_type.into());
		self
	}

	/// Adds a field setting
	#[must_use]
	pub fn with_setting(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
		self.settings.insert(name.into(), value);
		self
	}
}

/// Resolves the reference field shape for target entity types
///
/// Resolution is memoized per entity type id. Unknown entity types resolve to
/// the string reference and are not memoized. The memo is dropped whenever the
/// repository registers a definition, so registering or replacing a type takes
/// effect immediately.
#[derive(Debug)]
pub struct EntityReferenceSchema {
	entity_types: Arc<EntityTypeRepository>,
	resolved: RwLock<ResolvedFields>,
}

#[derive(Debug, Default)]
struct ResolvedFields {
	generation: u64,
	fields: HashMap<String, ReferenceField>,
}

impl EntityReferenceSchema {
	/// Creates a resolver backed by the given repository
	pub fn new(entity_types: Arc<EntityTypeRepository>) -> Self {
		Self {
			entity_types,
			resolved: RwLock::new(ResolvedFields::default()),
		}
	}

	/// The entity type repository in use
	pub fn entity_types(&self) -> &Arc<EntityTypeRepository> {
		&self.entity_types
	}

	/// Reference field shape for `entity_type_id`
	pub fn field_for(&self, entity_type_id: &str) -> ReferenceField {
		let generation = self.entity_types.generation();
		{
			let resolved = self.resolved.read();
			if resolved.generation == generation
				&& let Some(field) = resolved.fields.get(entity_type_id)
			{
				return *field;
			}
		}

		let Some(definition) = self.entity_types.get(entity_type_id) else {
			return ReferenceField::String;
		};

		let field = if definition.has_integer_id_field() {
			ReferenceField::Numeric
		} else {
			ReferenceField::String
		};
		let mut resolved = self.resolved.write();
		if resolved.generation != generation {
			resolved.fields.clear();
			resolved.generation = generation;
		}
		resolved.fields.insert(entity_type_id.to_string(), field);
		field
	}

	/// Reference field name for `entity_type_id`
	pub fn field_name_for(&self, entity_type_id: &str) -> &'static str {
		self.field_for(entity_type_id).name()
	}

	/// Builds the base definition of a reference field of the given shape
	pub fn reference_definition(kind: ReferenceField) -> ReferenceFieldDefinition {
		let column_type = match kind {
			ReferenceField::Numeric => ColumnType::Integer { unsigned: true },
			ReferenceField::String => ColumnType::VarcharAscii {
				length: STRING_TARGET_ID_LENGTH,
			},
		};
		ReferenceFieldDefinition {
			kind,
			label: "Content".to_string(),
			description: "The entity to add to the group.".to_string(),
			target_type: None,
			required: true,
			settings: IndexMap::new(),
			column: ColumnSchema {
				name: "target_id".to_string(),
				column_type,
				not_null: true,
			},
		}
	}

	/// Reference field definition for a relation bundle targeting `entity_type_id`
	pub fn bundle_field_definition(&self, entity_type_id: &str) -> ReferenceFieldDefinition {
		Self::reference_definition(self.field_for(entity_type_id)).with_target_type(entity_type_id)
	}

	/// Forgets memoized resolutions
	pub fn clear_cache(&self) {
		self.resolved.write().fields.clear();
	}
}
