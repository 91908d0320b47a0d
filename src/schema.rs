//! Logical schema of a columnar [`Table`](crate::Table).
//!
//! A [`Schema`] is an ordered list of [`Field`]s. Each field carries a name, one of
//! the three supported [`DataType`]s and a nullability flag. Two schemas are equal
//! when they have the same number of fields and every positional pair agrees on
//! all three attributes; that comparison is the [`PartialEq`] impl.
//!
//! The decoder only accepts tables whose schema equals
//! [`Schema::component_costs`]:
//!
//! ```text
//! id: int64 not null, components: int64 not null, component_cost: list<float64> not null
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Shared, immutable handle to a [`Schema`].
pub type SchemaRef = Arc<Schema>;

/// Name of the row identifier column.
pub const ID_FIELD: &str = "id";
/// Name of the component column.
pub const COMPONENTS_FIELD: &str = "components";
/// Name of the nested cost column.
pub const COMPONENT_COST_FIELD: &str = "component_cost";

static COMPONENT_COSTS: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![
        Field::new(ID_FIELD, DataType::Int64, false),
        Field::new(COMPONENTS_FIELD, DataType::Int64, false),
        Field::new(COMPONENT_COST_FIELD, DataType::ListFloat64, false),
    ]))
});

/// Logical type of a field. The set is closed; each variant maps to exactly one
/// storage kind in [`Column`](crate::Column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Int64,
    Float64,
    /// Variable-length list of non-null `float64` values.
    ListFloat64,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int64 => f.write_str("int64"),
            Self::Float64 => f.write_str("float64"),
            Self::ListFloat64 => f.write_str("list<float64>"),
        }
    }
}

/// A single field descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    name: String,
    data_type: DataType,
    nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.data_type)?;
        if !self.nullable {
            f.write_str(" not null")?;
        }
        Ok(())
    }
}

/// Ordered list of fields describing a table's shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    #[must_use]
    pub const fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// The schema produced by [`encode`](crate::encode) and required by
    /// [`decode`](crate::decode).
    #[must_use]
    pub fn component_costs() -> SchemaRef {
        Arc::clone(&COMPONENT_COSTS)
    }

    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, i: usize) -> Option<&Field> {
        self.fields.get(i)
    }

    /// Position of the first field called `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}
