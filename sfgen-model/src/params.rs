//! Parameter lists supplied by the kernel-body compiler.

use std::collections::HashSet;

use serde::Deserialize;

use crate::{Error, Result, identifier::validate_name};

/// How a parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassBy {
    /// By value.
    #[default]
    Value,
    /// By pointer.
    Pointer,
    /// By pointer that is guaranteed not to alias any other parameter.
    RestrictPointer,
    /// By reference.
    Reference,
}

/// A single function parameter.
///
/// The type is an opaque descriptor and is never interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Type descriptor, rendered verbatim.
    pub ty: String,
    /// Const qualification. Applies to the pointer itself for pointer
    /// parameters and to the referent for references.
    pub is_const: bool,
    /// Passing convention.
    pub pass_by: PassBy,
}

impl Parameter {
    /// Create a by-value, non-const parameter.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            is_const: false,
            pass_by: PassBy::Value,
        }
    }

    /// Mark as const.
    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }

    /// Set the passing convention.
    pub fn pass_by(mut self, pass_by: PassBy) -> Self {
        self.pass_by = pass_by;
        self
    }

    /// Pass by non-aliasing pointer.
    pub fn restrict(self) -> Self {
        self.pass_by(PassBy::RestrictPointer)
    }
}

/// Ordered parameters with unique, non-empty names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterList {
    params: Vec<Parameter>,
}

impl ParameterList {
    /// Validate and collect parameters, preserving their order.
    pub fn new(params: impl IntoIterator<Item = Parameter>) -> Result<Self> {
        let params: Vec<Parameter> = params.into_iter().collect();
        let mut seen = HashSet::new();

        for param in &params {
            validate_name(&param.name, "parameter")?;
            if param.ty.trim().is_empty() {
                return Err(Error::invalid_identifier(
                    &param.name,
                    "parameter",
                    "parameter type cannot be empty",
                ));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(Error::duplicate_identifier(
                    &param.name,
                    "parameter",
                    "parameter",
                    "parameter list",
                ));
            }
        }

        Ok(Self { params })
    }

    /// An empty parameter list.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Iterate over parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Whether any parameter is a non-aliasing pointer.
    pub fn uses_restrict(&self) -> bool {
        self.params
            .iter()
            .any(|p| p.pass_by == PassBy::RestrictPointer)
    }
}
