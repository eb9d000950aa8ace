// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Artifact model for the sfgen source file generator.
//!
//! Artifacts (kernels, functions, classes, methods) are collected into a
//! [`Module`] through a [`ModuleBuilder`], which validates every addition
//! and arranges artifacts into a nested [`Namespace`] tree. A built module
//! is immutable and can be rendered any number of times.

mod class;
mod config;
mod description;
mod diagnostic;
mod error;
mod fragment;
mod function;
mod identifier;
mod include;
mod module;
mod namespace;
mod params;

pub use class::{Access, Class, ClassKeyword, Field, Method, MethodKind, OVERLOADABLE_OPERATORS};
pub use config::{Config, ConfigLayer, OutputSpec, PROJECT_CONFIG_FILE};
pub use description::{
    ClassDescription, FieldDescription, FunctionDescription, IncludeDescription,
    KernelNamespaceDescription, MethodDescription, ModuleDescription, ParameterDescription,
};
pub use diagnostic::{Diagnostic, Severity};
pub use error::{Error, Result};
pub use fragment::KernelBody;
pub use function::{Function, KernelNamespace, VOID};
pub use identifier::{Identifier, SCOPE_SEPARATOR, join_scope, parse_namespace_path, validate_name};
pub use include::{Include, IncludeSet, IncludeVisibility};
pub use module::{Module, ModuleBuilder};
pub use namespace::Namespace;
pub use params::{Parameter, ParameterList, PassBy};
