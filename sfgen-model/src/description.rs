//! Module description files.
//!
//! A description is a TOML (or JSON) document listing a module's includes
//! and artifacts. It is deserialized as-is and then replayed through
//! [`ModuleBuilder`], so every check the builder performs applies to
//! description files too.
//!
//! ```toml
//! name = "grid"
//! includes = ["<cstddef>", { header = "<cmath>", visibility = "private" }]
//!
//! [config]
//! root_namespace = "demo"
//!
//! [[kernel_namespaces]]
//! name = "kernels"
//!
//! [[kernel_namespaces.kernels]]
//! name = "scale"
//! params = [{ name = "data", type = "double", pass_by = "restrict_pointer" }]
//! body = "data[0] *= 2.0;"
//!
//! [[functions]]
//! name = "demo::applyScale"
//! params = [{ name = "data", type = "double", pass_by = "pointer" }]
//! body = "kernels::scale(data);"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::{
    Access, Class, ClassKeyword, ConfigLayer, Error, Field, Function, Identifier, Include,
    IncludeVisibility, KernelBody, KernelNamespace, Method, MethodKind, ModuleBuilder, Parameter,
    ParameterList, PassBy, Result,
};

/// Root of a module description file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDescription {
    /// File stem of the emitted pair. Defaults to the description's stem.
    pub name: Option<String>,

    /// Pre-formatted prelude comment.
    pub prelude: Option<String>,

    /// Module-level configuration overrides.
    #[serde(default)]
    pub config: ConfigLayer,

    #[serde(default)]
    pub includes: Vec<IncludeDescription>,

    #[serde(default)]
    pub kernel_namespaces: Vec<KernelNamespaceDescription>,

    #[serde(default)]
    pub classes: Vec<ClassDescription>,

    #[serde(default)]
    pub functions: Vec<FunctionDescription>,

    /// Methods attached to classes declared above, by `owner`.
    #[serde(default)]
    pub methods: Vec<MethodDescription>,
}

/// An include: either a bare literal (public) or a table.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IncludeDescription {
    Literal(String),
    Detailed {
        header: String,
        #[serde(default)]
        visibility: IncludeVisibility,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, rename = "const")]
    pub is_const: bool,
    #[serde(default)]
    pub pass_by: PassBy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KernelNamespaceDescription {
    #[serde(default = "default_kernel_namespace")]
    pub name: String,
    #[serde(default)]
    pub kernels: Vec<FunctionDescription>,
}

fn default_kernel_namespace() -> String {
    KernelNamespace::DEFAULT_NAME.to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionDescription {
    /// Qualified name, e.g. `demo::applyScale`.
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParameterDescription>,
    pub return_type: Option<String>,
    pub body: Option<String>,
    /// Includes the body needs.
    #[serde(default)]
    pub requires: Vec<String>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub access: Option<Access>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodDescription {
    /// Owning class. Required for top-level methods, rejected inside a class.
    pub owner: Option<String>,
    /// Method name, or operator symbol. Unused for constructors.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: MethodKind,
    pub access: Option<Access>,
    #[serde(default)]
    pub params: Vec<ParameterDescription>,
    pub return_type: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub requires: Vec<String>,
    pub doc: Option<String>,
    #[serde(default, rename = "const")]
    pub is_const: bool,
    #[serde(default)]
    pub inline: bool,
    #[serde(default)]
    pub initializers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassDescription {
    /// Qualified name, e.g. `demo::Grid`.
    pub name: String,
    #[serde(default)]
    pub keyword: ClassKeyword,
    #[serde(default)]
    pub bases: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDescription>,
    #[serde(default)]
    pub methods: Vec<MethodDescription>,
}

impl ModuleDescription {
    /// Parse a TOML description.
    pub fn from_toml_str(content: &str, filename: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::parse(e, content, filename))
    }

    /// Parse a JSON description.
    pub fn from_json_str(content: &str, filename: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            Box::new(Error::ParseJson {
                filename: filename.to_string(),
                source: e,
            })
        })
    }

    /// Read a description, choosing the format by extension.
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as TOML.
    /// A missing `name` defaults to the file stem.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let filename = path.display().to_string();

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let mut description = if is_json {
            Self::from_json_str(&content, &filename)?
        } else {
            Self::from_toml_str(&content, &filename)?
        };

        if description.name.is_none() {
            description.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned());
        }
        tracing::debug!(
            file = %filename,
            classes = description.classes.len(),
            functions = description.functions.len(),
            "loaded module description"
        );
        Ok(description)
    }

    /// Replay the description through a [`ModuleBuilder`].
    ///
    /// The `[config]` table is not consumed here; resolve it with
    /// [`Config::with_overrides`](crate::Config::with_overrides) first.
    pub fn to_builder(&self) -> Result<ModuleBuilder> {
        let name = self.name.clone().unwrap_or_default();
        let mut builder = ModuleBuilder::new(name);

        if let Some(prelude) = &self.prelude {
            builder.prelude(prelude.clone());
        }

        for include in &self.includes {
            let (literal, visibility) = match include {
                IncludeDescription::Literal(literal) => (literal, IncludeVisibility::Public),
                IncludeDescription::Detailed { header, visibility } => (header, *visibility),
            };
            builder.include(Include::parse(literal)?, visibility);
        }

        for kns in &self.kernel_namespaces {
            let mut kernels = KernelNamespace::new(kns.name.clone())?;
            for kernel in &kns.kernels {
                kernels.add(kernel.to_function()?)?;
            }
            builder.add_kernel_namespace(kernels)?;
        }

        for class in &self.classes {
            builder.add_class(class.to_class()?)?;
        }

        for function in &self.functions {
            builder.add_function(function.to_function()?)?;
        }

        for method in &self.methods {
            let owner = method.owner.as_deref().ok_or_else(|| {
                Error::invalid_identifier(
                    method.name.as_str(),
                    "method",
                    "top-level methods must name their owning class with 'owner'",
                )
            })?;
            builder.add_method(&Identifier::parse(owner)?, method.to_method()?)?;
        }

        Ok(builder)
    }
}

impl ParameterDescription {
    fn to_parameter(&self) -> Parameter {
        let param = Parameter::new(self.name.clone(), self.ty.clone()).pass_by(self.pass_by);
        if self.is_const { param.constant() } else { param }
    }
}

fn parameter_list(params: &[ParameterDescription]) -> Result<ParameterList> {
    ParameterList::new(params.iter().map(ParameterDescription::to_parameter))
}

fn kernel_body(body: Option<&String>, requires: &[String]) -> Result<Option<KernelBody>> {
    let Some(text) = body else {
        return Ok(None);
    };
    let mut body = KernelBody::new(text.clone());
    for literal in requires {
        body = body.requires(Include::parse(literal)?);
    }
    Ok(Some(body))
}

impl FunctionDescription {
    fn to_function(&self) -> Result<Function> {
        let mut function =
            Function::new(Identifier::parse(&self.name)?).params(parameter_list(&self.params)?);
        if let Some(ty) = &self.return_type {
            function = function.returns(ty.clone());
        }
        if let Some(body) = kernel_body(self.body.as_ref(), &self.requires)? {
            function = function.body(body);
        }
        if let Some(doc) = &self.doc {
            function = function.doc(doc.clone());
        }
        Ok(function)
    }
}

impl MethodDescription {
    fn to_method(&self) -> Result<Method> {
        let mut method = match self.kind {
            MethodKind::Plain => Method::plain(self.name.clone()),
            MethodKind::Constructor => Method::constructor(),
            MethodKind::Operator => Method::operator(self.name.clone()),
        }
        .params(parameter_list(&self.params)?);

        if let Some(access) = self.access {
            method = method.access(access);
        }
        if let Some(ty) = &self.return_type {
            method = method.returns(ty.clone());
        }
        if let Some(body) = kernel_body(self.body.as_ref(), &self.requires)? {
            method = method.body(body);
        }
        if let Some(doc) = &self.doc {
            method = method.doc(doc.clone());
        }
        if self.is_const {
            method = method.constant();
        }
        if self.inline {
            method = method.inline();
        }
        for init in &self.initializers {
            method = method.initializer(init.clone());
        }
        Ok(method)
    }
}

impl ClassDescription {
    fn to_class(&self) -> Result<Class> {
        let ident = Identifier::parse(&self.name)?;
        let mut class = Class::new(ident).keyword(self.keyword);
        for base in &self.bases {
            class = class.base(base.clone());
        }

        for field in &self.fields {
            let access = field
                .access
                .unwrap_or_else(|| self.keyword.default_access());
            class.add_field(Field::new(field.name.clone(), field.ty.clone(), access))?;
        }

        for method in &self.methods {
            if method.owner.is_some() {
                return Err(Error::invalid_identifier(
                    method.name.as_str(),
                    "method",
                    "methods declared inside a class cannot name an owner",
                ));
            }
            class.add_method(method.to_method()?)?;
        }
        Ok(class)
    }
}
