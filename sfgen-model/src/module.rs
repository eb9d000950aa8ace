//! The top-level unit of emission.

use crate::{
    Class, Diagnostic, Error, Function, Identifier, Include, IncludeSet, IncludeVisibility,
    KernelBody, KernelNamespace, Method, Namespace, ParameterList, Result,
    identifier::join_scope,
};

/// A validated module, ready to render.
///
/// A module owns its whole artifact tree and is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    name: String,
    root: Namespace,
    includes: IncludeSet,
    prelude: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Module {
    /// Start building a module whose files share the stem `name`.
    pub fn builder(name: impl Into<String>) -> ModuleBuilder {
        ModuleBuilder::new(name)
    }

    /// File stem of the emitted pair.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The anonymous root scope.
    pub fn root(&self) -> &Namespace {
        &self.root
    }

    pub fn includes(&self) -> &IncludeSet {
        &self.includes
    }

    /// Pre-formatted prelude comment, emitted verbatim.
    pub fn prelude(&self) -> Option<&str> {
        self.prelude.as_deref()
    }

    /// Warnings and notes gathered during construction.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether the module holds no artifacts.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Number of functions, kernels, classes and methods.
    pub fn artifact_count(&self) -> usize {
        self.root
            .walk()
            .iter()
            .map(|ns| {
                ns.functions().len()
                    + ns.kernel_namespaces()
                        .iter()
                        .map(|k| k.kernels().len())
                        .sum::<usize>()
                    + ns.classes()
                        .iter()
                        .map(|c| 1 + c.methods().len())
                        .sum::<usize>()
            })
            .sum()
    }

    /// Whether any signature uses a non-aliasing pointer parameter.
    pub fn uses_restrict(&self) -> bool {
        param_lists(&self.root).any(ParameterList::uses_restrict)
    }
}

/// Incremental construction of a [`Module`].
///
/// Every `add_*` call validates immediately and reports the offending
/// identifier; [`build`](ModuleBuilder::build) performs the checks that
/// need the whole module.
///
/// ```
/// use sfgen_model::{Function, Identifier, Include, IncludeVisibility, KernelBody, Module};
///
/// let mut builder = Module::builder("demo");
/// builder.include(Include::parse("<cstdint>").unwrap(), IncludeVisibility::Public);
/// builder
///     .add_function(
///         Function::new(Identifier::parse("demo::run").unwrap())
///             .body(KernelBody::new("return;")),
///     )
///     .unwrap();
/// let module = builder.build().unwrap();
/// assert_eq!(module.artifact_count(), 1);
/// ```
#[derive(Debug)]
pub struct ModuleBuilder {
    name: String,
    root: Namespace,
    includes: IncludeSet,
    prelude: Option<String>,
    strict_includes: bool,
    diagnostics: Vec<Diagnostic>,
}

impl ModuleBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: Namespace::root(),
            includes: IncludeSet::new(),
            prelude: None,
            strict_includes: false,
            diagnostics: Vec::new(),
        }
    }

    /// Set the pre-formatted prelude comment.
    pub fn prelude(&mut self, text: impl Into<String>) -> &mut Self {
        self.prelude = Some(text.into());
        self
    }

    /// Treat body includes missing from the module as errors.
    pub fn strict_includes(&mut self, strict: bool) -> &mut Self {
        self.strict_includes = strict;
        self
    }

    /// Request an include. Public requests dominate private ones.
    pub fn include(&mut self, include: Include, visibility: IncludeVisibility) -> &mut Self {
        if self.includes.visibility(&include) == Some(IncludeVisibility::Private)
            && visibility == IncludeVisibility::Public
        {
            self.diagnostics.push(Diagnostic::info(
                "include_promoted",
                format!("{} requested as private and public; emitted publicly", include),
            ));
        }
        self.includes.insert(include, visibility);
        self
    }

    /// Attach a kernel namespace. Kernel blocks always live directly under
    /// the module root, whatever the logical scope of their kernels.
    pub fn add_kernel_namespace(&mut self, kns: KernelNamespace) -> Result<&mut Self> {
        self.root.add_kernel_namespace(kns)?;
        Ok(self)
    }

    /// Attach a class at its declared scope.
    pub fn add_class(&mut self, class: Class) -> Result<&mut Self> {
        self.root.add_class(class)?;
        Ok(self)
    }

    /// Attach a free function at its declared scope.
    pub fn add_function(&mut self, function: Function) -> Result<&mut Self> {
        self.root.add_function(function)?;
        Ok(self)
    }

    /// Attach a method to the previously added class named by `owner`.
    pub fn add_method(&mut self, owner: &Identifier, method: Method) -> Result<&mut Self> {
        self.root.add_method(owner.scope(), owner.leaf(), method)?;
        Ok(self)
    }

    /// Finish construction.
    ///
    /// # Errors
    ///
    /// Fails on an unusable module name, or on an include required by a
    /// body but not declared on the module when strict includes are on.
    pub fn build(mut self) -> Result<Module> {
        validate_stem(&self.name)?;

        for (owner, body) in bodies(&self.root) {
            for include in body.required_includes() {
                if self.includes.contains(include) {
                    continue;
                }
                if self.strict_includes {
                    return Err(Box::new(Error::UnresolvedInclude {
                        include: include.to_string(),
                        owner,
                    }));
                }
                self.diagnostics.push(
                    Diagnostic::warning(
                        "unresolved_include",
                        format!("body requires {} but the module does not include it", include),
                    )
                    .at(owner.clone()),
                );
            }
        }

        if self.root.is_empty() {
            self.diagnostics.push(Diagnostic::warning(
                "empty_module",
                format!("module '{}' has no artifacts; emitting empty files", self.name),
            ));
        }

        let module = Module {
            name: self.name,
            root: self.root,
            includes: self.includes,
            prelude: self.prelude,
            diagnostics: self.diagnostics,
        };
        tracing::debug!(
            module = %module.name,
            artifacts = module.artifact_count(),
            warnings = module.diagnostics.len(),
            "module built"
        );
        Ok(module)
    }
}

fn validate_stem(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("module name cannot be empty")
    } else if name.contains(['/', '\\']) || name.chars().any(char::is_whitespace) {
        Some("module name must be a plain file stem")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(Error::invalid_identifier(name, "module", reason)),
        None => Ok(()),
    }
}

/// Every body in the tree with the qualified name of its owner.
fn bodies(root: &Namespace) -> Vec<(String, &KernelBody)> {
    let mut out = Vec::new();
    for ns in root.walk() {
        let prefix = |name: &str| {
            let mut path = ns.path().to_vec();
            path.push(name.to_string());
            join_scope(&path)
        };
        for kns in ns.kernel_namespaces() {
            for kernel in kns.kernels() {
                if let Some(body) = &kernel.body {
                    out.push((format!("{}::{}", prefix(kns.name()), kernel.name()), body));
                }
            }
        }
        for class in ns.classes() {
            for method in class.methods() {
                if let Some(body) = &method.body {
                    out.push((
                        format!("{}::{}", join_scope(ns.path()), method.display_name(class.name()))
                            .trim_start_matches("::")
                            .to_string(),
                        body,
                    ));
                }
            }
        }
        for function in ns.functions() {
            if let Some(body) = &function.body {
                out.push((function.ident.to_string(), body));
            }
        }
    }
    out
}

fn param_lists(root: &Namespace) -> impl Iterator<Item = &ParameterList> {
    root.walk().into_iter().flat_map(|ns| {
        let kernels = ns
            .kernel_namespaces()
            .iter()
            .flat_map(|k| k.kernels())
            .map(|f| &f.params);
        let methods = ns
            .classes()
            .iter()
            .flat_map(|c| c.methods())
            .map(|m| &m.params);
        let functions = ns.functions().iter().map(|f| &f.params);
        kernels.chain(methods).chain(functions)
    })
}
