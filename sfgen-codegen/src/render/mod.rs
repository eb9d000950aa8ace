//! Rendering of a [`Module`] into declaration and definition text.
//!
//! Both streams walk the namespace tree depth-first in insertion order.
//! Within a node, kernel namespaces come first, then nested namespaces,
//! then classes, then functions. A namespace that contributes nothing to
//! a stream is left out of that stream entirely; the configured root
//! namespace is always emitted.

mod declarations;
mod definitions;
mod signature;

use sfgen_model::{Config, KernelBody, Module, Namespace, Result, join_scope};

pub use signature::{RESTRICT_QUALIFIER, Signatures};

use crate::builder::{CodeBuilder, CodeFragment, Indent, Renderable};

/// One top-level entry of a namespace body.
type Item = Vec<CodeFragment>;

/// Renders modules under a fixed configuration.
#[derive(Debug, Clone)]
pub struct Renderer<'a> {
    config: &'a Config,
    root_scope: Vec<String>,
    signatures: Signatures,
    indent: Indent,
}

impl<'a> Renderer<'a> {
    /// Create a renderer.
    ///
    /// # Errors
    ///
    /// Fails only if the configured root namespace is not a valid path.
    pub fn new(config: &'a Config) -> Result<Self> {
        Ok(Self {
            config,
            root_scope: config.root_scope()?,
            signatures: Signatures::new(config.restrict_macro_name.as_deref()),
            indent: Indent::spaces(config.indent_width),
        })
    }

    /// The declaration (header) text.
    pub fn declaration(&self, module: &Module) -> String {
        self.finish(&Declarations {
            renderer: self,
            module,
        })
    }

    /// The definition (implementation) text.
    pub fn definition(&self, module: &Module) -> String {
        self.finish(&Definitions {
            renderer: self,
            module,
        })
    }

    /// The declaration text as lines.
    pub fn declaration_lines(&self, module: &Module) -> Vec<String> {
        self.declaration(module).lines().map(String::from).collect()
    }

    /// The definition text as lines.
    pub fn definition_lines(&self, module: &Module) -> Vec<String> {
        self.definition(module).lines().map(String::from).collect()
    }

    fn finish(&self, node: &impl Renderable) -> String {
        let mut builder = CodeBuilder::new(self.indent);
        builder.emit(node);
        let mut text = builder.build().trim_end().to_string();
        text.push('\n');
        text
    }

    /// Fully-qualified path of a node, including the root namespace.
    fn qualified(&self, ns: &Namespace) -> Vec<String> {
        let mut path = self.root_scope.clone();
        path.extend(ns.path().iter().cloned());
        path
    }

    /// Wrap the root node's items in the configured root namespace.
    fn wrap_root(&self, items: Vec<Item>) -> Vec<CodeFragment> {
        if self.root_scope.is_empty() {
            CodeFragment::separated(items)
        } else {
            let name = join_scope(&self.root_scope);
            vec![namespace_block(&name, &name, items)]
        }
    }

    /// Blocks of a nested namespace, if it contributes anything.
    fn child_namespaces(
        &self,
        ns: &Namespace,
        items_of: impl Fn(&Namespace) -> Vec<Item>,
    ) -> Vec<Item> {
        ns.children()
            .filter_map(|child| {
                let items = items_of(child);
                if items.is_empty() {
                    return None;
                }
                let segment = child.name().unwrap_or_default();
                let fq = join_scope(&self.qualified(child));
                Some(vec![namespace_block(segment, &fq, items)])
            })
            .collect()
    }
}

/// `namespace <segment> {`, blank, items, blank, `} // namespace <fq>`.
fn namespace_block(segment: &str, fq: &str, items: Vec<Item>) -> CodeFragment {
    let mut body = vec![CodeFragment::Blank];
    if !items.is_empty() {
        body.extend(CodeFragment::separated(items));
        body.push(CodeFragment::Blank);
    }
    CodeFragment::block(
        format!("namespace {} {{", segment),
        body,
        Some(format!("}} // namespace {}", fq)),
    )
}

/// A definition block: signature, body lines one level deeper, `}`.
fn body_block(signature: String, body: Option<&KernelBody>) -> CodeFragment {
    let lines = body
        .map(|b| CodeFragment::lines(b.text()))
        .unwrap_or_default();
    CodeFragment::block(format!("{} {{", signature), lines, Some("}".to_string()))
}

fn prelude(module: &Module) -> Item {
    module
        .prelude()
        .map(|text| CodeFragment::lines(text.trim_end()))
        .unwrap_or_default()
}

/// The declaration stream of a module.
struct Declarations<'r, 'a> {
    renderer: &'r Renderer<'a>,
    module: &'r Module,
}

impl Renderable for Declarations<'_, '_> {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let r = self.renderer;
        let (public, _) = self.module.includes().partition();

        let includes: Item = public
            .iter()
            .map(|inc| CodeFragment::line(inc.directive()))
            .collect();

        let restrict = match &r.config.restrict_macro_name {
            Some(name) if self.module.uses_restrict() => vec![CodeFragment::line(format!(
                "#define {} {}",
                name, RESTRICT_QUALIFIER
            ))],
            _ => Vec::new(),
        };

        let body = r.wrap_root(r.declaration_items(self.module.root()));

        CodeFragment::separated([
            prelude(self.module),
            vec![CodeFragment::line("#pragma once")],
            includes,
            restrict,
            body,
        ])
    }
}

/// The definition stream of a module.
struct Definitions<'r, 'a> {
    renderer: &'r Renderer<'a>,
    module: &'r Module,
}

impl Renderable for Definitions<'_, '_> {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let r = self.renderer;
        let (_, private) = self.module.includes().partition();

        let header = r.config.output_spec(self.module.name()).header_filename();
        let pairing = vec![CodeFragment::line(format!("#include \"{}\"", header))];

        let includes: Item = private
            .iter()
            .map(|inc| CodeFragment::line(inc.directive()))
            .collect();

        let has_kernels = self
            .module
            .root()
            .walk()
            .iter()
            .any(|ns| ns.kernel_namespaces().iter().any(|k| !k.kernels().is_empty()));
        let func_prefix = match &r.config.func_prefix_macro_name {
            Some(name) if has_kernels => {
                vec![CodeFragment::line(format!("#define {} inline", name))]
            }
            _ => Vec::new(),
        };

        let body = r.wrap_root(r.definition_items(self.module.root()));

        CodeFragment::separated([prelude(self.module), pairing, includes, func_prefix, body])
    }
}

#[cfg(test)]
mod tests;
