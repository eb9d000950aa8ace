use sfgen_model::{Class, Function, KernelNamespace, Namespace, join_scope};

use super::{Item, Renderer, body_block, namespace_block};
use crate::builder::CodeFragment;

impl Renderer<'_> {
    /// Definition items of a node.
    pub(super) fn definition_items(&self, ns: &Namespace) -> Vec<Item> {
        let kernels: Vec<Item> = ns
            .kernel_namespaces()
            .iter()
            .filter(|kns| !kns.kernels().is_empty())
            .map(|kns| self.kernel_namespace(ns, kns))
            .collect();

        let classes: Vec<Item> = ns
            .classes()
            .iter()
            .flat_map(|class| self.method_definitions(class))
            .collect();

        let functions: Vec<Item> = ns
            .functions()
            .iter()
            .filter(|f| !f.is_declaration_only())
            .map(|f| vec![self.function_definition(f, None)])
            .collect();

        let mut items = self.section(kernels, "Kernels");
        items.extend(self.child_namespaces(ns, |child| self.definition_items(child)));
        items.extend(self.section(classes, "Classes"));
        items.extend(self.section(functions, "Functions"));
        items
    }

    /// Prefix the first item of a group with a marker comment, if enabled.
    fn section(&self, mut items: Vec<Item>, label: &str) -> Vec<Item> {
        if self.config.section_comments {
            if let Some(first) = items.first_mut() {
                first.insert(0, CodeFragment::line(format!("// {}", label)));
            }
        }
        items
    }

    fn kernel_namespace(&self, ns: &Namespace, kns: &KernelNamespace) -> Item {
        let mut path = self.qualified(ns);
        path.push(kns.name().to_string());

        let kernels = kns
            .kernels()
            .iter()
            .map(|kernel| {
                vec![self.function_definition(kernel, self.config.func_prefix_macro_name.as_deref())]
            })
            .collect();

        vec![namespace_block(kns.name(), &join_scope(&path), kernels)]
    }

    fn function_definition(&self, function: &Function, prefix: Option<&str>) -> CodeFragment {
        let signature =
            self.signatures
                .function(function.name(), &function.return_type, &function.params);
        let signature = match prefix {
            Some(prefix) => format!("{} {}", prefix, signature),
            None => signature,
        };
        body_block(signature, function.body.as_ref())
    }

    fn method_definitions(&self, class: &Class) -> Vec<Item> {
        class
            .methods()
            .iter()
            .filter(|m| m.has_out_of_line_definition())
            .map(|method| {
                vec![body_block(
                    self.signatures
                        .method_definition(class.name(), method, true),
                    method.body.as_ref(),
                )]
            })
            .collect()
    }
}
