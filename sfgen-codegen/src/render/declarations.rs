use sfgen_model::{Class, Field, Function, Method, Namespace};

use super::{Item, Renderer, body_block};
use crate::builder::CodeFragment;

impl Renderer<'_> {
    /// Declaration items of a node. Kernels are definition-only and never
    /// appear here.
    pub(super) fn declaration_items(&self, ns: &Namespace) -> Vec<Item> {
        let mut items = self.child_namespaces(ns, |child| self.declaration_items(child));
        items.extend(ns.classes().iter().map(|class| self.class_declaration(class)));
        items.extend(
            ns.functions()
                .iter()
                .map(|function| self.function_declaration(function)),
        );
        items
    }

    fn function_declaration(&self, function: &Function) -> Item {
        let mut item = Vec::new();
        if let Some(doc) = &function.doc {
            item.push(CodeFragment::doc(doc.as_str()));
        }
        let signature =
            self.signatures
                .function(function.name(), &function.return_type, &function.params);
        item.push(CodeFragment::line(format!("{};", signature)));
        item
    }

    fn class_declaration(&self, class: &Class) -> Item {
        let mut header = format!("{} {}", class.keyword.as_str(), class.name());
        if !class.bases.is_empty() {
            header.push_str(" : ");
            header.push_str(&class.bases.join(", "));
        }
        header.push_str(" {");

        let sections = class.access_blocks().into_iter().map(|(access, fields, methods)| {
            let mut members: Vec<CodeFragment> =
                fields.into_iter().map(field_declaration).collect();
            for method in methods {
                members.extend(self.member_declaration(class.name(), method));
            }
            vec![
                CodeFragment::line(format!("{}:", access)),
                CodeFragment::indent(members),
            ]
        });

        let mut item = vec![CodeFragment::line(header)];
        item.extend(CodeFragment::separated(sections));
        item.push(CodeFragment::line("};"));
        item
    }

    fn member_declaration(&self, class: &str, method: &Method) -> Vec<CodeFragment> {
        let mut out = Vec::new();
        if let Some(doc) = &method.doc {
            out.push(CodeFragment::doc(doc.as_str()));
        }
        if method.is_defined_inline() {
            out.push(body_block(
                self.signatures.method_definition(class, method, false),
                method.body.as_ref(),
            ));
        } else {
            out.push(CodeFragment::line(format!(
                "{};",
                self.signatures.method_declaration(class, method)
            )));
        }
        out
    }
}

fn field_declaration(field: &Field) -> CodeFragment {
    CodeFragment::line(format!("{} {};", field.ty, field.name))
}
