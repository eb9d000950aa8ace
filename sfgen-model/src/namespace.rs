//! The nested scope tree.
//!
//! Every node is owned by exactly one parent and the root is owned by the
//! [`Module`](crate::Module), so the tree cannot contain cycles. Children
//! keep insertion order.

use indexmap::IndexMap;

use crate::{
    Class, Error, Function, KernelNamespace, Method, Result, identifier::join_scope,
};

/// A scope node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
    path: Vec<String>,
    children: IndexMap<String, Namespace>,
    kernel_namespaces: Vec<KernelNamespace>,
    classes: Vec<Class>,
    functions: Vec<Function>,
}

impl Namespace {
    /// Create the anonymous root scope.
    pub fn root() -> Self {
        Self::default()
    }

    /// The segment name, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Path from the root to this node.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Nested scopes in insertion order.
    pub fn children(&self) -> impl Iterator<Item = &Namespace> {
        self.children.values()
    }

    pub fn kernel_namespaces(&self) -> &[KernelNamespace] {
        &self.kernel_namespaces
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Whether this subtree holds no artifacts at all.
    pub fn is_empty(&self) -> bool {
        self.kernel_namespaces.is_empty()
            && self.classes.is_empty()
            && self.functions.is_empty()
            && self.children.values().all(Namespace::is_empty)
    }

    /// Look up a descendant scope.
    pub fn find(&self, scope: &[String]) -> Option<&Namespace> {
        match scope.split_first() {
            None => Some(self),
            Some((head, rest)) => self.children.get(head)?.find(rest),
        }
    }

    /// Walk `scope` from this node, creating missing children.
    pub fn resolve_mut(&mut self, scope: &[String]) -> Result<&mut Namespace> {
        match scope.split_first() {
            None => Ok(self),
            Some((head, rest)) => self.child_mut(head)?.resolve_mut(rest),
        }
    }

    fn child_mut(&mut self, segment: &str) -> Result<&mut Namespace> {
        if !self.children.contains_key(segment) {
            if let Some(existing) = self.artifact_kind(segment) {
                return Err(Error::duplicate_identifier(
                    segment,
                    "namespace",
                    existing,
                    self.scope_label(),
                ));
            }
        }
        let parent = &self.path;
        Ok(self
            .children
            .entry(segment.to_string())
            .or_insert_with(|| {
                let mut path = parent.clone();
                path.push(segment.to_string());
                tracing::debug!(namespace = %join_scope(&path), "creating scope");
                Namespace {
                    path,
                    ..Namespace::default()
                }
            }))
    }

    /// Attach a kernel namespace directly to this node.
    pub fn add_kernel_namespace(&mut self, kns: KernelNamespace) -> Result<()> {
        self.ensure_free(kns.name(), "kernel namespace")?;
        self.kernel_namespaces.push(kns);
        Ok(())
    }

    /// Attach a class at the scope named by its identifier.
    pub fn add_class(&mut self, class: Class) -> Result<()> {
        let node = self.resolve_mut(class.ident.scope())?;
        node.ensure_free(class.name(), "class")?;
        node.classes.push(class);
        Ok(())
    }

    /// Attach a function at the scope named by its identifier.
    pub fn add_function(&mut self, function: Function) -> Result<()> {
        function.validate()?;
        let node = self.resolve_mut(function.ident.scope())?;
        node.ensure_free(function.name(), "function")?;
        node.functions.push(function);
        Ok(())
    }

    /// Attach a method to an existing class `scope::class_name`.
    pub fn add_method(&mut self, scope: &[String], class_name: &str, method: Method) -> Result<()> {
        let owner = || {
            let mut path = scope.to_vec();
            path.push(class_name.to_string());
            join_scope(&path)
        };
        let class = self
            .find_mut(scope)
            .and_then(|node| node.classes.iter_mut().find(|c| c.name() == class_name))
            .ok_or_else(|| Error::unresolved_scope(owner(), method.display_name(class_name)))?;
        class.add_method(method)
    }

    fn find_mut(&mut self, scope: &[String]) -> Option<&mut Namespace> {
        match scope.split_first() {
            None => Some(self),
            Some((head, rest)) => self.children.get_mut(head)?.find_mut(rest),
        }
    }

    /// Depth-first iterator over this node and all descendants.
    pub fn walk(&self) -> Vec<&Namespace> {
        let mut out = vec![self];
        for child in self.children.values() {
            out.extend(child.walk());
        }
        out
    }

    fn ensure_free(&self, name: &str, kind: &str) -> Result<()> {
        let existing = if self.children.contains_key(name) {
            Some("namespace")
        } else {
            self.artifact_kind(name)
        };
        match existing {
            Some(existing) => Err(Error::duplicate_identifier(
                name,
                kind,
                existing,
                self.scope_label(),
            )),
            None => Ok(()),
        }
    }

    fn artifact_kind(&self, name: &str) -> Option<&'static str> {
        if self.kernel_namespaces.iter().any(|k| k.name() == name) {
            Some("kernel namespace")
        } else if self.classes.iter().any(|c| c.name() == name) {
            Some("class")
        } else if self.functions.iter().any(|f| f.name() == name) {
            Some("function")
        } else {
            None
        }
    }

    fn scope_label(&self) -> String {
        if self.path.is_empty() {
            "the root scope".to_string()
        } else {
            format!("namespace '{}'", join_scope(&self.path))
        }
    }
}
