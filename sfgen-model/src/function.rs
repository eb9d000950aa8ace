//! Free functions and kernel namespaces.

use crate::{
    Error, Identifier, KernelBody, ParameterList, Result, identifier::validate_name,
};

/// Return descriptor used when none is given.
pub const VOID: &str = "void";

/// A free function.
///
/// A function without a body is declaration-only: it appears in the
/// declaration artifact but contributes nothing to the definition artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Fully-qualified name.
    pub ident: Identifier,
    /// Parameters in declaration order.
    pub params: ParameterList,
    /// Return type descriptor.
    pub return_type: String,
    /// Statement text, if this function is defined here.
    pub body: Option<KernelBody>,
    /// Documentation text.
    pub doc: Option<String>,
}

impl Function {
    /// Create a declaration-only `void` function with no parameters.
    pub fn new(ident: Identifier) -> Self {
        Self {
            ident,
            params: ParameterList::empty(),
            return_type: VOID.to_string(),
            body: None,
            doc: None,
        }
    }

    /// Set the parameters.
    pub fn params(mut self, params: ParameterList) -> Self {
        self.params = params;
        self
    }

    /// Set the return type.
    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = ty.into();
        self
    }

    /// Attach a body, making this a definition.
    pub fn body(mut self, body: KernelBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Set documentation text.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// The unqualified name.
    pub fn name(&self) -> &str {
        self.ident.leaf()
    }

    /// Check if this function has no body.
    pub fn is_declaration_only(&self) -> bool {
        self.body.is_none()
    }

    /// Check the return type and body before the function is attached.
    pub(crate) fn validate(&self) -> Result<()> {
        let owner = self.ident.to_string();
        check_return_type(&self.return_type, &owner)?;
        check_body(self.body.as_ref(), &owner)
    }
}

pub(crate) fn check_return_type(ty: &str, owner: &str) -> Result<()> {
    if ty.trim().is_empty() {
        return Err(Error::invalid_identifier(
            owner,
            "return type",
            "return type cannot be empty",
        ));
    }
    Ok(())
}

pub(crate) fn check_body(body: Option<&KernelBody>, owner: &str) -> Result<()> {
    match body.map(KernelBody::check_balanced) {
        Some(Err(reason)) => Err(Box::new(Error::UnbalancedFragment {
            owner: owner.to_string(),
            reason,
        })),
        _ => Ok(()),
    }
}

/// A named block of low-level kernels.
///
/// Kernels are always definition-only and are rendered in their own
/// namespace block, separate from user-facing functions.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelNamespace {
    name: String,
    kernels: Vec<Function>,
}

impl KernelNamespace {
    /// Conventional name of the kernel block.
    pub const DEFAULT_NAME: &'static str = "kernels";

    /// Create an empty kernel namespace.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name, "kernel namespace")?;
        Ok(Self {
            name,
            kernels: Vec::new(),
        })
    }

    /// Add a kernel. Only the leaf of its identifier is significant.
    pub fn add(&mut self, kernel: Function) -> Result<()> {
        if kernel.body.is_none() {
            return Err(Box::new(Error::MissingBody {
                name: kernel.ident.to_string(),
            }));
        }
        if self.kernels.iter().any(|k| k.name() == kernel.name()) {
            return Err(Error::duplicate_identifier(
                kernel.name(),
                "kernel",
                "kernel",
                format!("kernel namespace '{}'", self.name),
            ));
        }
        let owner = format!("{}::{}", self.name, kernel.name());
        check_return_type(&kernel.return_type, &owner)?;
        check_body(kernel.body.as_ref(), &owner)?;
        self.kernels.push(kernel);
        Ok(())
    }

    /// Add a kernel (consuming).
    pub fn with(mut self, kernel: Function) -> Result<Self> {
        self.add(kernel)?;
        Ok(self)
    }

    /// The namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kernels in insertion order.
    pub fn kernels(&self) -> &[Function] {
        &self.kernels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kernel(name: &str) -> Function {
        Function::new(Identifier::simple(name).unwrap()).body(KernelBody::new("x = 1;"))
    }

    #[test]
    fn test_function_defaults() {
        let f = Function::new(Identifier::parse("demo::run").unwrap());
        assert_eq!(f.name(), "run");
        assert_eq!(f.return_type, "void");
        assert!(f.is_declaration_only());
    }

    #[test]
    fn test_kernel_requires_body() {
        let mut kns = KernelNamespace::new("kernels").unwrap();
        let err = kns
            .add(Function::new(Identifier::simple("k").unwrap()))
            .unwrap_err();
        assert!(matches!(*err, Error::MissingBody { .. }));
    }

    #[test]
    fn test_duplicate_kernel_rejected() {
        let kns = KernelNamespace::new("kernels")
            .unwrap()
            .with(kernel("scale"))
            .unwrap();
        let err = kns.with(kernel("scale")).unwrap_err();
        assert!(matches!(*err, Error::DuplicateIdentifier { .. }));
    }

    #[test]
    fn test_unbalanced_kernel_rejected() {
        let mut kns = KernelNamespace::new("kernels").unwrap();
        let bad = Function::new(Identifier::simple("k").unwrap()).body(KernelBody::new("{"));
        let err = kns.add(bad).unwrap_err();
        match *err {
            Error::UnbalancedFragment { owner, .. } => assert_eq!(owner, "kernels::k"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_return_type_rejected() {
        let f = Function::new(Identifier::parse("demo::run").unwrap()).returns("  ");
        let err = f.validate().unwrap_err();
        assert!(matches!(*err, Error::InvalidIdentifier { ref name, .. } if name == "demo::run"));

        let mut kns = KernelNamespace::new("kernels").unwrap();
        let err = kns.add(kernel("k").returns("")).unwrap_err();
        assert!(matches!(*err, Error::InvalidIdentifier { .. }));
        assert!(kns.kernels().is_empty());
    }

    #[test]
    fn test_kernel_order_preserved() {
        let kns = KernelNamespace::new("kernels")
            .unwrap()
            .with(kernel("b"))
            .unwrap()
            .with(kernel("a"))
            .unwrap();
        let names: Vec<&str> = kns.kernels().iter().map(Function::name).collect();
        assert_eq!(names, ["b", "a"]);
    }
}
