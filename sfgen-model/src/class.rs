//! Classes, their fields and their methods.

use std::fmt;

use serde::Deserialize;

use crate::{
    Error, Identifier, KernelBody, ParameterList, Result,
    function::{check_body, check_return_type},
    identifier::validate_name,
};

/// Member access qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    /// Order in which access blocks are emitted.
    pub const ORDER: [Access; 3] = [Access::Public, Access::Protected, Access::Private];

    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Protected => "protected",
            Access::Private => "private",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword used to introduce a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKeyword {
    #[default]
    Class,
    Struct,
}

impl ClassKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassKeyword::Class => "class",
            ClassKeyword::Struct => "struct",
        }
    }

    /// Access applied to members when none is given.
    pub fn default_access(&self) -> Access {
        match self {
            ClassKeyword::Class => Access::Private,
            ClassKeyword::Struct => Access::Public,
        }
    }
}

/// A data member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: String,
    pub access: Access,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, access: Access) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            access,
        }
    }
}

/// What sort of method this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    #[default]
    Plain,
    Constructor,
    Operator,
}

/// Operators that may be overloaded as methods.
pub const OVERLOADABLE_OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "^", "&", "|", "~", "!", "=", "<", ">", "+=", "-=", "*=", "/=",
    "%=", "^=", "&=", "|=", "<<", ">>", ">>=", "<<=", "==", "!=", "<=", ">=", "<=>", "&&", "||",
    "++", "--", ",", "->*", "->", "()", "[]",
];

/// A method bound to an owning class.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// Method name; the operator symbol for operators; unused for constructors.
    pub name: String,
    pub kind: MethodKind,
    pub access: Access,
    pub params: ParameterList,
    /// Return type. Ignored for constructors.
    pub return_type: String,
    pub body: Option<KernelBody>,
    pub doc: Option<String>,
    pub is_const: bool,
    /// Define the body inside the class declaration.
    pub is_inline: bool,
    /// Constructor initializer list entries, rendered verbatim.
    pub initializers: Vec<String>,
}

impl Method {
    fn with_kind(name: impl Into<String>, kind: MethodKind) -> Self {
        Self {
            name: name.into(),
            kind,
            access: Access::Public,
            params: ParameterList::empty(),
            return_type: crate::function::VOID.to_string(),
            body: None,
            doc: None,
            is_const: false,
            is_inline: false,
            initializers: Vec::new(),
        }
    }

    /// A plain public method.
    pub fn plain(name: impl Into<String>) -> Self {
        Self::with_kind(name, MethodKind::Plain)
    }

    /// A public constructor.
    pub fn constructor() -> Self {
        Self::with_kind("", MethodKind::Constructor)
    }

    /// A public operator overload, e.g. `Method::operator("()")`.
    pub fn operator(symbol: impl Into<String>) -> Self {
        Self::with_kind(symbol, MethodKind::Operator)
    }

    pub fn access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn params(mut self, params: ParameterList) -> Self {
        self.params = params;
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = ty.into();
        self
    }

    pub fn body(mut self, body: KernelBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn inline(mut self) -> Self {
        self.is_inline = true;
        self
    }

    pub fn initializer(mut self, init: impl Into<String>) -> Self {
        self.initializers.push(init.into());
        self
    }

    /// Whether this method produces an out-of-class definition.
    pub fn has_out_of_line_definition(&self) -> bool {
        !self.is_defined_inline()
            && (self.body.is_some()
                || (self.kind == MethodKind::Constructor && !self.initializers.is_empty()))
    }

    /// Whether the body is emitted inside the class declaration.
    pub fn is_defined_inline(&self) -> bool {
        self.is_inline
            && (self.body.is_some()
                || (self.kind == MethodKind::Constructor && !self.initializers.is_empty()))
    }

    /// Name used in diagnostics, e.g. `Grid::resize`.
    pub(crate) fn display_name(&self, class: &str) -> String {
        match self.kind {
            MethodKind::Plain => format!("{}::{}", class, self.name),
            MethodKind::Constructor => format!("{}::{}", class, class),
            MethodKind::Operator => format!("{}::operator{}", class, self.name),
        }
    }

    fn validate(&self, class: &str) -> Result<()> {
        match self.kind {
            MethodKind::Plain => validate_name(&self.name, "method")?,
            MethodKind::Operator => {
                if !OVERLOADABLE_OPERATORS.contains(&self.name.as_str()) {
                    return Err(Error::invalid_identifier(
                        &self.name,
                        "operator",
                        "not an overloadable operator",
                    ));
                }
            }
            MethodKind::Constructor => {
                if self.is_const {
                    return Err(Error::invalid_identifier(
                        class,
                        "constructor",
                        "constructors cannot be const",
                    ));
                }
            }
        }
        let owner = self.display_name(class);
        if self.kind != MethodKind::Constructor {
            check_return_type(&self.return_type, &owner)?;
        }
        check_body(self.body.as_ref(), &owner)
    }
}

/// A class with fields and methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub ident: Identifier,
    pub keyword: ClassKeyword,
    /// Base class references, rendered verbatim (e.g. `public Base`).
    pub bases: Vec<String>,
    fields: Vec<Field>,
    methods: Vec<Method>,
}

impl Class {
    pub fn new(ident: Identifier) -> Self {
        Self {
            ident,
            keyword: ClassKeyword::Class,
            bases: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn keyword(mut self, keyword: ClassKeyword) -> Self {
        self.keyword = keyword;
        self
    }

    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    /// The unqualified class name.
    pub fn name(&self) -> &str {
        self.ident.leaf()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Add a field; names must be unique among fields and plain methods.
    pub fn add_field(&mut self, field: Field) -> Result<()> {
        validate_name(&field.name, "field")?;
        if let Some(existing) = self.member_kind(&field.name) {
            return Err(Error::duplicate_identifier(
                &field.name,
                "field",
                existing,
                format!("class '{}'", self.ident),
            ));
        }
        self.fields.push(field);
        Ok(())
    }

    /// Add a method.
    ///
    /// Plain method names must be unique within the class. Operators must
    /// differ in symbol, constness or parameter types. Constructors are
    /// not checked against each other.
    pub fn add_method(&mut self, method: Method) -> Result<()> {
        method.validate(self.name())?;

        match method.kind {
            MethodKind::Plain => {
                if let Some(existing) = self.member_kind(&method.name) {
                    return Err(Error::duplicate_identifier(
                        &method.name,
                        "method",
                        existing,
                        format!("class '{}'", self.ident),
                    ));
                }
            }
            MethodKind::Operator => {
                let clash = self.methods.iter().any(|m| {
                    m.kind == MethodKind::Operator
                        && m.name == method.name
                        && m.is_const == method.is_const
                        && same_param_types(&m.params, &method.params)
                });
                if clash {
                    return Err(Error::duplicate_identifier(
                        format!("operator{}", method.name),
                        "operator",
                        "operator",
                        format!("class '{}'", self.ident),
                    ));
                }
            }
            MethodKind::Constructor => {}
        }

        self.methods.push(method);
        Ok(())
    }

    /// Whether any method is defined out of class.
    pub fn has_out_of_line_definitions(&self) -> bool {
        self.methods.iter().any(Method::has_out_of_line_definition)
    }

    /// Members grouped by access, in emission order; empty groups skipped.
    pub fn access_blocks(&self) -> Vec<(Access, Vec<&Field>, Vec<&Method>)> {
        Access::ORDER
            .iter()
            .filter_map(|access| {
                let fields: Vec<&Field> =
                    self.fields.iter().filter(|f| f.access == *access).collect();
                let mut methods: Vec<&Method> = self
                    .methods
                    .iter()
                    .filter(|m| m.access == *access && m.kind == MethodKind::Constructor)
                    .collect();
                methods.extend(
                    self.methods
                        .iter()
                        .filter(|m| m.access == *access && m.kind != MethodKind::Constructor),
                );
                if fields.is_empty() && methods.is_empty() {
                    None
                } else {
                    Some((*access, fields, methods))
                }
            })
            .collect()
    }

    fn member_kind(&self, name: &str) -> Option<&'static str> {
        if self.fields.iter().any(|f| f.name == name) {
            Some("field")
        } else if self
            .methods
            .iter()
            .any(|m| m.kind == MethodKind::Plain && m.name == name)
        {
            Some("method")
        } else {
            None
        }
    }
}

fn same_param_types(a: &ParameterList, b: &ParameterList) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| x.ty == y.ty && x.pass_by == y.pass_by && x.is_const == y.is_const)
}
