//! Signature text for functions, kernels and methods.

use sfgen_model::{Method, MethodKind, Parameter, ParameterList, PassBy};

/// Qualifier written when no restrict macro is configured.
pub const RESTRICT_QUALIFIER: &str = "__restrict__";

/// Formats parameters and signatures.
#[derive(Debug, Clone)]
pub struct Signatures {
    restrict: String,
}

impl Signatures {
    /// `restrict` is the token written for non-aliasing pointers.
    pub fn new(restrict: Option<&str>) -> Self {
        Self {
            restrict: restrict.unwrap_or(RESTRICT_QUALIFIER).to_string(),
        }
    }

    pub fn parameter(&self, param: &Parameter) -> String {
        let Parameter { name, ty, .. } = param;
        match (param.pass_by, param.is_const) {
            (PassBy::Value, false) => format!("{} {}", ty, name),
            (PassBy::Value, true) => format!("{} const {}", ty, name),
            (PassBy::Pointer, false) => format!("{} * {}", ty, name),
            (PassBy::Pointer, true) => format!("{} * const {}", ty, name),
            (PassBy::RestrictPointer, false) => format!("{} * {} {}", ty, self.restrict, name),
            (PassBy::RestrictPointer, true) => {
                format!("{} * {} const {}", ty, self.restrict, name)
            }
            (PassBy::Reference, false) => format!("{} & {}", ty, name),
            (PassBy::Reference, true) => format!("{} const & {}", ty, name),
        }
    }

    /// Comma-separated parameters in declaration order.
    pub fn parameters(&self, params: &ParameterList) -> String {
        params
            .iter()
            .map(|p| self.parameter(p))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `ret name(params)`.
    pub fn function(&self, name: &str, return_type: &str, params: &ParameterList) -> String {
        format!("{} {}({})", return_type, name, self.parameters(params))
    }

    /// Signature of a method as declared inside its class.
    pub fn method_declaration(&self, class: &str, method: &Method) -> String {
        self.method(class, method, "")
    }

    /// Signature opening a method definition, including any constructor
    /// initializer list. `qualified` prefixes the name with `Class::`.
    pub fn method_definition(&self, class: &str, method: &Method, qualified: bool) -> String {
        let qualifier = if qualified {
            format!("{}::", class)
        } else {
            String::new()
        };
        let mut signature = self.method(class, method, &qualifier);
        if method.kind == MethodKind::Constructor && !method.initializers.is_empty() {
            signature.push_str(" : ");
            signature.push_str(&method.initializers.join(", "));
        }
        signature
    }

    fn method(&self, class: &str, method: &Method, qualifier: &str) -> String {
        let params = self.parameters(&method.params);
        let mut signature = match method.kind {
            MethodKind::Constructor => format!("{}{}({})", qualifier, class, params),
            MethodKind::Plain => format!(
                "{} {}{}({})",
                method.return_type, qualifier, method.name, params
            ),
            MethodKind::Operator => format!(
                "{} {}operator{}({})",
                method.return_type, qualifier, method.name, params
            ),
        };
        if method.is_const {
            signature.push_str(" const");
        }
        signature
    }
}
