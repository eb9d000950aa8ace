use sfgen_model::{
    Access, Class, Config, Field, Function, Identifier, Include, IncludeVisibility, KernelBody,
    KernelNamespace, Method, Module, ModuleBuilder, Parameter, ParameterList, PassBy,
};

use super::Renderer;
use crate::testing::{assert_scopes_balanced, check_scope_balance};

fn id(s: &str) -> Identifier {
    Identifier::parse(s).unwrap()
}

fn config(root: Option<&str>) -> Config {
    Config {
        root_namespace: root.map(String::from),
        ..Default::default()
    }
}

fn render(module: &Module, config: &Config) -> (String, String) {
    let renderer = Renderer::new(config).unwrap();
    (renderer.declaration(module), renderer.definition(module))
}

fn scale_kernels() -> KernelNamespace {
    KernelNamespace::new("kernels")
        .unwrap()
        .with(
            Function::new(id("scale"))
                .params(
                    ParameterList::new([
                        Parameter::new("data", "double").restrict(),
                        Parameter::new("n", "int").constant(),
                    ])
                    .unwrap(),
                )
                .body(KernelBody::new(
                    "for (int i = 0; i < n; ++i) {\n  data[i] *= 2.0;\n}",
                )),
        )
        .unwrap()
}

#[test]
fn test_rendering_is_idempotent() {
    let mut builder = Module::builder("demo");
    builder.add_kernel_namespace(scale_kernels()).unwrap();
    builder
        .add_function(Function::new(id("a::b::f")).body(KernelBody::new("return;")))
        .unwrap();
    let module = builder.build().unwrap();
    let config = config(Some("demo"));

    assert_eq!(render(&module, &config), render(&module, &config));
}

#[test]
fn test_scopes_balance_under_deep_nesting() {
    let mut builder = Module::builder("deep");
    builder
        .add_function(Function::new(id("a::b::c::d::e::f")).body(KernelBody::new("{ }")))
        .unwrap();
    builder.add_function(Function::new(id("a::x::g"))).unwrap();
    builder.add_kernel_namespace(scale_kernels()).unwrap();
    let module = builder.build().unwrap();

    let (decl, def) = render(&module, &config(Some("root::ns")));
    assert_eq!(check_scope_balance(&decl), Ok(6));
    assert_eq!(check_scope_balance(&def), Ok(6));
    assert!(def.contains("} // namespace root::ns::a::b::c::d::e\n"));
    assert!(def.contains("} // namespace root::ns::kernels\n"));
}

#[test]
fn test_public_include_dominates_private() {
    let mut builder = Module::builder("inc");
    builder
        .include(Include::parse("<vector>").unwrap(), IncludeVisibility::Private)
        .include(Include::parse("<cmath>").unwrap(), IncludeVisibility::Private)
        .include(Include::parse("<vector>").unwrap(), IncludeVisibility::Public);
    builder.add_function(Function::new(id("f"))).unwrap();
    let module = builder.build().unwrap();

    let (decl, def) = render(&module, &Config::default());
    assert_eq!(decl.matches("#include <vector>").count(), 1);
    assert!(!def.contains("#include <vector>"));
    assert!(def.contains("#include <cmath>"));
}

#[test]
fn test_child_order_independent_of_attachment_interleaving() {
    let class = || Class::new(id("Grid"));
    let function = || Function::new(id("run")).body(KernelBody::new("return;"));

    let mut first = ModuleBuilder::new("order");
    first.add_function(function()).unwrap();
    first.add_class(class()).unwrap();
    first.add_kernel_namespace(scale_kernels()).unwrap();

    let mut second = ModuleBuilder::new("order");
    second.add_kernel_namespace(scale_kernels()).unwrap();
    second.add_class(class()).unwrap();
    second.add_function(function()).unwrap();

    let config = config(Some("demo"));
    let first = render(&first.build().unwrap(), &config);
    let second = render(&second.build().unwrap(), &config);
    assert_eq!(first, second);

    let (decl, def) = first;
    assert!(decl.find("class Grid").unwrap() < decl.find("void run();").unwrap());
    assert!(def.find("namespace kernels").unwrap() < def.find("void run()").unwrap());
}

#[test]
fn test_body_lines_get_uniform_prefix() {
    let body = "if (x) {\n    y();\n}\n\nz();";
    let mut builder = Module::builder("indent");
    builder
        .add_function(Function::new(id("a::f")).body(KernelBody::new(body)))
        .unwrap();
    let module = builder.build().unwrap();

    for width in [2, 3, 4] {
        let config = Config {
            indent_width: width,
            root_namespace: Some("demo".to_string()),
            ..Default::default()
        };
        let (_, def) = render(&module, &config);
        let prefix = " ".repeat(width * 3);

        let start = def.find("void f() {\n").unwrap() + "void f() {\n".len();
        let rendered: Vec<&str> = def[start..].lines().take(5).collect();
        let expected: Vec<String> = body
            .lines()
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("{}{}", prefix, line)
                }
            })
            .collect();
        assert_eq!(rendered, expected, "indent width {width}");
    }
}

#[test]
fn test_declaration_only_function_has_no_definition() {
    let mut builder = Module::builder("decl");
    builder
        .add_function(Function::new(id("demo::later")).returns("int"))
        .unwrap();
    let module = builder.build().unwrap();

    let (decl, def) = render(&module, &Config::default());
    assert!(decl.contains("  int later();\n"));
    assert_eq!(def, "#include \"decl.h\"\n");
}

#[test]
fn test_empty_module_renders_degenerate_pair() {
    let module = Module::builder("empty").build().unwrap();

    let (decl, def) = render(&module, &Config::default());
    assert_eq!(decl, "#pragma once\n");
    assert_eq!(def, "#include \"empty.h\"\n");

    let (decl, _) = render(&module, &config(Some("demo")));
    assert_eq!(decl, "#pragma once\n\nnamespace demo {\n\n} // namespace demo\n");
}

#[test]
fn test_restrict_macro_only_when_used() {
    let mut plain = Module::builder("plain");
    plain.add_function(Function::new(id("f"))).unwrap();
    let (decl, _) = render(&plain.build().unwrap(), &Config::default());
    assert!(!decl.contains("#define"));

    let mut restricted = Module::builder("restricted");
    restricted.add_kernel_namespace(scale_kernels()).unwrap();
    let (decl, def) = render(&restricted.build().unwrap(), &Config::default());
    assert!(decl.contains("#define RESTRICT __restrict__\n"));
    assert!(def.contains("#define FUNC_PREFIX inline\n"));
    assert!(def.contains("FUNC_PREFIX void scale(double * RESTRICT data, int const n) {"));
}

#[test]
fn test_disabled_macros() {
    let mut builder = Module::builder("raw");
    builder.add_kernel_namespace(scale_kernels()).unwrap();
    let module = builder.build().unwrap();
    let config = Config {
        restrict_macro_name: None,
        func_prefix_macro_name: None,
        ..Default::default()
    };

    let (decl, def) = render(&module, &config);
    assert!(!decl.contains("#define"));
    assert!(!def.contains("#define"));
    assert!(def.contains("  void scale(double * __restrict__ data, int const n) {"));
}

#[test]
fn test_class_members_and_out_of_line_methods() {
    let mut grid = Class::new(id("demo::Grid")).base("public Base");
    grid.add_field(Field::new("size_", "int", Access::Private))
        .unwrap();
    grid.add_method(
        Method::plain("size")
            .returns("int")
            .constant()
            .inline()
            .body(KernelBody::new("return size_;")),
    )
    .unwrap();
    grid.add_method(
        Method::constructor()
            .params(ParameterList::new([Parameter::new("n", "int")]).unwrap())
            .initializer("size_(n)"),
    )
    .unwrap();
    grid.add_method(
        Method::plain("reset")
            .access(Access::Protected)
            .doc("Zero the grid.")
            .body(KernelBody::new("size_ = 0;")),
    )
    .unwrap();

    let mut builder = Module::builder("grid");
    builder.add_class(grid).unwrap();
    let module = builder.build().unwrap();
    let (decl, def) = render(&module, &Config::default());

    insta::assert_snapshot!(decl, @r"
    #pragma once

    namespace demo {

      class Grid : public Base {
      public:
        Grid(int n);
        int size() const {
          return size_;
        }

      protected:
        /** Zero the grid. */
        void reset();

      private:
        int size_;
      };

    } // namespace demo
    ");

    insta::assert_snapshot!(def, @r#"
    #include "grid.h"

    namespace demo {

      Grid::Grid(int n) : size_(n) {
      }

      void Grid::reset() {
        size_ = 0;
      }

    } // namespace demo
    "#);
    assert_scopes_balanced(&decl);
}

#[test]
fn test_section_comments() {
    let mut builder = Module::builder("sections");
    builder.add_kernel_namespace(scale_kernels()).unwrap();
    builder
        .add_function(Function::new(id("run")).body(KernelBody::new("return;")))
        .unwrap();
    let module = builder.build().unwrap();
    let config = Config {
        section_comments: true,
        ..Default::default()
    };

    let (decl, def) = render(&module, &config);
    assert!(!decl.contains("// Functions"));
    assert!(def.contains("// Kernels\nnamespace kernels {"));
    assert!(def.contains("// Functions\nvoid run() {"));
    assert!(!def.contains("// Classes"));
}

#[test]
fn test_pointer_and_reference_parameters() {
    let params = ParameterList::new([
        Parameter::new("out", "float").pass_by(PassBy::Pointer),
        Parameter::new("grid", "Grid").pass_by(PassBy::Reference).constant(),
    ])
    .unwrap();
    let mut builder = Module::builder("params");
    builder
        .add_function(Function::new(id("copy")).params(params))
        .unwrap();
    let module = builder.build().unwrap();

    let (decl, _) = render(&module, &Config::default());
    assert!(decl.contains("void copy(float * out, Grid const & grid);"));
}

#[test]
fn test_line_streams_match_text() {
    let mut builder = Module::builder("scale");
    builder.add_kernel_namespace(scale_kernels()).unwrap();
    builder
        .add_function(Function::new(id("applyScale")).body(KernelBody::new("kernels::scale(data, n);")))
        .unwrap();
    let module = builder.build().unwrap();
    let config = config(Some("demo"));
    let renderer = Renderer::new(&config).unwrap();

    let decl = renderer.declaration_lines(&module);
    let def = renderer.definition_lines(&module);
    assert_eq!(decl.join("\n") + "\n", renderer.declaration(&module));
    assert_eq!(def.join("\n") + "\n", renderer.definition(&module));

    assert_eq!(decl.iter().filter(|l| *l == "namespace demo {").count(), 1);
    assert!(!decl.iter().any(|l| l.contains("scale(")));
    let kernels = def.iter().position(|l| l == "  namespace kernels {").unwrap();
    let apply = def.iter().position(|l| l == "  void applyScale() {").unwrap();
    assert!(kernels < apply);
    assert_eq!(def.last().map(String::as_str), Some("} // namespace demo"));
}

#[test]
fn test_doc_text_cannot_close_comment() {
    let mut builder = Module::builder("docs");
    builder
        .add_function(Function::new(id("f")).doc("Computes a */ b."))
        .unwrap();
    let module = builder.build().unwrap();

    let (decl, _) = render(&module, &Config::default());
    assert!(decl.contains("/** Computes a * / b. */\nvoid f();"), "{decl}");
    assert_eq!(decl.matches("*/").count(), 1);
}
