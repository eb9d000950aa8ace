//! Snapshot tests for rendered declaration/definition pairs.
//!
//! Run `cargo insta review` to update snapshots when making intentional changes.

use sfgen_codegen::render;
use sfgen_model::{
    Config, ConfigLayer, Function, Identifier, Include, IncludeVisibility, KernelBody,
    KernelNamespace, Module, ModuleDescription, Parameter, ParameterList, PassBy,
};

fn demo_module() -> Module {
    let scale = Function::new(Identifier::simple("scale").unwrap())
        .params(
            ParameterList::new([
                Parameter::new("data", "double").restrict(),
                Parameter::new("n", "std::size_t").constant(),
            ])
            .unwrap(),
        )
        .body(KernelBody::new(
            "for (std::size_t i = 0; i < n; ++i)\n  data[i] *= 2.0;",
        ));

    let apply = Function::new(Identifier::simple("applyScale").unwrap())
        .params(
            ParameterList::new([
                Parameter::new("data", "double").pass_by(PassBy::Pointer),
                Parameter::new("n", "std::size_t"),
            ])
            .unwrap(),
        )
        .doc("Double every element of `data`.")
        .body(KernelBody::new("kernels::scale(data, n);"));

    let mut builder = Module::builder("scale");
    builder
        .prelude("// Generated file. Do not edit.")
        .include(Include::parse("<cstddef>").unwrap(), IncludeVisibility::Public);
    builder
        .add_kernel_namespace(KernelNamespace::new("kernels").unwrap().with(scale).unwrap())
        .unwrap();
    builder.add_function(apply).unwrap();
    builder.build().unwrap()
}

fn demo_config() -> Config {
    Config::default()
        .merge(ConfigLayer {
            root_namespace: Some("demo".to_string()),
            ..Default::default()
        })
        .unwrap()
}

#[test]
fn test_demo_declaration() {
    let pair = render(&demo_module(), &demo_config()).unwrap();

    insta::assert_snapshot!(pair.declaration, @r"
    // Generated file. Do not edit.

    #pragma once

    #include <cstddef>

    #define RESTRICT __restrict__

    namespace demo {

      /** Double every element of `data`. */
      void applyScale(double * data, std::size_t n);

    } // namespace demo
    ");
}

#[test]
fn test_demo_definition() {
    let pair = render(&demo_module(), &demo_config()).unwrap();

    insta::assert_snapshot!(pair.definition, @r#"
    // Generated file. Do not edit.

    #include "scale.h"

    #define FUNC_PREFIX inline

    namespace demo {

      namespace kernels {

        FUNC_PREFIX void scale(double * RESTRICT data, std::size_t const n) {
          for (std::size_t i = 0; i < n; ++i)
            data[i] *= 2.0;
        }

      } // namespace demo::kernels

      void applyScale(double * data, std::size_t n) {
        kernels::scale(data, n);
      }

    } // namespace demo
    "#);
}

#[test]
fn test_demo_pair_ends_with_single_newline() {
    let pair = render(&demo_module(), &demo_config()).unwrap();
    for text in [&pair.declaration, &pair.definition] {
        assert!(text.ends_with("}\n"));
        assert!(!text.ends_with("\n\n"));
    }
}

#[test]
fn test_description_file_round_trip() {
    let description = ModuleDescription::from_toml_str(
        r#"
name = "stencil"
includes = [{ header = "<cmath>", visibility = "private" }]

[config]
root_namespace = "num::fd"
indent_width = 4

[[classes]]
name = "Laplace"
keyword = "struct"

[[classes.fields]]
name = "h"
type = "double"

[[classes.methods]]
name = "apply"
return_type = "double"
const = true
params = [{ name = "u", type = "double", pass_by = "pointer", const = true }]
body = "return (u[-1] - 2.0 * u[0] + u[1]) / std::pow(h, 2);"
requires = ["<cmath>"]
"#,
        "stencil.toml",
    )
    .unwrap();

    let config = Config::default()
        .with_overrides(description.config.clone(), ConfigLayer::default())
        .unwrap();
    let mut builder = description.to_builder().unwrap();
    builder.strict_includes(config.strict_includes);
    let module = builder.build().unwrap();
    let pair = render(&module, &config).unwrap();

    insta::assert_snapshot!(pair.declaration, @r"
    #pragma once

    namespace num::fd {

        struct Laplace {
        public:
            double h;
            double apply(double * const u) const;
        };

    } // namespace num::fd
    ");

    insta::assert_snapshot!(pair.definition, @r#"
    #include "stencil.h"

    #include <cmath>

    namespace num::fd {

        double Laplace::apply(double * const u) const {
            return (u[-1] - 2.0 * u[0] + u[1]) / std::pow(h, 2);
        }

    } // namespace num::fd
    "#);
}
