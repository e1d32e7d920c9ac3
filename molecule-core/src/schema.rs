//! Whole-schema emission
//!
//! [`Codec::schema`] renders a single declaration. [`emit_schema`] walks the
//! dependency graph of a root codec and renders every declaration it needs,
//! dependencies first, so the output can be fed back to a schema compiler.

use std::collections::HashMap;

use crate::codec::Codec;

#[cfg(feature = "logging")]
use tracing::warn;

#[derive(Default)]
struct SchemaEmitter {
    emitted: HashMap<String, String>,
    declarations: Vec<String>,
}

impl SchemaEmitter {
    fn visit(&mut self, codec: &dyn Codec) {
        let schema = codec.schema();
        // Primitives have no declaration.
        if schema.is_empty() {
            return;
        }

        if let Some(existing) = self.emitted.get(codec.name()) {
            if *existing != schema {
                #[cfg(feature = "logging")]
                warn!(
                    "Conflicting declarations for {}, keeping the first one",
                    codec.name()
                );
            }
            return;
        }

        for dependency in codec.dependencies() {
            self.visit(&dependency);
        }
        self.emitted.insert(codec.name().to_string(), schema.clone());
        self.declarations.push(schema);
    }
}

/// Render `root` and everything it depends on
///
/// Each name is declared once, dependencies before dependants, with a blank
/// line between declarations.
pub fn emit_schema(root: &dyn Codec) -> String {
    let mut emitter = SchemaEmitter::default();
    emitter.visit(root);
    emitter.declarations.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{array, byte_array};
    use crate::byte::byte;
    use crate::codec::AnyCodec;
    use crate::option::option;
    use crate::table::table;
    use crate::vector::vector;

    #[test]
    fn test_primitive_has_no_declaration() {
        assert_eq!(emit_schema(&byte()), "");
    }

    #[test]
    fn test_dependencies_come_first() {
        let byte32 = byte_array("Byte32", 32);
        let script = table(
            "Script",
            [
                ("code_hash", AnyCodec::from(byte32)),
                ("args", vector("Bytes", byte()).unwrap()),
            ],
            &["code_hash", "args"],
        )
        .unwrap();
        let script_opt = option("ScriptOpt", script);

        assert_eq!(
            emit_schema(&script_opt),
            [
                "array Byte32 [byte; 32];",
                "vector Bytes <byte>;",
                "table Script {\n    code_hash: Byte32,\n    args: Bytes,\n}",
                "option ScriptOpt (Script);",
            ]
            .join("\n\n")
        );
    }

    #[test]
    fn test_shared_dependency_is_declared_once() {
        let byte2 = array("Byte2", byte(), 2).unwrap();
        let pair = table(
            "Pair",
            [("a", byte2.clone()), ("b", byte2)],
            &["a", "b"],
        )
        .unwrap();

        let text = emit_schema(&pair);
        assert_eq!(text.matches("array Byte2").count(), 1);
        assert!(text.ends_with("table Pair {\n    a: Byte2,\n    b: Byte2,\n}"));
    }

    #[test]
    fn test_conflicting_names_keep_first() {
        let pair = table(
            "Pair",
            [
                ("a", array("Word", byte(), 2).unwrap()),
                ("b", array("Word", byte(), 4).unwrap()),
            ],
            &["a", "b"],
        )
        .unwrap();

        let text = emit_schema(&pair);
        assert!(text.contains("array Word [byte; 2];"));
        assert!(!text.contains("array Word [byte; 4];"));
    }
}
