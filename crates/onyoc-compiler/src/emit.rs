//! The compile driver: ties preprocessing, parsing, both passes and IR
//! assembly into a single entry point.

use onyoc_core::ir::{Data, Function, IdentMap, Prototype, ReservedIdents};

use crate::collect::collect;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::lower::Lowerer;
use crate::parser::parse;

/// Compiles already-`#use`-expanded onyo source into a fully assembled IR
/// unit, or the accumulated diagnostics if compilation failed.
pub fn compile(source: &str) -> Result<Data> {
    let decls = parse(source)?;
    let collected = collect(decls);
    let mut diagnostics = collected.diagnostics;

    let mut functions = Vec::with_capacity(collected.functions.len());
    for def in &collected.functions {
        let mut lowerer = Lowerer::new(
            &def.parameters,
            &collected.interner,
            &collected.function_index,
            &collected.struct_index,
            &collected.prototypes,
        );
        let body = lowerer.lower_block(&def.cst_body);
        let lowering_diagnostics = std::mem::take(&mut lowerer.diagnostics);
        diagnostics.extend(lowering_diagnostics);
        let variables = lowerer.into_variable_names();
        functions.push(Function {
            name: def.name.clone(),
            parameters: def.parameters.clone(),
            variables,
            body,
        });
    }

    if !diagnostics.is_empty() {
        return Err(Error::Compile(diagnostics));
    }

    let reserved_idents = ReservedIdents { next: collected.reserved_idents_next };
    let prototypes = collected
        .prototypes
        .into_iter()
        .map(|p| Prototype {
            name: p.name,
            field_map: p.field_map,
            method_map: p.method_map,
        })
        .collect();
    let ident_map = IdentMap(collected.interner.into_ident_map());

    Ok(Data {
        functions,
        prototypes,
        ident_map,
        reserved_idents,
    })
}

/// Serializes a compiled `Data` unit to pretty-printed JSON, the shape the
/// external onyo interpreter reads.
pub fn to_json(data: &Data) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_program_compiles_to_empty_main() {
        let data = compile("main() {}").unwrap();
        assert_eq!(data.functions.len(), 1);
        assert_eq!(data.functions[0].name, "main");
        assert!(data.functions[0].variables.is_empty());
        assert!(data.functions[0].body.is_empty());
    }

    #[test]
    fn missing_main_surfaces_as_compile_error() {
        let err = compile("foo() {}").unwrap_err();
        match err {
            Error::Compile(diagnostics) => {
                assert_eq!(diagnostics.len(), 1);
                assert_eq!(diagnostics.errors[0].message, "No main function");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn json_shape_matches_wire_contract() {
        let data = compile("main() { x = 1 + 2 }").unwrap();
        let value: serde_json::Value = serde_json::from_str(&to_json(&data).unwrap()).unwrap();
        assert!(value["functions"][0]["body"][0]["type"] == "Expr");
        // `"next"` is always interned during Pass 1, so `ident_map` is an
        // object keyed by stringified id, never an empty array.
        assert_eq!(value["ident_map"], serde_json::json!({"0": "next"}));
        assert_eq!(value["reserved_idents"]["next"], 0);
    }

    #[test]
    fn reserved_idents_next_is_the_id_of_the_string_next() {
        let source = "struct Counter { value next(self) { ret self.value } }\nmain() {}";
        let data = compile(source).unwrap();
        let next_id = data.reserved_idents.next;
        assert_eq!(data.ident_map.0[next_id as usize], "next");
    }
}
