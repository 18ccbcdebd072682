//! Pass 1: the definition collector.
//!
//! Walks only top-level declarations, assigning each function a stable
//! `function_id` (declaration order, methods included at the point their
//! enclosing `struct` is declared) and each struct a stable `struct_id`.
//! Struct field and method names are interned into the shared identifier
//! table here; nothing after this pass adds new entries to it, so
//! `reserved_idents.next` -- the id of the interned name `"next"`, the
//! iterator-protocol hook method -- can be looked up once collection
//! finishes.

use std::collections::HashMap;

use indexmap::IndexMap;
use onyoc_core::Interner;

use crate::cst::{CstNode, Decl, Func, StructDef};
use crate::diagnostics::{Diagnostic, Diagnostics, Range, Suggestion};

/// A function awaiting Pass 2. Unlike `onyoc_core::Function`, `variables`
/// and `body` aren't known yet -- only the declaration shape is.
pub struct FunctionDef {
    pub name: String,
    pub parameters: Vec<String>,
    pub cst_body: Vec<CstNode>,
}

/// A struct's compile-time descriptor, field/method names resolved to
/// `ident_id`s via the shared interner.
pub struct StructProto {
    pub name: String,
    pub field_map: IndexMap<u32, u32>,
    pub method_map: IndexMap<u32, u32>,
}

/// Everything Pass 2 needs: the frozen function/struct tables and the
/// interner, plus whatever Pass 1 already diagnosed.
pub struct Collected {
    pub interner: Interner,
    pub functions: Vec<FunctionDef>,
    pub function_index: HashMap<String, u32>,
    pub prototypes: Vec<StructProto>,
    pub struct_index: HashMap<String, u32>,
    pub diagnostics: Diagnostics,
    pub reserved_idents_next: u32,
}

struct Collector {
    interner: Interner,
    functions: Vec<FunctionDef>,
    function_index: HashMap<String, u32>,
    prototypes: Vec<StructProto>,
    struct_index: HashMap<String, u32>,
    diagnostics: Diagnostics,
}

/// Run Pass 1 over the parsed top-level declarations.
pub fn collect(decls: Vec<Decl>) -> Collected {
    let mut c = Collector {
        interner: Interner::new(),
        functions: Vec::new(),
        function_index: HashMap::new(),
        prototypes: Vec::new(),
        struct_index: HashMap::new(),
        diagnostics: Diagnostics::new(),
    };

    for decl in decls {
        match decl {
            Decl::Func(f) => c.register_func(f, None),
            Decl::Struct(s) => c.register_struct(s),
        }
    }

    if !c.function_index.contains_key("main") {
        c.diagnostics.push(
            Diagnostic::new("No main function")
                .with_suggestion(Suggestion {
                    message: "Consider adding a main function".to_string(),
                    range: Range { line: 0, column: 0, length: 0 },
                    replacement: "main() {}".to_string(),
                }),
        );
    } else if let Some(&id) = c.function_index.get("main") {
        let main = &c.functions[id as usize];
        if !main.parameters.is_empty() {
            c.diagnostics.push(Diagnostic::new(
                "function `main` must not take any parameters",
            ));
        }
    }

    // `"next"` may or may not already be interned as a struct field/method
    // name; intern it now (a no-op if it's already present) so
    // `reserved_idents.next` is always its id, per spec.
    let reserved_idents_next = c.interner.intern("next").as_u32();

    Collected {
        interner: c.interner,
        functions: c.functions,
        function_index: c.function_index,
        prototypes: c.prototypes,
        struct_index: c.struct_index,
        diagnostics: c.diagnostics,
        reserved_idents_next,
    }
}

impl Collector {
    fn register_func(&mut self, f: Func, qualifier: Option<&str>) {
        let bare_name = f.name.text.clone();
        let qualname = match qualifier {
            Some(prefix) => format!("{prefix}.{bare_name}"),
            None => bare_name,
        };
        if self.function_index.contains_key(&qualname) {
            self.diagnostics.push(
                Diagnostic::new(format!("function `{qualname}` is already defined"))
                    .at(Range::from_token(&f.name)),
            );
            return;
        }
        let id = self.functions.len() as u32;
        let parameters = f.params.iter().map(|t| t.text.clone()).collect();
        self.functions.push(FunctionDef {
            name: qualname.clone(),
            parameters,
            cst_body: f.body,
        });
        self.function_index.insert(qualname, id);
    }

    fn register_struct(&mut self, s: StructDef) {
        let struct_name = s.name.text.clone();
        let struct_id = self.prototypes.len() as u32;
        if self.struct_index.contains_key(&struct_name) {
            self.diagnostics.push(
                Diagnostic::new(format!("struct `{struct_name}` is already defined"))
                    .at(Range::from_token(&s.name)),
            );
            return;
        }

        let mut field_map: IndexMap<u32, u32> = IndexMap::new();
        for field in &s.fields {
            let sym = self.interner.intern(&field.text);
            let ident_id = sym.as_u32();
            if field_map.contains_key(&ident_id) {
                self.diagnostics.push(
                    Diagnostic::new(format!(
                        "field `{}` is already defined in struct `{struct_name}`",
                        field.text
                    ))
                    .at(Range::from_token(field)),
                );
                continue;
            }
            let slot = field_map.len() as u32;
            field_map.insert(ident_id, slot);
        }

        let mut method_map: IndexMap<u32, u32> = IndexMap::new();
        for method in s.methods {
            let method_name_token = method.name.clone();
            let bare_name = method_name_token.text.clone();
            self.register_func(method, Some(&struct_name));
            let qualname = format!("{struct_name}.{bare_name}");
            if let Some(&function_id) = self.function_index.get(&qualname) {
                let sym = self.interner.intern(&bare_name);
                let ident_id = sym.as_u32();
                if method_map.contains_key(&ident_id) {
                    self.diagnostics.push(
                        Diagnostic::new(format!(
                            "method `{bare_name}` is already defined in struct `{struct_name}`",
                        ))
                        .at(Range::from_token(&method_name_token)),
                    );
                    continue;
                }
                method_map.insert(ident_id, function_id);
            }
        }

        self.prototypes.push(StructProto {
            name: struct_name.clone(),
            field_map,
            method_map,
        });
        self.struct_index.insert(struct_name, struct_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn assigns_function_ids_in_declaration_order() {
        let decls = parse("a() {}\nb() {}\nmain() {}").unwrap();
        let collected = collect(decls);
        assert_eq!(collected.function_index["a"], 0);
        assert_eq!(collected.function_index["b"], 1);
        assert_eq!(collected.function_index["main"], 2);
    }

    #[test]
    fn missing_main_is_diagnosed() {
        let decls = parse("foo() {}").unwrap();
        let collected = collect(decls);
        assert_eq!(collected.diagnostics.len(), 1);
        assert_eq!(collected.diagnostics.errors[0].message, "No main function");
    }

    #[test]
    fn duplicate_function_is_diagnosed() {
        let decls = parse("foo() {}\nfoo() {}\nmain() {}").unwrap();
        let collected = collect(decls);
        assert_eq!(collected.diagnostics.len(), 1);
        assert_eq!(collected.functions.len(), 2);
    }

    #[test]
    fn struct_methods_get_mangled_names_and_slots() {
        let decls = parse("struct P { x y dist(self) { ret 0 } }\nmain() {}").unwrap();
        let collected = collect(decls);
        assert_eq!(collected.prototypes.len(), 1);
        let proto = &collected.prototypes[0];
        assert_eq!(proto.field_map.len(), 2);
        assert_eq!(proto.method_map.len(), 1);
        assert!(collected.function_index.contains_key("P.dist"));
    }
}
