//! Optional calls on imported bindings: `f?.()` → `(0, f)?.()`.
//!
//! The CommonJS pass detaches the module object from plain calls and tagged
//! templates only. Running this first gives `(0, _m.f)?.()` once `f` is
//! rewritten, so the module object never becomes the receiver.

use std::collections::HashSet;

use swc_common::DUMMY_SP;
use swc_ecma_ast::*;
use swc_ecma_visit::{VisitMut, VisitMutWith};

/// Wraps the callee of every optional call on an imported binding in a
/// sequence expression. Returns how many calls were wrapped.
///
/// Expects identifiers resolved by swc's `resolver`, so locals shadowing an
/// import keep their own syntax context and are left alone.
pub fn detach_optional_calls(module: &mut Module) -> usize {
    let imports = imported_bindings(module);
    if imports.is_empty() {
        return 0;
    }
    let mut detacher = OptionalCallDetacher {
        imports,
        detached: 0,
    };
    module.visit_mut_with(&mut detacher);
    detacher.detached
}

/// Default and named import bindings. Namespace objects are left out, since
/// calls through them keep the namespace as receiver.
fn imported_bindings(module: &Module) -> HashSet<Id> {
    module
        .body
        .iter()
        .filter_map(|item| match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) if !import.type_only => Some(import),
            _ => None,
        })
        .flat_map(|import| import.specifiers.iter())
        .filter_map(|specifier| match specifier {
            ImportSpecifier::Named(named) => Some(named.local.to_id()),
            ImportSpecifier::Default(default) => Some(default.local.to_id()),
            ImportSpecifier::Namespace(_) => None,
        })
        .collect()
}

struct OptionalCallDetacher {
    imports: HashSet<Id>,
    detached: usize,
}

impl VisitMut for OptionalCallDetacher {
    fn visit_mut_opt_call(&mut self, call: &mut OptCall) {
        call.visit_mut_children_with(self);

        let Expr::Ident(ident) = &*call.callee else {
            return;
        };
        if !self.imports.contains(&ident.to_id()) {
            return;
        }
        let callee = std::mem::replace(
            &mut call.callee,
            Box::new(Expr::Invalid(Invalid { span: DUMMY_SP })),
        );
        let zero = Expr::Lit(Lit::Num(Number {
            span: DUMMY_SP,
            value: 0.0,
            raw: None,
        }));
        call.callee = Box::new(Expr::Seq(SeqExpr {
            span: DUMMY_SP,
            exprs: vec![Box::new(zero), callee],
        }));
        self.detached += 1;
    }
}
