//! Read-only declaration tables consulted by call lowering.
//!
//! Everything here is filled in before lowering starts, by the declaration
//! passes upstream of this crate (or by the [`Declarations::declare_function`]
//! convenience for lifted function declarations).

use kestrel_ast::{Expr, FunctionDecl, Stmt};
use kestrel_core::RegistrationError;
use kestrel_registry::{
    AbiTable, ClassTable, ClosureTable, FunctionEntry, FunctionTable, ImportTable,
    ObjectLiteralTable,
};
use rustc_hash::FxHashMap;

/// Default value expressions of one function, one entry per parameter.
pub type DefaultParams<'ast> = Vec<Option<&'ast Expr<'ast>>>;

#[derive(Debug, Default)]
pub struct Declarations<'ast> {
    pub classes: ClassTable,
    pub objects: ObjectLiteralTable,
    pub closures: ClosureTable,
    pub functions: FunctionTable,
    pub imports: ImportTable,
    pub abi: AbiTable,
    defaults: FxHashMap<String, DefaultParams<'ast>>,
    /// Functions whose every traced return hands back a known function.
    returned: FxHashMap<String, String>,
}

impl<'ast> Declarations<'ast> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_abi(abi: AbiTable) -> Self {
        Self {
            abi,
            ..Self::default()
        }
    }

    /// Register a lifted declaration: its signature, its default-parameter
    /// table, and the function it returns if that is statically visible.
    pub fn declare_function(&mut self, decl: &'ast FunctionDecl<'ast>) -> Result<(), RegistrationError> {
        let name = decl.symbol_name();
        self.functions
            .register(FunctionEntry::new(name.clone(), decl.param_names(), decl.flags))?;
        if decl.has_defaults() {
            self.defaults
                .insert(name.clone(), decl.params.iter().map(|p| p.default).collect());
        }
        if let Some(target) = returned_function(decl.body) {
            log::trace!("{} returns function {}", name, target);
            self.returned.insert(name, target.to_string());
        }
        Ok(())
    }

    pub fn set_defaults(&mut self, function: impl Into<String>, defaults: DefaultParams<'ast>) {
        self.defaults.insert(function.into(), defaults);
    }

    pub fn defaults(&self, function: &str) -> Option<&[Option<&'ast Expr<'ast>>]> {
        self.defaults.get(function).map(Vec::as_slice)
    }

    /// The function a call to `function` statically returns.
    pub fn returned_function(&self, function: &str) -> Option<&str> {
        self.returned.get(function).map(String::as_str)
    }
}

/// Name of the function `body` returns, when its return statements hand back
/// a function expression directly or through a local bound to one.
fn returned_function<'ast>(body: &'ast [Stmt<'ast>]) -> Option<&'ast str> {
    let mut locals: FxHashMap<&'ast str, &'ast str> = FxHashMap::default();
    let mut found = None;
    scan(body, &mut locals, &mut found);
    found.flatten()
}

/// `found` becomes `Some(None)` once a return is seen that does not name a
/// known function.
fn scan<'ast>(
    stmts: &'ast [Stmt<'ast>],
    locals: &mut FxHashMap<&'ast str, &'ast str>,
    found: &mut Option<Option<&'ast str>>,
) {
    for stmt in stmts {
        match stmt {
            Stmt::Let(s) => match s.init.map(Expr::unparen) {
                Some(Expr::FunctionRef(f)) => {
                    locals.insert(s.name.name, f.name);
                }
                _ => {
                    locals.remove(s.name.name);
                }
            },
            Stmt::Assign(s) => {
                locals.remove(s.target.name);
            }
            Stmt::Return(s) => {
                let target = match s.value.map(Expr::unparen) {
                    Some(Expr::FunctionRef(f)) => Some(f.name),
                    Some(Expr::Ident(ident)) => locals.get(ident.name).copied(),
                    _ => None,
                };
                *found = match (*found, target) {
                    (None, Some(t)) => Some(Some(t)),
                    (Some(Some(prev)), Some(t)) if prev == t => Some(Some(t)),
                    _ => Some(None),
                };
            }
            Stmt::Block(block) => scan(block.stmts, locals, found),
            Stmt::Expr(_) => {}
        }
    }
}
