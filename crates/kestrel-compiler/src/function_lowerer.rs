//! Lowering of a single function body to HIR.
//!
//! [`FunctionLowerer`] owns the lexical scope and instruction builder of the
//! function being lowered. It sets up the incoming parameters in this order:
//!
//! - `this` for instance methods (parameter 0),
//! - the declared parameters,
//! - the environment record for functions with captures (always last).
//!
//! Constructors do not receive `this`; they allocate their own instance (or
//! hold a zero sentinel until `super(...)` rebinds it) and implicitly return
//! it.
//!
//! # Example
//!
//! ```ignore
//! let lowerer = FunctionLowerer::new(&decls, &mut session, decl);
//! let function = lowerer.lower(decl);
//! session.module.functions.push(function);
//! ```

use kestrel_ast::{CallExpr, FunctionDecl};
use kestrel_core::{FunctionFlags, HirType, LoweringError, Span, TypeTag};
use kestrel_registry::ClosureDescriptor;

use crate::context::{Declarations, LoweringSession};
use crate::expr::Operand;
use crate::hir::{FunctionBuilder, HirFunction, ValueId};
use crate::plan::CallPlan;
use crate::scope::{Binding, LexicalScope};
use crate::{Result, calls};

/// Runtime allocation of an empty object, used for constructor instances
/// and object literals.
pub(crate) const OBJECT_CREATE: &str = "kestrel_object_create";

/// The incoming environment record of a function with captures.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EnvParam<'a> {
    pub value: ValueId,
    pub descriptor: &'a ClosureDescriptor,
}

/// Lowers one function declaration.
pub struct FunctionLowerer<'a, 'ast> {
    /// Read-only declaration tables
    pub(crate) decls: &'a Declarations<'ast>,
    /// Module under construction and the diagnostics sink
    pub(crate) session: &'a mut LoweringSession,
    pub(crate) scope: LexicalScope,
    pub(crate) builder: FunctionBuilder,
    /// Owning class of a method or constructor
    pub(crate) current_class: Option<&'ast str>,
    /// Slot holding `this`, when the function has one
    pub(crate) this_slot: Option<ValueId>,
    pub(crate) env: Option<EnvParam<'a>>,
    flags: FunctionFlags,
}

impl<'a, 'ast> FunctionLowerer<'a, 'ast> {
    pub fn new(
        decls: &'a Declarations<'ast>,
        session: &'a mut LoweringSession,
        decl: &'ast FunctionDecl<'ast>,
    ) -> Self {
        let name = decl.symbol_name();
        let has_env = decls.closures.captures(&name);
        let param_count = u32::from(receives_this(decl.flags))
            + decl.params.len() as u32
            + u32::from(has_env);

        Self {
            decls,
            session,
            scope: LexicalScope::new(),
            builder: FunctionBuilder::new(name, param_count, has_env),
            current_class: decl.owner.map(|owner| owner.name),
            this_slot: None,
            env: None,
            flags: decl.flags,
        }
    }

    /// Lower the whole body and return the finished function.
    pub fn lower(mut self, decl: &'ast FunctionDecl<'ast>) -> HirFunction {
        self.builder.set_span(decl.span);
        self.setup_parameters(decl);
        self.lower_stmts(decl.body);

        if self.flags.contains(FunctionFlags::CONSTRUCTOR) && !self.builder.is_terminated() {
            let this = self.this_slot.map(|slot| self.builder.load(slot));
            self.builder.ret(this);
        }
        self.builder.finish()
    }

    fn setup_parameters(&mut self, decl: &'ast FunctionDecl<'ast>) {
        let mut index = 0;

        if receives_this(self.flags) {
            let this = self.builder.param(index);
            self.this_slot = Some(self.builder.local("this", this));
            index += 1;
        } else if self.flags.contains(FunctionFlags::CONSTRUCTOR) {
            match self.allocate_instance(decl.span) {
                Ok(this) => self.this_slot = Some(self.builder.local("this", this)),
                Err(err) => self.session.report(&err),
            }
        }

        for param in decl.params {
            let name = param.name.name;
            let value = self.builder.param(index);
            let slot = self.builder.local(name, value);
            self.scope.declare(name, Binding::value(slot, TypeTag::Unknown));
            index += 1;
        }

        let decls = self.decls;
        if let Some(descriptor) = decls.closures.get(self.builder.name()) {
            let value = self.builder.param(index);
            self.session.module.declare_env_record(descriptor);
            self.env = Some(EnvParam { value, descriptor });
        }
    }

    /// The instance a constructor starts from: a fresh object for a root
    /// class, or the zero sentinel when `super(...)` will produce it.
    fn allocate_instance(&mut self, span: Span) -> Result<ValueId> {
        let has_parent = self
            .current_class
            .is_some_and(|class| self.decls.classes.parent_of(class).is_some());
        if has_parent {
            return Ok(self.builder.int(0));
        }
        self.session
            .declare_external(OBJECT_CREATE, &[], HirType::Ptr, false, span)?;
        Ok(self.builder.call(OBJECT_CREATE, Vec::new()))
    }

    // ==========================================================================
    // Calls
    // ==========================================================================

    /// Lower one call site. Resolution errors never escape: they become a
    /// diagnostic and an `undefined` placeholder.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn lower_call(&mut self, call: &'ast CallExpr<'ast>) -> Operand {
        self.builder.set_span(call.span);
        let plan = self.resolve_or_placeholder(call.span, |lowerer| calls::resolve_call(lowerer, call));
        self.emit_plan(plan)
    }

    pub(crate) fn resolve_or_placeholder(
        &mut self,
        span: Span,
        resolve: impl FnOnce(&mut Self) -> Result<CallPlan>,
    ) -> CallPlan {
        match resolve(self) {
            Ok(plan) => {
                log::debug!(
                    "{} {}: {} -> {:?}",
                    self.builder.name(),
                    span,
                    plan.recognizer,
                    plan.target
                );
                plan
            }
            Err(err) => {
                self.session.report(&err);
                CallPlan::placeholder()
            }
        }
    }

    // ==========================================================================
    // Receiver and bindings
    // ==========================================================================

    /// `this`, or the zero sentinel where none is available.
    pub(crate) fn this_or_sentinel(&mut self) -> ValueId {
        match self.this_slot {
            Some(slot) => self.builder.load(slot),
            None => self.builder.int(0),
        }
    }

    /// Whether `name` is bound locally, captured names included.
    pub(crate) fn is_local(&self, name: &str) -> bool {
        self.scope.is_bound(name)
            || self
                .env
                .is_some_and(|env| env.descriptor.field_index(name).is_some())
    }

    /// The current value of `name`: its slot, or its field in the incoming
    /// environment record.
    pub(crate) fn read_binding(&mut self, name: &str) -> Option<ValueId> {
        if let Some(slot) = self.scope.lookup(name).map(|binding| binding.slot) {
            return Some(self.builder.load(slot));
        }
        let env = self.env?;
        let index = env.descriptor.field_index(name)?;
        Some(self.builder.get_field(env.value, index as u32))
    }

    pub(crate) fn current_class_or_err(&self, span: Span) -> Result<&'ast str> {
        self.current_class
            .ok_or(LoweringError::SuperOutsideClass { span })
    }
}

/// Instance methods take `this` as parameter 0.
fn receives_this(flags: FunctionFlags) -> bool {
    flags.contains(FunctionFlags::METHOD)
        && !flags.intersects(FunctionFlags::STATIC | FunctionFlags::CONSTRUCTOR)
}
