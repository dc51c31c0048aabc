//! Expression lowering.
//!
//! Every expression lowers to an [`Operand`]: the HIR value plus what is
//! statically known about it. That static information is what the call
//! resolver dispatches on (receiver type, handle tag, known function).

use kestrel_ast::{Expr, Ident, LiteralKind, MemberExpr};
use kestrel_core::{HirType, LoweringError, Namespace, PrimitiveKind, ReceiverKind, ResultTag, Span, TypeTag};
use kestrel_registry::runtime_symbol_name;

use crate::Result;
use crate::function_lowerer::{FunctionLowerer, OBJECT_CREATE};
use crate::hir::{Constant, ValueId};
use crate::scope::{Binding, BindingKind};

/// Generic property read for receivers without a static shape.
pub(crate) const GET_PROPERTY: &str = "kestrel_object_get_property";

/// Something an operand statically refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Referent {
    /// A lowered function: the value is its identity, or its environment
    /// record when the function captures.
    Function(String),
    /// A declared class.
    Class(String),
}

/// A lowered expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    pub value: ValueId,
    pub ty: TypeTag,
    pub tag: Option<ResultTag>,
    pub refers_to: Option<Referent>,
}

impl Operand {
    pub fn new(value: ValueId, ty: TypeTag) -> Self {
        Self {
            value,
            ty,
            tag: None,
            refers_to: None,
        }
    }

    fn from_binding(value: ValueId, binding: &Binding) -> Self {
        let refers_to = match &binding.kind {
            BindingKind::Value => None,
            BindingKind::FunctionRef(name) | BindingKind::Closure(name) => {
                Some(Referent::Function(name.clone()))
            }
            BindingKind::ClassRef(name) => Some(Referent::Class(name.clone())),
        };
        Self {
            value,
            ty: binding.ty.clone(),
            tag: binding.tag,
            refers_to,
        }
    }

    /// The function a call of this operand reaches.
    pub fn function(&self) -> Option<&str> {
        match &self.refers_to {
            Some(Referent::Function(name)) => Some(name),
            _ => None,
        }
    }
}

impl<'a, 'ast> FunctionLowerer<'a, 'ast> {
    pub(crate) fn lower_expr(&mut self, expr: &'ast Expr<'ast>) -> Result<Operand> {
        match expr {
            Expr::Literal(lit) => self.lower_literal(&lit.kind, lit.span),
            Expr::Ident(ident) => self.lower_ident(*ident),
            Expr::This(_) => Ok(self.lower_this()),
            Expr::Super(span) => Err(LoweringError::UnresolvedName {
                name: "super".to_string(),
                span: *span,
            }),
            Expr::Member(member) => self.lower_member_read(member),
            Expr::Call(call) => Ok(self.lower_call(call)),
            Expr::New(new) => Ok(self.lower_new(new)),
            Expr::FunctionRef(ident) => self.lower_function_value(ident.name, ident.span),
            Expr::Object(span) => self.lower_object_literal(*span),
            Expr::Paren(paren) => self.lower_expr(paren.expr),
        }
    }

    /// Lower call arguments left to right.
    pub(crate) fn lower_args(&mut self, args: &'ast [kestrel_ast::Argument<'ast>]) -> Result<Vec<ValueId>> {
        args.iter()
            .map(|arg| self.lower_expr(arg.value).map(|operand| operand.value))
            .collect()
    }

    fn lower_literal(&mut self, lit: &LiteralKind<'ast>, span: Span) -> Result<Operand> {
        let operand = match *lit {
            LiteralKind::Number(n) => Operand::new(self.builder.constant(Constant::number(n)), TypeTag::Number),
            LiteralKind::String(s) => Operand::new(self.builder.constant(Constant::string(s)), TypeTag::String),
            LiteralKind::Bool(b) => Operand::new(self.builder.constant(Constant::Bool(b)), TypeTag::Boolean),
            LiteralKind::Null => Operand::new(self.builder.constant(Constant::Null), TypeTag::Unknown),
            LiteralKind::Undefined => Operand::new(self.builder.undefined(), TypeTag::Unknown),
            LiteralKind::Regex { pattern, flags } => return self.lower_regex(pattern, flags, span),
        };
        Ok(operand)
    }

    /// Regex literals are built by the runtime's `RegExp` constructor.
    fn lower_regex(&mut self, pattern: &str, flags: &str, span: Span) -> Result<Operand> {
        let decls = self.decls;
        let pattern = self.builder.constant(Constant::string(pattern));
        let flags = self.builder.constant(Constant::string(flags));
        let Some(entry) = decls.abi.constructor(ReceiverKind::Primitive(PrimitiveKind::Regex)) else {
            return Ok(Operand::new(pattern, TypeTag::Regex));
        };
        self.session
            .declare_external(&entry.symbol, &entry.params, entry.return_type, entry.arity.is_variadic(), span)?;
        let value = self.builder.call(entry.symbol.as_str(), vec![pattern, flags]);
        Ok(Operand::new(value, TypeTag::Regex))
    }

    fn lower_ident(&mut self, ident: Ident<'ast>) -> Result<Operand> {
        let name = ident.name;
        if let Some(binding) = self.scope.lookup(name).cloned() {
            let value = self.builder.load(binding.slot);
            return Ok(Operand::from_binding(value, &binding));
        }
        if let Some(value) = self.read_binding(name) {
            return Ok(Operand::new(value, TypeTag::Unknown));
        }

        let decls = self.decls;
        if decls.classes.contains(name) {
            let value = self.builder.constant(Constant::Class(name.to_string()));
            let mut operand = Operand::new(value, TypeTag::Unknown);
            operand.refers_to = Some(Referent::Class(name.to_string()));
            return Ok(operand);
        }
        if decls.functions.contains(name) {
            return self.lower_function_value(name, ident.span);
        }
        Err(LoweringError::UnresolvedName {
            name: name.to_string(),
            span: ident.span,
        })
    }

    fn lower_this(&mut self) -> Operand {
        let ty = self
            .current_class
            .map_or(TypeTag::Unknown, |class| TypeTag::Instance(class.to_string()));
        let value = self.this_or_sentinel();
        Operand::new(value, ty)
    }

    /// A function used as a value. Functions with captures become a closure:
    /// the environment is populated here, from the scope active now.
    pub(crate) fn lower_function_value(&mut self, name: &str, span: Span) -> Result<Operand> {
        let decls = self.decls;
        let value = match decls.closures.get(name) {
            Some(descriptor) => self.populate_env(descriptor, span)?,
            None => self.builder.constant(Constant::FunctionRef(name.to_string())),
        };
        let mut operand = Operand::new(value, TypeTag::Function);
        operand.refers_to = Some(Referent::Function(name.to_string()));
        Ok(operand)
    }

    fn lower_object_literal(&mut self, span: Span) -> Result<Operand> {
        self.session
            .declare_external(OBJECT_CREATE, &[], HirType::Ptr, false, span)?;
        let value = self.builder.call(OBJECT_CREATE, Vec::new());
        Ok(Operand::new(value, TypeTag::Object))
    }

    /// `object.property` outside of a call. Namespace members
    /// (`Math.PI`) read through their own runtime accessor.
    fn lower_member_read(&mut self, member: &'ast MemberExpr<'ast>) -> Result<Operand> {
        let property = member.property.name;
        if let Some(ident) = member.object.as_ident() {
            if let Some(ns) = Namespace::from_name(ident.name).filter(|_| !self.is_local(ident.name)) {
                let symbol = runtime_symbol_name(ns.stem(), property);
                self.session
                    .declare_external(&symbol, &[], HirType::Any, false, member.span)?;
                let value = self.builder.call(symbol, Vec::new());
                return Ok(Operand::new(value, TypeTag::Unknown));
            }
        }

        let object = self.lower_expr(member.object)?;
        self.session.declare_external(
            GET_PROPERTY,
            &[HirType::Ptr, HirType::String],
            HirType::Any,
            false,
            member.span,
        )?;
        let key = self.builder.constant(Constant::string(property));
        let value = self.builder.call(GET_PROPERTY, vec![object.value, key]);
        Ok(Operand::new(value, TypeTag::Unknown))
    }
}
