//! The typed intermediate representation produced by lowering.
//!
//! A [`HirModule`] holds one [`HirFunction`] per lowered declaration, the
//! runtime functions they reference, and the environment record types
//! synthesized for closures. Instructions are in SSA-like form: every
//! instruction that produces a value writes a fresh [`ValueId`].

mod builder;
pub mod trace;

pub use builder::FunctionBuilder;

use std::fmt;

use kestrel_core::{HirType, ResultTag, Span, TypeTag};
use kestrel_registry::{ClosureDescriptor, RuntimeSymbolTable};
use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

// ============================================================================
// Values
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub u32);

impl fmt::Debug for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// A compile-time constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    Undefined,
    Null,
    Bool(bool),
    Number(OrderedFloat<f64>),
    String(String),
    /// Machine integer: slot indices, factory states, element codes, and the
    /// zero `this` sentinel.
    Int(i64),
    /// Address of a lowered function.
    FunctionRef(String),
    /// A declared class used as a value (`const K = Dog`).
    Class(String),
}

impl Constant {
    pub fn number(value: f64) -> Self {
        Constant::Number(OrderedFloat(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Constant::String(value.into())
    }

    pub fn hir_type(&self) -> HirType {
        match self {
            Constant::Undefined | Constant::Null => HirType::Any,
            Constant::Bool(_) => HirType::Bool,
            Constant::Number(_) => HirType::F64,
            Constant::String(_) => HirType::String,
            Constant::Int(_) => HirType::I64,
            Constant::FunctionRef(_) | Constant::Class(_) => HirType::Ptr,
        }
    }

    /// Static type of an operand holding this constant.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Constant::Bool(_) => TypeTag::Boolean,
            Constant::Number(_) | Constant::Int(_) => TypeTag::Number,
            Constant::String(_) => TypeTag::String,
            Constant::FunctionRef(_) => TypeTag::Function,
            Constant::Undefined | Constant::Null | Constant::Class(_) => TypeTag::Unknown,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Undefined => f.write_str("undefined"),
            Constant::Null => f.write_str("null"),
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::Number(n) => write!(f, "{}", n),
            Constant::String(s) => write!(f, "{:?}", s),
            Constant::Int(i) => write!(f, "i64 {}", i),
            Constant::FunctionRef(name) => write!(f, "@{}", name),
            Constant::Class(name) => write!(f, "class {}", name),
        }
    }
}

// ============================================================================
// Instructions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Const { dest: ValueId, value: Constant },
    /// Formal parameter `index` of the enclosing function.
    Param { dest: ValueId, index: u32 },
    /// Stack slot for a named local.
    Alloca { dest: ValueId, name: String },
    Store { ptr: ValueId, value: ValueId },
    Load { dest: ValueId, ptr: ValueId },
    /// Stack-allocate an environment record of the named type.
    AllocEnv { dest: ValueId, record: String },
    SetField { record: ValueId, index: u32, value: ValueId },
    GetField { dest: ValueId, record: ValueId, index: u32 },
    /// Call a lowered function or runtime symbol by name.
    Call { dest: ValueId, callee: String, args: Vec<ValueId> },
    Return(Option<ValueId>),
}

impl Instruction {
    /// The value this instruction defines, if any.
    pub fn dest(&self) -> Option<ValueId> {
        match self {
            Instruction::Const { dest, .. }
            | Instruction::Param { dest, .. }
            | Instruction::Alloca { dest, .. }
            | Instruction::Load { dest, .. }
            | Instruction::AllocEnv { dest, .. }
            | Instruction::GetField { dest, .. }
            | Instruction::Call { dest, .. } => Some(*dest),
            Instruction::Store { .. } | Instruction::SetField { .. } | Instruction::Return(_) => {
                None
            }
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(self, Instruction::Return(_))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Const { dest, value } => write!(f, "{} = const {}", dest, value),
            Instruction::Param { dest, index } => write!(f, "{} = param {}", dest, index),
            Instruction::Alloca { dest, name } => write!(f, "{} = alloca {}", dest, name),
            Instruction::Store { ptr, value } => write!(f, "store {}, {}", value, ptr),
            Instruction::Load { dest, ptr } => write!(f, "{} = load {}", dest, ptr),
            Instruction::AllocEnv { dest, record } => write!(f, "{} = alloc_env {}", dest, record),
            Instruction::SetField { record, index, value } => {
                write!(f, "set_field {}.{}, {}", record, index, value)
            }
            Instruction::GetField { dest, record, index } => {
                write!(f, "{} = get_field {}.{}", dest, record, index)
            }
            Instruction::Call { dest, callee, args } => {
                write!(f, "{} = call {}(", dest, callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            Instruction::Return(Some(value)) => write!(f, "ret {}", value),
            Instruction::Return(None) => f.write_str("ret"),
        }
    }
}

// ============================================================================
// Functions and modules
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct HirFunction {
    pub name: String,
    /// Formal parameters, including an injected `this` and the trailing
    /// environment record.
    pub param_count: u32,
    /// The last formal parameter is the closure environment.
    pub has_env: bool,
    pub instructions: Vec<Instruction>,
    /// Source location of each instruction (parallel to `instructions`).
    pub spans: Vec<Span>,
    /// Handle protocol of values produced by calls.
    pub tags: FxHashMap<ValueId, ResultTag>,
}

impl HirFunction {
    pub fn tag_of(&self, value: ValueId) -> Option<ResultTag> {
        self.tags.get(&value).copied()
    }

    /// Every call instruction, in order.
    pub fn calls(&self) -> impl Iterator<Item = (&str, &[ValueId])> {
        self.instructions.iter().filter_map(|inst| match inst {
            Instruction::Call { callee, args, .. } => Some((callee.as_str(), args.as_slice())),
            _ => None,
        })
    }

    pub fn calls_to<'a>(&'a self, callee: &'a str) -> impl Iterator<Item = &'a [ValueId]> + 'a {
        self.calls()
            .filter(move |(name, _)| *name == callee)
            .map(|(_, args)| args)
    }

    /// The instruction that defines `value`.
    pub fn definition(&self, value: ValueId) -> Option<&Instruction> {
        self.instructions.iter().find(|inst| inst.dest() == Some(value))
    }

    /// The constant `value` was defined as, if it is one.
    pub fn constant(&self, value: ValueId) -> Option<&Constant> {
        match self.definition(value)? {
            Instruction::Const { value, .. } => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for HirFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fn {}({} params{}) {{", self.name, self.param_count, if self.has_env { ", env" } else { "" })?;
        for inst in &self.instructions {
            writeln!(f, "    {}", inst)?;
        }
        f.write_str("}")
    }
}

/// Field layout of a closure environment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvRecordType {
    pub name: String,
    /// One field per captured name, in capture order.
    pub fields: Vec<String>,
}

impl From<&ClosureDescriptor> for EnvRecordType {
    fn from(descriptor: &ClosureDescriptor) -> Self {
        Self {
            name: descriptor.record_name(),
            fields: descriptor.captures.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct HirModule {
    pub name: String,
    pub functions: Vec<HirFunction>,
    /// Runtime functions referenced by the module.
    pub externals: RuntimeSymbolTable,
    pub env_records: Vec<EnvRecordType>,
}

impl HirModule {
    pub fn new(name: impl Into<String>, externals: RuntimeSymbolTable) -> Self {
        Self {
            name: name.into(),
            externals,
            ..Self::default()
        }
    }

    pub fn function(&self, name: &str) -> Option<&HirFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn env_record(&self, name: &str) -> Option<&EnvRecordType> {
        self.env_records.iter().find(|r| r.name == name)
    }

    /// Declare the record type for `descriptor` unless it already exists.
    pub fn declare_env_record(&mut self, descriptor: &ClosureDescriptor) -> &EnvRecordType {
        let name = descriptor.record_name();
        let index = match self.env_records.iter().position(|r| r.name == name) {
            Some(index) => index,
            None => {
                log::trace!("declare environment record {} {:?}", name, descriptor.captures);
                self.env_records.push(EnvRecordType::from(descriptor));
                self.env_records.len() - 1
            }
        };
        &self.env_records[index]
    }
}

impl fmt::Display for HirModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "module {}", self.name)?;
        for symbol in self.externals.iter() {
            writeln!(
                f,
                "extern {}({:?}{}) -> {}",
                symbol.name,
                symbol.params,
                if symbol.variadic { ", ..." } else { "" },
                symbol.return_type
            )?;
        }
        for record in &self.env_records {
            writeln!(f, "record {} {{ {} }}", record.name, record.fields.join(", "))?;
        }
        for function in &self.functions {
            writeln!(f, "{}", function)?;
        }
        Ok(())
    }
}
