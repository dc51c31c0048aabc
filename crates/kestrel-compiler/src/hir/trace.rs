//! Straight-line HIR evaluator.
//!
//! Runs lowered functions far enough to observe what they would pass at run
//! time: environment record contents, generator slot seeding, and the
//! arguments of every runtime call. Runtime functions are not executed; each
//! call is recorded and returns a fresh opaque value.

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::{Constant, HirModule, Instruction, ValueId};

const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Int(i64),
    Function(String),
    Class(String),
    /// A stack slot created by `alloca`.
    Slot(usize),
    /// An environment record created by `alloc_env`.
    Env(usize),
    /// Result of runtime call `n`.
    Opaque(usize),
}

impl From<&Constant> for Value {
    fn from(constant: &Constant) -> Self {
        match constant {
            Constant::Undefined => Value::Undefined,
            Constant::Null => Value::Null,
            Constant::Bool(b) => Value::Bool(*b),
            Constant::Number(n) => Value::Number(n.into_inner()),
            Constant::String(s) => Value::String(s.clone()),
            Constant::Int(i) => Value::Int(*i),
            Constant::FunctionRef(name) => Value::Function(name.clone()),
            Constant::Class(name) => Value::Class(name.clone()),
        }
    }
}

/// One call to a runtime function.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalCall {
    pub symbol: String,
    pub args: Vec<Value>,
    pub result: Value,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TraceError {
    #[error("no function named '{0}'")]
    UnknownFunction(String),
    #[error("{function}: {value} used before it is defined")]
    UndefinedValue { function: String, value: ValueId },
    #[error("{function}: {value} is not a stack slot")]
    NotASlot { function: String, value: ValueId },
    #[error("{function}: {value} is not an environment record")]
    NotAnEnv { function: String, value: ValueId },
    #[error("call depth exceeds {0}")]
    TooDeep(usize),
}

pub struct Trace<'m> {
    module: &'m HirModule,
    slots: Vec<Value>,
    envs: Vec<Vec<Value>>,
    externals: Vec<ExternalCall>,
    entered: Vec<String>,
    depth: usize,
}

impl<'m> Trace<'m> {
    pub fn new(module: &'m HirModule) -> Self {
        Self {
            module,
            slots: Vec::new(),
            envs: Vec::new(),
            externals: Vec::new(),
            entered: Vec::new(),
            depth: 0,
        }
    }

    /// Lowered functions entered so far, in order.
    pub fn entered(&self) -> &[String] {
        &self.entered
    }

    pub fn external_calls(&self) -> &[ExternalCall] {
        &self.externals
    }

    pub fn calls_to<'a>(&'a self, symbol: &'a str) -> impl Iterator<Item = &'a ExternalCall> + 'a {
        self.externals.iter().filter(move |call| call.symbol == symbol)
    }

    /// Fields of the environment record `value` refers to.
    pub fn env_fields(&self, value: &Value) -> Option<&[Value]> {
        match value {
            Value::Env(index) => self.envs.get(*index).map(Vec::as_slice),
            _ => None,
        }
    }

    pub fn run(&mut self, function: &str, args: Vec<Value>) -> Result<Value, TraceError> {
        let module = self.module;
        let hir = module
            .function(function)
            .ok_or_else(|| TraceError::UnknownFunction(function.to_string()))?;
        if self.depth >= MAX_DEPTH {
            return Err(TraceError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        self.entered.push(hir.name.clone());

        let mut frame: FxHashMap<ValueId, Value> = FxHashMap::default();
        let get = |frame: &FxHashMap<ValueId, Value>, value: ValueId| {
            frame
                .get(&value)
                .cloned()
                .ok_or_else(|| TraceError::UndefinedValue {
                    function: hir.name.clone(),
                    value,
                })
        };

        let mut result = Value::Undefined;
        for inst in &hir.instructions {
            match inst {
                Instruction::Const { dest, value } => {
                    frame.insert(*dest, Value::from(value));
                }
                Instruction::Param { dest, index } => {
                    let arg = args.get(*index as usize).cloned().unwrap_or(Value::Undefined);
                    frame.insert(*dest, arg);
                }
                Instruction::Alloca { dest, .. } => {
                    self.slots.push(Value::Undefined);
                    frame.insert(*dest, Value::Slot(self.slots.len() - 1));
                }
                Instruction::Store { ptr, value } => {
                    let slot = self.slot_index(&get(&frame, *ptr)?, &hir.name, *ptr)?;
                    self.slots[slot] = get(&frame, *value)?;
                }
                Instruction::Load { dest, ptr } => {
                    let slot = self.slot_index(&get(&frame, *ptr)?, &hir.name, *ptr)?;
                    frame.insert(*dest, self.slots[slot].clone());
                }
                Instruction::AllocEnv { dest, record } => {
                    let fields = module.env_record(record).map_or(0, |r| r.fields.len());
                    self.envs.push(vec![Value::Undefined; fields]);
                    frame.insert(*dest, Value::Env(self.envs.len() - 1));
                }
                Instruction::SetField { record, index, value } => {
                    let env = self.env_index(&get(&frame, *record)?, &hir.name, *record)?;
                    let value = get(&frame, *value)?;
                    let fields = &mut self.envs[env];
                    let index = *index as usize;
                    if fields.len() <= index {
                        fields.resize(index + 1, Value::Undefined);
                    }
                    fields[index] = value;
                }
                Instruction::GetField { dest, record, index } => {
                    let env = self.env_index(&get(&frame, *record)?, &hir.name, *record)?;
                    let value = self.envs[env]
                        .get(*index as usize)
                        .cloned()
                        .unwrap_or(Value::Undefined);
                    frame.insert(*dest, value);
                }
                Instruction::Call { dest, callee, args } => {
                    let args = args
                        .iter()
                        .map(|arg| get(&frame, *arg))
                        .collect::<Result<Vec<_>, _>>()?;
                    let value = if module.function(callee).is_some() {
                        self.run(callee, args)?
                    } else {
                        let result = Value::Opaque(self.externals.len());
                        self.externals.push(ExternalCall {
                            symbol: callee.clone(),
                            args,
                            result: result.clone(),
                        });
                        result
                    };
                    frame.insert(*dest, value);
                }
                Instruction::Return(value) => {
                    if let Some(value) = value {
                        result = get(&frame, *value)?;
                    }
                    break;
                }
            }
        }

        self.depth -= 1;
        Ok(result)
    }

    fn slot_index(&self, value: &Value, function: &str, id: ValueId) -> Result<usize, TraceError> {
        match value {
            Value::Slot(index) => Ok(*index),
            _ => Err(TraceError::NotASlot {
                function: function.to_string(),
                value: id,
            }),
        }
    }

    fn env_index(&self, value: &Value, function: &str, id: ValueId) -> Result<usize, TraceError> {
        match value {
            Value::Env(index) => Ok(*index),
            _ => Err(TraceError::NotAnEnv {
                function: function.to_string(),
                value: id,
            }),
        }
    }
}
