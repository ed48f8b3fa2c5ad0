//! Virtual machine for executing compiled snippets.

use snip_bytecode::{Function, Instruction, Module};

use super::error::RuntimeError;
use super::ops;
use super::value::Value;

/// Runtime limits for snippet execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuelLimits {
    /// Maximum total steps (default: 10,000,000).
    pub(crate) exec_fuel: u64,
    /// Maximum nested lambda invocations (default: 256).
    pub(crate) recursion_limit: u32,
    /// Maximum elements in one collection or characters in one string
    /// (default: 1,000,000).
    pub(crate) max_collection: usize,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: 10_000_000,
            recursion_limit: 256,
            max_collection: 1_000_000,
        }
    }
}

impl FuelLimits {
    /// Create new fuel limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u64) -> Self {
        self.exec_fuel = fuel;
        self
    }

    /// Set the recursion limit.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Set the collection size limit.
    pub fn max_collection(mut self, limit: usize) -> Self {
        self.max_collection = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> u64 {
        self.exec_fuel
    }
    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
    pub fn get_max_collection(&self) -> usize {
        self.max_collection
    }
}

/// Operand stack of one function activation.
#[derive(Default)]
struct Stack(Vec<Value>);

impl Stack {
    fn push(&mut self, value: Value) {
        self.0.push(value);
    }

    fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.0
            .pop()
            .ok_or(RuntimeError::InvalidProgram("operand stack underflow"))
    }

    fn peek(&self) -> Result<&Value, RuntimeError> {
        self.0
            .last()
            .ok_or(RuntimeError::InvalidProgram("operand stack underflow"))
    }

    /// Pops `n` values, returned in push order.
    fn pop_n(&mut self, n: usize) -> Result<Vec<Value>, RuntimeError> {
        let Some(start) = self.0.len().checked_sub(n) else {
            return Err(RuntimeError::InvalidProgram("operand stack underflow"));
        };
        Ok(self.0.split_off(start))
    }
}

/// Virtual machine state for one snippet execution.
///
/// All functions of a module share one frame of locals; lambda parameters
/// are slots in it, saved and restored around each invocation.
pub struct VM<'m> {
    pub(crate) module: &'m Module,
    pub(crate) locals: Vec<Value>,

    // Fuel tracking
    pub(crate) exec_fuel: u64,
    pub(crate) recursion_depth: u32,
    pub(crate) limits: FuelLimits,
}

impl<'m> VM<'m> {
    pub fn new(module: &'m Module, limits: FuelLimits) -> Self {
        Self {
            module,
            locals: vec![Value::Null; usize::from(module.locals)],
            exec_fuel: limits.get_exec_fuel(),
            recursion_depth: 0,
            limits,
        }
    }

    /// Steps executed so far.
    pub fn steps(&self) -> u64 {
        self.limits.exec_fuel - self.exec_fuel
    }

    /// Runs a zero-parameter function to completion.
    pub fn run(&mut self, entry: u16) -> Result<Value, RuntimeError> {
        let function = self.function(entry)?;
        if !function.params.is_empty() {
            return Err(RuntimeError::LambdaArity(0));
        }
        self.execute(function)
    }

    /// Invokes a lambda value.
    pub(crate) fn invoke(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        match callee {
            Value::Lambda(index) => self.call(*index, args),
            Value::Null => Err(RuntimeError::NullReference),
            other => Err(RuntimeError::NotCallable(other.type_name().to_owned())),
        }
    }

    /// Parameter count of a lambda value, if it is one.
    pub(crate) fn lambda_arity(&self, callee: &Value) -> Option<usize> {
        match callee {
            Value::Lambda(index) => self
                .module
                .functions
                .get(usize::from(*index))
                .map(|f| f.params.len()),
            _ => None,
        }
    }

    fn call(&mut self, index: u16, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let function = self.function(index)?;
        if function.params.len() != args.len() {
            return Err(RuntimeError::LambdaArity(args.len()));
        }
        if self.recursion_depth >= self.limits.recursion_limit {
            return Err(RuntimeError::RecursionLimitExceeded);
        }

        let mut saved = Vec::with_capacity(args.len());
        for (slot, arg) in function.params.iter().zip(args) {
            saved.push(std::mem::replace(self.local_mut(*slot)?, arg));
        }

        self.recursion_depth += 1;
        let result = self.execute(function);
        self.recursion_depth -= 1;

        for (slot, value) in function.params.iter().zip(saved) {
            *self.local_mut(*slot)? = value;
        }
        result
    }

    fn function(&self, index: u16) -> Result<&'m Function, RuntimeError> {
        let module: &'m Module = self.module;
        module
            .functions
            .get(usize::from(index))
            .ok_or(RuntimeError::InvalidProgram("function index out of range"))
    }

    fn local(&self, slot: u16) -> Result<&Value, RuntimeError> {
        self.locals
            .get(usize::from(slot))
            .ok_or(RuntimeError::InvalidProgram("local slot out of range"))
    }

    fn local_mut(&mut self, slot: u16) -> Result<&mut Value, RuntimeError> {
        self.locals
            .get_mut(usize::from(slot))
            .ok_or(RuntimeError::InvalidProgram("local slot out of range"))
    }

    /// Charges `steps` units of fuel.
    pub(crate) fn consume(&mut self, steps: usize) -> Result<(), RuntimeError> {
        let steps = u64::try_from(steps).unwrap_or(u64::MAX);
        match self.exec_fuel.checked_sub(steps) {
            Some(left) => {
                self.exec_fuel = left;
                Ok(())
            }
            None => {
                self.exec_fuel = 0;
                Err(RuntimeError::ExecFuelExhausted(self.limits.exec_fuel))
            }
        }
    }

    /// Fails when a collection would grow beyond the configured limit.
    pub(crate) fn check_size(&self, len: usize) -> Result<(), RuntimeError> {
        if len > self.limits.max_collection {
            return Err(RuntimeError::CollectionLimitExceeded);
        }
        Ok(())
    }

    pub(crate) fn check_string(&self, value: &Value) -> Result<(), RuntimeError> {
        match value {
            Value::Str(s) => self.check_size(s.len()),
            _ => Ok(()),
        }
    }

    fn execute(&mut self, function: &'m Function) -> Result<Value, RuntimeError> {
        let module: &'m Module = self.module;
        let mut stack = Stack::default();
        let mut pc = 0usize;

        loop {
            // Fuel check
            self.consume(1)?;

            let Some(instr) = function.code.get(pc) else {
                return Err(RuntimeError::InvalidProgram("control reached the end of a function"));
            };
            pc += 1;

            match instr {
                Instruction::Const(index) => {
                    let constant = module
                        .constants
                        .get(usize::from(*index))
                        .ok_or(RuntimeError::InvalidProgram("constant index out of range"))?;
                    stack.push(Value::from_constant(constant));
                }
                Instruction::LoadLocal(slot) => {
                    let value = self.local(*slot)?.clone();
                    stack.push(value);
                }
                Instruction::StoreLocal(slot) => {
                    let value = stack.pop()?;
                    *self.local_mut(*slot)? = value;
                }
                Instruction::Pop => {
                    stack.pop()?;
                }
                Instruction::Dup => {
                    let value = stack.peek()?.clone();
                    stack.push(value);
                }
                Instruction::Dup2 => {
                    let top = stack.pop()?;
                    let below = stack.pop()?;
                    stack.push(below.clone());
                    stack.push(top.clone());
                    stack.push(below);
                    stack.push(top);
                }
                Instruction::Neg => {
                    let value = stack.pop()?;
                    stack.push(ops::negate(&value)?);
                }
                Instruction::Pos => {
                    let value = stack.pop()?;
                    stack.push(ops::plus(&value)?);
                }
                Instruction::Not => {
                    let value = stack.pop()?;
                    stack.push(ops::not(&value)?);
                }
                Instruction::Binary(op) => {
                    let rhs = stack.pop()?;
                    let lhs = stack.pop()?;
                    let result = ops::binary(*op, &lhs, &rhs)?;
                    self.check_string(&result)?;
                    stack.push(result);
                }
                Instruction::Jump(target) => pc = *target as usize,
                Instruction::JumpIfFalse(target) => {
                    if !stack.pop()?.as_bool()? {
                        pc = *target as usize;
                    }
                }
                Instruction::JumpIfTrue(target) => {
                    if stack.pop()?.as_bool()? {
                        pc = *target as usize;
                    }
                }
                Instruction::JumpIfFalseOrPop(target) => {
                    if stack.peek()?.as_bool()? {
                        stack.pop()?;
                    } else {
                        pc = *target as usize;
                    }
                }
                Instruction::JumpIfTrueOrPop(target) => {
                    if stack.peek()?.as_bool()? {
                        pc = *target as usize;
                    } else {
                        stack.pop()?;
                    }
                }
                Instruction::JumpIfNotNullOrPop(target) => {
                    if stack.peek()?.is_null() {
                        stack.pop()?;
                    } else {
                        pc = *target as usize;
                    }
                }
                Instruction::CallStatic { builtin, argc } => {
                    let args = stack.pop_n(usize::from(*argc))?;
                    let result = self.call_builtin(*builtin, args)?;
                    stack.push(result);
                }
                Instruction::New { ctor, argc } => {
                    let args = stack.pop_n(usize::from(*argc))?;
                    let result = self.construct(*ctor, args)?;
                    stack.push(result);
                }
                Instruction::CallMethod { name, argc } => {
                    let args = stack.pop_n(usize::from(*argc))?;
                    let receiver = stack.pop()?;
                    let name = module
                        .names
                        .get(usize::from(*name))
                        .ok_or(RuntimeError::InvalidProgram("name index out of range"))?;
                    let result = self.call_method(receiver, name, args)?;
                    stack.push(result);
                }
                Instruction::CallValue { argc } => {
                    let args = stack.pop_n(usize::from(*argc))?;
                    let callee = stack.pop()?;
                    let result = self.invoke(&callee, args)?;
                    stack.push(result);
                }
                Instruction::GetMember(name) => {
                    let receiver = stack.pop()?;
                    let name = module
                        .names
                        .get(usize::from(*name))
                        .ok_or(RuntimeError::InvalidProgram("name index out of range"))?;
                    stack.push(self.get_member(&receiver, name)?);
                }
                Instruction::GetIndex => {
                    let index = stack.pop()?;
                    let target = stack.pop()?;
                    stack.push(self.get_index(&target, &index)?);
                }
                Instruction::SetIndex => {
                    let value = stack.pop()?;
                    let index = stack.pop()?;
                    let target = stack.pop()?;
                    self.set_index(&target, index, value.clone())?;
                    stack.push(value);
                }
                Instruction::MakeList(count) => {
                    let items = stack.pop_n(usize::from(*count))?;
                    self.check_size(items.len())?;
                    stack.push(Value::list(items));
                }
                Instruction::MakeLambda(index) => {
                    self.function(*index)?;
                    stack.push(Value::Lambda(*index));
                }
                Instruction::Cast(kind) => {
                    let value = stack.pop()?;
                    stack.push(ops::cast(*kind, value)?);
                }
                Instruction::Throw => {
                    return Err(match stack.pop()? {
                        Value::Exception(exception) => RuntimeError::Thrown((*exception).clone()),
                        Value::Null => RuntimeError::NullReference,
                        _ => RuntimeError::NotAnException,
                    });
                }
                Instruction::Return => return stack.pop(),
                Instruction::IterStart(slot) => {
                    let iterable = stack.pop()?;
                    let items = self.sequence(&iterable)?;
                    *self.local_mut(*slot)? = Value::iterator(items);
                }
                Instruction::IterNext { slot, exit } => {
                    let next = match self.local(*slot)? {
                        Value::Iterator(iter) => iter.borrow_mut().next(),
                        _ => return Err(RuntimeError::InvalidProgram("iterator slot is empty")),
                    };
                    match next {
                        Some(item) => stack.push(item),
                        None => pc = *exit as usize,
                    }
                }
            }
        }
    }
}
