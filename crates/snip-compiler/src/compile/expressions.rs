//! Expression lowering. Each expression leaves exactly one value.

use std::ops::RangeInclusive;

use rowan::TextRange;
use snip_bytecode::{BinaryOp, Builtin, CastKind, Constant, Constructor, Instruction};

use super::Compiler;
use super::literals::{self, LiteralError};
use super::scope::LocalKind;
use super::types::{default_value, split_qualified};
use crate::diagnostics::DiagnosticKind;
use crate::parser::SyntaxToken;
use crate::parser::ast::{
    AssignExpr, BinaryExpr, CallExpr, CastExpr, ConditionalExpr, Expr, InitItem, Initializer,
    LambdaExpr, Literal, MemberExpr, NameRef, NewExpr, PostfixExpr, PrefixExpr, TypeRef,
};
use crate::parser::cst::SyntaxKind;

/// `-9223372036854775808` is only valid as a negated literal.
const I64_MIN_MAGNITUDE: u64 = 1 << 63;

/// Literal, possibly negated or parenthesized.
pub(super) fn is_literal(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(_) => true,
        Expr::Paren(paren) => paren.inner().is_some_and(|inner| is_literal(&inner)),
        Expr::Prefix(prefix) => {
            prefix.op().is_some_and(|op| op.kind() == SyntaxKind::Minus)
                && prefix.operand().is_some_and(|operand| is_literal(&operand))
        }
        _ => false,
    }
}

fn is_i64_min_magnitude(operand: Option<Expr>) -> bool {
    let Some(Expr::Literal(literal)) = operand else {
        return false;
    };
    literal.token().is_some_and(|token| {
        token.kind() == SyntaxKind::IntLiteral
            && literals::parse_int(token.text()) == Some(I64_MIN_MAGNITUDE)
    })
}

fn accepts(arity: RangeInclusive<u8>, count: usize) -> bool {
    u8::try_from(count).is_ok_and(|n| arity.contains(&n))
}

fn compound_op(kind: SyntaxKind) -> Option<BinaryOp> {
    Some(match kind {
        SyntaxKind::PlusEq => BinaryOp::Add,
        SyntaxKind::MinusEq => BinaryOp::Sub,
        SyntaxKind::StarEq => BinaryOp::Mul,
        SyntaxKind::SlashEq => BinaryOp::Div,
        SyntaxKind::PercentEq => BinaryOp::Rem,
        _ => return None,
    })
}

fn decode_literal(token: &SyntaxToken) -> Result<Constant, (DiagnosticKind, String)> {
    let text = token.text();
    match token.kind() {
        SyntaxKind::IntLiteral => literals::parse_int(text)
            .and_then(|value| i64::try_from(value).ok())
            .map(Constant::Int)
            .ok_or((
                DiagnosticKind::InvalidNumber,
                "integral constant is too large".to_string(),
            )),
        SyntaxKind::RealLiteral => literals::parse_real(text)
            .filter(|value| value.is_finite())
            .map(Constant::Double)
            .ok_or((
                DiagnosticKind::InvalidNumber,
                "floating-point constant is outside the range of type 'double'".to_string(),
            )),
        SyntaxKind::StringLiteral => literals::unescape_string(text)
            .map(Constant::Str)
            .map_err(literal_error),
        SyntaxKind::VerbatimString => Ok(Constant::Str(literals::unescape_verbatim(text))),
        SyntaxKind::CharLiteral => literals::unescape_char(text)
            .map(Constant::Char)
            .map_err(literal_error),
        SyntaxKind::KwTrue => Ok(Constant::Bool(true)),
        SyntaxKind::KwFalse => Ok(Constant::Bool(false)),
        _ => Ok(Constant::Null),
    }
}

fn literal_error(err: LiteralError) -> (DiagnosticKind, String) {
    match err {
        LiteralError::InvalidEscape(sequence) => {
            (DiagnosticKind::InvalidEscape, format!("`{sequence}`"))
        }
        other => (DiagnosticKind::InvalidCharLiteral, other.to_string()),
    }
}

impl Compiler<'_> {
    pub(super) fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(literal) => self.literal(literal),
            Expr::Name(name) => self.name_value(name),
            Expr::Paren(paren) => self.expr_opt(paren.inner()),
            Expr::Assign(assign) => self.assign(assign),
            Expr::Conditional(cond) => self.conditional(cond),
            Expr::Binary(binary) => self.binary(binary),
            Expr::Prefix(prefix) => self.prefix(prefix),
            Expr::Postfix(postfix) => self.postfix(postfix),
            Expr::Cast(cast) => self.cast(cast),
            Expr::Call(call) => self.call(call),
            Expr::Member(member) => self.member(member),
            Expr::Index(index) => {
                self.expr_opt(index.target());
                self.expr_opt(index.index());
                self.emit(Instruction::GetIndex);
            }
            Expr::Lambda(lambda) => self.lambda(lambda),
            Expr::New(new) => self.new_object(new),
            Expr::ArrayNew(array) => self.array_literal(array.initializer()),
        }
    }

    /// Missing operands only occur next to syntax errors; push a placeholder.
    pub(super) fn expr_opt(&mut self, expr: Option<Expr>) {
        match expr {
            Some(expr) => self.expr(&expr),
            None => self.push_null(),
        }
    }

    fn literal(&mut self, literal: &Literal) {
        let Some(token) = literal.token() else {
            return self.push_null();
        };
        match decode_literal(&token) {
            Ok(constant) => self.push_constant(constant),
            Err((kind, detail)) => {
                self.report(kind, token.text_range(), detail);
                self.push_null();
            }
        }
    }

    fn name_value(&mut self, name: &NameRef) {
        match self.lookup(&name.text()) {
            Some(local) => {
                self.mark_read(local);
                let slot = self.slot(local);
                self.emit(Instruction::LoadLocal(slot));
            }
            None => {
                self.unresolved_name(name);
                self.push_null();
            }
        }
    }

    /// A name that is not a local: either a type used as a value, or unknown.
    fn unresolved_name(&mut self, name: &NameRef) {
        let text = name.text();
        let owner_visible = Builtin::canonical_owner(&text).is_some()
            && Builtin::owner_namespace(&text).is_none_or(|ns| self.imports.contains(ns));
        let ctor_visible =
            Constructor::lookup(&text).is_some_and(|ctor| self.imports.contains(ctor.namespace()));
        let kind = if name.is_type_keyword() || owner_visible || ctor_visible {
            DiagnosticKind::TypeUsedAsValue
        } else {
            DiagnosticKind::UndefinedName
        };
        self.report(kind, name.text_range(), text);
    }

    /// `Math` or `System.Math` in `Math.Abs(..)`, when it names a visible builtin owner.
    fn static_owner(&self, expr: &Expr) -> Option<String> {
        let segments = self.static_segments(expr)?;
        let (owner, namespace) = segments.split_last()?;
        Builtin::canonical_owner(owner)?;
        let home = Builtin::owner_namespace(owner);
        let visible = if namespace.is_empty() {
            home.is_none_or(|ns| self.imports.contains(ns))
        } else {
            home.is_some_and(|ns| ns.path() == namespace.join("."))
        };
        visible.then(|| owner.clone())
    }

    /// Dotted name segments, unless the chain starts at a local.
    fn static_segments(&self, expr: &Expr) -> Option<Vec<String>> {
        match expr {
            Expr::Name(name) => {
                let text = name.text();
                self.lookup(&text).is_none().then(|| vec![text])
            }
            Expr::Member(member) => {
                let mut segments = self.static_segments(&member.target()?)?;
                segments.push(member.member()?.text().to_string());
                Some(segments)
            }
            _ => None,
        }
    }

    fn conditional(&mut self, cond: &ConditionalExpr) {
        self.expr_opt(cond.condition());
        let to_else = self.emit(Instruction::JumpIfFalse(0));
        self.expr_opt(cond.then_value());
        let to_end = self.emit(Instruction::Jump(0));
        self.patch_here(to_else);
        self.expr_opt(cond.else_value());
        self.patch_here(to_end);
    }

    fn binary(&mut self, binary: &BinaryExpr) {
        let Some(op) = binary.op() else {
            return self.push_null();
        };

        let short_circuit = match op.kind() {
            SyntaxKind::AmpAmp => Some(Instruction::JumpIfFalseOrPop(0)),
            SyntaxKind::PipePipe => Some(Instruction::JumpIfTrueOrPop(0)),
            SyntaxKind::QuestionQuestion => Some(Instruction::JumpIfNotNullOrPop(0)),
            _ => None,
        };

        self.expr_opt(binary.lhs());
        if let Some(jump) = short_circuit {
            let to_end = self.emit(jump);
            self.expr_opt(binary.rhs());
            self.patch_here(to_end);
            return;
        }

        self.expr_opt(binary.rhs());
        match BinaryOp::from_symbol(op.text()) {
            Some(op) => {
                self.emit(Instruction::Binary(op));
            }
            None => {
                self.report(
                    DiagnosticKind::Unsupported,
                    op.text_range(),
                    format!("operator `{}`", op.text()),
                );
                self.emit(Instruction::Pop);
            }
        }
    }

    fn prefix(&mut self, prefix: &PrefixExpr) {
        let Some(op) = prefix.op() else {
            return self.push_null();
        };
        match op.kind() {
            SyntaxKind::Bang => {
                self.expr_opt(prefix.operand());
                self.emit(Instruction::Not);
            }
            SyntaxKind::Minus => {
                if is_i64_min_magnitude(prefix.operand()) {
                    return self.push_constant(Constant::Int(i64::MIN));
                }
                self.expr_opt(prefix.operand());
                self.emit(Instruction::Neg);
            }
            SyntaxKind::Plus => {
                self.expr_opt(prefix.operand());
                self.emit(Instruction::Pos);
            }
            SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => {
                let op = if op.kind() == SyntaxKind::PlusPlus {
                    BinaryOp::Add
                } else {
                    BinaryOp::Sub
                };
                self.increment(prefix.operand(), op, true, prefix.text_range());
            }
            _ => self.push_null(),
        }
    }

    fn postfix(&mut self, postfix: &PostfixExpr) {
        let op = match postfix.op().map(|op| op.kind()) {
            Some(SyntaxKind::PlusPlus) => BinaryOp::Add,
            Some(SyntaxKind::MinusMinus) => BinaryOp::Sub,
            _ => return self.push_null(),
        };
        self.increment(postfix.operand(), op, false, postfix.text_range());
    }

    /// `++x` leaves the new value, `x++` the old one.
    fn increment(&mut self, target: Option<Expr>, op: BinaryOp, prefix: bool, range: TextRange) {
        let one = self.constant(Constant::Int(1));
        match target.map(Expr::unparenthesized) {
            Some(Expr::Name(name)) => {
                let Some(local) = self.lookup(&name.text()) else {
                    self.unresolved_name(&name);
                    return self.push_null();
                };
                self.mark_read(local);
                self.mark_assigned(local, false);
                let slot = self.slot(local);
                self.emit(Instruction::LoadLocal(slot));
                if !prefix {
                    self.emit(Instruction::Dup);
                }
                self.emit(Instruction::Const(one));
                self.emit(Instruction::Binary(op));
                if prefix {
                    self.emit(Instruction::Dup);
                }
                self.emit(Instruction::StoreLocal(slot));
            }
            Some(Expr::Index(index)) => {
                self.expr_opt(index.target());
                self.expr_opt(index.index());
                self.emit(Instruction::Dup2);
                self.emit(Instruction::GetIndex);
                if prefix {
                    self.emit(Instruction::Const(one));
                    self.emit(Instruction::Binary(op));
                    self.emit(Instruction::SetIndex);
                    return;
                }
                let old = self.hidden_slot();
                self.emit(Instruction::Dup);
                self.emit(Instruction::StoreLocal(old));
                self.emit(Instruction::Const(one));
                self.emit(Instruction::Binary(op));
                self.emit(Instruction::SetIndex);
                self.emit(Instruction::Pop);
                self.emit(Instruction::LoadLocal(old));
            }
            _ => {
                self.diagnostics
                    .report(DiagnosticKind::InvalidIncrementTarget, range)
                    .emit();
                self.push_null();
            }
        }
    }

    /// Leaves the assigned value.
    fn assign(&mut self, assign: &AssignExpr) {
        let compound = assign.op().and_then(|op| compound_op(op.kind()));
        let value = assign.value();

        match assign.target().map(Expr::unparenthesized) {
            Some(Expr::Name(name)) => {
                let Some(local) = self.lookup(&name.text()) else {
                    self.unresolved_name(&name);
                    return self.expr_opt(value);
                };
                let slot = self.slot(local);
                if let Some(op) = compound {
                    self.mark_read(local);
                    self.emit(Instruction::LoadLocal(slot));
                    self.expr_opt(value.clone());
                    self.emit(Instruction::Binary(op));
                } else {
                    self.expr_opt(value.clone());
                }
                let constant = compound.is_none() && value.as_ref().is_some_and(is_literal);
                self.mark_assigned(local, constant);
                self.emit(Instruction::Dup);
                self.emit(Instruction::StoreLocal(slot));
            }
            Some(Expr::Index(index)) => {
                self.expr_opt(index.target());
                self.expr_opt(index.index());
                if let Some(op) = compound {
                    self.emit(Instruction::Dup2);
                    self.emit(Instruction::GetIndex);
                    self.expr_opt(value);
                    self.emit(Instruction::Binary(op));
                } else {
                    self.expr_opt(value);
                }
                self.emit(Instruction::SetIndex);
            }
            target => {
                let range = target.map_or_else(|| assign.text_range(), |t| t.text_range());
                self.diagnostics
                    .report(DiagnosticKind::InvalidAssignmentTarget, range)
                    .emit();
                self.expr_opt(value);
            }
        }
    }

    fn cast(&mut self, cast: &CastExpr) {
        let kind = cast
            .ty()
            .and_then(|ty| ty.keyword())
            .and_then(|keyword| CastKind::from_keyword(keyword.text()));
        self.expr_opt(cast.operand());
        match kind {
            Some(kind) => {
                self.emit(Instruction::Cast(kind));
            }
            None => self.report(
                DiagnosticKind::Unsupported,
                cast.text_range(),
                "a cast to this type",
            ),
        }
    }

    fn call(&mut self, call: &CallExpr) {
        let args = call.args();
        match call.callee() {
            Some(Expr::Member(member)) => self.method_call(&member, &args, call.text_range()),
            Some(Expr::Name(name)) if self.lookup(&name.text()).is_none() => {
                self.unresolved_name(&name);
                self.discard(&args);
                self.push_null();
            }
            Some(callee) => {
                self.expr(&callee);
                let argc = self.args(&args, call.text_range());
                self.emit(Instruction::CallValue { argc });
            }
            None => self.push_null(),
        }
    }

    fn method_call(&mut self, member: &MemberExpr, args: &[Expr], range: TextRange) {
        let (Some(target), Some(name)) = (member.target(), member.member()) else {
            self.discard(args);
            return self.push_null();
        };

        if let Some(owner) = self.static_owner(&target) {
            return self.static_call(&owner, &name, args, range);
        }

        self.expr(&target);
        let argc = self.args(args, range);
        let name = self.name(name.text());
        self.emit(Instruction::CallMethod { name, argc });
    }

    fn static_call(&mut self, owner: &str, member: &SyntaxToken, args: &[Expr], range: TextRange) {
        let name = member.text();
        let builtin = match Builtin::lookup(owner, name) {
            None => {
                self.report(
                    DiagnosticKind::UnknownMember,
                    member.text_range(),
                    format!("'{owner}' does not contain a definition for '{name}'"),
                );
                None
            }
            Some(builtin) if builtin.is_property() => {
                self.report(
                    DiagnosticKind::UnknownMember,
                    member.text_range(),
                    format!("non-invocable member '{owner}.{name}' cannot be used like a method"),
                );
                None
            }
            Some(builtin) if !accepts(builtin.arity(), args.len()) => {
                self.report(
                    DiagnosticKind::WrongArgumentCount,
                    member.text_range(),
                    format!("no overload for method '{name}' takes {} arguments", args.len()),
                );
                None
            }
            Some(builtin) => Some(builtin),
        };

        match builtin {
            Some(builtin) => {
                let argc = self.args(args, range);
                self.emit(Instruction::CallStatic { builtin, argc });
            }
            None => {
                self.discard(args);
                self.push_null();
            }
        }
    }

    fn member(&mut self, member: &MemberExpr) {
        let (Some(target), Some(name)) = (member.target(), member.member()) else {
            return self.push_null();
        };

        if let Some(owner) = self.static_owner(&target) {
            return self.static_property(&owner, &name);
        }

        self.expr(&target);
        let index = self.name(name.text());
        self.emit(Instruction::GetMember(index));
    }

    fn static_property(&mut self, owner: &str, member: &SyntaxToken) {
        let name = member.text();
        match Builtin::lookup(owner, name) {
            Some(builtin) if builtin.is_property() => {
                self.emit(Instruction::CallStatic { builtin, argc: 0 });
                return;
            }
            Some(_) => self.report(
                DiagnosticKind::Unsupported,
                member.text_range(),
                format!("using the method group '{owner}.{name}' as a value"),
            ),
            None => self.report(
                DiagnosticKind::UnknownMember,
                member.text_range(),
                format!("'{owner}' does not contain a definition for '{name}'"),
            ),
        }
        self.push_null();
    }

    /// Pushes the arguments and returns their count.
    fn args(&mut self, args: &[Expr], range: TextRange) -> u8 {
        for arg in args {
            self.expr(arg);
        }
        match u8::try_from(args.len()) {
            Ok(argc) => argc,
            Err(_) => {
                self.report(DiagnosticKind::Unsupported, range, "more than 255 arguments");
                u8::MAX
            }
        }
    }

    /// Lowers arguments of a call that could not be resolved, for their diagnostics.
    fn discard(&mut self, args: &[Expr]) {
        for arg in args {
            self.expr(arg);
            self.emit(Instruction::Pop);
        }
    }

    /// Lambdas become separate functions; parameters get slots in the shared frame.
    fn lambda(&mut self, lambda: &LambdaExpr) {
        let index = self.functions.len();
        let function = self.index(index, lambda.text_range(), "more than 65535 lambdas");

        self.push_scope();
        let params = lambda
            .params()
            .iter()
            .map(|param| {
                let local = self.declare(param, LocalKind::Parameter);
                self.slot(local)
            })
            .collect();
        self.functions
            .push(super::FunctionBuilder::new("<lambda>", params));

        let outer = std::mem::replace(&mut self.current, index);
        let outer_loops = std::mem::take(&mut self.loops);
        self.expr_opt(lambda.body());
        self.emit(Instruction::Return);
        self.loops = outer_loops;
        self.current = outer;
        self.pop_scope();

        self.emit(Instruction::MakeLambda(function));
    }

    fn new_object(&mut self, new: &NewExpr) {
        let Some(ty) = new.ty() else {
            return self.push_null();
        };

        if let Some(size) = new.array_size() {
            if new.initializer().is_some() {
                return self.array_literal(new.initializer());
            }
            self.expr(&size);
            let default = default_value(Some(&ty));
            self.push_constant(default);
            self.emit(Instruction::New {
                ctor: Constructor::Array,
                argc: 2,
            });
            return;
        }

        if ty.is_array() {
            if new.initializer().is_none() {
                self.report(
                    DiagnosticKind::ExpectedToken,
                    new.text_range(),
                    "array size or array initializer",
                );
                return self.push_null();
            }
            return self.array_literal(new.initializer());
        }

        let args: Vec<Expr> = new.args().map(|list| list.args().collect()).unwrap_or_default();
        let Some(ctor) = self.resolve_constructor(&ty) else {
            self.discard(&args);
            return self.push_null();
        };
        if !accepts(ctor.arity(), args.len()) {
            self.report(
                DiagnosticKind::WrongArgumentCount,
                ty.text_range(),
                format!(
                    "'{}' does not contain a constructor that takes {} arguments",
                    ctor.type_name(),
                    args.len()
                ),
            );
            self.discard(&args);
            return self.push_null();
        }

        let argc = self.args(&args, new.text_range());
        self.emit(Instruction::New { ctor, argc });

        if let Some(init) = new.initializer() {
            if ctor.is_exception() {
                self.report(
                    DiagnosticKind::Unsupported,
                    init.text_range(),
                    "an object initializer",
                );
                return;
            }
            self.collection_initializer(&init);
        }
    }

    fn resolve_constructor(&mut self, ty: &TypeRef) -> Option<Constructor> {
        if ty.keyword().is_some() {
            self.report(
                DiagnosticKind::Unsupported,
                ty.text_range(),
                "constructing a built-in type with 'new'",
            );
            return None;
        }

        let name = ty.name();
        let (namespace, simple) = split_qualified(&name);
        let ctor = Constructor::lookup(simple).filter(|ctor| match namespace {
            Some(path) => path == ctor.namespace().path(),
            None => self.imports.contains(ctor.namespace()),
        });
        let Some(ctor) = ctor else {
            self.report(DiagnosticKind::UnknownType, ty.text_range(), simple);
            return None;
        };

        let type_args = ty.type_args();
        if type_args.len() != ctor.generic_arity() {
            self.report_generic_arity(ty, simple, ctor.generic_arity());
            return None;
        }
        for arg in &type_args {
            self.check_type(arg);
        }
        Some(ctor)
    }

    /// `{ a, {k, v} }` after `new T()`: one `Add` call per element, the
    /// collection stays on the stack.
    fn collection_initializer(&mut self, init: &Initializer) {
        let add = self.name("Add");
        for item in init.items() {
            self.emit(Instruction::Dup);
            let argc = match item {
                InitItem::Single(expr) => {
                    self.expr(&expr);
                    1
                }
                InitItem::Group(group) => {
                    let values: Vec<Expr> = group.values().collect();
                    self.args(&values, group.text_range())
                }
            };
            self.emit(Instruction::CallMethod { name: add, argc });
            self.emit(Instruction::Pop);
        }
    }

    /// `new[] { .. }` and `new T[] { .. }` build a list.
    fn array_literal(&mut self, init: Option<Initializer>) {
        let Some(init) = init else {
            return self.push_null();
        };
        let mut count = 0usize;
        for item in init.items() {
            match item {
                InitItem::Single(expr) => self.expr(&expr),
                InitItem::Group(group) => {
                    self.report(
                        DiagnosticKind::Unsupported,
                        group.text_range(),
                        "a nested array initializer",
                    );
                    self.push_null();
                }
            }
            count += 1;
        }
        let count = self.index(count, init.text_range(), "more than 65535 array elements");
        self.emit(Instruction::MakeList(count));
    }
}
