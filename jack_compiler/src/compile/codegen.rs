use log::warn;
use smol_str::SmolStr;

use super::{
    classes::KnownClasses,
    ir::{ArithOp, Instr, Segment},
    labels::{LabelAllocator, LabelFamily},
    symbol::{Scopes, StorageClass, Symbol},
};
use crate::{
    config::CompilerConf,
    error::{CompileError, CompileResult, Location},
    parsing::{
        BinaryOp, Expr, Ident, IfStmt, KeywordConst, LetStmt, Statement, StringConst, SubroutineCall, SubroutineDec,
        SubroutineKind, Term, Type, UnaryOp, WhileStmt,
    },
};

/// Everything the generator may look at while lowering a subroutine.
#[derive(Clone, Copy)]
pub struct Context<'s> {
    /// Source text, for error locations.
    pub source: &'s str,
    pub class_name: &'s str,
    pub scopes: Scopes<'s>,
    pub known: &'s KnownClasses,
    pub conf: &'s CompilerConf,
}

/// Code generator for one subroutine.
pub struct CodeGen<'s> {
    ctx: Context<'s>,
    /// Fresh per subroutine.
    labels: LabelAllocator,
    /// Resulting generated code.
    code: Vec<Instr>,
}

impl<'s> CodeGen<'s> {
    pub fn new(ctx: Context<'s>) -> Self {
        Self {
            ctx,
            labels: LabelAllocator::default(),
            code: vec![],
        }
    }

    /// Lower a subroutine whose arguments and locals
    /// are already declared in the subroutine scope.
    pub fn compile(mut self, dec: &SubroutineDec) -> CompileResult<Vec<Instr>> {
        let name = self.qualified(&dec.name.name);
        let local_count = self.ctx.scopes.subroutine.count(StorageClass::Local);
        self.emit(Instr::Function(name, local_count));

        match dec.kind {
            SubroutineKind::Constructor => {
                // Allocate the object before the body can touch a field.
                let field_count = self.ctx.scopes.class.count(StorageClass::Field);
                self.emit(Instr::Push(Segment::Constant, field_count));
                self.emit(Instr::Call("Memory.alloc".into(), 1));
                self.emit(Instr::Pop(Segment::Pointer, 0));
            }
            SubroutineKind::Method => {
                self.emit(Instr::Push(Segment::Argument, 0));
                self.emit(Instr::Pop(Segment::Pointer, 0));
            }
            SubroutineKind::Function => {}
        }

        self.emit_statements(&dec.body.statements)?;

        Ok(self.code)
    }

    #[inline]
    fn emit(&mut self, instr: Instr) {
        self.code.push(instr)
    }

    fn qualified(&self, name: &str) -> SmolStr {
        SmolStr::from(format!("{}.{}", self.ctx.class_name, name))
    }

    #[inline(never)]
    #[cold]
    fn location(&self, ident: &Ident) -> Location {
        Location::new(self.ctx.source, ident.span)
    }

    fn resolve_var(&self, ident: &Ident) -> CompileResult<&'s Symbol> {
        self.ctx
            .scopes
            .lookup(&ident.name)
            .ok_or_else(|| CompileError::UnknownVariable {
                name: ident.name.clone(),
                location: self.location(ident),
            })
    }
}

/// Statements
impl<'s> CodeGen<'s> {
    fn emit_statements(&mut self, statements: &[Statement]) -> CompileResult<()> {
        for stmt in statements {
            self.emit_stmt(stmt)?;
        }
        Ok(())
    }

    fn emit_stmt(&mut self, stmt: &Statement) -> CompileResult<()> {
        match stmt {
            Statement::Let(stmt) => self.emit_let(stmt),
            Statement::If(stmt) => self.emit_if(stmt),
            Statement::While(stmt) => self.emit_while(stmt),
            Statement::Do(call) => {
                self.emit_call(call)?;
                // Every call leaves a value behind.
                self.emit(Instr::Pop(Segment::Temp, 0));
                Ok(())
            }
            Statement::Return(value) => {
                match value {
                    Some(expr) => self.emit_expr(expr)?,
                    None => self.emit(Instr::Push(Segment::Constant, 0)),
                }
                self.emit(Instr::Return);
                Ok(())
            }
        }
    }

    fn emit_let(&mut self, stmt: &LetStmt) -> CompileResult<()> {
        let symbol = self.resolve_var(&stmt.target)?;

        match &stmt.index {
            None => {
                self.emit_expr(&stmt.value)?;
                self.emit(Instr::Pop(symbol.storage.segment(), symbol.index));
            }
            Some(index) => {
                // Target address first. The value may index arrays itself,
                // which clobbers `pointer 1`, so it's parked in `temp 0`
                // until the address is set.
                self.emit(Instr::Push(symbol.storage.segment(), symbol.index));
                self.emit_expr(index)?;
                self.emit(Instr::Arith(ArithOp::Add));
                self.emit_expr(&stmt.value)?;
                self.emit(Instr::Pop(Segment::Temp, 0));
                self.emit(Instr::Pop(Segment::Pointer, 1));
                self.emit(Instr::Push(Segment::Temp, 0));
                self.emit(Instr::Pop(Segment::That, 0));
            }
        }

        Ok(())
    }

    fn emit_if(&mut self, stmt: &IfStmt) -> CompileResult<()> {
        let if_true = self.labels.next_label(LabelFamily::IfTrue);
        let if_false = self.labels.next_label(LabelFamily::IfFalse);
        let if_end = stmt
            .else_branch
            .as_ref()
            .map(|_| self.labels.next_label(LabelFamily::IfEnd));

        self.emit_expr(&stmt.cond)?;
        self.emit(Instr::IfGoto(if_true.clone()));
        self.emit(Instr::Goto(if_false.clone()));
        self.emit(Instr::Label(if_true));
        self.emit_statements(&stmt.then_branch)?;

        match (&stmt.else_branch, if_end) {
            (Some(else_branch), Some(if_end)) => {
                self.emit(Instr::Goto(if_end.clone()));
                self.emit(Instr::Label(if_false));
                self.emit_statements(else_branch)?;
                self.emit(Instr::Label(if_end));
            }
            _ => self.emit(Instr::Label(if_false)),
        }

        Ok(())
    }

    fn emit_while(&mut self, stmt: &WhileStmt) -> CompileResult<()> {
        let start = self.labels.next_label(LabelFamily::WhileExp);
        let end = self.labels.next_label(LabelFamily::WhileEnd);

        self.emit(Instr::Label(start.clone()));
        self.emit_expr(&stmt.cond)?;
        self.emit(Instr::Arith(ArithOp::Not));
        self.emit(Instr::IfGoto(end.clone()));
        self.emit_statements(&stmt.body)?;
        self.emit(Instr::Goto(start));
        self.emit(Instr::Label(end));

        Ok(())
    }
}

/// Expressions
impl<'s> CodeGen<'s> {
    /// Terms are evaluated left to right, and each operator is applied
    /// to the running result and the following term. There is no
    /// precedence, so `a + b * c` computes `(a + b) * c`.
    fn emit_expr(&mut self, expr: &Expr) -> CompileResult<()> {
        self.emit_term(&expr.first)?;
        for (op, term) in &expr.rest {
            self.emit_term(term)?;
            self.emit_binary(*op);
        }
        Ok(())
    }

    #[rustfmt::skip]
    fn emit_binary(&mut self, op: BinaryOp) {
        let instr = match op {
            BinaryOp::Add => Instr::Arith(ArithOp::Add),
            BinaryOp::Sub => Instr::Arith(ArithOp::Sub),
            BinaryOp::Mul => Instr::Call("Math.multiply".into(), 2),
            BinaryOp::Div => Instr::Call("Math.divide".into(), 2),
            BinaryOp::And => Instr::Arith(ArithOp::And),
            BinaryOp::Or  => Instr::Arith(ArithOp::Or),
            BinaryOp::Lt  => Instr::Arith(ArithOp::Lt),
            BinaryOp::Gt  => Instr::Arith(ArithOp::Gt),
            BinaryOp::Eq  => Instr::Arith(ArithOp::Eq),
        };
        self.emit(instr);
    }

    fn emit_term(&mut self, term: &Term) -> CompileResult<()> {
        match term {
            Term::Int(value) => self.emit(Instr::Push(Segment::Constant, *value)),
            Term::Str(value) => self.emit_string(value),
            Term::Keyword(keyword) => self.emit_keyword(*keyword),
            Term::Var(ident) => {
                let symbol = self.resolve_var(ident)?;
                self.emit(Instr::Push(symbol.storage.segment(), symbol.index));
            }
            Term::Index(ident, index) => {
                let symbol = self.resolve_var(ident)?;
                self.emit(Instr::Push(symbol.storage.segment(), symbol.index));
                self.emit_expr(index)?;
                self.emit(Instr::Arith(ArithOp::Add));
                self.emit(Instr::Pop(Segment::Pointer, 1));
                self.emit(Instr::Push(Segment::That, 0));
            }
            Term::Call(call) => self.emit_call(call)?,
            Term::Unary(op, term) => {
                self.emit_term(term)?;
                match op {
                    UnaryOp::Neg => self.emit(Instr::Arith(ArithOp::Neg)),
                    UnaryOp::Not => self.emit(Instr::Arith(ArithOp::Not)),
                }
            }
            Term::Paren(expr) => self.emit_expr(expr)?,
        }

        Ok(())
    }

    /// Strings are built at runtime, one character at a time.
    fn emit_string(&mut self, value: &StringConst) {
        self.emit(Instr::Push(Segment::Constant, value.len));
        self.emit(Instr::Call("String.new".into(), 1));
        for code in &value.chars {
            self.emit(Instr::Push(Segment::Constant, *code));
            self.emit(Instr::Call("String.appendChar".into(), 2));
        }
    }

    fn emit_keyword(&mut self, keyword: KeywordConst) {
        match keyword {
            KeywordConst::True => {
                // All bits set.
                self.emit(Instr::Push(Segment::Constant, 0));
                self.emit(Instr::Arith(ArithOp::Not));
            }
            KeywordConst::False | KeywordConst::Null => self.emit(Instr::Push(Segment::Constant, 0)),
            KeywordConst::This => self.emit(Instr::Push(Segment::Pointer, 0)),
        }
    }
}

/// Calls
impl<'s> CodeGen<'s> {
    /// Resolve the call target and emit the call.
    ///
    /// - `f()` is a method on the current object.
    /// - `v.f()` is a method on the object held by variable `v`.
    /// - `C.f()` is a function or constructor of class `C`.
    fn emit_call(&mut self, call: &SubroutineCall) -> CompileResult<()> {
        let arg_count = call.args.len() as u16;

        let receiver = match &call.receiver {
            Some(receiver) => receiver,
            None => {
                self.emit(Instr::Push(Segment::Pointer, 0));
                self.emit_args(&call.args)?;
                let name = self.qualified(&call.name.name);
                self.emit(Instr::Call(name, arg_count + 1));
                return Ok(());
            }
        };

        if let Some(symbol) = self.ctx.scopes.lookup(&receiver.name) {
            let class_name = match &symbol.ty {
                Type::Class(class_name) => class_name,
                primitive => {
                    return Err(CompileError::PrimitiveReceiver {
                        name: receiver.name.clone(),
                        ty: SmolStr::from(primitive.to_string()),
                        method: call.name.name.clone(),
                        location: self.location(receiver),
                    })
                }
            };
            self.emit(Instr::Push(symbol.storage.segment(), symbol.index));
            self.emit_args(&call.args)?;
            let name = SmolStr::from(format!("{}.{}", class_name, call.name.name));
            self.emit(Instr::Call(name, arg_count + 1));
            return Ok(());
        }

        if !self.ctx.known.contains(&receiver.name) {
            if !self.ctx.conf.allow_unresolved_calls {
                return Err(CompileError::UnknownCallTarget {
                    name: receiver.name.clone(),
                    location: self.location(receiver),
                });
            }
            let location = self.location(receiver);
            warn!(
                "'{}' is neither a variable nor a known class, calling '{}.{}' ({}:{})",
                receiver.name, receiver.name, call.name.name, location.line, location.column
            );
        }

        self.emit_args(&call.args)?;
        let name = SmolStr::from(format!("{}.{}", receiver.name, call.name.name));
        self.emit(Instr::Call(name, arg_count));

        Ok(())
    }

    fn emit_args(&mut self, args: &[Expr]) -> CompileResult<()> {
        for arg in args {
            self.emit_expr(arg)?;
        }
        Ok(())
    }
}
