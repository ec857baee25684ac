//! Class and subroutine declarations.
use log::{debug, trace, warn};
use smol_str::SmolStr;

use super::{
    ClassVarDec, ClassVarKind, Ident, Param, ParseResult, Parser, SubroutineBody, SubroutineDec, SubroutineKind,
    Type, VarDec,
};
use crate::{
    compile::{write_text, ClassOrigin, CodeGen, Context, Scopes, StorageClass, SymbolTable},
    error::{CompileError, Location},
    tokens::{Keyword as K, Symbol as S, TokenKind},
    CompiledClass,
};

impl<'a, 'c> Parser<'a, 'c> {
    /// ```text
    /// class Name { classVarDec* subroutineDec* }
    /// ```
    pub(crate) fn class(&mut self) -> ParseResult<CompiledClass> {
        self.expect_keyword(K::Class)?;
        let name = self.ident()?;

        debug!("compiling class {}", name.name);
        self.class_name = name.name.clone();
        self.class_scope.reset();

        // The class can call its own functions before it's finished.
        let previous = self.known.origin(&name.name);
        match previous {
            Some(ClassOrigin::Builtin) => warn!("class {} shadows a runtime library class", name.name),
            Some(_) => {}
            None => self.known.declare(name.name.clone()),
        }

        match self.class_body() {
            Ok(code) => {
                self.known.insert_compiled(name.name.clone());
                Ok(CompiledClass { name: name.name, code })
            }
            Err(err) => {
                // A class that failed to compile can't be called.
                if previous.is_none() {
                    self.known.remove(&name.name);
                }
                Err(err)
            }
        }
    }

    /// ```text
    /// { classVarDec* subroutineDec* } EOF
    /// ```
    fn class_body(&mut self) -> ParseResult<String> {
        self.expect_symbol(S::LeftBrace)?;
        self.zero_or_more(Self::class_var_dec)?;
        let subroutines = self.zero_or_more(Self::subroutine_dec)?;
        self.expect_symbol(S::RightBrace)?;
        self.expect(TokenKind::EOF)?;
        Ok(subroutines.concat())
    }

    /// ```text
    /// (field | static) type name (, name)* ;
    /// ```
    fn class_var_dec(&mut self) -> ParseResult<ClassVarDec> {
        let dec = self.sequence(|p| {
            let kind = p.one_of(&[
                |p| p.expect_keyword(K::Field).map(|_| ClassVarKind::Field),
                |p| p.expect_keyword(K::Static).map(|_| ClassVarKind::Static),
            ])?;
            let ty = p.var_type()?;
            let names = p.comma_separated(Self::ident)?;
            p.expect_symbol(S::Semicolon)?;
            Ok(ClassVarDec { kind, ty, names })
        })?;

        // Only declared once the whole line has matched.
        let storage = match dec.kind {
            ClassVarKind::Field => StorageClass::Field,
            ClassVarKind::Static => StorageClass::Static,
        };
        for name in &dec.names {
            define(&mut self.class_scope, self.input.source_code(), name, &dec.ty, storage)?;
        }

        Ok(dec)
    }

    /// ```text
    /// int | char | boolean | ClassName
    /// ```
    pub(crate) fn var_type(&mut self) -> ParseResult<Type> {
        self.one_of(&[
            |p| p.expect_keyword(K::Int).map(|_| Type::Int),
            |p| p.expect_keyword(K::Char).map(|_| Type::Char),
            |p| p.expect_keyword(K::Boolean).map(|_| Type::Boolean),
            |p| p.ident().map(|ident| Type::Class(ident.name)),
        ])
    }

    /// Parse a subroutine, then compile it.
    ///
    /// ```text
    /// (constructor | function | method) (void | type) name ( parameterList ) body
    /// ```
    fn subroutine_dec(&mut self) -> ParseResult<String> {
        let dec = self.sequence(|p| {
            let kind = p.one_of(&[
                |p| p.expect_keyword(K::Constructor).map(|_| SubroutineKind::Constructor),
                |p| p.expect_keyword(K::Function).map(|_| SubroutineKind::Function),
                |p| p.expect_keyword(K::Method).map(|_| SubroutineKind::Method),
            ])?;
            let return_type = p.one_of(&[
                |p| p.expect_keyword(K::Void).map(|_| None),
                |p| p.var_type().map(Some),
            ])?;
            let name = p.ident()?;
            p.expect_symbol(S::LeftParen)?;
            let params = p.parameter_list()?;
            p.expect_symbol(S::RightParen)?;
            let body = p.subroutine_body()?;

            Ok(SubroutineDec {
                kind,
                return_type,
                name,
                params,
                body,
            })
        })?;

        self.bind_subroutine(&dec)?;

        let ctx = Context {
            source: self.input.source_code(),
            class_name: &self.class_name,
            scopes: Scopes {
                class: &self.class_scope,
                subroutine: &self.sub_scope,
            },
            known: &*self.known,
            conf: self.conf,
        };
        let code = CodeGen::new(ctx).compile(&dec)?;
        debug!(
            "compiled {}.{} into {} instructions",
            self.class_name,
            dec.name.name,
            code.len()
        );

        Ok(write_text(&code))
    }

    /// ```text
    /// (type name (, type name)*)?
    /// ```
    fn parameter_list(&mut self) -> ParseResult<Vec<Param>> {
        let params = self.zero_or_one(|p| {
            p.comma_separated(|p| {
                let ty = p.var_type()?;
                let name = p.ident()?;
                Ok(Param { ty, name })
            })
        })?;
        Ok(params.unwrap_or_default())
    }

    /// ```text
    /// { varDec* statement* }
    /// ```
    fn subroutine_body(&mut self) -> ParseResult<SubroutineBody> {
        self.expect_symbol(S::LeftBrace)?;
        let vars = self.zero_or_more(Self::var_dec)?;
        let statements = self.statements()?;
        self.expect_symbol(S::RightBrace)?;
        Ok(SubroutineBody { vars, statements })
    }

    /// ```text
    /// var type name (, name)* ;
    /// ```
    fn var_dec(&mut self) -> ParseResult<VarDec> {
        self.expect_keyword(K::Var)?;
        let ty = self.var_type()?;
        let names = self.comma_separated(Self::ident)?;
        self.expect_symbol(S::Semicolon)?;
        Ok(VarDec { ty, names })
    }

    /// Reset the subroutine scope and declare the implicit receiver,
    /// then the parameters, then the locals.
    fn bind_subroutine(&mut self, dec: &SubroutineDec) -> Result<(), CompileError> {
        let source = self.input.source_code();
        self.sub_scope.reset();

        if dec.kind == SubroutineKind::Method {
            let this = Ident {
                name: SmolStr::new("this"),
                span: dec.name.span,
            };
            let ty = Type::Class(self.class_name.clone());
            define(&mut self.sub_scope, source, &this, &ty, StorageClass::Argument)?;
        }

        for param in &dec.params {
            define(&mut self.sub_scope, source, &param.name, &param.ty, StorageClass::Argument)?;
        }

        for var in &dec.body.vars {
            for name in &var.names {
                define(&mut self.sub_scope, source, name, &var.ty, StorageClass::Local)?;
            }
        }

        Ok(())
    }
}

fn define(
    table: &mut SymbolTable,
    source: &str,
    name: &Ident,
    ty: &Type,
    storage: StorageClass,
) -> Result<(), CompileError> {
    match table.define(name.name.clone(), ty.clone(), storage) {
        Ok(symbol) => {
            trace!(
                "declared {} {}: {:?} {}",
                symbol.ty,
                symbol.name,
                symbol.storage,
                symbol.index
            );
            Ok(())
        }
        Err(_) => Err(CompileError::Redeclared {
            name: name.name.clone(),
            location: Location::new(source, name.span),
        }),
    }
}
