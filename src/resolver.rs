use std::collections::HashMap;
use std::mem;

use crate::error::ResolveError;
use crate::expr::*;
use crate::interpreter::Interpreter;
use crate::literal::Literal;
use crate::stmt::*;
use crate::token::Token;

enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

enum ClassType {
    None,
    Class,
    Subclass,
}

/// Static pre-pass that assigns every variable reference a scope distance before the
/// interpreter runs (§4.3). The first error found aborts the pass — unlike the lexer and
/// parser, resolution errors are not accumulated (§7).
pub struct Resolver<'a> {
    interpreter: &'a mut Interpreter,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl<'a> Resolver<'a> {
    pub fn new(interpreter: &'a mut Interpreter) -> Self {
        Resolver {
            interpreter,
            scopes: vec![],
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    fn resolve_expr(&mut self, expr: &Expr) -> Result<(), ResolveError> {
        expr.accept(self)
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) -> Result<(), ResolveError> {
        stmt.accept(self)
    }

    pub fn resolve(&mut self, statements: &[Stmt]) -> Result<(), ResolveError> {
        for statement in statements {
            self.resolve_stmt(statement)?;
        }

        Ok(())
    }

    fn resolve_function(&mut self, function: &FunctionData, kind: FunctionType) -> Result<(), ResolveError> {
        let enclosing_function = mem::replace(&mut self.current_function, kind);

        self.begin_scope();
        for param in &function.params {
            self.declare(param)?;
            self.define(param);
        }
        self.resolve(&function.body)?;
        self.end_scope();

        self.current_function = enclosing_function;
        Ok(())
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Records that `name` exists in the innermost scope but isn't ready to be read yet.
    fn declare(&mut self, name: &Token) -> Result<(), ResolveError> {
        if self.scopes.is_empty() {
            return Ok(());
        }

        let scope = self.scopes.last_mut().expect("stack to be not empty");
        if scope.contains_key(&name.lexeme) {
            return Err(ResolveError {
                token: name.clone(),
                message: format!("Already a variable with this name '{}' in this scope", name.lexeme),
            });
        }
        scope.insert(name.lexeme.to_owned(), false);
        Ok(())
    }

    fn define(&mut self, name: &Token) {
        if self.scopes.is_empty() {
            return;
        }

        self.scopes
            .last_mut()
            .expect("stack to be not empty")
            .insert(name.lexeme.to_owned(), true);
    }

    fn resolve_local(&mut self, name: &Token) {
        for (i, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(name, i);
                return;
            }
        }
    }
}

impl<'a> ExprVisitor<Result<(), ResolveError>> for Resolver<'a> {
    fn visit_variable_expr(&mut self, data: &VariableData) -> Result<(), ResolveError> {
        if let Some(scope) = self.scopes.last() {
            if let Some(false) = scope.get(&data.name.lexeme) {
                return Err(ResolveError {
                    token: data.name.clone(),
                    message: "Can't read local variable in its own initializer".to_string(),
                });
            }
        }

        self.resolve_local(&data.name);
        Ok(())
    }

    fn visit_assign_expr(&mut self, data: &AssignData) -> Result<(), ResolveError> {
        self.resolve_expr(&data.value)?;
        self.resolve_local(&data.name);
        Ok(())
    }

    fn visit_literal_expr(&mut self, _literal: &Literal) -> Result<(), ResolveError> {
        Ok(())
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> Result<(), ResolveError> {
        self.resolve_expr(&data.left)?;
        self.resolve_expr(&data.right)
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> Result<(), ResolveError> {
        self.resolve_expr(&data.expr)
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> Result<(), ResolveError> {
        self.resolve_expr(&data.left)?;
        self.resolve_expr(&data.right)
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) -> Result<(), ResolveError> {
        self.resolve_expr(&data.expr)
    }

    fn visit_call_expr(&mut self, data: &CallData) -> Result<(), ResolveError> {
        self.resolve_expr(&data.callee)?;

        for argument in &data.arguments {
            self.resolve_expr(argument)?;
        }

        Ok(())
    }

    fn visit_get_expr(&mut self, data: &GetData) -> Result<(), ResolveError> {
        self.resolve_expr(&data.object)
    }

    fn visit_set_expr(&mut self, data: &SetData) -> Result<(), ResolveError> {
        self.resolve_expr(&data.value)?;
        self.resolve_expr(&data.object)
    }

    fn visit_this_expr(&mut self, data: &ThisData) -> Result<(), ResolveError> {
        if let ClassType::None = self.current_class {
            return Err(ResolveError {
                token: data.keyword.clone(),
                message: "Can't use 'this' outside of a class".to_string(),
            });
        }

        self.resolve_local(&data.keyword);
        Ok(())
    }

    fn visit_super_expr(&mut self, data: &SuperData) -> Result<(), ResolveError> {
        match self.current_class {
            ClassType::Subclass => (),
            ClassType::None => return Err(ResolveError {
                token: data.keyword.clone(),
                message: "Can't use 'super' outside of a class".to_string(),
            }),
            ClassType::Class => return Err(ResolveError {
                token: data.keyword.clone(),
                message: "Can't use 'super' in a class with no superclass".to_string(),
            }),
        }

        self.resolve_local(&data.keyword);
        Ok(())
    }
}

impl<'a> StmtVisitor<Result<(), ResolveError>> for Resolver<'a> {
    fn visit_block_stmt(&mut self, data: &BlockData) -> Result<(), ResolveError> {
        self.begin_scope();
        self.resolve(&data.statements)?;
        self.end_scope();
        Ok(())
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> Result<(), ResolveError> {
        self.declare(&data.name)?;
        if let Some(initializer) = &data.initializer {
            self.resolve_expr(initializer)?;
        }
        self.define(&data.name);
        Ok(())
    }

    fn visit_function_stmt(&mut self, data: &FunctionData) -> Result<(), ResolveError> {
        self.declare(&data.name)?;
        self.define(&data.name);

        self.resolve_function(data, FunctionType::Function)
    }

    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> Result<(), ResolveError> {
        self.resolve_expr(&data.expr)
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> Result<(), ResolveError> {
        self.resolve_expr(&data.condition)?;
        self.resolve_stmt(&data.then_branch)?;
        if let Some(else_branch) = &data.else_branch {
            self.resolve_stmt(else_branch)?;
        }
        Ok(())
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> Result<(), ResolveError> {
        self.resolve_expr(&data.expr)
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> Result<(), ResolveError> {
        if let FunctionType::None = self.current_function {
            return Err(ResolveError {
                token: data.keyword.clone(),
                message: "Can't return from top-level code".to_string(),
            });
        }

        if let Some(value) = &data.value {
            if let FunctionType::Initializer = self.current_function {
                return Err(ResolveError {
                    token: data.keyword.clone(),
                    message: "Can't return a value from an initializer".to_string(),
                });
            }

            self.resolve_expr(value)?;
        }

        Ok(())
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> Result<(), ResolveError> {
        self.resolve_expr(&data.condition)?;
        self.resolve_stmt(&data.body)
    }

    fn visit_class_stmt(&mut self, data: &ClassData) -> Result<(), ResolveError> {
        let enclosing_class = mem::replace(&mut self.current_class, ClassType::Class);

        self.declare(&data.name)?;
        self.define(&data.name);

        if let Some(superclass) = &data.superclass {
            let Expr::Variable(variable) = superclass else { unreachable!("parser only emits Variable superclasses") };
            if data.name.lexeme == variable.name.lexeme {
                return Err(ResolveError {
                    token: variable.name.clone(),
                    message: "A class can't inherit from itself".to_string(),
                });
            }

            self.current_class = ClassType::Subclass;
            self.resolve_expr(superclass)?;

            self.begin_scope();
            self.scopes
                .last_mut()
                .expect("stack to be not empty")
                .insert("super".to_string(), true);
        }

        self.begin_scope();
        self.scopes
            .last_mut()
            .expect("stack to be not empty")
            .insert("this".to_string(), true);

        for method in &data.methods {
            let Stmt::Function(function) = method else { unreachable!("class bodies only contain Function statements") };
            let kind = if function.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.resolve_function(function, kind)?;
        }

        self.end_scope();

        if data.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
        Ok(())
    }
}
