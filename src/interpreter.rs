use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::class::Class;
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::expr::*;
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::*;
use crate::token::{Token, Type};

/// How a statement (or block of statements) finished: normally, or via a `return` whose value
/// is still propagating up to the call that's waiting for it (§9). This is ordinary control
/// flow, not an error — it never implements `std::error::Error`.
#[derive(Debug, Clone)]
pub enum Flow {
    Normal,
    Return(Object),
}

/// Tree-walking evaluator over the resolved AST (§4.5). Holds the global scope, the current
/// scope, and the resolver's scope-distance side-table.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<Token, usize>,
    output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new(output: Box<dyn Write>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));
        for native in NativeFunction::globals() {
            globals.borrow_mut().define(&native.name.lexeme.clone(), Object::NativeFunction(native));
        }

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            output,
        }
    }

    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            self.execute(statement)?;
        }

        log::trace!("interpreted {} top-level statement(s)", statements.len());
        Ok(())
    }

    /// Records the scope distance the resolver computed for a `Variable`/`Assign`/`This`/
    /// `Super` occurrence, keyed by that occurrence's own token (§4.3, §9).
    pub fn resolve(&mut self, name: &Token, depth: usize) {
        self.locals.insert(name.clone(), depth);
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<Flow, RuntimeError> {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        expr.accept(self)
    }

    /// Runs `statements` against a fresh environment, restoring the previous one afterward
    /// regardless of how execution ended (§4.4).
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> Result<Flow, RuntimeError> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(Flow::Normal);
        for statement in statements {
            match self.execute(statement) {
                Ok(Flow::Normal) => continue,
                other => {
                    result = other;
                    break;
                }
            }
        }

        self.environment = previous;
        result
    }

    fn lookup_variable(&self, name: &Token) -> Result<Object, RuntimeError> {
        match self.locals.get(name) {
            Some(distance) => self.environment.borrow().get_at(*distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn is_truthy(object: &Object) -> bool {
        object.as_bool().unwrap_or(true)
    }

    fn number_error(operator: &Token) -> RuntimeError {
        RuntimeError {
            token: operator.clone(),
            message: "Operands must be numbers".to_string(),
        }
    }

    fn compare(left: Object, right: Object, operator: &Token, accept: impl Fn(Ordering) -> bool) -> Result<Object, RuntimeError> {
        left.partial_cmp(&right)
            .map(|ordering| Object::from(accept(ordering)))
            .ok_or_else(|| Self::number_error(operator))
    }
}

impl ExprVisitor<Result<Object, RuntimeError>> for Interpreter {
    fn visit_literal_expr(&mut self, literal: &Literal) -> Result<Object, RuntimeError> {
        Ok(Object::Literal(literal.clone()))
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) -> Result<Object, RuntimeError> {
        self.evaluate(&data.expr)
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> Result<Object, RuntimeError> {
        let right = self.evaluate(&data.expr)?;

        match data.operator.r#type {
            Type::Minus => (-right).ok_or_else(|| RuntimeError {
                token: data.operator.clone(),
                message: "Operand must be a number".to_string(),
            }),
            Type::Bang => Ok(Object::from(!Self::is_truthy(&right))),
            _ => unreachable!("parser only emits Minus/Bang unary operators"),
        }
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> Result<Object, RuntimeError> {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;

        match data.operator.r#type {
            Type::Minus => (left - right).ok_or_else(|| Self::number_error(&data.operator)),
            Type::Slash => (left / right).ok_or_else(|| Self::number_error(&data.operator)),
            Type::Star => (left * right).ok_or_else(|| Self::number_error(&data.operator)),
            Type::Plus => (left + right).ok_or_else(|| RuntimeError {
                token: data.operator.clone(),
                message: "Operands must be two numbers or two strings".to_string(),
            }),
            Type::Greater => Self::compare(left, right, &data.operator, |o| o == Ordering::Greater),
            Type::GreaterEqual => Self::compare(left, right, &data.operator, |o| o != Ordering::Less),
            Type::Less => Self::compare(left, right, &data.operator, |o| o == Ordering::Less),
            Type::LessEqual => Self::compare(left, right, &data.operator, |o| o != Ordering::Greater),
            Type::EqualEqual => Ok(Object::from(left == right)),
            Type::BangEqual => Ok(Object::from(left != right)),
            _ => unreachable!("parser only emits arithmetic/comparison/equality binary operators"),
        }
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> Result<Object, RuntimeError> {
        let left = self.evaluate(&data.left)?;

        match data.operator.r#type {
            Type::Or if Self::is_truthy(&left) => Ok(left),
            Type::And if !Self::is_truthy(&left) => Ok(left),
            _ => self.evaluate(&data.right),
        }
    }

    fn visit_variable_expr(&mut self, data: &VariableData) -> Result<Object, RuntimeError> {
        self.lookup_variable(&data.name)
    }

    fn visit_assign_expr(&mut self, data: &AssignData) -> Result<Object, RuntimeError> {
        let value = self.evaluate(&data.value)?;

        match self.locals.get(&data.name).copied() {
            Some(distance) => self.environment.borrow_mut().assign_at(distance, &data.name, value.clone()),
            None => self.globals.borrow_mut().assign(&data.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_call_expr(&mut self, data: &CallData) -> Result<Object, RuntimeError> {
        let callee = self.evaluate(&data.callee)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let arity = match &callee {
            Object::Function(function) => function.arity(),
            Object::NativeFunction(function) => function.arity(),
            Object::Class(class) => class.borrow().arity(),
            _ => return Err(RuntimeError {
                token: data.paren.clone(),
                message: "Can only call functions and classes".to_string(),
            }),
        };

        if arguments.len() != arity {
            return Err(RuntimeError {
                token: data.paren.clone(),
                message: format!("Expected {arity} arguments but got {}", arguments.len()),
            });
        }

        match &callee {
            Object::Function(function) => function.call(self, arguments),
            Object::NativeFunction(function) => function.call(self, arguments),
            Object::Class(class) => {
                let class = class.borrow();
                class.call(self, arguments)
            }
            _ => unreachable!("already rejected above"),
        }
    }

    fn visit_get_expr(&mut self, data: &GetData) -> Result<Object, RuntimeError> {
        let object = self.evaluate(&data.object)?;

        if let Object::Instance(instance) = &object {
            instance.borrow().get(&data.name, &object)
        } else {
            Err(RuntimeError {
                token: data.name.clone(),
                message: "Only instances have properties".to_string(),
            })
        }
    }

    fn visit_set_expr(&mut self, data: &SetData) -> Result<Object, RuntimeError> {
        let object = self.evaluate(&data.object)?;

        if let Object::Instance(instance) = &object {
            let value = self.evaluate(&data.value)?;
            instance.borrow_mut().set(&data.name, value.clone());
            Ok(value)
        } else {
            Err(RuntimeError {
                token: data.name.clone(),
                message: "Only instances have fields".to_string(),
            })
        }
    }

    fn visit_this_expr(&mut self, data: &ThisData) -> Result<Object, RuntimeError> {
        self.lookup_variable(&data.keyword)
    }

    fn visit_super_expr(&mut self, data: &SuperData) -> Result<Object, RuntimeError> {
        let distance = *self.locals.get(&data.keyword).expect("resolver always resolves 'super'");
        let superclass = self.environment.borrow().get_at(distance, &data.keyword)?;
        let Object::Class(superclass) = superclass else { unreachable!("'super' always resolves to a class") };

        // "this" sits one scope closer than "super" — the resolver opens the "this" scope
        // after the "super" scope when a class has a superclass (§4.3).
        let instance = self.environment.borrow().get_at(distance - 1, &Token::from("this"))?;

        let method = superclass.borrow().get_method(&data.method.lexeme).ok_or_else(|| RuntimeError {
            token: data.method.clone(),
            message: format!("Undefined property '{}'", data.method.lexeme),
        })?;

        Ok(Object::from(method.bind(instance)))
    }
}

impl StmtVisitor<Result<Flow, RuntimeError>> for Interpreter {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> Result<Flow, RuntimeError> {
        self.evaluate(&data.expr)?;
        Ok(Flow::Normal)
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> Result<Flow, RuntimeError> {
        let value = self.evaluate(&data.expr)?;
        writeln!(self.output, "{value}").expect("print sink should accept writes");
        Ok(Flow::Normal)
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> Result<Flow, RuntimeError> {
        let value = match &data.initializer {
            Some(expr) => self.evaluate(expr)?,
            None => Object::Literal(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(Flow::Normal)
    }

    fn visit_block_stmt(&mut self, data: &BlockData) -> Result<Flow, RuntimeError> {
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
        self.execute_block(&data.statements, environment)
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> Result<Flow, RuntimeError> {
        if Self::is_truthy(&self.evaluate(&data.condition)?) {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(Flow::Normal)
        }
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> Result<Flow, RuntimeError> {
        while Self::is_truthy(&self.evaluate(&data.condition)?) {
            match self.execute(&data.body)? {
                Flow::Normal => continue,
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }

    fn visit_function_stmt(&mut self, data: &FunctionData) -> Result<Flow, RuntimeError> {
        let function = Function::new(Rc::new(data.clone()), Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&data.name.lexeme, Object::Function(function));
        Ok(Flow::Normal)
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> Result<Flow, RuntimeError> {
        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Object::Literal(Literal::Nil),
        };

        Ok(Flow::Return(value))
    }

    fn visit_class_stmt(&mut self, data: &ClassData) -> Result<Flow, RuntimeError> {
        let superclass = match &data.superclass {
            Some(expr) => {
                let Expr::Variable(variable) = expr else { unreachable!("parser only emits Variable superclasses") };
                match self.evaluate(expr)? {
                    Object::Class(class) => Some(class),
                    _ => return Err(RuntimeError {
                        token: variable.name.clone(),
                        message: "Superclass must be a class".to_string(),
                    }),
                }
            }
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::Literal(Literal::Nil));

        let method_env = if let Some(superclass) = &superclass {
            let enclosing = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
            enclosing.borrow_mut().define("super", Object::Class(Rc::clone(superclass)));
            enclosing
        } else {
            Rc::clone(&self.environment)
        };

        let mut methods = HashMap::new();
        for method in &data.methods {
            let Stmt::Function(function_data) = method else { unreachable!("class bodies only contain Function statements") };
            let is_initializer = function_data.name.lexeme == "init";
            let function = Function::new(Rc::new(function_data.clone()), Rc::clone(&method_env), is_initializer);
            methods.insert(function_data.name.lexeme.clone(), function);
        }

        let class = Class::new(data.name.lexeme.clone(), methods, superclass);
        self.environment.borrow_mut().assign(&data.name, Object::Class(Rc::new(RefCell::new(class))))?;

        Ok(Flow::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use crate::scanner::Scanner;
    use std::cell::RefCell as StdRefCell;

    /// A `Write` sink that stays readable after being moved into the interpreter, by sharing
    /// its backing buffer with the test through an `Rc`.
    #[derive(Clone)]
    struct SharedBuffer(Rc<StdRefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn run(source: &str) -> Result<String, RuntimeError> {
        let tokens = Scanner::new(source).scan_tokens().expect("scan should succeed");
        let statements = Parser::new(tokens).parse().expect("parse should succeed");

        let buffer = SharedBuffer(Rc::new(StdRefCell::new(Vec::new())));
        let mut interpreter = Interpreter::new(Box::new(buffer.clone()));

        {
            let mut resolver = Resolver::new(&mut interpreter);
            resolver.resolve(&statements).expect("resolve should succeed");
        }

        interpreter.interpret(&statements)?;

        Ok(String::from_utf8(buffer.0.borrow().clone()).expect("output should be valid UTF-8"))
    }

    #[test]
    fn prints_arithmetic_result() {
        assert_eq!(run("print 1 + 2 * 3;").unwrap(), "7\n");
    }

    #[test]
    fn string_concatenation_prints_joined_value() {
        assert_eq!(run("print \"foo\" + \"bar\";").unwrap(), "foobar\n");
    }

    #[test]
    fn adding_number_and_string_is_a_runtime_error() {
        let err = run("print 1 + \"x\";").unwrap_err();
        assert_eq!(err.message, "Operands must be two numbers or two strings");
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let source = "fun makeCounter() { var i = 0; fun count() { i = i + 1; return i; } return count; } var counter = makeCounter(); print counter(); print counter();";
        assert_eq!(run(source).unwrap(), "1\n2\n");
    }

    #[test]
    fn class_instance_fields_and_methods() {
        let source = "class Greeter { greet(name) { return \"hi \" + name; } } var g = Greeter(); print g.greet(\"sam\");";
        assert_eq!(run(source).unwrap(), "hi sam\n");
    }

    #[test]
    fn init_return_value_is_ignored_and_instance_is_returned() {
        let source = "class Box { init(x) { this.x = x; } } var b = Box(5); print b.x;";
        assert_eq!(run(source).unwrap(), "5\n");
    }

    #[test]
    fn inherited_methods_resolve_through_super() {
        let source = "class A { hello() { return \"a\"; } } class B < A { hello() { return super.hello() + \"b\"; } } print B().hello();";
        assert_eq!(run(source).unwrap(), "ab\n");
    }

    #[test]
    fn calling_a_non_callable_is_a_runtime_error() {
        let err = run("var x = 1; x();").unwrap_err();
        assert_eq!(err.message, "Can only call functions and classes");
    }

    #[test]
    fn wrong_arity_is_a_runtime_error() {
        let err = run("fun f(a) { return a; } f();").unwrap_err();
        assert_eq!(err.message, "Expected 1 arguments but got 0");
    }

    #[test]
    fn undefined_variable_is_a_runtime_error() {
        let err = run("print x;").unwrap_err();
        assert_eq!(err.message, "Undefined variable 'x'");
    }
}
