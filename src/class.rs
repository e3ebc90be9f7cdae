use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::function::Function;
use crate::interpreter::Interpreter;
use crate::object::{Callable, Object};
use crate::token::Token;

/// A class value: its own methods plus an optional superclass to fall back to (§3).
#[derive(Clone)]
pub struct Class {
    pub name: String,
    pub methods: HashMap<String, Function>,
    pub superclass: Option<Rc<RefCell<Class>>>,
}

impl Class {
    pub fn new(name: String, methods: HashMap<String, Function>, superclass: Option<Rc<RefCell<Class>>>) -> Self {
        Class { name, methods, superclass }
    }

    /// Looks up a method on this class, falling back to the superclass chain (§4.5).
    pub fn get_method(&self, name: &str) -> Option<Function> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }

        self.superclass.as_ref().and_then(|superclass| superclass.borrow().get_method(name))
    }
}

impl Debug for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

/// A class prints as its bare name (§6).
impl Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Callable for Class {
    /// Arity delegates to `init`'s arity, or 0 if the class has no initializer (§4.5).
    fn arity(&self) -> usize {
        self.get_method("init").map(|init| init.arity()).unwrap_or(0)
    }

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let instance = Rc::new(RefCell::new(Instance::from(self)));

        if let Some(initializer) = self.get_method("init") {
            let bound = initializer.bind(Object::Instance(Rc::clone(&instance)));
            bound.call(interpreter, arguments)?;
        }

        Ok(Object::Instance(instance))
    }
}

/// An instance value: the class it was constructed from, plus its own field storage (§3).
#[derive(Clone)]
pub struct Instance {
    pub class: Rc<RefCell<Class>>,
    pub fields: HashMap<String, Object>,
}

impl Instance {
    pub fn get(&self, name: &Token, instance: &Object) -> Result<Object, RuntimeError> {
        if let Some(field) = self.fields.get(&name.lexeme) {
            Ok(field.clone())
        } else if let Some(method) = self.class.borrow().get_method(&name.lexeme) {
            Ok(Object::from(method.bind(instance.clone())))
        } else {
            Err(RuntimeError {
                token: name.clone(),
                message: format!("Undefined property '{}'", name.lexeme),
            })
        }
    }

    pub fn set(&mut self, name: &Token, value: Object) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}

impl From<&Class> for Instance {
    fn from(class: &Class) -> Self {
        Instance { class: Rc::new(RefCell::new(class.clone())), fields: HashMap::new() }
    }
}

impl From<&Rc<RefCell<Class>>> for Instance {
    fn from(class: &Rc<RefCell<Class>>) -> Self {
        Instance { class: Rc::clone(class), fields: HashMap::new() }
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<instance {}>", self.class.borrow().name)
    }
}

/// An instance prints as `NAME instance` (§6).
impl Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} instance", self.class.borrow().name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, methods: HashMap<String, Function>, superclass: Option<Rc<RefCell<Class>>>) -> Rc<RefCell<Class>> {
        Rc::new(RefCell::new(Class::new(name.to_string(), methods, superclass)))
    }

    #[test]
    fn arity_is_zero_without_initializer() {
        let c = class("Point", HashMap::new(), None);
        assert_eq!(c.borrow().arity(), 0);
    }

    #[test]
    fn method_lookup_falls_back_to_superclass() {
        let base = class("Animal", HashMap::new(), None);
        let derived = class("Dog", HashMap::new(), Some(Rc::clone(&base)));
        assert!(derived.borrow().get_method("speak").is_none());
    }

    #[test]
    fn class_displays_as_bare_name() {
        let c = class("Point", HashMap::new(), None);
        assert_eq!(c.borrow().to_string(), "Point");
    }

    #[test]
    fn instance_displays_as_name_instance() {
        let c = class("Point", HashMap::new(), None);
        let instance = Instance::from(&c);
        assert_eq!(instance.to_string(), "Point instance");
    }
}
