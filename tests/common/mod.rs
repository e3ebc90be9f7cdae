use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use ember_lang::error::EmberError;
use ember_lang::Ember;

/// `std::io::Write` sink that stays readable after being moved into the interpreter, since
/// `Ember::new` needs an owned, `'static` writer.
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Runs `source` through the full pipeline and returns everything it printed.
pub fn run_ok(source: &str) -> String {
    let buffer = SharedBuffer::default();
    let mut ember = Ember::new(buffer.clone());
    ember.run(source).unwrap_or_else(|err| panic!("expected {source:?} to run, got {err}"));
    String::from_utf8(buffer.0.borrow().clone()).expect("program output should be valid UTF-8")
}

/// Runs `source` and returns the pipeline error, panicking if it ran to completion.
pub fn run_err(source: &str) -> EmberError {
    let buffer = SharedBuffer::default();
    let mut ember = Ember::new(buffer);
    ember.run(source).err().unwrap_or_else(|| panic!("expected {source:?} to fail"))
}
