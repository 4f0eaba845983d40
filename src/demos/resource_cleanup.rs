use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Records its release into a shared log when dropped.
pub struct ScopeGuard {
    name: &'static str,
    log: Rc<RefCell<Vec<String>>>,
}

impl ScopeGuard {
    pub fn acquire(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Self {
        log.borrow_mut().push(format!("open {name}"));
        Self {
            name,
            log: Rc::clone(log),
        }
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.log.borrow_mut().push(format!("close {}", self.name));
    }
}

fn copy_file(fail: bool, log: &Rc<RefCell<Vec<String>>>) -> Result<(), String> {
    let _input = ScopeGuard::acquire("input", log);
    let _output = ScopeGuard::acquire("output", log);
    if fail {
        return Err("disk full".to_string());
    }
    log.borrow_mut().push("copied".to_string());
    Ok(())
}

pub(super) fn run(out: &mut dyn Write) -> io::Result<()> {
    for fail in [false, true] {
        let log = Rc::new(RefCell::new(Vec::new()));
        let result = copy_file(fail, &log);
        writeln!(out, "result: {result:?}")?;
        for line in log.borrow().iter() {
            writeln!(out, "  {line}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_close_in_reverse_order_on_error() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let result = copy_file(true, &log);
        assert_eq!(result, Err("disk full".to_string()));
        assert_eq!(
            *log.borrow(),
            vec!["open input", "open output", "close output", "close input"]
        );
    }

    #[test]
    fn guards_close_after_success() {
        let log = Rc::new(RefCell::new(Vec::new()));
        copy_file(false, &log).expect("copy succeeds");
        assert_eq!(log.borrow().last().map(String::as_str), Some("close input"));
    }
}
