pub struct ScopeGuard {
    name: &'static str,
    log: Rc<RefCell<Vec<String>>>,
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
        // Both guards still run, output first.
        return Err("disk full".to_string());
    }
    log.borrow_mut().push("copied".to_string());
    Ok(())
}
