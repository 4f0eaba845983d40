use std::io::{self, Write};

use once_cell::sync::Lazy;

/// The one instance of its type in the process.
#[derive(Debug)]
pub struct Singleton {
    data: String,
}

impl Singleton {
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn do_something(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Singleton is doing something")
    }
}

static INSTANCE: Lazy<Singleton> = Lazy::new(|| Singleton {
    data: "Singleton data".to_string(),
});

/// Access the shared instance, initialised on first use.
pub fn instance() -> &'static Singleton {
    &INSTANCE
}

pub(super) fn run(out: &mut dyn Write) -> io::Result<()> {
    let first = instance();
    let second = instance();

    writeln!(out, "{}", first.data())?;
    first.do_something(out)?;
    writeln!(out, "same instance: {}", std::ptr::eq(first, second))
}
