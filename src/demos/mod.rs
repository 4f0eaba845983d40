//! Demonstration programs for the lessons.
//!
//! Each demonstration prints illustrative output to the writer it is given.
//! The binary exposes them as `lessonbook demo <name>` so the example runner
//! can execute one in an isolated child process and capture what it prints.

use std::io::{self, Write};

mod builder;
mod dependency_injection;
mod noninstantiable;
mod object_reuse;
mod obsolete_references;
mod resource_cleanup;
mod singleton;
mod static_factory;

pub use builder::{Computer, ComputerBuilder};
pub use dependency_injection::{Lexicon, SpellChecker};
pub use noninstantiable::Temperature;
pub use object_reuse::RomanNumerals;
pub use obsolete_references::Stack;
pub use resource_cleanup::ScopeGuard;
pub use singleton::{Singleton, instance};
pub use static_factory::Pizza;

/// A named demonstration.
#[derive(Debug, Clone, Copy)]
pub struct Demo {
    pub name: &'static str,
    pub summary: &'static str,
    entry: fn(&mut dyn Write) -> io::Result<()>,
}

impl Demo {
    pub fn run(&self, out: &mut dyn Write) -> io::Result<()> {
        (self.entry)(out)?;
        out.flush()
    }
}

static CATALOG: [Demo; 8] = [
    Demo {
        name: "static-factory",
        summary: "Named constructors instead of a public constructor",
        entry: static_factory::run,
    },
    Demo {
        name: "builder",
        summary: "Builder for a type with many optional parameters",
        entry: builder::run,
    },
    Demo {
        name: "singleton",
        summary: "A lazily initialised process-wide instance",
        entry: singleton::run,
    },
    Demo {
        name: "noninstantiable",
        summary: "A utility type that cannot be constructed",
        entry: noninstantiable::run,
    },
    Demo {
        name: "dependency-injection",
        summary: "Passing a resource in instead of hardwiring it",
        entry: dependency_injection::run,
    },
    Demo {
        name: "object-reuse",
        summary: "Reusing an expensive value instead of rebuilding it",
        entry: object_reuse::run,
    },
    Demo {
        name: "obsolete-references",
        summary: "Clearing slots a collection no longer uses",
        entry: obsolete_references::run,
    },
    Demo {
        name: "resource-cleanup",
        summary: "Releasing resources on every exit path",
        entry: resource_cleanup::run,
    },
];

pub fn catalog() -> &'static [Demo] {
    &CATALOG
}

pub fn find(name: &str) -> Option<&'static Demo> {
    CATALOG.iter().find(|demo| demo.name == name)
}

/// Run a demonstration into a string.
pub fn capture(demo: &Demo) -> io::Result<String> {
    let mut buffer = Vec::new();
    demo.run(&mut buffer)?;
    String::from_utf8(buffer).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = catalog().iter().map(|demo| demo.name).collect();
        assert_eq!(names.len(), catalog().len());
    }

    #[test]
    fn every_demo_prints_something() {
        for demo in catalog() {
            let output = capture(demo).expect("demo runs");
            assert!(!output.trim().is_empty(), "{} printed nothing", demo.name);
        }
    }

    #[test]
    fn find_rejects_unknown_names() {
        assert!(find("static-factory").is_some());
        assert!(find("Static-Factory").is_none());
    }
}
