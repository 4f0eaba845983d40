use std::io::{self, Write};

/// A pizza that can only be created through its named constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pizza {
    size: String,
    cheese: bool,
    pepperoni: bool,
}

impl Pizza {
    pub fn cheese(size: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            cheese: true,
            pepperoni: false,
        }
    }

    pub fn pepperoni(size: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            cheese: true,
            pepperoni: true,
        }
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn has_cheese(&self) -> bool {
        self.cheese
    }

    pub fn has_pepperoni(&self) -> bool {
        self.pepperoni
    }
}

pub(super) fn run(out: &mut dyn Write) -> io::Result<()> {
    let pizza = Pizza::cheese("medium");
    writeln!(out, "{}", pizza.size())?;
    writeln!(out, "{}", pizza.has_cheese())?;
    writeln!(out, "{}", pizza.has_pepperoni())?;

    let pizza = Pizza::pepperoni("large");
    writeln!(out, "{}", pizza.size())?;
    writeln!(out, "{}", pizza.has_pepperoni())?;
    writeln!(out, "{}", pizza.has_cheese())?;
    Ok(())
}
