use std::cell::Cell;
use std::io::{self, Write};

use once_cell::sync::Lazy;

thread_local! {
    static TABLES_BUILT: Cell<usize> = const { Cell::new(0) };
}

fn tables_built() -> usize {
    TABLES_BUILT.with(Cell::get)
}

/// Lookup table for Roman numerals. Building one is comparatively expensive.
pub struct RomanNumerals {
    table: Vec<(u32, &'static str)>,
}

impl RomanNumerals {
    fn build() -> Self {
        TABLES_BUILT.with(|built| built.set(built.get() + 1));
        Self {
            table: vec![
                (1000, "M"),
                (900, "CM"),
                (500, "D"),
                (400, "CD"),
                (100, "C"),
                (90, "XC"),
                (50, "L"),
                (40, "XL"),
                (10, "X"),
                (9, "IX"),
                (5, "V"),
                (4, "IV"),
                (1, "I"),
            ],
        }
    }

    pub fn format(&self, mut value: u32) -> String {
        let mut numeral = String::new();
        for &(weight, symbol) in &self.table {
            while value >= weight {
                numeral.push_str(symbol);
                value -= weight;
            }
        }
        numeral
    }
}

static SHARED: Lazy<RomanNumerals> = Lazy::new(RomanNumerals::build);

/// Rebuilds the table on every call.
fn to_roman_wasteful(value: u32) -> String {
    RomanNumerals::build().format(value)
}

/// Reuses one table for the life of the process.
fn to_roman(value: u32) -> String {
    SHARED.format(value)
}

pub(super) fn run(out: &mut dyn Write) -> io::Result<()> {
    let years = [1999, 2024, 1066];

    let before = tables_built();
    for year in years {
        writeln!(out, "{year} = {}", to_roman_wasteful(year))?;
    }
    let wasteful = tables_built() - before;
    writeln!(out, "tables built without reuse: {wasteful}")?;

    Lazy::force(&SHARED);
    let before = tables_built();
    for year in years {
        writeln!(out, "{year} = {}", to_roman(year))?;
    }
    let reused = tables_built() - before;
    writeln!(out, "tables built with reuse: {reused}")
}
