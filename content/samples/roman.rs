use once_cell::sync::Lazy;

static SHARED: Lazy<RomanNumerals> = Lazy::new(RomanNumerals::build);

/// Builds a fresh lookup table for every conversion.
fn to_roman_wasteful(value: u32) -> String {
    RomanNumerals::build().format(value)
}

/// Builds the table once and reuses it for the life of the process.
fn to_roman(value: u32) -> String {
    SHARED.format(value)
}

fn main() {
    for year in [1999, 2024, 1066] {
        println!("{year} = {}", to_roman_wasteful(year));
    }
    for year in [1999, 2024, 1066] {
        println!("{year} = {}", to_roman(year));
    }
}
