use std::io::{self, Write};

/// Temperature conversions. The type has no values, so it can never be
/// constructed; only its associated functions are usable.
pub enum Temperature {}

impl Temperature {
    pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
        celsius * 9.0 / 5.0 + 32.0
    }

    pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
        (fahrenheit - 32.0) * 5.0 / 9.0
    }
}

pub(super) fn run(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "100C = {}F", Temperature::celsius_to_fahrenheit(100.0))?;
    writeln!(out, "212F = {}C", Temperature::fahrenheit_to_celsius(212.0))?;
    writeln!(
        out,
        "size of Temperature: {} bytes",
        std::mem::size_of::<Temperature>()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_round_trip_boiling_point() {
        assert_eq!(Temperature::celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(Temperature::fahrenheit_to_celsius(212.0), 100.0);
    }

    #[test]
    fn demo_output() {
        let mut out = Vec::new();
        run(&mut out).expect("demo runs");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "100C = 212F\n212F = 100C\nsize of Temperature: 0 bytes\n"
        );
    }
}
