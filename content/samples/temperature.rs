/// No variants, so no value of this type can ever exist.
pub enum Temperature {}

impl Temperature {
    pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
        celsius * 9.0 / 5.0 + 32.0
    }

    pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
        (fahrenheit - 32.0) * 5.0 / 9.0
    }
}

fn main() {
    println!("100C = {}F", Temperature::celsius_to_fahrenheit(100.0));
    println!("212F = {}C", Temperature::fahrenheit_to_celsius(212.0));
    println!("size of Temperature: {} bytes", std::mem::size_of::<Temperature>());
}
