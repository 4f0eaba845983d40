use std::fmt;
use std::io::{self, Write};

/// A computer with two required parts and several optional ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Computer {
    processor: String,
    ram: String,
    graphics_card: String,
    storage: String,
    wifi: bool,
    bluetooth: bool,
    operating_system: String,
    warranty_years: u32,
}

impl Computer {
    pub fn builder(processor: impl Into<String>, ram: impl Into<String>) -> ComputerBuilder {
        ComputerBuilder::new(processor, ram)
    }
}

impl fmt::Display for Computer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Computer {{ processor: {:?}, ram: {:?}, graphics_card: {:?}, storage: {:?}, \
             wifi: {}, bluetooth: {}, operating_system: {:?}, warranty_years: {} }}",
            self.processor,
            self.ram,
            self.graphics_card,
            self.storage,
            self.wifi,
            self.bluetooth,
            self.operating_system,
            self.warranty_years
        )
    }
}

/// Builder for [`Computer`].
///
/// Optional fields and their defaults:
/// `{graphics_card: "Integrated Graphics", storage: "256GB SSD", wifi: false,
/// bluetooth: false, operating_system: "Linux", warranty_years: 1}`.
#[derive(Debug, Clone)]
#[must_use]
pub struct ComputerBuilder {
    processor: String,
    ram: String,
    graphics_card: String,
    storage: String,
    wifi: bool,
    bluetooth: bool,
    operating_system: String,
    warranty_years: u32,
}

impl ComputerBuilder {
    pub fn new(processor: impl Into<String>, ram: impl Into<String>) -> Self {
        Self {
            processor: processor.into(),
            ram: ram.into(),
            graphics_card: "Integrated Graphics".to_string(),
            storage: "256GB SSD".to_string(),
            wifi: false,
            bluetooth: false,
            operating_system: "Linux".to_string(),
            warranty_years: 1,
        }
    }

    pub fn graphics_card(mut self, graphics_card: impl Into<String>) -> Self {
        self.graphics_card = graphics_card.into();
        self
    }

    pub fn storage(mut self, storage: impl Into<String>) -> Self {
        self.storage = storage.into();
        self
    }

    pub fn with_wifi(mut self) -> Self {
        self.wifi = true;
        self
    }

    pub fn with_bluetooth(mut self) -> Self {
        self.bluetooth = true;
        self
    }

    pub fn operating_system(mut self, operating_system: impl Into<String>) -> Self {
        self.operating_system = operating_system.into();
        self
    }

    pub fn warranty_years(mut self, years: u32) -> Self {
        self.warranty_years = years;
        self
    }

    pub fn build(self) -> Computer {
        Computer {
            processor: self.processor,
            ram: self.ram,
            graphics_card: self.graphics_card,
            storage: self.storage,
            wifi: self.wifi,
            bluetooth: self.bluetooth,
            operating_system: self.operating_system,
            warranty_years: self.warranty_years,
        }
    }
}

pub(super) fn run(out: &mut dyn Write) -> io::Result<()> {
    let computer = Computer::builder("Intel i9", "32GB")
        .graphics_card("NVIDIA RTX 4090")
        .storage("256GB")
        .with_wifi()
        .with_bluetooth()
        .operating_system("Linux")
        .build();

    writeln!(out, "{computer}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_unset_fields() {
        let computer = Computer::builder("Apple M2", "16GB").build();
        assert_eq!(
            computer.to_string(),
            "Computer { processor: \"Apple M2\", ram: \"16GB\", graphics_card: \"Integrated Graphics\", \
             storage: \"256GB SSD\", wifi: false, bluetooth: false, operating_system: \"Linux\", \
             warranty_years: 1 }"
        );
    }

    #[test]
    fn demo_prints_configured_computer() {
        let mut out = Vec::new();
        run(&mut out).expect("demo runs");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("graphics_card: \"NVIDIA RTX 4090\""), "{text}");
        assert!(text.contains("wifi: true, bluetooth: true"), "{text}");
        assert!(text.contains("warranty_years: 1"), "{text}");
    }
}
