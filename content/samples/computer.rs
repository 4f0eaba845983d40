#[must_use]
pub struct ComputerBuilder {
    processor: String,
    ram: String,
    graphics_card: String,     // default: "Integrated Graphics"
    storage: String,           // default: "256GB SSD"
    wifi: bool,                // default: false
    bluetooth: bool,           // default: false
    operating_system: String,  // default: "Linux"
    warranty_years: u32,       // default: 1
}

impl ComputerBuilder {
    pub fn graphics_card(mut self, graphics_card: impl Into<String>) -> Self {
        self.graphics_card = graphics_card.into();
        self
    }

    pub fn with_wifi(mut self) -> Self {
        self.wifi = true;
        self
    }

    // storage, with_bluetooth, operating_system and warranty_years follow
    // the same pattern.

    pub fn build(self) -> Computer {
        Computer { /* move every field across */ }
    }
}

fn main() {
    let computer = Computer::builder("Intel i9", "32GB")
        .graphics_card("NVIDIA RTX 4090")
        .storage("256GB")
        .with_wifi()
        .with_bluetooth()
        .operating_system("Linux")
        .build();

    println!("{computer}");
}
