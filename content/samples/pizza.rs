pub struct Pizza {
    size: String,
    cheese: bool,
    pepperoni: bool,
}

impl Pizza {
    pub fn cheese(size: impl Into<String>) -> Self {
        Self { size: size.into(), cheese: true, pepperoni: false }
    }

    pub fn pepperoni(size: impl Into<String>) -> Self {
        Self { size: size.into(), cheese: true, pepperoni: true }
    }
}

fn main() {
    let pizza = Pizza::cheese("medium");
    println!("{}", pizza.size);
    println!("{}", pizza.cheese);
    println!("{}", pizza.pepperoni);

    let pizza = Pizza::pepperoni("large");
    println!("{}", pizza.size);
    println!("{}", pizza.pepperoni);
    println!("{}", pizza.cheese);
}
