use once_cell::sync::Lazy;

pub struct Singleton {
    data: String,
}

static INSTANCE: Lazy<Singleton> = Lazy::new(|| Singleton {
    data: "Singleton data".to_string(),
});

pub fn instance() -> &'static Singleton {
    &INSTANCE
}

fn main() {
    let first = instance();
    println!("{}", first.data);
    println!("Singleton is doing something");
    println!("same instance: {}", std::ptr::eq(first, instance()));
}
