pub struct Stack<T> {
    slots: Vec<Option<T>>,
    len: usize,
}

impl<T> Stack<T> {
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // `take` leaves `None` behind, so the stack no longer owns the value.
        self.slots[self.len].take()
    }
}

fn main() {
    let mut stack = Stack::with_capacity(4);
    for word in ["alpha", "beta", "gamma"] {
        stack.push(word.to_string()).ok();
    }
    println!("pushed 3, occupied slots: {}", stack.occupied_slots());
    while let Some(word) = stack.pop() {
        println!("popped {word}");
    }
    println!("len: {}, occupied slots: {}", stack.len(), stack.occupied_slots());
}
