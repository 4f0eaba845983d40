use std::io::{self, Write};

/// A fixed-capacity stack over an array of slots. Popping empties the slot so
/// the stack does not keep values alive after handing them out.
pub struct Stack<T> {
    slots: Vec<Option<T>>,
    len: usize,
}

impl<T> Stack<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            len: 0,
        }
    }

    /// Push a value, handing it back when the stack is full.
    pub fn push(&mut self, value: T) -> Result<(), T> {
        match self.slots.get_mut(self.len) {
            Some(slot) => {
                *slot = Some(value);
                self.len += 1;
                Ok(())
            }
            None => Err(value),
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        self.slots[self.len].take()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots still holding a value.
    pub fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

pub(super) fn run(out: &mut dyn Write) -> io::Result<()> {
    let mut stack = Stack::with_capacity(4);
    for word in ["alpha", "beta", "gamma"] {
        if let Err(rejected) = stack.push(word.to_string()) {
            writeln!(out, "stack full, dropped {rejected}")?;
        }
    }
    writeln!(out, "pushed 3, occupied slots: {}", stack.occupied_slots())?;

    while let Some(word) = stack.pop() {
        writeln!(out, "popped {word}")?;
    }
    writeln!(
        out,
        "len: {}, occupied slots: {}",
        stack.len(),
        stack.occupied_slots()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_releases_the_slot() {
        let mut stack = Stack::with_capacity(2);
        stack.push(1).expect("room");
        stack.push(2).expect("room");
        assert_eq!(stack.push(3), Err(3));

        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.occupied_slots(), 1);
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
        assert_eq!(stack.occupied_slots(), 0);
    }

    #[test]
    fn demo_output() {
        let mut out = Vec::new();
        run(&mut out).expect("demo runs");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "pushed 3, occupied slots: 3\npopped gamma\npopped beta\npopped alpha\nlen: 0, occupied slots: 0\n"
        );
    }
}
