/// Fixed-capacity ring buffer: array + write index + count.
///
/// Once full, each push overwrites the oldest element.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    head: usize,
    count: usize,
}

impl<T> RingBuffer<T> {
    /// Create a buffer holding at most `capacity` items. A zero capacity is
    /// raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            head: 0,
            count: 0,
        }
    }

    pub fn push(&mut self, item: T) {
        let capacity = self.slots.len();
        self.slots[self.head] = Some(item);
        self.head = (self.head + 1) % capacity;
        self.count = (self.count + 1).min(capacity);
    }

    /// Items from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let capacity = self.slots.len();
        let start = (self.head + capacity - self.count) % capacity;
        (0..self.count).filter_map(move |i| self.slots[(start + i) % capacity].as_ref())
    }

    /// The most recently pushed item.
    pub fn newest(&self) -> Option<&T> {
        if self.count == 0 {
            return None;
        }
        let capacity = self.slots.len();
        self.slots[(self.head + capacity - 1) % capacity].as_ref()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.head = 0;
        self.count = 0;
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Clone of the held items, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> RingBuffer<T> {
    /// Linear scan over the held items.
    pub fn contains(&self, item: &T) -> bool {
        self.iter().any(|held| held == item)
    }
}
