//! Binary min-heap over a fixed key universe with priority updates

const MISSING: usize = usize::MAX;

/// Min-heap of keys in `0..capacity` ordered by an `f64` priority.
///
/// A position table maps each key to its heap slot, so any key's priority
/// can be read in O(1) and changed in O(log n). Priorities must not be NaN.
#[derive(Debug, Clone)]
pub struct IndexedMinHeap {
    /// Heap-ordered keys; only the first `size` entries are live
    heap: Vec<u32>,

    /// key -> slot in `heap`, or MISSING
    positions: Vec<usize>,

    /// key -> current priority
    priorities: Vec<f64>,

    size: usize,
}

impl IndexedMinHeap {
    /// Create an empty heap accepting keys `0..capacity`
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: vec![0; capacity],
            positions: vec![MISSING; capacity],
            priorities: vec![0.0; capacity],
            size: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.positions.len()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn contains_key(&self, key: u32) -> bool {
        self.positions
            .get(key as usize)
            .map_or(false, |&pos| pos != MISSING)
    }

    /// Priority of a key currently in the heap
    pub fn priority(&self, key: u32) -> Option<f64> {
        self.contains_key(key).then(|| self.priorities[key as usize])
    }

    /// Insert a key. Returns `false` if the heap is full, the key is out of
    /// range or already present, or the priority is NaN.
    pub fn insert(&mut self, key: u32, priority: f64) -> bool {
        let k = key as usize;
        if self.size >= self.capacity() || k >= self.capacity() || self.contains_key(key) || priority.is_nan() {
            return false;
        }

        let pos = self.size;
        self.size += 1;
        self.heap[pos] = key;
        self.positions[k] = pos;
        self.priorities[k] = priority;
        self.sift_up(pos);
        true
    }

    /// Key with the smallest priority, without removing it
    pub fn peek(&self) -> Option<(u32, f64)> {
        if self.size == 0 {
            return None;
        }
        let key = self.heap[0];
        Some((key, self.priorities[key as usize]))
    }

    /// Remove and return the key with the smallest priority
    pub fn poll(&mut self) -> Option<(u32, f64)> {
        let top = self.peek()?;
        self.positions[top.0 as usize] = MISSING;
        self.size -= 1;

        if self.size > 0 {
            let last = self.heap[self.size];
            self.heap[0] = last;
            self.positions[last as usize] = 0;
            self.sift_down(0);
        }
        Some(top)
    }

    /// Change the priority of a key in the heap and restore heap order.
    /// Returns `false` if the key is not in the heap or the priority is NaN.
    pub fn refresh_priority(&mut self, key: u32, priority: f64) -> bool {
        if !self.contains_key(key) || priority.is_nan() {
            return false;
        }
        let k = key as usize;
        self.priorities[k] = priority;
        let pos = self.positions[k];
        if !self.sift_down(pos) {
            self.sift_up(pos);
        }
        true
    }

    /// Check the heap property across every live slot
    pub fn satisfies_heap(&self) -> bool {
        (1..self.size).all(|pos| {
            let parent = (pos - 1) / 2;
            self.value_at(parent) <= self.value_at(pos)
        }) && (0..self.size).all(|pos| self.positions[self.heap[pos] as usize] == pos)
    }

    fn value_at(&self, pos: usize) -> f64 {
        self.priorities[self.heap[pos] as usize]
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions[self.heap[a] as usize] = a;
        self.positions[self.heap[b] as usize] = b;
    }

    /// Returns whether the entry moved
    fn sift_down(&mut self, mut pos: usize) -> bool {
        let start = pos;
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < self.size && self.value_at(left) < self.value_at(smallest) {
                smallest = left;
            }
            if right < self.size && self.value_at(right) < self.value_at(smallest) {
                smallest = right;
            }
            if smallest == pos {
                return pos != start;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.value_at(parent) <= self.value_at(pos) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }
}
