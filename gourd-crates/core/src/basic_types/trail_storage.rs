use crate::environment::EnvironmentOptions;
use crate::environment::TrailStorageStrategy;
use crate::gourd_asserts::gourd_assert_simple;

/// The backing memory of a [`Trail`](super::Trail).
///
/// Both variants implement the same stack contract; they only differ in how they grow. See
/// [`TrailStorageStrategy`] for the trade-off.
#[derive(Debug, Clone)]
pub(crate) enum TrailStorage<T> {
    Array(ArrayStorage<T>),
    Chunked(ChunkedStorage<T>),
}

impl<T> TrailStorage<T> {
    pub(crate) fn new(options: &EnvironmentOptions) -> Self {
        gourd_assert_simple!(
            options.initial_trail_capacity > 0,
            "The initial trail capacity should be strictly positive"
        );

        match options.trail_storage {
            TrailStorageStrategy::Array => TrailStorage::Array(ArrayStorage::new(
                options.initial_trail_capacity,
                options.load_factor,
            )),
            TrailStorageStrategy::Chunked => {
                TrailStorage::Chunked(ChunkedStorage::new(options.initial_trail_capacity))
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            TrailStorage::Array(storage) => storage.elements.len(),
            TrailStorage::Chunked(storage) => storage.len,
        }
    }

    pub(crate) fn push(&mut self, elem: T) {
        match self {
            TrailStorage::Array(storage) => storage.push(elem),
            TrailStorage::Chunked(storage) => storage.push(elem),
        }
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        match self {
            TrailStorage::Array(storage) => storage.elements.pop(),
            TrailStorage::Chunked(storage) => storage.pop(),
        }
    }

    #[cfg(test)]
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        match self {
            TrailStorage::Array(storage) => storage.elements.get(index),
            TrailStorage::Chunked(storage) => storage.get(index),
        }
    }

    /// Removes every element without handing them out.
    pub(crate) fn clear(&mut self) {
        match self {
            TrailStorage::Array(storage) => storage.elements.clear(),
            TrailStorage::Chunked(storage) => {
                storage.chunks.iter_mut().for_each(Vec::clear);
                storage.len = 0;
            }
        }
    }
}

/// A single growable array which grows by `load_factor` whenever it is full.
#[derive(Debug, Clone)]
pub(crate) struct ArrayStorage<T> {
    elements: Vec<T>,
    initial_capacity: usize,
    load_factor: f64,
}

impl<T> ArrayStorage<T> {
    fn new(initial_capacity: usize, load_factor: f64) -> Self {
        gourd_assert_simple!(load_factor > 1.0, "The load factor should exceed 1");

        ArrayStorage {
            elements: Vec::with_capacity(initial_capacity),
            initial_capacity,
            load_factor,
        }
    }

    fn push(&mut self, elem: T) {
        let len = self.elements.len();
        if len == self.elements.capacity() {
            let grown = (self.elements.capacity() as f64 * self.load_factor).ceil() as usize;
            let target = grown.max(self.initial_capacity).max(len + 1);
            self.elements.reserve_exact(target - len);
        }

        self.elements.push(elem);
    }
}

/// Fixed-size chunks which are allocated on demand. Elements are never moved once pushed, and
/// emptied chunks are kept around to be reused.
#[derive(Debug, Clone)]
pub(crate) struct ChunkedStorage<T> {
    chunks: Vec<Vec<T>>,
    chunk_size: usize,
    len: usize,
}

impl<T> ChunkedStorage<T> {
    fn new(chunk_size: usize) -> Self {
        ChunkedStorage {
            chunks: vec![Vec::with_capacity(chunk_size)],
            chunk_size,
            len: 0,
        }
    }

    fn push(&mut self, elem: T) {
        let chunk_index = self.len / self.chunk_size;
        if chunk_index == self.chunks.len() {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
        }

        self.chunks[chunk_index].push(elem);
        self.len += 1;
    }

    fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let chunk_index = (self.len - 1) / self.chunk_size;
        self.len -= 1;
        self.chunks[chunk_index].pop()
    }

    #[cfg(test)]
    fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }

        self.chunks[index / self.chunk_size].get(index % self.chunk_size)
    }
}
