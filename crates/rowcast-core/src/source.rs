//! Record sources for the blocking streaming driver.

use std::sync::mpsc;

/// A blocking, closable source of records.
///
/// `recv` blocks until a record is available and returns `None` once the source
/// is closed and drained. There is no timeout; wrap the source if you need one.
pub trait RecordSource {
    type Item;

    fn recv(&mut self) -> Option<Self::Item>;
}

impl<T> RecordSource for mpsc::Receiver<T> {
    type Item = T;

    fn recv(&mut self) -> Option<T> {
        mpsc::Receiver::recv(self).ok()
    }
}

impl<S: RecordSource + ?Sized> RecordSource for &mut S {
    type Item = S::Item;

    fn recv(&mut self) -> Option<S::Item> {
        (**self).recv()
    }
}

/// Adapts any iterator into a [`RecordSource`]; exhaustion means closed.
#[derive(Debug, Clone)]
pub struct IterSource<I>(I);

impl<I: Iterator> IterSource<I> {
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self(iter.into_iter())
    }
}

impl<I: Iterator> RecordSource for IterSource<I> {
    type Item = I::Item;

    fn recv(&mut self) -> Option<I::Item> {
        self.0.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_channel_source_drains_then_closes() {
        let (tx, mut rx) = mpsc::channel();
        let producer = thread::spawn(move || {
            for i in 0..3 {
                tx.send(i).unwrap();
            }
        });
        producer.join().unwrap();

        assert_eq!(RecordSource::recv(&mut rx), Some(0));
        assert_eq!(RecordSource::recv(&mut rx), Some(1));
        assert_eq!(RecordSource::recv(&mut rx), Some(2));
        assert_eq!(RecordSource::recv(&mut rx), None);
    }

    #[test]
    fn test_iter_source() {
        let mut source = IterSource::new(vec!["a", "b"]);
        assert_eq!(source.recv(), Some("a"));
        assert_eq!(source.recv(), Some("b"));
        assert_eq!(source.recv(), None);
    }
}
