//! Report sinks.
//!
//! The engine hands every conflict to a `ConflictSink`. Rendering,
//! severity and routing are the sink's business.

use crate::conflict::Conflict;

/// Receiver of conflicts produced by an analysis pass.
pub trait ConflictSink {
    /// Accepts one conflict.
    fn report(&mut self, conflict: Conflict);
}

impl ConflictSink for Vec<Conflict> {
    fn report(&mut self, conflict: Conflict) {
        self.push(conflict);
    }
}

impl<S: ConflictSink + ?Sized> ConflictSink for &mut S {
    fn report(&mut self, conflict: Conflict) {
        (**self).report(conflict);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceId;

    struct Counting(usize);

    impl ConflictSink for Counting {
        fn report(&mut self, _conflict: Conflict) {
            self.0 += 1;
        }
    }

    fn sample() -> Conflict {
        Conflict::namespace_wide(
            "foo",
            vec![ResourceId::new("foo", "r1"), ResourceId::new("foo", "r2")],
        )
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<Conflict> = Vec::new();
        sink.report(sample());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_mut_ref_sink() {
        fn feed<S: ConflictSink>(mut sink: S) {
            sink.report(sample());
            sink.report(sample());
        }

        let mut counting = Counting(0);
        feed(&mut counting);
        assert_eq!(counting.0, 2);
    }
}
