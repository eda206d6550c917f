/// Receives events from a pipeline phase.
///
/// The matcher and the classifier report progress through an observer
/// instead of logging, so callers decide what to record. Observers only
/// watch; a phase always runs to completion regardless of what they do.
///
/// Closures automatically implement `Observer`, and `()` is a no-op observer.
pub trait Observer<E> {
    fn observe(&mut self, event: &E);
}

impl<E, F> Observer<E> for F
where
    F: FnMut(&E),
{
    fn observe(&mut self, event: &E) {
        self(event);
    }
}

impl<E> Observer<E> for () {
    fn observe(&mut self, _event: &E) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive<O: Observer<usize>>(mut observer: O, events: &[usize]) {
        for event in events {
            observer.observe(event);
        }
    }

    #[test]
    fn closures_see_every_event() {
        let mut seen = Vec::new();
        drive(|event: &usize| seen.push(*event), &[3, 1, 2]);
        assert_eq!(seen, vec![3, 1, 2]);
    }

    #[test]
    fn borrowed_closures_keep_their_state() {
        let mut total = 0;
        let mut sum = |event: &usize| total += *event;

        drive(&mut sum, &[1, 2]);
        drive(&mut sum, &[3]);

        assert_eq!(total, 6);
    }

    #[test]
    fn unit_observer_ignores_events() {
        drive((), &[7]);
    }
}
