/// Which part of the ledger a successful mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Change {
    Categories,
    Transactions,
}

/// Refresh signal between the ledger's callers and the presentation layer.
/// The ledger itself never publishes; whoever drives a mutating operation
/// publishes after it succeeds, and subscribed views decide what to redraw.
pub(crate) struct ChangeBus<'a> {
    subscribers: Vec<Box<dyn Fn(Change) + 'a>>,
}

impl<'a> ChangeBus<'a> {
    pub(crate) fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    pub(crate) fn subscribe(&mut self, f: impl Fn(Change) + 'a) {
        self.subscribers.push(Box::new(f));
    }

    pub(crate) fn publish(&self, change: Change) {
        for subscriber in &self.subscribers {
            subscriber(change);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::cell::RefCell;

    use super::*;

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let seen_a = RefCell::new(Vec::new());
        let seen_b = RefCell::new(Vec::new());

        let mut bus = ChangeBus::new();
        bus.subscribe(|c| seen_a.borrow_mut().push(c));
        bus.subscribe(|c| seen_b.borrow_mut().push(c));

        bus.publish(Change::Categories);
        bus.publish(Change::Transactions);

        assert_eq!(
            *seen_a.borrow(),
            vec![Change::Categories, Change::Transactions]
        );
        assert_eq!(*seen_a.borrow(), *seen_b.borrow());
    }

    #[test]
    fn test_publish_with_no_subscribers_is_a_no_op() {
        let bus = ChangeBus::new();
        bus.publish(Change::Categories);
    }
}
