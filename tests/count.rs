use rbset::{compare::Natural, RbSet};
use std::cell::Cell;

thread_local! {
    static COUNT: Cell<isize> = Cell::new(0);
}

fn live() -> isize {
    COUNT.with(Cell::get)
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Count(usize);
impl Clone for Count {
    fn clone(&self) -> Self {
        Count::new(self.0)
    }
}
impl Count {
    pub fn new(v: usize) -> Self {
        COUNT.with(|count| count.set(count.get() + 1));
        Count(v)
    }
}

impl Drop for Count {
    fn drop(&mut self) {
        COUNT.with(|count| count.set(count.get() - 1));
    }
}

const ITER_COUNT: usize = 10_000;

#[test]
fn count() {
    {
        let mut set = RbSet::new(Natural);
        for elem in 0..ITER_COUNT {
            set.add(Count::new(elem)).unwrap();
        }
        set.verify().unwrap();
        assert_eq!(live(), ITER_COUNT as isize);
    }
    assert_eq!(live(), 0);
}

#[test]
fn count_rev() {
    {
        let mut set = RbSet::new(Natural);
        for elem in (0..ITER_COUNT).rev() {
            set.add(Count::new(elem)).unwrap();
        }
        set.verify().unwrap();
    }
    assert_eq!(live(), 0);
}

#[test]
fn count_duplicates() {
    let mut set = RbSet::new(Natural);
    for elem in 0..ITER_COUNT {
        let _ = set.add(Count::new(elem / 2));
    }
    set.verify().unwrap();
    assert_eq!(live(), (ITER_COUNT / 2) as isize);
    drop(set);
    assert_eq!(live(), 0);
}

#[test]
fn count_remove() {
    let mut set = RbSet::new(Natural);
    for elem in 0..ITER_COUNT {
        set.add(Count::new(elem)).unwrap();
    }
    for elem in 0..ITER_COUNT {
        let key = Count::new(elem);
        let removed = set.remove(&key).unwrap();
        assert_eq!(removed, key);
    }
    set.verify().unwrap();
    assert!(set.is_empty());
    assert_eq!(live(), 0);
}

#[test]
fn count_remove_first_and_clear() {
    let mut set = RbSet::new(Natural);
    for elem in (0..ITER_COUNT).rev() {
        set.add(Count::new(elem)).unwrap();
    }
    for elem in 0..ITER_COUNT / 2 {
        assert_eq!(set.remove_first().unwrap().0, elem);
    }
    assert_eq!(live(), (ITER_COUNT / 2) as isize);
    set.clear();
    set.verify().unwrap();
    assert_eq!(live(), 0);
}
