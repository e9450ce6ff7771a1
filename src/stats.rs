//! Statistics collection. Enabled with `--features stats`.

use log::info;
use std::{
    cell::RefCell,
    fmt::{self, Debug, Formatter},
    ops::{Deref, DerefMut},
    sync::{Mutex, MutexGuard, PoisonError},
};

#[derive(Copy, Clone, Default, Debug)]
struct MinMaxTotal {
    min:   u64,
    max:   u64,
    total: u64,
}

#[doc(hidden)]
#[derive(Default)]
pub struct Size {
    min_max_total: Option<MinMaxTotal>,
    count:         u64,
}

impl Debug for Size {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Size")
            .field("count", &self.count)
            .field("min", &self.min_max_total.map(|x| x.min))
            .field("max", &self.min_max_total.map(|x| x.max))
            .field("total", &self.min_max_total.map(|x| x.total))
            .field("avg", &self.avg())
            .finish()
    }
}

impl Size {
    const fn new() -> Self {
        Size {
            min_max_total: None,
            count:         0,
        }
    }

    pub(crate) fn record(&mut self, size: u64) {
        self.count += 1;
        if let Some(ref mut min_max_total) = &mut self.min_max_total {
            min_max_total.min = min_max_total.min.min(size);
            min_max_total.max = min_max_total.max.max(size);
            min_max_total.total += size;
        } else {
            self.min_max_total = Some(MinMaxTotal {
                min:   size,
                max:   size,
                total: size,
            });
        }
    }

    pub(crate) fn merge(&mut self, rhs: &Self) {
        self.count += rhs.count;
        self.min_max_total = match (self.min_max_total, rhs.min_max_total) {
            (Some(a), Some(b)) => Some(MinMaxTotal {
                min:   a.min.min(b.min),
                max:   a.max.max(b.max),
                total: a.total + b.total,
            }),
            (a, b) => a.or(b),
        };
    }

    /// Number of recorded samples.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of all recorded samples.
    pub fn total(&self) -> u64 {
        self.min_max_total.unwrap_or_default().total
    }

    /// Largest recorded sample.
    pub fn max(&self) -> Option<u64> {
        self.min_max_total.map(|x| x.max)
    }

    pub fn avg(&self) -> Option<f64> {
        self.min_max_total
            .map(|x| x.total as f64 / self.count as f64)
    }
}

#[doc(hidden)]
#[derive(Default, Debug)]
pub struct Event {
    count: u64,
}

impl Event {
    const fn new() -> Self {
        Event { count: 0 }
    }

    fn happened(&mut self) {
        self.count += 1
    }

    fn merge(&mut self, rhs: &Self) {
        self.count += rhs.count
    }

    /// Number of times the event happened.
    pub fn count(&self) -> u64 {
        self.count
    }
}

macro_rules! stats_func {
    ($(#[$attr:meta])* $name:ident: Event) => {
        #[inline]
        $(#[$attr])*
        pub(crate) fn $name() {
            if cfg!(feature = "stats") {
                let _ = THREAD_STAT.try_with(|stats| stats.get().$name.happened());
            }
        }
    };
    ($(#[$attr:meta])* $name:ident: Size) => {
        #[inline]
        $(#[$attr])*
        pub(crate) fn $name(size: usize) {
            if cfg!(feature = "stats") {
                let size = size as u64;
                let _ = THREAD_STAT.try_with(|stats| stats.get().$name.record(size));
            }
        }
    };
}

macro_rules! stats {
    ($($(#[$attr:meta])* $names:ident: $kinds:tt),* $(,)*) => {
        /// A collection of red-black tree statistics.
        #[derive(Default, Debug)]
        pub struct Stats {
            $($(#[$attr])*pub $names: $kinds),*
        }

        impl Stats {
            const fn new() -> Self {
                Stats {
                    $($names: $kinds::new()),*
                }
            }

            fn merge(&mut self, rhs: &Self) {
                $(self.$names.merge(&rhs.$names));*
            }
        }

        $(stats_func!{$(#[$attr])* $names: $kinds})*
    };
}

stats! {
    /// Number of nodes compared against while locating an element.
    search_depth:            Size,

    /// Number of loop iterations per insertion fixup. Zero when the new node's parent was black.
    insert_fixup_iterations: Size,

    /// Number of loop iterations per deletion fixup. Only recorded when a black node was unlinked.
    remove_fixup_iterations: Size,

    /// Number of steps taken to find the in-order successor of a node with two children.
    successor_depth:         Size,

    /// A single left or right rotation.
    rotation:                Event,

    /// An insertion fixup step that only recolored (red uncle).
    uncle_recolor:           Event,

    /// A deletion fixup step that only recolored and moved up (black sibling, black nephews).
    sibling_recolor:         Event,

    /// An `add` rejected because an equal element was present.
    duplicate_rejected:      Event,

    /// A `remove` of an element that was not present.
    not_found:               Event,

    /// A `remove_first` on an empty set.
    empty_tree:              Event,
}

impl Stats {
    /// Logs a summary of the stats object at `info` level.
    pub fn print_summary(&self) {
        info!("{:#?}", self);

        let mutations = self.insert_fixup_iterations.count + self.remove_fixup_iterations.count;
        info!(
            "{:>9}: {:>12} {:>17}: {:.4} {:>17}: {:.4}",
            "fixups",
            mutations,
            "rotations avg",
            self.rotation.count as f64 / mutations as f64,
            "search depth avg",
            self.search_depth.avg().unwrap_or_default(),
        );
        info!(
            "{:>9}: {:>12} {:>17}: {:>6} {:>17}: {:>6}",
            "rejected",
            self.duplicate_rejected.count + self.not_found.count + self.empty_tree.count,
            "duplicates",
            self.duplicate_rejected.count,
            "not found",
            self.not_found.count,
        );
    }
}

/// Thread local statistics.
///
/// To reduce overhead of stats tracking, each thread has it's own `Stats` object which is flushed
/// to the global `Stats` object on thread exit or when manually requested.
pub struct ThreadStats(RefCell<Stats>);

impl Debug for ThreadStats {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("ThreadStats").field(&self.0).finish()
    }
}

impl Drop for ThreadStats {
    fn drop(&mut self) {
        self.flush()
    }
}

impl ThreadStats {
    /// Returns the actual statistics object.
    pub fn get<'a>(&'a self) -> impl DerefMut<Target = Stats> + 'a {
        self.0.borrow_mut()
    }

    /// Flushes the thread stats to the global thread stats object.
    ///
    /// After flushing, `self` is reset.
    pub fn flush(&self) {
        let mut borrow = self.get();
        global().merge(&borrow);
        *borrow = Stats::new()
    }
}

thread_local! {
    // GLOBAL is initialized through a `Once`, so flushing from a thread local destructor is fine.
    static THREAD_STAT: ThreadStats = const { ThreadStats(RefCell::new(Stats::new())) };
}

lazy_static::lazy_static! {
    static ref GLOBAL: Mutex<Stats> = Mutex::default();
}

fn global() -> MutexGuard<'static, Stats> {
    // Stats hold no invariants that a panicking holder could break.
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the global stats object, or None if the feature is disabled.
pub fn stats() -> Option<impl Deref<Target = Stats>> {
    if cfg!(feature = "stats") {
        Some(global())
    } else {
        None
    }
}

/// Runs `f` against the current thread's stats object, or returns None if the feature is disabled.
pub fn thread_stats<F: FnOnce(&ThreadStats) -> R, R>(f: F) -> Option<R> {
    if cfg!(feature = "stats") {
        THREAD_STAT.try_with(f).ok()
    } else {
        None
    }
}

/// Flushes the current thread's stats into the global stats object.
pub fn flush_thread_stats() {
    let _ = thread_stats(ThreadStats::flush);
}

/// Logs a summary of the global stats object.
///
/// It may be necessary to run [`flush_thread_stats`] first.
pub fn print_stats() {
    match self::stats() {
        Some(stats) => stats.print_summary(),
        None => info!("`rbset/stats` feature is not enabled"),
    }
}
