use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorKind {
    #[default]
    Default,
    Grab,
    Grabbing,
}

/// Something owning a global cursor style.
pub trait CursorHost {
    /// Install `cursor` and return the style it replaced.
    fn replace_cursor(&self, cursor: CursorKind) -> CursorKind;
}

/// A cursor style held for as long as the lease lives.
///
/// The previous style comes back when the lease is dropped, whether that
/// happens through normal teardown or unwinding. Nested leases release in
/// reverse order of acquisition.
#[must_use = "the cursor is restored as soon as the lease is dropped"]
pub struct CursorLease<H: CursorHost> {
    host: H,
    previous: CursorKind,
}

impl<H: CursorHost> CursorLease<H> {
    pub fn acquire(host: H, cursor: CursorKind) -> Self {
        let previous = host.replace_cursor(cursor);
        Self { host, previous }
    }
}

impl<H: CursorHost> Drop for CursorLease<H> {
    fn drop(&mut self) {
        self.host.replace_cursor(self.previous);
    }
}

/// Shared single threaded cursor cell, read by whoever paints the cursor.
#[derive(Clone, Debug, Default)]
pub struct SharedCursor(Rc<Cell<CursorKind>>);

impl SharedCursor {
    pub fn get(&self) -> CursorKind {
        self.0.get()
    }
}

impl CursorHost for SharedCursor {
    fn replace_cursor(&self, cursor: CursorKind) -> CursorKind {
        self.0.replace(cursor)
    }
}
