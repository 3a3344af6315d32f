//! Typed, session-scoped resource handles.
//!
//! The driver names every object with a bare `u32`. A [`Handle`] pairs that
//! number with the session that created it and with the kind of object it
//! names, so a CQ handle cannot be passed where a PD is expected and a handle
//! from one session is refused by another. Only this crate mints handles.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Session`](crate::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SESSION.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marker for the kind of driver object a handle names.
pub trait HandleKind: 'static {
    const NAME: &'static str;
}

#[derive(Debug)]
pub enum PdKind {}
#[derive(Debug)]
pub enum MrKind {}
#[derive(Debug)]
pub enum CqKind {}
#[derive(Debug)]
pub enum QpKind {}

impl HandleKind for PdKind {
    const NAME: &'static str = "pd";
}
impl HandleKind for MrKind {
    const NAME: &'static str = "mr";
}
impl HandleKind for CqKind {
    const NAME: &'static str = "cq";
}
impl HandleKind for QpKind {
    const NAME: &'static str = "qp";
}

/// A driver-assigned object handle, valid only inside its owning session.
pub struct Handle<K: HandleKind> {
    raw: u32,
    session: SessionId,
    _kind: PhantomData<fn() -> K>,
}

impl<K: HandleKind> Handle<K> {
    pub(crate) fn new(raw: u32, session: SessionId) -> Self {
        Self {
            raw,
            session,
            _kind: PhantomData,
        }
    }

    /// The driver's number for this object.
    pub fn raw(&self) -> u32 {
        self.raw
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Yield the raw handle for a command issued on `session`.
    pub(crate) fn raw_for(&self, session: SessionId) -> crate::Result<u32> {
        if self.session != session {
            return Err(crate::VerbsError::ForeignHandle {
                kind: K::NAME,
                owner: self.session.get(),
                session: session.get(),
            });
        }
        Ok(self.raw)
    }
}

impl<K: HandleKind> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: HandleKind> Copy for Handle<K> {}

impl<K: HandleKind> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.session == other.session
    }
}

impl<K: HandleKind> Eq for Handle<K> {}

impl<K: HandleKind> std::hash::Hash for Handle<K> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
        self.session.hash(state);
    }
}

impl<K: HandleKind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", K::NAME, self.raw, self.session)
    }
}
