//! Cooperative scheduler: threads, locks, and the `notify`/`endon` event
//! model (`SPEC_FULL.md` §4.5, §5). Grounded on `virtual_machine.h`'s
//! `ThreadContext`/`m_threads`/`m_newthreads` staging list and
//! `instructions.cpp`'s `WaitTill`/`Wait`/`WaitTillFrameEnd` opcodes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

use crate::object::Object;
use crate::value::Variant;
use crate::vm::frame::{FunctionContext, Reference};

/// Identity for a thread, in the style of `ouros::asyncio::TaskId`: a plain
/// incrementing newtype, not a globally unique id, since nothing here needs
/// cross-session uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadId(u32);

impl ThreadId {
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Shared state for one `waittill` registration. Held both by the owning
/// object's listener list and by the waiting thread's lock list so that
/// `notify` can flip it without either side needing to reach into the
/// scheduler.
#[derive(Debug)]
pub struct EventLockState {
    pub event: String,
    pub params: Vec<Rc<str>>,
    unlocked: Cell<bool>,
    payload: RefCell<Vec<Variant>>,
}

pub type Listener = Rc<EventLockState>;

impl EventLockState {
    fn new(event: String, params: Vec<Rc<str>>) -> Rc<Self> {
        Rc::new(Self { event, params, unlocked: Cell::new(false), payload: RefCell::new(Vec::new()) })
    }
}

pub enum ThreadLock {
    Duration(Instant),
    FrameEnd(u64),
    Event(Listener),
}

impl ThreadLock {
    fn locked(&self, now: Instant, current_frame: u64) -> bool {
        match self {
            Self::Duration(deadline) => now < *deadline,
            Self::FrameEnd(frame) => *frame == current_frame,
            Self::Event(listener) => !listener.unlocked.get(),
        }
    }
}

struct EndonWatch {
    object: Rc<RefCell<Object>>,
    event: String,
}

pub struct Thread {
    pub id: ThreadId,
    pub operand_stack: Vec<Variant>,
    /// Separate from `operand_stack`: holds in-flight lvalues produced by
    /// `LoadRef`/`LoadObjectFieldRef` and consumed by `StoreRef` or chained
    /// `LoadObjectFieldRef`.
    pub ref_stack: Vec<Reference>,
    pub call_stack: Vec<FunctionContext>,
    locks: Vec<ThreadLock>,
    endons: Vec<EndonWatch>,
    pub marked_for_deletion: bool,
    pub result: Option<Variant>,
    /// Zero flag set by `Test` and read by `JumpZero`/`JumpNotZero`. Kept
    /// per-thread rather than as one VM-global word (`DESIGN.md` Open
    /// Question 11): each thread runs uninterrupted until it suspends, so a
    /// per-thread flag observes the same ordering the spec describes without
    /// risking another thread's `Test` clobbering it mid-sequence.
    pub zero_flag: bool,
}

impl Thread {
    fn new(id: ThreadId, entry: FunctionContext) -> Self {
        Self {
            id,
            operand_stack: Vec::new(),
            ref_stack: Vec::new(),
            call_stack: vec![entry],
            locks: Vec::new(),
            endons: Vec::new(),
            marked_for_deletion: false,
            result: None,
            zero_flag: false,
        }
    }

    #[must_use]
    pub fn is_runnable(&self, now: Instant, current_frame: u64) -> bool {
        !self.marked_for_deletion && !self.locks.iter().any(|lock| lock.locked(now, current_frame))
    }

    /// Drops satisfied locks and, for newly unlocked event locks, binds the
    /// captured parameter names into the top call frame.
    pub fn reap_satisfied_locks(&mut self, now: Instant, current_frame: u64) {
        let mut still_locked = Vec::with_capacity(self.locks.len());
        for lock in self.locks.drain(..) {
            if lock.locked(now, current_frame) {
                still_locked.push(lock);
                continue;
            }
            if let ThreadLock::Event(listener) = &lock {
                if let Some(frame) = self.call_stack.last_mut() {
                    let payload = listener.payload.borrow();
                    for (name, value) in listener.params.iter().zip(payload.iter()) {
                        frame.bind_param(name, value.clone());
                    }
                }
            }
        }
        self.locks = still_locked;
    }

    pub fn install_duration_lock(&mut self, deadline: Instant) {
        self.locks.push(ThreadLock::Duration(deadline));
    }

    pub fn install_frame_end_lock(&mut self, frame: u64) {
        self.locks.push(ThreadLock::FrameEnd(frame));
    }

    pub fn install_event_lock(&mut self, object: &Rc<RefCell<Object>>, event: String, params: Vec<Rc<str>>) {
        let state = EventLockState::new(event, params);
        object.borrow_mut().listeners.push(state.clone());
        self.locks.push(ThreadLock::Event(state));
    }

    pub fn install_endon(&mut self, object: Rc<RefCell<Object>>, event: String) {
        self.endons.push(EndonWatch { object, event });
    }

    fn watches(&self, object: &Rc<RefCell<Object>>, event: &str) -> bool {
        self.endons
            .iter()
            .any(|watch| Rc::ptr_eq(&watch.object, object) && watch.event.eq_ignore_ascii_case(event))
    }
}

/// Owns every live thread plus the staging list for threads spawned mid-tick.
pub struct Scheduler {
    threads: Vec<Thread>,
    staged: Vec<Thread>,
    next_id: u32,
    current_frame: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self { threads: Vec::new(), staged: Vec::new(), next_id: 0, current_frame: 0 }
    }

    /// Creates a new thread in the staging list; it is promoted into the
    /// active set at the next tick boundary and does not run this tick.
    pub fn spawn(&mut self, entry: FunctionContext) -> ThreadId {
        let id = ThreadId(self.next_id);
        self.next_id += 1;
        self.staged.push(Thread::new(id, entry));
        id
    }

    #[must_use]
    pub fn thread_mut(&mut self, id: ThreadId) -> Option<&mut Thread> {
        self.threads.iter_mut().find(|thread| thread.id == id)
    }

    #[must_use]
    pub fn is_alive(&self, id: ThreadId) -> bool {
        self.threads.iter().any(|thread| thread.id == id) || self.staged.iter().any(|thread| thread.id == id)
    }

    #[must_use]
    pub fn take_result(&mut self, id: ThreadId) -> Option<Variant> {
        let index = self.threads.iter().position(|thread| thread.id == id && thread.marked_for_deletion)?;
        self.threads.remove(index).result
    }

    #[must_use]
    pub const fn current_frame(&self) -> u64 {
        self.current_frame
    }

    pub fn advance_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Promotes staged threads into the active set, then returns the ids
    /// eligible to execute this tick (their locks, if any, are already
    /// satisfied and bound).
    pub fn begin_tick(&mut self, now: Instant) -> Vec<ThreadId> {
        self.threads.append(&mut self.staged);
        self.threads.retain(|thread| !thread.marked_for_deletion);
        let frame = self.current_frame;
        for thread in &mut self.threads {
            thread.reap_satisfied_locks(now, frame);
        }
        self.threads.iter().filter(|thread| thread.is_runnable(now, frame)).map(|thread| thread.id).collect()
    }

    /// Delivers a notification: wakes matching `waittill` listeners exactly
    /// once each (no queueing for listener-less notifications) and marks any
    /// watching `endon` threads for deletion.
    pub fn notify(&mut self, object: &Rc<RefCell<Object>>, event: &str, payload: Vec<Variant>) {
        {
            let mut obj = object.borrow_mut();
            obj.listeners.retain(|listener| {
                if listener.event.eq_ignore_ascii_case(event) {
                    *listener.payload.borrow_mut() = payload.clone();
                    listener.unlocked.set(true);
                    false
                } else {
                    true
                }
            });
        }
        for thread in self.threads.iter_mut().chain(self.staged.iter_mut()) {
            if thread.watches(object, event) {
                thread.marked_for_deletion = true;
            }
        }
    }
}
