//! faxc-runtime - the GC contract `faxc-gen`'s emitted code links against.
//!
//! Three `#[no_mangle] extern "C"` symbols only: `fax_gc_alloc`,
//! `fax_gc_collect`, `fax_gc_register_root`. See `gc` for the stub
//! implementation backing them.

mod gc;

pub use gc::{fax_gc_alloc, fax_gc_collect, fax_gc_register_root};
