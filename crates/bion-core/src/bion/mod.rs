//! BION: a compact, self-describing binary wire format.
//!
//! A stream is `0x21 0x23` (header), zero or more tokens, and a single
//! `0x00` footer. See [`tag`] for the byte-level layout, [`writer`] for the
//! stateless encoder, [`reader`] for the streaming state-machine decoder,
//! and [`visitor`] for the adapter that turns an abstract tree walk into
//! writer calls. Nothing in this module knows about [`crate::Node`]; the
//! bridge lives in [`crate::codec`].

pub mod reader;
pub mod tag;
pub mod visitor;
pub mod writer;

pub use reader::{BionEvents, BionInput, BionReader, SliceInput, StreamInput, DEFAULT_MAX_TOKEN};
pub use visitor::{StructWriter, TreeSink};
pub use writer::{BionWriter, BoundedSink};
