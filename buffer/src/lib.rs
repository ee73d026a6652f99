//! Bounded staging buffer for not-yet-decoded bitstream bytes.
//!
//! This crate provides [`StagingBuffer`], a fixed-capacity byte buffer that
//! keeps its occupied bytes left-aligned at offset 0. Consumers scan it as a
//! plain slice and drop what they have processed with
//! [`StagingBuffer::compact`].
//!
//! ```
//! use madstream_buffer::StagingBuffer;
//!
//! let mut buf = StagingBuffer::new(1024);
//! let taken = buf.append(b"\xff\xfb\x90\x00");
//! assert_eq!(taken, 4);
//! assert_eq!(&buf.as_slice()[..2], b"\xff\xfb");
//! ```
//!
//! # Thread Safety
//!
//! `StagingBuffer` is a plain owned value with no interior locking. It is
//! `Send + Sync`, but mutation requires `&mut`, so a single owner drives it.

mod staging;

pub use staging::StagingBuffer;
