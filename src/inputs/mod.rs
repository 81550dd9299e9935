pub mod key_seq;

pub use key_seq::KeySeq;
