pub mod frame;

pub use frame::{FRAME_PREFIX_SIZE, read_frame_len, write_frame};
