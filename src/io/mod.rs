pub mod frame_log;

pub use frame_log::FrameLog;
