pub mod frame_packet;

pub use frame_packet::{DrawCommand, FramePacket};
