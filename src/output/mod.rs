//! Device output stage
//!
//! Frames arrive one at a time over a single slot channel and are handed to a
//! [`FrameSink`]. A sink deals with its own failures; it only reports whether
//! it wants more frames.

pub mod preview;
pub mod serial;

use crate::render::RenderFrame;
use std::io;
use std::sync::mpsc::{sync_channel, SyncSender};
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Start of every frame on the wire
pub const FRAME_HEADER: [u8; 3] = [b'*', 238, 2];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkStatus {
    Continue,
    /// The sink is finished; the output thread exits and the render loop stops
    Closed,
}

pub trait FrameSink: Send {
    fn submit(&mut self, frame: &RenderFrame) -> SinkStatus;
}

/// Header, then one R,G,B triple per slot with brightness applied
pub fn encode_frame(frame: &RenderFrame) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(FRAME_HEADER.len() + frame.colors.len() * 3);
    bytes.extend_from_slice(&FRAME_HEADER);
    for color in &frame.colors {
        let (r, g, b) = color.scaled(frame.brightness).to_rgb8();
        bytes.extend_from_slice(&[r, g, b]);
    }
    bytes
}

/// Run `sink` on its own thread. Dropping the sender ends the thread.
pub fn spawn_output<S: FrameSink + 'static>(mut sink: S) -> io::Result<(SyncSender<RenderFrame>, JoinHandle<()>)> {
    let (tx, rx) = sync_channel::<RenderFrame>(1);
    let handle = thread::Builder::new().name("output".into()).spawn(move || {
        for frame in rx {
            if sink.submit(&frame) == SinkStatus::Closed {
                debug!("frame sink closed");
                break;
            }
        }
    })?;
    Ok((tx, handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Rgb;
    use std::sync::{Arc, Mutex};

    struct Recording {
        frames: Arc<Mutex<Vec<Vec<u8>>>>,
        close_after: usize,
    }

    impl FrameSink for Recording {
        fn submit(&mut self, frame: &RenderFrame) -> SinkStatus {
            let mut frames = self.frames.lock().unwrap();
            frames.push(encode_frame(frame));
            if frames.len() >= self.close_after {
                SinkStatus::Closed
            } else {
                SinkStatus::Continue
            }
        }
    }

    #[test]
    fn encodes_header_and_scaled_channels() {
        let frame = RenderFrame { colors: vec![Rgb::RED, Rgb::new(0.0, 1.0, 0.5)], brightness: 0.5 };
        assert_eq!(encode_frame(&frame), vec![b'*', 238, 2, 128, 0, 0, 0, 128, 64]);
    }

    #[test]
    fn out_of_range_colors_are_clamped() {
        let frame = RenderFrame { colors: vec![Rgb::new(2.0, -1.0, f64::NAN)], brightness: 1.0 };
        assert_eq!(&encode_frame(&frame)[3..], &[255, 0, 0]);
    }

    #[test]
    fn output_thread_stops_when_sink_closes() {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let sink = Recording { frames: Arc::clone(&frames), close_after: 2 };
        let (tx, handle) = spawn_output(sink).unwrap();
        let frame = RenderFrame { colors: vec![Rgb::BLUE], brightness: 1.0 };
        tx.send(frame.clone()).unwrap();
        tx.send(frame.clone()).unwrap();
        handle.join().unwrap();
        assert!(tx.send(frame).is_err());
        assert_eq!(frames.lock().unwrap().len(), 2);
    }

    #[test]
    fn dropping_sender_ends_the_thread() {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let (tx, handle) = spawn_output(Recording { frames, close_after: usize::MAX }).unwrap();
        drop(tx);
        handle.join().unwrap();
    }
}
