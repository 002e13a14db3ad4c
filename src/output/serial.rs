//! Serial link to the LED controller

use super::{encode_frame, FrameSink, SinkStatus};
use crate::config::SerialConfig;
use crate::error::{LedError, Result};
use crate::render::RenderFrame;
use serialport::{SerialPort, SerialPortType};
use std::io::Write;
use std::thread;
use tracing::{info, warn};

pub struct SerialSink {
    config: SerialConfig,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialSink {
    /// Does not touch the device; the first frame opens it
    pub fn new(config: SerialConfig) -> Self {
        Self { config, port: None }
    }

    /// Open the configured port, or the first USB port with a matching id
    fn connect(&self) -> Result<Box<dyn SerialPort>> {
        let config = &self.config;
        if let Some(path) = &config.port {
            let port = serialport::new(path.to_string_lossy(), config.baud)
                .timeout(config.write_timeout)
                .open()?;
            return Ok(port);
        }

        for info in serialport::available_ports()? {
            if let SerialPortType::UsbPort(usb) = &info.port_type {
                if usb.vid == config.vendor_id && usb.pid == config.product_id {
                    let port = serialport::new(&info.port_name, config.baud)
                        .timeout(config.write_timeout)
                        .open()?;
                    info!(port = %info.port_name, "opened LED controller");
                    return Ok(port);
                }
            }
        }
        Err(LedError::Device(serialport::Error::new(
            serialport::ErrorKind::NoDevice,
            format!("no serial port with id {:04x}:{:04x}", config.vendor_id, config.product_id),
        )))
    }

    /// A failed write drops the connection
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let mut port = match self.port.take() {
            Some(port) => port,
            None => self.connect()?,
        };
        port.write_all(bytes)?;
        port.flush()?;
        self.port = Some(port);
        Ok(())
    }
}

impl FrameSink for SerialSink {
    /// Blocks, reconnecting every `retry` interval, until the frame is written
    fn submit(&mut self, frame: &RenderFrame) -> SinkStatus {
        let bytes = encode_frame(frame);
        loop {
            match self.write(&bytes) {
                Ok(()) => return SinkStatus::Continue,
                Err(e) => {
                    warn!(error = %e, retry_ms = self.config.retry.as_millis() as u64, "LED controller unavailable");
                    thread::sleep(self.config.retry);
                }
            }
        }
    }
}
