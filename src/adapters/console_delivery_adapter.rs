//! Console delivery adapter.
//!
//! Prints reports to stdout. Stands in for a chat transport when running
//! scans from the command line or a cron job.

use crate::domain::error::SahambotError;
use crate::ports::delivery_port::DeliveryPort;

pub struct ConsoleDeliveryAdapter;

impl DeliveryPort for ConsoleDeliveryAdapter {
    fn send_report(
        &self,
        destination: &str,
        text: &str,
        image: Option<&[u8]>,
    ) -> Result<(), SahambotError> {
        println!("=== report for {} ===", destination);
        println!("{}", text);
        if let Some(bytes) = image {
            println!("[chart attachment: {} bytes]", bytes.len());
        }
        Ok(())
    }
}
