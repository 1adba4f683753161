//! Report delivery port trait.
//!
//! Fire-and-forget: implementations report failures as errors, but callers
//! log and drop them. A delivery problem never invalidates a scan result.

use crate::domain::error::SahambotError;

pub trait DeliveryPort {
    /// Send one report to a destination (chat id, console tag, etc.).
    /// `image` is an optional chart attachment; adapters without image
    /// support may ignore it.
    fn send_report(
        &self,
        destination: &str,
        text: &str,
        image: Option<&[u8]>,
    ) -> Result<(), SahambotError>;
}
