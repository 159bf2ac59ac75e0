//! Capabilities - side effect interfaces
//!
//! Following Crux architecture, capabilities are interfaces for effects.
//! Shells implement these to execute the actual side effects.

// TODO: Define capability traits for:
// - HTTP requests
// - Timers
// - Key-value storage
// - Random number generation

// For now, this module is a placeholder
