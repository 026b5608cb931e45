// Test modules for bizops-resilience
//
// Test organization follows the template pattern where each source file
// has a corresponding test file that focuses on business logic verification.

// Test helper utilities (recording logger, error fixtures)
pub mod helpers;

pub mod handler;
pub mod normalize;
