//! Integration tests for chatline.

pub mod common;

pub mod alias_test;
pub mod completion_test;
pub mod dispatch_test;
