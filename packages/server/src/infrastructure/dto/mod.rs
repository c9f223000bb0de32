//! Data Transfer Objects for the chat event binding.

pub mod event;
