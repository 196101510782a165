//! UI module - painted widgets shared across panes

pub mod components;
