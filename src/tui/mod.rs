//! Terminal front end: an Elm-style ratatui app around the wizard core.

pub mod app;
pub mod events;
pub mod services;
pub mod theme;
pub mod views;
pub mod widgets;
