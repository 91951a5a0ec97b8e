
pub mod control;
pub mod gateway;
pub mod logging;
pub mod media;

// Record types, option catalogs and payload shaping for the two forms
pub mod requests;

pub mod wizard;
